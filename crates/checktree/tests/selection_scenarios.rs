#![forbid(unsafe_code)]

//! End-to-end selection scenarios on small hand-built trees.
//!
//! Run:
//!   cargo test -p checktree --test selection_scenarios

use std::cell::RefCell;
use std::rc::Rc;

use checktree::{
    ArenaTree, ChangeKind, CheckState, NodeId, SelectionConfig, SelectionError, SelectionModel,
    TreeNode, TreePath,
};

// ============================================================================
// Fixtures
// ============================================================================

/// R{A{A1,A2},B,C}
fn small_tree() -> ArenaTree {
    ArenaTree::new(
        TreeNode::new("R")
            .child(
                TreeNode::new("A")
                    .child(TreeNode::new("A1"))
                    .child(TreeNode::new("A2")),
            )
            .child(TreeNode::new("B"))
            .child(TreeNode::new("C")),
    )
}

/// A project-like tree, four levels deep.
fn project_tree() -> ArenaTree {
    ArenaTree::new(
        TreeNode::new("project")
            .child(
                TreeNode::new("src")
                    .child(TreeNode::new("main.rs"))
                    .child(TreeNode::new("lib.rs"))
                    .child(
                        TreeNode::new("widgets")
                            .child(TreeNode::new("tree.rs"))
                            .child(TreeNode::new("list.rs"))
                            .child(TreeNode::new("table.rs")),
                    ),
            )
            .child(
                TreeNode::new("tests")
                    .child(TreeNode::new("smoke.rs"))
                    .child(TreeNode::new("golden.rs")),
            )
            .child(TreeNode::new("Cargo.toml")),
    )
}

fn path(tree: &ArenaTree, labels: &str) -> TreePath<NodeId> {
    let labels: Vec<&str> = labels.split('/').collect();
    tree.path_of(&labels)
        .unwrap_or_else(|| panic!("no such path: {labels:?}"))
}

/// Explicit selection as sorted label paths.
fn explicit(model: &SelectionModel<ArenaTree>) -> Vec<String> {
    let mut out: Vec<String> = model
        .selection_paths()
        .iter()
        .map(|p| model.tree().display_path(p))
        .collect();
    out.sort();
    out
}

struct Harness {
    model: SelectionModel<ArenaTree>,
}

impl Harness {
    fn new(tree: ArenaTree) -> Self {
        Self {
            model: SelectionModel::new(tree),
        }
    }

    fn p(&self, labels: &str) -> TreePath<NodeId> {
        path(self.model.tree(), labels)
    }

    fn select(&mut self, labels: &[&str]) -> bool {
        let paths: Vec<_> = labels.iter().map(|l| self.p(l)).collect();
        self.model.select(&paths)
    }

    fn deselect(&mut self, labels: &[&str]) -> bool {
        let paths: Vec<_> = labels.iter().map(|l| self.p(l)).collect();
        self.model.deselect(&paths)
    }

    fn explicit(&self) -> Vec<String> {
        explicit(&self.model)
    }

    fn state(&self, labels: &str) -> CheckState {
        self.model.check_state(&self.p(labels))
    }
}

// ============================================================================
// Collapse
// ============================================================================

#[test]
fn two_leaves_collapse_into_parent() {
    let mut h = Harness::new(small_tree());
    h.select(&["R/A/A1"]);
    h.select(&["R/A/A2"]);
    assert_eq!(h.explicit(), ["R/A"]);
}

#[test]
fn collapse_continues_to_root() {
    let mut h = Harness::new(small_tree());
    h.select(&["R/A/A1"]);
    h.select(&["R/A/A2"]);
    h.select(&["R/B"]);
    h.select(&["R/C"]);
    assert_eq!(h.explicit(), ["R"]);
}

#[test]
fn collapse_skips_multiple_levels_at_once() {
    let mut h = Harness::new(project_tree());
    h.select(&[
        "project/src/main.rs",
        "project/src/lib.rs",
        "project/src/widgets/tree.rs",
        "project/src/widgets/list.rs",
    ]);
    assert_eq!(
        h.explicit(),
        [
            "project/src/lib.rs",
            "project/src/main.rs",
            "project/src/widgets/list.rs",
            "project/src/widgets/tree.rs",
        ]
    );

    // The last widget completes widgets/, which completes src/.
    h.select(&["project/src/widgets/table.rs"]);
    assert_eq!(h.explicit(), ["project/src"]);
}

#[test]
fn selecting_parent_subsumes_selected_children() {
    let mut h = Harness::new(project_tree());
    h.select(&["project/tests/smoke.rs", "project/Cargo.toml"]);
    h.select(&["project/tests"]);
    assert_eq!(h.explicit(), ["project/Cargo.toml", "project/tests"]);
}

#[test]
fn select_is_idempotent() {
    let mut h = Harness::new(project_tree());
    let batch = ["project/src/lib.rs", "project/tests", "project/src/widgets/list.rs"];
    assert!(h.select(&batch));
    let once = h.explicit();
    let version = h.model.version();

    assert!(!h.select(&batch));
    assert_eq!(h.explicit(), once);
    assert_eq!(h.model.version(), version);
}

#[test]
fn duplicate_paths_in_one_batch() {
    let mut h = Harness::new(small_tree());
    h.select(&["R/B", "R/B", "R/B"]);
    assert_eq!(h.explicit(), ["R/B"]);
}

// ============================================================================
// Expansion
// ============================================================================

#[test]
fn deselect_leaf_under_selected_root() {
    let mut h = Harness::new(small_tree());
    h.select(&["R"]);
    h.deselect(&["R/A/A1"]);
    assert_eq!(h.explicit(), ["R/A/A2", "R/B", "R/C"]);

    assert!(!h.model.is_selected_or_implicit(&h.p("R/A/A1")));
    assert!(h.model.is_selected_or_implicit(&h.p("R/A/A2")));
    assert!(h.model.is_selected_or_implicit(&h.p("R/B")));
    assert!(h.model.is_unselected(&h.p("R/A/A1")));
}

#[test]
fn deselect_root_clears_without_expansion() {
    let mut h = Harness::new(small_tree());
    h.select(&["R"]);
    assert!(h.deselect(&["R"]));
    assert!(h.model.is_selection_empty());
}

#[test]
fn deep_expansion_keeps_other_branches_explicit() {
    let mut h = Harness::new(project_tree());
    h.select(&["project"]);
    h.deselect(&["project/src/widgets/list.rs"]);
    assert_eq!(
        h.explicit(),
        [
            "project/Cargo.toml",
            "project/src/lib.rs",
            "project/src/main.rs",
            "project/src/widgets/table.rs",
            "project/src/widgets/tree.rs",
            "project/tests",
        ]
    );
    assert_eq!(h.state("project"), CheckState::Partial);
    assert_eq!(h.state("project/src/widgets"), CheckState::Partial);
    assert_eq!(h.state("project/tests/golden.rs"), CheckState::Checked);
    assert_eq!(h.state("project/src/widgets/list.rs"), CheckState::Unchecked);
}

#[test]
fn expansion_stops_at_nearest_explicit_ancestor() {
    let mut h = Harness::new(project_tree());
    h.select(&["project/src/widgets", "project/Cargo.toml"]);
    h.deselect(&["project/src/widgets/tree.rs"]);
    assert_eq!(
        h.explicit(),
        [
            "project/Cargo.toml",
            "project/src/widgets/list.rs",
            "project/src/widgets/table.rs",
        ]
    );
}

#[test]
fn select_then_deselect_leaves_path_unselected() {
    let mut h = Harness::new(small_tree());
    h.select(&["R/A/A2", "R/B"]);
    h.select(&["R/A/A1"]);
    assert_eq!(h.explicit(), ["R/A", "R/B"]);

    h.deselect(&["R/A/A1"]);
    assert!(h.model.is_unselected(&h.p("R/A/A1")));
    // Expansion leaves the sibling explicit rather than restoring the
    // earlier state exactly.
    assert_eq!(h.explicit(), ["R/A/A2", "R/B"]);
}

#[test]
fn deselect_partially_selected_node_leaves_descendants() {
    let mut h = Harness::new(small_tree());
    h.select(&["R/A/A1"]);
    assert!(!h.deselect(&["R/A"]));
    assert_eq!(h.explicit(), ["R/A/A1"]);
}

#[test]
fn deselect_on_empty_selection_is_noop() {
    let mut h = Harness::new(small_tree());
    assert!(!h.deselect(&["R/A/A1", "R"]));
    assert!(h.model.is_selection_empty());
}

#[test]
fn mixed_batch_applies_in_order() {
    let mut h = Harness::new(small_tree());
    h.select(&["R"]);
    // Deselecting A1 expands; deselecting A2 afterwards removes the explicit
    // sibling the expansion created.
    h.deselect(&["R/A/A1", "R/A/A2"]);
    assert_eq!(h.explicit(), ["R/B", "R/C"]);
    assert_eq!(h.state("R/A"), CheckState::Unchecked);
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn status_queries_partition_nodes() {
    let mut h = Harness::new(project_tree());
    h.select(&["project/src/widgets", "project/tests/smoke.rs"]);

    for p in h.model.tree().all_paths() {
        let explicit = h.model.is_explicit(&p);
        let covered = h.model.is_selected_or_implicit(&p);
        let unselected = h.model.is_unselected(&p);
        let partial = h.model.selection().has_explicit_descendant(&p) && !covered;

        let held = [explicit, covered && !explicit, unselected, partial]
            .iter()
            .filter(|b| **b)
            .count();
        assert_eq!(held, 1, "{}", h.model.tree().display_path(&p));
    }
}

#[test]
fn snapshot_order_is_stable_insertion_order() {
    let mut h = Harness::new(project_tree());
    h.select(&["project/Cargo.toml"]);
    h.select(&["project/tests/golden.rs"]);
    h.select(&["project/src/main.rs"]);

    let shown: Vec<String> = h
        .model
        .selection_paths()
        .iter()
        .map(|p| h.model.tree().display_path(p))
        .collect();
    assert_eq!(
        shown,
        [
            "project/Cargo.toml",
            "project/tests/golden.rs",
            "project/src/main.rs",
        ]
    );
    assert_eq!(h.model.selection_paths(), h.model.selection_paths());
}

// ============================================================================
// Notifications
// ============================================================================

#[test]
fn observers_see_only_canonical_before_and_after() {
    let mut h = Harness::new(small_tree());
    let seen: Rc<RefCell<Vec<(ChangeKind, Vec<String>, Vec<String>)>>> =
        Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let tree = h.model.tree().clone();
    let _sub = h.model.subscribe(move |change| {
        let show = |paths: &[TreePath<NodeId>]| {
            let mut v: Vec<String> = paths.iter().map(|p| tree.display_path(p)).collect();
            v.sort();
            v
        };
        sink.borrow_mut()
            .push((change.kind, show(&change.prior[..]), show(&change.current[..])));
    });

    h.select(&["R/A/A1", "R/A/A2", "R/B", "R/C"]);
    h.deselect(&["R/A/A1"]);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], (ChangeKind::Select, vec![], vec!["R".to_owned()]));
    assert_eq!(
        seen[1],
        (
            ChangeKind::Deselect,
            vec!["R".to_owned()],
            vec!["R/A/A2".to_owned(), "R/B".to_owned(), "R/C".to_owned()],
        )
    );
}

#[test]
fn empty_input_never_notifies() {
    let mut h = Harness::new(small_tree());
    let count = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&count);
    let _sub = h.model.subscribe(move |_| *sink.borrow_mut() += 1);

    assert!(!h.model.select(&[]));
    assert!(!h.model.deselect(&[]));
    h.select(&["R/B"]);
    assert!(!h.model.deselect(&[]));
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn change_diff_lists_added_and_removed() {
    let mut h = Harness::new(small_tree());
    h.select(&["R/A/A1", "R/B"]);
    let last = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&last);
    let _sub = h.model.subscribe(move |change| {
        *sink.borrow_mut() = Some((change.added(), change.removed()));
    });

    h.select(&["R/A/A2"]);
    let (added, removed) = last.borrow_mut().take().expect("change delivered");
    assert_eq!(added, vec![h.p("R/A")]);
    assert_eq!(removed, vec![h.p("R/A/A1")]);
}

#[test]
fn detached_observer_stops_receiving() {
    let mut h = Harness::new(small_tree());
    let count = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&count);
    let sub = h.model.subscribe(move |_| *sink.borrow_mut() += 1);

    h.select(&["R/B"]);
    sub.unsubscribe();
    h.select(&["R/C"]);
    assert_eq!(*count.borrow(), 1);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn try_select_rejects_unknown_nodes_atomically() {
    let small = small_tree();
    let foreign = project_tree();
    let mut model = SelectionModel::new(small.clone());

    let good = path(&small, "R/B");
    let bad = path(&foreign, "project/tests/golden.rs");
    let err = model.try_select(&[good, bad]).unwrap_err();
    assert!(matches!(err, SelectionError::UnknownNode { .. }), "{err}");
    assert!(model.is_selection_empty());
}

#[test]
fn try_select_rejects_wrong_root() {
    let tree = small_tree();
    let mut model = SelectionModel::new(tree.clone());
    let a = path(&tree, "R/A");
    let rootless = TreePath::new(a.nodes()[1..].to_vec()).unwrap();
    assert!(matches!(
        model.try_select(&[rootless]),
        Err(SelectionError::RootMismatch { .. })
    ));
    assert_eq!(model.try_select(&[a]), Ok(true));
}

#[test]
fn validate_paths_skips_unresolved_entries() {
    let tree = small_tree();
    let foreign = project_tree();
    let mut model = SelectionModel::with_config(
        tree.clone(),
        SelectionConfig::default().with_validate_paths(true),
    );
    let bad = path(&foreign, "project/tests/smoke.rs");
    assert!(model.select(&[bad.clone(), path(&tree, "R/C")]));
    assert_eq!(explicit(&model), ["R/C"]);
    assert!(!model.select(&[bad]));
}

// ============================================================================
// History
// ============================================================================

#[test]
fn undo_redo_walks_recorded_states() {
    let tree = small_tree();
    let mut model =
        SelectionModel::with_config(tree.clone(), SelectionConfig::default().with_history(16));
    let kinds = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&kinds);
    let _sub = model.subscribe(move |change| sink.borrow_mut().push(change.kind));

    model.select(&[path(&tree, "R")]);
    model.deselect(&[path(&tree, "R/A/A1")]);
    assert_eq!(explicit(&model), ["R/A/A2", "R/B", "R/C"]);

    assert!(model.undo());
    assert_eq!(explicit(&model), ["R"]);
    assert!(model.can_redo());

    assert!(model.redo());
    assert_eq!(explicit(&model), ["R/A/A2", "R/B", "R/C"]);

    // A fresh change discards the redo branch.
    model.undo();
    model.clear();
    assert!(!model.can_redo());
    assert!(model.undo());
    assert_eq!(explicit(&model), ["R"]);

    assert_eq!(
        *kinds.borrow(),
        [
            ChangeKind::Select,
            ChangeKind::Deselect,
            ChangeKind::Undo,
            ChangeKind::Redo,
            ChangeKind::Undo,
            ChangeKind::Clear,
            ChangeKind::Undo,
        ]
    );
}

#[test]
fn history_disabled_by_default() {
    let tree = small_tree();
    let mut model = SelectionModel::new(tree.clone());
    model.select(&[path(&tree, "R/B")]);
    assert!(!model.can_undo());
    assert!(!model.undo());
    assert_eq!(explicit(&model), ["R/B"]);
}
