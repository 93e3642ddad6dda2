#![no_main]

use arbitrary::Arbitrary;
use checktree::{ArenaTree, CheckState, NodeId, SelectionModel, TreeNode, TreePath};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzOp {
    Select(Vec<u16>),
    Deselect(Vec<u16>),
    Replace(Vec<u16>),
    Toggle(u16),
    Clear,
}

#[derive(Debug, Arbitrary)]
struct Input {
    /// Child counts consumed depth-first while growing the tree.
    shape: Vec<u8>,
    ops: Vec<FuzzOp>,
}

fn grow(depth: usize, shape: &mut std::slice::Iter<'_, u8>) -> TreeNode {
    let n = if depth >= 4 {
        0
    } else {
        shape.next().map_or(0, |b| b % 5)
    };
    TreeNode::new(depth.to_string())
        .with_children((0..n).map(|_| grow(depth + 1, shape)).collect())
}

fn pick(all: &[TreePath<NodeId>], ix: &[u16]) -> Vec<TreePath<NodeId>> {
    ix.iter()
        .take(8)
        .map(|i| all[*i as usize % all.len()].clone())
        .collect()
}

fuzz_target!(|input: Input| {
    let tree = ArenaTree::new(grow(0, &mut input.shape.iter()));
    let all = tree.all_paths();
    let mut model = SelectionModel::new(tree);

    for op in input.ops.iter().take(64) {
        match op {
            FuzzOp::Select(ix) => {
                let paths = pick(&all, ix);
                model.select(&paths);
                for p in &paths {
                    assert!(model.is_selected_or_implicit(p), "selected path not covered");
                }
            }
            FuzzOp::Deselect(ix) => {
                model.deselect(&pick(&all, ix));
            }
            FuzzOp::Replace(ix) => {
                let paths = pick(&all, ix);
                model.set_selection(&paths);
                for p in &paths {
                    assert!(model.is_selected_or_implicit(p), "replaced path not covered");
                }
            }
            FuzzOp::Toggle(i) => {
                let p = &all[*i as usize % all.len()];
                let was = model.is_selected_or_implicit(p);
                let now = model.toggle(p);
                assert_eq!(now, !was, "toggle did not flip");
                if !now {
                    assert!(model.is_unselected(p), "toggled-off path still partial");
                }
            }
            FuzzOp::Clear => {
                model.clear();
                assert!(model.is_selection_empty());
            }
        }

        assert!(model.selection().is_canonical(), "non-canonical after {op:?}");
        for p in &all {
            let state = model.check_state(p);
            assert_eq!(state == CheckState::Checked, model.is_selected_or_implicit(p));
            assert_eq!(state == CheckState::Unchecked, model.is_unselected(p));
        }
    }
});
