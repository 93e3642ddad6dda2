#![no_main]

use arbitrary::Arbitrary;
use checktree::{ArenaTree, SelectionConfig, SelectionModel};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzOp {
    Select(u16),
    Deselect(u16),
    Clear,
    Undo,
    Redo,
    ClearHistory,
}

#[derive(Debug, Arbitrary)]
struct Input {
    depth: u8,
    fanout: u8,
    history: u8,
    ops: Vec<FuzzOp>,
}

fuzz_target!(|input: Input| {
    let depth = (input.depth % 5) as usize + 1;
    let fanout = (input.fanout % 4) as usize + 1;
    let history = (input.history % 16) as usize + 2;

    let tree = ArenaTree::uniform(depth, fanout);
    let all = tree.all_paths();
    let config = SelectionConfig::default().with_history(history);
    let mut model = SelectionModel::with_config(tree, config);

    for op in input.ops.iter().take(128) {
        match op {
            FuzzOp::Select(i) => {
                model.select(&[all[*i as usize % all.len()].clone()]);
            }
            FuzzOp::Deselect(i) => {
                model.deselect(&[all[*i as usize % all.len()].clone()]);
            }
            FuzzOp::Clear => {
                model.clear();
            }
            FuzzOp::Undo => {
                let could = model.can_undo();
                assert_eq!(model.undo(), could);
            }
            FuzzOp::Redo => {
                let could = model.can_redo();
                let before = model.selection_paths();
                assert_eq!(model.redo(), could);
                if !could {
                    assert_eq!(model.selection_paths(), before);
                }
            }
            FuzzOp::ClearHistory => {
                model.clear_history();
                assert!(!model.can_undo());
                assert!(!model.can_redo());
            }
        }
        assert!(model.selection().is_canonical(), "non-canonical after {op:?}");
    }
});
