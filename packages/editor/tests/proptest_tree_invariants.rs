//! Property-based invariant tests for the structural edit engine.
//!
//! Verifies:
//! 1. Id uniqueness under any sequence of insert/delete/move/transfer
//! 2. The root list never becomes empty
//! 3. `k` undos followed by `k` redos restore the tree
//! 4. `move(i, up)` then `move(i - 1, down)` restores sibling order
//! 5. Resized column widths stay in [10, 90] and sum to 100
//! 6. Earlier snapshots keep their value after later edits

use blockpress_editor::{drop_zones, edits, Direction, EditSession, Mutation, ResizeGesture};
use blockpress_model::width::parse_percent;
use blockpress_model::{create, Block, BlockKind, BlockTree, CreateOptions, Document, Locator};
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Insert { kind: BlockKind, zone: usize },
    Delete { block: usize },
    Move { block: usize, up: bool },
    Transfer { block: usize, zone: usize },
}

fn arb_kind() -> impl Strategy<Value = BlockKind> {
    prop_oneof![
        Just(BlockKind::Paragraph),
        Just(BlockKind::Heading),
        Just(BlockKind::Image),
        Just(BlockKind::Divider),
        Just(BlockKind::Group),
        Just(BlockKind::Column),
        Just(BlockKind::Columns),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (arb_kind(), any::<usize>()).prop_map(|(kind, zone)| Op::Insert { kind, zone }),
        2 => any::<usize>().prop_map(|block| Op::Delete { block }),
        2 => (any::<usize>(), any::<bool>()).prop_map(|(block, up)| Op::Move { block, up }),
        3 => (any::<usize>(), any::<usize>()).prop_map(|(block, zone)| Op::Transfer { block, zone }),
    ]
}

fn block_locators(tree: &BlockTree) -> Vec<Locator> {
    let mut locators = Vec::new();
    tree.walk(|locator, _| locators.push(locator.clone()));
    locators
}

fn pick<T: Clone>(items: &[T], selector: usize) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[selector % items.len()].clone())
    }
}

/// Resolve an abstract op against the current tree
fn to_mutation(tree: &BlockTree, op: &Op) -> Option<Mutation> {
    match op {
        Op::Insert { kind, zone } => Some(Mutation::InsertBlock {
            at: pick(&drop_zones(tree), *zone)?,
            kind: *kind,
            content: None,
            columns: None,
        }),
        Op::Delete { block } => {
            let at = pick(&block_locators(tree), *block)?;
            let id = tree.block_at(&at)?.id.clone();
            Some(Mutation::DeleteBlock { container: at.path, id })
        }
        Op::Move { block, up } => Some(Mutation::MoveBlock {
            at: pick(&block_locators(tree), *block)?,
            direction: if *up { Direction::Up } else { Direction::Down },
        }),
        Op::Transfer { block, zone } => Some(Mutation::TransferBlock {
            from: pick(&block_locators(tree), *block)?,
            to: pick(&drop_zones(tree), *zone)?,
        }),
    }
}

fn start_tree() -> BlockTree {
    BlockTree::new(vec![
        Block::paragraph("a"),
        create(BlockKind::Columns, None, CreateOptions::columns(3)),
        Block::container(BlockKind::Group, vec![Block::paragraph("b")]),
    ])
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn ids_stay_unique_and_root_non_empty(ops in prop::collection::vec(arb_op(), 1..40)) {
        let mut tree = start_tree();
        for op in &ops {
            if let Some(mutation) = to_mutation(&tree, op) {
                if let Ok(next) = mutation.apply(&tree) {
                    tree = next;
                }
            }
            prop_assert!(tree.has_unique_ids(), "duplicate id after {:?}", op);
            prop_assert!(!tree.is_empty());
        }
    }

    #[test]
    fn undo_then_redo_restores_tree(
        ops in prop::collection::vec(arb_op(), 1..25),
        undo_fraction in 0.0f64..=1.0,
    ) {
        let mut session = EditSession::new(Document::new("Prop", "prop").with_blocks(start_tree()));
        let mut applied = 0usize;
        for op in &ops {
            if let Some(mutation) = to_mutation(session.tree(), op) {
                if session.apply(mutation).is_applied() {
                    applied += 1;
                }
            }
        }

        let reached = session.tree().clone();
        let k = (applied as f64 * undo_fraction).floor() as usize;
        for _ in 0..k {
            prop_assert!(session.undo().is_applied());
        }
        for _ in 0..k {
            prop_assert!(session.redo().is_applied());
        }
        prop_assert_eq!(session.tree(), &reached);
    }

    #[test]
    fn move_up_then_down_is_identity(len in 2usize..10, pick_index in any::<usize>()) {
        let tree = BlockTree::new((0..len).map(|i| Block::paragraph(format!("p{}", i))).collect());
        let i = 1 + pick_index % (len - 1);

        let up = edits::try_move_block(&tree, &Locator::root(i), Direction::Up).unwrap();
        let back = edits::try_move_block(&up, &Locator::root(i - 1), Direction::Down).unwrap();
        prop_assert_eq!(back, tree);
    }

    #[test]
    fn resize_widths_stay_bounded(
        moves in prop::collection::vec(-2000.0f64..2000.0, 1..20),
        container_width in 50.0f64..3000.0,
    ) {
        let mut tree = BlockTree::new(vec![create(BlockKind::Columns, None, CreateOptions::columns(2))]);
        for chunk in moves.chunks(3) {
            // Each chunk is one gesture: pointer-down, a few moves, pointer-up
            let gesture = ResizeGesture::begin(&tree, &Locator::root(0), 0, container_width).unwrap();
            for dx in chunk {
                tree = gesture.apply(&tree, *dx);
            }

            let widths: Vec<f64> = tree.blocks()[0]
                .columns()
                .unwrap()
                .iter()
                .map(|c| parse_percent(&c.width).unwrap())
                .collect();
            prop_assert!(widths.iter().all(|w| (10.0..=90.0).contains(w)), "{:?}", widths);
            // Stored strings carry two decimals, so compare in hundredths
            let hundredths: i64 = widths.iter().map(|w| (w * 100.0).round() as i64).sum();
            prop_assert_eq!(hundredths, 10_000, "{:?}", widths);
        }
    }

    #[test]
    fn snapshots_keep_their_value(ops in prop::collection::vec(arb_op(), 1..20)) {
        let mut tree = start_tree();
        let mut snapshots = vec![(tree.clone(), serde_json::to_string(&tree).unwrap())];

        for op in &ops {
            if let Some(mutation) = to_mutation(&tree, op) {
                tree = mutation.apply(&tree).unwrap_or(tree);
            }
            snapshots.push((tree.clone(), serde_json::to_string(&tree).unwrap()));
        }

        for (snapshot, json) in &snapshots {
            prop_assert_eq!(&serde_json::to_string(snapshot).unwrap(), json);
        }
    }
}
