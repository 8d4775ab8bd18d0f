//! Comprehensive mutation tests

use blockpress_editor::{edits, Direction, EditError, Mutation, Patch};
use blockpress_model::{
    create, Block, BlockId, BlockKind, BlockTree, ContainerPath, Content, CreateOptions, Locator, Media, TreeError,
};
use std::sync::Arc;

fn nested() -> BlockTree {
    // root
    //  ├─ paragraph
    //  ├─ group
    //  │   └─ columns(2)
    //  │        ├─ col0: [paragraph]
    //  │        └─ col1: [paragraph]
    //  └─ quote
    BlockTree::new(vec![
        Block::paragraph("intro"),
        Block::container(
            BlockKind::Group,
            vec![create(BlockKind::Columns, None, CreateOptions::columns(2))],
        ),
        Block::text(BlockKind::Quote, "outro"),
    ])
}

fn deep_column(column: usize) -> ContainerPath {
    ContainerPath::root().children(1).column(0, column)
}

#[test]
fn test_insert_at_depth() {
    let tree = nested();
    let mutation = Mutation::InsertBlock {
        at: deep_column(1).at(0),
        kind: BlockKind::Code,
        content: Some(Content::Text("fn main() {}".into())),
        columns: None,
    };

    let next = mutation.apply(&tree).unwrap();
    let column = next.container(&deep_column(1)).unwrap();
    assert_eq!(column.len(), 2);
    assert_eq!(column[0].kind, BlockKind::Code);
    assert_eq!(column[0].content.as_text(), Some("fn main() {}"));

    // The original is untouched
    assert_eq!(tree.container(&deep_column(1)).unwrap().len(), 1);
}

#[test]
fn test_edit_shares_untouched_subtrees() {
    let tree = nested();
    let next = edits::insert(&tree, &deep_column(0).at(1), Block::new(BlockKind::Divider));

    assert!(Arc::ptr_eq(&tree.blocks()[0], &next.blocks()[0]));
    assert!(Arc::ptr_eq(&tree.blocks()[2], &next.blocks()[2]));
    assert!(!Arc::ptr_eq(&tree.blocks()[1], &next.blocks()[1]));

    let untouched = |t: &BlockTree| t.container(&deep_column(1)).unwrap()[0].clone();
    assert!(Arc::ptr_eq(&untouched(&tree), &untouched(&next)));
}

#[test]
fn test_update_media_reference() {
    let image = Block::new(BlockKind::Image);
    let id = image.id.clone();
    let tree = BlockTree::new(vec![image]);

    let uploaded = Content::Media(Media {
        url: "https://cdn.example.com/cat.png".into(),
        alt: "A cat".into(),
    });
    let next = Mutation::UpdateBlock {
        id: id.clone(),
        patch: Patch::Content(uploaded.clone()),
    }
    .apply(&tree)
    .unwrap();

    assert_eq!(next.find(&id).unwrap().content, uploaded);
}

#[test]
fn test_update_deep_block_by_id() {
    let tree = nested();
    let target = tree.container(&deep_column(0)).unwrap()[0].id.clone();

    let next = edits::update(&tree, &target, Patch::Width(Some("75%".into())));
    assert_eq!(next.find(&target).unwrap().width.as_deref(), Some("75%"));
}

#[test]
fn test_update_unknown_block() {
    let tree = nested();
    let missing = BlockId::new("missing");
    assert_eq!(
        edits::try_update(&tree, &missing, Patch::Width(None)),
        Err(EditError::BlockNotFound(missing))
    );
}

#[test]
fn test_divider_takes_no_content() {
    let divider = Block::new(BlockKind::Divider);
    let id = divider.id.clone();
    let tree = BlockTree::new(vec![divider]);

    assert_eq!(
        edits::try_update(&tree, &id, Patch::Content(Content::Text("x".into()))),
        Err(EditError::ContentMismatch(BlockKind::Divider))
    );
    assert!(edits::try_update(&tree, &id, Patch::Content(Content::Empty)).is_ok());
}

#[test]
fn test_move_within_column() {
    let tree = edits::insert(&nested(), &deep_column(0).at(1), Block::new(BlockKind::Divider));
    let next = Mutation::MoveBlock {
        at: deep_column(0).at(1),
        direction: Direction::Up,
    }
    .apply(&tree)
    .unwrap();

    let kinds: Vec<_> = next.container(&deep_column(0)).unwrap().iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![BlockKind::Divider, BlockKind::Paragraph]);
}

#[test]
fn test_move_missing_index() {
    let tree = nested();
    assert_eq!(
        edits::try_move_block(&tree, &Locator::root(3), Direction::Up),
        Err(EditError::Tree(TreeError::IndexOutOfRange { index: 3, len: 3 }))
    );
}

#[test]
fn test_transfer_out_of_nested_column_to_root() {
    let tree = nested();
    let moving = tree.container(&deep_column(0)).unwrap()[0].id.clone();

    let next = Mutation::TransferBlock {
        from: deep_column(0).at(0),
        to: Locator::root(3),
    }
    .apply(&tree)
    .unwrap();

    assert_eq!(next.len(), 4);
    assert_eq!(next.blocks()[3].id, moving);
    assert!(next.container(&deep_column(0)).unwrap().is_empty());
    assert!(next.has_unique_ids());
}

#[test]
fn test_transfer_earlier_block_into_later_container() {
    // Moving root[0] into the columns nested in root[1]: the path shifts
    let tree = nested();
    let moving = tree.blocks()[0].id.clone();

    let next = edits::transfer(&tree, &Locator::root(0), &deep_column(1).at(1));
    assert_eq!(next.len(), 2);
    let column = next.container(&ContainerPath::root().children(0).column(0, 1)).unwrap();
    assert_eq!(column[1].id, moving);
}

#[test]
fn test_transfer_group_into_its_own_column() {
    let tree = nested();
    assert_eq!(
        edits::try_transfer(&tree, &Locator::root(1), &deep_column(0).at(0)),
        Err(EditError::CycleDetected)
    );
    assert_eq!(edits::transfer(&tree, &Locator::root(1), &deep_column(0).at(0)), tree);
}

#[test]
fn test_transfer_keeps_value() {
    let tree = nested();
    let group = tree.blocks()[1].clone();
    let next = edits::transfer(&tree, &Locator::root(1), &Locator::root(0));
    assert!(Arc::ptr_eq(&next.blocks()[0], &group));
}

#[test]
fn test_insert_rejects_subtree_with_existing_id() {
    let tree = nested();
    let existing = tree.blocks()[0].as_ref().clone();
    let wrapper = Block::container(BlockKind::Group, vec![existing.clone()]);

    assert_eq!(
        edits::try_insert(&tree, &Locator::root(0), wrapper),
        Err(EditError::DuplicateId(existing.id))
    );
}

#[test]
fn test_delete_columns_inner_block_keeps_column() {
    let tree = nested();
    let inner = tree.container(&deep_column(1)).unwrap()[0].id.clone();

    let next = Mutation::DeleteBlock {
        container: deep_column(1),
        id: inner,
    }
    .apply(&tree)
    .unwrap();

    let columns = next.container(&ContainerPath::root().children(1)).unwrap()[0].clone();
    assert_eq!(columns.columns().unwrap().len(), 2);
}

#[test]
fn test_inserted_block_must_be_well_formed() {
    let mutation: Mutation = serde_json::from_value(serde_json::json!({
        "op": "insert",
        "at": { "index": 0 },
        "block": { "id": "fixed-img", "type": "image", "content": "not media" }
    }))
    .unwrap();

    let mut session = blockpress_editor::EditSession::new(blockpress_model::Document::new("T", "t"));
    assert!(!session.apply(mutation).is_applied());
    assert_eq!(session.version(), 0);

    // Whatever the session accepts can be saved and loaded back
    let round_trip = session.finalize().into_document().unwrap();
    assert_eq!(round_trip.blocks.len(), 1);
}

#[test]
fn test_resize_mutation() {
    let tree = BlockTree::new(vec![create(BlockKind::Columns, None, CreateOptions::columns(2))]);
    let next = Mutation::ResizeColumns {
        block: Locator::root(0),
        left: 0,
        delta_percent: 12.5,
    }
    .apply(&tree)
    .unwrap();

    let widths: Vec<_> = next.blocks()[0].columns().unwrap().iter().map(|c| c.width.clone()).collect();
    assert_eq!(widths, vec!["62.5%", "37.5%"]);
}
