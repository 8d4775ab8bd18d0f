//! # Block Tree
//!
//! The ordered root list of a document, plus addressing helpers.
//!
//! Nodes are `Arc<Block>`. Cloning a tree is cheap and shares every node;
//! [`BlockTree::container_mut`] copies on write (`Arc::make_mut`) only the
//! nodes along the addressed path, so earlier clones keep their values.

use crate::block::{Block, Content};
use crate::error::TreeError;
use crate::id::BlockId;
use crate::locator::{ContainerPath, Locator, Step};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockTree {
    blocks: Vec<Arc<Block>>,
}

impl BlockTree {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks: blocks.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_shared(blocks: Vec<Arc<Block>>) -> Self {
        Self { blocks }
    }

    /// Root list
    pub fn blocks(&self) -> &[Arc<Block>] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Resolve a container path to its block list
    pub fn container(&self, path: &ContainerPath) -> Result<&[Arc<Block>], TreeError> {
        let mut list: &[Arc<Block>] = &self.blocks;
        for step in path.steps() {
            list = enter(list, step)?;
        }
        Ok(list)
    }

    /// Resolve a container path for mutation, copying each node on the way down
    pub fn container_mut(&mut self, path: &ContainerPath) -> Result<&mut Vec<Arc<Block>>, TreeError> {
        let mut list = &mut self.blocks;
        for step in path.steps() {
            list = enter_mut(list, step)?;
        }
        Ok(list)
    }

    pub fn block_at(&self, locator: &Locator) -> Option<&Arc<Block>> {
        self.container(&locator.path).ok()?.get(locator.index)
    }

    /// Mutable access to the block at `locator`, copying the path
    pub fn block_at_mut(&mut self, locator: &Locator) -> Result<&mut Block, TreeError> {
        let list = self.container_mut(&locator.path)?;
        let len = list.len();
        let slot = list.get_mut(locator.index).ok_or(TreeError::IndexOutOfRange {
            index: locator.index,
            len,
        })?;
        Ok(Arc::make_mut(slot))
    }

    pub fn find(&self, id: &BlockId) -> Option<&Block> {
        let locator = self.locate(id)?;
        self.block_at(&locator).map(|block| block.as_ref())
    }

    /// Locator of the block with `id`, searching depth-first
    pub fn locate(&self, id: &BlockId) -> Option<Locator> {
        locate_in(&self.blocks, &ContainerPath::root(), id)
    }

    /// Visit every block depth-first with its locator
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&Locator, &Block),
    {
        walk_list(&self.blocks, &ContainerPath::root(), &mut visit);
    }

    /// Visit every block list (root included) with its path
    pub fn walk_containers<F>(&self, mut visit: F)
    where
        F: FnMut(&ContainerPath, &[Arc<Block>]),
    {
        walk_lists(&self.blocks, &ContainerPath::root(), &mut visit);
    }

    /// All ids depth-first
    pub fn ids(&self) -> Vec<BlockId> {
        let mut ids = Vec::new();
        for block in &self.blocks {
            block.collect_ids(&mut ids);
        }
        ids
    }

    pub fn first_duplicate_id(&self) -> Option<BlockId> {
        let mut seen = HashSet::new();
        self.ids().into_iter().find(|id| !seen.insert(id.clone()))
    }

    pub fn has_unique_ids(&self) -> bool {
        self.first_duplicate_id().is_none()
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.locate(id).is_some()
    }
}

fn enter<'a>(list: &'a [Arc<Block>], step: &Step) -> Result<&'a [Arc<Block>], TreeError> {
    let index = step.block_index();
    let block = list.get(index).ok_or(TreeError::IndexOutOfRange {
        index,
        len: list.len(),
    })?;

    match (step, &block.content) {
        (Step::Children { .. }, Content::Blocks(children)) => Ok(children),
        (Step::Column { column, .. }, Content::Columns(columns)) => columns
            .get(*column)
            .map(|c| c.blocks.as_slice())
            .ok_or_else(|| TreeError::NoSuchColumn {
                id: block.id.clone(),
                column: *column,
            }),
        _ => Err(TreeError::NotAContainer(block.id.clone())),
    }
}

fn enter_mut<'a>(list: &'a mut Vec<Arc<Block>>, step: &Step) -> Result<&'a mut Vec<Arc<Block>>, TreeError> {
    let index = step.block_index();
    let len = list.len();
    let slot = list
        .get_mut(index)
        .ok_or(TreeError::IndexOutOfRange { index, len })?;

    // Check the shape before make_mut so a bad path copies nothing
    enter(std::slice::from_ref(slot), &step.with_block_index(0))?;

    let block = Arc::make_mut(slot);
    match (step, &mut block.content) {
        (Step::Children { .. }, Content::Blocks(children)) => Ok(children),
        (Step::Column { column, .. }, Content::Columns(columns)) => {
            let column = *column;
            columns
                .get_mut(column)
                .map(|c| &mut c.blocks)
                .ok_or_else(|| TreeError::NoSuchColumn {
                    id: block.id.clone(),
                    column,
                })
        }
        _ => Err(TreeError::NotAContainer(block.id.clone())),
    }
}

fn locate_in(list: &[Arc<Block>], path: &ContainerPath, id: &BlockId) -> Option<Locator> {
    for (index, block) in list.iter().enumerate() {
        if &block.id == id {
            return Some(path.at(index));
        }
        let found = match &block.content {
            Content::Blocks(children) => locate_in(children, &path.children(index), id),
            Content::Columns(columns) => columns
                .iter()
                .enumerate()
                .find_map(|(c, column)| locate_in(&column.blocks, &path.column(index, c), id)),
            _ => None,
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

fn walk_list<F>(list: &[Arc<Block>], path: &ContainerPath, visit: &mut F)
where
    F: FnMut(&Locator, &Block),
{
    for (index, block) in list.iter().enumerate() {
        visit(&path.at(index), block);
        match &block.content {
            Content::Blocks(children) => walk_list(children, &path.children(index), visit),
            Content::Columns(columns) => {
                for (c, column) in columns.iter().enumerate() {
                    walk_list(&column.blocks, &path.column(index, c), visit);
                }
            }
            _ => {}
        }
    }
}

fn walk_lists<F>(list: &[Arc<Block>], path: &ContainerPath, visit: &mut F)
where
    F: FnMut(&ContainerPath, &[Arc<Block>]),
{
    visit(path, list);
    for (index, block) in list.iter().enumerate() {
        match &block.content {
            Content::Blocks(children) => walk_lists(children, &path.children(index), visit),
            Content::Columns(columns) => {
                for (c, column) in columns.iter().enumerate() {
                    walk_lists(&column.blocks, &path.column(index, c), visit);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{create, BlockKind, CreateOptions};

    fn sample() -> BlockTree {
        BlockTree::new(vec![
            Block::paragraph("intro"),
            Block::container(BlockKind::Group, vec![Block::paragraph("inside")]),
            create(BlockKind::Columns, None, CreateOptions::columns(2)),
        ])
    }

    #[test]
    fn test_container_resolution() {
        let tree = sample();
        assert_eq!(tree.container(&ContainerPath::root()).unwrap().len(), 3);
        assert_eq!(tree.container(&ContainerPath::root().children(1)).unwrap().len(), 1);
        assert_eq!(tree.container(&ContainerPath::root().column(2, 1)).unwrap().len(), 1);
    }

    #[test]
    fn test_bad_paths() {
        let tree = sample();
        assert!(matches!(
            tree.container(&ContainerPath::root().children(0)),
            Err(TreeError::NotAContainer(_))
        ));
        assert!(matches!(
            tree.container(&ContainerPath::root().children(9)),
            Err(TreeError::IndexOutOfRange { index: 9, len: 3 })
        ));
        assert!(matches!(
            tree.container(&ContainerPath::root().column(2, 5)),
            Err(TreeError::NoSuchColumn { column: 5, .. })
        ));
        // Group is not a columns block
        assert!(tree.container(&ContainerPath::root().column(1, 0)).is_err());
    }

    #[test]
    fn test_container_mut_copies_only_the_path() {
        let before = sample();
        let mut after = before.clone();

        after
            .container_mut(&ContainerPath::root().children(1))
            .unwrap()
            .push(Arc::new(Block::paragraph("added")));

        // Snapshot unchanged
        assert_eq!(before.container(&ContainerPath::root().children(1)).unwrap().len(), 1);
        assert_eq!(after.container(&ContainerPath::root().children(1)).unwrap().len(), 2);

        // Siblings off the path stay shared
        assert!(Arc::ptr_eq(&before.blocks()[0], &after.blocks()[0]));
        assert!(Arc::ptr_eq(&before.blocks()[2], &after.blocks()[2]));
        assert!(!Arc::ptr_eq(&before.blocks()[1], &after.blocks()[1]));
    }

    #[test]
    fn test_failed_container_mut_copies_nothing() {
        let before = sample();
        let mut after = before.clone();
        assert!(after.container_mut(&ContainerPath::root().children(0)).is_err());
        assert!(Arc::ptr_eq(&before.blocks()[0], &after.blocks()[0]));
    }

    #[test]
    fn test_locate_nested() {
        let tree = sample();
        let nested = tree.blocks()[2].columns().unwrap()[1].blocks[0].id.clone();
        assert_eq!(tree.locate(&nested), Some(ContainerPath::root().column(2, 1).at(0)));
        assert_eq!(tree.find(&nested).map(|b| b.kind), Some(BlockKind::Paragraph));
        assert_eq!(tree.locate(&BlockId::new("missing")), None);
    }

    #[test]
    fn test_ids_and_walks() {
        let tree = sample();
        // intro, group, inside, columns, two seeded paragraphs
        assert_eq!(tree.ids().len(), 6);
        assert!(tree.has_unique_ids());

        let mut visited = 0;
        tree.walk(|_, _| visited += 1);
        assert_eq!(visited, 6);

        let mut lists = Vec::new();
        tree.walk_containers(|path, _| lists.push(path.clone()));
        assert_eq!(
            lists,
            vec![
                ContainerPath::root(),
                ContainerPath::root().children(1),
                ContainerPath::root().column(2, 0),
                ContainerPath::root().column(2, 1),
            ]
        );
    }

    #[test]
    fn test_duplicate_detection() {
        let block = Block::paragraph("twin");
        let tree = BlockTree::new(vec![block.clone(), block.clone()]);
        assert_eq!(tree.first_duplicate_id(), Some(block.id));
    }
}
