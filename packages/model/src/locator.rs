//! # Locators
//!
//! A [`Locator`] addresses one position in the tree: a [`ContainerPath`]
//! naming a block list plus an index into that list. Paths are walked from
//! the root list, one [`Step`] per level of nesting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One level of descent from a block list into a nested one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Child list of the group/column at `block`
    Children { block: usize },
    /// Block list of column `column` of the columns block at `block`
    Column { block: usize, column: usize },
}

impl Step {
    /// Index of the container block within the enclosing list
    pub fn block_index(&self) -> usize {
        match self {
            Step::Children { block } | Step::Column { block, .. } => *block,
        }
    }

    pub fn with_block_index(self, index: usize) -> Self {
        match self {
            Step::Children { .. } => Step::Children { block: index },
            Step::Column { column, .. } => Step::Column { block: index, column },
        }
    }
}

/// Path from the root list to a nested block list. Empty means root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerPath(Vec<Step>);

impl ContainerPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn steps_mut(&mut self) -> &mut [Step] {
        &mut self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Path into the child list of the group/column at `block`
    pub fn children(&self, block: usize) -> Self {
        self.join(Step::Children { block })
    }

    /// Path into column `column` of the columns block at `block`
    pub fn column(&self, block: usize, column: usize) -> Self {
        self.join(Step::Column { block, column })
    }

    pub fn join(&self, step: Step) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }

    /// Locator for position `index` within this container
    pub fn at(&self, index: usize) -> Locator {
        Locator {
            path: self.clone(),
            index,
        }
    }

    /// True when `self` is a (non-strict) prefix of `other`
    pub fn is_prefix_of(&self, other: &ContainerPath) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl fmt::Display for ContainerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for step in &self.0 {
            match step {
                Step::Children { block } => write!(f, "/{}", block)?,
                Step::Column { block, column } => write!(f, "/{}:col{}", block, column)?,
            }
        }
        Ok(())
    }
}

/// A (container path, index) pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    #[serde(default)]
    pub path: ContainerPath,
    pub index: usize,
}

impl Locator {
    pub fn new(path: ContainerPath, index: usize) -> Self {
        Self { path, index }
    }

    /// Position `index` in the root list
    pub fn root(index: usize) -> Self {
        Self::new(ContainerPath::root(), index)
    }

    /// Locator of the sibling `offset` positions away, if non-negative
    pub fn offset(&self, offset: isize) -> Option<Locator> {
        self.index
            .checked_add_signed(offset)
            .map(|index| Locator::new(self.path.clone(), index))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.path, self.index)
    }
}
