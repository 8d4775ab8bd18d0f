use crate::block::Block;
use crate::tree::BlockTree;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Publication status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Published,
    Scheduled,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Published => "published",
            Status::Scheduled => "scheduled",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Status::Draft),
            "published" => Ok(Status::Published),
            "scheduled" => Ok(Status::Scheduled),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// A document being authored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    /// Supplied by the caller; never derived here
    pub slug: String,
    pub status: Status,
    pub blocks: BlockTree,
}

impl Document {
    /// New draft holding a single empty paragraph
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            status: Status::Draft,
            blocks: BlockTree::new(vec![Block::paragraph("")]),
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_blocks(mut self, blocks: BlockTree) -> Self {
        self.blocks = blocks;
        self
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("", "")
    }
}
