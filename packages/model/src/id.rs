use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter shared by every generator so ids never repeat,
/// whichever document they were allocated for.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

const DEFAULT_SEED: &str = "blk";

/// Opaque block identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate a fresh id from the default generator
    pub fn generate() -> Self {
        IdGenerator::default().new_id()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Sequential id generator for blocks
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
}

impl IdGenerator {
    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self { seed: seed.into() }
    }

    /// Generate next sequential ID
    pub fn new_id(&self) -> BlockId {
        let count = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        BlockId(format!("{}-{}", self.seed, count))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::from_seed(DEFAULT_SEED)
    }
}
