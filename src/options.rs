use crate::{ensure, Error};

/// Hard upper bound on the number of levels a list may be configured with.
pub const MAX_LEVEL_LIMIT: usize = 32;

pub const DEFAULT_MAX_LEVEL: usize = 16;

pub const DEFAULT_BRANCHING_FACTOR: u32 = 2;

/// Construction options for a [`SkipList`](crate::SkipList).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Options {
    /// Number of levels the head sentinel carries. Node heights never exceed it.
    pub max_level: usize,
    /// Inverse promotion probability of the level oracle. 2 is a fair coin.
    pub branching_factor: u32,
    /// Seed for the level oracle. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            branching_factor: DEFAULT_BRANCHING_FACTOR,
            seed: None,
        }
    }
}

impl Options {
    pub fn max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn branching_factor(mut self, branching_factor: u32) -> Self {
        self.branching_factor = branching_factor;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn validate(&self) -> crate::Result<()> {
        ensure!(
            self.max_level >= 1,
            Error::InvalidOptions("max_level must be at least 1".to_string())
        );
        ensure!(
            self.max_level <= MAX_LEVEL_LIMIT,
            Error::InvalidOptions(format!(
                "max_level {} exceeds the limit of {}",
                self.max_level, MAX_LEVEL_LIMIT
            ))
        );
        ensure!(
            self.branching_factor >= 2,
            Error::InvalidOptions(format!(
                "branching_factor must be at least 2, got {}",
                self.branching_factor
            ))
        );
        Ok(())
    }
}
