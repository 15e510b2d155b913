use crate::error::{TreeError, TreeResult};

/// Validated subdivision settings for [`crate::Tree::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    divider: usize,
    max_count: usize,
}

impl TreeConfig {
    /// `divider` is the per-axis split count, so a subdivided leaf is cut into
    /// `divider * divider` cells. Leaves holding at most `max_count` items
    /// are not subdivided.
    pub fn new(divider: usize, max_count: usize) -> TreeResult<Self> {
        if divider < 2 {
            return Err(TreeError::InvalidDivider { divider });
        }
        if max_count < 1 {
            return Err(TreeError::InvalidMaxCount { max_count });
        }
        Ok(TreeConfig { divider, max_count })
    }

    pub fn divider(&self) -> usize {
        self.divider
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            divider: 2,
            max_count: 8,
        }
    }
}
