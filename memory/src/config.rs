#[derive(Debug, Clone)]
pub struct ArenaConfig {
    /// Slots constructed per block. Zero is treated as one.
    pub block_size: usize,
    /// Construct the first block up front instead of on the first `get`.
    pub preallocate: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            block_size: 1024,
            preallocate: false,
        }
    }
}
