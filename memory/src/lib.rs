pub mod arena;
pub mod config;
pub mod error;
pub mod pool;

pub use arena::{Arena, Checkpoint, Slot};
pub use config::ArenaConfig;
pub use error::{ArenaError, ArenaResult};
pub use pool::{Pool, PoolTag};
