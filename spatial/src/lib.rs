pub mod config;
pub mod error;
pub mod leaf;
pub mod query;
pub mod tree;

pub use config::TreeConfig;
pub use error::{TreeError, TreeResult};
pub use leaf::LeafRef;
pub use tree::{segment_is_degenerate, Tree, TreeStorage, EPSILON};
