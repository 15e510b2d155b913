pub mod config;
pub mod world;

pub use config::WorldConfig;
pub use world::{TickStats, World};
