use common::BoundaryBox;
use memory::ArenaConfig;
use spatial::TreeConfig;

#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Bodies bounce off the edges of this box.
    pub bounds: BoundaryBox,
    pub tree: TreeConfig,
    pub arena: ArenaConfig,
    /// Upper bound on each velocity component of spawned bodies.
    pub max_speed: f32,
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            bounds: BoundaryBox::new(0.0, 1000.0, 0.0, 1000.0),
            tree: TreeConfig::default(),
            arena: ArenaConfig::default(),
            max_speed: 50.0,
            seed: 0,
        }
    }
}
