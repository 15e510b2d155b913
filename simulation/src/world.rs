use crate::config::WorldConfig;

use common::{Body, BoundaryBox};
use memory::{Pool, PoolTag};
use spatial::{Tree, TreeStorage};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub tick: u64,
    pub bodies: usize,
    pub leaves: usize,
    pub depth: u32,
    pub candidate_pairs: usize,
}

/// Tick scheduler: owns the bodies and the storage each tick's tree is built
/// into.
///
/// Bodies live in a pool and are recycled across ticks. Every `step` copies
/// the live bodies into a frame buffer, builds a tree over it, gathers
/// broad-phase candidate pairs and frees the tree before returning.
pub struct World {
    config: WorldConfig,
    bodies: Pool<Body>,
    storage: TreeStorage,
    frame: Vec<Body>,
    frame_tags: Vec<PoolTag>,
    pairs: Vec<(u32, u32)>,
    rng: StdRng,
    tick: u64,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        let storage = TreeStorage::with_config(config.arena.clone());
        let rng = StdRng::seed_from_u64(config.seed);
        World {
            config,
            bodies: Pool::new(Body::default),
            storage,
            frame: Vec::new(),
            frame_tags: Vec::new(),
            pairs: Vec::new(),
            rng,
            tick: 0,
        }
    }

    /// Spawns a moving body at a random position inside the bounds.
    pub fn spawn_body(&mut self) -> PoolTag {
        let (x, y) = self.config.bounds.get_random_point_inside(0.0, &mut self.rng);
        let speed = self.config.max_speed;
        let (vx, vy) = if speed > 0.0 {
            (
                self.rng.gen_range(-speed..=speed),
                self.rng.gen_range(-speed..=speed),
            )
        } else {
            (0.0, 0.0)
        };
        self.insert(Body::new(x, y).with_velocity(vx, vy))
    }

    pub fn spawn_static(&mut self, x: f32, y: f32) -> PoolTag {
        self.insert(Body::new_static(x, y))
    }

    pub fn insert(&mut self, body: Body) -> PoolTag {
        let tag = self.bodies.get();
        // Recycled bodies carry their previous state; overwrite all of it.
        if let Some(slot) = self.bodies.entry_mut(tag) {
            *slot = body;
        }
        tag
    }

    pub fn despawn(&mut self, tag: PoolTag) -> bool {
        self.bodies.free(tag)
    }

    pub fn body(&self, tag: PoolTag) -> Option<&Body> {
        self.bodies.entry(tag)
    }

    pub fn body_mut(&mut self, tag: PoolTag) -> Option<&mut Body> {
        self.bodies.entry_mut(tag)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.used_count()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn storage(&self) -> &TreeStorage {
        &self.storage
    }

    /// Advances every awake body by `dt`, then rebuilds the tree and
    /// collects candidate pairs for the new positions.
    pub fn step(&mut self, dt: f32) -> TickStats {
        let bounds = self.config.bounds;
        self.bodies.for_each_in_use_mut(|_, body| integrate(body, &bounds, dt));
        self.tick += 1;
        self.snapshot();

        let tree = Tree::build(&mut self.storage, &self.frame, &self.config.tree);
        tree.candidate_pairs(&mut self.pairs);
        let stats = TickStats {
            tick: self.tick,
            bodies: self.frame.len(),
            leaves: tree.leaf_count(),
            depth: tree.depth(),
            candidate_pairs: self.pairs.len(),
        };
        tree.free();

        tracing::debug!(
            tick = stats.tick,
            bodies = stats.bodies,
            leaves = stats.leaves,
            depth = stats.depth,
            pairs = stats.candidate_pairs,
            "world stepped"
        );
        stats
    }

    /// Candidate pairs found by the last `step`, as body tags. Empty after
    /// `with_tree` until the next `step`.
    pub fn candidate_pairs(&self) -> impl Iterator<Item = (PoolTag, PoolTag)> + '_ {
        self.pairs
            .iter()
            .map(move |&(a, b)| (self.frame_tags[a as usize], self.frame_tags[b as usize]))
    }

    /// Builds a tree over the current bodies and hands it to `f`. Item
    /// indices of the tree map to tags through the slice passed alongside.
    pub fn with_tree<R, F>(&mut self, f: F) -> R
    where
        F: FnOnce(&Tree<'_, Body>, &[PoolTag]) -> R,
    {
        self.snapshot();
        let tree = Tree::build(&mut self.storage, &self.frame, &self.config.tree);
        f(&tree, &self.frame_tags)
    }

    // Pairs index into the frame, so they go stale with it.
    fn snapshot(&mut self) {
        self.frame.clear();
        self.frame_tags.clear();
        self.pairs.clear();
        for (tag, body) in self.bodies.in_use() {
            self.frame.push(*body);
            self.frame_tags.push(tag);
        }
    }
}

fn integrate(body: &mut Body, bounds: &BoundaryBox, dt: f32) {
    if body.is_static || !body.active {
        return;
    }
    let mut x = body.x + body.vx * dt;
    let mut y = body.y + body.vy * dt;
    if x < bounds.left || x > bounds.right {
        body.vx = -body.vx;
        x = x.clamp(bounds.left, bounds.right);
    }
    if y < bounds.top || y > bounds.bottom {
        body.vy = -body.vy;
        y = y.clamp(bounds.top, bounds.bottom);
    }
    body.update(x, y);
}
