use crate::config::TreeConfig;
use crate::leaf::{Leaf, LeafRef};

use common::{BodyRef, BoundaryBox};
use memory::{Arena, ArenaConfig, Checkpoint};

/// Size below which a segment stops subdividing, and the minimum amount the
/// last cell of the root is pushed past its far edge.
pub const EPSILON: f32 = 1e-5;

/// True once `segment` cannot be subdivided any further: both sides are
/// below [`EPSILON`], or no cell edge lands strictly inside either side at
/// f32 precision.
pub fn segment_is_degenerate(segment: &BoundaryBox, divider: usize) -> bool {
    segment.is_degenerate(EPSILON)
        || !(splits(segment.left, segment.right, divider)
            || splits(segment.top, segment.bottom, divider))
}

/// Memory a [`Tree`] is built into.
///
/// Every box of a build comes from the arena and goes back in one restore
/// when the tree is dropped. Leaves and item lists live in buffers that are
/// cleared rather than freed, so rebuilding at a steady body count does not
/// allocate.
pub struct TreeStorage {
    pub(crate) boxes: Arena<BoundaryBox>,
    pub(crate) leaves: Vec<Leaf>,
    pub(crate) items: Vec<u32>,
    stack: Vec<u32>,
}

impl TreeStorage {
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    pub fn with_config(config: ArenaConfig) -> Self {
        TreeStorage {
            boxes: Arena::with_config(BoundaryBox::empty, config),
            leaves: Vec::new(),
            items: Vec::new(),
            stack: Vec::new(),
        }
    }

    pub fn boxes(&self) -> &Arena<BoundaryBox> {
        &self.boxes
    }
}

impl Default for TreeStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Adaptive partition of one tick's bodies.
///
/// A tree borrows its storage for as long as it lives; dropping it (or
/// calling [`Tree::free`]) hands every box back to the arena.
pub struct Tree<'a, B: BodyRef> {
    pub(crate) storage: &'a mut TreeStorage,
    pub(crate) bodies: &'a [B],
    config: TreeConfig,
    checkpoint: Checkpoint,
}

impl<'a, B: BodyRef> Tree<'a, B> {
    pub fn build(storage: &'a mut TreeStorage, bodies: &'a [B], config: &TreeConfig) -> Self {
        debug_assert!(bodies.len() <= u32::MAX as usize);
        let checkpoint = storage.boxes.save();
        storage.leaves.clear();
        storage.items.clear();
        storage.stack.clear();

        let mut tree = Tree {
            storage,
            bodies,
            config: config.clone(),
            checkpoint,
        };
        tree.build_root();
        tree.expand();
        tracing::trace!(
            bodies = bodies.len(),
            leaves = tree.storage.leaves.len(),
            boxes = tree.storage.boxes.used(),
            "spatial tree built"
        );
        tree
    }

    /// Releases the tree's boxes. Same as dropping it.
    pub fn free(self) {
        drop(self);
    }

    pub fn root(&self) -> LeafRef<'_, B> {
        self.leaf_ref(0)
    }

    pub fn leaf(&self, id: u32) -> Option<LeafRef<'_, B>> {
        if (id as usize) < self.storage.leaves.len() {
            Some(self.leaf_ref(id))
        } else {
            None
        }
    }

    /// All leaves in creation order.
    pub fn leaves(&self) -> impl Iterator<Item = LeafRef<'_, B>> + '_ {
        (0..self.storage.leaves.len() as u32).map(move |id| self.leaf_ref(id))
    }

    pub fn terminal_leaves(&self) -> impl Iterator<Item = LeafRef<'_, B>> + '_ {
        self.leaves().filter(|leaf| leaf.is_terminal())
    }

    pub fn leaf_count(&self) -> usize {
        self.storage.leaves.len()
    }

    pub fn depth(&self) -> u32 {
        self.storage
            .leaves
            .iter()
            .map(|leaf| leaf.depth)
            .max()
            .unwrap_or(0)
    }

    pub fn bodies(&self) -> &'a [B] {
        self.bodies
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The arena backing this tree, for temporary boxes within the same tick.
    /// Checkpoints taken here must be restored before the tree is dropped.
    pub fn scratch_boxes(&mut self) -> &mut Arena<BoundaryBox> {
        &mut self.storage.boxes
    }

    pub(crate) fn leaf_ref(&self, id: u32) -> LeafRef<'_, B> {
        LeafRef::new(&*self.storage, self.bodies, id)
    }

    fn build_root(&mut self) {
        let TreeStorage {
            boxes,
            leaves,
            items,
            stack,
        } = &mut *self.storage;

        // The root's segment is its own tight box, so both share one slot.
        let boundary = boxes.get();
        boxes[boundary].update_from_bodies(self.bodies.iter());
        items.extend(0..self.bodies.len() as u32);
        leaves.push(Leaf {
            boundary,
            segment_boundary: boundary,
            items_start: 0,
            items_len: self.bodies.len() as u32,
            children_start: 0,
            children_len: 0,
            depth: 0,
            contains_active: self.bodies.iter().any(|body| body.is_active()),
        });
        stack.push(0);
    }

    fn expand(&mut self) {
        let TreeStorage {
            boxes,
            leaves,
            items,
            stack,
        } = &mut *self.storage;
        let bodies = self.bodies;
        let divider = self.config.divider();
        let max_count = self.config.max_count();

        while let Some(leaf_id) = stack.pop() {
            let leaf = leaves[leaf_id as usize];
            let segment = boxes[leaf.segment_boundary];
            if leaf.items_len as usize <= max_count || segment_is_degenerate(&segment, divider) {
                continue;
            }
            // The root's segment is its closed tight box. Every other segment
            // is a half-open cell whose far edge already excludes its items.
            let closed = leaf_id == 0;

            let children_start = leaves.len() as u32;
            let parent_items = leaf.items_start as usize..(leaf.items_start + leaf.items_len) as usize;
            for row in 0..divider {
                let top = cell_edge(segment.top, segment.bottom, row, divider, closed);
                let bottom = cell_edge(segment.top, segment.bottom, row + 1, divider, closed);
                for col in 0..divider {
                    let cell = boxes.get();
                    boxes[cell].update(
                        cell_edge(segment.left, segment.right, col, divider, closed),
                        cell_edge(segment.left, segment.right, col + 1, divider, closed),
                        top,
                        bottom,
                    );
                    let cell_box = boxes[cell];

                    let items_start = items.len();
                    for k in parent_items.clone() {
                        let index = items[k];
                        let body = &bodies[index as usize];
                        let (x, y) = body.position();
                        if !body.is_static() && cell_box.contains_point(x, y) {
                            items.push(index);
                        }
                    }
                    let child_items = &items[items_start..];
                    if child_items.is_empty() {
                        continue;
                    }

                    let boundary = boxes.get();
                    boxes[boundary]
                        .update_from_bodies(child_items.iter().map(|&i| &bodies[i as usize]));
                    let contains_active = leaf.contains_active
                        && child_items.iter().any(|&i| bodies[i as usize].is_active());
                    leaves.push(Leaf {
                        boundary,
                        segment_boundary: cell,
                        items_start: items_start as u32,
                        items_len: child_items.len() as u32,
                        children_start: 0,
                        children_len: 0,
                        depth: leaf.depth + 1,
                        contains_active,
                    });
                }
            }

            let children_end = leaves.len() as u32;
            let parent = &mut leaves[leaf_id as usize];
            parent.children_start = children_start;
            parent.children_len = children_end - children_start;
            stack.extend((children_start..children_end).rev());
        }
    }
}

impl<'a, B: BodyRef> Drop for Tree<'a, B> {
    fn drop(&mut self) {
        if let Err(err) = self.storage.boxes.restore(self.checkpoint) {
            tracing::error!(%err, "failed to release spatial tree boxes");
        }
    }
}

/// Edge `i` of `divider` equal cells spanning `min..max`. For a `closed`
/// span the far edge is pushed outward so items sitting exactly on `max`
/// land in the last cell.
fn cell_edge(min: f32, max: f32, i: usize, divider: usize, closed: bool) -> f32 {
    if i == divider {
        if closed {
            max + f32::max(EPSILON, max.abs() * f32::EPSILON)
        } else {
            max
        }
    } else {
        min + (max - min) * i as f32 / divider as f32
    }
}

fn splits(min: f32, max: f32, divider: usize) -> bool {
    (1..divider).any(|i| {
        let edge = cell_edge(min, max, i, divider, false);
        edge > min && edge < max
    })
}
