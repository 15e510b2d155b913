use crate::tree::TreeStorage;

use common::{BodyRef, BoundaryBox};
use memory::Slot;

use std::fmt;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Leaf {
    pub(crate) boundary: Slot<BoundaryBox>,
    pub(crate) segment_boundary: Slot<BoundaryBox>,
    pub(crate) items_start: u32,
    pub(crate) items_len: u32,
    pub(crate) children_start: u32,
    pub(crate) children_len: u32,
    pub(crate) depth: u32,
    pub(crate) contains_active: bool,
}

/// Read-only view of one leaf of a built [`crate::Tree`].
pub struct LeafRef<'t, B> {
    storage: &'t TreeStorage,
    bodies: &'t [B],
    id: u32,
}

impl<'t, B: BodyRef> LeafRef<'t, B> {
    pub(crate) fn new(storage: &'t TreeStorage, bodies: &'t [B], id: u32) -> Self {
        LeafRef {
            storage,
            bodies,
            id,
        }
    }

    fn leaf(&self) -> &'t Leaf {
        &self.storage.leaves[self.id as usize]
    }

    /// Creation-order id, unique within one build. The root is 0.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Tight box around this leaf's items.
    pub fn boundary(&self) -> &'t BoundaryBox {
        &self.storage.boxes[self.leaf().boundary]
    }

    /// Grid cell this leaf was carved from.
    pub fn segment_boundary(&self) -> &'t BoundaryBox {
        &self.storage.boxes[self.leaf().segment_boundary]
    }

    /// Indices into the body slice the tree was built over.
    pub fn item_indices(&self) -> &'t [u32] {
        let leaf = self.leaf();
        let start = leaf.items_start as usize;
        &self.storage.items[start..start + leaf.items_len as usize]
    }

    pub fn items(&self) -> impl Iterator<Item = &'t B> + 't {
        let bodies = self.bodies;
        self.item_indices()
            .iter()
            .map(move |&index| &bodies[index as usize])
    }

    pub fn item_count(&self) -> usize {
        self.leaf().items_len as usize
    }

    pub fn children(&self) -> impl Iterator<Item = LeafRef<'t, B>> + 't {
        let leaf = self.leaf();
        let (storage, bodies) = (self.storage, self.bodies);
        (leaf.children_start..leaf.children_start + leaf.children_len)
            .map(move |id| LeafRef::new(storage, bodies, id))
    }

    pub fn child_count(&self) -> usize {
        self.leaf().children_len as usize
    }

    pub fn is_terminal(&self) -> bool {
        self.leaf().children_len == 0
    }

    /// False when nothing in this subtree is active, so the whole subtree
    /// can be skipped.
    pub fn contains_active(&self) -> bool {
        self.leaf().contains_active
    }

    pub fn depth(&self) -> u32 {
        self.leaf().depth
    }
}

impl<'t, B> Clone for LeafRef<'t, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'t, B> Copy for LeafRef<'t, B> {}

impl<'t, B: BodyRef> fmt::Debug for LeafRef<'t, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafRef")
            .field("id", &self.id)
            .field("depth", &self.depth())
            .field("boundary", self.boundary())
            .field("items", &self.item_count())
            .field("children", &self.child_count())
            .field("contains_active", &self.contains_active())
            .finish()
    }
}
