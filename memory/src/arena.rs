//! Checkpointed bump allocator over pre-constructed slots.
//!
//! Slots are built by a factory the first time the high-water mark reaches
//! them and are never dropped until the arena is. `get` hands them out in
//! cursor order; `save`/`restore` rewind the cursor, reclaiming everything
//! allocated since the checkpoint in O(1). Reused slots keep their old
//! contents, so callers overwrite a slot fully before reading it.

use crate::config::ArenaConfig;
use crate::error::{ArenaError, ArenaResult};

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Typed index of an arena slot.
pub struct Slot<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Slot<T> {
    fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T> PartialEq for Slot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Slot<T> {}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.index)
    }
}

/// Opaque handle returned by [`Arena::save`]: the checkpoint's stack depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    depth: usize,
}

impl Checkpoint {
    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[derive(Debug, Clone, Copy)]
struct SavedCursor {
    cursor: usize,
    vacated: bool,
}

pub struct Arena<T> {
    blocks: Vec<Box<[T]>>,
    block_size: usize,
    used: usize,
    checkpoints: Vec<SavedCursor>,
    spawn: Box<dyn FnMut() -> T>,
}

impl<T> Arena<T> {
    pub fn new<F>(spawn: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        Self::with_config(spawn, ArenaConfig::default())
    }

    pub fn with_config<F>(spawn: F, config: ArenaConfig) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        let mut arena = Arena {
            blocks: Vec::new(),
            block_size: config.block_size.max(1),
            used: 0,
            checkpoints: Vec::new(),
            spawn: Box::new(spawn),
        };
        if config.preallocate {
            arena.grow();
        }
        arena
    }

    /// Hands out the slot under the cursor, constructing a new block first if
    /// every existing slot is in use.
    pub fn get(&mut self) -> Slot<T> {
        if self.used == self.capacity() {
            self.grow();
        }
        let slot = Slot::new(self.used);
        self.used += 1;
        slot
    }

    pub fn save(&mut self) -> Checkpoint {
        self.checkpoints.push(SavedCursor {
            cursor: self.used,
            vacated: false,
        });
        Checkpoint {
            depth: self.checkpoints.len() - 1,
        }
    }

    /// Releases every slot allocated since `checkpoint` was taken.
    ///
    /// Restoring the top checkpoint rewinds the cursor immediately, then also
    /// pops any vacated checkpoints directly beneath it. Restoring a lower
    /// checkpoint only marks it vacated: slots above it are still live, so its
    /// memory comes back once everything above has been restored.
    pub fn restore(&mut self, checkpoint: Checkpoint) -> ArenaResult<()> {
        let saved = self.checkpoints.len();
        if saved == 0 {
            return Err(ArenaError::NoCheckpoints);
        }
        let handle = checkpoint.depth;
        if handle >= saved {
            return Err(ArenaError::CheckpointOutOfRange { handle, saved });
        }
        if self.checkpoints[handle].vacated {
            return Err(ArenaError::CheckpointVacated { handle });
        }

        if handle + 1 < saved {
            self.checkpoints[handle].vacated = true;
            tracing::trace!(handle, saved, "arena checkpoint vacated below top");
            return Ok(());
        }

        let mut cursor = self.checkpoints[handle].cursor;
        self.checkpoints.pop();
        while let Some(below) = self.checkpoints.last() {
            if !below.vacated {
                break;
            }
            cursor = below.cursor;
            self.checkpoints.pop();
        }
        debug_assert!(cursor <= self.used);
        self.used = cursor;
        Ok(())
    }

    /// Restores the most recent checkpoint.
    pub fn restore_last(&mut self) -> ArenaResult<()> {
        match self.checkpoints.len() {
            0 => Err(ArenaError::NoCheckpoints),
            saved => self.restore(Checkpoint { depth: saved - 1 }),
        }
    }

    /// Drops every checkpoint and rewinds to the first slot. Constructed
    /// blocks are kept.
    pub fn clear(&mut self) {
        self.checkpoints.clear();
        self.used = 0;
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn saved_count(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn capacity(&self) -> usize {
        self.blocks.len() * self.block_size
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn slot(&self, slot: Slot<T>) -> &T {
        &self.blocks[slot.index / self.block_size][slot.index % self.block_size]
    }

    pub fn slot_mut(&mut self, slot: Slot<T>) -> &mut T {
        &mut self.blocks[slot.index / self.block_size][slot.index % self.block_size]
    }

    fn grow(&mut self) {
        let spawn = &mut self.spawn;
        let block: Box<[T]> = (0..self.block_size).map(|_| spawn()).collect();
        self.blocks.push(block);
        tracing::debug!(
            blocks = self.blocks.len(),
            capacity = self.capacity(),
            "arena grew"
        );
    }
}

impl<T> Index<Slot<T>> for Arena<T> {
    type Output = T;

    fn index(&self, slot: Slot<T>) -> &T {
        self.slot(slot)
    }
}

impl<T> IndexMut<Slot<T>> for Arena<T> {
    fn index_mut(&mut self, slot: Slot<T>) -> &mut T {
        self.slot_mut(slot)
    }
}

impl<T> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("used", &self.used)
            .field("capacity", &self.capacity())
            .field("block_size", &self.block_size)
            .field("saved_count", &self.checkpoints.len())
            .finish()
    }
}
