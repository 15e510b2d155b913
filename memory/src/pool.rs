use fxhash::FxHashMap;

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(0);

/// Identity stamped on a pooled object when it is first spawned.
///
/// A tag names one object for the lifetime of the pool that created it and is
/// never handed to a different object, even after the original is detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolTag {
    pool: u32,
    serial: u32,
}

impl PoolTag {
    pub fn serial(&self) -> u32 {
        self.serial
    }
}

struct Entry<T> {
    value: T,
    position: usize,
}

/// Free-list recycler for long-lived objects released one at a time.
///
/// Clients take tags with `get` and give them back with `free`. Objects are
/// never dropped by `free`; the next `get` may return the same object with
/// its old contents.
pub struct Pool<T> {
    id: u32,
    // Serials in `order[..marker]` are in use, the rest are free.
    order: Vec<u32>,
    entries: FxHashMap<u32, Entry<T>>,
    marker: usize,
    next_serial: u32,
    detached: usize,
    spawn: Box<dyn FnMut() -> T>,
}

impl<T> Pool<T> {
    pub fn new<F>(spawn: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        Pool {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            order: Vec::new(),
            entries: FxHashMap::default(),
            marker: 0,
            next_serial: 0,
            detached: 0,
            spawn: Box::new(spawn),
        }
    }

    /// Takes a free object, or spawns and tags a new one if none is free.
    /// Which free object comes back is unspecified.
    pub fn get(&mut self) -> PoolTag {
        if self.marker < self.order.len() {
            let serial = self.order[self.marker];
            self.marker += 1;
            return self.tag(serial);
        }

        let serial = self.next_serial;
        self.next_serial += 1;
        let value = (self.spawn)();
        self.entries.insert(
            serial,
            Entry {
                value,
                position: self.order.len(),
            },
        );
        self.order.push(serial);
        self.marker += 1;
        self.tag(serial)
    }

    /// Moves an in-use object to the free partition. Returns `false`, leaving
    /// the pool untouched, if the tag is foreign, unknown or already free.
    pub fn free(&mut self, tag: PoolTag) -> bool {
        let Some(position) = self.tracked_position(tag, "free") else {
            return false;
        };
        if position >= self.marker {
            tracing::warn!(pool = self.id, serial = tag.serial, "double free of pooled object");
            return false;
        }

        // Swap with the last in-use object and shrink the in-use partition.
        self.marker -= 1;
        self.swap_positions(position, self.marker);
        true
    }

    /// Removes an object from the pool for good and hands it back.
    pub fn detach(&mut self, tag: PoolTag) -> Option<T> {
        let mut position = self.tracked_position(tag, "detach")?;
        if position < self.marker {
            self.marker -= 1;
            self.swap_positions(position, self.marker);
            position = self.marker;
        }
        let last = self.order.len() - 1;
        self.swap_positions(position, last);
        self.order.pop();
        self.detached += 1;
        self.entries.remove(&tag.serial).map(|entry| entry.value)
    }

    /// The object behind an in-use tag.
    pub fn entry(&self, tag: PoolTag) -> Option<&T> {
        if !self.is_in_use(tag) {
            return None;
        }
        self.entries.get(&tag.serial).map(|entry| &entry.value)
    }

    pub fn entry_mut(&mut self, tag: PoolTag) -> Option<&mut T> {
        if !self.is_in_use(tag) {
            return None;
        }
        self.entries.get_mut(&tag.serial).map(|entry| &mut entry.value)
    }

    /// True if the tag belongs to this pool and has not been detached.
    pub fn contains(&self, tag: PoolTag) -> bool {
        tag.pool == self.id && self.entries.contains_key(&tag.serial)
    }

    pub fn is_in_use(&self, tag: PoolTag) -> bool {
        tag.pool == self.id
            && self
                .entries
                .get(&tag.serial)
                .map_or(false, |entry| entry.position < self.marker)
    }

    /// In-use objects, in no particular order.
    pub fn in_use(&self) -> impl Iterator<Item = (PoolTag, &T)> + '_ {
        self.order[..self.marker].iter().filter_map(move |&serial| {
            self.entries
                .get(&serial)
                .map(|entry| (self.tag(serial), &entry.value))
        })
    }

    pub fn for_each_in_use_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(PoolTag, &mut T),
    {
        for &serial in &self.order[..self.marker] {
            if let Some(entry) = self.entries.get_mut(&serial) {
                f(
                    PoolTag {
                        pool: self.id,
                        serial,
                    },
                    &mut entry.value,
                );
            }
        }
    }

    pub fn used_count(&self) -> usize {
        self.marker
    }

    pub fn free_count(&self) -> usize {
        self.order.len() - self.marker
    }

    pub fn spawned_count(&self) -> usize {
        self.next_serial as usize
    }

    pub fn detached_count(&self) -> usize {
        self.detached
    }

    fn tag(&self, serial: u32) -> PoolTag {
        PoolTag {
            pool: self.id,
            serial,
        }
    }

    fn tracked_position(&self, tag: PoolTag, op: &'static str) -> Option<usize> {
        if tag.pool != self.id {
            tracing::warn!(
                pool = self.id,
                tag_pool = tag.pool,
                serial = tag.serial,
                op,
                "pooled object belongs to a different pool"
            );
            return None;
        }
        match self.entries.get(&tag.serial) {
            Some(entry) => Some(entry.position),
            None => {
                tracing::warn!(pool = self.id, serial = tag.serial, op, "untracked pooled object");
                None
            }
        }
    }

    fn swap_positions(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.order.swap(a, b);
        if let Some(entry) = self.entries.get_mut(&self.order[a]) {
            entry.position = a;
        }
        if let Some(entry) = self.entries.get_mut(&self.order[b]) {
            entry.position = b;
        }
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("id", &self.id)
            .field("used_count", &self.used_count())
            .field("free_count", &self.free_count())
            .field("detached_count", &self.detached)
            .finish()
    }
}
