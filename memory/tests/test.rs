use memory::{Arena, ArenaConfig, ArenaError, Pool, PoolTag};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn arena(block_size: usize) -> Arena<(f32, f32)> {
    Arena::with_config(
        || (0.0, 0.0),
        ArenaConfig {
            block_size,
            preallocate: false,
        },
    )
}

#[test]
fn test_restore_without_checkpoints_fails() {
    let mut arena = arena(8);
    arena.get();
    let checkpoint = arena.save();
    arena.restore(checkpoint).unwrap();

    assert_eq!(arena.restore(checkpoint), Err(ArenaError::NoCheckpoints));
    assert_eq!(arena.used(), 1);
}

#[test]
fn test_restore_out_of_range_fails() {
    let mut arena = arena(8);
    let first = arena.save();
    let second = arena.save();
    arena.restore(second).unwrap();
    arena.get();

    assert_eq!(
        arena.restore(second),
        Err(ArenaError::CheckpointOutOfRange {
            handle: 1,
            saved: 1
        })
    );
    // Nothing changed: the remaining checkpoint still rewinds normally.
    assert_eq!(arena.used(), 1);
    arena.restore(first).unwrap();
    assert_eq!(arena.used(), 0);
}

#[test]
fn test_nested_collapse() {
    let mut arena = arena(4);
    for _ in 0..3 {
        arena.get();
    }
    let h1 = arena.save();
    for _ in 0..5 {
        arena.get();
    }
    let h2 = arena.save();
    for _ in 0..6 {
        arena.get();
    }

    arena.restore(h1).unwrap();
    assert_eq!(arena.used(), 14);
    assert_eq!(arena.saved_count(), 2);

    arena.restore(h2).unwrap();
    assert_eq!(arena.used(), 3);
    assert_eq!(arena.saved_count(), 0);
}

#[test]
fn test_collapse_stops_at_live_checkpoint() {
    let mut arena = arena(4);
    let h0 = arena.save();
    arena.get();
    let h1 = arena.save();
    arena.get();
    let h2 = arena.save();
    arena.get();

    arena.restore(h1).unwrap();
    arena.restore(h2).unwrap();
    // h1 collapsed together with h2, h0 is still live.
    assert_eq!(arena.used(), 1);
    assert_eq!(arena.saved_count(), 1);
    arena.restore(h0).unwrap();
    assert_eq!(arena.used(), 0);
}

#[test]
fn test_reuse_is_dirty() {
    let mut arena = arena(4);
    let checkpoint = arena.save();
    let slot = arena.get();
    arena[slot] = (3.0, 4.0);
    arena.restore(checkpoint).unwrap();

    let reused = arena.get();
    assert_eq!(reused, slot);
    assert_eq!(arena[reused], (3.0, 4.0));
}

#[test]
fn test_steady_state_does_not_grow() {
    let mut arena = arena(16);
    for _ in 0..10 {
        let checkpoint = arena.save();
        for _ in 0..40 {
            arena.get();
        }
        arena.restore(checkpoint).unwrap();
    }
    assert_eq!(arena.capacity(), 48);
    assert_eq!(arena.used(), 0);
}

#[test]
fn test_pool_random_operations() {
    let mut rng: StdRng = SeedableRng::seed_from_u64(7);
    let mut pool = Pool::new(|| [0u8; 16]);
    let mut held: Vec<PoolTag> = Vec::new();

    for _ in 0..2000 {
        match rng.gen_range(0..3) {
            0 => held.push(pool.get()),
            1 if !held.is_empty() => {
                let tag = held.swap_remove(rng.gen_range(0..held.len()));
                assert!(pool.free(tag));
            }
            2 if !held.is_empty() => {
                let tag = held.swap_remove(rng.gen_range(0..held.len()));
                assert!(pool.detach(tag).is_some());
            }
            _ => {}
        }
        assert_eq!(pool.used_count(), held.len());
        assert_eq!(
            pool.used_count() + pool.free_count() + pool.detached_count(),
            pool.spawned_count()
        );
    }

    let distinct: HashSet<u32> = held.iter().map(|tag| tag.serial()).collect();
    assert_eq!(distinct.len(), held.len());
}

proptest! {
    #[test]
    fn arena_save_get_restore_rewinds(
        block_size in 1usize..64,
        before in 0usize..200,
        n in 0usize..500,
    ) {
        let mut arena = arena(block_size);
        for _ in 0..before {
            arena.get();
        }
        let checkpoint = arena.save();
        for _ in 0..n {
            arena.get();
        }
        arena.restore(checkpoint).unwrap();
        prop_assert_eq!(arena.used(), before);
        prop_assert_eq!(arena.saved_count(), 0);
        prop_assert!(arena.capacity() >= before + n);
    }

    #[test]
    fn arena_out_of_order_restores_end_at_first_cursor(
        sizes in proptest::collection::vec(0usize..20, 1..8),
        order in proptest::collection::vec(any::<u32>(), 8),
    ) {
        let mut arena = arena(8);
        arena.get();
        let mut checkpoints = Vec::new();
        for size in &sizes {
            checkpoints.push(arena.save());
            for _ in 0..*size {
                arena.get();
            }
        }
        // Restore in a shuffled order; memory only comes back once the top
        // checkpoint goes, and must never drop below the first cursor.
        let mut remaining: Vec<_> = checkpoints.clone();
        let mut i = 0;
        while !remaining.is_empty() {
            let pick = order[i % order.len()] as usize % remaining.len();
            let checkpoint = remaining.remove(pick);
            arena.restore(checkpoint).unwrap();
            prop_assert!(arena.used() >= 1);
            i += 1;
        }
        prop_assert_eq!(arena.used(), 1);
        prop_assert_eq!(arena.saved_count(), 0);
    }

    #[test]
    fn pool_counts_are_conserved(ops in proptest::collection::vec(0u8..4, 0..300)) {
        let mut pool = Pool::new(|| 0u32);
        let mut tags: Vec<PoolTag> = Vec::new();
        for (i, op) in ops.iter().enumerate() {
            match op {
                0 | 1 => tags.push(pool.get()),
                2 if !tags.is_empty() => {
                    let tag = tags[i % tags.len()];
                    pool.free(tag);
                }
                3 if !tags.is_empty() => {
                    let tag = tags.swap_remove(i % tags.len());
                    pool.detach(tag);
                }
                _ => {}
            }
            prop_assert_eq!(
                pool.used_count() + pool.free_count(),
                pool.spawned_count() - pool.detached_count()
            );
        }
    }
}
