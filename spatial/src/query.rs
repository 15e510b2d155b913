//! Walkers over a built tree.
//!
//! Static bodies are only ever held by the root, and every other body is
//! owned by exactly one terminal leaf. The walkers rely on that to report
//! each body or pair once without a dedupe table.

use crate::tree::Tree;

use common::{BodyRef, BoundaryBox};
use smallvec::{smallvec, SmallVec};

const QUERY_STACK_INLINE: usize = 64;
const STATICS_INLINE: usize = 16;

type LeafStack = SmallVec<[u32; QUERY_STACK_INLINE]>;

impl<'a, B: BodyRef> Tree<'a, B> {
    /// Collects the indices of bodies positioned inside `area`.
    pub fn query_rect(&self, area: &BoundaryBox, out: &mut Vec<u32>) {
        self.for_each_owned(
            |boundary| boundary.intersects(area),
            |index, body| {
                let (x, y) = body.position();
                if area.contains_point(x, y) {
                    out.push(index);
                }
            },
        );
    }

    /// Collects the indices of bodies within `radius` of `(x, y)`.
    pub fn query_point(&self, x: f32, y: f32, radius: f32, out: &mut Vec<u32>) {
        let radius_sq = radius * radius;
        self.for_each_owned(
            |boundary| boundary.distance_to_point(x, y) <= radius_sq,
            |index, body| {
                let (bx, by) = body.position();
                let (dx, dy) = (bx - x, by - y);
                if dx * dx + dy * dy <= radius_sq {
                    out.push(index);
                }
            },
        );
    }

    /// Calls `f` once per broad-phase candidate pair, lower index first.
    ///
    /// Pairs are bodies sharing a terminal leaf with at least one of them
    /// active, plus static bodies paired with the active bodies of every
    /// terminal leaf whose boundary contains them. Subtrees without active
    /// bodies are skipped.
    pub fn for_each_candidate_pair<F>(&self, mut f: F)
    where
        F: FnMut(u32, u32),
    {
        let bodies = self.bodies;
        let statics: SmallVec<[u32; STATICS_INLINE]> = self
            .root()
            .item_indices()
            .iter()
            .copied()
            .filter(|&index| bodies[index as usize].is_static())
            .collect();
        let mut stack: LeafStack = smallvec![0];

        while let Some(id) = stack.pop() {
            let leaf = self.leaf_ref(id);
            if !leaf.contains_active() {
                continue;
            }
            if !leaf.is_terminal() {
                stack.extend(leaf.children().map(|child| child.id()));
                continue;
            }

            let indices = leaf.item_indices();
            for (i, &a) in indices.iter().enumerate() {
                let body_a = &bodies[a as usize];
                if body_a.is_static() {
                    continue;
                }
                for &b in &indices[i + 1..] {
                    let body_b = &bodies[b as usize];
                    if body_b.is_static() || !(body_a.is_active() || body_b.is_active()) {
                        continue;
                    }
                    f(a.min(b), a.max(b));
                }
            }

            let boundary = leaf.boundary();
            for &s in &statics {
                let (sx, sy) = bodies[s as usize].position();
                if !boundary.contains_point_inclusive(sx, sy) {
                    continue;
                }
                for &b in indices {
                    let body_b = &bodies[b as usize];
                    if !body_b.is_static() && body_b.is_active() {
                        f(s.min(b), s.max(b));
                    }
                }
            }
        }
    }

    pub fn candidate_pairs(&self, out: &mut Vec<(u32, u32)>) {
        self.for_each_candidate_pair(|a, b| out.push((a, b)));
    }

    // Visits every body once, from the leaf that owns it, descending only
    // into leaves whose boundary passes `visit_leaf`.
    fn for_each_owned<P, F>(&self, mut visit_leaf: P, mut f: F)
    where
        P: FnMut(&BoundaryBox) -> bool,
        F: FnMut(u32, &B),
    {
        let bodies = self.bodies;
        let mut stack: LeafStack = smallvec![0];

        while let Some(id) = stack.pop() {
            let leaf = self.leaf_ref(id);
            if !visit_leaf(leaf.boundary()) {
                continue;
            }
            let terminal = leaf.is_terminal();
            for &index in leaf.item_indices() {
                let body = &bodies[index as usize];
                if terminal || body.is_static() {
                    f(index, body);
                }
            }
            stack.extend(leaf.children().map(|child| child.id()));
        }
    }
}
