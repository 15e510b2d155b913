use rand::Rng;

use crate::body::BodyRef;

/// Axis-aligned box described by its four edges.
///
/// Containment is half-open: a point is inside when `left <= x < right` and
/// `top <= y < bottom`. Boxes are plain values; callers that pool them rewrite
/// them in place through [`BoundaryBox::update`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundaryBox {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl BoundaryBox {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Zero-area box at the origin.
    pub fn empty() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Tight box around the positions of `bodies`, or [`BoundaryBox::empty`]
    /// when there are none.
    pub fn from_bodies<'a, B, I>(bodies: I) -> Self
    where
        B: BodyRef + 'a,
        I: IntoIterator<Item = &'a B>,
    {
        let mut bb = Self::empty();
        bb.update_from_bodies(bodies);
        bb
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn update(&mut self, left: f32, right: f32, top: f32, bottom: f32) {
        self.left = left;
        self.right = right;
        self.top = top;
        self.bottom = bottom;
    }

    /// Rewrites this box as the tight box around `bodies`.
    pub fn update_from_bodies<'a, B, I>(&mut self, bodies: I)
    where
        B: BodyRef + 'a,
        I: IntoIterator<Item = &'a B>,
    {
        let mut iter = bodies.into_iter();
        let Some(first) = iter.next() else {
            *self = Self::empty();
            return;
        };
        let (x, y) = first.position();
        let (mut left, mut right, mut top, mut bottom) = (x, x, y, y);
        for body in iter {
            let (x, y) = body.position();
            left = f32::min(left, x);
            right = f32::max(right, x);
            top = f32::min(top, y);
            bottom = f32::max(bottom, y);
        }
        self.update(left, right, top, bottom);
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Closed-interval variant of [`BoundaryBox::contains_point`]. Tight boxes
    /// around a single body have zero area and only match this way.
    pub fn contains_point_inclusive(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn intersects(&self, other: &BoundaryBox) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    /// Squared distance from a point to the closest point of the box.
    pub fn distance_to_point(&self, x: f32, y: f32) -> f32 {
        let dx = f32::max(f32::max(self.left - x, x - self.right), 0.0);
        let dy = f32::max(f32::max(self.top - y, y - self.bottom), 0.0);
        dx * dx + dy * dy
    }

    /// True when both width and height are below `epsilon`.
    pub fn is_degenerate(&self, epsilon: f32) -> bool {
        self.width() < epsilon && self.height() < epsilon
    }

    pub fn get_random_point_inside<R: Rng>(&self, margin: f32, rng: &mut R) -> (f32, f32) {
        (
            Self::_safe_randf32(rng, self.left + margin, self.right - margin),
            Self::_safe_randf32(rng, self.top + margin, self.bottom - margin),
        )
    }

    fn _safe_randf32<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        rng.gen_range(min..max)
    }
}

impl Default for BoundaryBox {
    fn default() -> Self {
        Self::empty()
    }
}
