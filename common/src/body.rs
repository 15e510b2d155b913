/// Read-only view of a simulated body, as the spatial index sees it.
pub trait BodyRef {
    fn position(&self) -> (f32, f32);

    /// Static bodies never move and are never redistributed below the root.
    fn is_static(&self) -> bool;

    /// Inactive bodies are asleep for the current step.
    fn is_active(&self) -> bool;
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub is_static: bool,
    pub active: bool,
}

impl Body {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            is_static: false,
            active: true,
        }
    }

    pub fn new_static(x: f32, y: f32) -> Self {
        Self {
            is_static: true,
            ..Self::new(x, y)
        }
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn update(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl BodyRef for Body {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn is_static(&self) -> bool {
        self.is_static
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl<T: BodyRef + ?Sized> BodyRef for &T {
    fn position(&self) -> (f32, f32) {
        (**self).position()
    }

    fn is_static(&self) -> bool {
        (**self).is_static()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
