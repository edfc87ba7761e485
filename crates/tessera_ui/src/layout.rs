//! Screen-space rectangles and anchoring helpers.

/// A rectangle in window pixels, origin at the top left.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Empty rect at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Full-window rect for a `width` x `height` client area.
    #[must_use]
    pub fn window(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Returns true if the point lies inside.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlapping area, if any.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Self::new(x, y, right - x, bottom - y))
    }

    /// A `width` x `height` rect centered inside this one.
    #[must_use]
    pub fn centered(&self, width: f32, height: f32) -> Self {
        let (cx, cy) = self.center();
        Self::new(cx - width * 0.5, cy - height * 0.5, width, height)
    }

    /// A rect of `height` pixels glued to the bottom edge, inset by `margin`.
    #[must_use]
    pub fn bottom_strip(&self, height: f32, margin: f32) -> Self {
        Self::new(
            self.x + margin,
            self.bottom() - height - margin,
            (self.width - margin * 2.0).max(0.0),
            height,
        )
    }

    /// Shrinks by `amount` on all sides.
    #[must_use]
    pub fn shrink(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            (self.width - amount * 2.0).max(0.0),
            (self.height - amount * 2.0).max(0.0),
        )
    }

    /// Multiplies every component by `scale`.
    #[must_use]
    pub fn scaled(&self, scale: f32) -> Self {
        Self::new(self.x * scale, self.y * scale, self.width * scale, self.height * scale)
    }
}
