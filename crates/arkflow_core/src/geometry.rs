//! Geometry value types shared by every interaction pattern.

use std::ops::{Add, AddAssign, Neg, Sub};

/// Tolerance used when comparing scroll deltas and positions.
pub const EPSILON: f32 = 0.001;

/// Returns true when `value` is within [`EPSILON`] of zero.
#[inline]
pub fn near_zero(value: f32) -> bool {
    value.abs() < EPSILON
}

/// Returns true when `a` and `b` differ by less than [`EPSILON`].
#[inline]
pub fn near_equal(a: f32, b: f32) -> bool {
    near_zero(a - b)
}

/// `a > b` by more than [`EPSILON`].
#[inline]
pub fn great_not_equal(a: f32, b: f32) -> bool {
    a - b > EPSILON
}

/// `a < b` by more than [`EPSILON`].
#[inline]
pub fn less_not_equal(a: f32, b: f32) -> bool {
    b - a > EPSILON
}

/// Scroll axis of a scrollable region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// Not scrollable
    None,
    Horizontal,
    /// Default for every scrollable
    #[default]
    Vertical,
}

impl Axis {
    /// Component of `offset` along this axis (zero for [`Axis::None`])
    pub fn main(&self, offset: Offset) -> f32 {
        match self {
            Axis::None => 0.0,
            Axis::Horizontal => offset.x,
            Axis::Vertical => offset.y,
        }
    }

    /// Offset lying `main` along this axis
    pub fn offset(&self, main: f32) -> Offset {
        match self {
            Axis::None => Offset::ZERO,
            Axis::Horizontal => Offset::new(main, 0.0),
            Axis::Vertical => Offset::new(0.0, main),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Axis::None)
    }
}

/// A 2D offset (or point) in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Offset {
    fn add_assign(&mut self, rhs: Offset) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Offset {
    type Output = Offset;

    fn sub(self, rhs: Offset) -> Offset {
        Offset::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Offset {
        Offset::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `size` centered on `center`
    pub fn from_center(center: Offset, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, size, size)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Offset {
        Offset::new(self.x, self.y)
    }

    pub fn center(&self) -> Offset {
        Offset::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Edges are inclusive so a touch exactly on the border still hits.
    pub fn contains(&self, point: Offset) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    pub fn translate(&self, offset: Offset) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl AddAssign<Offset> for Rect {
    fn add_assign(&mut self, rhs: Offset) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}
