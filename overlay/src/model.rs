use serde::{Deserialize, Serialize};
use std::ops::{Add, BitOr, BitOrAssign, Mul, Neg, Sub};

/// A point or direction in the plane. Y grows downward (SVG convention).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Vec2 {
        Vec2 { x, y }
    }

    #[inline]
    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        Vec2 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn cross(self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn approx_eq(self, other: Vec2, eps: f64) -> bool {
        (self.x - other.x).abs() < eps && (self.y - other.y).abs() < eps
    }

    /// Rotate by `angle` radians (positive = toward +y, i.e. clockwise on screen).
    #[inline]
    pub fn rotate(self, angle: f64) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2 {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// SVG elliptic-arc parametrization. `rotation` is the x-axis rotation in
/// degrees; everything downstream works in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    pub start: Vec2,
    pub rx: f64,
    pub ry: f64,
    pub rotation: f64,
    pub large_arc: bool,
    pub sweep: bool,
    pub end: Vec2,
}

/// One piece of a path. The start point is always carried explicitly so
/// segments can be reversed and chained without outside context.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    Line(Vec2, Vec2),
    Quadratic(Vec2, Vec2, Vec2),
    Cubic(Vec2, Vec2, Vec2, Vec2),
    Arc(ArcSegment),
}

/// A path is a flat run of segments. Sub-path boundaries are implicit:
/// consecutive segments whose joint points differ form a gap, and the
/// command adapters re-insert moves there.
pub type Path = Vec<Segment>;

/// Fill rule mapping a winding count to inside/outside.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum FillRule {
    /// Non-zero winding rule (standard for most vector graphics)
    #[default]
    NonZero = 0,
    /// Even-odd rule (alternating fills)
    EvenOdd = 1,
}

impl FillRule {
    /// One flag bit from a winding count.
    #[inline]
    pub fn flag(self, count: i32) -> u8 {
        match self {
            FillRule::NonZero => (count != 0) as u8,
            FillRule::EvenOdd => (count % 2).unsigned_abs() as u8,
        }
    }
}

/// Boolean operation selecting faces of the combined arrangement.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BoolOp {
    /// A ∪ B - areas in A or B or both
    Union,
    /// A ∖ B - areas in A but not in B
    Difference,
    /// A ∩ B - areas in both A and B
    Intersection,
    /// A △ B - areas in exactly one of A and B
    Exclusion,
    /// Every face of the arrangement that lies inside A, emitted separately
    Division,
    /// Every face of A ∪ B, emitted separately
    Fracture,
}

/// Which input path(s) an edge of the arrangement derives from.
/// Bit 0 = path A, bit 1 = path B; edges shared by both carry both bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Parents(pub u8);

impl Parents {
    pub const A: Parents = Parents(1);
    pub const B: Parents = Parents(2);

    #[inline]
    pub fn contains(self, other: Parents) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Parents {
    type Output = Parents;
    #[inline]
    fn bitor(self, rhs: Parents) -> Parents {
        Parents(self.0 | rhs.0)
    }
}

impl BitOrAssign for Parents {
    #[inline]
    fn bitor_assign(&mut self, rhs: Parents) {
        self.0 |= rhs.0;
    }
}
