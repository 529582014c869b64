//! Closed-form self-intersection of a cubic Bézier.

use crate::geometry::tolerance::EPS_SELF_INTERSECTION;
use crate::model::{Segment, Vec2};

/// Parameters `(t1, t2)` where a cubic crosses itself, or `None` when the
/// curve has no loop. Both parameters lie strictly inside (0, 1).
///
/// With polynomial coefficients `B(t) = a t^3 + b t^2 + c t + p0`, equal
/// positions at `t1 != t2` reduce (after dividing by `t1 - t2`) to
/// `a (s^2 - p) + b s + c = 0` in the symmetric functions `s = t1 + t2`,
/// `p = t1 t2`, a 2x2 linear system solved by Cramer's rule.
pub fn cubic_self_intersection(seg: &Segment) -> Option<[f64; 2]> {
    let (p0, c1, c2, p1) = match *seg {
        Segment::Cubic(p0, c1, c2, p1) => (p0, c1, c2, p1),
        _ => return None,
    };

    let a = p1 - c2 * 3.0 + c1 * 3.0 - p0;
    let b = (c2 - c1 * 2.0 + p0) * 3.0;
    let c = (c1 - p0) * 3.0;

    let det = a.cross(b);
    if det.abs() < EPS_SELF_INTERSECTION {
        return None;
    }

    let s = c.cross(a) / det; // t1 + t2
    let u = b.cross(c) / det; // s^2 - t1 t2

    let k = 4.0 * u - 3.0 * s * s;
    if k < 0.0 {
        return None;
    }
    let k = k.sqrt();

    let t1 = (s - k) / 2.0;
    let t2 = (s + k) / 2.0;

    let eps = EPS_SELF_INTERSECTION;
    if t1 <= eps || t1 >= 1.0 - eps || t2 <= eps || t2 >= 1.0 - eps {
        return None;
    }

    Some([t1, t2])
}
