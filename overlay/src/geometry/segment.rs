//! Operations on path segments: evaluation, subdivision, bounding boxes
//! and the SVG endpoint-to-center arc conversion.

use crate::geometry::aabb::{merge_boxes, Aabb};
use crate::geometry::math::lerp;
use crate::geometry::math::vector_angle;
use crate::geometry::tolerance::EPS_POINT;
use crate::model::{ArcSegment, Segment, Vec2};
use std::f64::consts::{PI, TAU};

/// Center parametrization of an elliptic arc. `rotation` is in radians here;
/// only the wire format carries degrees.
#[derive(Clone, Copy, Debug)]
pub struct ArcCenter {
    pub center: Vec2,
    pub theta1: f64,
    pub delta_theta: f64,
    pub rx: f64,
    pub ry: f64,
    pub rotation: f64,
}

impl Segment {
    pub fn start(&self) -> Vec2 {
        match *self {
            Segment::Line(start, _) => start,
            Segment::Quadratic(start, _, _) => start,
            Segment::Cubic(start, _, _, _) => start,
            Segment::Arc(arc) => arc.start,
        }
    }

    pub fn end(&self) -> Vec2 {
        match *self {
            Segment::Line(_, end) => end,
            Segment::Quadratic(_, _, end) => end,
            Segment::Cubic(_, _, _, end) => end,
            Segment::Arc(arc) => arc.end,
        }
    }

    /// Same point set, opposite orientation. Arcs flip their sweep flag.
    pub fn reversed(&self) -> Segment {
        match *self {
            Segment::Line(start, end) => Segment::Line(end, start),
            Segment::Quadratic(p0, c, p1) => Segment::Quadratic(p1, c, p0),
            Segment::Cubic(p0, c1, c2, p1) => Segment::Cubic(p1, c2, c1, p0),
            Segment::Arc(arc) => Segment::Arc(ArcSegment {
                start: arc.end,
                sweep: !arc.sweep,
                end: arc.start,
                ..arc
            }),
        }
    }

    /// Evaluate at parameter `t` in [0, 1]. Béziers use de Casteljau; arcs go
    /// through the center parametrization, degrading to the chord when the
    /// radii vanish.
    pub fn sample(&self, t: f64) -> Vec2 {
        match *self {
            Segment::Line(start, end) => start.lerp(end, t),
            Segment::Quadratic(p0, c, p1) => {
                let p01 = p0.lerp(c, t);
                let p12 = c.lerp(p1, t);
                p01.lerp(p12, t)
            }
            Segment::Cubic(p0, c1, c2, p1) => {
                let p01 = p0.lerp(c1, t);
                let p12 = c1.lerp(c2, t);
                let p23 = c2.lerp(p1, t);
                let p012 = p01.lerp(p12, t);
                let p123 = p12.lerp(p23, t);
                p012.lerp(p123, t)
            }
            Segment::Arc(arc) => match arc_to_center(&arc) {
                Some(center) => {
                    let theta = center.theta1 + t * center.delta_theta;
                    let p = Vec2::new(center.rx * theta.cos(), center.ry * theta.sin());
                    center.center + p.rotate(center.rotation)
                }
                None => arc.start.lerp(arc.end, t),
            },
        }
    }

    /// Split into two segments meeting at parameter `t`.
    pub fn split(&self, t: f64) -> (Segment, Segment) {
        match *self {
            Segment::Line(start, end) => {
                let p = start.lerp(end, t);
                (Segment::Line(start, p), Segment::Line(p, end))
            }
            Segment::Quadratic(p0, c, p1) => {
                let p01 = p0.lerp(c, t);
                let p12 = c.lerp(p1, t);
                let p = p01.lerp(p12, t);
                (Segment::Quadratic(p0, p01, p), Segment::Quadratic(p, p12, p1))
            }
            Segment::Cubic(p0, c1, c2, p1) => {
                let p01 = p0.lerp(c1, t);
                let p12 = c1.lerp(c2, t);
                let p23 = c2.lerp(p1, t);
                let p012 = p01.lerp(p12, t);
                let p123 = p12.lerp(p23, t);
                let p = p012.lerp(p123, t);
                (Segment::Cubic(p0, p01, p012, p), Segment::Cubic(p, p123, p23, p1))
            }
            Segment::Arc(arc) => match arc_to_center(&arc) {
                Some(center) => {
                    let mid_delta = center.delta_theta * t;
                    let first = arc_from_center(
                        &ArcCenter {
                            delta_theta: mid_delta,
                            ..center
                        },
                        Some(arc.start),
                        None,
                    );
                    let second = arc_from_center(
                        &ArcCenter {
                            theta1: center.theta1 + mid_delta,
                            delta_theta: center.delta_theta - mid_delta,
                            ..center
                        },
                        None,
                        Some(arc.end),
                    );
                    (first, second)
                }
                None => {
                    // Zero-radius arcs behave as lines, per the SVG implementation notes.
                    let p = arc.start.lerp(arc.end, t);
                    (Segment::Line(arc.start, p), Segment::Line(p, arc.end))
                }
            },
        }
    }

    /// Tight bounding box. Béziers solve for interior axis extrema; rotated
    /// ellipses fall back to the box of a cubic approximation.
    pub fn bounding_box(&self) -> Aabb {
        match *self {
            Segment::Line(start, end) => Aabb {
                top: start.y.min(end.y),
                right: start.x.max(end.x),
                bottom: start.y.max(end.y),
                left: start.x.min(end.x),
            },
            Segment::Quadratic(p0, c, p1) => {
                let (left, right) = quadratic_interval(p0.x, c.x, p1.x);
                let (top, bottom) = quadratic_interval(p0.y, c.y, p1.y);
                Aabb { top, right, bottom, left }
            }
            Segment::Cubic(p0, c1, c2, p1) => {
                let (left, right) = cubic_interval(p0.x, c1.x, c2.x, p1.x);
                let (top, bottom) = cubic_interval(p0.y, c1.y, c2.y, p1.y);
                Aabb { top, right, bottom, left }
            }
            Segment::Arc(arc) => arc_bounding_box(&arc),
        }
    }
}

fn eval_cubic_1d(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let p01 = lerp(p0, p1, t);
    let p12 = lerp(p1, p2, t);
    let p23 = lerp(p2, p3, t);
    let p012 = lerp(p01, p12, t);
    let p123 = lerp(p12, p23, t);
    lerp(p012, p123, t)
}

// Min/max of one cubic coordinate over [0, 1]: endpoints plus the roots of
// the derivative quadratic that land strictly inside.
fn cubic_interval(p0: f64, p1: f64, p2: f64, p3: f64) -> (f64, f64) {
    let mut min = p0.min(p3);
    let mut max = p0.max(p3);

    let a = 3.0 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3);
    let b = 6.0 * (p0 - 2.0 * p1 + p2);
    let c = 3.0 * (p1 - p0);

    if a == 0.0 {
        // Derivative is linear.
        if b != 0.0 {
            let t = -c / b;
            if 0.0 < t && t < 1.0 {
                let x = eval_cubic_1d(p0, p1, p2, p3, t);
                min = min.min(x);
                max = max.max(x);
            }
        }
        return (min, max);
    }

    let d = b * b - 4.0 * a * c;
    if d < 0.0 {
        return (min, max);
    }
    let sqrt_d = d.sqrt();

    for t in [(-b - sqrt_d) / (2.0 * a), (-b + sqrt_d) / (2.0 * a)] {
        if 0.0 < t && t < 1.0 {
            let x = eval_cubic_1d(p0, p1, p2, p3, t);
            min = min.min(x);
            max = max.max(x);
        }
    }

    (min, max)
}

fn quadratic_interval(p0: f64, p1: f64, p2: f64) -> (f64, f64) {
    let mut min = p0.min(p2);
    let mut max = p0.max(p2);

    let denominator = p0 - 2.0 * p1 + p2;
    if denominator == 0.0 {
        return (min, max);
    }

    let t = (p0 - p1) / denominator;
    if (0.0..=1.0).contains(&t) {
        let p01 = lerp(p0, p1, t);
        let p12 = lerp(p1, p2, t);
        let x = lerp(p01, p12, t);
        min = min.min(x);
        max = max.max(x);
    }

    (min, max)
}

#[inline]
fn in_angle_interval(x: f64, x0: f64, x1: f64) -> bool {
    let mapped = (x - x0) / (x1 - x0);
    (0.0..=1.0).contains(&mapped)
}

fn arc_bounding_box(arc: &ArcSegment) -> Aabb {
    let center = match arc_to_center(arc) {
        Some(center) => center,
        None => return Aabb::around_point(arc.start, 0.0).extended_by(arc.end),
    };
    let theta2 = center.theta1 + center.delta_theta;

    if arc.rotation == 0.0 || arc.rx == arc.ry {
        let mut bb = Aabb::around_point(arc.start, 0.0).extended_by(arc.end);
        let c = center.center;
        let (rx, ry) = (center.rx, center.ry);
        // Axis-aligned extrema whose angle falls inside the swept interval.
        if in_angle_interval(-PI, center.theta1, theta2) || in_angle_interval(PI, center.theta1, theta2) {
            bb = bb.extended_by(Vec2::new(c.x - rx, c.y));
        }
        if in_angle_interval(-PI / 2.0, center.theta1, theta2) || in_angle_interval(3.0 * PI / 2.0, center.theta1, theta2) {
            bb = bb.extended_by(Vec2::new(c.x, c.y - ry));
        }
        if in_angle_interval(0.0, center.theta1, theta2) || in_angle_interval(TAU, center.theta1, theta2) {
            bb = bb.extended_by(Vec2::new(c.x + rx, c.y));
        }
        if in_angle_interval(PI / 2.0, center.theta1, theta2) || in_angle_interval(5.0 * PI / 2.0, center.theta1, theta2) {
            bb = bb.extended_by(Vec2::new(c.x, c.y + ry));
        }
        bb
    } else {
        let mut bb = None;
        for cubic in arc_to_cubics(arc, PI / 16.0) {
            bb = Some(merge_boxes(bb, &cubic.bounding_box()));
        }
        bb.unwrap_or_else(|| Aabb::around_point(arc.start, 0.0))
    }
}

/// SVG 2 endpoint-to-center conversion (B.2.4), including the out-of-range
/// radius correction. Returns `None` when either radius is zero; callers
/// treat such arcs as the line from start to end.
pub fn arc_to_center(arc: &ArcSegment) -> Option<ArcCenter> {
    if arc.rx == 0.0 || arc.ry == 0.0 {
        return None;
    }

    let rotation = arc.rotation.to_radians();
    let p = ((arc.start - arc.end) * 0.5).rotate(-rotation);

    let mut rx = arc.rx.abs();
    let mut ry = arc.ry.abs();
    let mut rx2 = rx * rx;
    let mut ry2 = ry * ry;
    let px2 = p.x * p.x;
    let py2 = p.y * p.y;

    let lambda = px2 / rx2 + py2 / ry2;
    if lambda > 1.0 {
        let lambda_sqrt = lambda.sqrt();
        rx *= lambda_sqrt;
        ry *= lambda_sqrt;
        rx2 *= lambda;
        ry2 *= lambda;
    }

    let denominator = rx2 * py2 + ry2 * px2;
    if denominator == 0.0 {
        // Coincident endpoints: a full-sweep ellipse anchored at the shared
        // point, with the angular origin placed there.
        return Some(ArcCenter {
            center: arc.start - Vec2::new(rx, 0.0).rotate(rotation),
            theta1: 0.0,
            delta_theta: if arc.sweep { TAU } else { -TAU },
            rx,
            ry,
            rotation,
        });
    }

    let sign = if arc.large_arc == arc.sweep { -1.0 } else { 1.0 };
    let numerator = (rx2 * ry2 - rx2 * py2 - ry2 * px2).max(0.0);
    let multiplier = (numerator / denominator).sqrt();
    let c_prime = Vec2::new(sign * multiplier * (rx * p.y / ry), sign * multiplier * (-ry * p.x / rx));

    let center = c_prime.rotate(rotation) + (arc.start + arc.end) * 0.5;

    let v1 = Vec2::new((p.x - c_prime.x) / rx, (p.y - c_prime.y) / ry);
    let v2 = Vec2::new((-p.x - c_prime.x) / rx, (-p.y - c_prime.y) / ry);
    let theta1 = vector_angle(Vec2::new(1.0, 0.0), v1);
    let mut delta_theta = vector_angle(v1, v2);

    if !arc.sweep && delta_theta > 0.0 {
        delta_theta -= TAU;
    } else if arc.sweep && delta_theta < 0.0 {
        delta_theta += TAU;
    }

    Some(ArcCenter {
        center,
        theta1,
        delta_theta,
        rx,
        ry,
        rotation,
    })
}

/// Rebuild an endpoint-parametrized arc. `start`/`end` override the computed
/// endpoints so split pieces chain exactly.
pub fn arc_from_center(params: &ArcCenter, start: Option<Vec2>, end: Option<Vec2>) -> Segment {
    let point_at = |theta: f64| {
        params.center + Vec2::new(params.rx * theta.cos(), params.ry * theta.sin()).rotate(params.rotation)
    };

    let p1 = start.unwrap_or_else(|| point_at(params.theta1));
    let p2 = end.unwrap_or_else(|| point_at(params.theta1 + params.delta_theta));

    Segment::Arc(ArcSegment {
        start: p1,
        rx: params.rx,
        ry: params.ry,
        rotation: params.rotation.to_degrees(),
        large_arc: params.delta_theta.abs() > PI,
        sweep: params.delta_theta > 0.0,
        end: p2,
    })
}

/// Approximate an arc with cubics covering at most `max_delta_theta` radians
/// each. Degenerate arcs yield their chord.
pub fn arc_to_cubics(arc: &ArcSegment, max_delta_theta: f64) -> Vec<Segment> {
    let center = match arc_to_center(arc) {
        Some(center) => center,
        None => return vec![Segment::Line(arc.start, arc.end)],
    };

    let count = ((center.delta_theta.abs() / max_delta_theta).ceil() as usize).max(1);
    let theta = center.delta_theta / count as f64;
    // Unit-circle cubic approximation of a theta-radian arc starting at angle 0.
    let k = (4.0 / 3.0) * (theta / 4.0).tan();
    let (sin_theta, cos_theta) = theta.sin_cos();

    let to_ellipse = |p: Vec2, piece_angle: f64| {
        let on_circle = p.rotate(piece_angle);
        center.center + Vec2::new(center.rx * on_circle.x, center.ry * on_circle.y).rotate(center.rotation)
    };

    (0..count)
        .map(|i| {
            let piece_angle = center.theta1 + i as f64 * theta;
            Segment::Cubic(
                to_ellipse(Vec2::new(1.0, 0.0), piece_angle),
                to_ellipse(Vec2::new(1.0, k), piece_angle),
                to_ellipse(Vec2::new(cos_theta + k * sin_theta, sin_theta - k * cos_theta), piece_angle),
                to_ellipse(Vec2::new(cos_theta, sin_theta), piece_angle),
            )
        })
        .collect()
}

/// Type-matched component-wise equality under a point tolerance.
pub fn segments_equal(a: &Segment, b: &Segment, eps: f64) -> bool {
    match (*a, *b) {
        (Segment::Line(s0, e0), Segment::Line(s1, e1)) => s0.approx_eq(s1, eps) && e0.approx_eq(e1, eps),
        (Segment::Quadratic(s0, c0, e0), Segment::Quadratic(s1, c1, e1)) => {
            s0.approx_eq(s1, eps) && c0.approx_eq(c1, eps) && e0.approx_eq(e1, eps)
        }
        (Segment::Cubic(s0, c0, d0, e0), Segment::Cubic(s1, c1, d1, e1)) => {
            s0.approx_eq(s1, eps) && c0.approx_eq(c1, eps) && d0.approx_eq(d1, eps) && e0.approx_eq(e1, eps)
        }
        (Segment::Arc(a0), Segment::Arc(a1)) => {
            // TODO: rotation can be anything when rx == ry, and rotations that
            // differ by pi/2 with swapped radii describe the same ellipse.
            a0.start.approx_eq(a1.start, eps)
                && (a0.rx - a1.rx).abs() < eps
                && (a0.ry - a1.ry).abs() < eps
                && (a0.rotation - a1.rotation).abs() < eps
                && a0.large_arc == a1.large_arc
                && a0.sweep == a1.sweep
                && a0.end.approx_eq(a1.end, eps)
        }
        _ => false,
    }
}

/// Discard rule for segments whose endpoints snapped to the same vertex.
/// A cubic with separated control points still bulges into a loop, and a
/// sweeping arc with coincident endpoints is a full ellipse; both survive.
pub fn is_zero_length(seg: &Segment) -> bool {
    match *seg {
        Segment::Line(..) => true,
        Segment::Quadratic(p0, c, _) => p0.approx_eq(c, EPS_POINT),
        Segment::Cubic(p0, c1, c2, p1) => p0.approx_eq(c1, EPS_POINT) && p1.approx_eq(c2, EPS_POINT),
        Segment::Arc(arc) => !arc.sweep,
    }
}
