//! Intersection kernel: line-line in closed form, curve pairs by
//! bounding-volume bisection, plus the clipping and ray tests the later
//! pipeline stages lean on.

use crate::geometry::aabb::Aabb;
use crate::geometry::math::{lerp, lin_map};
use crate::geometry::segment::segments_equal;
use crate::geometry::tolerance::{EPS_COLLINEAR, EPS_LINEAR, EPS_PARAM, EPS_POINT};
use crate::model::{Segment, Vec2};

/// Intersection of two line segments by Cramer's rule. Returns parameters
/// `(s, t)` in [-eps, 1 + eps] on each segment; near-parallel pairs are
/// rejected outright.
pub fn line_line_intersection(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2, eps: f64) -> Option<(f64, f64)> {
    let a = p2 - p1;
    let b = p3 - p4;
    let c = p3 - p1;

    let denom = a.cross(b);
    if denom.abs() < EPS_COLLINEAR {
        return None;
    }

    let s = c.cross(b) / denom;
    let t = a.cross(c) / denom;

    if (-eps..=1.0 + eps).contains(&s) && (-eps..=1.0 + eps).contains(&t) {
        Some((s, t))
    } else {
        None
    }
}

#[derive(Clone)]
struct BisectNode {
    seg: Segment,
    start_param: f64,
    end_param: f64,
    bounding_box: Aabb,
}

impl BisectNode {
    fn whole(seg: &Segment) -> BisectNode {
        BisectNode {
            seg: *seg,
            start_param: 0.0,
            end_param: 1.0,
            bounding_box: seg.bounding_box(),
        }
    }

    fn subdivide(&self) -> [BisectNode; 2] {
        let (seg0, seg1) = self.seg.split(0.5);
        let mid = (self.start_param + self.end_param) / 2.0;
        [
            BisectNode {
                bounding_box: seg0.bounding_box(),
                seg: seg0,
                start_param: self.start_param,
                end_param: mid,
            },
            BisectNode {
                bounding_box: seg1.bounding_box(),
                seg: seg1,
                start_param: mid,
                end_param: self.end_param,
            },
        ]
    }

    fn chord(&self) -> (Vec2, Vec2) {
        (self.seg.start(), self.seg.end())
    }
}

fn nodes_may_intersect(a: &BisectNode, b: &BisectNode) -> bool {
    match (&a.seg, &b.seg) {
        (Segment::Line(s0, e0), Segment::Line(s1, e1)) => {
            line_line_intersection(*s0, *e0, *s1, *e1, EPS_POINT).is_some()
        }
        (Segment::Line(s, e), _) => line_intersects_aabb(*s, *e, &b.bounding_box),
        (_, Segment::Line(s, e)) => line_intersects_aabb(*s, *e, &a.bounding_box),
        _ => a.bounding_box.overlaps(&b.bounding_box),
    }
}

/// All intersection parameter pairs `[t0, t1]` between two segments.
///
/// Line pairs go through the closed form. Everything else runs a worklist of
/// box pairs, discarding pairs whose volumes cannot meet and treating a piece
/// as its chord once its box extent drops under the linear epsilon. With
/// `endpoints` false, roots where both sides sit at a segment end are
/// dropped, so only endpoint-to-endpoint coincidences are filtered.
pub fn segment_intersections(seg0: &Segment, seg1: &Segment, endpoints: bool) -> Vec<[f64; 2]> {
    if let (Segment::Line(s0, e0), Segment::Line(s1, e1)) = (seg0, seg1) {
        if let Some((s, t)) = line_line_intersection(*s0, *e0, *s1, *e1, EPS_PARAM) {
            if !endpoints && (s < EPS_PARAM || s > 1.0 - EPS_PARAM) && (t < EPS_PARAM || t > 1.0 - EPS_PARAM) {
                return Vec::new();
            }
            return vec![[s, t]];
        }
        return Vec::new();
    }

    let mut pairs = vec![(BisectNode::whole(seg0), BisectNode::whole(seg1))];
    let mut params = Vec::new();

    while !pairs.is_empty() {
        let mut next_pairs = Vec::new();

        for (a, b) in pairs {
            if segments_equal(&a.seg, &b.seg, EPS_POINT) {
                // Exactly overlapping pieces are dropped rather than reported.
                continue;
            }

            let a_linear = a.bounding_box.max_extent() <= EPS_LINEAR;
            let b_linear = b.bounding_box.max_extent() <= EPS_LINEAR;

            if a_linear && b_linear {
                let (a0, a1) = a.chord();
                let (b0, b1) = b.chord();
                if let Some((s, t)) = line_line_intersection(a0, a1, b0, b1, EPS_PARAM) {
                    params.push([
                        lerp(a.start_param, a.end_param, s),
                        lerp(b.start_param, b.end_param, t),
                    ]);
                }
            } else {
                let halves_a = if a_linear { vec![a] } else { a.subdivide().to_vec() };
                let halves_b = if b_linear { vec![b] } else { b.subdivide().to_vec() };

                for half_a in &halves_a {
                    for half_b in &halves_b {
                        if nodes_may_intersect(half_a, half_b) {
                            next_pairs.push((half_a.clone(), half_b.clone()));
                        }
                    }
                }
            }
        }

        pairs = next_pairs;
    }

    if !endpoints {
        params.retain(|[s, t]| {
            (*s > EPS_PARAM && *s < 1.0 - EPS_PARAM) || (*t > EPS_PARAM && *t < 1.0 - EPS_PARAM)
        });
    }

    params
}

// Cohen-Sutherland outcodes.
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

fn out_code(p: Vec2, bb: &Aabb) -> u8 {
    let mut code = INSIDE;
    if p.x < bb.left {
        code |= LEFT;
    } else if p.x > bb.right {
        code |= RIGHT;
    }
    if p.y < bb.top {
        code |= TOP;
    } else if p.y > bb.bottom {
        code |= BOTTOM;
    }
    code
}

/// Whether the segment from `p0` to `p1` meets the box, via Cohen-Sutherland
/// clipping.
pub fn line_intersects_aabb(mut p0: Vec2, mut p1: Vec2, bb: &Aabb) -> bool {
    let mut code0 = out_code(p0, bb);
    let mut code1 = out_code(p1, bb);

    loop {
        if code0 | code1 == INSIDE {
            return true;
        }
        if code0 & code1 != INSIDE {
            return false;
        }

        let code_out = code0.max(code1);
        let p = if code_out & TOP != 0 {
            Vec2::new(p0.x + (p1.x - p0.x) * (bb.top - p0.y) / (p1.y - p0.y), bb.top)
        } else if code_out & BOTTOM != 0 {
            Vec2::new(p0.x + (p1.x - p0.x) * (bb.bottom - p0.y) / (p1.y - p0.y), bb.bottom)
        } else if code_out & RIGHT != 0 {
            Vec2::new(bb.right, p0.y + (p1.y - p0.y) * (bb.right - p0.x) / (p1.x - p0.x))
        } else {
            Vec2::new(bb.left, p0.y + (p1.y - p0.y) * (bb.left - p0.x) / (p1.x - p0.x))
        };

        if code_out == code0 {
            p0 = p;
            code0 = out_code(p0, bb);
        } else {
            p1 = p;
            code1 = out_code(p1, bb);
        }
    }
}

// Half-open bracket: of two intervals meeting exactly at p, one counts.
#[inline]
pub fn interval_crosses_point(a: f64, b: f64, p: f64) -> bool {
    (a >= p) == (b < p)
}

/// Whether the line from `a` to `b` crosses the horizontal ray running from
/// `point` toward +x.
pub fn line_intersects_horizontal_ray(a: Vec2, b: Vec2, point: Vec2) -> bool {
    if !interval_crosses_point(a.y, b.y, point.y) {
        return false;
    }
    let x = lin_map(point.y, a.y, b.y, a.x, b.x);
    x >= point.x
}

fn aabb_intersects_horizontal_ray(bb: &Aabb, point: Vec2) -> bool {
    interval_crosses_point(bb.top, bb.bottom, point.y) && bb.right >= point.x
}

/// How many times a segment crosses the horizontal ray from `point` toward
/// +x. Curves are bisected until each piece is chord-like, then the line
/// test applies.
pub fn segment_horizontal_ray_crossings(seg: &Segment, point: Vec2) -> usize {
    let bounding_box = seg.bounding_box();
    if !aabb_intersects_horizontal_ray(&bounding_box, point) {
        return 0;
    }

    let mut stack = vec![BisectNode::whole(seg)];
    let mut count = 0;

    while let Some(node) = stack.pop() {
        if node.bounding_box.max_extent() < EPS_LINEAR {
            let (a, b) = node.chord();
            if line_intersects_horizontal_ray(a, b, point) {
                count += 1;
            }
        } else {
            for half in node.subdivide() {
                if aabb_intersects_horizontal_ray(&half.bounding_box, point) {
                    stack.push(half);
                }
            }
        }
    }

    count
}
