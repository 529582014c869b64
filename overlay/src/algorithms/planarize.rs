//! Stages that flatten two tagged paths into a vertex-exact multigraph:
//! cubics split at their self-intersections, every edge split at pairwise
//! intersections, endpoints snapped into shared vertices, coincident
//! parallel edges merged.

use crate::geometry::aabb::{merge_boxes, Aabb};
use crate::geometry::cubic::cubic_self_intersection;
use crate::geometry::intersect::segment_intersections;
use crate::geometry::segment::{is_zero_length, segments_equal};
use crate::geometry::tolerance::{EPS_PARAM, EPS_POINT};
use crate::model::{Parents, Segment, Vec2};
use crate::quadtree::QuadTree;
use std::collections::HashMap;

const TREE_DEPTH: usize = 8;
const INTERSECTION_TREE_CAPACITY: usize = 8;
const POINT_TREE_CAPACITY: usize = 16;

/// An input segment tagged with the path(s) it came from.
pub type TaggedSegment = (Segment, Parents);

/// A split edge with its cached bounding box.
#[derive(Clone, Copy, Debug)]
pub struct SplitEdge {
    pub seg: Segment,
    pub parents: Parents,
    pub bounding_box: Aabb,
}

/// Directed half of a physical edge in the major graph.
#[derive(Clone, Debug)]
pub struct MajorEdge {
    pub seg: Segment,
    pub parents: Parents,
    /// start and end vertex ids
    pub ends: [usize; 2],
    /// false = the stored segment runs start to end, true = reversed
    pub backward: bool,
    pub twin: usize,
}

#[derive(Clone, Debug)]
pub struct MajorVertex {
    pub point: Vec2,
    pub outgoing: Vec<usize>,
}

/// Vertex-exact directed multigraph over the split edges. Both pools are
/// index-addressed; twins are paired at construction.
#[derive(Clone, Debug, Default)]
pub struct MajorGraph {
    pub vertices: Vec<MajorVertex>,
    pub edges: Vec<MajorEdge>,
}

/// Split every cubic carrying a loop at its self-intersection parameters.
/// Fragments inherit the parent tag.
pub fn split_at_self_intersections(edges: &mut Vec<TaggedSegment>) {
    let mut new_edges = Vec::new();
    for (seg, parents) in edges.iter_mut() {
        let [t1, t2] = match cubic_self_intersection(seg) {
            Some(mut ts) => {
                if ts[0] > ts[1] {
                    ts.swap(0, 1);
                }
                ts
            }
            None => continue,
        };

        if (t1 - t2).abs() < EPS_PARAM {
            let (seg1, seg2) = seg.split(t1);
            *seg = seg1;
            new_edges.push((seg2, *parents));
        } else {
            let (seg1, rest) = seg.split(t1);
            let (seg2, seg3) = rest.split((t2 - t1) / (1.0 - t1));
            *seg = seg1;
            new_edges.push((seg2, *parents));
            new_edges.push((seg3, *parents));
        }
    }
    edges.extend(new_edges);
}

/// Split all edges at their pairwise intersections, discovered through a
/// quadtree over edge boxes. Returns the split edges and the overall box
/// (`None` only when the input is empty).
pub fn split_at_intersections(edges: &[TaggedSegment]) -> (Vec<SplitEdge>, Option<Aabb>) {
    let with_box: Vec<SplitEdge> = edges
        .iter()
        .map(|(seg, parents)| SplitEdge {
            seg: *seg,
            parents: *parents,
            bounding_box: seg.bounding_box(),
        })
        .collect();

    let total = with_box.iter().fold(None, |acc, e| Some(merge_boxes(acc, &e.bounding_box)));
    let total = match total {
        Some(bb) => bb,
        None => return (Vec::new(), None),
    };

    let mut edge_tree: QuadTree<usize> = QuadTree::new(total, TREE_DEPTH, INTERSECTION_TREE_CAPACITY);
    let mut splits_per_edge: HashMap<usize, Vec<f64>> = HashMap::new();

    // Each unordered pair is tested exactly once: candidates were inserted
    // before the probing edge.
    for (i, edge) in with_box.iter().enumerate() {
        for j in edge_tree.find(&edge.bounding_box) {
            let candidate = &with_box[j];
            let chained = candidate.seg.end().approx_eq(edge.seg.start(), EPS_POINT)
                || candidate.seg.start().approx_eq(edge.seg.end(), EPS_POINT);
            // Endpoint contacts only stay out of the root set for edges of
            // different parents meeting end to end. This mirrors the known
            // quirk of the arrangement rather than a principled rule; the
            // discarded roots would be dropped as 0/1-parameter splits anyway.
            let endpoints = edge.parents == candidate.parents || !chained;

            for [t0, t1] in segment_intersections(&edge.seg, &candidate.seg, endpoints) {
                splits_per_edge.entry(i).or_default().push(t0);
                splits_per_edge.entry(j).or_default().push(t1);
            }
        }
        edge_tree.insert(edge.bounding_box, i);
    }

    let mut out = Vec::new();
    for (i, edge) in with_box.into_iter().enumerate() {
        let mut splits = match splits_per_edge.remove(&i) {
            Some(s) => s,
            None => {
                out.push(edge);
                continue;
            }
        };
        splits.sort_by(|a, b| a.partial_cmp(b).unwrap());

        // Walk the residual tail, remapping each global t onto it.
        let mut tail = edge.seg;
        let mut prev_t = 0.0;
        for t in splits {
            if t > 1.0 - EPS_PARAM {
                break;
            }
            let tt = (t - prev_t) / (1.0 - prev_t);
            prev_t = t;
            if tt < EPS_PARAM || tt > 1.0 - EPS_PARAM {
                continue;
            }
            let (head, rest) = tail.split(tt);
            out.push(SplitEdge {
                seg: head,
                parents: edge.parents,
                bounding_box: head.bounding_box(),
            });
            tail = rest;
        }
        out.push(SplitEdge {
            seg: tail,
            parents: edge.parents,
            bounding_box: tail.bounding_box(),
        });
    }

    (out, Some(total))
}

/// Snap endpoints into vertices through a point quadtree and build the
/// twinned directed multigraph. Zero-length segments are discarded and
/// coincident parallel edges merged, OR-ing their parent tags.
pub fn build_major_graph(edges: &[SplitEdge], bounding_box: Aabb) -> MajorGraph {
    let mut vertex_tree: QuadTree<usize> = QuadTree::new(bounding_box, TREE_DEPTH, POINT_TREE_CAPACITY);
    let mut graph = MajorGraph::default();

    // (min vertex, max vertex) -> edges between them, for duplicate merging
    let mut edges_between: HashMap<(usize, usize), Vec<(Segment, usize)>> = HashMap::new();

    for edge in edges {
        let mut vertex_for = |point| -> usize {
            let probe = Aabb::around_point(point, EPS_POINT);
            if let Some(&existing) = vertex_tree.find(&probe).first() {
                return existing;
            }
            let id = graph.vertices.len();
            graph.vertices.push(MajorVertex {
                point,
                outgoing: Vec::new(),
            });
            vertex_tree.insert(probe, id);
            id
        };

        let start = vertex_for(edge.seg.start());
        let end = vertex_for(edge.seg.end());

        if start == end && is_zero_length(&edge.seg) {
            continue;
        }

        let pair = (start.min(end), start.max(end));
        if let Some(existing) = edges_between.get(&pair) {
            if let Some(&(_, fwd)) = existing
                .iter()
                .find(|(other, _)| segments_equal(&edge.seg, other, EPS_POINT))
            {
                let parents = edge.parents;
                graph.edges[fwd].parents |= parents;
                graph.edges[fwd ^ 1].parents |= parents;
                continue;
            }
        }

        let fwd = graph.edges.len();
        let bwd = fwd + 1;
        graph.edges.push(MajorEdge {
            seg: edge.seg,
            parents: edge.parents,
            ends: [start, end],
            backward: false,
            twin: bwd,
        });
        graph.edges.push(MajorEdge {
            seg: edge.seg,
            parents: edge.parents,
            ends: [end, start],
            backward: true,
            twin: fwd,
        });

        graph.vertices[start].outgoing.push(fwd);
        graph.vertices[end].outgoing.push(bwd);
        edges_between.entry(pair).or_default().push((edge.seg, fwd));
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vec2;

    fn vec2(x: f64, y: f64) -> Vec2 {
        Vec2 { x, y }
    }

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::Line(vec2(x0, y0), vec2(x1, y1))
    }

    fn square(x: f64, y: f64, size: f64, parents: Parents) -> Vec<TaggedSegment> {
        vec![
            (line(x, y, x + size, y), parents),
            (line(x + size, y, x + size, y + size), parents),
            (line(x + size, y + size, x, y + size), parents),
            (line(x, y + size, x, y), parents),
        ]
    }

    #[test]
    fn crossing_lines_split_once_each() {
        let edges = vec![
            (line(0.0, 0.0, 10.0, 10.0), Parents::A),
            (line(0.0, 10.0, 10.0, 0.0), Parents::B),
        ];
        let (split, bb) = split_at_intersections(&edges);
        assert!(bb.is_some());
        assert_eq!(split.len(), 4, "each line splits at the middle");
        for e in &split {
            let len = (e.seg.end() - e.seg.start()).length();
            assert!((len - 50f64.sqrt()).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_input_has_no_box() {
        let (split, bb) = split_at_intersections(&[]);
        assert!(split.is_empty());
        assert!(bb.is_none());
    }

    #[test]
    fn figure_eight_cubic_splits_into_three() {
        let mut edges = vec![(
            Segment::Cubic(vec2(0.0, 0.0), vec2(30.0, 10.0), vec2(-20.0, 10.0), vec2(10.0, 0.0)),
            Parents::A,
        )];
        split_at_self_intersections(&mut edges);
        assert_eq!(edges.len(), 3);
        // Fragments chain: piece ends meet the crossing point twice.
        let p_end0 = edges[0].0.end();
        let p_end1 = edges[1].0.end();
        assert!(p_end0.approx_eq(p_end1, 1e-6), "{p_end0:?} vs {p_end1:?}");
        for (seg, parents) in &edges {
            assert_eq!(*parents, Parents::A);
            assert!(cubic_self_intersection(seg).is_none(), "fragments are loop-free");
        }
    }

    #[test]
    fn major_graph_snaps_and_twins() {
        let mut edges = square(0.0, 0.0, 10.0, Parents::A);
        // End of the last edge is offset by less than the point epsilon and
        // must land on the first vertex anyway.
        edges[3].0 = line(0.0, 10.0, 0.0, 5e-7);
        let (split, bb) = split_at_intersections(&edges);
        let graph = build_major_graph(&split, bb.unwrap());

        assert_eq!(graph.vertices.len(), 4);
        assert_eq!(graph.edges.len(), 8);
        for (i, e) in graph.edges.iter().enumerate() {
            let twin = &graph.edges[e.twin];
            assert_eq!(twin.twin, i);
            assert_eq!(twin.ends, [e.ends[1], e.ends[0]]);
            assert_ne!(twin.backward, e.backward);
        }
        for (vid, v) in graph.vertices.iter().enumerate() {
            assert_eq!(v.outgoing.len(), 2);
            for &eid in &v.outgoing {
                assert_eq!(graph.edges[eid].ends[0], vid);
            }
        }
    }

    #[test]
    fn coincident_edges_merge_parents() {
        let mut edges = square(0.0, 0.0, 10.0, Parents::A);
        edges.extend(square(0.0, 0.0, 10.0, Parents::B));
        let (split, bb) = split_at_intersections(&edges);
        let graph = build_major_graph(&split, bb.unwrap());

        assert_eq!(graph.vertices.len(), 4, "one square's worth of vertices");
        assert_eq!(graph.edges.len(), 8, "duplicates merged away");
        for e in &graph.edges {
            assert!(e.parents.contains(Parents::A) && e.parents.contains(Parents::B));
        }
    }

    #[test]
    fn zero_length_segments_are_dropped() {
        let edges = vec![
            (line(0.0, 0.0, 10.0, 0.0), Parents::A),
            (line(10.0, 0.0, 10.0, 1e-9), Parents::A),
        ];
        let (split, bb) = split_at_intersections(&edges);
        let graph = build_major_graph(&split, bb.unwrap());
        assert_eq!(graph.edges.len(), 2, "only the real line survives, twinned");
    }
}
