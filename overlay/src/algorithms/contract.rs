//! Chain contraction of the major graph: maximal runs of degree-2 vertices
//! collapse into single poly-edges, pure cycles are collected separately,
//! dangling trees are pruned per parent, and branch fans get sorted by
//! incidence angle.

use crate::algorithms::planarize::MajorGraph;
use crate::geometry::tolerance::EPS_PARAM;
use crate::model::{Parents, Segment};
use std::collections::{HashMap, HashSet};

/// A maximal chain between branch vertices. The segment list is in walk
/// order; `backward` says whether each stored segment runs against the walk.
#[derive(Clone, Debug)]
pub struct MinorEdge {
    pub segments: Vec<Segment>,
    pub parents: Parents,
    pub ends: [usize; 2],
    pub backward: bool,
    pub twin: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct MinorVertex {
    pub outgoing: Vec<usize>,
}

/// A standalone closed loop whose vertices are all degree 2.
#[derive(Clone, Debug)]
pub struct MinorCycle {
    pub segments: Vec<Segment>,
    pub parents: Parents,
    pub backward: bool,
}

/// Chain-contracted ("minor") graph. Pools are tombstoned so pruning keeps
/// ids stable.
#[derive(Clone, Debug, Default)]
pub struct MinorGraph {
    pub vertices: Vec<Option<MinorVertex>>,
    pub edges: Vec<Option<MinorEdge>>,
    pub cycles: Vec<MinorCycle>,
}

impl MinorGraph {
    pub fn live_edges(&self) -> impl Iterator<Item = (usize, &MinorEdge)> {
        self.edges.iter().enumerate().filter_map(|(i, e)| e.as_ref().map(|e| (i, e)))
    }
}

fn order_of(major: &MajorGraph, vertex: usize) -> usize {
    major.vertices[vertex].outgoing.len()
}

/// Contract chains and collect pure cycles.
pub fn compute_minor(major: &MajorGraph) -> MinorGraph {
    let mut graph = MinorGraph::default();
    let mut to_minor_vertex: HashMap<usize, usize> = HashMap::new();
    let mut chain_to_edge: HashMap<(usize, usize), usize> = HashMap::new();
    let mut visited = vec![false; major.vertices.len()];

    let mut minor_vertex = |graph: &mut MinorGraph, to_minor_vertex: &mut HashMap<usize, usize>, major_id: usize| {
        *to_minor_vertex.entry(major_id).or_insert_with(|| {
            graph.vertices.push(Some(MinorVertex::default()));
            graph.vertices.len() - 1
        })
    };

    // Chains start and end at vertices of order != 2.
    for (major_id, vertex) in major.vertices.iter().enumerate() {
        if vertex.outgoing.len() == 2 {
            continue;
        }
        let start_vertex = minor_vertex(&mut graph, &mut to_minor_vertex, major_id);

        for &start_edge in &vertex.outgoing {
            let mut segments = Vec::new();
            let mut edge_id = start_edge;

            // Follow twin-alternation while the tag, the direction, and the
            // degree-2 interior hold.
            loop {
                let edge = &major.edges[edge_id];
                let start = &major.edges[start_edge];
                if edge.parents != start.parents
                    || edge.backward != start.backward
                    || order_of(major, edge.ends[1]) != 2
                {
                    break;
                }
                segments.push(edge.seg);
                visited[edge.ends[1]] = true;
                edge_id = *major.vertices[edge.ends[1]]
                    .outgoing
                    .iter()
                    .find(|&&e| e != edge.twin)
                    .expect("degree-2 vertex must have a continuation");
            }
            let last = &major.edges[edge_id];
            segments.push(last.seg);

            let end_vertex = minor_vertex(&mut graph, &mut to_minor_vertex, last.ends[1]);

            let chain_id = (start_edge, edge_id);
            let twin_id = (last.twin, major.edges[start_edge].twin);
            let twin = chain_to_edge.get(&twin_id).copied();

            let new_edge = graph.edges.len();
            graph.edges.push(Some(MinorEdge {
                segments,
                parents: major.edges[start_edge].parents,
                ends: [start_vertex, end_vertex],
                backward: major.edges[start_edge].backward,
                twin,
            }));
            if let Some(twin) = twin {
                graph.edges[twin].as_mut().unwrap().twin = Some(new_edge);
            }
            chain_to_edge.insert(chain_id, new_edge);
            graph.vertices[start_vertex].as_mut().unwrap().outgoing.push(new_edge);
        }
    }

    // What is left untouched with all orders exactly 2 forms pure cycles.
    for (major_id, vertex) in major.vertices.iter().enumerate() {
        if vertex.outgoing.len() != 2 || visited[major_id] {
            continue;
        }
        let mut edge_id = vertex.outgoing[0];
        let first = &major.edges[edge_id];
        let mut cycle = MinorCycle {
            segments: Vec::new(),
            parents: first.parents,
            backward: first.backward,
        };
        loop {
            let edge = &major.edges[edge_id];
            cycle.segments.push(edge.seg);
            visited[edge.ends[0]] = true;
            debug_assert_eq!(order_of(major, edge.ends[1]), 2, "cycle component left the cycle");
            edge_id = *major.vertices[edge.ends[1]]
                .outgoing
                .iter()
                .find(|&&e| e != edge.twin)
                .expect("degree-2 vertex must have a continuation");
            if major.edges[edge_id].ends[0] == major_id {
                break;
            }
        }
        graph.cycles.push(cycle);
    }

    graph
}

/// Iteratively drop edges that lie on no simple cycle, independently per
/// parent bit. A vertex survives a parent's walk when some descendant in the
/// DFS reaches back up to it or past it.
pub fn remove_dangling_edges(graph: &mut MinorGraph) {
    fn visit(
        graph: &MinorGraph,
        parent: Parents,
        vertex: usize,
        incoming: Option<usize>,
        level: usize,
        levels: &mut HashMap<usize, usize>,
        kept: &mut HashSet<usize>,
    ) -> usize {
        if let Some(&existing) = levels.get(&vertex) {
            return existing;
        }
        levels.insert(vertex, level);

        let mut min_level = usize::MAX;
        let outgoing = &graph.vertices[vertex].as_ref().unwrap().outgoing;
        for &edge_id in outgoing {
            let edge = graph.edges[edge_id].as_ref().unwrap();
            if edge.parents.contains(parent) && Some(edge_id) != incoming {
                min_level = min_level.min(visit(graph, parent, edge.ends[1], edge.twin, level + 1, levels, kept));
            }
        }

        if min_level <= level {
            kept.insert(vertex);
        }
        min_level
    }

    fn walk(graph: &MinorGraph, parent: Parents) -> HashSet<usize> {
        let mut kept = HashSet::new();
        let mut levels = HashMap::new();
        for (_, edge) in graph.live_edges() {
            if edge.parents.contains(parent) {
                visit(graph, parent, edge.ends[0], None, 0, &mut levels, &mut kept);
            }
        }
        kept
    }

    let kept_a = walk(graph, Parents::A);
    let kept_b = walk(graph, Parents::B);

    let edge_survives = |edge: &MinorEdge| {
        (edge.parents.contains(Parents::A) && kept_a.contains(&edge.ends[0]) && kept_a.contains(&edge.ends[1]))
            || (edge.parents.contains(Parents::B) && kept_b.contains(&edge.ends[0]) && kept_b.contains(&edge.ends[1]))
    };

    let surviving: Vec<bool> = graph
        .edges
        .iter()
        .map(|e| e.as_ref().map(&edge_survives).unwrap_or(false))
        .collect();

    for (vertex_id, slot) in graph.vertices.iter_mut().enumerate() {
        let keep = kept_a.contains(&vertex_id) || kept_b.contains(&vertex_id);
        match slot {
            Some(vertex) if keep => vertex.outgoing.retain(|&e| surviving[e]),
            _ => *slot = None,
        }
    }
    for (edge_id, slot) in graph.edges.iter_mut().enumerate() {
        if !surviving[edge_id] {
            *slot = None;
        }
    }
}

/// Incidence angle of an edge at its origin: the direction from the sampled
/// origin toward a sample just inside the first chain segment.
fn incidence_angle(edge: &MinorEdge) -> f64 {
    let seg = &edge.segments[0];
    let (outer, inner) = if edge.backward {
        (seg.sample(1.0), seg.sample(1.0 - EPS_PARAM))
    } else {
        (seg.sample(0.0), seg.sample(EPS_PARAM))
    };
    (inner.y - outer.y).atan2(inner.x - outer.x)
}

/// Sort every branch fan by incidence angle. Angles are memoized per edge;
/// insertion order breaks exact ties.
pub fn sort_outgoing_by_angle(graph: &mut MinorGraph) {
    let mut angles = vec![0.0f64; graph.edges.len()];
    for (edge_id, edge) in graph.live_edges() {
        angles[edge_id] = incidence_angle(edge);
    }

    for slot in graph.vertices.iter_mut() {
        let Some(vertex) = slot else { continue };
        if vertex.outgoing.len() > 2 {
            vertex
                .outgoing
                .sort_by(|&a, &b| angles[a].partial_cmp(&angles[b]).unwrap().then(a.cmp(&b)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::planarize::{build_major_graph, split_at_intersections, TaggedSegment};
    use crate::model::Vec2;

    fn vec2(x: f64, y: f64) -> Vec2 {
        Vec2 { x, y }
    }

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::Line(vec2(x0, y0), vec2(x1, y1))
    }

    fn minor_of(edges: Vec<TaggedSegment>) -> MinorGraph {
        let (split, bb) = split_at_intersections(&edges);
        let major = build_major_graph(&split, bb.unwrap());
        compute_minor(&major)
    }

    fn theta_graph() -> Vec<TaggedSegment> {
        // A square with a horizontal bar through the middle: two branch
        // vertices of degree 3 on the left and right sides. The bar belongs
        // to the same input, so it sits on cycles and survives pruning.
        vec![
            (line(0.0, 0.0, 10.0, 0.0), Parents::A),
            (line(10.0, 0.0, 10.0, 5.0), Parents::A),
            (line(10.0, 5.0, 10.0, 10.0), Parents::A),
            (line(10.0, 10.0, 0.0, 10.0), Parents::A),
            (line(0.0, 10.0, 0.0, 5.0), Parents::A),
            (line(0.0, 5.0, 0.0, 0.0), Parents::A),
            (line(0.0, 5.0, 10.0, 5.0), Parents::A),
        ]
    }

    #[test]
    fn square_contracts_to_one_cycle() {
        let minor = minor_of(vec![
            (line(0.0, 0.0, 10.0, 0.0), Parents::A),
            (line(10.0, 0.0, 10.0, 10.0), Parents::A),
            (line(10.0, 10.0, 0.0, 10.0), Parents::A),
            (line(0.0, 10.0, 0.0, 0.0), Parents::A),
        ]);
        assert_eq!(minor.live_edges().count(), 0);
        assert_eq!(minor.cycles.len(), 1);
        assert_eq!(minor.cycles[0].segments.len(), 4);
        assert_eq!(minor.cycles[0].parents, Parents::A);
    }

    #[test]
    fn theta_contracts_to_three_chains() {
        let minor = minor_of(theta_graph());
        // Two branch vertices, three physical chains, each with two
        // directed minor edges.
        let vertex_count = minor.vertices.iter().flatten().count();
        assert_eq!(vertex_count, 2);
        assert_eq!(minor.live_edges().count(), 6);
        assert!(minor.cycles.is_empty());
        for (id, edge) in minor.live_edges() {
            let twin_id = edge.twin.expect("chain edges come in pairs");
            let twin = minor.edges[twin_id].as_ref().unwrap();
            assert_eq!(twin.twin, Some(id));
            assert_eq!(twin.ends, [edge.ends[1], edge.ends[0]]);
            assert_eq!(twin.segments.len(), edge.segments.len());
        }
        // The two long chains contract three square sides into one edge.
        let max_chain = minor.live_edges().map(|(_, e)| e.segments.len()).max().unwrap();
        assert_eq!(max_chain, 3);
    }

    #[test]
    fn dangling_tail_is_pruned() {
        let mut edges = theta_graph();
        // A tail hanging off the square: never part of any cycle.
        edges.push((line(10.0, 0.0, 15.0, -3.0), Parents::A));
        edges.push((line(15.0, -3.0, 20.0, -3.0), Parents::A));
        let mut minor = minor_of(edges);
        let before = minor.live_edges().count();
        remove_dangling_edges(&mut minor);
        let after = minor.live_edges().count();
        assert!(after < before, "tail edges removed");
        for (_, edge) in minor.live_edges() {
            for &v in &edge.ends {
                assert!(minor.vertices[v].is_some(), "edges only reference live vertices");
            }
        }
        // What survives is the theta, with the tail's attachment point left
        // behind as a degree-2 vertex: 4 physical chains.
        assert_eq!(after, 8);
    }

    #[test]
    fn open_polyline_prunes_to_nothing() {
        let mut minor = minor_of(vec![
            (line(0.0, 0.0, 10.0, 0.0), Parents::A),
            (line(10.0, 0.0, 20.0, 5.0), Parents::A),
        ]);
        remove_dangling_edges(&mut minor);
        assert_eq!(minor.live_edges().count(), 0);
        assert!(minor.vertices.iter().flatten().count() == 0);
    }

    #[test]
    fn branch_fan_sorts_by_angle() {
        let mut minor = minor_of(theta_graph());
        remove_dangling_edges(&mut minor);
        sort_outgoing_by_angle(&mut minor);
        for vertex in minor.vertices.iter().flatten() {
            let angles: Vec<f64> = vertex
                .outgoing
                .iter()
                .map(|&e| incidence_angle(minor.edges[e].as_ref().unwrap()))
                .collect();
            for pair in angles.windows(2) {
                assert!(pair[0] <= pair[1], "fan must be sorted: {angles:?}");
            }
        }
    }
}
