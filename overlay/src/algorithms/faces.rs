//! Dual graph of the arrangement: walking next-edge-around-face turns the
//! minor graph inside out, so faces become vertices and each minor edge a
//! pair of twinned half-edges. Components are split off over twin
//! connectivity and each gets its unique negative-winding outer face.

use crate::algorithms::boolean::BooleanError;
use crate::algorithms::contract::MinorGraph;
use crate::geometry::intersect::line_intersects_horizontal_ray;
use crate::model::{Parents, Segment, Vec2};
use std::collections::HashMap;

/// Points sampled per segment when a face boundary is tessellated for the
/// winding test.
const WINDING_SAMPLES: usize = 64;

/// One side of a minor edge, bound to the face it borders.
#[derive(Clone, Debug)]
pub struct DualEdge {
    pub segments: Vec<Segment>,
    pub parents: Parents,
    pub face: usize,
    pub backward: bool,
    pub twin: usize,
}

/// A face of the subdivision, as the cycle of half-edges along its boundary.
#[derive(Clone, Debug, Default)]
pub struct Face {
    pub incident_edges: Vec<usize>,
}

/// A maximal set of faces connected through half-edge twins.
#[derive(Clone, Debug)]
pub struct Component {
    pub faces: Vec<usize>,
    pub edges: Vec<usize>,
    pub outer_face: usize,
}

#[derive(Clone, Debug, Default)]
pub struct DualGraph {
    pub faces: Vec<Face>,
    pub edges: Vec<DualEdge>,
    pub components: Vec<Component>,
}

const UNPAIRED: usize = usize::MAX;

/// The edge after `edge_id`'s twin in the cyclic angular order at the end
/// vertex; repeatedly applying this moves around one face.
fn next_edge(minor: &MinorGraph, edge_id: usize) -> usize {
    let edge = minor.edges[edge_id].as_ref().unwrap();
    let outgoing = &minor.vertices[edge.ends[1]].as_ref().unwrap().outgoing;
    let index = outgoing
        .iter()
        .position(|&e| minor.edges[e].as_ref().unwrap().twin == Some(edge_id))
        .expect("twin must be among the end vertex's outgoing edges");
    outgoing[(index + 1) % outgoing.len()]
}

/// Build faces, twin half-edges and components. Fails when a component ends
/// up with more than one negative-winding face, which only happens on
/// inconsistent input geometry.
pub fn compute_dual(minor: &MinorGraph) -> Result<DualGraph, BooleanError> {
    let mut graph = DualGraph::default();
    let mut minor_to_dual: HashMap<usize, usize> = HashMap::new();

    for (start_id, _) in minor.live_edges() {
        if minor_to_dual.contains_key(&start_id) {
            continue;
        }

        let face_id = graph.faces.len();
        graph.faces.push(Face::default());

        let mut edge_id = start_id;
        loop {
            let edge = minor.edges[edge_id].as_ref().unwrap();
            let twin_dual = edge.twin.and_then(|t| minor_to_dual.get(&t).copied());

            let new_edge = graph.edges.len();
            graph.edges.push(DualEdge {
                segments: edge.segments.clone(),
                parents: edge.parents,
                face: face_id,
                backward: edge.backward,
                twin: twin_dual.unwrap_or(UNPAIRED),
            });
            if let Some(twin) = twin_dual {
                graph.edges[twin].twin = new_edge;
            }
            minor_to_dual.insert(edge_id, new_edge);
            graph.faces[face_id].incident_edges.push(new_edge);

            edge_id = next_edge(minor, edge_id);
            if edge_id == start_id {
                break;
            }
        }
    }

    // Each standalone cycle contributes a mirror pair of faces: one bounded
    // by the cycle as walked, one by the same loop walked the other way.
    for cycle in &minor.cycles {
        let inner_face = graph.faces.len();
        let outer_face = inner_face + 1;
        graph.faces.push(Face::default());
        graph.faces.push(Face::default());

        let inner_edge = graph.edges.len();
        let outer_edge = inner_edge + 1;
        graph.edges.push(DualEdge {
            segments: cycle.segments.clone(),
            parents: cycle.parents,
            face: inner_face,
            backward: cycle.backward,
            twin: outer_edge,
        });
        graph.edges.push(DualEdge {
            segments: cycle.segments.iter().rev().cloned().collect(),
            parents: cycle.parents,
            face: outer_face,
            backward: !cycle.backward,
            twin: inner_edge,
        });
        graph.faces[inner_face].incident_edges.push(inner_edge);
        graph.faces[outer_face].incident_edges.push(outer_edge);
    }

    debug_assert!(
        graph.edges.iter().enumerate().all(|(i, e)| e.twin != UNPAIRED && graph.edges[e.twin].twin == i),
        "every dual half-edge must have a symmetric twin"
    );

    // Components over twin connectivity, in face-id order.
    let mut visited_face = vec![false; graph.faces.len()];
    let mut visited_edge = vec![false; graph.edges.len()];

    for start_face in 0..graph.faces.len() {
        if visited_face[start_face] {
            continue;
        }
        let mut faces = Vec::new();
        let mut edges = Vec::new();
        let mut stack = vec![start_face];

        while let Some(face_id) = stack.pop() {
            if visited_face[face_id] {
                continue;
            }
            visited_face[face_id] = true;
            faces.push(face_id);

            for &edge_id in &graph.faces[face_id].incident_edges {
                if visited_edge[edge_id] {
                    continue;
                }
                let twin = graph.edges[edge_id].twin;
                visited_edge[edge_id] = true;
                visited_edge[twin] = true;
                edges.push(edge_id);
                edges.push(twin);
                stack.push(graph.edges[twin].face);
            }
        }

        let mut outer = None;
        let mut negative = 0usize;
        for &face_id in &faces {
            if face_winding(&graph.faces[face_id], &graph.edges).0 < 0 {
                negative += 1;
                outer.get_or_insert(face_id);
            }
        }
        if negative > 1 {
            return Err(BooleanError::MultipleOuterFaces);
        }
        let outer_face = outer.ok_or(BooleanError::NoOuterFace)?;

        graph.components.push(Component { faces, edges, outer_face });
    }

    Ok(graph)
}

/// Tessellate a face boundary into a polyline.
pub fn face_to_polygon(face: &Face, edges: &[DualEdge]) -> Vec<Vec2> {
    let mut polygon = Vec::new();
    for &edge_id in &face.incident_edges {
        let edge = &edges[edge_id];
        for seg in &edge.segments {
            for i in 0..WINDING_SAMPLES {
                let t0 = i as f64 / WINDING_SAMPLES as f64;
                let t = if edge.backward { 1.0 - t0 } else { t0 };
                polygon.push(seg.sample(t));
            }
        }
    }
    polygon
}

/// Signed winding of `polygon` around `point` by horizontal-ray crossings.
pub fn polygon_winding(polygon: &[Vec2], point: Vec2) -> i32 {
    if polygon.len() <= 2 {
        return 0;
    }
    let mut winding = 0;
    let mut prev = polygon[polygon.len() - 1];
    for &p in polygon {
        if line_intersects_horizontal_ray(prev, p, point) {
            winding += if p.y > prev.y { -1 } else { 1 };
        }
        prev = p;
    }
    winding
}

/// Winding of a face and the interior probe point it was measured at. Probes
/// ear centroids until one lands strictly inside; a face so degenerate that
/// every probe reads zero reports winding 0.
pub fn face_winding(face: &Face, edges: &[DualEdge]) -> (i32, Vec2) {
    let polygon = face_to_polygon(face, edges);
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        let c = polygon[(i + 2) % polygon.len()];
        let center = (a + b + c) * (1.0 / 3.0);
        let winding = polygon_winding(&polygon, center);
        if winding != 0 {
            return (winding, center);
        }
    }
    let fallback = polygon.first().copied().unwrap_or(Vec2::ZERO);
    (0, fallback)
}
