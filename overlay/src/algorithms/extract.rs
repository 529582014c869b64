//! Result extraction: either walk the outline of the union of selected
//! faces, or dump each selected face as its own path with holes poked.

use crate::algorithms::faces::DualGraph;
use crate::algorithms::nesting::NestingTree;
use crate::model::{Path, Segment};
use std::collections::HashMap;

fn emit_edge(out: &mut Vec<Segment>, segments: &[Segment], backward: bool) {
    if backward {
        out.extend(segments.iter().map(|s| s.reversed()));
    } else {
        out.extend(segments.iter().copied());
    }
}

/// Boundary of the union of all selected faces, as one segment run. Edges
/// interior to the selection (or exterior on both sides) are dropped, and
/// the walk stitches around them by jumping through their twins.
pub fn walk_faces(dual: &DualGraph, selected: &[bool]) -> Path {
    let removed = |edge_id: usize| {
        let edge = &dual.edges[edge_id];
        selected[edge.face] == selected[dual.edges[edge.twin].face]
    };

    // Next edge along each selected face's boundary cycle.
    let mut next_of: HashMap<usize, usize> = HashMap::new();
    for (face_id, face) in dual.faces.iter().enumerate() {
        if !selected[face_id] {
            continue;
        }
        let mut prev = *face.incident_edges.last().expect("faces have boundaries");
        for &edge_id in &face.incident_edges {
            next_of.insert(prev, edge_id);
            prev = edge_id;
        }
    }

    let mut visited = vec![false; dual.edges.len()];
    let mut out = Vec::new();

    for (face_id, face) in dual.faces.iter().enumerate() {
        if !selected[face_id] {
            continue;
        }
        for &start in &face.incident_edges {
            if removed(start) || visited[start] {
                continue;
            }
            let mut edge_id = start;
            loop {
                let edge = &dual.edges[edge_id];
                emit_edge(&mut out, &edge.segments, edge.backward);
                visited[edge_id] = true;

                edge_id = next_of[&edge_id];
                while removed(edge_id) {
                    edge_id = next_of[&dual.edges[edge_id].twin];
                }
                if edge_id == start {
                    break;
                }
            }
        }
    }

    out
}

/// One path per selected bounded face, each followed by the reversed outer
/// boundaries of the components nested directly inside it (its holes).
pub fn dump_faces(dual: &DualGraph, forest: &[NestingTree], flags: &[u8], predicate: impl Fn(u8) -> bool + Copy) -> Vec<Path> {
    let mut paths = Vec::new();
    for tree in forest {
        visit(dual, tree, flags, predicate, &mut paths);
    }
    paths
}

fn visit(dual: &DualGraph, tree: &NestingTree, flags: &[u8], predicate: impl Fn(u8) -> bool + Copy, paths: &mut Vec<Path>) {
    let component = &dual.components[tree.component];

    for &face_id in &component.faces {
        if face_id == component.outer_face || !predicate(flags[face_id]) {
            continue;
        }

        let mut path = Vec::new();
        for &edge_id in &dual.faces[face_id].incident_edges {
            let edge = &dual.edges[edge_id];
            emit_edge(&mut path, &edge.segments, edge.backward);
        }

        // Poke holes for components nested inside this face.
        if let Some(subtrees) = tree.children.get(&face_id) {
            for subtree in subtrees {
                let sub_outer = dual.components[subtree.component].outer_face;
                for &edge_id in &dual.faces[sub_outer].incident_edges {
                    let edge = &dual.edges[edge_id];
                    emit_edge(&mut path, &edge.segments, edge.backward);
                }
            }
        }

        paths.push(path);
    }

    // Recurse in face-id order so output ordering is reproducible.
    let mut child_faces: Vec<usize> = tree.children.keys().copied().collect();
    child_faces.sort_unstable();
    for face_id in child_faces {
        for subtree in &tree.children[&face_id] {
            visit(dual, subtree, flags, predicate, paths);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::contract::{compute_minor, remove_dangling_edges, sort_outgoing_by_angle};
    use crate::algorithms::faces::compute_dual;
    use crate::algorithms::flags::flag_faces;
    use crate::algorithms::nesting::build_nesting_forest;
    use crate::algorithms::planarize::{build_major_graph, split_at_intersections, TaggedSegment};
    use crate::model::{FillRule, Parents, Vec2};

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::Line(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    fn square(x: f64, y: f64, size: f64, parents: Parents) -> Vec<TaggedSegment> {
        vec![
            (line(x, y, x + size, y), parents),
            (line(x + size, y, x + size, y + size), parents),
            (line(x + size, y + size, x, y + size), parents),
            (line(x, y + size, x, y), parents),
        ]
    }

    fn pipeline(edges: Vec<TaggedSegment>) -> (DualGraph, Vec<NestingTree>, Vec<u8>) {
        let (split, bb) = split_at_intersections(&edges);
        let major = build_major_graph(&split, bb.unwrap());
        let mut minor = compute_minor(&major);
        remove_dangling_edges(&mut minor);
        sort_outgoing_by_angle(&mut minor);
        let dual = compute_dual(&minor).expect("valid arrangement");
        let forest = build_nesting_forest(&dual);
        let flags = flag_faces(&dual, &forest, FillRule::NonZero, FillRule::NonZero);
        (dual, forest, flags)
    }

    fn closed_loops(path: &[Segment]) -> usize {
        // Count maximal runs whose consecutive segments chain end-to-start.
        let mut loops = 0;
        let mut i = 0;
        while i < path.len() {
            let mut j = i;
            while j + 1 < path.len() && path[j].end().approx_eq(path[j + 1].start(), 1e-6) {
                j += 1;
            }
            assert!(
                path[j].end().approx_eq(path[i].start(), 1e-6),
                "boundary run must close on itself"
            );
            loops += 1;
            i = j + 1;
        }
        loops
    }

    #[test]
    fn union_of_overlapping_squares_is_one_loop() {
        let mut edges = square(0.0, 0.0, 10.0, Parents::A);
        edges.extend(square(5.0, 5.0, 10.0, Parents::B));
        let (dual, _, flags) = pipeline(edges);
        let selected: Vec<bool> = flags.iter().map(|&f| f > 0).collect();
        let path = walk_faces(&dual, &selected);
        assert_eq!(path.len(), 8, "each square contributes 2 whole and 2 split sides");
        assert_eq!(closed_loops(&path), 1);
    }

    #[test]
    fn intersection_of_overlapping_squares_is_the_lens() {
        let mut edges = square(0.0, 0.0, 10.0, Parents::A);
        edges.extend(square(5.0, 5.0, 10.0, Parents::B));
        let (dual, _, flags) = pipeline(edges);
        let selected: Vec<bool> = flags.iter().map(|&f| f == 3).collect();
        let path = walk_faces(&dual, &selected);
        assert_eq!(closed_loops(&path), 1);
        // The lens is the square [5,10]x[5,10].
        for seg in &path {
            for p in [seg.start(), seg.end()] {
                assert!((5.0..=10.0).contains(&p.x) && (5.0..=10.0).contains(&p.y), "{p:?}");
            }
        }
    }

    #[test]
    fn empty_selection_walks_nothing() {
        let (dual, _, flags) = pipeline(square(0.0, 0.0, 10.0, Parents::A));
        let selected: Vec<bool> = flags.iter().map(|_| false).collect();
        assert!(walk_faces(&dual, &selected).is_empty());
    }

    #[test]
    fn fracture_of_overlapping_squares_gives_three_faces() {
        let mut edges = square(0.0, 0.0, 10.0, Parents::A);
        edges.extend(square(5.0, 5.0, 10.0, Parents::B));
        let (dual, forest, flags) = pipeline(edges);
        let paths = dump_faces(&dual, &forest, &flags, |f| f > 0);
        assert_eq!(paths.len(), 3, "A-only, B-only, lens");
        for path in &paths {
            assert_eq!(closed_loops(path), 1);
        }
    }

    #[test]
    fn dump_appends_hole_boundaries() {
        let mut edges = square(0.0, 0.0, 30.0, Parents::A);
        edges.extend(square(10.0, 10.0, 10.0, Parents::B));
        let (dual, forest, flags) = pipeline(edges);
        // Select only faces inside A and not inside B: the ring.
        let paths = dump_faces(&dual, &forest, &flags, |f| f == 1);
        assert_eq!(paths.len(), 1);
        // 4 outer sides plus the 4 reversed hole sides.
        assert_eq!(paths[0].len(), 8);
        assert_eq!(closed_loops(&paths[0]), 2);
    }
}
