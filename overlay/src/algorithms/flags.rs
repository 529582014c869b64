//! Winding-flag propagation. A BFS over dual edges carries per-input winding
//! counts outward from each outer face; crossing an edge adjusts the count
//! for every input the edge belongs to, and each face's two-bit flag is the
//! fill rule applied to the counts it was reached with.

use crate::algorithms::faces::DualGraph;
use crate::algorithms::nesting::NestingTree;
use crate::model::{FillRule, Parents};
use std::collections::VecDeque;

/// Flags indexed by face id; bit 0 = inside A, bit 1 = inside B.
pub fn flag_faces(dual: &DualGraph, forest: &[NestingTree], a_fill_rule: FillRule, b_fill_rule: FillRule) -> Vec<u8> {
    let mut flags = vec![0u8; dual.faces.len()];
    let mut visited = vec![false; dual.faces.len()];

    for root in forest {
        // Trees carry the running counts of the face they root in, so an
        // outer face re-enters with its parent's context and reads as
        // outside-both relative to it.
        let mut tree_stack: Vec<(&NestingTree, i32, i32)> = vec![(root, 0, 0)];

        while let Some((tree, entry_a, entry_b)) = tree_stack.pop() {
            let component = &dual.components[tree.component];
            let mut face_queue = VecDeque::new();
            face_queue.push_back((component.outer_face, entry_a, entry_b));

            while let Some((face_id, a_count, b_count)) = face_queue.pop_front() {
                if visited[face_id] {
                    continue;
                }
                visited[face_id] = true;

                flags[face_id] = a_fill_rule.flag(a_count) | (b_fill_rule.flag(b_count) << 1);

                for &edge_id in &dual.faces[face_id].incident_edges {
                    let edge = &dual.edges[edge_id];
                    let step = if edge.backward { -1 } else { 1 };
                    let next_a = a_count + if edge.parents.contains(Parents::A) { step } else { 0 };
                    let next_b = b_count + if edge.parents.contains(Parents::B) { step } else { 0 };
                    face_queue.push_back((dual.edges[edge.twin].face, next_a, next_b));
                }

                if let Some(subtrees) = tree.children.get(&face_id) {
                    for subtree in subtrees {
                        tree_stack.push((subtree, a_count, b_count));
                    }
                }
            }
        }
    }

    flags
}
