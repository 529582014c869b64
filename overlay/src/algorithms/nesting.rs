//! Containment forest over the dual components. Parent-child means "the
//! child component sits inside some bounded face of the parent".

use crate::algorithms::faces::DualGraph;
use crate::geometry::intersect::segment_horizontal_ray_crossings;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct NestingTree {
    /// index into `DualGraph::components`
    pub component: usize,
    /// bounded face of this component -> subtrees sitting inside it
    pub children: HashMap<usize, Vec<NestingTree>>,
}

/// Which bounded face of component `b` enclosed component `a`, if any.
/// Probes one boundary point of `a` with a horizontal ray against every
/// boundary of `b`'s bounded faces; an odd crossing count means inside.
/// A tangent boundary that meets the ray without crossing can miscount;
/// that limitation is inherited from the ray test itself.
fn enclosing_face(dual: &DualGraph, a: usize, b: usize) -> Option<usize> {
    let a_comp = &dual.components[a];
    let b_comp = &dual.components[b];
    let probe = dual.edges[a_comp.edges[0]].segments[0].start();

    for &face_id in &b_comp.faces {
        if face_id == b_comp.outer_face {
            continue;
        }
        let mut count = 0;
        for &edge_id in &dual.faces[face_id].incident_edges {
            for seg in &dual.edges[edge_id].segments {
                count += segment_horizontal_ray_crossings(seg, probe);
            }
        }
        if count % 2 == 1 {
            return Some(face_id);
        }
    }
    None
}

fn insert_component(dual: &DualGraph, trees: &mut Vec<NestingTree>, component: usize) {
    for tree in trees.iter_mut() {
        if let Some(face_id) = enclosing_face(dual, component, tree.component) {
            if let Some(children) = tree.children.get_mut(&face_id) {
                insert_component(dual, children, component);
            } else {
                tree.children.insert(
                    face_id,
                    vec![NestingTree {
                        component,
                        children: HashMap::new(),
                    }],
                );
            }
            return;
        }
    }

    // Not inside any existing tree: new root, absorbing roots it encloses.
    let mut new_tree = NestingTree {
        component,
        children: HashMap::new(),
    };

    let mut i = 0;
    while i < trees.len() {
        if let Some(face_id) = enclosing_face(dual, trees[i].component, new_tree.component) {
            let absorbed = trees.remove(i);
            new_tree.children.entry(face_id).or_default().push(absorbed);
        } else {
            i += 1;
        }
    }

    trees.push(new_tree);
}

/// Arrange all components into the containment forest.
pub fn build_nesting_forest(dual: &DualGraph) -> Vec<NestingTree> {
    let mut trees = Vec::new();
    for component in 0..dual.components.len() {
        insert_component(dual, &mut trees, component);
    }
    trees
}
