//! Boolean operations on filled paths: combine two inputs into one planar
//! arrangement, classify every face against both fills, then extract the
//! faces the operation selects.

use crate::algorithms::contract::{compute_minor, remove_dangling_edges, sort_outgoing_by_angle};
use crate::algorithms::extract::{dump_faces, walk_faces};
use crate::algorithms::faces::compute_dual;
use crate::algorithms::flags::flag_faces;
use crate::algorithms::nesting::build_nesting_forest;
use crate::algorithms::planarize::{build_major_graph, split_at_intersections, split_at_self_intersections, TaggedSegment};
use crate::model::{BoolOp, FillRule, Parents, Path};
use log::debug;
use thiserror::Error;

/// Failure of the arrangement itself. Numeric degeneracies never error; this
/// only fires when a component's faces cannot be classified at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BooleanError {
    #[error("component has more than one unbounded face")]
    MultipleOuterFaces,
    #[error("component has no unbounded face")]
    NoOuterFace,
}

impl BoolOp {
    /// Face-selection predicate over the two-bit flag (bit 0 = inside A,
    /// bit 1 = inside B).
    pub fn selects(self, flag: u8) -> bool {
        match self {
            BoolOp::Union => flag > 0,
            BoolOp::Difference => flag == 1,
            BoolOp::Intersection => flag == 0b11,
            BoolOp::Exclusion => flag == 1 || flag == 2,
            BoolOp::Division => flag & 1 == 1,
            BoolOp::Fracture => flag > 0,
        }
    }
}

/// Compute the boolean combination of two filled paths.
///
/// Union, difference, intersection and exclusion return a single path whose
/// sub-path boundaries are implicit (consumers re-derive moves from the
/// gaps). Division and fracture return one path per selected face, with
/// enclosed hole boundaries appended. An empty arrangement returns no paths.
pub fn path_boolean(a: &Path, a_fill_rule: FillRule, b: &Path, b_fill_rule: FillRule, op: BoolOp) -> Result<Vec<Path>, BooleanError> {
    let mut unsplit: Vec<TaggedSegment> = a
        .iter()
        .map(|seg| (*seg, Parents::A))
        .chain(b.iter().map(|seg| (*seg, Parents::B)))
        .collect();

    split_at_self_intersections(&mut unsplit);

    let (split_edges, bounding_box) = split_at_intersections(&unsplit);
    let bounding_box = match bounding_box {
        Some(bb) => bb,
        None => return Ok(Vec::new()),
    };
    debug!("split {} input segments into {} edges", a.len() + b.len(), split_edges.len());

    let major = build_major_graph(&split_edges, bounding_box);
    debug!("major graph: {} vertices, {} directed edges", major.vertices.len(), major.edges.len());

    let mut minor = compute_minor(&major);
    remove_dangling_edges(&mut minor);
    sort_outgoing_by_angle(&mut minor);
    debug!(
        "minor graph: {} chains, {} cycles after pruning",
        minor.live_edges().count(),
        minor.cycles.len()
    );

    #[cfg(debug_assertions)]
    for (edge_id, edge) in minor.live_edges() {
        debug_assert!(minor.vertices[edge.ends[0]].is_some(), "edge {edge_id} lost its start vertex");
        debug_assert!(minor.vertices[edge.ends[1]].is_some(), "edge {edge_id} lost its end vertex");
        let twin = edge.twin.expect("minor edges are twinned");
        let twin_edge = minor.edges[twin].as_ref().expect("twin must be live");
        debug_assert_eq!(twin_edge.twin, Some(edge_id), "twin relation must be symmetric");
    }

    let dual = compute_dual(&minor)?;
    debug!("dual graph: {} faces in {} components", dual.faces.len(), dual.components.len());

    let forest = build_nesting_forest(&dual);
    let flags = flag_faces(&dual, &forest, a_fill_rule, b_fill_rule);

    match op {
        BoolOp::Division | BoolOp::Fracture => Ok(dump_faces(&dual, &forest, &flags, |flag| op.selects(flag))),
        _ => {
            let selected: Vec<bool> = flags.iter().map(|&flag| op.selects(flag)).collect();
            Ok(vec![walk_faces(&dual, &selected)])
        }
    }
}
