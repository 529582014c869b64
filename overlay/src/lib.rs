//! Boolean operations (union, difference, intersection, exclusion, division,
//! fracture) on planar regions described by vector paths of line, quadratic,
//! cubic and elliptic-arc segments, under even-odd or nonzero fill rules.
//!
//! The pipeline builds a planar arrangement of both inputs: segments are
//! split at every intersection, endpoints snapped into shared vertices, the
//! resulting multigraph contracted and dualized into faces, faces arranged
//! into a containment forest and flagged with per-input winding, and the
//! requested combination extracted as filled-region boundaries.

pub mod model;
pub mod geometry {
    pub mod aabb;
    pub mod cubic;
    pub mod intersect;
    pub mod math;
    pub mod segment;
    pub mod tolerance;
}
pub mod quadtree;
pub mod algorithms {
    pub mod boolean;
    pub mod contract;
    pub mod extract;
    pub mod faces;
    pub mod flags;
    pub mod nesting;
    pub mod planarize;
}
pub mod svg;

pub use algorithms::boolean::{path_boolean, BooleanError};
pub use model::{ArcSegment, BoolOp, FillRule, Path, Segment, Vec2};
pub use svg::{
    commands_from_path_data, path_from_commands, path_from_path_data, path_to_commands, path_to_path_data,
    AbsoluteCommand, PathCommand, PathDataError, RelativeCommand,
};
