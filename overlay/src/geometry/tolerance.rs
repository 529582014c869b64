// Centralized tolerances for the arrangement pipeline.

pub const EPS_POINT: f64 = 1e-6;    // vertex-merge radius
pub const EPS_LINEAR: f64 = 1e-4;   // bbox extent below which a curve is its chord
pub const EPS_PARAM: f64 = 1e-8;    // parameter tolerance for intersection roots

// Denominator guard for near-parallel line pairs.
pub const EPS_COLLINEAR: f64 = f64::MIN_POSITIVE * 64.0;

// Divide-by-zero guard in the cubic self-intersection solve.
pub const EPS_SELF_INTERSECTION: f64 = 1e-12;

#[inline]
pub fn clamp01(x: f64) -> f64 {
    x.max(0.0).min(1.0)
}
