use crate::model::Vec2;

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

// Map x from [x0, x1] to [y0, y1].
#[inline]
pub fn lin_map(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    y0 + (x - x0) / (x1 - x0) * (y1 - y0)
}

/// Signed angle from `u` to `v`, in (-pi, pi].
pub fn vector_angle(u: Vec2, v: Vec2) -> f64 {
    let sign = if u.x * v.y - u.y * v.x < 0.0 { -1.0 } else { 1.0 };
    let denom = u.length() * v.length();
    if denom == 0.0 {
        return 0.0;
    }
    let cos = (u.dot(v) / denom).clamp(-1.0, 1.0);
    sign * cos.acos()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec2(x: f64, y: f64) -> Vec2 {
        Vec2 { x, y }
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn angle_signs() {
        let right = vec2(1.0, 0.0);
        let up = vec2(0.0, -1.0);
        let down = vec2(0.0, 1.0);
        // y grows downward, so "down" is a positive quarter turn
        assert!((vector_angle(right, down) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((vector_angle(right, up) + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn angle_degenerate_vector_is_zero() {
        assert_eq!(vector_angle(vec2(0.0, 0.0), vec2(1.0, 0.0)), 0.0);
    }
}
