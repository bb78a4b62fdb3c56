//! Vector helpers shared by the movement core, physics backend, and demo.
//!
//! Everything here is total: degenerate inputs (zero-length or non-finite
//! vectors) produce the zero vector, never NaN or Inf. Movement code relies
//! on that to turn bad direction data into no-op displacements.

use glam::Vec3;

/// World-space up axis.
pub const UP: Vec3 = Vec3::Y;

/// Returns `v` normalized to unit length, or [`Vec3::ZERO`] if `v` is
/// zero-length or contains non-finite components.
pub fn unit_or_zero(v: Vec3) -> Vec3 {
    if !v.is_finite() {
        return Vec3::ZERO;
    }
    v.normalize_or_zero()
}

/// Drops the vertical component of `v`, leaving motion in the ground plane.
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Projects `v` onto the plane perpendicular to `normal` (wall-tangent
/// projection): removes the component of `v` parallel to the normal.
///
/// `normal` does not need to be unit length; a zero or degenerate normal
/// leaves `v` unchanged.
pub fn project_onto_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let n = unit_or_zero(normal);
    if n == Vec3::ZERO {
        return v;
    }
    v - n * v.dot(n)
}

/// Whether a surface normal is close enough to horizontal to count as a
/// runnable wall: `|dot(up, normal)| < limit`, strict.
///
/// A limit of `0.1` admits walls leaning up to ~5.7° off vertical; exactly
/// `limit` does not qualify.
pub fn near_vertical(normal: Vec3, limit: f32) -> bool {
    UP.dot(normal).abs() < limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_or_zero_normalizes() {
        let v = unit_or_zero(Vec3::new(3.0, 0.0, 4.0));
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!((v.x - 0.6).abs() < 1e-6);
        assert!((v.z - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_unit_or_zero_on_zero_vector_is_zero_not_nan() {
        let v = unit_or_zero(Vec3::ZERO);
        assert_eq!(v, Vec3::ZERO);
        assert!(v.is_finite());
    }

    #[test]
    fn test_unit_or_zero_rejects_non_finite_input() {
        assert_eq!(unit_or_zero(Vec3::new(f32::NAN, 1.0, 0.0)), Vec3::ZERO);
        assert_eq!(unit_or_zero(Vec3::new(f32::INFINITY, 0.0, 0.0)), Vec3::ZERO);
    }

    #[test]
    fn test_horizontal_drops_vertical_component() {
        assert_eq!(horizontal(Vec3::new(1.0, 5.0, -2.0)), Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_plane_projection_removes_normal_component() {
        let v = Vec3::new(3.0, 2.0, 1.0);
        let n = Vec3::new(1.0, 0.0, 0.0);
        let projected = project_onto_plane(v, n);
        assert_eq!(projected, Vec3::new(0.0, 2.0, 1.0));
        assert!(projected.dot(n).abs() < 1e-6);
    }

    #[test]
    fn test_plane_projection_with_unnormalized_normal() {
        let v = Vec3::new(3.0, 2.0, 1.0);
        let projected = project_onto_plane(v, Vec3::new(10.0, 0.0, 0.0));
        assert!((projected - Vec3::new(0.0, 2.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_plane_projection_degenerate_normal_is_identity() {
        let v = Vec3::new(3.0, 2.0, 1.0);
        assert_eq!(project_onto_plane(v, Vec3::ZERO), v);
    }

    #[test]
    fn test_near_vertical_boundary_is_exclusive() {
        // A perfectly vertical wall has a horizontal normal.
        assert!(near_vertical(Vec3::new(1.0, 0.0, 0.0), 0.1));
        // Slightly tilted, still within the limit.
        assert!(near_vertical(unit_or_zero(Vec3::new(1.0, 0.05, 0.0)), 0.1));
        // Exactly at the limit must NOT qualify.
        assert!(!near_vertical(Vec3::new(0.0, 0.1, 0.9949874), 0.1));
        // Floor normal is nowhere near vertical.
        assert!(!near_vertical(UP, 0.1));
    }
}
