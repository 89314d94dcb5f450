//! Per-axis cut utilities (§4.1): `dim(v)` picks the coordinate a split
//! plane compares against, `cut_edge` finds where a segment crosses that
//! plane. Kept as a tiny free-standing module rather than methods on
//! `Box3`, mirroring the teacher's preference for small focused modules
//! under `fyrox-math/src/` (`plane.rs`, `segment.rs`, `ray.rs` are each a
//! handful of free functions plus a type, not one mega-impl).

use nalgebra::Vector3;

pub const EPS: f64 = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Coordinate of `v` along this axis.
    #[inline]
    pub fn dim(self, v: Vector3<f64>) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Where segment `a -> b` crosses `axis = q`, and the parametric ratio `r`
/// along the segment at that crossing. `None` when the edge is degenerate
/// with respect to the plane (`|dim(a) - dim(b)| < EPS`), per §4.1.
pub fn cut_edge(axis: Axis, a: Vector3<f64>, b: Vector3<f64>, q: f64) -> Option<(Vector3<f64>, f64)> {
    let da = axis.dim(a);
    let db = axis.dim(b);
    if (da - db).abs() < EPS {
        return None;
    }
    let r = (q - da) / (db - da);
    Some((a + (b - a) * r, r))
}

/// Split-side classification used by C2: strict inequality so points
/// exactly on the plane go right, per §4.1.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[inline]
pub fn classify(axis: Axis, v: Vector3<f64>, q: f64) -> Side {
    if axis.dim(v) < q {
        Side::Left
    } else {
        Side::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cut_edge_midpoint() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 0.0, 0.0);
        let (p, r) = cut_edge(Axis::X, a, b, 0.5).unwrap();
        assert!((p.x - 0.5).abs() < 1e-12);
        assert!((r - 0.5).abs() < 1e-12);
    }

    #[test]
    fn cut_edge_degenerate_returns_none() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(1.0 + 1e-9, 2.0, 3.0);
        assert!(cut_edge(Axis::X, a, b, 1.0).is_none());
    }

    #[test]
    fn classify_on_plane_goes_right() {
        assert_eq!(classify(Axis::X, Vector3::new(1.0, 0.0, 0.0), 1.0), Side::Right);
        assert_eq!(
            classify(Axis::X, Vector3::new(0.999, 0.0, 0.0), 1.0),
            Side::Left
        );
    }
}
