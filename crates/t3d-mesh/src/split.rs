//! The axis-aligned plane split core (§4.2). One triangle in, zero-to-two
//! triangles per side out. Shared by both `Mesh::split` and `MeshT::split`
//! so the winding-order contract only has to be gotten right once.

use nalgebra::{Vector2, Vector3};
use t3d_math::{classify, cut_edge, Axis, Side, EPS};

/// Up to two output triangles per side, plus whether a genuine cut
/// happened (vs. the collinear fallback, which never counts as a cross).
pub struct SplitTriangle {
    pub left: Vec<[Vector3<f64>; 3]>,
    pub right: Vec<[Vector3<f64>; 3]>,
    pub left_uv: Vec<[Vector2<f64>; 3]>,
    pub right_uv: Vec<[Vector2<f64>; 3]>,
    pub crossed: bool,
}

fn lerp2(a: Vector2<f64>, b: Vector2<f64>, r: f64) -> Vector2<f64> {
    a + (b - a) * r
}

/// Splits a single triangle (`pos`, cyclic order `a,b,c`) by `axis = q`.
/// `uv`, when present, holds the UV assigned to each of the three
/// positions and is interpolated identically to the 3D cut (§4.2 "UV
/// propagation").
pub fn split_triangle(
    axis: Axis,
    q: f64,
    pos: [Vector3<f64>; 3],
    uv: Option<[Vector2<f64>; 3]>,
) -> SplitTriangle {
    let sides = [
        classify(axis, pos[0], q),
        classify(axis, pos[1], q),
        classify(axis, pos[2], q),
    ];
    let left_count = sides.iter().filter(|s| **s == Side::Left).count();

    match left_count {
        3 => SplitTriangle {
            left: vec![pos],
            right: vec![],
            left_uv: uv.map(|u| vec![u]).unwrap_or_default(),
            right_uv: vec![],
            crossed: false,
        },
        0 => SplitTriangle {
            left: vec![],
            right: vec![pos],
            left_uv: vec![],
            right_uv: uv.map(|u| vec![u]).unwrap_or_default(),
            crossed: false,
        },
        2 => {
            // two-left-one-right: the lone Right vertex is the apex.
            let apex = sides.iter().position(|s| *s == Side::Right).unwrap();
            split_two_one(axis, q, pos, uv, apex, Side::Right)
        }
        _ => {
            // two-right-one-left: the lone Left vertex is the apex.
            let apex = sides.iter().position(|s| *s == Side::Left).unwrap();
            split_two_one(axis, q, pos, uv, apex, Side::Left)
        }
    }
}

/// Shared body for the two-left-one-right / two-right-one-left cases.
/// `apex_side` is the side the isolated vertex (`apex`) falls on; the
/// paired vertices are the other two, taken in cyclic order starting
/// right after the apex so winding stays consistent with the input.
fn split_two_one(
    axis: Axis,
    q: f64,
    pos: [Vector3<f64>; 3],
    uv: Option<[Vector2<f64>; 3]>,
    apex: usize,
    apex_side: Side,
) -> SplitTriangle {
    let p1_idx = (apex + 1) % 3;
    let p2_idx = (apex + 2) % 3;
    let v_apex = pos[apex];
    let v1 = pos[p1_idx];
    let v2 = pos[p2_idx];

    // Collinear special case: the two paired vertices both lie within EPS
    // of the plane, so cutting would only carve degenerate slivers off
    // them. Emit the whole triangle, uncut, on the apex's side.
    if (axis.dim(v1) - q).abs() < EPS && (axis.dim(v2) - q).abs() < EPS {
        return match apex_side {
            Side::Right => SplitTriangle {
                left: vec![],
                right: vec![pos],
                left_uv: vec![],
                right_uv: uv.map(|u| vec![u]).unwrap_or_default(),
                crossed: false,
            },
            Side::Left => SplitTriangle {
                left: vec![pos],
                right: vec![],
                left_uv: uv.map(|u| vec![u]).unwrap_or_default(),
                right_uv: vec![],
                crossed: false,
            },
        };
    }

    let (t1, r1) = cut_edge(axis, v_apex, v1, q).expect("non-degenerate by classification");
    let (t2, r2) = cut_edge(axis, v_apex, v2, q).expect("non-degenerate by classification");

    let (uv_t1, uv_t2, uv_apex, uv1, uv2) = match uv {
        Some(u) => {
            let uv_apex = u[apex];
            let uv1 = u[p1_idx];
            let uv2 = u[p2_idx];
            (
                Some(lerp2(uv_apex, uv1, r1)),
                Some(lerp2(uv_apex, uv2, r2)),
                Some(uv_apex),
                Some(uv1),
                Some(uv2),
            )
        }
        None => (None, None, None, None, None),
    };

    // Paired side gets the quad (2 triangles), apex side gets the cap (1
    // triangle), per §4.2's cut-edge construction.
    let quad = vec![[t2, v1, v2], [t2, t1, v1]];
    let cap = vec![[v_apex, t1, t2]];
    let quad_uv = uv.map(|_| vec![[uv_t2.unwrap(), uv1.unwrap(), uv2.unwrap()], [uv_t2.unwrap(), uv_t1.unwrap(), uv1.unwrap()]]);
    let cap_uv = uv.map(|_| vec![[uv_apex.unwrap(), uv_t1.unwrap(), uv_t2.unwrap()]]);

    match apex_side {
        Side::Right => SplitTriangle {
            left: quad,
            right: cap,
            left_uv: quad_uv.unwrap_or_default(),
            right_uv: cap_uv.unwrap_or_default(),
            crossed: true,
        },
        Side::Left => SplitTriangle {
            left: cap,
            right: quad,
            left_uv: cap_uv.unwrap_or_default(),
            right_uv: quad_uv.unwrap_or_default(),
            crossed: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64, z: f64) -> Vector3<f64> {
        Vector3::new(x, y, z)
    }

    #[test]
    fn s1_no_op_split_everything_right() {
        let tri = [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)];
        let result = split_triangle(Axis::X, -1.0, tri, None);
        assert!(result.left.is_empty());
        assert_eq!(result.right.len(), 1);
        assert!(!result.crossed);
    }

    #[test]
    fn s2_cut_one_triangle() {
        let tri = [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)];
        let result = split_triangle(Axis::X, 0.5, tri, None);
        assert!(result.crossed);
        // quad side (two original vertices in x<0.5) yields 2 triangles.
        assert_eq!(result.left.len(), 2);
        // cap side (the isolated x=1 vertex) yields 1 triangle.
        assert_eq!(result.right.len(), 1);
        let cap = result.right[0];
        assert!(cap.iter().any(|p| (p.x - 1.0).abs() < 1e-9));
        let cut_points: Vec<_> = result.left.iter().flatten().chain(result.right.iter().flatten()).collect();
        assert!(cut_points.iter().any(|p| (p.x - 0.5).abs() < 1e-9 && p.y.abs() < 1e-9));
        assert!(cut_points.iter().any(|p| (p.x - 0.5).abs() < 1e-9 && (p.y - 0.5).abs() < 1e-9));
    }

    #[test]
    fn s3_uv_preservation() {
        let tri = [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)];
        let uv = [
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        ];
        let result = split_triangle(Axis::X, 0.5, tri, Some(uv));
        let all_uv: Vec<_> = result.left_uv.iter().flatten().chain(result.right_uv.iter().flatten()).collect();
        assert!(all_uv.iter().any(|p| (p.x - 0.5).abs() < 1e-9 && p.y.abs() < 1e-9));
        assert!(all_uv.iter().any(|p| p.x.abs() < 1e-9 && (p.y - 0.5).abs() < 1e-9));
    }

    #[test]
    fn collinear_case_emits_single_triangle() {
        // Two vertices sit exactly on the plane; only the apex is off it.
        let tri = [v(0.5, 0.0, 0.0), v(0.5, 1.0, 0.0), v(0.0, 0.5, 0.0)];
        let result = split_triangle(Axis::X, 0.5, tri, None);
        assert!(!result.crossed);
        assert_eq!(result.left.len() + result.right.len(), 1);
    }
}
