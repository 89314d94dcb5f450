//! WGS-84 geodetic to ECEF and the ENU->ECEF rotation (§4.7/§4.8). Stateless
//! and independently testable, as the spec requires.

use nalgebra::{Matrix4, Vector3};

const WGS84_A: f64 = 6378137.0;
const WGS84_F: f64 = 1.0 / 298.257223563;

#[inline]
fn eccentricity_squared() -> f64 {
    2.0 * WGS84_F - WGS84_F * WGS84_F
}

/// Geodetic (lat, lon, height) in radians/meters converted to ECEF.
pub fn geodetic_to_ecef(lat: f64, lon: f64, height: f64) -> Vector3<f64> {
    let e2 = eccentricity_squared();
    let n = WGS84_A / (1.0 - e2 * lat.sin().powi(2)).sqrt();
    let x = (n + height) * lat.cos() * lon.cos();
    let y = (n + height) * lat.cos() * lon.sin();
    let z = (n * (1.0 - e2) + height) * lat.sin();
    Vector3::new(x, y, z)
}

/// Column-major 4x4 ENU -> ECEF transform rooted at `(lat, lon, height)`,
/// exactly as specified in §4.7: `[east | north | up | translation]` with
/// a trailing `(0,0,0,1)` row. Normative: do not transpose to row-major.
pub fn enu_to_ecef_matrix(lat: f64, lon: f64, height: f64) -> Matrix4<f64> {
    let translation = geodetic_to_ecef(lat, lon, height);

    let east = Vector3::new(-lon.sin(), lon.cos(), 0.0);
    let north = Vector3::new(
        -lat.sin() * lon.cos(),
        -lat.sin() * lon.sin(),
        lat.cos(),
    );
    let up = Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin());

    // nalgebra's `Matrix4::new` takes arguments in row-major order; we lay
    // the columns out explicitly so the resulting storage is the
    // column-major matrix the spec demands.
    Matrix4::new(
        east.x, north.x, up.x, translation.x,
        east.y, north.y, up.y, translation.y,
        east.z, north.z, up.z, translation.z,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Flattens a `Matrix4<f64>` into the 16-number column-major array a
/// tileset.json `transform` field expects.
pub fn matrix_to_column_major_array(m: &Matrix4<f64>) -> [f64; 16] {
    let mut out = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            out[col * 4 + row] = m[(row, col)];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn ecef_matrix_maps_origin_to_translation() {
        let lat = 0.4;
        let lon = -1.1;
        let height = 120.0;
        let m = enu_to_ecef_matrix(lat, lon, height);
        let translation = geodetic_to_ecef(lat, lon, height);
        let origin = m.transform_point(&nalgebra::Point3::origin());
        assert!((origin.x - translation.x).abs() < 1e-6);
        assert!((origin.y - translation.y).abs() < 1e-6);
        assert!((origin.z - translation.z).abs() < 1e-6);
    }

    #[test]
    fn ecef_at_equator_prime_meridian() {
        // S6: lat=0, lon=0, h=0 -> translation = (a, 0, 0); basis = east,north,up.
        let m = enu_to_ecef_matrix(0.0, 0.0, 0.0);
        let arr = matrix_to_column_major_array(&m);
        assert!((arr[12] - WGS84_A).abs() < 1e-3);
        assert!(arr[13].abs() < 1e-9);
        assert!(arr[14].abs() < 1e-9);

        // east = (0,1,0), north = (0,0,1), up = (1,0,0)
        assert!((arr[0] - 0.0).abs() < 1e-12 && (arr[1] - 1.0).abs() < 1e-12 && (arr[2] - 0.0).abs() < 1e-12);
        assert!((arr[4] - 0.0).abs() < 1e-12 && (arr[5] - 0.0).abs() < 1e-12 && (arr[6] - 1.0).abs() < 1e-12);
        assert!((arr[8] - 1.0).abs() < 1e-12 && (arr[9] - 0.0).abs() < 1e-12 && (arr[10] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn ecef_at_north_pole() {
        let ecef = geodetic_to_ecef(FRAC_PI_2, 0.0, 0.0);
        assert!(ecef.x.abs() < 1e-6);
        assert!(ecef.y.abs() < 1e-6);
        assert!(ecef.z > 6_356_000.0 && ecef.z < 6_357_000.0);
    }
}
