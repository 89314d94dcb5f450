//! Axis-aligned bounding box (§4.1). Adapted from the teacher's
//! `AxisAlignedBoundingBox` (`fyrox-math/src/aabb.rs`): same method set
//! (`from_min_max`, `add_point`, `center`, `is_valid`, ...), `f64` instead
//! of `f32` because this pipeline does CPU-side geodetic math rather than
//! feeding a GPU, and `expand` in place of the teacher's `add_point`/
//! `add_box` pair collapsed into one overloaded entry point via `Into`.

use nalgebra::Vector3;

/// Something that can grow a [`Box3`]: a point or another box.
pub enum Expansion {
    Point(Vector3<f64>),
    Box(Box3),
}

impl From<Vector3<f64>> for Expansion {
    fn from(p: Vector3<f64>) -> Self {
        Expansion::Point(p)
    }
}

impl From<Box3> for Expansion {
    fn from(b: Box3) -> Self {
        Expansion::Box(b)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Box3 {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl Default for Box3 {
    #[inline]
    fn default() -> Self {
        Self {
            min: Vector3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Vector3::new(-f64::MAX, -f64::MAX, -f64::MAX),
        }
    }
}

impl Box3 {
    #[inline]
    pub const fn from_min_max(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_point(point: Vector3<f64>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    #[inline]
    pub fn from_points(points: &[Vector3<f64>]) -> Self {
        let mut aabb = Box3::default();
        for p in points {
            aabb.expand(*p);
        }
        aabb
    }

    /// Grows the box to include a point or another box. Mirrors the
    /// teacher's `add_point`/`add_box`, merged into one method per
    /// §4.1's `expand(point|box)`.
    #[inline]
    pub fn expand(&mut self, what: impl Into<Expansion>) {
        match what.into() {
            Expansion::Point(p) => {
                self.min.x = self.min.x.min(p.x);
                self.min.y = self.min.y.min(p.y);
                self.min.z = self.min.z.min(p.z);
                self.max.x = self.max.x.max(p.x);
                self.max.y = self.max.y.max(p.y);
                self.max.z = self.max.z.max(p.z);
            }
            Expansion::Box(b) => {
                self.expand(b.min);
                self.expand(b.max);
            }
        }
    }

    #[inline]
    pub fn center(&self) -> Vector3<f64> {
        (self.max + self.min).scale(0.5)
    }

    #[inline]
    pub fn extents(&self) -> Vector3<f64> {
        self.max - self.min
    }

    #[inline]
    pub fn half_extents(&self) -> Vector3<f64> {
        self.extents().scale(0.5)
    }

    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.extents().norm()
    }

    /// min <= max on every axis and at least one axis is non-degenerate,
    /// per §4.1.
    #[inline]
    pub fn is_valid(&self) -> bool {
        let ok = self.max.x >= self.min.x && self.max.y >= self.min.y && self.max.z >= self.min.z;
        let non_degenerate =
            self.max.x > self.min.x || self.max.y > self.min.y || self.max.z > self.min.z;
        ok && non_degenerate
    }

    #[inline]
    pub fn contains_point(&self, p: Vector3<f64>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Splits this box into `2^level` cells per axis, returning the cell
    /// at `(x, y, z)`. Used by the Grid tiling strategy (§4.6).
    pub fn grid_cell(&self, level: u32, x: u32, y: u32, z: u32) -> Box3 {
        let divisions = 1u32 << level;
        let extents = self.extents();
        let cell = Vector3::new(
            extents.x / divisions as f64,
            extents.y / divisions as f64,
            extents.z / divisions as f64,
        );
        let min = Vector3::new(
            self.min.x + cell.x * x as f64,
            self.min.y + cell.y * y as f64,
            self.min.z + cell.z * z as f64,
        );
        Box3::from_min_max(min, min + cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_by_point_grows_bounds() {
        let mut b = Box3::from_point(Vector3::new(0.0, 0.0, 0.0));
        b.expand(Vector3::new(1.0, -1.0, 2.0));
        assert_eq!(b.min, Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(b.max, Vector3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn center_and_half_extents() {
        let b = Box3::from_min_max(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(3.0, 1.0, 1.0));
        assert_eq!(b.center(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(b.half_extents(), Vector3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn is_valid_rejects_degenerate_box() {
        let degenerate = Box3::from_point(Vector3::new(1.0, 1.0, 1.0));
        assert!(!degenerate.is_valid());
        let valid = Box3::from_min_max(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(valid.is_valid());
    }

    #[test]
    fn grid_cell_covers_expected_region() {
        let root = Box3::from_min_max(Vector3::new(0.0, 0.0, 0.0), Vector3::new(4.0, 4.0, 4.0));
        let cell = root.grid_cell(1, 1, 0, 0);
        assert_eq!(cell.min, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(cell.max, Vector3::new(4.0, 2.0, 2.0));
    }
}
