//! Geometry primitives (C1) and the WGS-84/ECEF transform (C8).

pub mod aabb;
pub mod axis;
pub mod ecef;

pub use aabb::Box3;
pub use axis::{classify, cut_edge, Axis, Side, EPS};
