//! Math type re-exports and JT geometric primitives.
//!
//! Vectors, matrices and quaternions come from `glam`; the JT-only
//! aggregates (bounding boxes, count ranges) live here.

pub use glam::{DMat4, DVec3, Mat4, Quat, Vec3, Vec4};

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Axis-aligned single precision box, stored min corner first.
#[derive(Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct BBox3f {
    pub min: Vec3,
    pub max: Vec3,
}

impl BBox3f {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// True when any max component lies below its min.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

impl fmt::Debug for BBox3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox3f({:?} - {:?})", self.min, self.max)
    }
}

/// Inclusive integer range used for vertex/node/polygon counts.
///
/// Not validated: files in the wild carry `min > max` and `-1` placeholders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct CountRange {
    pub min: i32,
    pub max: i32,
}

impl CountRange {
    #[inline]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

/// Build a matrix from sixteen row-major values.
#[inline]
pub fn mat4_from_rows(values: &[f32; 16]) -> Mat4 {
    Mat4::from_cols_array(values).transpose()
}

/// Double precision variant of [`mat4_from_rows`].
#[inline]
pub fn dmat4_from_rows(values: &[f64; 16]) -> DMat4 {
    DMat4::from_cols_array(values).transpose()
}
