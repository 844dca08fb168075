//! Shape and shape LOD segments.
//!
//! Each shape segment carries exactly one element describing the mesh of
//! one level of detail. Topology index lists and hashes are decoded; the
//! vertex coordinate, normal, colour, texture coordinate and flag arrays
//! are not, and are listed in [`UndecodedArrays`] instead.

mod bindings;
mod decode;
mod lod;

pub use bindings::{QuantizationParams, UndecodedArrays, VertexBindings};
pub use decode::{decode_shape, read_shape_lod};
pub use lod::*;

use crate::core::{LogicalElementHeader, SegmentHeader};

/// A decoded shape segment.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSegment {
    pub header: SegmentHeader,
    pub element: LogicalElementHeader,
    pub lod: ShapeLod,
}
