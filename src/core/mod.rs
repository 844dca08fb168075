//! Core layer - identifiers, headers and segment framing.
//!
//! This module provides:
//! - [`ElementKind`] - Object type registry keyed by element GUID
//! - [`SegmentHeader`] / [`LogicalElementHeader`] - Segment and element headers
//! - [`SegmentKind`] / [`Segment`] - Segment classification and decoded segments
//! - [`DecodeContext`] / [`DecodeReport`] - Shared per-decode state

mod context;
mod header;
mod registry;
mod segment;

pub use context::{DecodeContext, DecodeReport, DecodeSummary};
pub use header::{
    read_element_header, CompressionHeader, ElementStart, LogicalElementHeader, ObjectBaseType,
    SegmentHeader,
};
pub use registry::{ElementKind, REGISTRY};
pub use segment::{Segment, SegmentKind};
