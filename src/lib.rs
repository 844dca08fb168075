//! # JT
//!
//! Rust decoder for the JT (.jt) lightweight 3D CAD visualization format,
//! versions 8 through 10.
//!
//! Reads the file header and table of contents, then decodes logical scene
//! graph segments (assembly nodes, attributes and properties) and shape LOD
//! segments (mesh topology packets) into immutable in-memory values.
//!
//! ## Modules
//!
//! - [`util`] - Errors, GUIDs and math types
//! - [`binary`] - Byte and bit readers, header constants, decompression
//! - [`codec`] - Compressed data packets (null, bit-length, arithmetic framing)
//! - [`core`] - Element type registry, headers, segment kinds, decode report
//! - [`lsg`] - Logical scene graph segments
//! - [`shape`] - Shape LOD segments
//! - [`file`] - High-level API ([`JtFile`], [`LoadOptions`])
//!
//! ## Example
//!
//! ```ignore
//! use jt::prelude::*;
//!
//! let file = JtFile::open("assembly.jt")?;
//! let lsg = file.root_segment().and_then(Segment::as_scene_graph).unwrap();
//!
//! for element in &lsg.elements {
//!     println!("{} {}", element.object_id(), element.kind());
//! }
//! ```

pub mod util;
pub mod binary;
pub mod codec;
pub mod core;
pub mod lsg;
pub mod shape;
pub mod file;

#[cfg(test)]
mod test_util;

// Re-export commonly used types
pub use util::{Error, Guid, Result};
pub use file::{JtFile, LoadOptions};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{BBox3f, CountRange, Error, Guid, Result};
    pub use crate::binary::ByteOrder;
    pub use crate::core::{DecodeSummary, ElementKind, Segment, SegmentKind};
    pub use crate::file::{JtFile, LoadOptions, Toc, TocEntry};
    pub use crate::lsg::{ElementData, GraphElement, SceneGraphSegment};
    pub use crate::shape::{ShapeLod, ShapeSegment};
}
