//! Low-level JT byte and bit layer.
//!
//! ## File Structure
//!
//! ```text
//! +---------------------------+
//! | Version string (80 bytes) |  "Version 10.0 JT ..."
//! +---------------------------+
//! | Byte order (u8)           |  1 = big endian
//! | Reserved (i32)            |
//! | TOC offset (i32 / i64)    |  64-bit from JT 10 on
//! | Root LSG segment GUID     |
//! +---------------------------+
//! | Segments ...              |  located through the TOC
//! +---------------------------+
//! | TOC: count (i32)          |
//! |   GUID, offset, length,   |
//! |   attributes              |
//! +---------------------------+
//! ```
//!
//! Every multi-byte field follows the byte order from the header.

mod bit_reader;
pub mod compression;
mod format;
mod reader;

pub use bit_reader::*;
pub use compression::CompressionAlgorithm;
pub use format::*;
pub use reader::*;
