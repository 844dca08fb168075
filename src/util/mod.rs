//! Utility types shared by every layer of the decoder.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`Guid`] - 128-bit object and segment identifiers
//! - Math re-exports from glam plus [`BBox3f`] and [`CountRange`]

mod error;
mod guid;
mod math;

pub use error::*;
pub use guid::*;
pub use math::*;
