//! Segment and logical element headers.

use std::io::{Read, Seek};

use super::segment::SegmentKind;
use crate::binary::{CompressionAlgorithm, JtReader};
use crate::util::{Error, Guid, Result};

/// Header at the start of every data segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentHeader {
    pub guid: Guid,
    pub kind: SegmentKind,
    /// Total segment length in bytes, header included.
    pub length: i32,
}

impl SegmentHeader {
    pub fn read<R: Read + Seek>(reader: &mut JtReader<R>) -> Result<Self> {
        let guid = reader.read_guid()?;
        let kind = SegmentKind::from_raw(reader.read_i32()? as u32);
        let length = reader.read_i32()?;
        Ok(Self { guid, kind, length })
    }
}

/// Compression prefix of the first element in a compressible segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompressionHeader {
    pub flag: u32,
    /// Compressed byte count, algorithm tag included.
    pub compressed_length: i32,
    pub algorithm_tag: u8,
}

impl CompressionHeader {
    pub fn read<R: Read + Seek>(reader: &mut JtReader<R>) -> Result<Self> {
        Ok(Self {
            flag: reader.read_u32()?,
            compressed_length: reader.read_i32()?,
            algorithm_tag: reader.read_u8()?,
        })
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.flag > 1
    }

    /// Number of compressed bytes following the algorithm tag.
    pub fn payload_len(&self) -> Result<usize> {
        usize::try_from(self.compressed_length.saturating_sub(1)).map_err(|_| {
            Error::invalid(format!("negative compressed length {}", self.compressed_length))
        })
    }

    /// Algorithm of a compressed block; `offset` locates the tag for errors.
    pub fn algorithm(&self, offset: u64) -> Result<CompressionAlgorithm> {
        CompressionAlgorithm::from_tag(self.algorithm_tag).ok_or(
            Error::UnsupportedCompressionAlgorithm { algorithm: self.algorithm_tag, offset },
        )
    }
}

/// Base type tag carried by every element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectBaseType {
    None,
    BaseGraphNode,
    GroupGraphNode,
    ShapeGraphNode,
    BaseAttribute,
    ShapeLod,
    BaseProperty,
    JtObjectReference,
    JtLateLoadedProperty,
    JtBase,
    Unknown(u8),
}

impl ObjectBaseType {
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            255 => Self::None,
            0 => Self::BaseGraphNode,
            1 => Self::GroupGraphNode,
            2 => Self::ShapeGraphNode,
            3 => Self::BaseAttribute,
            4 => Self::ShapeLod,
            5 => Self::BaseProperty,
            6 => Self::JtObjectReference,
            8 => Self::JtLateLoadedProperty,
            9 => Self::JtBase,
            other => Self::Unknown(other),
        }
    }
}

/// Header preceding each logical element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogicalElementHeader {
    /// Present on the first element of a compressible segment only.
    pub compression: Option<CompressionHeader>,
    /// Byte count from the type GUID to the end of the element.
    pub element_length: i32,
    pub object_type: Guid,
    pub base_type: ObjectBaseType,
    pub object_id: i32,
    /// Absolute position of the type GUID, in the reader that decoded it.
    pub offset: u64,
}

impl LogicalElementHeader {
    /// Position one past the element, when the declared length is usable.
    pub fn end(&self) -> Option<u64> {
        u64::try_from(self.element_length)
            .ok()
            .filter(|len| *len > 0)
            .map(|len| self.offset + len)
    }
}

/// Outcome of reading the fixed part of an element header.
pub enum ElementStart {
    Element(LogicalElementHeader),
    /// The end-of-elements marker; nothing after its GUID was read.
    End,
}

/// Read the length, type GUID, base type and object id of the next element.
pub fn read_element_header<R: Read + Seek>(
    reader: &mut JtReader<R>,
    compression: Option<CompressionHeader>,
) -> Result<ElementStart> {
    let element_length = reader.read_i32()?;
    let offset = reader.position();
    let object_type = reader.read_guid()?;
    if object_type.is_end_of_elements() {
        return Ok(ElementStart::End);
    }
    let base_type = ObjectBaseType::from_raw(reader.read_u8()?);
    let object_id = reader.read_i32()?;
    Ok(ElementStart::Element(LogicalElementHeader {
        compression,
        element_length,
        object_type,
        base_type,
        object_id,
        offset,
    }))
}
