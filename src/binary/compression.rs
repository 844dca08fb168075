//! Decompression of element blocks.
//!
//! Compressible segments may store their element list as a single ZLIB
//! (JT 8/9) or LZMA (JT 10) block. The compressed bytes are inflated into
//! an owned buffer that a fresh reader then walks.

use std::io::Read;
use flate2::read::ZlibDecoder;

use crate::util::{Error, Result};

/// Magic bytes of an `.xz` container.
const XZ_MAGIC: [u8; 6] = [0xfd, b'7', b'z', b'X', b'Z', 0x00];

/// Algorithm tag of a compressed element block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CompressionAlgorithm {
    None = 1,
    Zlib = 2,
    Lzma = 3,
}

impl CompressionAlgorithm {
    #[inline]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::None),
            2 => Some(Self::Zlib),
            3 => Some(Self::Lzma),
            _ => None,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Zlib => "zlib",
            Self::Lzma => "lzma",
        }
    }
}

/// Inflate `data` with the given algorithm.
///
/// `None` copies the input through unchanged.
pub fn decompress(data: &[u8], algorithm: CompressionAlgorithm) -> Result<Vec<u8>> {
    match algorithm {
        CompressionAlgorithm::None => Ok(data.to_vec()),
        CompressionAlgorithm::Zlib => {
            let mut out = Vec::with_capacity(data.len().saturating_mul(4));
            ZlibDecoder::new(data)
                .read_to_end(&mut out)
                .map_err(|e| Error::Decompression {
                    algorithm: algorithm.name(),
                    message: e.to_string(),
                })?;
            Ok(out)
        }
        CompressionAlgorithm::Lzma => {
            let mut out = Vec::with_capacity(data.len().saturating_mul(4));
            let mut input = data;
            let result = if data.starts_with(&XZ_MAGIC) {
                lzma_rs::xz_decompress(&mut input, &mut out)
            } else {
                lzma_rs::lzma_decompress(&mut input, &mut out)
            };
            result.map_err(|e| Error::Decompression {
                algorithm: algorithm.name(),
                message: e.to_string(),
            })?;
            Ok(out)
        }
    }
}
