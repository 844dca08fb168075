//! Endianness-aware primitive reader.
//!
//! Every multi-byte JT field follows the byte order announced in the file
//! header. [`JtReader`] wraps any seekable byte source, tracks its own
//! absolute position (so errors can name the failing offset) and decodes
//! the composite JT primitives on top of the plain integers and floats.

use std::io::{self, Cursor, Read, Seek, SeekFrom};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use super::compression::{self, CompressionAlgorithm};
use super::format::{is_modern, ByteOrder};
use crate::util::{
    dmat4_from_rows, mat4_from_rows, BBox3f, CountRange, DMat4, Error, Guid, Mat4, Quat, Result,
    Vec3, Vec4,
};

/// Upper bound on elements reserved ahead of a counted read.
const MAX_PREALLOC: usize = 1 << 16;

macro_rules! read_num {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $size:expr) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self) -> Result<$ty> {
            let result = match self.order {
                ByteOrder::Little => self.inner.$name::<LittleEndian>(),
                ByteOrder::Big => self.inner.$name::<BigEndian>(),
            };
            let value = result.map_err(|e| self.read_error(e, $size))?;
            self.pos += $size;
            Ok(value)
        }
    };
}

/// Primitive reader over a seekable byte source.
pub struct JtReader<R> {
    inner: R,
    order: ByteOrder,
    pos: u64,
}

impl<R: Read + Seek> JtReader<R> {
    /// Wrap a source positioned at offset 0.
    pub fn new(inner: R, order: ByteOrder) -> Self {
        Self { inner, order, pos: 0 }
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Switch byte order; used once the header flag has been read.
    #[inline]
    pub fn set_byte_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Current absolute byte position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn seek(&mut self, pos: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: u64) -> Result<()> {
        self.seek(self.pos + n)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_error(&self, e: io::Error, requested: usize) -> Error {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::OutOfData { offset: self.pos, requested }
        } else {
            Error::Io(e)
        }
    }

    // ========================================================================
    // Scalars
    // ========================================================================

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self.inner.read_u8().map_err(|e| self.read_error(e, 1))?;
        self.pos += 1;
        Ok(value)
    }

    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    read_num!(read_u16, u16, 2);
    read_num!(read_i16, i16, 2);
    read_num!(read_u32, u32, 4);
    read_num!(read_i32, i32, 4);
    read_num!(read_u64, u64, 8);
    read_num!(read_i64, i64, 8);
    read_num!(read_f32, f32, 4);
    read_num!(read_f64, f64, 8);

    /// Read exactly `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(n.min(MAX_PREALLOC * 16));
        (&mut self.inner).take(n as u64).read_to_end(&mut buf)?;
        if buf.len() < n {
            return Err(Error::OutOfData { offset: self.pos + buf.len() as u64, requested: n - buf.len() });
        }
        self.pos += n as u64;
        Ok(buf)
    }

    /// Fill `buf` completely.
    pub fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf).map_err(|e| self.read_error(e, buf.len()))?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    /// Element version field: `u8` from JT 10 on, `i16` before (truncated).
    #[inline]
    pub fn read_version(&mut self, major: u32) -> Result<u8> {
        if is_modern(major) {
            self.read_u8()
        } else {
            Ok(self.read_i16()? as u8)
        }
    }

    // ========================================================================
    // Strings and identifiers
    // ========================================================================

    /// Fixed-width single-byte string (the 80-byte version header).
    pub fn read_fixed_string(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Multi-byte string: `i32` code-unit count followed by UTF-16 units.
    pub fn read_mb_string(&mut self) -> Result<String> {
        let n = self.read_count()?;
        let units = self.read_array(n, Self::read_u16)?;
        Ok(String::from_utf16_lossy(&units))
    }

    pub fn read_guid(&mut self) -> Result<Guid> {
        let data1 = self.read_u32()?;
        let data2 = self.read_u16()?;
        let data3 = self.read_u16()?;
        let mut data4 = [0u8; 8];
        self.read_exact_into(&mut data4)?;
        Ok(Guid::new(data1, data2, data3, data4))
    }

    // ========================================================================
    // Geometric primitives
    // ========================================================================

    pub fn read_coord_f32(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    /// Direction vector; same layout as a coordinate.
    #[inline]
    pub fn read_dir_f32(&mut self) -> Result<Vec3> {
        self.read_coord_f32()
    }

    /// Bounding box, min corner first.
    pub fn read_bbox_f32(&mut self) -> Result<BBox3f> {
        let min = self.read_coord_f32()?;
        let max = self.read_coord_f32()?;
        Ok(BBox3f::new(min, max))
    }

    pub fn read_rgb(&mut self) -> Result<Vec3> {
        self.read_coord_f32()
    }

    pub fn read_rgba(&mut self) -> Result<Vec4> {
        Ok(Vec4::new(self.read_f32()?, self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    /// Plane as `(a, b, c, d)` of `ax + by + cz + d = 0`.
    #[inline]
    pub fn read_plane_f32(&mut self) -> Result<Vec4> {
        self.read_rgba()
    }

    /// Quaternion stored x, y, z, w.
    pub fn read_quaternion(&mut self) -> Result<Quat> {
        let v = self.read_rgba()?;
        Ok(Quat::from_xyzw(v.x, v.y, v.z, v.w))
    }

    /// 4x4 matrix stored row-major.
    pub fn read_mx4_f32(&mut self) -> Result<Mat4> {
        let mut values = [0.0f32; 16];
        for v in &mut values {
            *v = self.read_f32()?;
        }
        Ok(mat4_from_rows(&values))
    }

    pub fn read_mx4_f64(&mut self) -> Result<DMat4> {
        let mut values = [0.0f64; 16];
        for v in &mut values {
            *v = self.read_f64()?;
        }
        Ok(dmat4_from_rows(&values))
    }

    pub fn read_count_range(&mut self) -> Result<CountRange> {
        Ok(CountRange::new(self.read_i32()?, self.read_i32()?))
    }

    // ========================================================================
    // Vectors
    // ========================================================================

    /// Non-negative `i32` element count.
    pub fn read_count(&mut self) -> Result<usize> {
        let at = self.pos;
        let n = self.read_i32()?;
        usize::try_from(n)
            .map_err(|_| Error::invalid(format!("negative element count {} at byte {}", n, at)))
    }

    /// Read `n` items with `f` without a length prefix.
    pub fn read_array<T>(
        &mut self,
        n: usize,
        mut f: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut out = Vec::with_capacity(n.min(MAX_PREALLOC));
        for _ in 0..n {
            out.push(f(self)?);
        }
        Ok(out)
    }

    pub fn read_i32_array(&mut self, n: usize) -> Result<Vec<i32>> {
        self.read_array(n, Self::read_i32)
    }

    pub fn read_u32_array(&mut self, n: usize) -> Result<Vec<u32>> {
        self.read_array(n, Self::read_u32)
    }

    pub fn read_vec_i16(&mut self) -> Result<Vec<i16>> {
        let n = self.read_count()?;
        self.read_array(n, Self::read_i16)
    }

    pub fn read_vec_u16(&mut self) -> Result<Vec<u16>> {
        let n = self.read_count()?;
        self.read_array(n, Self::read_u16)
    }

    pub fn read_vec_i32(&mut self) -> Result<Vec<i32>> {
        let n = self.read_count()?;
        self.read_i32_array(n)
    }

    pub fn read_vec_u32(&mut self) -> Result<Vec<u32>> {
        let n = self.read_count()?;
        self.read_u32_array(n)
    }

    pub fn read_vec_f32(&mut self) -> Result<Vec<f32>> {
        let n = self.read_count()?;
        self.read_array(n, Self::read_f32)
    }

    pub fn read_vec_f64(&mut self) -> Result<Vec<f64>> {
        let n = self.read_count()?;
        self.read_array(n, Self::read_f64)
    }

    // ========================================================================
    // Compression
    // ========================================================================

    /// Inflate the next `len` bytes into a new reader with the same byte order.
    ///
    /// The caller walks the returned reader for the rest of the element
    /// list; this reader is left just past the compressed block.
    pub fn decompress(
        &mut self,
        len: usize,
        algorithm: CompressionAlgorithm,
    ) -> Result<JtReader<Cursor<Vec<u8>>>> {
        let at = self.pos;
        let packed = self.read_bytes(len)?;
        let data = compression::decompress(&packed, algorithm)?;
        tracing::trace!(
            offset = at,
            packed = len,
            inflated = data.len(),
            algorithm = algorithm.name(),
            "inflated element block"
        );
        Ok(JtReader::new(Cursor::new(data), self.order))
    }
}
