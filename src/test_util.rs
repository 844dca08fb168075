//! Byte and bit stream builders for unit tests.

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::binary::ByteOrder;
use crate::util::{Guid, Vec3, Vec4};

macro_rules! write_num {
    ($name:ident, $ty:ty) => {
        pub fn $name(&mut self, v: $ty) -> &mut Self {
            match self.order {
                ByteOrder::Little => self.buf.$name::<LittleEndian>(v).unwrap(),
                ByteOrder::Big => self.buf.$name::<BigEndian>(v).unwrap(),
            }
            self
        }
    };
}

/// Builds little- or big-endian fixtures field by field.
pub struct ByteWriter {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl ByteWriter {
    pub fn new(order: ByteOrder) -> Self {
        Self { buf: Vec::new(), order }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    write_num!(write_u16, u16);
    write_num!(write_i16, i16);
    write_num!(write_u32, u32);
    write_num!(write_i32, i32);
    write_num!(write_u64, u64);
    write_num!(write_i64, i64);
    write_num!(write_f32, f32);
    write_num!(write_f64, f64);

    pub fn u16(&mut self, v: u16) -> &mut Self { self.write_u16(v) }
    pub fn i16(&mut self, v: i16) -> &mut Self { self.write_i16(v) }
    pub fn u32(&mut self, v: u32) -> &mut Self { self.write_u32(v) }
    pub fn i32(&mut self, v: i32) -> &mut Self { self.write_i32(v) }
    pub fn u64(&mut self, v: u64) -> &mut Self { self.write_u64(v) }
    pub fn i64(&mut self, v: i64) -> &mut Self { self.write_i64(v) }
    pub fn f32(&mut self, v: f32) -> &mut Self { self.write_f32(v) }
    pub fn f64(&mut self, v: f64) -> &mut Self { self.write_f64(v) }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Element version field in the width the given major version uses.
    pub fn version(&mut self, major: u32, v: u8) -> &mut Self {
        if major >= 10 {
            self.u8(v)
        } else {
            self.i16(i16::from(v))
        }
    }

    pub fn guid(&mut self, g: &Guid) -> &mut Self {
        self.u32(g.data1).u16(g.data2).u16(g.data3).raw(&g.data4)
    }

    pub fn mb_string(&mut self, s: &str) -> &mut Self {
        let units: Vec<u16> = s.encode_utf16().collect();
        self.i32(units.len() as i32);
        for u in units {
            self.u16(u);
        }
        self
    }

    pub fn vec_i32(&mut self, values: &[i32]) -> &mut Self {
        self.i32(values.len() as i32);
        for v in values {
            self.i32(*v);
        }
        self
    }

    pub fn coord(&mut self, v: Vec3) -> &mut Self {
        self.f32(v.x).f32(v.y).f32(v.z)
    }

    pub fn rgba(&mut self, v: Vec4) -> &mut Self {
        self.f32(v.x).f32(v.y).f32(v.z).f32(v.w)
    }

    /// One logical element: length, type, base type, object id, body and `padding` zero bytes.
    pub fn element(
        &mut self,
        ty: &Guid,
        base_type: u8,
        object_id: i32,
        body: &[u8],
        padding: usize,
    ) -> &mut Self {
        let len = Guid::SIZE + 1 + 4 + body.len() + padding;
        self.i32(len as i32).guid(ty).u8(base_type).i32(object_id).raw(body);
        self.buf.resize(self.buf.len() + padding, 0);
        self
    }

    pub fn end_of_elements(&mut self) -> &mut Self {
        self.i32(Guid::SIZE as i32).guid(&Guid::END_OF_ELEMENTS)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }
}

/// Packs bit fields most-significant first, zero-padding the last byte.
#[derive(Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    filled: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `n` bits of `value`.
    pub fn put(&mut self, value: u32, n: u32) -> &mut Self {
        for i in (0..n).rev() {
            let bit = ((value >> i) & 1) as u8;
            self.current = (self.current << 1) | bit;
            self.filled += 1;
            if self.filled == 8 {
                self.bytes.push(self.current);
                self.current = 0;
                self.filled = 0;
            }
        }
        self
    }

    /// Append a run of single bits.
    pub fn bits(&mut self, bits: &[u8]) -> &mut Self {
        for b in bits {
            self.put(u32::from(*b), 1);
        }
        self
    }

    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.filled as usize
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.filled > 0 {
            self.bytes.push(self.current << (8 - self.filled));
        }
        self.bytes
    }
}
