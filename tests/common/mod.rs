//! JT fixture builder shared by the integration tests.

#![allow(dead_code)]

use std::io::Write;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use jt::core::ElementKind;
use jt::Guid;

/// Field writer with a fixed byte order.
#[derive(Clone)]
pub struct W {
    pub buf: Vec<u8>,
    big: bool,
}

macro_rules! num {
    ($name:ident, $write:ident, $ty:ty) => {
        pub fn $name(&mut self, v: $ty) -> &mut Self {
            if self.big {
                self.buf.$write::<BigEndian>(v).unwrap();
            } else {
                self.buf.$write::<LittleEndian>(v).unwrap();
            }
            self
        }
    };
}

impl W {
    pub fn new(big: bool) -> Self {
        Self { buf: Vec::new(), big }
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    num!(u16, write_u16, u16);
    num!(i16, write_i16, i16);
    num!(u32, write_u32, u32);
    num!(i32, write_i32, i32);
    num!(u64, write_u64, u64);
    num!(f32, write_f32, f32);

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

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

    pub fn vec_i32(&mut self, values: &[i32]) -> &mut Self {
        self.i32(values.len() as i32);
        for v in values {
            self.i32(*v);
        }
        self
    }

    pub fn mb_string(&mut self, s: &str) -> &mut Self {
        let units: Vec<u16> = s.encode_utf16().collect();
        self.i32(units.len() as i32);
        for u in units {
            self.u16(u);
        }
        self
    }

    pub fn bbox(&mut self, min: [f32; 3], max: [f32; 3]) -> &mut Self {
        for v in min.iter().chain(max.iter()) {
            self.f32(*v);
        }
        self
    }
}

pub fn guid(n: u32) -> Guid {
    Guid::from_parts(n, 0x1234, 0x5678, 1, 2, 3, 4, 5, 6, 7, 8)
}

/// Segment kind codes as stored in the TOC attribute high byte.
pub const LSG: u32 = 1;
pub const PMI: u32 = 3;
pub const METADATA: u32 = 4;
pub const SHAPE_LOD0: u32 = 7;

/// One graph element as (type, object id, body).
pub struct Element {
    pub kind: ElementKind,
    pub object_id: i32,
    pub body: Vec<u8>,
}

pub enum Packing {
    None,
    Zlib,
    Lzma,
}

/// Builds a whole JT file: header, segments, then the TOC.
pub struct JtBuilder {
    pub major: u32,
    pub big: bool,
    pub root: Guid,
    segments: Vec<(Guid, u32, Vec<u8>)>,
}

impl JtBuilder {
    pub fn new(major: u32, big: bool, root: Guid) -> Self {
        Self { major, big, root, segments: Vec::new() }
    }

    pub fn w(&self) -> W {
        W::new(self.big)
    }

    /// Add a raw segment body (everything after the segment header).
    pub fn segment(&mut self, guid: Guid, kind: u32, body: Vec<u8>) -> &mut Self {
        self.segments.push((guid, kind, body));
        self
    }

    /// Add an LSG segment holding `elements`.
    pub fn lsg(&mut self, guid: Guid, elements: &[Element], packing: Packing) -> &mut Self {
        let mut list = self.w();
        for e in elements {
            list.i32((16 + 1 + 4 + e.body.len()) as i32)
                .guid(&e.kind.guid())
                .u8(1)
                .i32(e.object_id)
                .raw(&e.body);
        }
        list.i32(16).guid(&Guid::END_OF_ELEMENTS);

        let mut body = self.w();
        match packing {
            Packing::None => {
                body.u32(1).i32(list.buf.len() as i32 + 1).u8(1).raw(&list.buf);
            }
            Packing::Zlib => {
                let mut enc = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
                enc.write_all(&list.buf).unwrap();
                let packed = enc.finish().unwrap();
                body.u32(2).i32(packed.len() as i32 + 1).u8(2).raw(&packed);
            }
            Packing::Lzma => {
                let mut packed = Vec::new();
                lzma_rs::lzma_compress(&mut list.buf.as_slice(), &mut packed).unwrap();
                body.u32(2).i32(packed.len() as i32 + 1).u8(3).raw(&packed);
            }
        }
        self.segment(guid, LSG, body.buf)
    }

    /// Add a shape LOD segment with a single null shape LOD element.
    pub fn null_shape(&mut self, guid: Guid) -> &mut Self {
        let mut e = self.w();
        e.version(self.major, 1).bbox([0.0; 3], [1.0; 3]);
        let mut body = self.w();
        body.i32((16 + 1 + 4 + e.buf.len()) as i32)
            .guid(&ElementKind::NullShapeLod.guid())
            .u8(4)
            .i32(0)
            .raw(&e.buf);
        self.segment(guid, SHAPE_LOD0, body.buf)
    }

    pub fn build(&self) -> Vec<u8> {
        let modern = self.major >= 10;
        let mut header = format!("Version {}.0 JT", self.major).into_bytes();
        header.resize(80, b' ');

        let mut w = self.w();
        w.raw(&header).u8(u8::from(self.big)).i32(0);
        let toc_field_at = w.buf.len();
        if modern {
            w.u64(0);
        } else {
            w.u32(0);
        }
        w.guid(&self.root);

        let mut offsets = Vec::new();
        for (guid, kind, body) in &self.segments {
            offsets.push(w.buf.len() as u64);
            w.guid(guid).i32(*kind as i32).i32((24 + body.len()) as i32).raw(body);
        }

        let toc_offset = w.buf.len() as u64;
        w.i32(self.segments.len() as i32);
        for ((guid, kind, body), offset) in self.segments.iter().zip(&offsets) {
            w.guid(guid);
            if modern {
                w.u64(*offset);
            } else {
                w.u32(*offset as u32);
            }
            w.u32((24 + body.len()) as u32).u32(kind << 24);
        }

        // patch the TOC offset
        let mut patch = W::new(self.big);
        if modern {
            patch.u64(toc_offset);
        } else {
            patch.u32(toc_offset as u32);
        }
        w.buf[toc_field_at..toc_field_at + patch.buf.len()].copy_from_slice(&patch.buf);
        w.buf
    }
}

// ============================================================================
// Element bodies
// ============================================================================

pub fn group_body(b: &JtBuilder, children: &[i32]) -> Vec<u8> {
    let mut w = b.w();
    w.version(b.major, 1).u32(0).vec_i32(&[]);
    w.version(b.major, 1).vec_i32(children);
    w.buf
}

pub fn partition_body(b: &JtBuilder, file_name: &str, flags: i32) -> Vec<u8> {
    let mut w = W::new(b.big);
    w.raw(&group_body(b, &[]));
    w.i32(flags).mb_string(file_name);
    w.bbox([-1.0, -2.0, -3.0], [4.0, 5.0, 6.0]);
    w.f32(42.0);
    w.i32(1).i32(2).i32(3).i32(4).i32(5).i32(6);
    if flags & 1 != 0 {
        w.bbox([0.0; 3], [1.0; 3]);
    }
    w.buf
}

pub fn material_body(b: &JtBuilder) -> Vec<u8> {
    let mut w = b.w();
    w.version(b.major, 2).u8(0).u32(0);
    if b.major >= 10 {
        w.u32(0);
    }
    w.version(b.major, 2).u16(0);
    for _ in 0..16 {
        w.f32(0.5);
    }
    w.f32(10.0).f32(0.25);
    if b.major >= 10 {
        w.f32(0.75);
    }
    w.u32(3);
    w.buf
}
