//! Integer compressed data packets.
//!
//! A packet is a codec tag followed by codec-specific framing. Only the
//! null and bit-length codecs produce values here; arithmetic packets are
//! parsed into their parts so the stream stays aligned, and move-to-front,
//! chopper and unknown codecs are reported as unsupported.

use std::fmt;
use std::io::{Read, Seek};

use super::bit_length;
use super::probability::{read_contexts, ProbabilityContext};
use crate::binary::{is_modern, JtReader};
use crate::util::{Error, Result};

/// Codec tag of a compressed data packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CodecKind {
    Null = 0,
    BitLength = 1,
    Arithmetic = 3,
    Chopper = 4,
    MoveToFront = 5,
}

impl CodecKind {
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Null),
            1 => Some(Self::BitLength),
            3 => Some(Self::Arithmetic),
            4 => Some(Self::Chopper),
            5 => Some(Self::MoveToFront),
            _ => None,
        }
    }
}

/// How a packet is laid out on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketOptions {
    /// Major file version.
    pub major: u32,
    /// Probability minimums are 64-bit.
    pub uint64: bool,
    /// Second packet generation. Most JT 9 packets use it too.
    pub mark2: bool,
    /// The enclosing segment was ZLIB/LZMA compressed as a whole.
    pub externally_compressed: bool,
}

impl PacketOptions {
    pub fn new(major: u32) -> Self {
        Self { major, uint64: false, mark2: true, externally_compressed: false }
    }

    pub fn mark1(mut self) -> Self {
        self.mark2 = false;
        self
    }

    pub fn uint64(mut self, uint64: bool) -> Self {
        self.uint64 = uint64;
        self
    }

    pub fn externally_compressed(mut self, compressed: bool) -> Self {
        self.externally_compressed = compressed;
        self
    }
}

/// Why a packet produced no values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Unsupported {
    Codec(CodecKind),
    UnknownCodec(u8),
    VariableWidthBitLength,
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(kind) => write!(f, "{:?} codec", kind),
            Self::UnknownCodec(tag) => write!(f, "unknown codec {}", tag),
            Self::VariableWidthBitLength => f.write_str("variable-width bit-length codec"),
        }
    }
}

/// Out-of-band values of an arithmetic packet.
#[derive(Clone, Debug, PartialEq)]
pub enum OutOfBand {
    /// Plain `VecI32`.
    Literal(Vec<i32>),
    /// One nested packet.
    Nested(Box<PacketData>),
    /// Counted list of nested packets (JT 8/9).
    Packets(Vec<PacketData>),
}

/// Arithmetic-coded packet, parsed but not yet entropy-decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct ArithmeticPacket {
    pub value_count: i32,
    pub code_text_bits: i32,
    pub code_text: Vec<u32>,
    pub contexts: Vec<ProbabilityContext>,
    pub out_of_band: OutOfBand,
}

/// Result of reading one packet.
#[derive(Clone, Debug, PartialEq)]
pub enum PacketData {
    Values(Vec<i32>),
    Arithmetic(ArithmeticPacket),
    Unsupported(Unsupported),
}

impl PacketData {
    /// Decoded integers, if this packet produced any.
    pub fn values(&self) -> Option<&[i32]> {
        match self {
            Self::Values(v) => Some(v),
            _ => None,
        }
    }

    /// True when the stream position after this packet is unknown.
    ///
    /// An unsupported packet nested in an arithmetic packet's out-of-band
    /// data surfaces as the outer packet being unsupported.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

/// Read one integer packet.
pub fn read_int_packet<R: Read + Seek>(
    reader: &mut JtReader<R>,
    opts: PacketOptions,
) -> Result<PacketData> {
    let modern = is_modern(opts.major);
    let mut value_count = if modern || opts.mark2 { reader.read_i32()? } else { 0 };

    let at = reader.position();
    let tag = reader.read_u8()?;
    let Some(codec) = CodecKind::from_tag(tag) else {
        tracing::warn!(tag, offset = at, "unknown packet codec");
        return Ok(PacketData::Unsupported(Unsupported::UnknownCodec(tag)));
    };

    match codec {
        CodecKind::Null => {
            let encoded_bits = reader.read_i32()?;
            let n = usize::try_from(encoded_bits / 32)
                .map_err(|_| Error::invalid(format!("negative null packet length at byte {}", at)))?;
            Ok(PacketData::Values(reader.read_i32_array(n)?))
        }
        CodecKind::BitLength => {
            let encoded_bits = reader.read_i32()?;
            if !opts.mark2 && !modern {
                value_count = reader.read_i32()?;
            }
            let n = symbol_count(value_count, at)?;
            match bit_length::decode(reader, encoded_bits, n, opts.mark2 || modern)? {
                Some(values) => Ok(PacketData::Values(values)),
                None => Ok(PacketData::Unsupported(Unsupported::VariableWidthBitLength)),
            }
        }
        CodecKind::Arithmetic => read_arithmetic(reader, opts, value_count),
        CodecKind::Chopper | CodecKind::MoveToFront => {
            tracing::warn!(codec = ?codec, offset = at, "packet codec not implemented");
            Ok(PacketData::Unsupported(Unsupported::Codec(codec)))
        }
    }
}

fn read_arithmetic<R: Read + Seek>(
    reader: &mut JtReader<R>,
    opts: PacketOptions,
    mut value_count: i32,
) -> Result<PacketData> {
    let modern = is_modern(opts.major);
    let leading_code_text = modern || opts.mark2;

    let (mut code_text_bits, mut code_text) = (0, Vec::new());
    if leading_code_text {
        code_text_bits = reader.read_i32()?;
        code_text = read_code_words(reader, code_text_bits)?;
    }

    let contexts = read_contexts(reader, opts.major, opts.uint64)?;

    let out_of_band = if !modern {
        let n = reader.read_count()?;
        let mut packets = Vec::with_capacity(n.min(64));
        for _ in 0..n {
            match read_int_packet(reader, opts)? {
                PacketData::Unsupported(why) => return Ok(PacketData::Unsupported(why)),
                packet => packets.push(packet),
            }
        }
        OutOfBand::Packets(packets)
    } else if !opts.externally_compressed {
        OutOfBand::Literal(reader.read_vec_i32()?)
    } else {
        match read_int_packet(reader, opts.mark1())? {
            PacketData::Unsupported(why) => return Ok(PacketData::Unsupported(why)),
            packet => OutOfBand::Nested(Box::new(packet)),
        }
    };

    if !leading_code_text {
        code_text_bits = reader.read_i32()?;
        value_count = reader.read_i32()?;
        if contexts.len() > 1 {
            // total symbol count; the value count is what callers need
            reader.read_i32()?;
        }
        code_text = reader.read_vec_u32()?;
    }

    Ok(PacketData::Arithmetic(ArithmeticPacket {
        value_count,
        code_text_bits,
        code_text,
        contexts,
        out_of_band,
    }))
}

fn read_code_words<R: Read + Seek>(reader: &mut JtReader<R>, bits: i32) -> Result<Vec<u32>> {
    let words = usize::try_from(bits)
        .map_err(|_| Error::invalid(format!("negative code text length {}", bits)))?
        .div_ceil(32);
    reader.read_u32_array(words)
}

fn symbol_count(value_count: i32, at: u64) -> Result<usize> {
    usize::try_from(value_count)
        .map_err(|_| Error::invalid(format!("negative packet value count {} at byte {}", value_count, at)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::ByteOrder;
    use crate::test_util::{BitWriter, ByteWriter};
    use std::io::Cursor;

    fn reader(w: ByteWriter) -> JtReader<Cursor<Vec<u8>>> {
        JtReader::new(Cursor::new(w.into_bytes()), ByteOrder::Little)
    }

    /// Single JT 10 context table with no entries.
    fn empty_modern_context(w: &mut ByteWriter) {
        let mut bits = BitWriter::new();
        bits.put(0, 6).put(0, 7).put(0, 32);
        w.u16(0).raw(&bits.finish());
    }

    #[test]
    fn test_null_codec() {
        let mut w = ByteWriter::new(ByteOrder::Little);
        w.i32(3).u8(0).i32(96).i32(4).i32(-5).i32(6).u8(0xee);
        let mut r = reader(w);
        let packet = read_int_packet(&mut r, PacketOptions::new(10)).unwrap();
        assert_eq!(packet.values(), Some(&[4, -5, 6][..]));
        assert_eq!(r.read_u8().unwrap(), 0xee);
    }

    #[test]
    fn test_mark1_bit_length_legacy() {
        let mut bits = BitWriter::new();
        bits.bits(&[1, 1, 0]).put(0b01, 2).bits(&[0]).put(0b10, 2);
        let len = bits.bit_len() as i32;

        let mut w = ByteWriter::new(ByteOrder::Little);
        w.u8(1).i32(len).i32(2).raw(&bits.finish());
        let mut r = reader(w);
        let packet = read_int_packet(&mut r, PacketOptions::new(9).mark1()).unwrap();
        assert_eq!(packet, PacketData::Values(vec![1, -2]));
    }

    #[test]
    fn test_mark2_bit_length_modern() {
        let mut bits = BitWriter::new();
        bits.put(0, 1).put(1, 6).put(2, 6).put(1, 1).put(2, 2);
        bits.put(1, 1).put(0, 1);

        let mut w = ByteWriter::new(ByteOrder::Little);
        w.i32(2).u8(1).i32(0).raw(&bits.finish());
        let mut r = reader(w);
        // a JT 10 file forces the second generation even when asked for mark 1
        let packet = read_int_packet(&mut r, PacketOptions::new(10).mark1()).unwrap();
        assert_eq!(packet, PacketData::Values(vec![1, 0]));
    }

    #[test]
    fn test_unsupported_codecs() {
        for (tag, expected) in [
            (5u8, Unsupported::Codec(CodecKind::MoveToFront)),
            (4, Unsupported::Codec(CodecKind::Chopper)),
            (9, Unsupported::UnknownCodec(9)),
        ] {
            let mut w = ByteWriter::new(ByteOrder::Little);
            w.i32(10).u8(tag);
            let mut r = reader(w);
            let packet = read_int_packet(&mut r, PacketOptions::new(10)).unwrap();
            assert_eq!(packet, PacketData::Unsupported(expected));
            assert!(packet.is_unsupported());
        }
    }

    #[test]
    fn test_arithmetic_literal_out_of_band() {
        let mut w = ByteWriter::new(ByteOrder::Little);
        w.i32(12).u8(3).i32(40).u32(0xaaaa_aaaa).u32(0xbbbb_bbbb);
        empty_modern_context(&mut w);
        w.vec_i32(&[100, 200]).u8(0x77);
        let mut r = reader(w);

        let PacketData::Arithmetic(p) = read_int_packet(&mut r, PacketOptions::new(10)).unwrap() else {
            panic!("expected arithmetic packet");
        };
        assert_eq!(p.value_count, 12);
        assert_eq!(p.code_text_bits, 40);
        assert_eq!(p.code_text, vec![0xaaaa_aaaa, 0xbbbb_bbbb]);
        assert_eq!(p.contexts.len(), 1);
        assert_eq!(p.out_of_band, OutOfBand::Literal(vec![100, 200]));
        assert_eq!(r.read_u8().unwrap(), 0x77);
    }

    #[test]
    fn test_arithmetic_nested_when_externally_compressed() {
        let mut w = ByteWriter::new(ByteOrder::Little);
        w.i32(5).u8(3).i32(0);
        empty_modern_context(&mut w);
        // nested packet: value count, null codec, one value
        w.i32(1).u8(0).i32(32).i32(-9);
        let mut r = reader(w);

        let opts = PacketOptions::new(10).externally_compressed(true);
        let PacketData::Arithmetic(p) = read_int_packet(&mut r, opts).unwrap() else {
            panic!("expected arithmetic packet");
        };
        assert!(p.code_text.is_empty());
        assert_eq!(
            p.out_of_band,
            OutOfBand::Nested(Box::new(PacketData::Values(vec![-9])))
        );
    }

    #[test]
    fn test_arithmetic_legacy_generation() {
        let mut w = ByteWriter::new(ByteOrder::Little);
        // no leading value count for mark 1
        w.u8(3);
        // one table, no entries
        let mut bits = BitWriter::new();
        bits.put(2, 6).put(2, 6).put(2, 6).put(2, 6).put(0, 32);
        w.u8(1).u32(0).raw(&bits.finish());
        // one out-of-band packet (mark 1 null codec)
        w.i32(1).u8(0).i32(64).i32(7).i32(8);
        // trailing code text
        w.i32(33).i32(4).i32(2).u32(0x1234_5678).u32(0x8000_0000);
        let mut r = reader(w);

        let PacketData::Arithmetic(p) = read_int_packet(&mut r, PacketOptions::new(9).mark1()).unwrap() else {
            panic!("expected arithmetic packet");
        };
        assert_eq!(p.value_count, 4);
        assert_eq!(p.code_text_bits, 33);
        assert_eq!(p.code_text, vec![0x1234_5678, 0x8000_0000]);
        assert_eq!(p.out_of_band, OutOfBand::Packets(vec![PacketData::Values(vec![7, 8])]));
    }

    #[test]
    fn test_arithmetic_64_bit_minimum() {
        let mut w = ByteWriter::new(ByteOrder::Little);
        w.i32(3).u8(3).i32(0);
        let mut bits = BitWriter::new();
        bits.put(0, 6).put(0, 7);
        for b in u64::MAX.to_le_bytes() {
            bits.put(u32::from(b), 8);
        }
        w.u16(0).raw(&bits.finish());
        w.vec_i32(&[-1]).u8(0x77);
        let mut r = reader(w);

        let opts = PacketOptions::new(10).uint64(true);
        let PacketData::Arithmetic(p) = read_int_packet(&mut r, opts).unwrap() else {
            panic!("expected arithmetic packet");
        };
        assert_eq!(p.contexts[0].min_value, u64::MAX);
        assert_eq!(p.out_of_band, OutOfBand::Literal(vec![-1]));
        assert_eq!(r.read_u8().unwrap(), 0x77);
    }

    #[test]
    fn test_arithmetic_legacy_mark2() {
        let mut w = ByteWriter::new(ByteOrder::Little);
        // value count, codec, then the code text up front
        w.i32(6).u8(3).i32(20).u32(0xabcd_0000);
        let mut bits = BitWriter::new();
        bits.put(2, 6).put(2, 6).put(2, 6).put(2, 6).put(0, 32);
        w.u8(1).u32(0).raw(&bits.finish());
        // two out-of-band packets, each with its own value count
        w.i32(2);
        w.i32(2).u8(0).i32(64).i32(7).i32(8);
        w.i32(1).u8(0).i32(32).i32(-3);
        w.u8(0x77);
        let mut r = reader(w);

        let PacketData::Arithmetic(p) = read_int_packet(&mut r, PacketOptions::new(9)).unwrap() else {
            panic!("expected arithmetic packet");
        };
        assert_eq!(p.value_count, 6);
        assert_eq!(p.code_text_bits, 20);
        assert_eq!(p.code_text, vec![0xabcd_0000]);
        assert_eq!(p.contexts.len(), 1);
        assert_eq!(
            p.out_of_band,
            OutOfBand::Packets(vec![PacketData::Values(vec![7, 8]), PacketData::Values(vec![-3])])
        );
        // no trailing code text in the second generation
        assert_eq!(r.read_u8().unwrap(), 0x77);
    }

    #[test]
    fn test_nested_unsupported_surfaces() {
        let mut w = ByteWriter::new(ByteOrder::Little);
        w.i32(5).u8(3).i32(0);
        empty_modern_context(&mut w);
        w.i32(1).u8(5);
        let mut r = reader(w);

        let opts = PacketOptions::new(10).externally_compressed(true);
        let packet = read_int_packet(&mut r, opts).unwrap();
        assert_eq!(packet, PacketData::Unsupported(Unsupported::Codec(CodecKind::MoveToFront)));
    }
}
