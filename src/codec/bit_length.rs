//! Bit-length symbol codec.
//!
//! Two generations exist. Mark 1 stores each symbol at a running field
//! width that is nudged up or down by ±2 before the symbol. Mark 2 stores
//! either a fixed-width run (`min`, `max`, then `ceil(log2(max - min + 1))`
//! bits per value) or a variable-width stream.

use std::io::{Read, Seek};

use crate::binary::{BitReader, JtReader};
use crate::util::{Error, Result};

/// Decode `symbol_count` integers.
///
/// `code_text_bits` bounds the Mark 1 stream; Mark 2 streams carry their
/// own framing. Returns `None` for the Mark 2 variable-width encoding,
/// which is not supported.
pub fn decode<R: Read + Seek>(
    reader: &mut JtReader<R>,
    code_text_bits: i32,
    symbol_count: usize,
    mark2: bool,
) -> Result<Option<Vec<i32>>> {
    let mut bits = BitReader::new(reader);
    if mark2 {
        decode_mark2(&mut bits, symbol_count)
    } else {
        decode_mark1(&mut bits, code_text_bits, symbol_count).map(Some)
    }
}

fn decode_mark1<R: Read + Seek>(
    bits: &mut BitReader<'_, R>,
    code_text_bits: i32,
    symbol_count: usize,
) -> Result<Vec<i32>> {
    let start = bits.bit_position();
    let limit = u64::try_from(code_text_bits).unwrap_or(0);
    let mut values = Vec::with_capacity(symbol_count.min(1 << 16));
    let mut width: i32 = 0;

    while bits.bit_position() - start < limit {
        if bits.read_bits(1)? == 1 {
            let adjust_up = bits.read_bits(1)?;
            loop {
                width += if adjust_up == 1 { 2 } else { -2 };
                if bits.read_bits(1)? != adjust_up {
                    break;
                }
            }
            if !(0..=32).contains(&width) {
                return Err(Error::invalid(format!(
                    "bit-length field width {} out of range at bit {}",
                    width,
                    bits.bit_position()
                )));
            }
        }

        let symbol = if width == 0 {
            0
        } else {
            let raw = bits.read_int_bits(width as u32)?;
            sign_extend(raw, width as u32)
        };

        if values.len() == symbol_count {
            return Err(Error::invalid(format!(
                "bit-length stream holds more than the declared {} symbols",
                symbol_count
            )));
        }
        values.push(symbol);
    }

    values.resize(symbol_count, 0);
    Ok(values)
}

fn decode_mark2<R: Read + Seek>(
    bits: &mut BitReader<'_, R>,
    symbol_count: usize,
) -> Result<Option<Vec<i32>>> {
    if bits.read_bits(1)? == 1 {
        tracing::warn!("variable-width bit-length encoding is not implemented");
        return Ok(None);
    }

    let min_bits = u32::from(bits.read_bits(6)?);
    let max_bits = u32::from(bits.read_bits(6)?);
    if min_bits > 32 || max_bits > 32 {
        return Err(Error::invalid(format!(
            "fixed-width bit-length bounds use {}/{} bits, at most 32 allowed",
            min_bits, max_bits
        )));
    }
    let min = bits.read_int_bits(min_bits)? as i32;
    let max = bits.read_int_bits(max_bits)? as i32;

    let range = max.wrapping_sub(min);
    if range <= 0 {
        return Ok(Some(vec![min; symbol_count]));
    }

    // Values are returned as offsets from `min`.
    let width = 32 - (range as u32).leading_zeros();
    let mut values = Vec::with_capacity(symbol_count.min(1 << 16));
    for _ in 0..symbol_count {
        values.push(bits.read_int_bits(width)? as i32);
    }
    Ok(Some(values))
}

/// Sign-extend the low `width` bits of `raw`.
#[inline]
fn sign_extend(raw: u32, width: u32) -> i32 {
    let shift = 32 - width;
    ((raw << shift) as i32) >> shift
}
