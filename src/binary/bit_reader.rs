//! MSB-first bit extraction layered over a [`JtReader`].

use std::io::{Read, Seek};

use super::format::ByteOrder;
use super::reader::JtReader;
use crate::util::{Error, Result};

/// Reads bit fields of up to 32 bits from the shared byte source.
///
/// Bits are consumed most-significant first. Whole bytes are pulled from
/// the underlying reader only when the register runs dry, so between calls
/// at most 7 bits are buffered.
pub struct BitReader<'a, R> {
    reader: &'a mut JtReader<R>,
    register: u32,
    available: u32,
}

impl<'a, R: Read + Seek> BitReader<'a, R> {
    pub fn new(reader: &'a mut JtReader<R>) -> Self {
        Self { reader, register: 0, available: 0 }
    }

    /// Byte-aligned access to the shared source. Buffered bits are untouched.
    #[inline]
    pub fn inner(&mut self) -> &mut JtReader<R> {
        self.reader
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.reader.byte_order()
    }

    /// Absolute stream position in bits.
    #[inline]
    pub fn bit_position(&self) -> u64 {
        self.reader.position() * 8 - u64::from(self.available)
    }

    /// Number of bits buffered but not yet consumed.
    #[inline]
    pub fn buffered_bits(&self) -> u32 {
        self.available
    }

    /// Read `n <= 8` bits.
    pub fn read_bits(&mut self, n: u32) -> Result<u8> {
        debug_assert!(n <= 8, "read_bits supports at most 8 bits, got {}", n);
        if n > 8 {
            return Err(Error::PreconditionViolation(format!(
                "read_bits supports at most 8 bits, got {}", n
            )));
        }
        if n == 0 {
            return Ok(0);
        }
        if n > self.available {
            let byte = self.reader.read_u8()?;
            self.register = (self.register << 8) | u32::from(byte);
            self.available += 8;
        }
        self.available -= n;
        let value = (self.register >> self.available) & ((1 << n) - 1);
        self.register &= (1 << self.available) - 1;
        Ok(value as u8)
    }

    /// Read `n <= 32` bits, accumulated most-significant first.
    pub fn read_int_bits(&mut self, n: u32) -> Result<u32> {
        debug_assert!(n <= 32, "read_int_bits supports at most 32 bits, got {}", n);
        if n > 32 {
            return Err(Error::PreconditionViolation(format!(
                "read_int_bits supports at most 32 bits, got {}", n
            )));
        }
        let mut remaining = n;
        let mut value = 0u32;
        while remaining > 8 {
            value = (value << 8) | u32::from(self.read_bits(8)?);
            remaining -= 8;
        }
        if remaining > 0 {
            value = (value << remaining) | u32::from(self.read_bits(remaining)?);
        }
        Ok(value)
    }

    /// Read four unaligned bytes and combine them in the file byte order.
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        for b in &mut bytes {
            *b = self.read_bits(8)?;
        }
        Ok(match self.byte_order() {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        })
    }

    /// Read eight unaligned bytes and combine them in the file byte order.
    pub fn read_u64(&mut self) -> Result<u64> {
        let mut bytes = [0u8; 8];
        for b in &mut bytes {
            *b = self.read_bits(8)?;
        }
        Ok(match self.byte_order() {
            ByteOrder::Little => u64::from_le_bytes(bytes),
            ByteOrder::Big => u64::from_be_bytes(bytes),
        })
    }

    /// Drop any partially consumed byte.
    #[inline]
    pub fn byte_align(&mut self) {
        self.register = 0;
        self.available = 0;
    }
}
