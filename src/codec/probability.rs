//! Probability context tables for arithmetic-coded packets.

use std::io::{Read, Seek};

use crate::binary::{is_modern, BitReader, JtReader};
use crate::util::{Error, Result};

/// One table of symbol statistics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProbabilityContext {
    pub symbol_bits: u32,
    pub occurrence_count_bits: u32,
    pub value_bits: u32,
    pub next_context_bits: u32,
    pub min_value: u64,
    pub entries: Vec<ProbabilityEntry>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProbabilityEntry {
    /// Symbol, already offset by -2 (JT 8/9 only).
    pub symbol: i32,
    /// Escape marker (JT 10 only).
    pub is_escape: bool,
    pub occurrence_count: u32,
    pub associated_value: u32,
    /// Index of the table used after this symbol (JT 8/9 only).
    pub next_context: u32,
}

/// Read the probability context tables of an arithmetic packet.
///
/// JT 10 stores a single table; JT 8/9 store a count followed by tables
/// whose value width and minimum are only present on the first one.
/// The stream is byte-aligned afterwards.
pub fn read_contexts<R: Read + Seek>(
    reader: &mut JtReader<R>,
    major: u32,
    uint64: bool,
) -> Result<Vec<ProbabilityContext>> {
    let modern = is_modern(major);
    let table_count = if modern { 1 } else { usize::from(reader.read_u8()?) };

    let mut bits = BitReader::new(reader);
    let mut tables = Vec::with_capacity(table_count);
    for i in 0..table_count {
        let mut table = ProbabilityContext::default();
        let entry_count;
        if modern {
            entry_count = bits.inner().read_u16()? as usize;
            table.occurrence_count_bits = u32::from(bits.read_bits(6)?);
            table.value_bits = u32::from(bits.read_bits(7)?);
            table.min_value = if uint64 {
                bits.read_u64()?
            } else {
                u64::from(bits.read_u32()?)
            };
        } else {
            entry_count = bits.inner().read_u32()? as usize;
            table.symbol_bits = u32::from(bits.read_bits(6)?);
            table.occurrence_count_bits = u32::from(bits.read_bits(6)?);
            if i == 0 {
                table.value_bits = u32::from(bits.read_bits(6)?);
            }
            table.next_context_bits = u32::from(bits.read_bits(6)?);
            if i == 0 {
                table.min_value = u64::from(bits.read_u32()?);
            }
        }
        check_width("symbol", table.symbol_bits)?;
        check_width("occurrence count", table.occurrence_count_bits)?;
        check_width("associated value", table.value_bits)?;
        check_width("next context", table.next_context_bits)?;

        table.entries = Vec::with_capacity(entry_count.min(1 << 16));
        for _ in 0..entry_count {
            let mut entry = ProbabilityEntry::default();
            if !modern {
                entry.symbol = (bits.read_int_bits(table.symbol_bits)? as i32).wrapping_sub(2);
            }
            if modern {
                entry.is_escape = bits.read_bits(1)? == 1;
            }
            entry.occurrence_count = bits.read_int_bits(table.occurrence_count_bits)?;
            entry.associated_value = bits.read_int_bits(table.value_bits)?;
            if !modern {
                entry.next_context = bits.read_int_bits(table.next_context_bits)?;
            }
            table.entries.push(entry);
        }
        tables.push(table);
    }
    bits.byte_align();
    Ok(tables)
}

fn check_width(field: &str, width: u32) -> Result<()> {
    if width > 32 {
        return Err(Error::invalid(format!(
            "probability context {} width {} exceeds 32 bits",
            field, width
        )));
    }
    Ok(())
}
