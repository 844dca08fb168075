//! High-level entry point: open a JT file and decode its segments.
//!
//! # Example
//! ```ignore
//! use jt::file::{JtFile, LoadOptions};
//!
//! let file = JtFile::open_with("model.jt", LoadOptions::new().parallel(true))?;
//! println!("JT {} ({})", file.major, file.byte_order.name());
//! if let Some(lsg) = file.root_segment().and_then(|s| s.as_scene_graph()) {
//!     println!("{} graph elements", lsg.len());
//! }
//! ```

mod load;
mod options;
mod toc;

pub use options::LoadOptions;
pub use toc::{Toc, TocEntry};

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use std::time::Instant;

use crate::binary::{parse_major_version, ByteOrder, JtReader, VERSION_STRING_SIZE};
use crate::core::{DecodeContext, DecodeReport, DecodeSummary, Segment};
use crate::util::{Error, Guid, Result};
use load::FileData;

/// A decoded JT file. Immutable once loaded.
#[derive(Clone, Debug)]
pub struct JtFile {
    /// The 80-byte version string, trailing padding removed.
    pub version: String,
    pub major: u32,
    pub byte_order: ByteOrder,
    pub reserved: i32,
    pub toc: Toc,
    /// GUID of the root logical scene graph segment.
    pub root_segment_id: Guid,
    /// Everything that was skipped or only partly decoded.
    pub summary: DecodeSummary,
}

impl JtFile {
    /// Open and decode a file with default options (streaming, serial).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, LoadOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        let _span = tracing::info_span!("jt_open", path = %path.display()).entered();

        if options.loads_whole_file() {
            let data = FileData::load(file, options.mmap)?;
            Self::from_bytes(data.as_slice(), options)
        } else {
            Self::decode(JtReader::new(BufReader::new(file), ByteOrder::Little), None, options)
        }
    }

    /// Decode a file held in memory.
    pub fn from_bytes(data: &[u8], options: LoadOptions) -> Result<Self> {
        Self::decode(JtReader::new(Cursor::new(data), ByteOrder::Little), Some(data), options)
    }

    fn decode<R: Read + Seek>(
        mut reader: JtReader<R>,
        buffer: Option<&[u8]>,
        options: LoadOptions,
    ) -> Result<Self> {
        let started = Instant::now();

        let raw_version = reader.read_fixed_string(VERSION_STRING_SIZE)?;
        let major = parse_major_version(&raw_version).ok_or_else(|| {
            Error::MalformedHeader(format!(
                "no version marker in {:?}",
                raw_version.trim_end_matches(['\0', ' ', '\n'])
            ))
        })?;
        let byte_order = ByteOrder::from_flag(reader.read_u8()?);
        reader.set_byte_order(byte_order);
        let reserved = reader.read_i32()?;
        let toc_offset = if crate::binary::is_modern(major) {
            reader.read_u64()?
        } else {
            u64::from(reader.read_u32()?)
        };
        tracing::debug!(major, order = byte_order.name(), toc_offset, "header");

        let entries = toc::read_entries(&mut reader, toc_offset, major)?;
        tracing::debug!(entries = entries.len(), "table of contents");

        let report = DecodeReport::new();
        let ctx = DecodeContext::new(major, &report);
        let header_end = reader.position();
        let segments = match buffer {
            Some(data) if options.parallel => {
                load::decode_parallel(data, byte_order, &entries, ctx)?
            }
            _ => load::decode_serial(&mut reader, &entries, ctx)?,
        };

        reader.seek(header_end)?;
        let root_segment_id = reader.read_guid()?;
        if !segments.contains_key(&root_segment_id) {
            return Err(Error::UnknownSegment(root_segment_id));
        }

        let summary = report.summary();
        summary.log();
        let toc = Toc::new(entries, segments);
        tracing::info!(
            major,
            segments = toc.len(),
            decoded = toc.decoded_count(),
            parallel = options.parallel && buffer.is_some(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "decoded JT file"
        );

        Ok(Self {
            version: raw_version.trim_end_matches(['\0', ' ', '\n']).to_string(),
            major,
            byte_order,
            reserved,
            toc,
            root_segment_id,
            summary,
        })
    }

    /// The root logical scene graph segment, when it was decoded.
    pub fn root_segment(&self) -> Option<&Segment> {
        self.toc.segment(&self.root_segment_id)
    }

    pub fn segment(&self, guid: &Guid) -> Option<&Segment> {
        self.toc.segment(guid)
    }
}
