//! Segment dispatch, serial and parallel.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek};

use parking_lot::Mutex;
use rayon::prelude::*;

use super::toc::TocEntry;
use crate::binary::{ByteOrder, JtReader};
use crate::core::{DecodeContext, Segment, SegmentKind};
use crate::lsg::decode_scene_graph;
use crate::shape::decode_shape;
use crate::util::{Guid, Result};

pub(crate) type SegmentMap = HashMap<Guid, Option<Segment>>;

/// Decode the segment of one TOC entry; `None` for kinds without a decoder.
pub(crate) fn decode_entry<R: Read + Seek>(
    reader: &mut JtReader<R>,
    entry: &TocEntry,
    ctx: DecodeContext<'_>,
) -> Result<Option<Segment>> {
    let kind = entry.kind();
    let decoded = match kind {
        SegmentKind::LogicalSceneGraph => reader
            .seek(entry.offset)
            .and_then(|_| decode_scene_graph(reader, ctx))
            .map(|s| Some(Segment::SceneGraph(s))),
        k if k.is_shape() => reader
            .seek(entry.offset)
            .and_then(|_| decode_shape(reader, ctx))
            .map(|s| s.map(Segment::Shape)),
        _ => {
            tracing::trace!(guid = %entry.guid, %kind, "segment skipped");
            ctx.report.skipped_segment(kind);
            Ok(None)
        }
    };
    decoded.map_err(|e| e.in_segment(entry.guid, entry.offset))
}

/// One reader seeking from entry to entry.
pub(crate) fn decode_serial<R: Read + Seek>(
    reader: &mut JtReader<R>,
    entries: &[TocEntry],
    ctx: DecodeContext<'_>,
) -> Result<SegmentMap> {
    let mut segments = HashMap::with_capacity(entries.len());
    for entry in entries {
        let segment = decode_entry(reader, entry, ctx)?;
        segments.insert(entry.guid, segment);
    }
    Ok(segments)
}

/// One task per entry, each with its own reader over the shared buffer.
///
/// Returns once every task has finished; the first fatal error wins.
pub(crate) fn decode_parallel(
    data: &[u8],
    order: ByteOrder,
    entries: &[TocEntry],
    ctx: DecodeContext<'_>,
) -> Result<SegmentMap> {
    let segments = Mutex::new(HashMap::with_capacity(entries.len()));
    entries.par_iter().try_for_each(|entry| -> Result<()> {
        let mut reader = JtReader::new(Cursor::new(data), order);
        let segment = decode_entry(&mut reader, entry, ctx)?;
        segments.lock().insert(entry.guid, segment);
        Ok(())
    })?;
    Ok(segments.into_inner())
}

/// Whole-file buffer, mapped or owned.
pub(crate) enum FileData {
    #[cfg(feature = "mmap")]
    Mapped(memmap2::Mmap),
    Owned(Vec<u8>),
}

impl FileData {
    pub(crate) fn load(mut file: File, mmap: bool) -> Result<Self> {
        let size = file.metadata()?.len();

        #[cfg(feature = "mmap")]
        {
            if mmap && size > 0 {
                // Safety: the map is read-only and lives no longer than the decode
                let map = unsafe { memmap2::Mmap::map(&file) }
                    .map_err(|e| crate::util::Error::MmapFailed(e.to_string()))?;
                return Ok(Self::Mapped(map));
            }
        }
        #[cfg(not(feature = "mmap"))]
        let _ = mmap;

        let mut buf = Vec::with_capacity(size as usize);
        file.read_to_end(&mut buf)?;
        Ok(Self::Owned(buf))
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        match self {
            #[cfg(feature = "mmap")]
            Self::Mapped(map) => &map[..],
            Self::Owned(buf) => buf.as_slice(),
        }
    }
}
