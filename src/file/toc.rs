//! Table of contents.

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Seek};

use crate::binary::{is_modern, JtReader};
use crate::core::{Segment, SegmentKind};
use crate::util::{Guid, Result};

/// One segment listed in the TOC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TocEntry {
    pub guid: Guid,
    /// Absolute byte offset of the segment header.
    pub offset: u64,
    pub length: u32,
    /// Segment kind in the top byte, flags below.
    pub attributes: u32,
}

impl TocEntry {
    #[inline]
    pub fn kind(&self) -> SegmentKind {
        SegmentKind::from_attributes(self.attributes)
    }

    fn read<R: Read + Seek>(reader: &mut JtReader<R>, major: u32) -> Result<Self> {
        let guid = reader.read_guid()?;
        let offset = if is_modern(major) {
            reader.read_u64()?
        } else {
            u64::from(reader.read_u32()?)
        };
        Ok(Self {
            guid,
            offset,
            length: reader.read_u32()?,
            attributes: reader.read_u32()?,
        })
    }
}

/// Read the entries at `offset`, leaving the reader where it was.
pub(crate) fn read_entries<R: Read + Seek>(
    reader: &mut JtReader<R>,
    offset: u64,
    major: u32,
) -> Result<Vec<TocEntry>> {
    let resume = reader.position();
    reader.seek(offset)?;
    let count = reader.read_count()?;
    let entries = reader.read_array(count, |r| TocEntry::read(r, major))?;
    reader.seek(resume)?;
    Ok(entries)
}

/// TOC entries in file order plus the decoded segments keyed by GUID.
///
/// Every listed GUID has a key; the value is `None` for segments that were
/// skipped or could not be decoded.
#[derive(Clone, Debug, Default)]
pub struct Toc {
    entries: Vec<TocEntry>,
    segments: HashMap<Guid, Option<Segment>>,
}

impl Toc {
    pub(crate) fn new(entries: Vec<TocEntry>, segments: HashMap<Guid, Option<Segment>>) -> Self {
        Self { entries, segments }
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn entry(&self, guid: &Guid) -> Option<&TocEntry> {
        self.entries.iter().find(|e| e.guid == *guid)
    }

    /// Number of distinct segment GUIDs.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn contains(&self, guid: &Guid) -> bool {
        self.segments.contains_key(guid)
    }

    /// The decoded segment, if its kind has a decoder.
    pub fn segment(&self, guid: &Guid) -> Option<&Segment> {
        self.segments.get(guid).and_then(Option::as_ref)
    }

    pub fn segments(&self) -> &HashMap<Guid, Option<Segment>> {
        &self.segments
    }

    /// Entry count per segment kind.
    pub fn kind_counts(&self) -> BTreeMap<SegmentKind, usize> {
        let mut counts = BTreeMap::new();
        for e in &self.entries {
            *counts.entry(e.kind()).or_default() += 1;
        }
        counts
    }

    /// Number of segments that were decoded.
    pub fn decoded_count(&self) -> usize {
        self.segments.values().filter(|s| s.is_some()).count()
    }
}
