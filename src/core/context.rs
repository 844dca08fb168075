//! Per-decode state shared by segment decoders.
//!
//! Non-fatal problems are counted here instead of being logged at every
//! occurrence; the loader logs one line per distinct key after all
//! segments are joined.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use super::segment::SegmentKind;
use crate::codec::Unsupported;
use crate::util::{Error, Guid};

/// Read-only inputs plus the shared problem counters.
#[derive(Clone, Copy)]
pub struct DecodeContext<'a> {
    pub major: u32,
    pub report: &'a DecodeReport,
}

impl<'a> DecodeContext<'a> {
    pub fn new(major: u32, report: &'a DecodeReport) -> Self {
        Self { major, report }
    }
}

/// Thread-safe counters of skipped or partially decoded content.
#[derive(Default)]
pub struct DecodeReport {
    skipped_segments: Mutex<BTreeMap<SegmentKind, usize>>,
    unrecognized_elements: Mutex<BTreeMap<Guid, usize>>,
    unimplemented_elements: Mutex<BTreeMap<&'static str, usize>>,
    unsupported_packets: Mutex<BTreeMap<Unsupported, usize>>,
}

impl DecodeReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A segment of a kind without a decoder, or one with nothing to decode.
    pub fn skipped_segment(&self, kind: SegmentKind) {
        *self.skipped_segments.lock().entry(kind).or_default() += 1;
    }

    /// A recoverable element error that ended an element loop.
    pub fn element_error(&self, err: &Error) {
        match err {
            Error::UnrecognizedElementType { guid, .. } => {
                *self.unrecognized_elements.lock().entry(*guid).or_default() += 1;
            }
            Error::UnimplementedDecoder { kind, .. } => {
                *self.unimplemented_elements.lock().entry(*kind).or_default() += 1;
            }
            _ => {}
        }
    }

    /// A packet whose codec could not be decoded.
    pub fn unsupported_packet(&self, what: Unsupported) {
        *self.unsupported_packets.lock().entry(what).or_default() += 1;
    }

    /// Snapshot of all counters.
    pub fn summary(&self) -> DecodeSummary {
        DecodeSummary {
            skipped_segments: self.skipped_segments.lock().clone(),
            unrecognized_elements: self.unrecognized_elements.lock().clone(),
            unimplemented_elements: self.unimplemented_elements.lock().clone(),
            unsupported_packets: self.unsupported_packets.lock().clone(),
        }
    }
}

/// Immutable copy of a [`DecodeReport`] kept on the decoded file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodeSummary {
    pub skipped_segments: BTreeMap<SegmentKind, usize>,
    pub unrecognized_elements: BTreeMap<Guid, usize>,
    pub unimplemented_elements: BTreeMap<&'static str, usize>,
    pub unsupported_packets: BTreeMap<Unsupported, usize>,
}

impl DecodeSummary {
    /// True when nothing was skipped or cut short.
    pub fn is_clean(&self) -> bool {
        self.skipped_segments.is_empty()
            && self.unrecognized_elements.is_empty()
            && self.unimplemented_elements.is_empty()
            && self.unsupported_packets.is_empty()
    }

    /// Emit one warning per distinct key.
    pub fn log(&self) {
        for (kind, count) in &self.skipped_segments {
            tracing::warn!(%kind, count, "segment kind not implemented; segments left undecoded");
        }
        for (guid, count) in &self.unrecognized_elements {
            tracing::warn!(%guid, count, "unrecognized element type; element lists truncated");
        }
        for (kind, count) in &self.unimplemented_elements {
            tracing::warn!(kind = *kind, count, "element decoder not implemented; element lists truncated");
        }
        for (what, count) in &self.unsupported_packets {
            tracing::warn!(%what, count, "packet not decoded");
        }
    }
}
