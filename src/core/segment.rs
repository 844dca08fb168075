//! Segment kinds and decoded segments.

use std::fmt;

use super::header::SegmentHeader;
use crate::lsg::SceneGraphSegment;
use crate::shape::ShapeSegment;

/// Segment type, from the high byte of a TOC entry's attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentKind {
    Undefined,
    LogicalSceneGraph,
    JtBRep,
    PmiData,
    MetaData,
    Shape,
    /// Shape LOD level 0..=9.
    ShapeLod(u8),
    XtBRep,
    WireframeRepresentation,
    Ulp,
    Stt,
    Lwpa,
    MultiXtBRep,
    InfoSegment,
    AecShape,
    StepBRep,
    Unknown(u32),
}

impl SegmentKind {
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Undefined,
            1 => Self::LogicalSceneGraph,
            2 => Self::JtBRep,
            3 => Self::PmiData,
            4 => Self::MetaData,
            6 => Self::Shape,
            7..=16 => Self::ShapeLod((raw - 7) as u8),
            17 => Self::XtBRep,
            18 => Self::WireframeRepresentation,
            19 => Self::Ulp,
            23 => Self::Stt,
            24 => Self::Lwpa,
            30 => Self::MultiXtBRep,
            31 => Self::InfoSegment,
            32 => Self::AecShape,
            33 => Self::StepBRep,
            other => Self::Unknown(other),
        }
    }

    /// Kind of a TOC entry given its attribute word.
    #[inline]
    pub const fn from_attributes(attributes: u32) -> Self {
        Self::from_raw(attributes >> 24)
    }

    pub const fn raw(self) -> u32 {
        match self {
            Self::Undefined => 0,
            Self::LogicalSceneGraph => 1,
            Self::JtBRep => 2,
            Self::PmiData => 3,
            Self::MetaData => 4,
            Self::Shape => 6,
            Self::ShapeLod(level) => 7 + level as u32,
            Self::XtBRep => 17,
            Self::WireframeRepresentation => 18,
            Self::Ulp => 19,
            Self::Stt => 23,
            Self::Lwpa => 24,
            Self::MultiXtBRep => 30,
            Self::InfoSegment => 31,
            Self::AecShape => 32,
            Self::StepBRep => 33,
            Self::Unknown(raw) => raw,
        }
    }

    /// Shape and Shape LOD segments.
    #[inline]
    pub const fn is_shape(self) -> bool {
        matches!(self, Self::Shape | Self::ShapeLod(_))
    }

    /// Whether the first element carries a compression prefix.
    #[inline]
    pub const fn is_compressible(self) -> bool {
        !self.is_shape()
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeLod(level) => write!(f, "ShapeLOD{}", level),
            Self::Unknown(raw) => write!(f, "Unknown({})", raw),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

/// A decoded data segment.
#[derive(Clone, Debug)]
pub enum Segment {
    SceneGraph(SceneGraphSegment),
    Shape(ShapeSegment),
}

impl Segment {
    pub fn header(&self) -> &SegmentHeader {
        match self {
            Self::SceneGraph(s) => &s.header,
            Self::Shape(s) => &s.header,
        }
    }

    pub fn as_scene_graph(&self) -> Option<&SceneGraphSegment> {
        match self {
            Self::SceneGraph(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeSegment> {
        match self {
            Self::Shape(s) => Some(s),
            _ => None,
        }
    }
}
