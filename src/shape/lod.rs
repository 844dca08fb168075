//! Shape LOD element types.
//!
//! Packet-valued fields are `None` when they were never reached: reading
//! stops at the first packet whose codec is unsupported, since its length
//! is unknown.

use super::bindings::{QuantizationParams, UndecodedArrays, VertexBindings};
use crate::codec::PacketData;
use crate::core::ElementKind;
use crate::util::BBox3f;

/// Common prefix of both TopoMesh representations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TopoMeshLodData {
    pub version: u8,
    /// Object id of the vertex records this mesh refers to.
    pub vertex_records_object_id: u32,
}

/// Non-topological TopoMesh: explicit face-group, primitive and vertex lists.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CompressedTopoMesh {
    pub lod: TopoMeshLodData,
    pub version: u8,
    pub face_group_list_index_count: u32,
    pub primitive_list_index_count: u32,
    pub vertex_list_index_count: u32,
    pub face_group_list_indices: Option<PacketData>,
    pub primitive_list_indices: Option<PacketData>,
    pub vertex_list_indices: Option<PacketData>,
    pub fgpv_list_indices_hash: Option<i32>,
    pub vertex_bindings: Option<VertexBindings>,
    pub quantization: Option<QuantizationParams>,
    pub vertex_record_count: Option<i32>,
    pub unique_vertex_coordinate_lengths: Option<PacketData>,
    pub unique_vertex_list_map_hash: Option<i32>,
    pub undecoded: UndecodedArrays,
}

/// Topologically compressed TopoMesh, used by tri-strip sets.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TopologicallyCompressedTopoMesh {
    pub lod: TopoMeshLodData,
    pub version: u8,
    /// One packet per face-degree context.
    pub face_degrees: [Option<PacketData>; 8],
    pub vertex_valences: Option<PacketData>,
    pub vertex_groups: Option<PacketData>,
    pub vertex_flags: Option<PacketData>,
    pub face_attribute_masks: [Option<PacketData>; 8],
    /// Upper 30 bits of the context-8 face attribute masks.
    pub face_attribute_mask8_msb: Option<PacketData>,
    /// Lower 4 bits of the context-8 face attribute masks.
    pub face_attribute_mask8_lsb: Option<PacketData>,
    pub high_degree_face_attribute_masks: Option<Vec<u32>>,
    pub split_face_symbols: Option<PacketData>,
    pub split_face_positions: Option<PacketData>,
    pub composite_hash: Option<u32>,
    /// The compressed vertex records that follow are not decoded.
    pub undecoded: UndecodedArrays,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MeshRepresentation {
    Compressed(CompressedTopoMesh),
    TopologicallyCompressed(TopologicallyCompressedTopoMesh),
}

impl MeshRepresentation {
    pub fn undecoded(&self) -> &UndecodedArrays {
        match self {
            Self::Compressed(m) => &m.undecoded,
            Self::TopologicallyCompressed(m) => &m.undecoded,
        }
    }

    pub fn lod(&self) -> &TopoMeshLodData {
        match self {
            Self::Compressed(m) => &m.lod,
            Self::TopologicallyCompressed(m) => &m.lod,
        }
    }
}

/// Vertex-based shape LOD (tri-strip, polyline, point or polygon set).
#[derive(Clone, Debug, PartialEq)]
pub struct VertexShapeLod {
    pub base_version: u8,
    pub version: u8,
    pub vertex_bindings: VertexBindings,
    pub mesh: MeshRepresentation,
    /// Version field closing the element; `None` when the element length is unknown.
    pub element_version: Option<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NullShapeLod {
    pub version: u8,
    pub untransformed_bbox: BBox3f,
}

/// The single element of a shape LOD segment.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeLod {
    Null(NullShapeLod),
    TriStripSet(VertexShapeLod),
    PolylineSet(VertexShapeLod),
    PointSet(VertexShapeLod),
    PolygonSet(VertexShapeLod),
}

impl ShapeLod {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Null(_) => ElementKind::NullShapeLod,
            Self::TriStripSet(_) => ElementKind::TriStripSetShapeLod,
            Self::PolylineSet(_) => ElementKind::PolylineSetShapeLod,
            Self::PointSet(_) => ElementKind::PointSetShapeLod,
            Self::PolygonSet(_) => ElementKind::PolygonSetShapeLod,
        }
    }

    pub fn vertex_shape(&self) -> Option<&VertexShapeLod> {
        match self {
            Self::Null(_) => None,
            Self::TriStripSet(v) | Self::PolylineSet(v) | Self::PointSet(v) | Self::PolygonSet(v) => {
                Some(v)
            }
        }
    }
}
