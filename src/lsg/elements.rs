//! Logical scene graph element types.
//!
//! Elements reference each other by object id only; nothing here
//! resolves those ids.

use crate::core::{ElementKind, LogicalElementHeader, SegmentKind};
use crate::shape::{QuantizationParams, VertexBindings};
use crate::util::{BBox3f, CountRange, DMat4, Guid, Vec3, Vec4};

// ============================================================================
// Flags
// ============================================================================

/// Node flags word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct NodeFlags(pub u32);

impl NodeFlags {
    /// Traversals skip this node and its children.
    pub const IGNORE: u32 = 1;

    #[inline]
    pub fn is_ignored(self) -> bool {
        self.0 & Self::IGNORE != 0
    }
}

/// Partition flag: an untransformed bounding box follows the area field.
pub const PARTITION_UNTRANSFORMED_BBOX: i32 = 1;

// ============================================================================
// Shared node data
// ============================================================================

#[derive(Clone, Debug, PartialEq, Default)]
pub struct BaseNodeData {
    pub version: u8,
    pub flags: NodeFlags,
    pub attribute_ids: Vec<i32>,
}

/// Ordered child list on top of [`BaseNodeData`].
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GroupNodeData {
    pub base: BaseNodeData,
    pub version: u8,
    pub child_ids: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct MetaDataNodeData {
    pub group: GroupNodeData,
    pub version: u8,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct LodNodeData {
    pub group: GroupNodeData,
    pub version: u8,
    /// JT 8/9 reserved vector; empty from JT 10 on.
    pub reserved_values: Vec<f32>,
    /// JT 8/9 reserved word.
    pub reserved: Option<i32>,
}

// ============================================================================
// Nodes
// ============================================================================

/// Single reference to a shared subgraph.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceNode {
    pub base: BaseNodeData,
    pub version: u8,
    pub child_id: i32,
}

/// LOD node whose children are selected by viewer distance.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeLodNode {
    pub lod: LodNodeData,
    pub version: u8,
    pub range_limits: Vec<f32>,
    pub center: Vec3,
}

/// Group node showing at most one child.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchNode {
    pub group: GroupNodeData,
    pub version: u8,
    /// Index into the child list; negative when nothing is selected.
    pub selected_child: i32,
}

/// Root of a (possibly external) file partition.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionNode {
    pub group: GroupNodeData,
    pub flags: i32,
    pub file_name: String,
    pub transformed_bbox: BBox3f,
    pub area: f32,
    pub vertex_count_range: CountRange,
    pub node_count_range: CountRange,
    pub polygon_count_range: CountRange,
    pub untransformed_bbox: Option<BBox3f>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PartNode {
    pub meta: MetaDataNodeData,
    pub version: u8,
    pub reserved: i32,
}

// ============================================================================
// Shape nodes
// ============================================================================

#[derive(Clone, Debug, PartialEq, Default)]
pub struct BaseShapeData {
    pub base: BaseNodeData,
    pub version: u8,
    /// JT 8/9 only.
    pub transformed_bbox: Option<BBox3f>,
    pub untransformed_bbox: BBox3f,
    pub area: f32,
    pub vertex_count_range: CountRange,
    pub node_count_range: CountRange,
    pub polygon_count_range: CountRange,
    /// In-memory size of the referenced shape LOD; 0 when unknown.
    pub size: i32,
    pub compression_level: f32,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct VertexShapeData {
    pub shape: BaseShapeData,
    pub version: u8,
    pub vertex_bindings: VertexBindings,
    /// JT 8/9 only.
    pub quantization: Option<QuantizationParams>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolylineSetShape {
    pub vertex: VertexShapeData,
    pub version: u8,
    pub area_factor: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointSetShape {
    pub vertex: VertexShapeData,
    pub version: u8,
    pub area_factor: f32,
    /// Present when the element version is 1.
    pub vertex_bindings: Option<VertexBindings>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NullShapeNode {
    pub shape: BaseShapeData,
    pub version: u8,
}

// ============================================================================
// Attributes
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BaseAttributeData {
    pub version: u8,
    pub state_flags: u8,
    pub field_inhibit_flags: u32,
    /// JT 10 only.
    pub field_final_flags: Option<u32>,
}

impl BaseAttributeData {
    /// Attribute versions from 2 on end with a palette index.
    #[inline]
    pub fn has_palette_index(&self) -> bool {
        self.version >= 2
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialAttribute {
    pub attribute: BaseAttributeData,
    pub version: u8,
    pub data_flags: u16,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub emission: Vec4,
    pub shininess: f32,
    /// Material version 2 and later.
    pub reflectivity: Option<f32>,
    /// JT 10 only.
    pub bumpiness: Option<f32>,
    pub palette_index: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawStyleAttribute {
    pub attribute: BaseAttributeData,
    pub version: u8,
    pub flags: u8,
    pub palette_index: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinestyleAttribute {
    pub attribute: BaseAttributeData,
    pub version: u8,
    pub flags: u8,
    pub line_width: f32,
    pub palette_index: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointstyleAttribute {
    pub attribute: BaseAttributeData,
    pub version: u8,
    pub flags: u8,
    pub point_size: f32,
    pub palette_index: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightSetAttribute {
    pub attribute: BaseAttributeData,
    pub version: u8,
    pub light_ids: Vec<i32>,
    pub palette_index: Option<u32>,
}

/// Local transform; cells absent from the stored-values mask stay identity.
///
/// Mask bits map to row-major cells, bit 15 being the top-left one.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometricTransformAttribute {
    pub attribute: BaseAttributeData,
    pub version: u8,
    pub stored_values_mask: u16,
    pub matrix: DMat4,
}

// ============================================================================
// Property atoms
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BasePropertyAtomData {
    pub version: u8,
    pub state_flags: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StringPropertyAtom {
    pub atom: BasePropertyAtomData,
    pub version: u8,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntegerPropertyAtom {
    pub atom: BasePropertyAtomData,
    pub version: u8,
    pub value: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloatPropertyAtom {
    pub atom: BasePropertyAtomData,
    pub version: u8,
    pub value: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectReferencePropertyAtom {
    pub atom: BasePropertyAtomData,
    pub version: u8,
    pub object_id: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DatePropertyAtom {
    pub atom: BasePropertyAtomData,
    pub version: u8,
    pub year: i16,
    pub month: i16,
    pub day: i16,
    pub hour: i16,
    pub minute: i16,
    pub second: i16,
}

/// Pointer to data stored in another segment.
#[derive(Clone, Debug, PartialEq)]
pub struct LateLoadedPropertyAtom {
    pub atom: BasePropertyAtomData,
    pub version: u8,
    pub segment_id: Guid,
    pub segment_kind: SegmentKind,
    /// JT 10 only.
    pub payload_object_id: Option<i32>,
    /// JT 10 only.
    pub reserved: Option<i32>,
}

// ============================================================================
// Element
// ============================================================================

/// Variant-specific payload of a graph element.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementData {
    BaseNode(BaseNodeData),
    GroupNode(GroupNodeData),
    InstanceNode(InstanceNode),
    LodNode(LodNodeData),
    RangeLodNode(RangeLodNode),
    SwitchNode(SwitchNode),
    PartitionNode(PartitionNode),
    MetaDataNode(MetaDataNodeData),
    PartNode(PartNode),
    BaseShapeNode(BaseShapeData),
    VertexShapeNode(VertexShapeData),
    TriStripSetShapeNode(VertexShapeData),
    PolygonSetShapeNode(VertexShapeData),
    PolylineSetShapeNode(PolylineSetShape),
    PointSetShapeNode(PointSetShape),
    NullShapeNode(NullShapeNode),
    BaseAttribute(BaseAttributeData),
    Material(MaterialAttribute),
    DrawStyle(DrawStyleAttribute),
    GeometricTransform(GeometricTransformAttribute),
    Linestyle(LinestyleAttribute),
    Pointstyle(PointstyleAttribute),
    LightSet(LightSetAttribute),
    BasePropertyAtom(BasePropertyAtomData),
    StringProperty(StringPropertyAtom),
    IntegerProperty(IntegerPropertyAtom),
    FloatProperty(FloatPropertyAtom),
    ObjectReferenceProperty(ObjectReferencePropertyAtom),
    DateProperty(DatePropertyAtom),
    LateLoadedProperty(LateLoadedPropertyAtom),
}

/// One decoded logical element.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphElement {
    pub header: LogicalElementHeader,
    pub data: ElementData,
}

impl GraphElement {
    #[inline]
    pub fn object_id(&self) -> i32 {
        self.header.object_id
    }

    pub fn kind(&self) -> ElementKind {
        match &self.data {
            ElementData::BaseNode(_) => ElementKind::BaseNode,
            ElementData::GroupNode(_) => ElementKind::GroupNode,
            ElementData::InstanceNode(_) => ElementKind::InstanceNode,
            ElementData::LodNode(_) => ElementKind::LodNode,
            ElementData::RangeLodNode(_) => ElementKind::RangeLodNode,
            ElementData::SwitchNode(_) => ElementKind::SwitchNode,
            ElementData::PartitionNode(_) => ElementKind::PartitionNode,
            ElementData::MetaDataNode(_) => ElementKind::MetaDataNode,
            ElementData::PartNode(_) => ElementKind::PartNode,
            ElementData::BaseShapeNode(_) => ElementKind::BaseShapeNode,
            ElementData::VertexShapeNode(_) => ElementKind::VertexShapeNode,
            ElementData::TriStripSetShapeNode(_) => ElementKind::TriStripSetShapeNode,
            ElementData::PolygonSetShapeNode(_) => ElementKind::PolygonSetShapeNode,
            ElementData::PolylineSetShapeNode(_) => ElementKind::PolylineSetShapeNode,
            ElementData::PointSetShapeNode(_) => ElementKind::PointSetShapeNode,
            ElementData::NullShapeNode(_) => ElementKind::NullShapeNode,
            ElementData::BaseAttribute(_) => ElementKind::BaseAttribute,
            ElementData::Material(_) => ElementKind::MaterialAttribute,
            ElementData::DrawStyle(_) => ElementKind::DrawStyleAttribute,
            ElementData::GeometricTransform(_) => ElementKind::GeometricTransformAttribute,
            ElementData::Linestyle(_) => ElementKind::LinestyleAttribute,
            ElementData::Pointstyle(_) => ElementKind::PointstyleAttribute,
            ElementData::LightSet(_) => ElementKind::LightSetAttribute,
            ElementData::BasePropertyAtom(_) => ElementKind::BasePropertyAtom,
            ElementData::StringProperty(_) => ElementKind::StringPropertyAtom,
            ElementData::IntegerProperty(_) => ElementKind::IntegerPropertyAtom,
            ElementData::FloatProperty(_) => ElementKind::FloatPropertyAtom,
            ElementData::ObjectReferenceProperty(_) => ElementKind::ObjectReferencePropertyAtom,
            ElementData::DateProperty(_) => ElementKind::DatePropertyAtom,
            ElementData::LateLoadedProperty(_) => ElementKind::LateLoadedPropertyAtom,
        }
    }

    /// Node data shared by every graph node, shape nodes included.
    pub fn node(&self) -> Option<&BaseNodeData> {
        Some(match &self.data {
            ElementData::BaseNode(n) => n,
            ElementData::InstanceNode(n) => &n.base,
            ElementData::BaseShapeNode(s) => &s.base,
            ElementData::NullShapeNode(s) => &s.shape.base,
            ElementData::VertexShapeNode(v)
            | ElementData::TriStripSetShapeNode(v)
            | ElementData::PolygonSetShapeNode(v) => &v.shape.base,
            ElementData::PolylineSetShapeNode(p) => &p.vertex.shape.base,
            ElementData::PointSetShapeNode(p) => &p.vertex.shape.base,
            _ => return self.group().map(|g| &g.base),
        })
    }

    /// Group data of group-derived nodes.
    pub fn group(&self) -> Option<&GroupNodeData> {
        match &self.data {
            ElementData::GroupNode(g) => Some(g),
            ElementData::LodNode(l) => Some(&l.group),
            ElementData::RangeLodNode(r) => Some(&r.lod.group),
            ElementData::SwitchNode(s) => Some(&s.group),
            ElementData::PartitionNode(p) => Some(&p.group),
            ElementData::MetaDataNode(m) => Some(&m.group),
            ElementData::PartNode(p) => Some(&p.meta.group),
            _ => None,
        }
    }

    /// Object ids of child nodes, including an instance node's target.
    pub fn child_ids(&self) -> &[i32] {
        match &self.data {
            ElementData::InstanceNode(n) => std::slice::from_ref(&n.child_id),
            _ => self.group().map(|g| g.child_ids.as_slice()).unwrap_or(&[]),
        }
    }

    pub fn attribute_ids(&self) -> &[i32] {
        self.node().map(|n| n.attribute_ids.as_slice()).unwrap_or(&[])
    }
}
