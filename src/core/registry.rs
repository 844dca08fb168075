//! Object type registry: element-type GUIDs and the kinds they denote.
//!
//! A single static table backs both directions of the mapping.

use std::fmt;

use crate::util::Guid;

/// Object type of a logical element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    EndOfElements,

    // Graph nodes
    BaseNode,
    GroupNode,
    InstanceNode,
    LodNode,
    MetaDataNode,
    NullShapeNode,
    PartNode,
    PartitionNode,
    RangeLodNode,
    SwitchNode,
    BaseShapeNode,
    PointSetShapeNode,
    PolygonSetShapeNode,
    PolylineSetShapeNode,
    PrimitiveSetShapeNode,
    TriStripSetShapeNode,
    VertexShapeNode,

    // Attributes
    BaseAttribute,
    DrawStyleAttribute,
    GeometricTransformAttribute,
    InfiniteLightAttribute,
    LightSetAttribute,
    LinestyleAttribute,
    MaterialAttribute,
    PointLightAttribute,
    PointstyleAttribute,
    TextureImageAttribute,
    PaletteMapAttribute,
    MappingPlaneAttribute,
    MappingCylinderAttribute,
    MappingSphereAttribute,
    MappingTriplanarAttribute,

    // Properties
    BasePropertyAtom,
    DatePropertyAtom,
    IntegerPropertyAtom,
    FloatPropertyAtom,
    LateLoadedPropertyAtom,
    ObjectReferencePropertyAtom,
    StringPropertyAtom,

    // Shape LOD elements
    BaseShapeLod,
    VertexShapeLod,
    TriStripSetShapeLod,
    PolylineSetShapeLod,
    PointSetShapeLod,
    PolygonSetShapeLod,
    NullShapeLod,
}

/// Identifier sharing the common `-2ac8-11d1-9b6b-0080c7bb5997` suffix.
const fn std_id(data1: u32) -> Guid {
    Guid::from_parts(data1, 0x2ac8, 0x11d1, 0x9b, 0x6b, 0x00, 0x80, 0xc7, 0xbb, 0x59, 0x97)
}

/// Identifier sharing the `-38fb-11d1-a506-006097bdc6e1` suffix.
const fn meta_id(data1: u32) -> Guid {
    Guid::from_parts(data1, 0x38fb, 0x11d1, 0xa5, 0x06, 0x00, 0x60, 0x97, 0xbd, 0xc6, 0xe1)
}

/// GUID <-> kind table.
pub static REGISTRY: &[(Guid, ElementKind)] = &[
    (Guid::END_OF_ELEMENTS, ElementKind::EndOfElements),

    (std_id(0x10dd1035), ElementKind::BaseNode),
    (std_id(0x10dd101b), ElementKind::GroupNode),
    (std_id(0x10dd102a), ElementKind::InstanceNode),
    (std_id(0x10dd102c), ElementKind::LodNode),
    (meta_id(0xce357245), ElementKind::MetaDataNode),
    (Guid::from_parts(0xd239e7b6, 0xdd77, 0x4289, 0xa0, 0x7d, 0xb0, 0xee, 0x79, 0xf7, 0x94, 0x94), ElementKind::NullShapeNode),
    (meta_id(0xce357244), ElementKind::PartNode),
    (std_id(0x10dd103e), ElementKind::PartitionNode),
    (std_id(0x10dd104c), ElementKind::RangeLodNode),
    (std_id(0x10dd10f3), ElementKind::SwitchNode),
    (std_id(0x10dd1059), ElementKind::BaseShapeNode),
    (Guid::from_parts(0x98134716, 0x0010, 0x0818, 0x19, 0x98, 0x08, 0x00, 0x09, 0x83, 0x5d, 0x5a), ElementKind::PointSetShapeNode),
    (std_id(0x10dd1048), ElementKind::PolygonSetShapeNode),
    (std_id(0x10dd1046), ElementKind::PolylineSetShapeNode),
    (Guid::from_parts(0xe40373c1, 0x1ad9, 0x11d3, 0x9d, 0xaf, 0x00, 0xa0, 0xc9, 0xc7, 0xdd, 0xc2), ElementKind::PrimitiveSetShapeNode),
    (std_id(0x10dd1077), ElementKind::TriStripSetShapeNode),
    (std_id(0x10dd107f), ElementKind::VertexShapeNode),

    (std_id(0x10dd1001), ElementKind::BaseAttribute),
    (std_id(0x10dd1014), ElementKind::DrawStyleAttribute),
    (std_id(0x10dd1083), ElementKind::GeometricTransformAttribute),
    (std_id(0x10dd1028), ElementKind::InfiniteLightAttribute),
    (std_id(0x10dd1096), ElementKind::LightSetAttribute),
    (std_id(0x10dd10c4), ElementKind::LinestyleAttribute),
    (std_id(0x10dd1030), ElementKind::MaterialAttribute),
    (std_id(0x10dd1045), ElementKind::PointLightAttribute),
    (Guid::from_parts(0x8d57c010, 0xe5cb, 0x11d4, 0x84, 0x0e, 0x00, 0xa0, 0xd2, 0x18, 0x2f, 0x9d), ElementKind::PointstyleAttribute),
    (std_id(0x10dd1073), ElementKind::TextureImageAttribute),
    (std_id(0x10dd1106), ElementKind::PaletteMapAttribute),
    (Guid::from_parts(0xa3cfb921, 0xbdeb, 0x48d7, 0xb3, 0x96, 0x8b, 0x8d, 0x0e, 0xf4, 0x85, 0xa0), ElementKind::MappingPlaneAttribute),
    (Guid::from_parts(0x3e70739d, 0x8cb0, 0x41ef, 0x84, 0x5c, 0xa1, 0x98, 0xd4, 0x00, 0x3b, 0x3f), ElementKind::MappingCylinderAttribute),
    (Guid::from_parts(0x72475fd1, 0x2823, 0x4219, 0xa0, 0x6c, 0xd9, 0xe6, 0xe3, 0x9a, 0x45, 0xc1), ElementKind::MappingSphereAttribute),
    (Guid::from_parts(0x92f5b094, 0x6499, 0x4d2d, 0x92, 0xaa, 0x60, 0xd0, 0x5a, 0x44, 0x32, 0xcf), ElementKind::MappingTriplanarAttribute),

    (std_id(0x10dd104b), ElementKind::BasePropertyAtom),
    (meta_id(0xce357246), ElementKind::DatePropertyAtom),
    (std_id(0x10dd102b), ElementKind::IntegerPropertyAtom),
    (std_id(0x10dd1019), ElementKind::FloatPropertyAtom),
    (Guid::from_parts(0xe0b05be5, 0xfbbd, 0x11d1, 0xa3, 0xa7, 0x00, 0xaa, 0x00, 0xd1, 0x09, 0x54), ElementKind::LateLoadedPropertyAtom),
    (std_id(0x10dd1004), ElementKind::ObjectReferencePropertyAtom),
    (std_id(0x10dd106e), ElementKind::StringPropertyAtom),

    (std_id(0x10dd10a4), ElementKind::BaseShapeLod),
    (std_id(0x10dd10b0), ElementKind::VertexShapeLod),
    (std_id(0x10dd10ab), ElementKind::TriStripSetShapeLod),
    (std_id(0x10dd10a1), ElementKind::PolylineSetShapeLod),
    (Guid::from_parts(0x98134716, 0x0011, 0x0818, 0x19, 0x98, 0x08, 0x00, 0x09, 0x83, 0x5d, 0x5a), ElementKind::PointSetShapeLod),
    (std_id(0x10dd109f), ElementKind::PolygonSetShapeLod),
    (Guid::from_parts(0x3e637aed, 0x2a89, 0x41f8, 0xa9, 0xfd, 0x55, 0x37, 0x37, 0x03, 0x96, 0x82), ElementKind::NullShapeLod),
];

impl ElementKind {
    /// Resolve an element-type GUID.
    pub fn from_guid(guid: &Guid) -> Option<Self> {
        REGISTRY.iter().find(|(g, _)| g == guid).map(|(_, kind)| *kind)
    }

    /// Canonical GUID of this kind.
    pub fn guid(self) -> Guid {
        REGISTRY
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(g, _)| *g)
            .unwrap_or(Guid::END_OF_ELEMENTS)
    }

    /// Human-readable name, as used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::EndOfElements => "End-Of-Elements",
            Self::BaseNode => "Base Node",
            Self::GroupNode => "Group Node",
            Self::InstanceNode => "Instance Node",
            Self::LodNode => "LOD Node",
            Self::MetaDataNode => "Meta Data Node",
            Self::NullShapeNode => "Null Shape Node",
            Self::PartNode => "Part Node",
            Self::PartitionNode => "Partition Node",
            Self::RangeLodNode => "Range LOD Node",
            Self::SwitchNode => "Switch Node",
            Self::BaseShapeNode => "Base Shape Node",
            Self::PointSetShapeNode => "Point Set Shape Node",
            Self::PolygonSetShapeNode => "Polygon Set Shape Node",
            Self::PolylineSetShapeNode => "Polyline Set Shape Node",
            Self::PrimitiveSetShapeNode => "Primitive Set Shape Node",
            Self::TriStripSetShapeNode => "Tri-Strip Set Shape Node",
            Self::VertexShapeNode => "Vertex Shape Node",
            Self::BaseAttribute => "Base Attribute",
            Self::DrawStyleAttribute => "Draw Style Attribute",
            Self::GeometricTransformAttribute => "Geometric Transform Attribute",
            Self::InfiniteLightAttribute => "Infinite Light Attribute",
            Self::LightSetAttribute => "Light Set Attribute",
            Self::LinestyleAttribute => "Linestyle Attribute",
            Self::MaterialAttribute => "Material Attribute",
            Self::PointLightAttribute => "Point Light Attribute",
            Self::PointstyleAttribute => "Pointstyle Attribute",
            Self::TextureImageAttribute => "Texture Image Attribute",
            Self::PaletteMapAttribute => "Palette Map Attribute",
            Self::MappingPlaneAttribute => "Mapping Plane Attribute",
            Self::MappingCylinderAttribute => "Mapping Cylinder Attribute",
            Self::MappingSphereAttribute => "Mapping Sphere Attribute",
            Self::MappingTriplanarAttribute => "Mapping TriPlanar Attribute",
            Self::BasePropertyAtom => "Base Property Atom",
            Self::DatePropertyAtom => "Date Property Atom",
            Self::IntegerPropertyAtom => "Integer Property Atom",
            Self::FloatPropertyAtom => "Floating Point Property Atom",
            Self::LateLoadedPropertyAtom => "Late Loaded Property Atom",
            Self::ObjectReferencePropertyAtom => "Object Reference Property Atom",
            Self::StringPropertyAtom => "String Property Atom",
            Self::BaseShapeLod => "Base Shape LOD",
            Self::VertexShapeLod => "Vertex Shape LOD",
            Self::TriStripSetShapeLod => "Tri-Strip Set Shape LOD",
            Self::PolylineSetShapeLod => "Polyline Set Shape LOD",
            Self::PointSetShapeLod => "Point Set Shape LOD",
            Self::PolygonSetShapeLod => "Polygon Set Shape LOD",
            Self::NullShapeLod => "Null Shape LOD",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
