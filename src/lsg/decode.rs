//! Logical scene graph segment decoding.

use std::io::{Read, Seek};

use super::elements::*;
use super::SceneGraphSegment;
use crate::binary::{is_modern, JtReader};
use crate::core::{
    read_element_header, CompressionHeader, DecodeContext, ElementKind, ElementStart,
    LogicalElementHeader, SegmentHeader, SegmentKind,
};
use crate::shape::{QuantizationParams, VertexBindings};
use crate::util::{dmat4_from_rows, Error, Result};

/// Decode one LSG segment starting at its segment header.
pub fn decode_scene_graph<R: Read + Seek>(
    reader: &mut JtReader<R>,
    ctx: DecodeContext<'_>,
) -> Result<SceneGraphSegment> {
    let header = SegmentHeader::read(reader)?;
    let _span = tracing::debug_span!("lsg_segment", guid = %header.guid).entered();

    let compression = if header.kind.is_compressible() {
        Some(CompressionHeader::read(reader)?)
    } else {
        None
    };

    let (elements, truncated, algorithm) = match compression {
        Some(c) if c.is_compressed() => {
            let algorithm = c.algorithm(reader.position() - 1)?;
            let packed_offset = reader.position();
            let mut inflated = reader.decompress(c.payload_len()?, algorithm)?;
            let (elements, truncated) =
                read_elements(&mut inflated, compression, ctx).map_err(|e| Error::Inflated {
                    algorithm: algorithm.name(),
                    packed_offset,
                    source: Box::new(e),
                })?;
            (elements, truncated, Some(algorithm))
        }
        _ => {
            let (elements, truncated) = read_elements(reader, compression, ctx)?;
            (elements, truncated, None)
        }
    };

    tracing::debug!(elements = elements.len(), truncated, "decoded scene graph segment");
    Ok(SceneGraphSegment::new(header, algorithm, elements, truncated))
}

/// Walk the element list until the end marker or the first recoverable error.
///
/// Returns the decoded elements and whether the list was cut short.
fn read_elements<R: Read + Seek>(
    reader: &mut JtReader<R>,
    first: Option<CompressionHeader>,
    ctx: DecodeContext<'_>,
) -> Result<(Vec<GraphElement>, bool)> {
    let mut compression = first;
    let mut elements = Vec::new();
    loop {
        let header = match read_element_header(reader, compression.take())? {
            ElementStart::End => return Ok((elements, false)),
            ElementStart::Element(h) => h,
        };

        match read_element(reader, &header, ctx.major) {
            Ok(data) => elements.push(GraphElement { header, data }),
            Err(e) if e.is_recoverable() => {
                tracing::debug!(error = %e, decoded = elements.len(), "element list cut short");
                ctx.report.element_error(&e);
                return Ok((elements, true));
            }
            Err(e) => return Err(e),
        }
        realign(reader, &header)?;
    }
}

/// Move to the declared end of an element when decoding consumed a different amount.
fn realign<R: Read + Seek>(
    reader: &mut JtReader<R>,
    header: &LogicalElementHeader,
) -> Result<()> {
    let Some(end) = header.end() else {
        return Ok(());
    };
    let pos = reader.position();
    if pos != end {
        if pos > end {
            tracing::warn!(
                object_id = header.object_id,
                overrun = pos - end,
                "element decoder read past the declared element length"
            );
        } else {
            tracing::trace!(object_id = header.object_id, skipped = end - pos, "skipping trailing element bytes");
        }
        reader.seek(end)?;
    }
    Ok(())
}

/// Decode the payload of one element whose header has been read.
pub fn read_element<R: Read + Seek>(
    reader: &mut JtReader<R>,
    header: &LogicalElementHeader,
    major: u32,
) -> Result<ElementData> {
    let guid = header.object_type;
    let kind = ElementKind::from_guid(&guid)
        .ok_or(Error::UnrecognizedElementType { guid, offset: header.offset })?;
    tracing::trace!(%kind, object_id = header.object_id, offset = header.offset, "element");

    let r = reader;
    Ok(match kind {
        ElementKind::BaseNode => ElementData::BaseNode(read_base_node_data(r, major)?),
        ElementKind::GroupNode => ElementData::GroupNode(read_group_node_data(r, major)?),
        ElementKind::InstanceNode => ElementData::InstanceNode(InstanceNode {
            base: read_base_node_data(r, major)?,
            version: r.read_version(major)?,
            child_id: r.read_i32()?,
        }),
        ElementKind::LodNode => ElementData::LodNode(read_lod_node_data(r, major)?),
        ElementKind::RangeLodNode => ElementData::RangeLodNode(RangeLodNode {
            lod: read_lod_node_data(r, major)?,
            version: r.read_version(major)?,
            range_limits: r.read_vec_f32()?,
            center: r.read_coord_f32()?,
        }),
        ElementKind::SwitchNode => ElementData::SwitchNode(SwitchNode {
            group: read_group_node_data(r, major)?,
            version: r.read_version(major)?,
            selected_child: r.read_i32()?,
        }),
        ElementKind::PartitionNode => ElementData::PartitionNode(read_partition(r, major)?),
        ElementKind::MetaDataNode => ElementData::MetaDataNode(read_meta_data_node_data(r, major)?),
        ElementKind::PartNode => ElementData::PartNode(PartNode {
            meta: read_meta_data_node_data(r, major)?,
            version: r.read_version(major)?,
            reserved: r.read_i32()?,
        }),

        ElementKind::BaseShapeNode => ElementData::BaseShapeNode(read_base_shape_data(r, major)?),
        ElementKind::VertexShapeNode => ElementData::VertexShapeNode(read_vertex_shape_data(r, major)?),
        ElementKind::TriStripSetShapeNode => {
            ElementData::TriStripSetShapeNode(read_vertex_shape_data(r, major)?)
        }
        ElementKind::PolygonSetShapeNode => {
            ElementData::PolygonSetShapeNode(read_vertex_shape_data(r, major)?)
        }
        ElementKind::PolylineSetShapeNode => ElementData::PolylineSetShapeNode(PolylineSetShape {
            vertex: read_vertex_shape_data(r, major)?,
            version: r.read_version(major)?,
            area_factor: r.read_f32()?,
        }),
        ElementKind::PointSetShapeNode => {
            let vertex = read_vertex_shape_data(r, major)?;
            let version = r.read_version(major)?;
            let area_factor = r.read_f32()?;
            let vertex_bindings = if version == 1 {
                Some(VertexBindings(r.read_u64()?))
            } else {
                None
            };
            ElementData::PointSetShapeNode(PointSetShape { vertex, version, area_factor, vertex_bindings })
        }
        ElementKind::NullShapeNode => ElementData::NullShapeNode(NullShapeNode {
            shape: read_base_shape_data(r, major)?,
            version: r.read_version(major)?,
        }),

        ElementKind::BaseAttribute => ElementData::BaseAttribute(read_base_attribute_data(r, major)?),
        ElementKind::MaterialAttribute => ElementData::Material(read_material(r, major)?),
        ElementKind::DrawStyleAttribute => {
            let attribute = read_base_attribute_data(r, major)?;
            ElementData::DrawStyle(DrawStyleAttribute {
                attribute,
                version: r.read_version(major)?,
                flags: r.read_u8()?,
                palette_index: read_palette_index(r, &attribute)?,
            })
        }
        ElementKind::LinestyleAttribute => {
            let attribute = read_base_attribute_data(r, major)?;
            ElementData::Linestyle(LinestyleAttribute {
                attribute,
                version: r.read_version(major)?,
                flags: r.read_u8()?,
                line_width: r.read_f32()?,
                palette_index: read_palette_index(r, &attribute)?,
            })
        }
        ElementKind::PointstyleAttribute => {
            let attribute = read_base_attribute_data(r, major)?;
            ElementData::Pointstyle(PointstyleAttribute {
                attribute,
                version: r.read_version(major)?,
                flags: r.read_u8()?,
                point_size: r.read_f32()?,
                palette_index: read_palette_index(r, &attribute)?,
            })
        }
        ElementKind::LightSetAttribute => {
            let attribute = read_base_attribute_data(r, major)?;
            ElementData::LightSet(LightSetAttribute {
                attribute,
                version: r.read_version(major)?,
                light_ids: r.read_vec_i32()?,
                palette_index: read_palette_index(r, &attribute)?,
            })
        }
        ElementKind::GeometricTransformAttribute => {
            ElementData::GeometricTransform(read_geometric_transform(r, major)?)
        }

        ElementKind::BasePropertyAtom => ElementData::BasePropertyAtom(read_atom_data(r, major)?),
        ElementKind::StringPropertyAtom => ElementData::StringProperty(StringPropertyAtom {
            atom: read_atom_data(r, major)?,
            version: r.read_version(major)?,
            value: r.read_mb_string()?,
        }),
        ElementKind::IntegerPropertyAtom => ElementData::IntegerProperty(IntegerPropertyAtom {
            atom: read_atom_data(r, major)?,
            version: r.read_version(major)?,
            value: r.read_i32()?,
        }),
        ElementKind::FloatPropertyAtom => ElementData::FloatProperty(FloatPropertyAtom {
            atom: read_atom_data(r, major)?,
            version: r.read_version(major)?,
            value: r.read_f32()?,
        }),
        ElementKind::ObjectReferencePropertyAtom => {
            ElementData::ObjectReferenceProperty(ObjectReferencePropertyAtom {
                atom: read_atom_data(r, major)?,
                version: r.read_version(major)?,
                object_id: r.read_i32()?,
            })
        }
        ElementKind::DatePropertyAtom => ElementData::DateProperty(DatePropertyAtom {
            atom: read_atom_data(r, major)?,
            version: r.read_version(major)?,
            year: r.read_i16()?,
            month: r.read_i16()?,
            day: r.read_i16()?,
            hour: r.read_i16()?,
            minute: r.read_i16()?,
            second: r.read_i16()?,
        }),
        ElementKind::LateLoadedPropertyAtom => {
            let atom = read_atom_data(r, major)?;
            let version = r.read_version(major)?;
            let segment_id = r.read_guid()?;
            let segment_kind = SegmentKind::from_raw(r.read_i32()? as u32);
            let (payload_object_id, reserved) = if is_modern(major) {
                (Some(r.read_i32()?), Some(r.read_i32()?))
            } else {
                (None, None)
            };
            ElementData::LateLoadedProperty(LateLoadedPropertyAtom {
                atom,
                version,
                segment_id,
                segment_kind,
                payload_object_id,
                reserved,
            })
        }

        other => {
            return Err(Error::UnimplementedDecoder {
                kind: other.name(),
                guid,
                offset: header.offset,
            })
        }
    })
}

// ============================================================================
// Node data
// ============================================================================

fn read_base_node_data<R: Read + Seek>(r: &mut JtReader<R>, major: u32) -> Result<BaseNodeData> {
    Ok(BaseNodeData {
        version: r.read_version(major)?,
        flags: NodeFlags(r.read_u32()?),
        attribute_ids: r.read_vec_i32()?,
    })
}

fn read_group_node_data<R: Read + Seek>(r: &mut JtReader<R>, major: u32) -> Result<GroupNodeData> {
    Ok(GroupNodeData {
        base: read_base_node_data(r, major)?,
        version: r.read_version(major)?,
        child_ids: r.read_vec_i32()?,
    })
}

fn read_meta_data_node_data<R: Read + Seek>(
    r: &mut JtReader<R>,
    major: u32,
) -> Result<MetaDataNodeData> {
    Ok(MetaDataNodeData {
        group: read_group_node_data(r, major)?,
        version: r.read_version(major)?,
    })
}

fn read_lod_node_data<R: Read + Seek>(r: &mut JtReader<R>, major: u32) -> Result<LodNodeData> {
    let group = read_group_node_data(r, major)?;
    let version = r.read_version(major)?;
    let (reserved_values, reserved) = if is_modern(major) {
        (Vec::new(), None)
    } else {
        (r.read_vec_f32()?, Some(r.read_i32()?))
    };
    Ok(LodNodeData { group, version, reserved_values, reserved })
}

fn read_partition<R: Read + Seek>(r: &mut JtReader<R>, major: u32) -> Result<PartitionNode> {
    let group = read_group_node_data(r, major)?;
    let flags = r.read_i32()?;
    let file_name = r.read_mb_string()?;
    let transformed_bbox = r.read_bbox_f32()?;
    let area = r.read_f32()?;
    let vertex_count_range = r.read_count_range()?;
    let node_count_range = r.read_count_range()?;
    let polygon_count_range = r.read_count_range()?;
    let untransformed_bbox = if flags & PARTITION_UNTRANSFORMED_BBOX != 0 {
        Some(r.read_bbox_f32()?)
    } else {
        None
    };
    Ok(PartitionNode {
        group,
        flags,
        file_name,
        transformed_bbox,
        area,
        vertex_count_range,
        node_count_range,
        polygon_count_range,
        untransformed_bbox,
    })
}

// ============================================================================
// Shape node data
// ============================================================================

fn read_base_shape_data<R: Read + Seek>(r: &mut JtReader<R>, major: u32) -> Result<BaseShapeData> {
    let base = read_base_node_data(r, major)?;
    let version = r.read_version(major)?;
    let transformed_bbox = if is_modern(major) { None } else { Some(r.read_bbox_f32()?) };
    Ok(BaseShapeData {
        base,
        version,
        transformed_bbox,
        untransformed_bbox: r.read_bbox_f32()?,
        area: r.read_f32()?,
        vertex_count_range: r.read_count_range()?,
        node_count_range: r.read_count_range()?,
        polygon_count_range: r.read_count_range()?,
        size: r.read_i32()?,
        compression_level: r.read_f32()?,
    })
}

fn read_vertex_shape_data<R: Read + Seek>(
    r: &mut JtReader<R>,
    major: u32,
) -> Result<VertexShapeData> {
    let shape = read_base_shape_data(r, major)?;
    let version = r.read_version(major)?;
    let vertex_bindings = VertexBindings(r.read_u64()?);
    let quantization = if is_modern(major) {
        None
    } else {
        Some(QuantizationParams::read(r)?)
    };
    Ok(VertexShapeData { shape, version, vertex_bindings, quantization })
}

// ============================================================================
// Attribute data
// ============================================================================

fn read_base_attribute_data<R: Read + Seek>(
    r: &mut JtReader<R>,
    major: u32,
) -> Result<BaseAttributeData> {
    Ok(BaseAttributeData {
        version: r.read_version(major)?,
        state_flags: r.read_u8()?,
        field_inhibit_flags: r.read_u32()?,
        field_final_flags: if is_modern(major) { Some(r.read_u32()?) } else { None },
    })
}

fn read_palette_index<R: Read + Seek>(
    r: &mut JtReader<R>,
    attribute: &BaseAttributeData,
) -> Result<Option<u32>> {
    if attribute.has_palette_index() {
        Ok(Some(r.read_u32()?))
    } else {
        Ok(None)
    }
}

fn read_material<R: Read + Seek>(r: &mut JtReader<R>, major: u32) -> Result<MaterialAttribute> {
    let attribute = read_base_attribute_data(r, major)?;
    let version = r.read_version(major)?;
    let data_flags = r.read_u16()?;
    let ambient = r.read_rgba()?;
    let diffuse = r.read_rgba()?;
    let specular = r.read_rgba()?;
    let emission = r.read_rgba()?;
    let shininess = r.read_f32()?;
    let reflectivity = if version >= 2 { Some(r.read_f32()?) } else { None };
    let bumpiness = if is_modern(major) { Some(r.read_f32()?) } else { None };
    let palette_index = read_palette_index(r, &attribute)?;
    Ok(MaterialAttribute {
        attribute,
        version,
        data_flags,
        ambient,
        diffuse,
        specular,
        emission,
        shininess,
        reflectivity,
        bumpiness,
        palette_index,
    })
}

fn read_geometric_transform<R: Read + Seek>(
    r: &mut JtReader<R>,
    major: u32,
) -> Result<GeometricTransformAttribute> {
    let attribute = read_base_attribute_data(r, major)?;
    let version = r.read_version(major)?;
    let stored_values_mask = r.read_u16()?;

    let mut values = [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];
    for (i, v) in values.iter_mut().enumerate() {
        if stored_values_mask & (0x8000 >> i) != 0 {
            *v = if is_modern(major) { r.read_f64()? } else { f64::from(r.read_f32()?) };
        }
    }
    Ok(GeometricTransformAttribute {
        attribute,
        version,
        stored_values_mask,
        matrix: dmat4_from_rows(&values),
    })
}

fn read_atom_data<R: Read + Seek>(r: &mut JtReader<R>, major: u32) -> Result<BasePropertyAtomData> {
    Ok(BasePropertyAtomData {
        version: r.read_version(major)?,
        state_flags: r.read_u32()?,
    })
}
