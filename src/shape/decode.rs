//! Shape LOD segment decoding.

use std::io::{Read, Seek};

use super::bindings::{QuantizationParams, UndecodedArrays, VertexBindings};
use super::lod::*;
use super::ShapeSegment;
use crate::binary::{is_modern, JtReader};
use crate::codec::{read_int_packet, PacketData, PacketOptions};
use crate::core::{
    read_element_header, DecodeContext, DecodeReport, ElementKind, ElementStart,
    LogicalElementHeader, SegmentHeader,
};
use crate::util::{Error, Result};

/// Reads packets until one cannot be decoded, then yields `None` for everything.
struct PacketCursor<'r, 'c, R> {
    reader: &'r mut JtReader<R>,
    opts: PacketOptions,
    report: &'c DecodeReport,
    stalled: bool,
}

impl<'r, 'c, R: Read + Seek> PacketCursor<'r, 'c, R> {
    fn new(reader: &'r mut JtReader<R>, opts: PacketOptions, report: &'c DecodeReport) -> Self {
        Self { reader, opts, report, stalled: false }
    }

    fn packet(&mut self) -> Result<Option<PacketData>> {
        if self.stalled {
            return Ok(None);
        }
        let at = self.reader.position();
        match read_int_packet(&mut *self.reader, self.opts)? {
            PacketData::Unsupported(why) => {
                tracing::debug!(%why, offset = at, "packet not decoded; rest of the shape skipped");
                self.report.unsupported_packet(why);
                self.stalled = true;
                Ok(None)
            }
            packet => Ok(Some(packet)),
        }
    }

    fn packets<const N: usize>(&mut self) -> Result<[Option<PacketData>; N]> {
        let mut out: [Option<PacketData>; N] = std::array::from_fn(|_| None);
        for slot in &mut out {
            *slot = self.packet()?;
        }
        Ok(out)
    }

    /// Plain field read, skipped once stalled.
    fn field<T>(&mut self, read: impl FnOnce(&mut JtReader<R>) -> Result<T>) -> Result<Option<T>> {
        if self.stalled {
            Ok(None)
        } else {
            read(&mut *self.reader).map(Some)
        }
    }
}

/// Decode a shape or shape LOD segment.
///
/// Returns `Ok(None)` when its element is of an unknown or unimplemented
/// type; the report records which.
pub fn decode_shape<R: Read + Seek>(
    reader: &mut JtReader<R>,
    ctx: DecodeContext<'_>,
) -> Result<Option<ShapeSegment>> {
    let header = SegmentHeader::read(reader)?;
    let _span = tracing::debug_span!("shape_segment", guid = %header.guid, kind = %header.kind).entered();

    let element = match read_element_header(reader, None)? {
        ElementStart::Element(h) => h,
        ElementStart::End => {
            tracing::debug!("shape segment holds no element");
            ctx.report.skipped_segment(header.kind);
            return Ok(None);
        }
    };

    match read_shape_lod(reader, &element, ctx) {
        Ok(lod) => Ok(Some(ShapeSegment { header, element, lod })),
        Err(e) if e.is_recoverable() => {
            tracing::debug!(error = %e, "shape segment left undecoded");
            ctx.report.element_error(&e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Decode the element of a shape segment whose header has been read.
pub fn read_shape_lod<R: Read + Seek>(
    reader: &mut JtReader<R>,
    header: &LogicalElementHeader,
    ctx: DecodeContext<'_>,
) -> Result<ShapeLod> {
    let guid = header.object_type;
    let kind = ElementKind::from_guid(&guid)
        .ok_or(Error::UnrecognizedElementType { guid, offset: header.offset })?;
    tracing::debug!(%kind, object_id = header.object_id, "shape element");

    let major = ctx.major;
    Ok(match kind {
        ElementKind::NullShapeLod => ShapeLod::Null(NullShapeLod {
            version: reader.read_version(major)?,
            untransformed_bbox: reader.read_bbox_f32()?,
        }),
        ElementKind::TriStripSetShapeLod => {
            ShapeLod::TriStripSet(read_vertex_shape_lod(reader, header, ctx, true)?)
        }
        ElementKind::PolylineSetShapeLod => {
            ShapeLod::PolylineSet(read_vertex_shape_lod(reader, header, ctx, false)?)
        }
        ElementKind::PointSetShapeLod => {
            ShapeLod::PointSet(read_vertex_shape_lod(reader, header, ctx, false)?)
        }
        ElementKind::PolygonSetShapeLod => {
            ShapeLod::PolygonSet(read_vertex_shape_lod(reader, header, ctx, false)?)
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

fn read_vertex_shape_lod<R: Read + Seek>(
    reader: &mut JtReader<R>,
    header: &LogicalElementHeader,
    ctx: DecodeContext<'_>,
    topological: bool,
) -> Result<VertexShapeLod> {
    let major = ctx.major;
    let base_version = reader.read_version(major)?;
    let version = reader.read_version(major)?;
    let vertex_bindings = VertexBindings(reader.read_u64()?);

    let lod = TopoMeshLodData {
        version: reader.read_version(major)?,
        vertex_records_object_id: reader.read_u32()?,
    };
    let mesh_version = reader.read_version(major)?;

    let undecoded = UndecodedArrays::from_bindings(vertex_bindings);
    let mut cursor = PacketCursor::new(reader, PacketOptions::new(major), ctx.report);
    let mesh = if topological {
        MeshRepresentation::TopologicallyCompressed(read_topologically_compressed(
            &mut cursor,
            lod,
            mesh_version,
            undecoded,
        )?)
    } else {
        MeshRepresentation::Compressed(read_compressed(&mut cursor, lod, mesh_version, undecoded)?)
    };

    let element_version = read_trailing_version(reader, header, major)?;
    Ok(VertexShapeLod { base_version, version, vertex_bindings, mesh, element_version })
}

fn read_compressed<R: Read + Seek>(
    cursor: &mut PacketCursor<'_, '_, R>,
    lod: TopoMeshLodData,
    version: u8,
    undecoded: UndecodedArrays,
) -> Result<CompressedTopoMesh> {
    let face_group_list_index_count = cursor.reader.read_u32()?;
    let primitive_list_index_count = cursor.reader.read_u32()?;
    let vertex_list_index_count = cursor.reader.read_u32()?;

    Ok(CompressedTopoMesh {
        lod,
        version,
        face_group_list_index_count,
        primitive_list_index_count,
        vertex_list_index_count,
        face_group_list_indices: cursor.packet()?,
        primitive_list_indices: cursor.packet()?,
        vertex_list_indices: cursor.packet()?,
        fgpv_list_indices_hash: cursor.field(|r| r.read_i32())?,
        vertex_bindings: cursor.field(|r| r.read_u64().map(VertexBindings))?,
        quantization: cursor.field(QuantizationParams::read)?,
        vertex_record_count: cursor.field(|r| r.read_i32())?,
        unique_vertex_coordinate_lengths: cursor.packet()?,
        unique_vertex_list_map_hash: cursor.field(|r| r.read_i32())?,
        undecoded,
    })
}

fn read_topologically_compressed<R: Read + Seek>(
    cursor: &mut PacketCursor<'_, '_, R>,
    lod: TopoMeshLodData,
    version: u8,
    undecoded: UndecodedArrays,
) -> Result<TopologicallyCompressedTopoMesh> {
    Ok(TopologicallyCompressedTopoMesh {
        lod,
        version,
        face_degrees: cursor.packets()?,
        vertex_valences: cursor.packet()?,
        vertex_groups: cursor.packet()?,
        vertex_flags: cursor.packet()?,
        face_attribute_masks: cursor.packets()?,
        face_attribute_mask8_msb: cursor.packet()?,
        face_attribute_mask8_lsb: cursor.packet()?,
        high_degree_face_attribute_masks: cursor.field(|r| r.read_vec_u32())?,
        split_face_symbols: cursor.packet()?,
        split_face_positions: cursor.packet()?,
        composite_hash: cursor.field(|r| r.read_u32())?,
        undecoded,
    })
}

/// The version closing a vertex shape LOD element sits right before its end.
fn read_trailing_version<R: Read + Seek>(
    reader: &mut JtReader<R>,
    header: &LogicalElementHeader,
    major: u32,
) -> Result<Option<u8>> {
    let width = if is_modern(major) { 1 } else { 2 };
    let Some(end) = header.end() else {
        return Ok(None);
    };
    if end < header.offset + width {
        return Ok(None);
    }
    reader.seek(end - width)?;
    reader.read_version(major).map(Some)
}
