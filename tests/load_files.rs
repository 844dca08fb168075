//! End-to-end decoding of crafted JT files.

mod common;

use std::io::Write;

use common::*;
use jt::binary::{ByteOrder, CompressionAlgorithm};
use jt::core::{ElementKind, Segment, SegmentKind};
use jt::file::{JtFile, LoadOptions};
use jt::lsg::ElementData;
use jt::shape::ShapeLod;
use jt::util::Vec3;
use jt::Error;
use tempfile::NamedTempFile;

fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut temp = NamedTempFile::new().expect("Failed to create temp file");
    temp.write_all(bytes).expect("Failed to write fixture");
    temp.flush().unwrap();
    temp
}

fn partition_file(major: u32, big: bool) -> Vec<u8> {
    let root = guid(1);
    let mut b = JtBuilder::new(major, big, root);
    let body = partition_body(&b, "engine.jt", 1);
    b.lsg(root, &[Element { kind: ElementKind::PartitionNode, object_id: 0, body }], Packing::None);
    b.build()
}

/// Root LSG with a group, two metadata, one PMI and one shape LOD segment.
fn mixed_file(major: u32) -> Vec<u8> {
    let root = guid(1);
    let mut b = JtBuilder::new(major, false, root);
    let elements = [
        Element { kind: ElementKind::PartitionNode, object_id: 0, body: partition_body(&b, "", 0) },
        Element { kind: ElementKind::GroupNode, object_id: 1, body: group_body(&b, &[2]) },
        Element { kind: ElementKind::MaterialAttribute, object_id: 2, body: material_body(&b) },
    ];
    b.lsg(root, &elements, Packing::None);
    b.segment(guid(2), METADATA, vec![0; 16]);
    b.segment(guid(3), METADATA, vec![0; 8]);
    b.segment(guid(4), PMI, vec![0; 4]);
    b.null_shape(guid(5));
    b.build()
}

#[test]
fn test_partition_end_to_end() {
    let temp = write_temp(&partition_file(10, false));
    let file = JtFile::open(temp.path()).expect("Failed to open");

    assert_eq!(file.major, 10);
    assert_eq!(file.byte_order, ByteOrder::Little);
    assert!(file.version.starts_with("Version 10.0"));
    assert_eq!(file.toc.len(), 1);
    assert_eq!(file.root_segment_id, guid(1));

    let lsg = file
        .root_segment()
        .and_then(Segment::as_scene_graph)
        .expect("root should be a scene graph");
    assert_eq!(lsg.header.guid, guid(1));
    assert_eq!(lsg.header.kind, SegmentKind::LogicalSceneGraph);
    assert_eq!(lsg.elements.len(), 1);
    assert!(!lsg.truncated);

    let ElementData::PartitionNode(p) = &lsg.elements[0].data else {
        panic!("expected a partition node");
    };
    assert_eq!(lsg.elements[0].header.object_type, ElementKind::PartitionNode.guid());
    assert_eq!(p.flags, 1);
    assert_eq!(p.file_name, "engine.jt");
    assert_eq!(p.transformed_bbox.min, Vec3::new(-1.0, -2.0, -3.0));
    assert_eq!(p.transformed_bbox.max, Vec3::new(4.0, 5.0, 6.0));
    assert_eq!(p.area, 42.0);
    assert_eq!(p.vertex_count_range.min, 1);
    assert_eq!(p.polygon_count_range.max, 6);
    assert_eq!(p.untransformed_bbox.map(|b| b.max), Some(Vec3::ONE));
    assert!(file.summary.is_clean());
}

#[test]
fn test_big_endian_legacy_file() {
    let file = JtFile::from_bytes(&partition_file(9, true), LoadOptions::new()).unwrap();
    assert_eq!(file.major, 9);
    assert_eq!(file.byte_order, ByteOrder::Big);
    let lsg = file.root_segment().and_then(Segment::as_scene_graph).unwrap();
    let ElementData::PartitionNode(p) = &lsg.elements[0].data else {
        panic!("expected a partition node");
    };
    assert_eq!(p.file_name, "engine.jt");
    assert_eq!(p.transformed_bbox.max, Vec3::new(4.0, 5.0, 6.0));
}

#[test]
fn test_toc_entries_and_kinds() {
    let file = JtFile::from_bytes(&mixed_file(10), LoadOptions::new()).unwrap();

    assert_eq!(file.toc.len(), 5);
    assert_eq!(file.toc.entries().len(), 5);
    for n in 1..=5 {
        assert!(file.toc.contains(&guid(n)), "missing segment {}", n);
    }
    let kinds = file.toc.kind_counts();
    assert_eq!(kinds[&SegmentKind::LogicalSceneGraph], 1);
    assert_eq!(kinds[&SegmentKind::MetaData], 2);
    assert_eq!(kinds[&SegmentKind::PmiData], 1);
    assert_eq!(kinds[&SegmentKind::ShapeLod(0)], 1);

    // metadata and PMI have no decoder
    assert!(file.segment(&guid(2)).is_none());
    assert!(file.segment(&guid(4)).is_none());
    assert_eq!(file.summary.skipped_segments[&SegmentKind::MetaData], 2);
    assert_eq!(file.summary.skipped_segments[&SegmentKind::PmiData], 1);
    assert_eq!(file.toc.decoded_count(), 2);

    let shape = file.segment(&guid(5)).and_then(Segment::as_shape).unwrap();
    assert!(matches!(shape.lod, ShapeLod::Null(_)));
}

#[test]
fn test_parallel_matches_serial() {
    let bytes = mixed_file(10);
    let temp = write_temp(&bytes);

    let serial = JtFile::open(temp.path()).unwrap();
    let parallel = JtFile::open_with(temp.path(), LoadOptions::new().parallel(true)).unwrap();
    let owned = JtFile::open_with(temp.path(), LoadOptions::new().whole_file(true).mmap(false)).unwrap();
    let in_memory = JtFile::from_bytes(&bytes, LoadOptions::new().parallel(true)).unwrap();

    for other in [&parallel, &owned, &in_memory] {
        let mut a: Vec<_> = serial.toc.segments().keys().collect();
        let mut b: Vec<_> = other.toc.segments().keys().collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);

        for (guid, segment) in serial.toc.segments() {
            let theirs = other.toc.segments().get(guid).unwrap();
            assert_eq!(segment.is_some(), theirs.is_some());
            if let (Some(Segment::SceneGraph(x)), Some(Segment::SceneGraph(y))) = (segment, theirs) {
                assert_eq!(x.elements.len(), y.elements.len());
                assert_eq!(x.elements, y.elements);
            }
        }
        assert_eq!(serial.summary, other.summary);
    }
}

#[test]
fn test_material_version_branching() {
    for major in [9, 10] {
        let root = guid(1);
        let mut b = JtBuilder::new(major, major == 9, root);
        let elements = [
            Element { kind: ElementKind::MaterialAttribute, object_id: 0, body: material_body(&b) },
            Element { kind: ElementKind::GroupNode, object_id: 1, body: group_body(&b, &[7, 8]) },
        ];
        b.lsg(root, &elements, Packing::None);
        let file = JtFile::from_bytes(&b.build(), LoadOptions::new()).unwrap();

        let lsg = file.root_segment().and_then(Segment::as_scene_graph).unwrap();
        assert_eq!(lsg.elements.len(), 2, "major {}", major);
        let ElementData::Material(m) = &lsg.elements[0].data else {
            panic!("expected a material");
        };
        assert_eq!(m.shininess, 10.0);
        assert_eq!(m.reflectivity, Some(0.25));
        assert_eq!(m.palette_index, Some(3));
        assert_eq!(m.bumpiness.is_some(), major >= 10);
        assert_eq!(m.attribute.field_final_flags.is_some(), major >= 10);
        // the following element still lines up
        assert_eq!(lsg.elements[1].child_ids(), &[7, 8]);
    }
}

#[test]
fn test_compressed_scene_graph() {
    for (packing, algorithm) in [
        (Packing::Zlib, CompressionAlgorithm::Zlib),
        (Packing::Lzma, CompressionAlgorithm::Lzma),
    ] {
        let root = guid(1);
        let mut b = JtBuilder::new(10, false, root);
        let elements = [
            Element { kind: ElementKind::PartitionNode, object_id: 0, body: partition_body(&b, "a.jt", 0) },
            Element { kind: ElementKind::GroupNode, object_id: 1, body: group_body(&b, &[]) },
        ];
        b.lsg(root, &elements, packing);
        let file = JtFile::from_bytes(&b.build(), LoadOptions::new()).unwrap();

        let lsg = file.root_segment().and_then(Segment::as_scene_graph).unwrap();
        assert_eq!(lsg.compression, Some(algorithm));
        assert_eq!(lsg.elements.len(), 2);
        assert_eq!(lsg.root().map(|e| e.kind()), Some(ElementKind::PartitionNode));
        assert_eq!(lsg.children(lsg.root().unwrap()).count(), 0);
    }
}

#[test]
fn test_unknown_element_truncates_segment_only() {
    let root = guid(1);
    let mut b = JtBuilder::new(10, false, root);
    let elements = [
        Element { kind: ElementKind::GroupNode, object_id: 0, body: group_body(&b, &[1]) },
        Element { kind: ElementKind::TextureImageAttribute, object_id: 1, body: vec![0; 12] },
        Element { kind: ElementKind::GroupNode, object_id: 2, body: group_body(&b, &[]) },
    ];
    b.lsg(root, &elements, Packing::None);
    b.null_shape(guid(2));
    let file = JtFile::from_bytes(&b.build(), LoadOptions::new()).unwrap();

    let lsg = file.root_segment().and_then(Segment::as_scene_graph).unwrap();
    assert!(lsg.truncated);
    assert_eq!(lsg.elements.len(), 1);
    assert_eq!(file.summary.unimplemented_elements["Texture Image Attribute"], 1);
    // other segments still decode
    assert!(file.segment(&guid(2)).is_some());
}

#[test]
fn test_truncated_file_is_fatal() {
    let mut bytes = partition_file(10, false);
    // drop the last TOC attribute word
    bytes.truncate(bytes.len() - 4);

    let err = JtFile::from_bytes(&bytes, LoadOptions::new()).unwrap_err();
    assert!(matches!(err, Error::OutOfData { .. }));
}

#[test]
fn test_fatal_error_names_segment() {
    let root = guid(1);
    let mut b = JtBuilder::new(10, false, root);
    // a group node claiming far more children than its body holds
    let mut body = b.w();
    body.version(10, 1).u32(0).vec_i32(&[]);
    body.version(10, 1).i32(1000).i32(7);
    let body = body.buf;
    b.lsg(root, &[Element { kind: ElementKind::GroupNode, object_id: 0, body }], Packing::Zlib);
    let bytes = b.build();

    for options in [LoadOptions::new(), LoadOptions::new().parallel(true)] {
        let err = JtFile::from_bytes(&bytes, options).unwrap_err();
        let Error::Segment { guid: at, offset, source } = &err else {
            panic!("expected segment context, got {:?}", err);
        };
        assert_eq!(*at, root);
        // header (80 + 1 + 4 + 8 + 16) then the first segment
        assert_eq!(*offset, 109);
        assert!(matches!(**source, Error::Inflated { algorithm: "zlib", .. }));
        assert!(matches!(err.root_cause(), Error::OutOfData { .. }));

        let text = err.to_string();
        assert!(text.contains(&root.to_string()), "{}", text);
        assert!(text.contains("inflated"), "{}", text);
    }
}

#[test]
fn test_missing_file() {
    let err = JtFile::open("does-not-exist.jt").unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
}
