//! # Escher Integration Tests
//!
//! Decode/encode cycles over whole drawing trees, truncated containers and
//! shape property tables.

use officeart::Error;
use officeart::escher::{
    ArrayProperty, DecodeOptions, EscherClientAnchorRecord, EscherContainerRecord, EscherDgRecord, EscherOptRecord,
    EscherParser, EscherProperty, EscherRecord, EscherSpRecord, EscherSpgrRecord, OffsetRecorder, ShapeFlags,
    decode_records, encode_records, record_id,
};
use proptest::prelude::*;

fn shape_container(shape_id: u32, flags: ShapeFlags) -> EscherContainerRecord {
    let mut container = EscherContainerRecord::new(record_id::SP_CONTAINER);
    container.add_child(EscherRecord::Sp(EscherSpRecord::new(1, shape_id, flags)));
    container
}

/// Dg container holding a patriarch group and one anchored rectangle.
fn sample_drawing() -> EscherRecord {
    let mut patriarch = EscherContainerRecord::new(record_id::SP_CONTAINER);
    patriarch.add_child(EscherRecord::Spgr(EscherSpgrRecord::new(0, 0, 0, 0)));
    patriarch.add_child(EscherRecord::Sp(EscherSpRecord::new(
        0,
        1024,
        ShapeFlags::GROUP | ShapeFlags::PATRIARCH,
    )));

    let mut opt = EscherOptRecord::new(record_id::OPT);
    opt.add_property(EscherProperty::rgb(0x0181, 0x00FF_8000));
    opt.add_property(EscherProperty::simple(0x0004, 90));
    opt.add_property(EscherProperty::complex(0x0380, b"R\0e\0c\0t\0\0\0".to_vec()));

    let mut rectangle = shape_container(1025, ShapeFlags::HAVE_ANCHOR | ShapeFlags::HAVE_SPT);
    rectangle.add_child(EscherRecord::Opt(opt));
    rectangle.add_child(EscherRecord::ClientAnchor(EscherClientAnchorRecord::new(
        2, 1, 0, 1, 0, 4, 512, 6, 128,
    )));

    let mut group = EscherContainerRecord::new(record_id::SPGR_CONTAINER);
    group.add_child(EscherRecord::Container(patriarch));
    group.add_child(EscherRecord::Container(rectangle));

    let mut dg = EscherDgRecord::new(1);
    dg.set_num_shapes(2);
    dg.set_last_shape_id(1025);

    let mut drawing = EscherContainerRecord::new(record_id::DG_CONTAINER);
    drawing.add_child(EscherRecord::Dg(dg));
    drawing.add_child(EscherRecord::Container(group));
    EscherRecord::Container(drawing)
}

#[test]
fn test_shape_container_scenario() {
    let bytes = [
        0x0F, 0x00, 0x04, 0xF0, 0x10, 0x00, 0x00, 0x00, // SpContainer, 16 bytes
        0x02, 0x00, 0x0A, 0xF0, 0x08, 0x00, 0x00, 0x00, // Sp, 8 bytes
        0xE9, 0x03, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, // id 1001, GROUP | CHILD
    ];

    let records = decode_records(&bytes).unwrap();
    assert_eq!(records.len(), 1);
    let container = records[0].as_container().unwrap();
    assert_eq!(container.children().len(), 1);
    match &container.children()[0] {
        EscherRecord::Sp(sp) => {
            assert_eq!(sp.shape_id(), 1001);
            assert_eq!(sp.flags().bits(), 3);
        },
        other => panic!("expected a shape record, got {other:?}"),
    }

    assert_eq!(encode_records(&records).unwrap(), bytes);
}

#[test]
fn test_drawing_tree_round_trip() {
    let drawing = sample_drawing();
    let bytes = drawing.to_bytes().unwrap();
    assert_eq!(bytes.len(), drawing.record_size());

    let decoded = decode_records(&bytes).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].to_bytes().unwrap(), bytes);

    let parser = EscherParser::new(&bytes);
    assert_eq!(parser.find_all_shapes().unwrap().len(), 2);

    let root = parser.root_container().unwrap().unwrap();
    let opt = root
        .find_records(record_id::OPT)
        .into_iter()
        .next()
        .cloned()
        .unwrap();
    match opt {
        EscherRecord::Opt(opt) => {
            assert_eq!(opt.properties().len(), 3);
            assert!(opt.is_sorted());
            assert_eq!(opt.lookup(0x0004).map(EscherProperty::property_value), Some(90));
            assert_eq!(
                opt.lookup(0x0181).and_then(EscherProperty::rgb_components),
                Some((0x00, 0x80, 0xFF))
            );
        },
        other => panic!("expected an option record, got {other:?}"),
    }
}

#[test]
fn test_listener_sees_every_record() {
    let drawing = sample_drawing();
    let mut data = vec![0u8; drawing.record_size()];
    let mut recorder = OffsetRecorder::new();
    drawing.serialize(0, &mut data, &mut recorder).unwrap();

    let spans = recorder.spans();
    // Dg container, Dg, SpGr container, two Sp containers and their 5 children.
    assert_eq!(spans.len(), 10);
    let root = spans
        .iter()
        .find(|(id, _, _)| *id == record_id::DG_CONTAINER)
        .unwrap();
    assert_eq!((root.1, root.2), (0, data.len()));
}

#[test]
fn test_truncated_container_keeps_missing_length() {
    let mut bytes = shape_container(7, ShapeFlags::empty())
        .children()
        .iter()
        .map(|r| r.to_bytes().unwrap())
        .fold(Vec::new(), |mut acc, b| {
            acc.extend(b);
            acc
        });
    // Header claims 40 body bytes, only 16 follow.
    let mut data = vec![0x0F, 0x00, 0x04, 0xF0, 40, 0, 0, 0];
    data.append(&mut bytes);

    let records = decode_records(&data).unwrap();
    let container = records[0].as_container().unwrap();
    assert_eq!(container.children().len(), 1);
    assert_eq!(container.remaining_length(), 24);
    assert_eq!(records[0].record_size(), 8 + 16 + 24);

    let strict = EscherParser::with_options(&data, DecodeOptions::default().with_tolerate_truncation(false));
    assert!(matches!(strict.parse_all(), Err(Error::RecordTooShort { .. })));
}

#[test]
fn test_simple_property_scenario() {
    // Opt with one entry: number 4 (rotation), value 90.
    let bytes = [
        0x13, 0x00, 0x0B, 0xF0, 0x06, 0x00, 0x00, 0x00, //
        0x04, 0x00, 0x5A, 0x00, 0x00, 0x00,
    ];
    let records = decode_records(&bytes).unwrap();
    match &records[0] {
        EscherRecord::Opt(opt) => {
            let property = &opt.properties()[0];
            assert_eq!(property.property_number(), 4);
            assert!(!property.is_complex());
            assert_eq!(property.property_value(), 90);
        },
        other => panic!("expected an option record, got {other:?}"),
    }
    assert_eq!(encode_records(&records).unwrap(), bytes);
}

#[test]
fn test_array_property_excluding_header() {
    // geometry.vertices with two 4-byte elements; the simple part declares
    // 8 bytes, the element bytes without the 6-byte mini-header.
    let bytes = [
        0x13, 0x00, 0x0B, 0xF0, 0x14, 0x00, 0x00, 0x00, //
        0x45, 0x81, 0x08, 0x00, 0x00, 0x00, //
        0x02, 0x00, 0x02, 0x00, 0x04, 0x00, //
        0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x04, 0x00,
    ];
    let records = decode_records(&bytes).unwrap();
    let array = match &records[0] {
        EscherRecord::Opt(opt) => opt.properties()[0].as_array().cloned().unwrap(),
        other => panic!("expected an option record, got {other:?}"),
    };
    assert!(!array.size_includes_header());
    assert_eq!(array.element_count(), 2);
    assert_eq!(array.element(1), Some(&[0x03, 0x00, 0x04, 0x00][..]));
    assert_eq!(encode_records(&records).unwrap(), bytes);
}

#[test]
fn test_unknown_records_survive() {
    let bytes = [
        0x00, 0x00, 0x1A, 0xF1, 0x03, 0x00, 0x00, 0x00, 0xAA, 0xBB, 0xCC, // unregistered leaf
        0x0F, 0x00, 0x50, 0xF1, 0x08, 0x00, 0x00, 0x00, // unregistered container
        0x00, 0x00, 0x1B, 0xF1, 0x00, 0x00, 0x00, 0x00,
    ];
    let records = decode_records(&bytes).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].child_records().len(), 1);
    assert_eq!(encode_records(&records).unwrap(), bytes);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_option_tables_round_trip(values in prop::collection::vec((1u16..0x3FFF, any::<i32>()), 0..12)) {
        let mut opt = EscherOptRecord::new(record_id::OPT);
        for (number, value) in &values {
            opt.add_property(EscherProperty::simple(*number, *value));
        }
        prop_assert!(opt.is_sorted());

        let record = EscherRecord::Opt(opt);
        prop_assert_eq!(record.instance(), values.len() as u16);
        let bytes = record.to_bytes().unwrap();
        let decoded = decode_records(&bytes).unwrap();
        prop_assert_eq!(decoded[0].to_bytes().unwrap(), bytes);
    }

    #[test]
    fn prop_array_elements_round_trip(elements in prop::collection::vec(any::<[u8; 4]>(), 1..8)) {
        let mut blob = Vec::new();
        blob.extend_from_slice(&(elements.len() as u16).to_le_bytes());
        blob.extend_from_slice(&(elements.len() as u16).to_le_bytes());
        blob.extend_from_slice(&4i16.to_le_bytes());
        for element in &elements {
            blob.extend_from_slice(element);
        }

        let mut opt = EscherOptRecord::new(record_id::OPT);
        opt.add_property(EscherProperty::Array(ArrayProperty::new(0x8145, blob)));
        let bytes = EscherRecord::Opt(opt).to_bytes().unwrap();
        let decoded = decode_records(&bytes).unwrap();
        prop_assert_eq!(decoded[0].to_bytes().unwrap(), bytes);
    }
}
