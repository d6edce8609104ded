//! Scenario-level integration tests exercising whole blocks through the
//! public API only, the way `tests/x509.rs`/`tests/krb5.rs` exercise whole
//! ASN.1 structures rather than individual primitives.

use bitblock::{
    count_ones, Block, Endian, Error, Record, RecordView, Resolver, Segment, SegmentSize, Sign,
    Value, ValueType,
};

#[test]
fn static_header_block_roundtrips() {
    let block = Block::builder("header")
        .segment(Segment::new("header", SegmentSize::Fixed(8)))
        .segment(Segment::new("s1", SegmentSize::Fixed(4)))
        .segment(Segment::new("s2", SegmentSize::Fixed(4)).sign(Sign::Signed))
        .segment(Segment::new("tail", SegmentSize::Fixed(8)))
        .build()
        .unwrap();

    let mut record = Record::new();
    record.push("header", Value::Integer(0xAA));
    record.push("s1", Value::Integer(0xF));
    record.push("s2", Value::Integer(-1));
    record.push("tail", Value::Integer(0x55));

    let encoded = block.encode(&record).unwrap();
    assert_eq!(encoded.into_bytes(), vec![0xAA, 0xFF, 0x55]);

    let decoded = block
        .decode(&bitblock::BitString::from_bytes(&[0xAA, 0xFF, 0x55]))
        .unwrap();
    assert_eq!(decoded.get("header"), Some(&Value::Integer(0xAA)));
    assert_eq!(decoded.get("s1"), Some(&Value::Integer(0xF)));
    assert_eq!(decoded.get("s2"), Some(&Value::Integer(-1)));
    assert_eq!(decoded.get("tail"), Some(&Value::Integer(0x55)));
    assert!(decoded.leftover().is_empty());
}

#[test]
fn array_of_signed_4bit_ints_roundtrips() {
    let block = Block::builder("nibbles")
        .segment(Segment::array("values", ValueType::Integer).sign(Sign::Signed).element_size(4))
        .build()
        .unwrap();

    let mut record = Record::new();
    let values = vec![
        Value::Integer(1),
        Value::Integer(-1),
        Value::Integer(7),
        Value::Integer(-8),
    ];
    record.push(
        "values",
        Value::Dynamic(Box::new(Value::Array(values.clone())), 16),
    );

    let encoded = block.encode(&record).unwrap();
    assert_eq!(encoded.len(), 16);

    let mut resolver = |_: &RecordView<'_>, _: &str, acc: ()| -> Result<(usize, ()), Error> {
        Ok((16, acc))
    };
    let decoded = block.decode_dynamic(&encoded, (), &mut resolver).unwrap();
    match decoded.get("values") {
        Some(Value::Dynamic(inner, size)) => {
            assert_eq!(*size, 16);
            match inner.as_ref() {
                Value::Array(elements) => assert_eq!(elements, &values),
                other => panic!("unexpected inner value: {other:?}"),
            }
        }
        other => panic!("unexpected field: {other:?}"),
    }
}

/// `d`'s size depends on `popcount(e)`-style cross-dependency: the resolver
/// reads one already-decoded dynamic segment to size a later one.
#[test]
fn dynamic_segment_size_can_depend_on_an_earlier_dynamic_segment() {
    let block = Block::builder("cross")
        .segment(Segment::new("mask", SegmentSize::Fixed(8)))
        .segment(Segment::new("e", SegmentSize::Dynamic).ty(ValueType::Binary))
        .segment(Segment::new("d", SegmentSize::Dynamic).ty(ValueType::Binary))
        .build()
        .unwrap();

    struct PopcountResolver;
    impl Resolver<()> for PopcountResolver {
        fn resolve(
            &mut self,
            record: &RecordView<'_>,
            segment_name: &str,
            _acc: (),
        ) -> Result<(usize, ()), Error> {
            match segment_name {
                "e" => Ok((1, ())),
                "d" => {
                    let mask = match record.get("mask") {
                        Some(Value::Integer(n)) => *n as u64,
                        _ => panic!("mask not decoded yet"),
                    };
                    Ok((count_ones(mask) as usize, ()))
                }
                other => panic!("unexpected dynamic segment {other}"),
            }
        }
    }

    // mask = 0b0000_0111 -> popcount 3 -> `d` is 3 bytes.
    let bits = bitblock::BitString::from_bytes(&[0b0000_0111, b'x', b'a', b'b', b'c']);
    let record = block.decode_dynamic(&bits, (), &mut PopcountResolver).unwrap();

    match record.get("e") {
        Some(Value::Dynamic(inner, size)) => {
            assert_eq!(*size, 1);
            match inner.as_ref() {
                Value::Binary(b) => assert_eq!(b.as_raw_slice(), b"x"),
                other => panic!("unexpected e: {other:?}"),
            }
        }
        other => panic!("unexpected e field: {other:?}"),
    }
    match record.get("d") {
        Some(Value::Dynamic(inner, size)) => {
            assert_eq!(*size, 3);
            match inner.as_ref() {
                Value::Binary(b) => assert_eq!(b.as_raw_slice(), b"abc"),
                other => panic!("unexpected d: {other:?}"),
            }
        }
        other => panic!("unexpected d field: {other:?}"),
    }
    assert!(record.leftover().is_empty());
}

#[test]
fn count_ones_matches_known_values() {
    assert_eq!(count_ones(0), 0);
    assert_eq!(count_ones(u64::MAX), 64);
    assert_eq!(count_ones(0b0000_0111), 3);
    assert_eq!(count_ones(1 << 63), 1);
}

#[test]
fn reflection_lists_segments_and_their_descriptors() {
    let block = Block::builder("reflectable")
        .segment(Segment::new("a", SegmentSize::Fixed(8)))
        .segment(Segment::new("b", SegmentSize::Dynamic).ty(ValueType::Binary))
        .build()
        .unwrap();

    let names: Vec<&str> = block.segments().collect();
    assert_eq!(names, vec!["a", "b"]);

    let a = block.segment_info("a").unwrap();
    assert_eq!(a.size(), &SegmentSize::Fixed(8));
    assert_eq!(a.endian_of(), Endian::Big);
    assert!(block.segment_info("nonexistent").is_none());
}
