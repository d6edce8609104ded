//! Builds an IPv4-shaped block descriptor and round-trips a real datagram
//! through it, exercising the dynamic-resolver protocol end to end: the
//! `options` segment's size depends on `ihl`, and `data`'s depends on both
//! `ihl` and `total_length`.

use bitblock::{Block, Endian, Error, Record, RecordView, Resolver, Segment, SegmentSize, Value, ValueType};
use hex_literal::hex;

fn ipv4_block() -> Block {
    Block::builder("ipv4")
        .segment(Segment::new("version", SegmentSize::Fixed(4)))
        .segment(Segment::new("ihl", SegmentSize::Fixed(4)))
        .segment(Segment::new("dscp_ecn", SegmentSize::Fixed(8)))
        .segment(Segment::new("total_length", SegmentSize::Fixed(16)))
        .segment(Segment::new("identification", SegmentSize::Fixed(16)))
        .segment(Segment::new("flags_frag_offset", SegmentSize::Fixed(16)))
        .segment(Segment::new("ttl", SegmentSize::Fixed(8)))
        .segment(Segment::new("protocol", SegmentSize::Fixed(8)))
        .segment(Segment::new("header_checksum", SegmentSize::Fixed(16)))
        .segment(Segment::new("src", SegmentSize::Fixed(32)).endian(Endian::Big))
        .segment(Segment::new("dst", SegmentSize::Fixed(32)).endian(Endian::Big))
        .segment(Segment::new("options", SegmentSize::Dynamic).ty(ValueType::Binary))
        .segment(Segment::new("data", SegmentSize::Dynamic).ty(ValueType::Binary))
        .build()
        .unwrap()
}

struct Ipv4Resolver;

impl Resolver<()> for Ipv4Resolver {
    fn resolve(
        &mut self,
        record: &RecordView<'_>,
        segment_name: &str,
        _acc: (),
    ) -> Result<(usize, ()), Error> {
        let field = |name: &str| match record.get(name) {
            Some(Value::Integer(n)) => *n as usize,
            _ => panic!("{name} not decoded before {segment_name} was resolved"),
        };
        match segment_name {
            "options" => {
                let ihl = field("ihl");
                Ok((ihl.saturating_sub(5) * 4, ()))
            }
            "data" => {
                let ihl = field("ihl");
                let total_length = field("total_length");
                Ok((total_length.saturating_sub(ihl * 4), ()))
            }
            other => panic!("ipv4 block has no dynamic segment named {other}"),
        }
    }
}

const DATAGRAM: [u8; 24] = hex!(
    "45 00 00 18 12 34 00 00 40 11 00 00 0a 00 00 01 0a 00 00 02 70 69 6e 67"
);

#[test]
fn decodes_a_minimal_datagram_with_no_options() {
    let block = ipv4_block();
    let bits = bitblock::BitString::from_bytes(&DATAGRAM);
    let record = block.decode_dynamic(&bits, (), &mut Ipv4Resolver).unwrap();

    assert_eq!(record.get("version"), Some(&Value::Integer(4)));
    assert_eq!(record.get("ihl"), Some(&Value::Integer(5)));
    assert_eq!(record.get("total_length"), Some(&Value::Integer(24)));
    assert_eq!(record.get("ttl"), Some(&Value::Integer(64)));
    assert_eq!(record.get("protocol"), Some(&Value::Integer(17)));
    assert_eq!(record.get("src"), Some(&Value::Integer(0x0a00_0001)));
    assert_eq!(record.get("dst"), Some(&Value::Integer(0x0a00_0002)));

    match record.get("options") {
        Some(Value::Dynamic(inner, size)) => {
            assert_eq!(*size, 0);
            match inner.as_ref() {
                Value::Binary(b) => assert!(b.is_empty()),
                other => panic!("unexpected options value: {other:?}"),
            }
        }
        other => panic!("unexpected options field: {other:?}"),
    }

    match record.get("data") {
        Some(Value::Dynamic(inner, size)) => {
            assert_eq!(*size, 4);
            match inner.as_ref() {
                Value::Binary(b) => assert_eq!(b.as_raw_slice(), b"ping"),
                other => panic!("unexpected data value: {other:?}"),
            }
        }
        other => panic!("unexpected data field: {other:?}"),
    }

    assert!(record.leftover().is_empty());
}

#[test]
fn encodes_the_same_datagram_back_to_its_wire_bytes() {
    let block = ipv4_block();
    let mut record = Record::new();
    record.push("version", Value::Integer(4));
    record.push("ihl", Value::Integer(5));
    record.push("dscp_ecn", Value::Integer(0));
    record.push("total_length", Value::Integer(24));
    record.push("identification", Value::Integer(0x1234));
    record.push("flags_frag_offset", Value::Integer(0));
    record.push("ttl", Value::Integer(64));
    record.push("protocol", Value::Integer(17));
    record.push("header_checksum", Value::Integer(0));
    record.push("src", Value::Integer(0x0a00_0001));
    record.push("dst", Value::Integer(0x0a00_0002));
    record.push(
        "options",
        Value::Dynamic(Box::new(Value::Binary(bitblock::BitString::new())), 0),
    );
    record.push(
        "data",
        Value::Dynamic(
            Box::new(Value::Binary(bitblock::BitString::from_bytes(b"ping"))),
            4,
        ),
    );

    let encoded = block.encode(&record).unwrap();
    assert_eq!(encoded.into_bytes(), DATAGRAM.to_vec());
}

#[test]
fn rejects_a_mistyped_fixed_segment() {
    let block = ipv4_block();
    let mut record = Record::new();
    record.push("version", Value::Utf8Str("nope".into()));
    let err = block.encode(&record).unwrap_err();
    match err {
        Error::TypeMismatch { segment, .. } => assert_eq!(segment, "<integer segment>"),
        other => panic!("wrong error: {other:?}"),
    }
}
