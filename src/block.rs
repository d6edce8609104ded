//! Block descriptors: an ordered set of segments, the static-only encoder/
//! decoder, the dynamic-resolver decoder, and reflection over the shape.

use std::collections::HashSet;

use crate::array::{decode_array, encode_array};
use crate::primitive::{decode_primitive, encode_primitive};
use crate::record::RecordView;
use crate::segment::{Segment, SegmentSize};
use crate::value::ValueType;
use crate::{BitString, Error, Record, Resolver, Value};

/// An immutable, ordered collection of segments describing one bit-block.
///
/// Built via [`Block::builder`]; once built, a `Block` is `Send + Sync` and
/// never mutated, so the same descriptor can be shared across threads to
/// encode/decode many records concurrently.
#[derive(Clone, Debug)]
pub struct Block {
    name: String,
    segments: Vec<Segment>,
    dynamic_segments: Vec<usize>,
}

impl Block {
    /// Start building a block named `name`.
    pub fn builder(name: impl Into<String>) -> BlockBuilder {
        BlockBuilder {
            name: name.into(),
            segments: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Segment names in declaration order (`leftover` is not a segment, so
    /// it is never included).
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(Segment::name)
    }

    /// Look up a segment's descriptor by name.
    pub fn segment_info(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name() == name)
    }

    /// Encode `record` into a bitstring, skipping `Absent` segments and
    /// reading each other segment's value out of `record` (falling back to
    /// the segment's declared default when `record` has nothing for it).
    ///
    /// Never reads [`Record::leftover`] — encoding only ever produces bits,
    /// it does not thread one through.
    pub fn encode(&self, record: &Record) -> Result<BitString, Error> {
        let mut out = BitString::new();
        for segment in &self.segments {
            match segment.size() {
                SegmentSize::Absent => continue,
                SegmentSize::Fixed(size) => {
                    let value = record.get(segment.name()).unwrap_or_else(|| segment.default_value());
                    let mut encoded = encode_segment_value(segment, *size, value)?;
                    out.append(&mut encoded);
                }
                SegmentSize::Dynamic => {
                    let value = record.get(segment.name()).unwrap_or(&Value::Nil);
                    let mut encoded = encode_dynamic_segment(segment, value)?;
                    out.append(&mut encoded);
                }
            }
        }
        Ok(out)
    }

    /// Decode `bits` into a [`Record`].
    ///
    /// Only valid on a block with no dynamic segments — use
    /// [`Block::decode_dynamic`] otherwise. Fails with
    /// [`Error::SizeUnderflow`] if `bits` cannot supply every fixed segment.
    pub fn decode(&self, bits: &BitString) -> Result<Record, Error> {
        if !self.dynamic_segments.is_empty() {
            return Err(Error::TypeMismatch {
                segment: self.name.clone(),
                found: "block declares dynamic segments; call decode_dynamic instead",
            });
        }
        let mut record = Record::new();
        let mut remaining = bits.clone();
        for segment in &self.segments {
            match segment.size() {
                SegmentSize::Absent => record.push(segment.name(), segment.default_value().clone()),
                SegmentSize::Fixed(size) => {
                    let (value, rest) = decode_segment_value(segment, &remaining, *size)?;
                    record.push(segment.name(), value);
                    remaining = rest;
                }
                SegmentSize::Dynamic => unreachable!("checked above"),
            }
        }
        record.set_leftover(remaining);
        Ok(record)
    }

    /// Decode `bits` into a [`Record`], asking `resolver` for each dynamic
    /// segment's size in declaration order.
    ///
    /// `acc` is `resolver`'s initial accumulator; its return value threads
    /// into the next `resolve` call exactly as [`Resolver`] documents. A
    /// resolver may inspect, via [`RecordView`], every field decoded so far.
    pub fn decode_dynamic<Acc, R: Resolver<Acc>>(
        &self,
        bits: &BitString,
        acc: Acc,
        resolver: &mut R,
    ) -> Result<Record, Error> {
        let mut record = Record::new();
        let mut remaining = bits.clone();
        let mut acc = acc;
        for segment in &self.segments {
            match segment.size() {
                SegmentSize::Absent => record.push(segment.name(), segment.default_value().clone()),
                SegmentSize::Fixed(size) => {
                    let (value, rest) = decode_segment_value(segment, &remaining, *size)?;
                    record.push(segment.name(), value);
                    remaining = rest;
                }
                SegmentSize::Dynamic => {
                    let view = RecordView::new(&record, &remaining);
                    let (size, next_acc) = resolver.resolve(&view, segment.name(), acc)?;
                    acc = next_acc;
                    let (value, rest) = decode_segment_value(segment, &remaining, size)?;
                    record.push(segment.name(), Value::Dynamic(Box::new(value), size));
                    remaining = rest;
                }
            }
        }
        record.set_leftover(remaining);
        Ok(record)
    }
}

fn type_mismatch(segment: &str, found: &Value) -> Error {
    Error::TypeMismatch {
        segment: segment.into(),
        found: found.kind_name(),
    }
}

fn encode_segment_value(segment: &Segment, size: usize, value: &Value) -> Result<BitString, Error> {
    match segment.value_type() {
        ValueType::Array {
            element_type,
            element_size,
        } => match value {
            Value::Array(elements) => {
                encode_array(elements, element_type, *element_size, segment.sign_of(), segment.endian_of())
            }
            other => Err(type_mismatch(segment.name(), other)),
        },
        ty => encode_primitive(value, size, ty, segment.sign_of(), segment.endian_of()),
    }
}

fn encode_dynamic_segment(segment: &Segment, value: &Value) -> Result<BitString, Error> {
    match value {
        Value::Nil => Ok(BitString::new()),
        Value::Dynamic(inner, size) => encode_segment_value(segment, *size, inner),
        other => Err(type_mismatch(segment.name(), other)),
    }
}

fn decode_segment_value(
    segment: &Segment,
    bits: &BitString,
    size: usize,
) -> Result<(Value, BitString), Error> {
    match segment.value_type() {
        ValueType::Array {
            element_type,
            element_size,
        } => {
            let (elements, rest) =
                decode_array(bits, size, element_type, *element_size, segment.sign_of(), segment.endian_of())?;
            Ok((Value::Array(elements), rest))
        }
        ty => decode_primitive(bits, size, ty, segment.sign_of(), segment.endian_of()),
    }
}

/// Accumulates [`Segment`]s in wire order, validating the descriptor as a
/// whole on [`BlockBuilder::build`].
#[derive(Debug)]
pub struct BlockBuilder {
    name: String,
    segments: Vec<Segment>,
}

impl BlockBuilder {
    /// Append the next segment in wire order.
    pub fn segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Validate and freeze the descriptor.
    ///
    /// Fails with [`Error::DuplicateSegment`] if two segments share a name,
    /// and with [`Error::DynamicNotTrailing`] if a `Fixed` segment follows a
    /// `Dynamic` one — once a dynamic segment's size depends on the
    /// resolver, no later segment can be decoded at a statically-known
    /// offset.
    pub fn build(self) -> Result<Block, Error> {
        let mut seen = HashSet::with_capacity(self.segments.len());
        for segment in &self.segments {
            if !seen.insert(segment.name().to_owned()) {
                return Err(Error::DuplicateSegment(segment.name().to_owned()));
            }
        }

        let mut dynamic_segments = Vec::new();
        let mut last_dynamic_name: Option<String> = None;
        for (index, segment) in self.segments.iter().enumerate() {
            match segment.size() {
                SegmentSize::Fixed(_) => {
                    if let Some(name) = &last_dynamic_name {
                        return Err(Error::DynamicNotTrailing(name.clone()));
                    }
                }
                SegmentSize::Dynamic => {
                    last_dynamic_name = Some(segment.name().to_owned());
                    dynamic_segments.push(index);
                }
                SegmentSize::Absent => {}
            }
        }

        Ok(Block {
            name: self.name,
            segments: self.segments,
            dynamic_segments,
        })
    }
}
