//! One-line-per-segment pretty-printing, for inspecting a block's shape at a
//! REPL or in a log line. Gated behind the `debug` feature since it pulls in
//! `log` for the companion `trace!` calls a caller might enable alongside it.

use core::fmt;

use crate::block::Block;
use crate::segment::{Segment, SegmentSize};
use crate::value::ValueType;

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.name(), describe_type(self.value_type()))?;
        match self.size() {
            SegmentSize::Fixed(bits) => write!(f, " [{bits} bits]"),
            SegmentSize::Dynamic => write!(f, " [dynamic]"),
            SegmentSize::Absent => write!(f, " [absent]"),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "block {} {{", self.name())?;
        for name in self.segments() {
            let segment = self.segment_info(name).expect("segment listed by name must exist");
            writeln!(f, "    {segment}")?;
        }
        write!(f, "}}")
    }
}

fn describe_type(ty: &ValueType) -> String {
    match ty {
        ValueType::Integer => "integer".to_owned(),
        ValueType::Float => "float".to_owned(),
        ValueType::Bitstring => "bitstring".to_owned(),
        ValueType::Binary => "binary".to_owned(),
        ValueType::Utf8(_) => "utf8".to_owned(),
        ValueType::Utf16(_) => "utf16".to_owned(),
        ValueType::Utf32(_) => "utf32".to_owned(),
        ValueType::Array {
            element_type,
            element_size,
        } => format!("array<{}, {element_size} bits>", describe_type(element_type)),
    }
}
