#![deny(/*missing_docs,*/
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    // unreachable_pub
)]
#![forbid(unsafe_code)]
#![warn(
/* missing_docs,
rust_2018_idioms,*/
missing_debug_implementations,
)]
// pragmas for doc
#![deny(broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(test(
no_crate_inject,
attr(deny(warnings/*, rust_2018_idioms*/), allow(dead_code, unused_variables))
))]

//! Declarative bit-aligned record codec for binary wire protocols.
//!
//! A [`Block`] is an ordered list of [`Segment`]s; [`Block::encode`] and
//! [`Block::decode`]/[`Block::decode_dynamic`] turn a [`Record`] of
//! [`Value`]s into a [`BitString`] and back. Segments whose wire size isn't
//! known until decode time (length-prefixed payloads, option lists, anything
//! that depends on an earlier field) go through the [`Resolver`] protocol
//! instead of a fixed size.

mod array;
mod bitcursor;
mod bitstring;
mod block;
mod error;
mod primitive;
mod record;
mod resolver;
mod segment;
mod value;

#[cfg(feature = "debug")]
mod debug;

pub use bitstring::BitString;
pub use block::{Block, BlockBuilder};
pub use error::{Error, Result};
pub use primitive::{decode_primitive, encode_primitive};
pub use record::{Record, RecordView};
pub use resolver::Resolver;
pub use segment::{Segment, SegmentSize};
pub use value::{Endian, Sign, TextShape, Value, ValueType};

/// Population count (number of set bits) of `n`.
///
/// Implemented with Brian Kernighan's bit-clearing loop rather than
/// [`u64::count_ones`] so a resolver can reach for it without the caller
/// needing to know that trick exists; behaviorally identical to the
/// intrinsic.
pub fn count_ones(mut n: u64) -> u32 {
    let mut count = 0;
    while n != 0 {
        n &= n - 1;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_ones_boundary_values() {
        assert_eq!(count_ones(0), 0);
        assert_eq!(count_ones(1), 1);
        assert_eq!(count_ones(u64::MAX), 64);
        assert_eq!(count_ones(0b1011_0100), 4);
    }
}
