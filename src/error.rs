#![allow(unknown_lints)]
#![allow(non_local_definitions)] // false positive for displaydoc::Display: https://github.com/yaahc/displaydoc/issues/46

use displaydoc::Display;
use thiserror::Error as ThisError;

/// The error type for every fallible operation in this crate.
///
/// Operations are total: either a complete record/bitstring is produced, or
/// one of these variants is returned. None are retried internally.
#[derive(Debug, Display, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// segment `{segment}` needs {needed} bits but only {available} remain
    SizeUnderflow {
        segment: String,
        needed: usize,
        available: usize,
    },

    /// segment `{segment}` expected a dynamic-segment envelope, found {found}
    TypeMismatch {
        segment: String,
        found: &'static str,
    },

    /// array size {size} is not a multiple of element size {element_size}
    InvalidSize { size: usize, element_size: usize },

    /// float size must be one of 16, 32, or 64 bits, found {0}
    InvalidFloatSize(usize),

    /// integer size must be at most 128 bits, found {0}
    InvalidIntegerSize(usize),

    /// resolver failed while resolving segment `{segment}`: {source}
    ResolverFailure {
        segment: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// block descriptor is invalid: dynamic segment `{0}` follows a later fixed-size segment
    DynamicNotTrailing(String),

    /// segment name `{0}` is not unique within its block
    DuplicateSegment(String),

    /// decoded bytes are not valid {0}
    InvalidText(&'static str),
}

/// A specialized [`Result`](core::result::Result) for operations in this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_doc_comment_template() {
        let err = Error::SizeUnderflow {
            segment: "s1".into(),
            needed: 8,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "segment `s1` needs 8 bits but only 3 remain"
        );
    }

    #[test]
    fn invalid_size_renders() {
        let err = Error::InvalidSize {
            size: 10,
            element_size: 3,
        };
        assert_eq!(
            err.to_string(),
            "array size 10 is not a multiple of element size 3"
        );
    }
}
