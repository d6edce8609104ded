use crate::BitString;

/// Base type of a segment's value, as enumerated in the option space a
/// segment descriptor can declare.
///
/// `bits`/`bitstring` and `binary`/`bytes` are aliases in the source
/// vocabulary for the same wire behavior, so there is one variant per
/// behavior rather than one per alias name.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum ValueType {
    /// Two's-complement (if signed) integer, `size` bits wide.
    Integer,
    /// IEEE-754 float; valid `size` is 16, 32, or 64.
    Float,
    /// Raw bits, copied as-is. `size` on a segment is in *bits*.
    Bitstring,
    /// Raw bytes, copied as-is. `size` on a segment is in *bytes*
    /// (multiplied by 8 internally) — this is the intentional, preserved
    /// unit inconsistency with [`ValueType::Bitstring`].
    Binary,
    /// UTF-8 text. `shape` selects which of the two decode branches spec.md
    /// §4.1 describes applies: [`TextShape::Codepoint`] consumes exactly one
    /// codepoint and returns the remainder; [`TextShape::Str`] decodes the
    /// entire input and returns an empty remainder. Encode does not consult
    /// `shape` — it branches on whichever of [`Value::Utf8Char`] /
    /// [`Value::Utf8Str`] it is given.
    Utf8(TextShape),
    /// UTF-16 text, ordered per the segment's endian. See [`ValueType::Utf8`]
    /// for how `shape` is used.
    Utf16(TextShape),
    /// UTF-32 text, ordered per the segment's endian. See [`ValueType::Utf8`]
    /// for how `shape` is used.
    Utf32(TextShape),
    /// A homogeneous sequence of `element_size`-bit values of the inner type,
    /// packed with no separator, length prefix, or terminator.
    Array {
        element_type: Box<ValueType>,
        element_size: usize,
    },
}

impl ValueType {
    /// Build an array type over `element_type`, `element_size` bits per element.
    pub fn array(element_type: ValueType, element_size: usize) -> Self {
        ValueType::Array {
            element_type: Box::new(element_type),
            element_size,
        }
    }
}

/// Signedness, meaningful only for [`ValueType::Integer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Signed,
    Unsigned,
}

/// Byte/bit ordering, meaningful for [`ValueType::Integer`], [`ValueType::Float`],
/// [`ValueType::Utf16`], and [`ValueType::Utf32`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Which of the two UTF decode branches a text segment uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextShape {
    /// Decode consumes exactly one codepoint and returns the remainder.
    Codepoint,
    /// Decode consumes the entire remaining input as one string.
    Str,
}

/// A decoded or to-be-encoded value.
///
/// This is the tagged union over the base-type set called for in place of
/// the source's dynamic typing: every base type has exactly one variant, and
/// [`Value::Dynamic`] is the `DynamicSegment{value, size}` envelope used for
/// every dynamic-sized segment, on both encode input and decode output.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Value {
    Integer(i128),
    Float(f64),
    Bits(BitString),
    Binary(BitString),
    Utf8Char(char),
    Utf8Str(String),
    Utf16Char(u16),
    Utf16Str(String),
    Utf32Char(u32),
    Utf32Str(String),
    Array(Vec<Value>),
    /// `DynamicSegment{value, size}`: the wire size this value was (or will
    /// be) encoded at. Used exclusively for segments whose descriptor size
    /// is `dynamic`.
    Dynamic(Box<Value>, usize),
    /// Explicit absence, used as the input for a `dynamic` segment that
    /// should emit zero bits, and never produced on decode (a resolved-zero
    /// dynamic segment decodes to `Dynamic(Box::new(<empty>), 0)` instead).
    Nil,
}

impl Value {
    /// Name of this value's shape, for [`crate::Error::TypeMismatch`] messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Bits(_) => "bits",
            Value::Binary(_) => "binary",
            Value::Utf8Char(_) | Value::Utf16Char(_) | Value::Utf32Char(_) => "codepoint",
            Value::Utf8Str(_) | Value::Utf16Str(_) | Value::Utf32Str(_) => "string",
            Value::Array(_) => "array",
            Value::Dynamic(_, _) => "dynamic-segment",
            Value::Nil => "nil",
        }
    }
}
