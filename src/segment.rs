use crate::{Endian, Sign, Value, ValueType};

/// A segment's wire size.
#[derive(Clone, Debug, PartialEq)]
pub enum SegmentSize {
    /// A fixed number of bits (for [`ValueType::Binary`], a number of
    /// *bytes* — see that variant's documentation).
    Fixed(usize),
    /// Resolved at decode time by a [`crate::Resolver`]; encoded at whatever
    /// size the caller's [`Value::Dynamic`] envelope specifies.
    Dynamic,
    /// Neither encoded nor decoded; the field keeps its default.
    Absent,
}

/// Immutable description of one segment of a [`crate::Block`].
#[derive(Clone, Debug)]
pub struct Segment {
    name: String,
    size: SegmentSize,
    ty: ValueType,
    sign: Sign,
    endian: Endian,
    default: Value,
}

impl Segment {
    /// Declare a segment.
    ///
    /// Defaults match §4.1 of the codec: `type = integer`, `sign =
    /// unsigned`, `endian = big`, `default = Value::Nil`. Use the builder
    /// methods to override before the segment is handed to
    /// [`crate::BlockBuilder::segment`].
    pub fn new(name: impl Into<String>, size: SegmentSize) -> Self {
        Segment {
            name: name.into(),
            size,
            ty: ValueType::Integer,
            sign: Sign::Unsigned,
            endian: Endian::Big,
            default: Value::Nil,
        }
    }

    /// Declare an array segment: always `dynamic` at the block level, since
    /// its wire length depends on the caller-supplied size.
    ///
    /// `element_size` defaults to 8 bits when not overridden via
    /// [`Segment::element_size`].
    pub fn array(name: impl Into<String>, element_type: ValueType) -> Self {
        Segment::new(name, SegmentSize::Dynamic).ty(ValueType::array(element_type, 8))
    }

    /// Override this array segment's per-element bit width.
    ///
    /// Panics (at construction time, not at encode/decode time) if called on
    /// a non-array segment — this mirrors a segment descriptor being an
    /// ordinary value built up through a small, misuse-resistant API rather
    /// than validated lazily.
    pub fn element_size(mut self, bits: usize) -> Self {
        match &mut self.ty {
            ValueType::Array { element_size, .. } => *element_size = bits,
            _ => panic!("element_size() is only valid on an array segment"),
        }
        self
    }

    pub fn ty(mut self, ty: ValueType) -> Self {
        self.ty = ty;
        self
    }

    pub fn sign(mut self, sign: Sign) -> Self {
        self.sign = sign;
        self
    }

    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> &SegmentSize {
        &self.size
    }

    pub fn value_type(&self) -> &ValueType {
        &self.ty
    }

    pub fn sign_of(&self) -> Sign {
        self.sign
    }

    pub fn endian_of(&self) -> Endian {
        self.endian
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let s = Segment::new("s1", SegmentSize::Fixed(8));
        assert_eq!(s.value_type(), &ValueType::Integer);
        assert_eq!(s.sign_of(), Sign::Unsigned);
        assert_eq!(s.endian_of(), Endian::Big);
    }

    #[test]
    fn array_desugars_to_dynamic_with_default_element_size() {
        let s = Segment::array("opts", ValueType::Integer);
        assert_eq!(s.size(), &SegmentSize::Dynamic);
        match s.value_type() {
            ValueType::Array { element_size, .. } => assert_eq!(*element_size, 8),
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn element_size_overrides_default() {
        let s = Segment::array("nibbles", ValueType::Integer)
            .sign(Sign::Signed)
            .element_size(4);
        match s.value_type() {
            ValueType::Array { element_size, .. } => assert_eq!(*element_size, 4),
            _ => panic!("expected array"),
        }
    }
}
