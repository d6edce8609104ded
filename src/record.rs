use crate::{BitString, Value};

/// A decoded (or about-to-be-encoded) block instance: one value per declared
/// segment, in declaration order, plus whatever bits a decode left
/// unconsumed.
///
/// `leftover` is kept outside the field list rather than as a synthetic
/// trailing segment — every block has exactly one, and it was never
/// declared by the caller.
#[derive(Clone, Debug, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
    leftover: BitString,
}

impl Record {
    /// An empty record with no leftover bits.
    pub fn new() -> Self {
        Record {
            fields: Vec::new(),
            leftover: BitString::new(),
        }
    }

    /// Append a field. Declaration order is preserved, not enforced unique —
    /// `Block` construction is what rejects duplicate segment names.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    /// Look up a field's value by segment name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, value)| value)
    }

    /// Iterate fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Bits left over after decoding the last declared segment.
    pub fn leftover(&self) -> &BitString {
        &self.leftover
    }

    pub(crate) fn set_leftover(&mut self, leftover: BitString) {
        self.leftover = leftover;
    }

    /// Consume the record, returning its fields in declaration order.
    pub fn into_fields(self) -> Vec<(String, Value)> {
        self.fields
    }
}

/// An immutable, borrowing snapshot of a [`Record`] mid-decode, handed to a
/// [`crate::Resolver`] so it can inspect fields already decoded before this
/// point without taking ownership of the record being built.
#[derive(Debug)]
pub struct RecordView<'a> {
    record: &'a Record,
    remaining: &'a BitString,
}

impl<'a> RecordView<'a> {
    pub(crate) fn new(record: &'a Record, remaining: &'a BitString) -> Self {
        RecordView { record, remaining }
    }

    /// Look up an already-decoded field by segment name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.record.get(name)
    }

    /// Segment names decoded so far, in declaration order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.record.fields().map(|(name, _)| name)
    }

    /// Bits not yet consumed — the input a resolver's returned size must fit
    /// within.
    pub fn remaining_bits(&self) -> usize {
        self.remaining.len()
    }
}
