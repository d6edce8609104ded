use bitvec::order::Msb0;
use bitvec::slice::BitSlice;

use crate::{BitString, Error};

/// A cursor over a bit slice, advancing by an arbitrary (not byte-aligned)
/// number of bits per [`BitCursor::take`] call.
///
/// This is the explicit bit-cursor primitive that a systems language needs in
/// place of a source language's native bit-pattern matching: `take(n)`
/// returns the next `n` bits and advances the cursor, or fails with
/// [`Error::SizeUnderflow`] if fewer than `n` bits remain.
pub struct BitCursor<'a> {
    rest: &'a BitSlice<u8, Msb0>,
}

impl<'a> BitCursor<'a> {
    /// Build a cursor positioned at the start of `bits`.
    pub fn new(bits: &'a BitString) -> Self {
        BitCursor {
            rest: bits.as_bitslice(),
        }
    }

    /// Number of bits remaining.
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }

    /// Take the next `n` bits, advancing the cursor past them.
    pub fn take(&mut self, segment: &str, n: usize) -> Result<&'a BitSlice<u8, Msb0>, Error> {
        if n > self.rest.len() {
            return Err(Error::SizeUnderflow {
                segment: segment.into(),
                needed: n,
                available: self.rest.len(),
            });
        }
        let (head, tail) = self.rest.split_at(n);
        self.rest = tail;
        Ok(head)
    }

    /// Consume the cursor, returning whatever bits were never taken.
    pub fn into_leftover(self) -> BitString {
        BitString::from_bitslice(self.rest)
    }
}
