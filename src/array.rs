//! The array codec: a homogeneous sequence of base values packed
//! contiguously with no separator, length prefix, or terminator.

use crate::primitive::{decode_primitive, encode_primitive};
use crate::{BitString, Endian, Error, Sign, Value, ValueType};

/// Encode `elements`, each `element_size` bits of `element_type`, concatenated
/// with no framing.
pub fn encode_array(
    elements: &[Value],
    element_type: &ValueType,
    element_size: usize,
    sign: Sign,
    endian: Endian,
) -> Result<BitString, Error> {
    let mut out = BitString::new();
    for element in elements {
        let mut encoded = encode_primitive(element, element_size, element_type, sign, endian)?;
        out.append(&mut encoded);
    }
    Ok(out)
}

/// Decode an array of `size` total bits into `n = size / element_size`
/// elements (failing with [`Error::InvalidSize`] if that division is not
/// exact), returning the list and whatever bits were not consumed.
pub fn decode_array(
    bits: &BitString,
    size: usize,
    element_type: &ValueType,
    element_size: usize,
    sign: Sign,
    endian: Endian,
) -> Result<(Vec<Value>, BitString), Error> {
    if element_size == 0 || size % element_size != 0 {
        return Err(Error::InvalidSize { size, element_size });
    }
    if size > bits.len() {
        return Err(Error::SizeUnderflow {
            segment: "<array segment>".into(),
            needed: size,
            available: bits.len(),
        });
    }
    let n = size / element_size;
    let (mut window, mut rest) = bits.split_at(size);
    let mut elements = Vec::with_capacity(n);
    for _ in 0..n {
        let (value, tail) = decode_primitive(&window, element_size, element_type, sign, endian)?;
        elements.push(value);
        window = tail;
    }
    // anything to the right of the array's declared `size` was never ours to
    // begin with; `rest` already holds it from the initial split.
    let _ = &mut rest;
    Ok((elements, rest))
}
