//! The per-segment primitive codec: the full cross-product of
//! `{element-type × signedness × endianness × size}` over a single value.

use bitvec::order::Msb0;
use bitvec::vec::BitVec;

use crate::bitcursor::BitCursor;
use crate::{BitString, Endian, Error, Sign, TextShape, Value, ValueType};

/// Encode a single value at the given size/type/sign/endian into a bitstring
/// exactly `size` bits long (except `binary`/`bitstring`/`utf*`, where the
/// wire length can instead be implicit in the value's own length — see
/// spec.md §4.1's table).
pub fn encode_primitive(
    value: &Value,
    size: usize,
    ty: &ValueType,
    sign: Sign,
    endian: Endian,
) -> Result<BitString, Error> {
    match ty {
        ValueType::Integer => {
            let n = match value {
                Value::Integer(n) => *n,
                other => return Err(type_mismatch("<integer segment>", other)),
            };
            encode_integer(n, size, endian)
        }
        ValueType::Float => {
            let f = match value {
                Value::Float(f) => *f,
                Value::Integer(n) => *n as f64,
                other => return Err(type_mismatch("<float segment>", other)),
            };
            encode_float(f, size, endian)
        }
        ValueType::Bitstring => match value {
            Value::Bits(bits) => Ok(bits.clone()),
            other => Err(type_mismatch("<bitstring segment>", other)),
        },
        ValueType::Binary => match value {
            Value::Binary(bits) => Ok(bits.clone()),
            other => Err(type_mismatch("<binary segment>", other)),
        },
        ValueType::Utf8(_) => encode_utf8(value),
        ValueType::Utf16(_) => encode_utf16(value, endian),
        ValueType::Utf32(_) => encode_utf32(value, endian),
        ValueType::Array { .. } => Err(Error::TypeMismatch {
            segment: "<array segment>".into(),
            found: "scalar codec invoked on an array type; use crate::array instead",
        }),
    }
}

/// Decode a single value of `size`/`type`/`sign`/`endian` from the front of
/// `bits`, returning the decoded value and the unconsumed suffix.
pub fn decode_primitive(
    bits: &BitString,
    size: usize,
    ty: &ValueType,
    sign: Sign,
    endian: Endian,
) -> Result<(Value, BitString), Error> {
    let mut cursor = BitCursor::new(bits);
    match ty {
        ValueType::Integer => {
            let taken = cursor.take("<integer segment>", size)?;
            let n = decode_integer(taken, sign, endian)?;
            Ok((Value::Integer(n), cursor.into_leftover()))
        }
        ValueType::Float => {
            let taken = cursor.take("<float segment>", size)?;
            let f = decode_float(taken, size, endian)?;
            Ok((Value::Float(f), cursor.into_leftover()))
        }
        ValueType::Bitstring => {
            let taken = cursor.take("<bitstring segment>", size)?;
            let bs = BitString::from_bitslice(taken);
            Ok((Value::Bits(bs), cursor.into_leftover()))
        }
        ValueType::Binary => {
            let taken = cursor.take("<binary segment>", size * 8)?;
            let bs = BitString::from_bitslice(taken);
            Ok((Value::Binary(bs), cursor.into_leftover()))
        }
        ValueType::Utf8(shape) => decode_utf8(bits, *shape),
        ValueType::Utf16(shape) => decode_utf16(bits, *shape, endian),
        ValueType::Utf32(shape) => decode_utf32(bits, *shape, endian),
        ValueType::Array { .. } => Err(Error::TypeMismatch {
            segment: "<array segment>".into(),
            found: "scalar codec invoked on an array type; use crate::array instead",
        }),
    }
}

fn type_mismatch(segment: &str, found: &Value) -> Error {
    Error::TypeMismatch {
        segment: segment.into(),
        found: found.kind_name(),
    }
}

fn mask_for(size: usize) -> u128 {
    if size >= 128 {
        u128::MAX
    } else {
        (1u128 << size) - 1
    }
}

/// Pack `size` bits of `masked` (low-order bits only) MSB-first.
fn push_chunk_msb_first(bv: &mut BitVec<u8, Msb0>, chunk_val: u128, chunk_bits: usize) {
    for i in (0..chunk_bits).rev() {
        bv.push((chunk_val >> i) & 1 == 1);
    }
}

/// Widest integer width this crate carries without a bignum dependency;
/// `u128`/`i128` hold every supported width losslessly. A caller asking for
/// more would overflow the shift amounts below (`u128` shifts only accept
/// `0..128`), so it's rejected up front instead of panicking mid-encode.
const MAX_INTEGER_BITS: usize = 128;

fn encode_integer(value: i128, size: usize, endian: Endian) -> Result<BitString, Error> {
    if size > MAX_INTEGER_BITS {
        return Err(Error::InvalidIntegerSize(size));
    }
    let masked = (value as u128) & mask_for(size);
    let mut bv: BitVec<u8, Msb0> = BitVec::with_capacity(size);
    match endian {
        Endian::Big => push_chunk_msb_first(&mut bv, masked, size),
        Endian::Little => {
            let mut shift = 0usize;
            let mut remaining = size;
            while remaining > 0 {
                let chunk_bits = remaining.min(8);
                let chunk_val = (masked >> shift) & mask_for(chunk_bits);
                push_chunk_msb_first(&mut bv, chunk_val, chunk_bits);
                shift += chunk_bits;
                remaining -= chunk_bits;
            }
        }
    }
    Ok(BitString::from_bitvec(bv))
}

fn decode_integer(
    bits: &bitvec::slice::BitSlice<u8, Msb0>,
    sign: Sign,
    endian: Endian,
) -> Result<i128, Error> {
    let size = bits.len();
    if size > MAX_INTEGER_BITS {
        return Err(Error::InvalidIntegerSize(size));
    }
    let unsigned = match endian {
        Endian::Big => {
            let mut val: u128 = 0;
            for bit in bits.iter() {
                val = (val << 1) | (*bit as u128);
            }
            val
        }
        Endian::Little => {
            let mut val: u128 = 0;
            let mut shift = 0usize;
            let mut pos = 0usize;
            while pos < size {
                let chunk_bits = (size - pos).min(8);
                let mut chunk_val: u128 = 0;
                for bit in bits[pos..pos + chunk_bits].iter() {
                    chunk_val = (chunk_val << 1) | (*bit as u128);
                }
                val |= chunk_val << shift;
                shift += chunk_bits;
                pos += chunk_bits;
            }
            val
        }
    };
    Ok(match sign {
        Sign::Unsigned => unsigned as i128,
        Sign::Signed => {
            if size == 0 {
                0
            } else if size < 128 && (unsigned >> (size - 1)) & 1 == 1 {
                (unsigned as i128) - (1i128 << size)
            } else {
                unsigned as i128
            }
        }
    })
}

fn encode_float(value: f64, size: usize, endian: Endian) -> Result<BitString, Error> {
    let bytes: Vec<u8> = match size {
        16 => {
            let half = f32_to_f16_bits(value as f32);
            match endian {
                Endian::Big => half.to_be_bytes().to_vec(),
                Endian::Little => half.to_le_bytes().to_vec(),
            }
        }
        32 => {
            let bits = (value as f32).to_bits();
            match endian {
                Endian::Big => bits.to_be_bytes().to_vec(),
                Endian::Little => bits.to_le_bytes().to_vec(),
            }
        }
        64 => {
            let bits = value.to_bits();
            match endian {
                Endian::Big => bits.to_be_bytes().to_vec(),
                Endian::Little => bits.to_le_bytes().to_vec(),
            }
        }
        other => return Err(Error::InvalidFloatSize(other)),
    };
    Ok(BitString::from_bytes(&bytes))
}

fn decode_float(
    bits: &bitvec::slice::BitSlice<u8, Msb0>,
    size: usize,
    endian: Endian,
) -> Result<f64, Error> {
    let bytes: Vec<u8> = bits.to_bitvec().into_vec();
    Ok(match size {
        16 => {
            let raw = match endian {
                Endian::Big => u16::from_be_bytes([bytes[0], bytes[1]]),
                Endian::Little => u16::from_le_bytes([bytes[0], bytes[1]]),
            };
            f16_bits_to_f32(raw) as f64
        }
        32 => {
            let raw = match endian {
                Endian::Big => u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
                Endian::Little => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            };
            f32::from_bits(raw) as f64
        }
        64 => {
            let raw = match endian {
                Endian::Big => u64::from_be_bytes(bytes.try_into().unwrap()),
                Endian::Little => u64::from_le_bytes(bytes.try_into().unwrap()),
            };
            f64::from_bits(raw)
        }
        other => return Err(Error::InvalidFloatSize(other)),
    })
}

/// Convert an `f32` to IEEE-754 binary16 bits.
///
/// Rounds toward zero rather than to nearest-even, and does not produce
/// subnormal results (values that would underflow to a subnormal collapse to
/// zero). Adequate for the typical small-integer and simple-fraction values
/// protocol fields carry; full IEEE rounding is not implemented.
fn f32_to_f16_bits(f: f32) -> u16 {
    let bits = f.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exp = ((bits >> 23) & 0xff) as i32;
    let mantissa = bits & 0x7f_ffff;

    if exp == 0xff {
        let mant16 = if mantissa != 0 { 0x200 } else { 0 };
        return sign | 0x7c00 | mant16;
    }

    let rebiased = exp - 127 + 15;
    if rebiased <= 0 {
        return sign;
    }
    if rebiased >= 0x1f {
        return sign | 0x7c00;
    }
    let mant16 = (mantissa >> 13) as u16;
    sign | ((rebiased as u16) << 10) | mant16
}

/// Convert IEEE-754 binary16 bits to `f32`. Inverse of [`f32_to_f16_bits`].
fn f16_bits_to_f32(bits: u16) -> f32 {
    let sign = (bits & 0x8000) as u32;
    let exp = (bits >> 10) & 0x1f;
    let mantissa = (bits & 0x3ff) as u32;

    if exp == 0 {
        if mantissa == 0 {
            return f32::from_bits(sign << 16);
        }
        let value = (mantissa as f32) / 1024.0 * 2f32.powi(-14);
        return if sign != 0 { -value } else { value };
    }
    if exp == 0x1f {
        let raw = (sign << 16) | 0x7f80_0000 | (mantissa << 13);
        return f32::from_bits(raw);
    }
    let unbiased = exp as i32 - 15 + 127;
    let raw = (sign << 16) | ((unbiased as u32) << 23) | (mantissa << 13);
    f32::from_bits(raw)
}

fn encode_utf8(value: &Value) -> Result<BitString, Error> {
    match value {
        Value::Utf8Char(c) => {
            let mut buf = [0u8; 4];
            let s = c.encode_utf8(&mut buf);
            Ok(BitString::from_bytes(s.as_bytes()))
        }
        Value::Utf8Str(s) => Ok(BitString::from_bytes(s.as_bytes())),
        other => Err(type_mismatch("<utf8 segment>", other)),
    }
}

fn decode_utf8(bits: &BitString, shape: TextShape) -> Result<(Value, BitString), Error> {
    let bytes = bits.as_raw_slice();
    match shape {
        TextShape::Codepoint => {
            let s = std::str::from_utf8(bytes).map_err(|_| Error::InvalidText("utf8"))?;
            let c = s.chars().next().ok_or(Error::InvalidText("utf8"))?;
            let consumed_bits = c.len_utf8() * 8;
            let (_, rest) = bits.split_at(consumed_bits);
            Ok((Value::Utf8Char(c), rest))
        }
        TextShape::Str => {
            let s = std::str::from_utf8(bytes)
                .map_err(|_| Error::InvalidText("utf8"))?
                .to_owned();
            Ok((Value::Utf8Str(s), BitString::new()))
        }
    }
}

fn encode_utf16(value: &Value, endian: Endian) -> Result<BitString, Error> {
    let units: Vec<u16> = match value {
        Value::Utf16Char(u) => vec![*u],
        Value::Utf16Str(s) => s.encode_utf16().collect(),
        other => return Err(type_mismatch("<utf16 segment>", other)),
    };
    let mut out = Vec::with_capacity(units.len() * 2);
    for u in units {
        match endian {
            Endian::Big => out.extend_from_slice(&u.to_be_bytes()),
            Endian::Little => out.extend_from_slice(&u.to_le_bytes()),
        }
    }
    Ok(BitString::from_bytes(&out))
}

fn decode_utf16(bits: &BitString, shape: TextShape, endian: Endian) -> Result<(Value, BitString), Error> {
    let bytes = bits.as_raw_slice();
    let read_unit = |chunk: &[u8]| -> u16 {
        match endian {
            Endian::Big => u16::from_be_bytes([chunk[0], chunk[1]]),
            Endian::Little => u16::from_le_bytes([chunk[0], chunk[1]]),
        }
    };
    match shape {
        TextShape::Codepoint => {
            if bytes.len() < 2 {
                return Err(Error::InvalidText("utf16"));
            }
            let unit = read_unit(&bytes[0..2]);
            let (_, rest) = bits.split_at(16);
            Ok((Value::Utf16Char(unit), rest))
        }
        TextShape::Str => {
            let units: Vec<u16> = bytes.chunks_exact(2).map(read_unit).collect();
            let s = String::from_utf16(&units).map_err(|_| Error::InvalidText("utf16"))?;
            Ok((Value::Utf16Str(s), BitString::new()))
        }
    }
}

fn encode_utf32(value: &Value, endian: Endian) -> Result<BitString, Error> {
    let codepoints: Vec<u32> = match value {
        Value::Utf32Char(u) => vec![*u],
        Value::Utf32Str(s) => s.chars().map(|c| c as u32).collect(),
        other => return Err(type_mismatch("<utf32 segment>", other)),
    };
    let mut out = Vec::with_capacity(codepoints.len() * 4);
    for u in codepoints {
        match endian {
            Endian::Big => out.extend_from_slice(&u.to_be_bytes()),
            Endian::Little => out.extend_from_slice(&u.to_le_bytes()),
        }
    }
    Ok(BitString::from_bytes(&out))
}

fn decode_utf32(bits: &BitString, shape: TextShape, endian: Endian) -> Result<(Value, BitString), Error> {
    let bytes = bits.as_raw_slice();
    let read_unit = |chunk: &[u8]| -> u32 {
        match endian {
            Endian::Big => u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
            Endian::Little => u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
        }
    };
    match shape {
        TextShape::Codepoint => {
            if bytes.len() < 4 {
                return Err(Error::InvalidText("utf32"));
            }
            let unit = read_unit(&bytes[0..4]);
            let (_, rest) = bits.split_at(32);
            Ok((Value::Utf32Char(unit), rest))
        }
        TextShape::Str => {
            let mut s = String::new();
            for chunk in bytes.chunks_exact(4) {
                let cp = read_unit(chunk);
                let c = char::from_u32(cp).ok_or(Error::InvalidText("utf32"))?;
                s.push(c);
            }
            Ok((Value::Utf32Str(s), BitString::new()))
        }
    }
}
