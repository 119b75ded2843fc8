//! Modified UTF-8 decoding for constant pool strings.
//!
//! The classfile format stores strings in the JVM's modified UTF-8: U+0000 is encoded in
//! two bytes, code points up to U+FFFF use the ordinary 1/2/3-byte forms, and
//! supplementary characters appear as two separately encoded surrogate code units. The
//! decoder here recombines surrogate pairs when building the result, and can substitute
//! `'.'` for `'/'` on the fly so that internal binary names come out in dotted form
//! without a second pass.

use crate::Result;

/// Decode modified UTF-8 `bytes` into a string, optionally replacing `'/'` with `'.'`.
///
/// The replacement applies to the decoded code unit, so the two-byte overlong encoding
/// of U+002F (which the format technically permits) is rewritten the same way as the
/// single-byte form.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for invalid bit patterns, truncated multi-byte
/// sequences, or unpaired surrogate code units.
pub fn decode(bytes: &[u8], replace_slash_with_dot: bool) -> Result<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        let c = bytes[idx];
        let unit = match c >> 4 {
            0..=7 => {
                idx += 1;
                u16::from(c)
            }
            12 | 13 => {
                idx += 2;
                if idx > bytes.len() {
                    return Err(malformed_error!("Bad modified UTF8: truncated 2-byte sequence"));
                }
                let c2 = bytes[idx - 1];
                if (c2 & 0xC0) != 0x80 {
                    return Err(malformed_error!("Bad modified UTF8: invalid continuation byte"));
                }
                (u16::from(c & 0x1F) << 6) | u16::from(c2 & 0x3F)
            }
            14 => {
                idx += 3;
                if idx > bytes.len() {
                    return Err(malformed_error!("Bad modified UTF8: truncated 3-byte sequence"));
                }
                let c2 = bytes[idx - 2];
                let c3 = bytes[idx - 1];
                if (c2 & 0xC0) != 0x80 || (c3 & 0xC0) != 0x80 {
                    return Err(malformed_error!("Bad modified UTF8: invalid continuation byte"));
                }
                (u16::from(c & 0x0F) << 12) | (u16::from(c2 & 0x3F) << 6) | u16::from(c3 & 0x3F)
            }
            _ => return Err(malformed_error!("Bad modified UTF8: invalid leading byte {:#04x}", c)),
        };
        units.push(if replace_slash_with_dot && unit == u16::from(b'/') {
            u16::from(b'.')
        } else {
            unit
        });
    }
    String::from_utf16(&units)
        .map_err(|_| malformed_error!("Bad modified UTF8: unpaired surrogate"))
}

/// Encode a string into modified UTF-8 bytes.
///
/// Inverse of [`decode`] for canonically encoded input: U+0000 becomes the two-byte
/// form, BMP characters use the shortest 1/2/3-byte form, and supplementary characters
/// are written as two encoded surrogate code units.
#[must_use]
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for unit in s.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            // U+0000 and everything up to U+07FF take the two-byte form
            0x0000..=0x07FF => {
                out.push(0xC0 | ((unit >> 6) as u8));
                out.push(0x80 | ((unit & 0x3F) as u8));
            }
            _ => {
                out.push(0xE0 | ((unit >> 12) as u8));
                out.push(0x80 | (((unit >> 6) & 0x3F) as u8));
                out.push(0x80 | ((unit & 0x3F) as u8));
            }
        }
    }
    out
}
