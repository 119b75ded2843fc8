//! Constant pool index.
//!
//! The constant pool is never materialized into owned entries. Instead, one pass over
//! the pool records, per entry, its tag and the buffer offset of its payload (plus the
//! indirection target for Class/String entries). String payloads are then decoded lazily
//! by absolute offset, and attribute-name comparisons run directly against the buffered
//! bytes without allocating.
//!
//! The three index arrays are reused across classfiles by the owning parser, so pool
//! parsing allocates only when a classfile declares a larger pool than any seen before.

use crate::{file::ClassfileReader, metadata::mutf8, Result};

/// Constant pool entry tag for modified UTF-8 data.
pub const TAG_UTF8: u8 = 1;
/// Constant pool entry tag for 32-bit integers (also byte, short, char, boolean).
pub const TAG_INTEGER: u8 = 3;
/// Constant pool entry tag for 32-bit floats.
pub const TAG_FLOAT: u8 = 4;
/// Constant pool entry tag for 64-bit integers; consumes two pool slots.
pub const TAG_LONG: u8 = 5;
/// Constant pool entry tag for 64-bit floats; consumes two pool slots.
pub const TAG_DOUBLE: u8 = 6;
/// Constant pool entry tag for class references (indirect to UTF-8).
pub const TAG_CLASS: u8 = 7;
/// Constant pool entry tag for string references (indirect to UTF-8).
pub const TAG_STRING: u8 = 8;

/// A typed constant resolved from the pool.
///
/// Only the constant kinds the header parser actually consumes are represented; the
/// reference kinds (field/method/name-and-type/dynamic) are skipped structurally and can
/// never be requested as values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// A 32-bit signed integer (tag 3).
    Int(i32),
    /// A 32-bit float (tag 4).
    Float(f32),
    /// A 64-bit signed integer (tag 5).
    Long(i64),
    /// A 64-bit float (tag 6).
    Double(f64),
    /// A decoded string (tags 1, 7 and 8).
    String(String),
}

/// Offset/tag index over one classfile's constant pool.
///
/// Entry `0` is unused by the format; indices are 1-based. Entries with tags 5 and 6
/// occupy two consecutive slots, leaving the second slot's tag as `0`.
pub struct ConstantPool {
    /// The tag for each entry.
    tags: Vec<u8>,
    /// The byte offset of each entry's payload (excluding the tag byte).
    offsets: Vec<u32>,
    /// The indirection index for String/Class entries; -1 elsewhere.
    indirect: Vec<i32>,
    /// Declared entry count of the pool currently indexed.
    count: usize,
}

impl ConstantPool {
    /// Create an empty pool index; storage grows on first use.
    #[must_use]
    pub fn new() -> Self {
        ConstantPool {
            tags: Vec::new(),
            offsets: Vec::new(),
            indirect: Vec::new(),
            count: 0,
        }
    }

    /// Number of declared entries in the currently indexed pool.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Index the constant pool at the reader's cursor.
    ///
    /// Reads the declared entry count and walks all entries, recording tag, payload
    /// offset and Class/String indirection. Storage from a previous classfile is reused
    /// when large enough.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for an unknown entry tag, or
    /// [`crate::Error::UnexpectedEof`] if the stream ends inside the pool
    pub fn parse(&mut self, reader: &mut ClassfileReader<'_>) -> Result<()> {
        let cp_count = reader.u16()? as usize;
        if self.tags.len() < cp_count {
            self.tags.resize(cp_count, 0);
            self.offsets.resize(cp_count, 0);
            self.indirect.resize(cp_count, -1);
        }
        self.count = cp_count;
        self.tags[..cp_count].fill(0);
        self.indirect[..cp_count].fill(-1);

        let mut i = 1;
        while i < cp_count {
            let tag = reader.u8()?;
            self.tags[i] = tag;
            self.offsets[i] = reader.pos() as u32;
            match tag {
                TAG_UTF8 => {
                    let len = reader.u16()? as usize;
                    reader.skip(len)?;
                }
                TAG_INTEGER | TAG_FLOAT => reader.skip(4)?,
                TAG_LONG | TAG_DOUBLE => {
                    reader.skip(8)?;
                    // 8-byte constants take up two pool slots
                    i += 1;
                }
                TAG_CLASS | TAG_STRING => {
                    self.indirect[i] = i32::from(reader.u16()?);
                }
                // field ref, method ref, interface method ref, name-and-type
                9..=12 => reader.skip(4)?,
                // method handle
                15 => reader.skip(3)?,
                // method type
                16 => reader.skip(2)?,
                // invoke dynamic
                18 => reader.skip(4)?,
                _ => {
                    return Err(malformed_error!(
                        "Unknown constant pool tag {} at index {}",
                        tag,
                        i
                    ))
                }
            }
            i += 1;
        }
        Ok(())
    }

    fn entry(&self, idx: usize) -> Result<(u8, u32)> {
        if idx == 0 || idx >= self.count {
            return Err(malformed_error!("Constant pool index {} out of range", idx));
        }
        Ok((self.tags[idx], self.offsets[idx]))
    }

    /// Resolve `idx` to the buffer offset of a UTF-8 payload, following one level of
    /// Class/String indirection. `None` denotes a null string (zero indirection).
    fn string_offset(&self, idx: usize) -> Result<Option<u32>> {
        let (tag, _) = self.entry(idx)?;
        if tag != TAG_UTF8 && tag != TAG_CLASS && tag != TAG_STRING {
            return Err(malformed_error!(
                "Wrong tag {} at constant pool index {}, expected a string entry",
                tag,
                idx
            ));
        }
        let mut target = idx;
        if tag == TAG_CLASS || tag == TAG_STRING {
            let indirect = self.indirect[idx];
            if indirect < 0 {
                return Err(malformed_error!(
                    "Bad string indirection at constant pool index {}",
                    idx
                ));
            }
            if indirect == 0 {
                // The zeroeth entry is unused; a zero reference denotes a null string
                return Ok(None);
            }
            target = indirect as usize;
            let (target_tag, _) = self.entry(target)?;
            if target_tag != TAG_UTF8 {
                return Err(malformed_error!(
                    "String indirection at constant pool index {} leads to tag {}",
                    idx,
                    target_tag
                ));
            }
        }
        Ok(Some(self.offsets[target]))
    }

    /// Decode the string at `idx`, optionally replacing `'/'` with `'.'`.
    ///
    /// Returns `None` for a null string reference.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a non-string entry or undecodable payload
    pub fn string(
        &self,
        reader: &ClassfileReader<'_>,
        idx: usize,
        replace_slash_with_dot: bool,
    ) -> Result<Option<String>> {
        match self.string_offset(idx)? {
            None => Ok(None),
            Some(offset) => {
                let offset = offset as usize;
                let len = reader.u16_at(offset)? as usize;
                let bytes = reader.bytes_at(offset + 2, len)?;
                mutf8::decode(bytes, replace_slash_with_dot).map(Some)
            }
        }
    }

    /// Decode the string at `idx` as a class name: `'/'` becomes `'.'`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a non-string entry or undecodable payload
    pub fn class_name(&self, reader: &ClassfileReader<'_>, idx: usize) -> Result<Option<String>> {
        self.string(reader, idx, true)
    }

    /// Compare the string at `idx` against `literal` byte-for-byte, without allocating.
    ///
    /// Intended for attribute-name checks against ASCII literals; a null string compares
    /// unequal to every literal.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a non-string entry
    pub fn string_equals(
        &self,
        reader: &ClassfileReader<'_>,
        idx: usize,
        literal: &str,
    ) -> Result<bool> {
        let Some(offset) = self.string_offset(idx)? else {
            return Ok(false);
        };
        let offset = offset as usize;
        let len = reader.u16_at(offset)? as usize;
        if len != literal.len() {
            return Ok(false);
        }
        let bytes = reader.bytes_at(offset + 2, len)?;
        Ok(bytes == literal.as_bytes())
    }

    /// Resolve the typed constant at `idx` (tags 1, 3, 4, 5, 6, 7 and 8).
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for any other tag or a null string reference
    pub fn value(&self, reader: &ClassfileReader<'_>, idx: usize) -> Result<ConstantValue> {
        let (tag, offset) = self.entry(idx)?;
        let offset = offset as usize;
        match tag {
            TAG_UTF8 | TAG_CLASS | TAG_STRING => match self.string(reader, idx, false)? {
                Some(value) => Ok(ConstantValue::String(value)),
                None => Err(malformed_error!(
                    "Null string constant at constant pool index {}",
                    idx
                )),
            },
            TAG_INTEGER => Ok(ConstantValue::Int(reader.u32_at(offset)? as i32)),
            TAG_FLOAT => Ok(ConstantValue::Float(f32::from_bits(reader.u32_at(offset)?))),
            TAG_LONG => Ok(ConstantValue::Long(reader.i64_at(offset)?)),
            TAG_DOUBLE => Ok(ConstantValue::Double(f64::from_bits(
                reader.i64_at(offset)? as u64,
            ))),
            _ => Err(malformed_error!(
                "Constant pool entry type {} at index {} cannot be used as a value",
                tag,
                idx
            )),
        }
    }
}

impl Default for ConstantPool {
    fn default() -> Self {
        ConstantPool::new()
    }
}
