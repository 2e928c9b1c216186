//! Declarative little-endian byte layouts.
//!
//! A [`Layout`] is an ordered list of fixed-offset fields. Decoding turns every
//! integer into a `BigDecimal` straight away; encoding is the exact inverse and
//! rejects values that do not fit their encoding.

use bigdecimal::BigDecimal;

use crate::errors::{RebalanceError, RebalanceResult};
use crate::math::decimal::{integer, to_i32, to_u128, to_u16, to_u64, to_u8};
use crate::types::FieldsDict;

/// Integer encodings used by strategy accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    U8,
    U16,
    I32,
    U64,
    U128,
}

impl Encoding {
    /// Width in bytes
    pub const fn width(self) -> usize {
        match self {
            Encoding::U8 => 1,
            Encoding::U16 => 2,
            Encoding::I32 => 4,
            Encoding::U64 => 8,
            Encoding::U128 => 16,
        }
    }

    /// Read `self.width()` bytes; `bytes` must be exactly that long.
    fn read(self, bytes: &[u8]) -> BigDecimal {
        match self {
            Encoding::U8 => integer(bytes[0]),
            Encoding::U16 => integer(u16::from_le_bytes(array(bytes))),
            Encoding::I32 => integer(i32::from_le_bytes(array(bytes))),
            Encoding::U64 => integer(u64::from_le_bytes(array(bytes))),
            Encoding::U128 => integer(u128::from_le_bytes(array(bytes))),
        }
    }

    fn write(self, value: &BigDecimal, label: &str, out: &mut [u8]) -> RebalanceResult<()> {
        match self {
            Encoding::U8 => out.copy_from_slice(&[to_u8(value, label)?]),
            Encoding::U16 => out.copy_from_slice(&to_u16(value, label)?.to_le_bytes()),
            Encoding::I32 => out.copy_from_slice(&to_i32(value, label)?.to_le_bytes()),
            Encoding::U64 => out.copy_from_slice(&to_u64(value, label)?.to_le_bytes()),
            Encoding::U128 => out.copy_from_slice(&to_u128(value, label)?.to_le_bytes()),
        }
        Ok(())
    }
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

/// One field of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub offset: usize,
    pub encoding: Encoding,
}

impl FieldSpec {
    pub const fn new(label: &'static str, offset: usize, encoding: Encoding) -> Self {
        Self {
            label,
            offset,
            encoding,
        }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.encoding.width()
    }
}

/// Byte layout of a params or state blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Layout {
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { name, fields }
    }

    /// Bytes required to decode every field
    pub fn width(&self) -> usize {
        self.fields.iter().map(FieldSpec::end).max().unwrap_or(0)
    }

    /// Decode `data` into a dictionary in layout order.
    ///
    /// Bytes past [`Layout::width`] are ignored; accounts store blobs in
    /// fixed-size slots.
    pub fn decode(&self, data: &[u8]) -> RebalanceResult<FieldsDict> {
        let required = self.width();
        if data.len() < required {
            return Err(RebalanceError::Truncated {
                layout: self.name,
                required,
                actual: data.len(),
            });
        }

        let mut dict = FieldsDict::new();
        for field in self.fields {
            dict.insert(field.label, field.encoding.read(&data[field.offset..field.end()]));
        }

        tracing::trace!(layout = self.name, bytes = data.len(), fields = dict.len(), "decoded layout");
        Ok(dict)
    }

    /// Encode every field of the layout from `values`
    pub fn encode(&self, values: &FieldsDict) -> RebalanceResult<Vec<u8>> {
        let mut out = vec![0u8; self.width()];
        for field in self.fields {
            let value = values.require(field.label)?;
            field
                .encoding
                .write(value, field.label, &mut out[field.offset..field.end()])?;
        }
        Ok(out)
    }
}
