//! Nibble-packed S1000/S3000 headers: program common data, sample header
//! and keygroup data. Each header is a positional table of fields; the
//! order of the table is the byte order of the structure.

use anyhow::Result;
use log::*;
use serde_json::{Map, Value};
use std::fmt;

use crate::error::CodecResult;
use crate::str_encoder::{str_from_akai_bytes, StrEncoder};
use crate::util::NibbleCursor;

mod program;
mod sample;
mod keygroup;

pub use program::ProgramHeader;
pub use sample::SampleHeader;
pub use keygroup::KeygroupHeader;

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderField {
    pub name: &'static str,
    /// Width in bytes
    pub width: usize,
    pub doc: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HeaderValue {
    Number(u128),
    Text(String),
}

impl HeaderValue {
    pub fn as_number(&self) -> Option<u128> {
        match self {
            HeaderValue::Number(n) => Some(*n),
            HeaderValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            HeaderValue::Number(_) => None,
            HeaderValue::Text(s) => Some(s),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            HeaderValue::Number(n) => u64::try_from(*n)
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(n.to_string())),
            HeaderValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Number(n) => write!(f, "{}", n),
            HeaderValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<u128> for HeaderValue {
    fn from(n: u128) -> Self {
        HeaderValue::Number(n)
    }
}

impl From<u8> for HeaderValue {
    fn from(n: u8) -> Self {
        HeaderValue::Number(n as u128)
    }
}

impl From<u16> for HeaderValue {
    fn from(n: u16) -> Self {
        HeaderValue::Number(n as u128)
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        HeaderValue::Text(s.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        HeaderValue::Text(s)
    }
}

/// Field-by-field decode instrumentation
pub trait DecodeTrace {
    /// Called after each field is decoded; `offset` is the byte offset of
    /// the field relative to the start of the header.
    fn field(&mut self, header: &'static str, name: &'static str, offset: usize, value: &dyn fmt::Debug);
}

pub struct NoTrace;

impl DecodeTrace for NoTrace {
    fn field(&mut self, _header: &'static str, _name: &'static str, _offset: usize, _value: &dyn fmt::Debug) {}
}

pub struct LogTrace;

impl DecodeTrace for LogTrace {
    fn field(&mut self, header: &'static str, name: &'static str, offset: usize, value: &dyn fmt::Debug) {
        trace!("{}.{}: offset: {} value: {:?}", header, name, offset, value);
    }
}

/// Typed storage of a header field
pub trait FieldCodec: Sized {
    fn decode(cursor: &mut NibbleCursor, nibbles: &[u8], width: usize) -> CodecResult<Self>;
    fn encode(&self, cursor: &mut NibbleCursor, nibbles: &mut [u8], width: usize) -> CodecResult<()>;
    fn to_value(&self) -> HeaderValue;
    fn from_value(value: &HeaderValue, width: usize) -> Option<Self>;
}

fn fits(n: u128, width: usize) -> bool {
    width >= 16 || n >> (8 * width) == 0
}

macro_rules! number_codec {
    ($($t:ty),*) => {$(
        impl FieldCodec for $t {
            fn decode(cursor: &mut NibbleCursor, nibbles: &[u8], width: usize) -> CodecResult<Self> {
                cursor.next_number(nibbles, width).map(|n| n as $t)
            }

            fn encode(&self, cursor: &mut NibbleCursor, nibbles: &mut [u8], width: usize) -> CodecResult<()> {
                cursor.put_number(nibbles, *self as u128, width)
            }

            fn to_value(&self) -> HeaderValue {
                HeaderValue::Number(*self as u128)
            }

            fn from_value(value: &HeaderValue, width: usize) -> Option<Self> {
                match value {
                    HeaderValue::Number(n) if fits(*n, width) => <$t>::try_from(*n).ok(),
                    _ => None
                }
            }
        }
    )*};
}

number_codec!(u8, u16, u32, u64, u128);

impl FieldCodec for String {
    fn decode(cursor: &mut NibbleCursor, nibbles: &[u8], width: usize) -> CodecResult<Self> {
        cursor.next_bytes(nibbles, width).map(|b| str_from_akai_bytes(&b))
    }

    fn encode(&self, cursor: &mut NibbleCursor, nibbles: &mut [u8], width: usize) -> CodecResult<()> {
        let bytes = StrEncoder::new(width).str_to_bytes(self)?;
        cursor.put_bytes(nibbles, &bytes)
    }

    fn to_value(&self) -> HeaderValue {
        HeaderValue::Text(self.clone())
    }

    /// Names are normalized to what the sampler stores: upper case, padded
    /// to `width`, unknown characters blanked.
    fn from_value(value: &HeaderValue, width: usize) -> Option<Self> {
        let bytes = StrEncoder::new(width).str_to_bytes(value.as_text()?).ok()?;
        Some(str_from_akai_bytes(&bytes))
    }
}

pub trait Header: Clone + Default + fmt::Debug {
    const NAME: &'static str;

    fn fields() -> &'static [HeaderField];

    /// Structure length in bytes
    fn length() -> usize {
        Self::fields().iter().map(|f| f.width).sum()
    }

    /// Byte offset of a field from the start of the structure
    fn offset_of(name: &str) -> Option<usize> {
        let mut offset = 0;
        for f in Self::fields() {
            if f.name == name {
                return Some(offset);
            }
            offset += f.width;
        }
        None
    }

    /// Decode every field starting at byte `byte_offset` of the nibble
    /// buffer. Returns the number of bytes decoded.
    fn parse(&mut self, nibbles: &[u8], byte_offset: usize, trace: &mut dyn DecodeTrace) -> CodecResult<usize>;

    /// Encode every field starting at byte `byte_offset` of the nibble
    /// buffer. Returns the number of bytes encoded.
    fn encode(&self, nibbles: &mut [u8], byte_offset: usize) -> CodecResult<usize>;

    /// Encode a single field in place. Returns `false` for unknown names.
    fn encode_field(&self, name: &str, nibbles: &mut [u8], byte_offset: usize) -> CodecResult<bool>;

    fn field(&self, name: &str) -> Option<HeaderValue>;

    fn set_field(&mut self, name: &str, value: HeaderValue) -> Result<()>;

    fn from_nibbles(nibbles: &[u8], byte_offset: usize) -> CodecResult<Self> {
        let mut header = Self::default();
        header.parse(nibbles, byte_offset, &mut NoTrace)?;
        Ok(header)
    }

    fn to_nibbles(&self) -> CodecResult<Vec<u8>> {
        let mut nibbles = vec![0u8; Self::length() * 2];
        self.encode(&mut nibbles, 0)?;
        Ok(nibbles)
    }

    fn to_json(&self) -> Value {
        let map = Self::fields().iter()
            .filter_map(|f| self.field(f.name).map(|v| (f.name.to_string(), v.to_json())))
            .collect::<Map<_, _>>();
        Value::Object(map)
    }
}

/// Declare a header structure from its field table. Every entry is
/// `NAME: Type[width]`; strings are alphabet-encoded names.
macro_rules! header_schema {
    (
        $(#[$smeta:meta])*
        pub struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $field:ident : $t:ident [$width:literal]
            ),* $(,)?
        }
    ) => {
        $(#[$smeta])*
        #[allow(non_snake_case)]
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            $(
                $(#[doc = $doc])*
                pub $field: $t,
            )*
        }

        impl $name {
            pub const FIELDS: &'static [HeaderField] = &[
                $( HeaderField { name: stringify!($field), width: $width, doc: concat!($($doc),*) }, )*
            ];
        }

        impl Header for $name {
            const NAME: &'static str = stringify!($name);

            fn fields() -> &'static [HeaderField] {
                Self::FIELDS
            }

            fn parse(&mut self, nibbles: &[u8], byte_offset: usize, trace: &mut dyn DecodeTrace) -> CodecResult<usize> {
                let mut cursor = NibbleCursor::at_byte(byte_offset);
                $(
                    let start = cursor.byte_offset() - byte_offset;
                    self.$field = <$t as FieldCodec>::decode(&mut cursor, nibbles, $width)?;
                    trace.field(Self::NAME, stringify!($field), start, &self.$field);
                )*
                Ok(cursor.byte_offset() - byte_offset)
            }

            fn encode(&self, nibbles: &mut [u8], byte_offset: usize) -> CodecResult<usize> {
                let mut cursor = NibbleCursor::at_byte(byte_offset);
                $( FieldCodec::encode(&self.$field, &mut cursor, nibbles, $width)?; )*
                Ok(cursor.byte_offset() - byte_offset)
            }

            fn encode_field(&self, name: &str, nibbles: &mut [u8], byte_offset: usize) -> CodecResult<bool> {
                let mut cursor = NibbleCursor::at_byte(byte_offset);
                $(
                    if name == stringify!($field) {
                        FieldCodec::encode(&self.$field, &mut cursor, nibbles, $width)?;
                        return Ok(true);
                    }
                    cursor.offset += $width * 2;
                )*
                Ok(false)
            }

            fn field(&self, name: &str) -> Option<HeaderValue> {
                $(
                    if name == stringify!($field) {
                        return Some(FieldCodec::to_value(&self.$field));
                    }
                )*
                None
            }

            fn set_field(&mut self, name: &str, value: HeaderValue) -> anyhow::Result<()> {
                $(
                    if name == stringify!($field) {
                        self.$field = <$t as FieldCodec>::from_value(&value, $width)
                            .ok_or_else(|| anyhow!("Value {} does not fit {}.{} ({} byte(s))",
                                value, Self::NAME, name, $width))?;
                        return Ok(());
                    }
                )*
                bail!("Unknown field {}.{}", Self::NAME, name)
            }
        }
    };
}

pub(crate) use header_schema;
