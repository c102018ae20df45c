use log::*;
use crate::error::{CodecError, CodecResult};

/// The character set of S1000/S3000 names. A name byte is an index into
/// this table.
pub const ALPHABET: [char; 41] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    ' ',
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    '#', '+', '-', '.'
];

/// Index of ' ' in `ALPHABET`
pub const BLANK: u8 = 10;

pub const NAME_LENGTH: usize = 12;

/// What to do with characters that are not in `ALPHABET`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EncodePolicy {
    /// Replace with a blank
    #[default]
    Lossy,
    /// Fail with `CodecError::Unrepresentable`
    Strict,
}

pub fn akai_char(byte: u8) -> Option<char> {
    ALPHABET.get(byte as usize).cloned()
}

pub fn akai_byte(ch: char) -> Option<u8> {
    let ch = ch.to_ascii_uppercase();
    ALPHABET.iter().position(|c| *c == ch).map(|i| i as u8)
}

/// Decode alphabet indices into a string. Indices outside the alphabet
/// decode as blanks.
pub fn str_from_akai_bytes(bytes: &[u8]) -> String {
    bytes.iter()
        .map(|b| akai_char(*b).unwrap_or(' '))
        .collect()
}

#[derive(Clone, Debug)]
pub struct StrEncoder {
    width: usize,
    policy: EncodePolicy
}

impl Default for StrEncoder {
    fn default() -> Self {
        StrEncoder::new(NAME_LENGTH)
    }
}

impl StrEncoder {
    pub fn new(width: usize) -> Self {
        Self { width, policy: EncodePolicy::default() }
    }

    pub fn with_policy(self, policy: EncodePolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn str_from_bytes(&self, bytes: &[u8]) -> String {
        let len = bytes.len().min(self.width);
        str_from_akai_bytes(&bytes[.. len])
    }

    /// Upper-case `str`, map it through the alphabet and pad or truncate
    /// the result to exactly `width` entries.
    pub fn str_to_bytes(&self, str: &str) -> CodecResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.width);
        for (position, ch) in str.chars().take(self.width).enumerate() {
            let byte = match (akai_byte(ch), self.policy) {
                (Some(b), _) => b,
                (None, EncodePolicy::Lossy) => {
                    warn!("Character {:?} in {:?} replaced with a blank", ch, str);
                    BLANK
                }
                (None, EncodePolicy::Strict) =>
                    return Err(CodecError::Unrepresentable { ch, position })
            };
            bytes.push(byte);
        }
        bytes.resize(self.width, BLANK);

        Ok(bytes)
    }

    pub fn str_to_buffer(&self, str: &str, buffer: &mut [u8]) -> CodecResult<()> {
        crate::error::check_len(0, self.width, buffer.len())?;
        let bytes = self.str_to_bytes(str)?;
        buffer[.. self.width].copy_from_slice(&bytes);
        Ok(())
    }
}
