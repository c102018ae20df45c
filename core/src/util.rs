use log::*;
use crate::error::{check_len, CodecResult};

/// Combine a low and a high nibble into a byte
pub fn nibbles_to_u8(low: u8, high: u8) -> u8 {
    (low & 0x0f) | (high << 4)
}

/// Split a byte into a `[low, high]` nibble pair
pub fn u8_to_nibbles(byte: u8) -> [u8; 2] {
    [byte & 0x0f, byte >> 4]
}

pub fn nibbles_to_u8_vec(nibbles: &[u8]) -> Vec<u8> {
    if nibbles.len() & 1 == 1 {
        warn!("nibbles_to_u8_vec got a slice of odd size {}", nibbles.len());
    }

    nibbles.chunks_exact(2)
        .map(|n| nibbles_to_u8(n[0], n[1]))
        .collect()
}

pub fn u8_to_nibbles_vec(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().flat_map(|b| u8_to_nibbles(*b)).collect()
}

/// Little-endian accumulation of an arbitrary number of bytes.
/// Widths beyond 16 bytes do not fit and are truncated to the low 16.
pub fn bytes_to_number_le(bytes: &[u8]) -> u128 {
    bytes.iter().take(16).enumerate()
        .fold(0u128, |acc, (i, b)| acc | ((*b as u128) << (8 * i)))
}

/// Big-endian accumulation, as used by the S5000/S6000 numeric replies
pub fn bytes_to_number_be(bytes: &[u8]) -> u128 {
    bytes.iter()
        .fold(0u128, |acc, b| (acc << 8) | (*b as u128))
}

/// Inverse of `bytes_to_number_le`; bits that don't fit into `width` bytes are dropped
pub fn number_to_bytes_le(value: u128, width: usize) -> Vec<u8> {
    (0 .. width)
        .map(|i| if i < 16 { (value >> (8 * i)) as u8 } else { 0 })
        .collect()
}

/// 14-bit number as two 7-bit MIDI data bytes, LSB first
pub fn u16_to_7bit_le(value: u16) -> [u8; 2] {
    [(value & 0x7f) as u8, ((value >> 7) & 0x7f) as u8]
}

pub fn u16_from_7bit_le(bytes: &[u8; 2]) -> u16 {
    (bytes[0] & 0x7f) as u16 | ((bytes[1] & 0x7f) as u16) << 7
}

/// A read/write position in a nibble buffer. The position is a nibble
/// index and always advances by two for every byte decoded or encoded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NibbleCursor {
    /// The last byte decoded or encoded
    pub value: u8,
    /// Nibble index of the next byte
    pub offset: usize,
}

impl NibbleCursor {
    /// Cursor positioned at byte `byte_offset` of the nibble-packed structure
    pub fn at_byte(byte_offset: usize) -> Self {
        NibbleCursor { value: 0, offset: byte_offset * 2 }
    }

    pub fn byte_offset(&self) -> usize {
        self.offset / 2
    }

    pub fn next_byte(&mut self, nibbles: &[u8]) -> CodecResult<u8> {
        check_len(self.offset, 2, nibbles.len())?;
        self.value = nibbles_to_u8(nibbles[self.offset], nibbles[self.offset + 1]);
        self.offset += 2;
        Ok(self.value)
    }

    pub fn next_bytes(&mut self, nibbles: &[u8], count: usize) -> CodecResult<Vec<u8>> {
        check_len(self.offset, count * 2, nibbles.len())?;
        (0 .. count).map(|_| self.next_byte(nibbles)).collect()
    }

    /// Decode `width` bytes as a little-endian magnitude
    pub fn next_number(&mut self, nibbles: &[u8], width: usize) -> CodecResult<u128> {
        self.next_bytes(nibbles, width).map(|b| bytes_to_number_le(&b))
    }

    pub fn put_byte(&mut self, nibbles: &mut [u8], byte: u8) -> CodecResult<()> {
        check_len(self.offset, 2, nibbles.len())?;
        let [low, high] = u8_to_nibbles(byte);
        nibbles[self.offset] = low;
        nibbles[self.offset + 1] = high;
        self.value = byte;
        self.offset += 2;
        Ok(())
    }

    pub fn put_bytes(&mut self, nibbles: &mut [u8], bytes: &[u8]) -> CodecResult<()> {
        check_len(self.offset, bytes.len() * 2, nibbles.len())?;
        for b in bytes {
            self.put_byte(nibbles, *b)?;
        }
        Ok(())
    }

    pub fn put_number(&mut self, nibbles: &mut [u8], value: u128, width: usize) -> CodecResult<()> {
        self.put_bytes(nibbles, &number_to_bytes_le(value, width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;

    #[test]
    fn nibble_round_trip() {
        for b in 0 ..= 255u8 {
            let [low, high] = u8_to_nibbles(b);
            assert!(low < 16 && high < 16);
            assert_eq!(nibbles_to_u8(low, high), b);
        }
    }

    #[test]
    fn nibble_vectors() {
        let bytes = [0x12, 0xab, 0x00, 0xff];
        let nibbles = u8_to_nibbles_vec(&bytes);
        assert_eq!(nibbles, vec![0x2, 0x1, 0xb, 0xa, 0x0, 0x0, 0xf, 0xf]);
        assert_eq!(nibbles_to_u8_vec(&nibbles), bytes.to_vec());
    }

    #[test]
    fn numbers() {
        assert_eq!(bytes_to_number_le(&[0x06, 0, 0, 0]), 6);
        assert_eq!(bytes_to_number_le(&[1, 0]), 1);
        assert_eq!(bytes_to_number_be(&[1, 0]), 256);
        assert_eq!(bytes_to_number_le(&[0x34, 0x12]), 0x1234);
        assert_eq!(number_to_bytes_le(0x1234, 3), vec![0x34, 0x12, 0x00]);
        assert_eq!(bytes_to_number_le(&number_to_bytes_le(u128::MAX >> 32, 12)), u128::MAX >> 32);
    }

    #[test]
    fn seven_bit() {
        assert_eq!(u16_to_7bit_le(200), [72, 1]);
        assert_eq!(u16_from_7bit_le(&[72, 1]), 200);
    }

    #[test]
    fn cursor_reads_and_writes() {
        let mut nibbles = vec![0u8; 8];
        let mut w = NibbleCursor::at_byte(1);
        w.put_number(&mut nibbles, 0x0201, 2).unwrap();
        assert_eq!(w.offset, 6);
        assert_eq!(nibbles, vec![0, 0, 1, 0, 2, 0, 0, 0]);

        let mut r = NibbleCursor::at_byte(1);
        assert_eq!(r.next_byte(&nibbles).unwrap(), 1);
        assert_eq!(r.value, 1);
        assert_eq!(r.offset, 4);
        assert_eq!(r.next_number(&nibbles, 1).unwrap(), 2);
    }

    #[test]
    fn cursor_out_of_range() {
        let nibbles = vec![0u8; 3];
        let mut c = NibbleCursor::default();
        c.next_byte(&nibbles).unwrap();
        let err = c.next_byte(&nibbles).unwrap_err();
        assert_eq!(err, CodecError::Truncated { offset: 2, needed: 2, available: 1 });
    }
}
