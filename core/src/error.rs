use thiserror::Error;

/// Structural codec failures. These are never recoverable locally: either
/// the caller handed over the wrong kind of data or a cursor went out of
/// sync somewhere upstream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("Chunk tag mismatch at offset {offset}: expected {expected:02x?} ({}), found {actual:02x?}",
        String::from_utf8_lossy(.expected))]
    TagMismatch { expected: [u8; 4], actual: Vec<u8>, offset: usize },

    #[error("Truncated data at offset {offset}: need {needed}, {available} available")]
    Truncated { offset: usize, needed: usize, available: usize },

    #[error("Character {ch:?} at position {position} cannot be represented on the sampler")]
    Unrepresentable { ch: char, position: usize },
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Check that `len` bytes starting at `offset` fit into a buffer of `available` bytes.
pub(crate) fn check_len(offset: usize, len: usize, available: usize) -> CodecResult<()> {
    if offset.checked_add(len).map_or(true, |end| end > available) {
        return Err(CodecError::Truncated { offset, needed: len, available: available.saturating_sub(offset) });
    }
    Ok(())
}
