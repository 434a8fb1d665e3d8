//! Hex string validation and decoding.

use crate::error::ValidationError;

/// Number of hex characters in an accepted hash.
pub const HASH_HEX_LEN: usize = 32;

/// Number of bytes a hash decodes to.
pub const BYTE_LEN: usize = HASH_HEX_LEN / 2;

/// The 16 decoded bytes of one hash, in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteBuffer([u8; BYTE_LEN]);

impl ByteBuffer {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; BYTE_LEN]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BYTE_LEN] {
        &self.0
    }
}

/// Decode a 32-character hex string (either case) into 16 bytes.
///
/// Each consecutive character pair becomes one byte, high nibble first.
/// Length is counted in characters, so multi-byte input is reported as a
/// length or character problem rather than a byte-offset one.
pub fn decode(input: &str) -> Result<ByteBuffer, ValidationError> {
    let actual = input.chars().count();
    if actual != HASH_HEX_LEN {
        return Err(ValidationError::WrongLength {
            expected: HASH_HEX_LEN,
            actual,
        });
    }

    let mut out = [0u8; BYTE_LEN];
    for (index, ch) in input.chars().enumerate() {
        let nibble = hex_value(ch).ok_or(ValidationError::NonHexCharacter { index, ch })?;
        let slot = &mut out[index / 2];
        if index % 2 == 0 {
            *slot = nibble << 4;
        } else {
            *slot |= nibble;
        }
    }
    Ok(ByteBuffer(out))
}

fn hex_value(ch: char) -> Option<u8> {
    match ch {
        '0'..='9' => Some(ch as u8 - b'0'),
        'a'..='f' => Some(ch as u8 - b'a' + 10),
        'A'..='F' => Some(ch as u8 - b'A' + 10),
        _ => None,
    }
}
