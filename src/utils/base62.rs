//! Base62 codec mapping storage identifiers to short codes.
//!
//! The alphabet is `0-9`, `A-Z`, `a-z`, in that order, so `'0'` is digit 0 and
//! `'z'` is digit 61. Codes are never stored; they are recomputed from the row id.

use thiserror::Error;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const BASE: u64 = 62;

/// Reasons a short code cannot be turned back into an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("code exceeds the identifier range")]
    Overflow,
}

/// Encodes an identifier as a base62 string.
///
/// Zero encodes to `"0"`. Any other value produces the shortest representation,
/// so the result never starts with `'0'`.
pub fn encode(mut id: u64) -> String {
    if id == 0 {
        return "0".to_string();
    }

    // 62^11 > 2^64, so eleven digits always suffice.
    let mut buf = [0u8; 11];
    let mut i = buf.len();
    while id > 0 {
        i -= 1;
        buf[i] = ALPHABET[(id % BASE) as usize];
        id /= BASE;
    }

    buf[i..].iter().map(|&b| b as char).collect()
}

/// Decodes a base62 string back into an identifier.
///
/// The empty string decodes to 0.
///
/// # Errors
///
/// - [`CodecError::InvalidCharacter`] for anything outside `0-9A-Za-z`
/// - [`CodecError::Overflow`] if the value does not fit in a `u64`
pub fn decode(code: &str) -> Result<u64, CodecError> {
    code.char_indices().try_fold(0u64, |acc, (position, character)| {
        let digit =
            digit_value(character).ok_or(CodecError::InvalidCharacter { character, position })?;

        acc.checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or(CodecError::Overflow)
    })
}

fn digit_value(c: char) -> Option<u64> {
    let value = match c {
        '0'..='9' => c as u8 - b'0',
        'A'..='Z' => c as u8 - b'A' + 10,
        'a'..='z' => c as u8 - b'a' + 36,
        _ => return None,
    };
    Some(u64::from(value))
}
