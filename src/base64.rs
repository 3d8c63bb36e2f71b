//! bcrypt's private base64 variant.
//!
//! Same 6-bit grouping as MIME base64 but a different alphabet and no
//! padding, so it is *not* compatible with RFC 4648 codecs.

use crate::error::{Error, Result};

/// The 64 symbols, in value order.
pub const ALPHABET: &[u8; 64] = b"./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

const INVALID: u8 = 0xff;

// Inverse of ALPHABET for 7-bit input; anything else is invalid.
const DECODE_TABLE: [u8; 128] = build_decode_table();

const fn build_decode_table() -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// The 6-bit value of `c`, or `None` outside the alphabet.
pub(crate) fn char_value(c: u8) -> Option<u8> {
    match DECODE_TABLE.get(c as usize) {
        Some(&v) if v != INVALID => Some(v),
        _ => None,
    }
}

fn push64(out: &mut String, v: u8) {
    out.push(ALPHABET[(v & 0x3f) as usize] as char);
}

/// Number of characters [`encode`] emits for `len` bytes.
pub const fn encoded_len(len: usize) -> usize {
    (len * 4 + 2) / 3
}

/// Encode the first `len` bytes of `bytes`.
///
/// A trailing group of one or two bytes produces two or three characters
/// and the unused low bits of the last character are zero.
///
/// # Errors
///
/// [`Error::InvalidLength`] if `len` is zero or larger than `bytes.len()`.
pub fn encode(bytes: &[u8], len: usize) -> Result<String> {
    if len == 0 || len > bytes.len() {
        return Err(Error::InvalidLength { len });
    }

    let mut out = String::with_capacity(encoded_len(len));
    for chunk in bytes[..len].chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);

        push64(&mut out, b0 >> 2);
        push64(&mut out, ((b0 & 0x03) << 4) | (b1 >> 4));
        if chunk.len() > 1 {
            push64(&mut out, ((b1 & 0x0f) << 2) | (b2 >> 6));
        }
        if chunk.len() > 2 {
            push64(&mut out, b2);
        }
    }

    Ok(out)
}

/// Decode at most `max_len` bytes from `text`.
///
/// Decoding stops without error at the first character outside the
/// alphabet, once `max_len` bytes were produced, or when fewer than two
/// characters remain to start a group. Callers check the returned length.
///
/// # Errors
///
/// [`Error::InvalidLength`] if `max_len` is zero.
pub fn decode(text: &str, max_len: usize) -> Result<Vec<u8>> {
    if max_len == 0 {
        return Err(Error::InvalidLength { len: max_len });
    }

    let input = text.as_bytes();
    let mut out = Vec::with_capacity(max_len.min(input.len()));

    for group in input.chunks(4) {
        if group.len() < 2 {
            break;
        }
        let (Some(c1), Some(c2)) = (char_value(group[0]), char_value(group[1])) else {
            break;
        };
        out.push((c1 << 2) | ((c2 & 0x30) >> 4));
        if out.len() >= max_len {
            break;
        }

        let Some(c3) = group.get(2).copied().and_then(char_value) else {
            break;
        };
        out.push(((c2 & 0x0f) << 4) | ((c3 & 0x3c) >> 2));
        if out.len() >= max_len {
            break;
        }

        let Some(c4) = group.get(3).copied().and_then(char_value) else {
            break;
        };
        out.push(((c3 & 0x03) << 6) | c4);
        if out.len() >= max_len {
            break;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_is_distinct() {
        for (i, &c) in ALPHABET.iter().enumerate() {
            assert_eq!(char_value(c), Some(i as u8));
        }
        assert_eq!(char_value(b'+'), None);
        assert_eq!(char_value(b'='), None);
        assert_eq!(char_value(b'$'), None);
        assert_eq!(char_value(0x80), None);
    }

    #[test]
    fn test_encode_partial_groups() {
        assert_eq!(encode(&[0x00], 1).unwrap(), "..");
        assert_eq!(encode(&[0xff], 1).unwrap(), "9u");
        assert_eq!(encode(&[0xff, 0xff], 2).unwrap(), "996");
        assert_eq!(encode(&[0xff, 0xff, 0xff], 3).unwrap(), "9999");
        assert_eq!(encode(b"Hello", 5).unwrap(), "QETqZE6");
    }

    #[test]
    fn test_encode_respects_len() {
        let bytes: Vec<u8> = (0..16).collect();
        assert_eq!(encode(&bytes, 16).unwrap(), "..CA.uOD/eaGAOmJB.yMBu");
        assert_eq!(encode(&bytes, 1).unwrap(), encode(&[0], 1).unwrap());
        assert_eq!(encode(&bytes, 16).unwrap().len(), encoded_len(16));
    }

    #[test]
    fn test_encode_invalid_length() {
        assert!(matches!(
            encode(&[1, 2, 3], 0),
            Err(Error::InvalidLength { len: 0 })
        ));
        assert!(matches!(
            encode(&[1, 2, 3], 4),
            Err(Error::InvalidLength { len: 4 })
        ));
        assert!(encode(&[], 1).is_err());
    }

    #[test]
    fn test_decode_known_salt() {
        let salt = decode("MkkJUCZctqHDtrcWu0gfOe", 16).unwrap();
        assert_eq!(
            salt,
            [58, 105, 139, 88, 70, 222, 190, 194, 69, 190, 215, 152, 195, 104, 161, 66]
        );
    }

    #[test]
    fn test_decode_stops_at_invalid_character() {
        let decoded = decode("abcd!efgh", 10).unwrap();
        assert_eq!(decoded, [113, 215, 159]);

        // Invalid in the middle of a group keeps what was already complete.
        assert_eq!(decode("ab!d", 10).unwrap().len(), 1);
        assert!(decode("!bcd", 10).unwrap().is_empty());
    }

    #[test]
    fn test_decode_stops_at_non_ascii() {
        assert_eq!(decode("abcdé", 10).unwrap(), [113, 215, 159]);
    }

    #[test]
    fn test_decode_caps_output() {
        assert_eq!(decode("QETqZE6", 2).unwrap(), b"He");
        assert_eq!(decode("QETqZE6", 5).unwrap(), b"Hello");
        assert_eq!(decode("QETqZE6", 100).unwrap(), b"Hello");
    }

    #[test]
    fn test_decode_ignores_lone_trailing_character() {
        assert_eq!(decode("abcde", 10).unwrap(), [113, 215, 159]);
    }

    #[test]
    fn test_decode_invalid_length() {
        assert!(matches!(
            decode("abcd", 0),
            Err(Error::InvalidLength { len: 0 })
        ));
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(encoded_len(1), 2);
        assert_eq!(encoded_len(2), 3);
        assert_eq!(encoded_len(3), 4);
        assert_eq!(encoded_len(16), 22);
        assert_eq!(encoded_len(23), 31);
    }
}
