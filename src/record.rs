//! The textual bcrypt record: `$2a$10$<22 salt chars><31 digest chars>`.

use std::fmt;

use crate::base64;
use crate::error::{Error, Result};

/// Scheme generation marker, the `2` in `$2a$`.
pub const VERSION: char = '2';

/// Raw salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Raw digest length in bytes. The primitive produces 24 bytes, the last
/// one is dropped by the format.
pub const DIGEST_LEN: usize = 23;

/// Encoded salt length in characters.
pub const ENCODED_SALT_LEN: usize = base64::encoded_len(SALT_LEN);

/// Encoded digest length in characters.
pub const ENCODED_DIGEST_LEN: usize = base64::encoded_len(DIGEST_LEN);

/// Length of a `$2a$10$<salt>` prefix.
pub const SALT_PREFIX_LEN: usize = 7 + ENCODED_SALT_LEN;

/// Length of a complete record.
pub const RECORD_LEN: usize = SALT_PREFIX_LEN + ENCODED_DIGEST_LEN;

/// Work factor exponent: 2^cost key schedule rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cost(u32);

impl Cost {
    pub const MIN: Cost = Cost(4);
    pub const MAX: Cost = Cost(30);
    pub const DEFAULT: Cost = Cost(10);

    pub fn new(cost: u32) -> Result<Self> {
        if cost < Self::MIN.0 || cost > Self::MAX.0 {
            return Err(Error::InvalidCost(cost));
        }
        Ok(Cost(cost))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of key schedule rounds, `2^cost`.
    pub fn rounds(self) -> u64 {
        1u64 << self.0
    }
}

impl Default for Cost {
    fn default() -> Self {
        Cost::DEFAULT
    }
}

impl TryFrom<u32> for Cost {
    type Error = Error;

    fn try_from(cost: u32) -> Result<Self> {
        Cost::new(cost)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Compatibility tag following the version marker.
///
/// Both variants hash identically; only the rendered tag differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Minor {
    /// `$2a$`, the historical default.
    #[default]
    A,
    /// `$2y$`, crypt_blowfish's tag for the same algorithm.
    Y,
}

impl Minor {
    pub fn as_char(self) -> char {
        match self {
            Minor::A => 'a',
            Minor::Y => 'y',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a' => Some(Minor::A),
            'y' => Some(Minor::Y),
            _ => None,
        }
    }
}

impl fmt::Display for Minor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Parsed form of one hash string.
///
/// A record without a digest is a salt: the output of salt generation or
/// of parsing a `$2a$10$<salt>` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    minor: Minor,
    cost: Cost,
    salt: [u8; SALT_LEN],
    digest: Option<[u8; DIGEST_LEN]>,
}

impl Record {
    /// A salt-only record.
    pub fn new(minor: Minor, cost: Cost, salt: [u8; SALT_LEN]) -> Self {
        Record {
            minor,
            cost,
            salt,
            digest: None,
        }
    }

    /// The same record carrying `digest`.
    pub fn with_digest(&self, digest: [u8; DIGEST_LEN]) -> Self {
        Record {
            digest: Some(digest),
            ..self.clone()
        }
    }

    pub fn version(&self) -> char {
        VERSION
    }

    pub fn minor(&self) -> Minor {
        self.minor
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn digest(&self) -> Option<&[u8; DIGEST_LEN]> {
        self.digest.as_ref()
    }

    /// Parse a complete 60-character record.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedRecord`] if the layout deviates in any way,
    /// [`Error::InvalidCost`] if the cost field is two digits but out of
    /// range.
    pub fn parse(s: &str) -> Result<Self> {
        let (minor, cost, body) = split_fields(s)?;
        if body.len() != ENCODED_SALT_LEN + ENCODED_DIGEST_LEN {
            return Err(Error::malformed("salt and digest must be 53 characters"));
        }
        let (salt_text, digest_text) = body.split_at(ENCODED_SALT_LEN);
        let salt = decode_salt(salt_text)?;
        let digest = decode_digest(digest_text)?;

        Ok(Record {
            minor,
            cost,
            salt,
            digest: Some(digest),
        })
    }

    /// Parse a 29-character salt prefix.
    ///
    /// A complete record is accepted too and its digest ignored, so a
    /// stored hash can be passed wherever a salt is expected.
    pub fn parse_salt(s: &str) -> Result<Self> {
        let (minor, cost, body) = split_fields(s)?;
        let salt_text = match body.len() {
            ENCODED_SALT_LEN => body,
            n if n == ENCODED_SALT_LEN + ENCODED_DIGEST_LEN => &body[..ENCODED_SALT_LEN],
            _ => return Err(Error::malformed("salt must be 22 characters")),
        };
        let salt = decode_salt(salt_text)?;

        Ok(Record::new(minor, cost, salt))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}{}${}$", VERSION, self.minor, self.cost)?;
        // Both lengths are fixed and non-zero, encoding cannot fail.
        let salt = base64::encode(&self.salt, SALT_LEN).map_err(|_| fmt::Error)?;
        f.write_str(&salt)?;
        if let Some(digest) = &self.digest {
            let digest = base64::encode(digest, DIGEST_LEN).map_err(|_| fmt::Error)?;
            f.write_str(&digest)?;
        }
        Ok(())
    }
}

/// Render a complete record from its parts.
///
/// # Errors
///
/// [`Error::InvalidCost`] if `cost` is outside 4..=30.
pub fn serialize(
    minor: Minor,
    cost: u32,
    salt: &[u8; SALT_LEN],
    digest: &[u8; DIGEST_LEN],
) -> Result<String> {
    let cost = Cost::new(cost)?;
    Ok(Record::new(minor, cost, *salt).with_digest(*digest).to_string())
}

fn split_fields(s: &str) -> Result<(Minor, Cost, &str)> {
    let fields: Vec<&str> = s.split('$').collect();
    let [prefix, tag, cost, body] = fields.as_slice() else {
        return Err(Error::malformed("expected exactly three '$' delimiters"));
    };
    if !prefix.is_empty() {
        return Err(Error::malformed("record must start with '$'"));
    }

    let mut tag_chars = tag.chars();
    let (Some(version), Some(minor), None) = (tag_chars.next(), tag_chars.next(), tag_chars.next())
    else {
        return Err(Error::malformed("version tag must be two characters"));
    };
    if version != VERSION {
        return Err(Error::malformed("unsupported version"));
    }
    let minor =
        Minor::from_char(minor).ok_or_else(|| Error::malformed("unsupported minor version"))?;

    if cost.len() != 2 || !cost.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed("cost must be two decimal digits"));
    }
    let cost = cost
        .parse::<u32>()
        .map_err(|_| Error::malformed("cost must be two decimal digits"))?;
    let cost = Cost::new(cost)?;

    if !body.is_ascii() {
        return Err(Error::malformed("salt and digest must be ASCII"));
    }

    Ok((minor, cost, *body))
}

fn decode_salt(text: &str) -> Result<[u8; SALT_LEN]> {
    let salt: [u8; SALT_LEN] = base64::decode(text, SALT_LEN)?
        .try_into()
        .map_err(|_| Error::malformed("salt does not decode to 16 bytes"))?;
    // 22 characters carry 132 bits; the four spare bits must be zero.
    let last = text.as_bytes().last().copied().and_then(base64::char_value);
    if last.is_some_and(|v| v & 0x0f != 0) {
        return Err(Error::malformed("salt has non-zero trailing bits"));
    }
    Ok(salt)
}

fn decode_digest(text: &str) -> Result<[u8; DIGEST_LEN]> {
    let digest: [u8; DIGEST_LEN] = base64::decode(text, DIGEST_LEN)?
        .try_into()
        .map_err(|_| Error::malformed("digest does not decode to 23 bytes"))?;
    // 31 characters carry 186 bits; the two spare bits must be zero.
    let last = text.as_bytes().last().copied().and_then(base64::char_value);
    if last.is_some_and(|v| v & 0x03 != 0) {
        return Err(Error::malformed("digest has non-zero trailing bits"));
    }
    Ok(digest)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn record_roundtrip(
            minor in prop_oneof![Just(Minor::A), Just(Minor::Y)],
            cost in 4u32..=30,
            salt in any::<[u8; SALT_LEN]>(),
            digest in proptest::collection::vec(any::<u8>(), DIGEST_LEN),
        ) {
            let digest: [u8; DIGEST_LEN] = digest.try_into().unwrap();
            let text = serialize(minor, cost, &salt, &digest).unwrap();
            prop_assert_eq!(text.len(), RECORD_LEN);

            let record = Record::parse(&text).unwrap();
            prop_assert_eq!(record.version(), VERSION);
            prop_assert_eq!(record.minor(), minor);
            prop_assert_eq!(record.cost().get(), cost);
            prop_assert_eq!(record.salt(), &salt);
            prop_assert_eq!(record.digest(), Some(&digest));
        }
    }
}
