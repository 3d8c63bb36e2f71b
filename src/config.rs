//! Hashing configuration.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::primitive::MAX_PASSWORD_LEN;
use crate::record::{Cost, Minor};

/// What to do with passwords longer than [`MAX_PASSWORD_LEN`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongPasswordPolicy {
    /// Let the primitive ignore the excess bytes, like every other bcrypt.
    #[default]
    Truncate,
    /// Refuse to hash or verify with [`Error::InvalidPassword`].
    Reject,
}

/// Unicode normalization applied to passwords before hashing.
///
/// Anything other than `None` changes the bytes that get hashed, so hashes
/// produced with normalization only verify with the same setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    #[default]
    None,
    Nfc,
    Nfkc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HashConfig {
    /// Work factor used when generating new salts (default 10).
    pub cost: Cost,
    /// Tag written into new records (default `2a`).
    pub minor: Minor,
    pub long_passwords: LongPasswordPolicy,
    pub normalization: Normalization,
}

impl HashConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// [`Error::InvalidCost`] if `cost` is outside 4..=30.
    pub fn with_cost(mut self, cost: u32) -> Result<Self> {
        self.cost = Cost::new(cost)?;
        Ok(self)
    }

    pub fn with_minor(mut self, minor: Minor) -> Self {
        self.minor = minor;
        self
    }

    pub fn with_long_passwords(mut self, policy: LongPasswordPolicy) -> Self {
        self.long_passwords = policy;
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Apply normalization and the length policy to a raw password.
    pub(crate) fn prepare<'a>(&self, password: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        let prepared = match self.normalization {
            Normalization::None => Cow::Borrowed(password),
            form => Cow::Owned(normalize_password(password, form)?.into_bytes()),
        };

        if self.long_passwords == LongPasswordPolicy::Reject && prepared.len() > MAX_PASSWORD_LEN
        {
            return Err(Error::InvalidPassword(format!(
                "password is {} bytes, the limit is {}",
                prepared.len(),
                MAX_PASSWORD_LEN
            )));
        }

        Ok(prepared)
    }
}

/// Normalize a UTF-8 password to the requested Unicode form.
///
/// # Errors
///
/// [`Error::InvalidPassword`] if normalization is requested for bytes that
/// are not valid UTF-8.
pub fn normalize_password(password: &[u8], form: Normalization) -> Result<String> {
    let text = std::str::from_utf8(password).map_err(|_| {
        Error::InvalidPassword("password must be valid UTF-8 to be normalized".to_string())
    })?;

    Ok(match form {
        Normalization::None => text.to_string(),
        Normalization::Nfc => text.nfc().collect(),
        Normalization::Nfkc => text.nfkc().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HashConfig::default();
        assert_eq!(config.cost.get(), 10);
        assert_eq!(config.minor, Minor::A);
        assert_eq!(config.long_passwords, LongPasswordPolicy::Truncate);
        assert_eq!(config.normalization, Normalization::None);
    }

    #[test]
    fn test_with_cost_validates() {
        assert!(matches!(
            HashConfig::new().with_cost(3),
            Err(Error::InvalidCost(3))
        ));
        assert!(matches!(
            HashConfig::new().with_cost(31),
            Err(Error::InvalidCost(31))
        ));
        assert_eq!(HashConfig::new().with_cost(12).unwrap().cost.get(), 12);
    }

    #[test]
    fn test_prepare_passes_bytes_through() {
        let config = HashConfig::default();
        let prepared = config.prepare(b"caf\xc3\xa9").unwrap();
        assert!(matches!(prepared, Cow::Borrowed(_)));

        // Non-UTF-8 passwords are fine without normalization.
        assert_eq!(&*config.prepare(&[0xff, 0xfe]).unwrap(), &[0xff, 0xfe]);
    }

    #[test]
    fn test_prepare_long_password_policy() {
        let long = vec![b'a'; MAX_PASSWORD_LEN + 1];
        assert!(HashConfig::default().prepare(&long).is_ok());

        let strict = HashConfig::default().with_long_passwords(LongPasswordPolicy::Reject);
        assert!(matches!(
            strict.prepare(&long),
            Err(Error::InvalidPassword(_))
        ));
        assert!(strict.prepare(&long[..MAX_PASSWORD_LEN]).is_ok());
    }

    #[test]
    fn test_normalization() {
        let composed = "café".as_bytes();
        let decomposed = "cafe\u{0301}".as_bytes();

        let nfc = HashConfig::default().with_normalization(Normalization::Nfc);
        assert_eq!(nfc.prepare(composed).unwrap(), nfc.prepare(decomposed).unwrap());

        let nfkc = HashConfig::default().with_normalization(Normalization::Nfkc);
        assert_eq!(&*nfkc.prepare("ﬁ".as_bytes()).unwrap(), b"fi");

        assert!(matches!(
            nfc.prepare(&[0xff]),
            Err(Error::InvalidPassword(_))
        ));
    }
}
