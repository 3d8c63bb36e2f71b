use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use crate::config::HashConfig;
use crate::error::{Error, Result};
use crate::primitive::{EksBlowfish, HashPrimitive};
use crate::record::{Minor, Record, SALT_LEN};

/// Hashes and verifies passwords with a fixed configuration.
///
/// The primitive is a type parameter so tests and callers with special
/// needs can inject their own; everything else (salt generation, record
/// format, comparison) stays the same.
#[derive(Debug, Clone, Default)]
pub struct Hasher<P = EksBlowfish> {
    config: HashConfig,
    primitive: P,
}

impl Hasher<EksBlowfish> {
    pub fn new(config: HashConfig) -> Self {
        Hasher {
            config,
            primitive: EksBlowfish,
        }
    }
}

impl<P: HashPrimitive> Hasher<P> {
    pub fn with_primitive(config: HashConfig, primitive: P) -> Self {
        Hasher { config, primitive }
    }

    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Draw a fresh salt from `rng` using the configured cost and minor.
    ///
    /// # Errors
    ///
    /// [`Error::RandomSourceExhausted`] if `rng` cannot fill 16 bytes.
    pub fn gensalt<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<Record> {
        let mut salt = [0u8; SALT_LEN];
        rng.try_fill_bytes(&mut salt)
            .map_err(|e| Error::RandomSourceExhausted(e.to_string()))?;
        Ok(Record::new(self.config.minor, self.config.cost, salt))
    }

    /// Hash `password` with a new salt from the operating system RNG.
    pub fn hash(&self, password: impl AsRef<[u8]>) -> Result<String> {
        self.hash_with_rng(password, &mut OsRng)
    }

    /// Hash `password` with a new salt drawn from `rng`.
    pub fn hash_with_rng<R: RngCore + CryptoRng>(
        &self,
        password: impl AsRef<[u8]>,
        rng: &mut R,
    ) -> Result<String> {
        let salt = self.gensalt(rng)?;
        Ok(self.compute(password.as_ref(), &salt)?.to_string())
    }

    /// Hash `password` with a previously generated salt.
    ///
    /// `salt` is a `$2a$10$<22 chars>` prefix or a complete record, whose
    /// digest is then ignored. Cost and minor come from `salt`, not from
    /// the configuration.
    pub fn hash_with_salt(&self, password: impl AsRef<[u8]>, salt: &str) -> Result<String> {
        let salt = Record::parse_salt(salt)?;
        Ok(self.compute(password.as_ref(), &salt)?.to_string())
    }

    /// Check `password` against a stored record.
    ///
    /// A wrong password is `Ok(false)`. An error means `hash` is not a
    /// valid record (or the password was refused by the configured
    /// policy); most callers should treat that as a failed verification,
    /// which is what [`Hasher::matches`] does.
    pub fn verify(&self, password: impl AsRef<[u8]>, hash: &str) -> Result<bool> {
        let stored = Record::parse(hash)?;
        let computed = self.compute(password.as_ref(), &stored)?;

        match (stored.digest(), computed.digest()) {
            (Some(expected), Some(actual)) => Ok(constant_time_eq(expected, actual)),
            _ => Ok(false),
        }
    }

    /// [`Hasher::verify`], with every error reported as a mismatch.
    pub fn matches(&self, password: impl AsRef<[u8]>, hash: &str) -> bool {
        match self.verify(password, hash) {
            Ok(matched) => matched,
            Err(err) => {
                tracing::debug!(error = %err, "treating unverifiable hash as a mismatch");
                false
            }
        }
    }

    fn compute(&self, password: &[u8], salt: &Record) -> Result<Record> {
        let password = self.config.prepare(password)?;
        tracing::debug!(cost = salt.cost().get(), minor = %salt.minor(), "hashing password");

        let digest = self
            .primitive
            .hash(&password, salt.salt(), salt.cost(), salt.minor());
        Ok(salt.with_digest(digest))
    }
}

fn hasher_for(cost: u32, minor: Minor) -> Result<Hasher> {
    Ok(Hasher::new(
        HashConfig::new().with_cost(cost)?.with_minor(minor),
    ))
}

/// Generate a `$2a$<cost>$<salt>` prefix from the operating system RNG.
pub fn gensalt(cost: u32) -> Result<String> {
    gensalt_with_rng(cost, Minor::A, &mut OsRng)
}

/// Generate a salt prefix from an injected cryptographically secure RNG.
///
/// # Errors
///
/// [`Error::InvalidCost`] for a cost outside 4..=30,
/// [`Error::RandomSourceExhausted`] if `rng` fails.
pub fn gensalt_with_rng<R: RngCore + CryptoRng>(
    cost: u32,
    minor: Minor,
    rng: &mut R,
) -> Result<String> {
    Ok(hasher_for(cost, minor)?.gensalt(rng)?.to_string())
}

/// Hash a password at `cost` with a fresh `2a` salt.
///
/// Passwords are raw bytes. Only the first 72 bytes are significant; a
/// longer password hashes the same as its 72-byte prefix. Build a
/// [`Hasher`] with [`crate::LongPasswordPolicy::Reject`] to refuse such
/// passwords instead.
///
/// ```
/// let hash = bcrypt_codec::hash_password("hunter2", 4).unwrap();
/// assert!(bcrypt_codec::verify("hunter2", &hash).unwrap());
/// ```
pub fn hash_password(password: impl AsRef<[u8]>, cost: u32) -> Result<String> {
    hash_password_with_rng(password, cost, Minor::A, &mut OsRng)
}

pub fn hash_password_with_rng<R: RngCore + CryptoRng>(
    password: impl AsRef<[u8]>,
    cost: u32,
    minor: Minor,
    rng: &mut R,
) -> Result<String> {
    hasher_for(cost, minor)?.hash_with_rng(password, rng)
}

/// Hash a password with a salt produced earlier by [`gensalt`].
pub fn hash_with_salt(password: impl AsRef<[u8]>, salt: &str) -> Result<String> {
    Hasher::new(HashConfig::default()).hash_with_salt(password, salt)
}

/// Check a password against a stored hash.
///
/// Returns `Ok(false)` when the password is wrong and an error only when
/// `hash` is not a well-formed record.
pub fn verify(password: impl AsRef<[u8]>, hash: &str) -> Result<bool> {
    Hasher::new(HashConfig::default()).verify(password, hash)
}

/// Like [`verify`], but a malformed stored hash is simply a mismatch.
pub fn matches(password: impl AsRef<[u8]>, hash: &str) -> bool {
    Hasher::new(HashConfig::default()).matches(password, hash)
}

/// Compare two byte strings in time independent of where they differ.
///
/// Slices of different lengths compare unequal; the length itself is not
/// secret.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
