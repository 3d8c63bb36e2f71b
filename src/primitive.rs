//! The adaptive hash primitive behind the record format.

use std::time::Instant;

use zeroize::Zeroizing;

use crate::blowfish::Blowfish;
use crate::record::{Cost, Minor, DIGEST_LEN, SALT_LEN};

/// Number of password bytes the key schedule consumes. Anything beyond
/// this does not influence the digest.
pub const MAX_PASSWORD_LEN: usize = 72;

// "OrpheanBeholderScryDoubt" as big-endian words.
const MAGIC: [u32; 6] = [
    0x4f727068, 0x65616e42, 0x65686f6c, 0x64657253, 0x63727944, 0x6f756274,
];

/// Expensive, deterministic mixing of password and salt.
///
/// Implementations must return the same digest for the same arguments and
/// must double their work for every increment of `cost`. Swapping one
/// conforming implementation for another leaves every other part of the
/// crate unchanged, which is what the tests rely on when they inject a
/// cheap fake.
pub trait HashPrimitive: Send + Sync {
    fn hash(
        &self,
        password: &[u8],
        salt: &[u8; SALT_LEN],
        cost: Cost,
        minor: Minor,
    ) -> [u8; DIGEST_LEN];
}

/// OpenBSD's EksBlowfish setup followed by 64 encryptions of
/// `OrpheanBeholderScryDoubt`.
///
/// The password is NUL-terminated before use and only the first
/// [`MAX_PASSWORD_LEN`] bytes of that key are significant: longer
/// passwords are silently truncated here. Use
/// [`crate::LongPasswordPolicy::Reject`] to refuse them instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct EksBlowfish;

impl HashPrimitive for EksBlowfish {
    fn hash(
        &self,
        password: &[u8],
        salt: &[u8; SALT_LEN],
        cost: Cost,
        _minor: Minor,
    ) -> [u8; DIGEST_LEN] {
        let started = Instant::now();

        let mut key = Zeroizing::new(Vec::with_capacity(password.len() + 1));
        key.extend_from_slice(password);
        key.push(0);

        let mut state = Blowfish::init_state();
        state.expand_key_with_salt(salt, &key);
        for _ in 0..cost.rounds() {
            state.expand_key(&key);
            state.expand_key(salt);
        }

        let mut ctext = MAGIC;
        for _ in 0..64 {
            for pair in ctext.chunks_exact_mut(2) {
                (pair[0], pair[1]) = state.encrypt_block(pair[0], pair[1]);
            }
        }

        let mut raw = Zeroizing::new([0u8; 24]);
        for (out, word) in raw.chunks_exact_mut(4).zip(ctext) {
            out.copy_from_slice(&word.to_be_bytes());
        }

        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&raw[..DIGEST_LEN]);

        tracing::trace!(
            cost = cost.get(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "eksblowfish finished"
        );
        digest
    }
}
