//! # bcrypt-codec
//!
//! OpenBSD-style bcrypt password hashing: the `$2a$`/`$2y$` record format,
//! its private base64 alphabet, and hash/verify on top of EksBlowfish.
//!
//! bcrypt is a password hashing function designed by Niels Provos and
//! David Mazières, based on the Blowfish cipher, and presented in 1999 at
//! the Usenix Security Symposium. Its work factor doubles with every cost
//! increment, so hashing is deliberately slow: run it off any latency
//! sensitive thread.
//!
//! ```
//! use bcrypt_codec::{hash_password, verify};
//!
//! let hash = hash_password("my_secure_password", 4).unwrap();
//! assert!(verify("my_secure_password", &hash).unwrap());
//! assert!(!verify("not_my_password", &hash).unwrap());
//! ```
//!
//! Re-hashing with a known salt is reproducible:
//!
//! ```
//! let hash = bcrypt_codec::hash_with_salt("pa$$w0rd", "$2a$04$MkkJUCZctqHDtrcWu0gfOe").unwrap();
//! assert_eq!(hash.len(), 60);
//! assert!(hash.starts_with("$2a$04$MkkJUCZctqHDtrcWu0gfOe"));
//! ```

pub mod base64;
pub mod bcrypt;
mod blowfish;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod primitive;
pub mod record;

pub use bcrypt::{
    constant_time_eq, gensalt, gensalt_with_rng, hash_password, hash_password_with_rng,
    hash_with_salt, matches, verify, Hasher,
};
pub use config::{normalize_password, HashConfig, LongPasswordPolicy, Normalization};
pub use error::{Error, Result};
pub use primitive::{EksBlowfish, HashPrimitive, MAX_PASSWORD_LEN};
pub use record::{serialize, Cost, Minor, Record};
