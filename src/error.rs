use std::io;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while encoding, parsing, hashing or verifying.
///
/// None of these are retryable: the same input always yields the same
/// error. A password that simply does not match is not an error, see
/// [`crate::verify`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The codec was asked to encode or decode a zero or out-of-range length.
    #[error("invalid length {len}")]
    InvalidLength { len: usize },

    /// Cost outside the accepted 4..=30 range.
    #[error("invalid cost {0}: must be between 4 and 30")]
    InvalidCost(u32),

    /// The stored string does not follow the `$2a$NN$<salt><digest>` layout.
    #[error("malformed record: {reason}")]
    MalformedRecord { reason: &'static str },

    /// The random source could not supply the salt bytes.
    #[error("random source exhausted: {0}")]
    RandomSourceExhausted(String),

    /// The password was refused by the configured policy.
    #[error("invalid password: {0}")]
    InvalidPassword(String),

    /// Writing CLI output failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn malformed(reason: &'static str) -> Self {
        Error::MalformedRecord { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::InvalidCost(31).to_string(),
            "invalid cost 31: must be between 4 and 30"
        );
        assert_eq!(
            Error::malformed("missing delimiter").to_string(),
            "malformed record: missing delimiter"
        );
        assert_eq!(
            Error::InvalidLength { len: 0 }.to_string(),
            "invalid length 0"
        );
    }

    #[test]
    fn test_error_from_io() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
