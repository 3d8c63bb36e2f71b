//! The `bcrypt-codec <secret>` command.

use std::io::Write;

use crate::bcrypt::hash_with_salt;
use crate::error::Result;

/// Printed when no secret is given.
pub const USAGE: &str = "Please specify a secret";

/// Run the command and return the process exit code.
///
/// `gensalt` supplies the salt so the output is reproducible under test;
/// the binary passes [`crate::gensalt`] at the default cost.
pub fn run<I, W, F>(args: I, out: &mut W, gensalt: F) -> Result<i32>
where
    I: IntoIterator<Item = String>,
    W: Write,
    F: FnOnce() -> Result<String>,
{
    let Some(secret) = args.into_iter().next() else {
        writeln!(out, "{USAGE}")?;
        out.flush()?;
        return Ok(1);
    };

    let salt = gensalt()?;
    let hash = hash_with_salt(secret.as_bytes(), &salt)?;
    writeln!(out, "{hash}")?;
    out.flush()?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io;

    /// Accepts writes but fails to flush, like a closed pipe.
    struct BrokenPipe(Vec<u8>);

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }
    }

    const FIXED_SALT: &str = "$2a$10$MkkJUCZctqHDtrcWu0gfOe";

    fn fixed_salt() -> Result<String> {
        Ok(FIXED_SALT.to_string())
    }

    #[test]
    fn test_no_argument_prints_usage() {
        let mut out = Vec::new();
        let code = run(Vec::new(), &mut out, fixed_salt).unwrap();
        assert_eq!(code, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "Please specify a secret\n");
    }

    #[test]
    fn test_secret_prints_hash() {
        let mut out = Vec::new();
        let code = run(vec!["pa$$w0rd".to_string()], &mut out, fixed_salt).unwrap();
        assert_eq!(code, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "$2a$10$MkkJUCZctqHDtrcWu0gfOeQJw2ow1WpfdQ0xTJuVylVKscSEetwXm\n"
        );
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let mut out = Vec::new();
        let salt = || Ok("$2a$04$MkkJUCZctqHDtrcWu0gfOe".to_string());
        let code = run(vec!["dummy".to_string(), "extra".to_string()], &mut out, salt).unwrap();
        assert_eq!(code, 0);
        let line = String::from_utf8(out).unwrap();
        assert!(crate::verify("dummy", line.trim_end()).unwrap());
    }

    #[test]
    fn test_salt_failure_is_reported() {
        let mut out = Vec::new();
        let failing = || Err(Error::RandomSourceExhausted("no entropy".to_string()));
        let err = run(vec!["secret".to_string()], &mut out, failing).unwrap_err();
        assert!(matches!(err, Error::RandomSourceExhausted(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_flush_failure_is_reported() {
        let mut out = BrokenPipe(Vec::new());
        let err = run(vec!["pa$$w0rd".to_string()], &mut out, fixed_salt).unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        let err = run(Vec::new(), &mut out, fixed_salt).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
