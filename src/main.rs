// Command line front end: hashes its single argument at the default cost.

use std::io;
use std::process;

use bcrypt_codec::{cli, gensalt, logging, Cost};

fn main() {
    if let Err(err) = logging::init() {
        eprintln!("failed to initialize logging: {err}");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let code = match cli::run(std::env::args().skip(1), &mut out, || {
        gensalt(Cost::DEFAULT.get())
    }) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "hashing failed");
            eprintln!("error: {err}");
            1
        }
    };

    process::exit(code);
}
