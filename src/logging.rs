//! `tracing` subscriber setup.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Where log lines go when no file is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Stderr,
    /// Drop everything; used while the terminal UI owns the screen.
    Discard,
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `filter`. With `file` set, lines are
/// appended there without ANSI colors.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or the filter does not parse.
pub fn init(filter: &str, file: Option<&Path>, fallback: Fallback) -> io::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(filter)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?,
    };
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    // A second init (tests, repeated calls) keeps the first subscriber.
    let _ = match (file, fallback) {
        (Some(path), _) => {
            let f = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(f))
                .try_init()
        }
        (None, Fallback::Stderr) => builder.with_writer(io::stderr).try_init(),
        (None, Fallback::Discard) => builder.with_writer(io::sink).try_init(),
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_filter_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(init("sunsave=notalevel", None, Fallback::Discard).is_err());
    }

    #[test]
    fn repeated_init_is_harmless() {
        assert!(init("info", None, Fallback::Discard).is_ok());
        assert!(init("debug", None, Fallback::Discard).is_ok());
    }
}
