//! Logger setup for the game binary.
//!
//! The terminal belongs to the game while it runs, so log output can only go to a file. Without a
//! log file no logger is installed and every log call is a no-op.

use std::{fs::File, path::Path};

use color_eyre::eyre::{Result, WrapErr as _};
use env_logger::{Builder, Env, Target};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Builds a logger writing to the given file, honouring `RUST_LOG`.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn builder(path: &Path) -> Result<Builder> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    let _ = builder.target(Target::Pipe(Box::new(file)));

    Ok(builder)
}

/// Installs the global logger if a log file was requested.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or a logger is already installed.
pub fn init(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    builder(path)?
        .try_init()
        .wrap_err("failed to install the logger")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_init_without_file_is_a_no_op() {
        assert!(init(None).is_ok(), "no log file means nothing to set up");
    }

    #[test]
    fn test_builder_creates_the_log_file() {
        let path = std::env::temp_dir().join(format!("fogmaze-{}.log", std::process::id()));

        let builder = builder(&path);

        assert!(builder.is_ok(), "temp dir should be writable");
        assert!(path.exists(), "log file should be created up front");
        fs::remove_file(&path).expect("failed to clean up log file");
    }

    #[test]
    fn test_builder_reports_unwritable_paths() {
        let path = std::env::temp_dir().join("fogmaze-no-such-dir/game.log");

        let err = builder(&path).expect_err("missing directory should fail");

        assert!(err.to_string().contains("failed to create log file"));
    }
}
