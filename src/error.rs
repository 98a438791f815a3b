//! Error types for the LinOTP enabler.
//!
//! `PatchError` covers every way enabling the plugin can fail: missing
//! settings, missing files, config text that does not have the expected
//! shape, a concurrent run holding the lock, and write failures.

use std::path::PathBuf;

/// Errors that can occur while validating settings or patching the files.
///
/// Every variant is fatal for the run. `main` reports it through
/// [`fatal_message`] and exits with status 1.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// A required environment variable is unset or empty.
    #[error("{name} is not set")]
    MissingEnv {
        /// The environment variable name.
        name: &'static str,
    },

    /// A file that must be patched does not exist.
    #[error("{} not found - please run this script from the config directory", path.display())]
    FileNotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// No commented occurrence of the target line was found.
    #[error("no commented line matching `{target}` found")]
    LineNotFound {
        /// The target pattern that was searched for.
        target: String,
    },

    /// No `/* ... */` block containing the marker was found.
    #[error("no commented block containing `{marker}` found")]
    BlockNotFound {
        /// The marker keyword the block must contain.
        marker: String,
    },

    /// The block has no `'key' => '...'` assignment for the key.
    #[error("no assignment for `{key}` found in the plugin block")]
    KeyNotFound {
        /// The key whose assignment was searched for.
        key: String,
    },

    /// A target pattern could not be compiled.
    #[error("invalid target pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Another enabler run holds the lock on the config file.
    #[error("{} is locked by another run", path.display())]
    Locked {
        /// The config file the lock guards.
        path: PathBuf,
    },

    /// A file could not be written or backed up.
    #[error("failed to write {}: {reason}", path.display())]
    Write {
        /// The file being written.
        path: PathBuf,
        /// Human-readable description of the write failure.
        reason: String,
    },

    /// An underlying IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PatchError {
    /// Attach the file path to a "not found" IO error, leaving others as-is.
    pub fn from_read(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            PatchError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PatchError::Io(err)
        }
    }
}

/// Render the operator-facing fatal message for an error.
pub fn fatal_message(err: &PatchError) -> String {
    format!(
        "FATAL: LinOTP plugin is active (MISP_LINOTP_AUTH=1) but cannot be automatically enabled\n\
         Either disable the plugin or check your configuration file\n\
         Error message is: {err}"
    )
}
