//! CLI argument types for `enable-linotp`.
//!
//! Defined separately from `main.rs` so that integration tests can parse
//! them directly.

use std::path::PathBuf;

use clap::Args;

/// Arguments for `enable-linotp`.
///
/// The LinOTP connection itself comes from the environment
/// (`MISP_LINOTP_AUTH`, `LINOTP_BASEURL`, `MISP_LINOTP_REALM`); these flags
/// only control where the files are and how they are written.
#[derive(Args, Debug, Clone)]
pub struct EnableArgs {
    /// Directory holding the MISP config files.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Bootstrap file name, relative to `--dir`.
    #[arg(long, default_value = "bootstrap.php")]
    pub bootstrap: PathBuf,

    /// Config file name, relative to `--dir`.
    #[arg(long, default_value = "config.php")]
    pub config: PathBuf,

    /// Print a diff of the changes without writing.
    #[arg(long)]
    pub dry_run: bool,

    /// Keep the `.linotp-backup` copies after a successful run.
    ///
    /// The empty `<config>.linotp-lock` file is left in place either way.
    #[arg(long)]
    pub keep_backups: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub verbose: bool,
}

impl EnableArgs {
    /// Arguments with every flag at its default, rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            bootstrap: PathBuf::from("bootstrap.php"),
            config: PathBuf::from("config.php"),
            dry_run: false,
            keep_backups: false,
            verbose: false,
        }
    }

    /// Full path of the bootstrap file.
    pub fn bootstrap_path(&self) -> PathBuf {
        self.dir.join(&self.bootstrap)
    }

    /// Full path of the config file.
    pub fn config_path(&self) -> PathBuf {
        self.dir.join(&self.config)
    }
}
