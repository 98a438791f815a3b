//! Enabling the plugin on disk.
//!
//! This module ties the text patches to the two files: it computes the
//! rewrite of `bootstrap.php` and `config.php`, then writes both under an
//! advisory lock with restore-on-failure backups.

pub mod files;
pub mod guard;
pub mod run;

pub use run::{Outcome, PatchPlan, run_enable};
