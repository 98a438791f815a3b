//! LinOTP plugin enabler for MISP deployments.
//!
//! Activates the LinOTP authentication backend by uncommenting the plugin
//! load line in `bootstrap.php`, selecting the backend in `config.php`, and
//! filling the plugin block with the LinOTP base URL and realm taken from the
//! environment.
//!
//! A run leaves an empty `<config>.linotp-lock` file next to the config file.
//! It only carries the advisory lock and is safe to ignore.

pub mod cli;
pub mod enable;
pub mod error;
pub mod patch;
pub mod settings;
