//! `enable-linotp` entry point.
//!
//! Reads the LinOTP settings from the environment once, runs the enabler in
//! the config directory, and maps the outcome to an exit code: 0 when
//! enabled, disabled or dry-run, 1 on any fatal error.

use clap::Parser;

use misp_linotp::cli::EnableArgs;
use misp_linotp::enable::{Outcome, run_enable};
use misp_linotp::error::fatal_message;
use misp_linotp::settings::{LINOTP_AUTH_ENV, Settings};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Definition
// ─────────────────────────────────────────────────────────────────────────────

/// Enable the LinOTP authentication plugin in a MISP config directory.
#[derive(Parser)]
#[command(name = "enable-linotp", version)]
struct Cli {
    #[command(flatten)]
    args: EnableArgs,
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Point
// ─────────────────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.args.verbose);

    let settings = Settings::from_env();

    let code = match run_enable(&cli.args, &settings) {
        Ok(Outcome::Disabled) => {
            println!("LinOTP plugin is not enabled (set {LINOTP_AUTH_ENV}=1 to enable)");
            0
        }
        Ok(Outcome::DryRun { diff }) => {
            print!("{diff}");
            0
        }
        Ok(Outcome::Enabled { params }) => {
            println!(
                "LinOTP enabled for use - url={} realm={}",
                params.base_url, params.realm
            );
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "enable failed");
            println!("{}", fatal_message(&e));
            1
        }
    };

    std::process::exit(code);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tracing Init
// ─────────────────────────────────────────────────────────────────────────────

/// Initialise tracing subscriber with stderr output.
///
/// When `verbose` is true, sets filter to `debug`. Otherwise, respects
/// `RUST_LOG` (defaulting to no output).
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
