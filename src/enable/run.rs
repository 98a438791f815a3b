//! Enable orchestration: settings check → plan both rewrites → apply.
//!
//! Both files are patched in memory first. Nothing is written unless both
//! patches succeed, and the write itself runs under an [`ApplyGuard`] so a
//! failure half-way restores the originals.

use std::path::{Path, PathBuf};

use crate::cli::EnableArgs;
use crate::error::PatchError;
use crate::patch::{LineTarget, find_comment_block, substitute_value, uncomment_line};
use crate::settings::{LinotpParams, Settings};

use super::files::{backup_file, read_text, write_text};
use super::guard::ApplyGuard;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Plugin load line in `bootstrap.php`.
pub const PLUGIN_LOAD_LINE: &str = "CakePlugin::load('LinOTPAuth')";

/// Auth backend selector in `config.php`. Both `LinOTPAuth` and `LinOTPAUth`
/// spellings occur in shipped configs.
pub const AUTH_SELECTOR_PATTERN: &str = r"'auth'=>array\('LinOTPA[Uu]th\.LinOTP'\)";

/// Keyword identifying the plugin's commented block in `config.php`.
pub const PLUGIN_BLOCK_MARKER: &str = "LinOTP";

/// Block key receiving the LinOTP server URL.
pub const BASE_URL_KEY: &str = "baseUrl";

/// Block key receiving the realm name.
pub const REALM_KEY: &str = "realm";

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `MISP_LINOTP_AUTH` is not `"1"`; nothing was touched.
    Disabled,
    /// `--dry-run`: the unified diff that would have been applied.
    DryRun {
        /// Diff of both files.
        diff: String,
    },
    /// Both files were rewritten.
    Enabled {
        /// The URL and realm written into the plugin block.
        params: LinotpParams,
    },
}

/// Original and patched content of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatch {
    /// File being patched.
    pub path: PathBuf,
    /// Content as read.
    pub original: String,
    /// Content to write.
    pub patched: String,
}

/// The computed rewrite of both files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchPlan {
    /// `bootstrap.php` rewrite.
    pub bootstrap: FilePatch,
    /// `config.php` rewrite.
    pub config: FilePatch,
}

impl PatchPlan {
    /// Unified diff of both files, original → patched.
    pub fn diff(&self) -> String {
        [&self.bootstrap, &self.config]
            .into_iter()
            .map(|file| {
                similar::TextDiff::from_lines(&file.original, &file.patched)
                    .unified_diff()
                    .context_radius(3)
                    .header(
                        &format!("original: {}", file.path.display()),
                        &format!("patched: {}", file.path.display()),
                    )
                    .to_string()
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Patches
// ─────────────────────────────────────────────────────────────────────────────

/// Uncomment the plugin load line.
pub fn patch_bootstrap(text: &str) -> Result<String, PatchError> {
    let target = LineTarget::literal(PLUGIN_LOAD_LINE)?;
    let result = uncomment_line(text, &target)?;
    tracing::debug!(line = result.line, "uncommented plugin load line");
    if result.remaining > 0 {
        tracing::warn!(
            remaining = result.remaining,
            "further commented plugin load lines left untouched"
        );
    }
    Ok(result.text)
}

/// Select the LinOTP backend, unwrap the plugin block and fill in the URL
/// and realm.
pub fn patch_config(text: &str, params: &LinotpParams) -> Result<String, PatchError> {
    let target = LineTarget::pattern(AUTH_SELECTOR_PATTERN)?;
    let selected = uncomment_line(text, &target)?;
    tracing::debug!(line = selected.line, "uncommented auth backend selector");
    if selected.remaining > 0 {
        tracing::warn!(
            remaining = selected.remaining,
            "further commented auth selectors left untouched"
        );
    }

    let block = find_comment_block(&selected.text, PLUGIN_BLOCK_MARKER)?;
    let body = substitute_value(block.body, BASE_URL_KEY, &params.base_url)?;
    let body = substitute_value(&body.text, REALM_KEY, &params.realm)?;
    tracing::debug!(
        head_bytes = block.head.len(),
        tail_bytes = block.tail.len(),
        "unwrapped plugin block"
    );

    Ok(block.join(&body.text))
}

/// Read both files and compute their rewrites.
pub fn build_plan(
    bootstrap_path: &Path,
    config_path: &Path,
    params: &LinotpParams,
) -> Result<PatchPlan, PatchError> {
    let bootstrap_text = read_text(bootstrap_path)?;
    let config_text = read_text(config_path)?;

    let bootstrap = FilePatch {
        path: bootstrap_path.to_path_buf(),
        patched: patch_bootstrap(&bootstrap_text)?,
        original: bootstrap_text,
    };
    let config = FilePatch {
        path: config_path.to_path_buf(),
        patched: patch_config(&config_text, params)?,
        original: config_text,
    };

    Ok(PatchPlan { bootstrap, config })
}

// ─────────────────────────────────────────────────────────────────────────────
// Apply
// ─────────────────────────────────────────────────────────────────────────────

/// Back up and rewrite both files under `guard`, then commit.
fn apply_plan(mut guard: ApplyGuard, plan: &PatchPlan, keep_backups: bool) -> Result<(), PatchError> {
    for file in [&plan.bootstrap, &plan.config] {
        let backup = backup_file(&file.path)?;
        guard.record_backup(&file.path, &backup);
        write_text(&file.path, &file.patched)?;
        tracing::info!(path = %file.path.display(), "patched file");
    }
    guard.commit(keep_backups);
    Ok(())
}

/// Run the enabler against the files named by `args`.
///
/// Check order: enablement, config file presence, base URL, realm. Only
/// then are the files read.
pub fn run_enable(args: &EnableArgs, settings: &Settings) -> Result<Outcome, PatchError> {
    if !settings.enabled {
        tracing::info!("LinOTP plugin not enabled, nothing to do");
        return Ok(Outcome::Disabled);
    }

    let bootstrap_path = args.bootstrap_path();
    let config_path = args.config_path();

    if !config_path.exists() {
        return Err(PatchError::FileNotFound { path: config_path });
    }

    let params = settings.params()?;
    tracing::info!(
        base_url = %params.base_url,
        realm = %params.realm,
        config = %config_path.display(),
        "enabling LinOTP plugin"
    );

    if args.dry_run {
        let plan = build_plan(&bootstrap_path, &config_path, &params)?;
        return Ok(Outcome::DryRun { diff: plan.diff() });
    }

    // Lock before reading so a concurrent run cannot patch between our read
    // and our write.
    let guard = ApplyGuard::lock(&config_path)?;
    let plan = build_plan(&bootstrap_path, &config_path, &params)?;
    apply_plan(guard, &plan, args.keep_backups)?;

    Ok(Outcome::Enabled { params })
}
