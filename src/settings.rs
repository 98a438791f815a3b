//! Settings read from the process environment.
//!
//! The environment is read exactly once, at startup, into [`Settings`]. The
//! patcher itself never touches `std::env`.

use crate::error::PatchError;

/// Must be exactly `"1"` for the plugin to be enabled.
pub const LINOTP_AUTH_ENV: &str = "MISP_LINOTP_AUTH";

/// Realm name in LinOTP to authenticate against.
pub const LINOTP_REALM_ENV: &str = "MISP_LINOTP_REALM";

/// URL of the LinOTP server, e.g. `http://linotp.local`.
pub const LINOTP_BASEURL_ENV: &str = "LINOTP_BASEURL";

/// Raw enablement and connection parameters.
///
/// Empty values are normalised to `None` so that `VAR=` and an unset `VAR`
/// behave the same.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Whether `MISP_LINOTP_AUTH` is exactly `"1"`.
    pub enabled: bool,
    /// Value of `LINOTP_BASEURL`.
    pub base_url: Option<String>,
    /// Value of `MISP_LINOTP_REALM`.
    pub realm: Option<String>,
}

/// Validated connection parameters, both non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinotpParams {
    /// Base URL written into the plugin block's `baseUrl`.
    pub base_url: String,
    /// Realm written into the plugin block's `realm`.
    pub realm: String,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            enabled: lookup(LINOTP_AUTH_ENV).as_deref() == Some("1"),
            base_url: non_empty(LINOTP_BASEURL_ENV),
            realm: non_empty(LINOTP_REALM_ENV),
        }
    }

    /// Check that the base URL and realm are both present.
    ///
    /// The base URL is checked first, so when both are missing the error
    /// names `LINOTP_BASEURL`.
    pub fn params(&self) -> Result<LinotpParams, PatchError> {
        let base_url = self.base_url.clone().ok_or(PatchError::MissingEnv {
            name: LINOTP_BASEURL_ENV,
        })?;
        let realm = self.realm.clone().ok_or(PatchError::MissingEnv {
            name: LINOTP_REALM_ENV,
        })?;
        Ok(LinotpParams { base_url, realm })
    }
}
