//! Replacing the value of a `'key' => 'value'` assignment.

use regex::{Captures, Regex};

use crate::error::PatchError;

/// Result of a successful [`substitute_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    /// The block text with every assignment for the key rewritten.
    pub text: String,
    /// Number of assignments rewritten (at least one).
    pub count: usize,
}

/// Replace the quoted value of every `'key' => '...'` assignment in `block`.
///
/// Whitespace around `=>` is matched and kept. `value` is inserted verbatim,
/// with no escaping and no `$1`-style expansion.
pub fn substitute_value(block: &str, key: &str, value: &str) -> Result<Substituted, PatchError> {
    let re = Regex::new(&format!(r"('{}'\s*=>\s*')[^']*(')", regex::escape(key)))?;

    let count = re.find_iter(block).count();
    if count == 0 {
        return Err(PatchError::KeyNotFound {
            key: key.to_string(),
        });
    }

    let text = re
        .replace_all(block, |caps: &Captures<'_>| {
            format!("{}{}{}", &caps[1], value, &caps[2])
        })
        .into_owned();

    Ok(Substituted { text, count })
}
