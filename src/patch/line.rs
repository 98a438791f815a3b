//! Uncommenting a known line.
//!
//! A line counts as commented when the target text is immediately preceded by
//! `//` and at most one space. Only that marker is removed; indentation and
//! everything after the target stay byte-for-byte the same.

use regex::Regex;

use crate::error::PatchError;

/// The text a commented line must contain.
#[derive(Debug, Clone)]
pub struct LineTarget {
    regex: Regex,
}

impl LineTarget {
    /// Target a literal substring. Regex metacharacters are escaped.
    pub fn literal(text: &str) -> Result<Self, PatchError> {
        Self::pattern(&regex::escape(text))
    }

    /// Target an already-escaped regular expression.
    pub fn pattern(pattern: &str) -> Result<Self, PatchError> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// The pattern source, for error messages and logs.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Result of a successful [`uncomment_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uncommented {
    /// The full text with the first commented occurrence uncommented.
    pub text: String,
    /// 1-based line number of the uncommented occurrence.
    pub line: usize,
    /// Further commented occurrences that were left untouched.
    pub remaining: usize,
}

/// Length of the comment marker ending exactly at `pos`, if any.
fn marker_len_before(text: &str, pos: usize) -> Option<usize> {
    let before = &text[..pos];
    if before.ends_with("// ") {
        Some(3)
    } else if before.ends_with("//") {
        Some(2)
    } else {
        None
    }
}

/// Uncomment the first commented occurrence of `target` in `text`.
///
/// Occurrences that are not preceded by a `//` marker (already active lines)
/// are skipped. Returns [`PatchError::LineNotFound`] when no commented
/// occurrence exists, which is also what a second run over an already
/// patched file produces.
pub fn uncomment_line(text: &str, target: &LineTarget) -> Result<Uncommented, PatchError> {
    let mut commented = target.regex.find_iter(text).filter_map(|m| {
        marker_len_before(text, m.start()).map(|len| (m.start() - len, m.start()))
    });

    let (marker_start, marker_end) = commented.next().ok_or_else(|| PatchError::LineNotFound {
        target: target.as_str().to_string(),
    })?;
    let remaining = commented.count();

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..marker_start]);
    out.push_str(&text[marker_end..]);

    Ok(Uncommented {
        text: out,
        line: text[..marker_start].matches('\n').count() + 1,
        remaining,
    })
}
