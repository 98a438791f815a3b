//! Targeted text edits on PHP config files.
//!
//! Each edit is a pure function from the current file text to a result type
//! that says what matched. A missing match is a [`PatchError`], never a
//! silent no-op, so a config that does not have the expected shape is
//! reported instead of being written back unchanged.
//!
//! - [`line`]: remove a `//` marker in front of a known line.
//! - [`block`]: split the text around a `/* ... */` block holding a marker.
//! - [`assign`]: replace the value of a `'key' => 'value'` assignment.
//!
//! [`PatchError`]: crate::error::PatchError

pub mod assign;
pub mod block;
pub mod line;

pub use assign::{Substituted, substitute_value};
pub use block::{CommentBlock, find_comment_block};
pub use line::{LineTarget, Uncommented, uncomment_line};
