//! Locating and unwrapping a commented `/* ... */` block.

use crate::error::PatchError;

/// A config text split around a commented block.
///
/// `head` ends right before `/*` and `tail` starts right after `*/`. The
/// delimiters and the whitespace just inside them belong to none of the
/// three parts, so `head + body + tail` is the text with the block made
/// active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentBlock<'a> {
    /// Text before the opening `/*`.
    pub head: &'a str,
    /// Comment content, trimmed of surrounding whitespace.
    pub body: &'a str,
    /// Text after the closing `*/`.
    pub tail: &'a str,
}

impl CommentBlock<'_> {
    /// Reassemble the text with `body` in place of the commented block.
    pub fn join(&self, body: &str) -> String {
        let mut out = String::with_capacity(self.head.len() + body.len() + self.tail.len());
        out.push_str(self.head);
        out.push_str(body);
        out.push_str(self.tail);
        out
    }
}

/// Find the first `/* ... */` block whose content contains `marker`.
///
/// Blocks are scanned in order; a block is closed by the first `*/` after
/// its opening `/*`. The marker must appear inside that span, so a marker in
/// active code after a comment never selects the comment.
pub fn find_comment_block<'a>(text: &'a str, marker: &str) -> Result<CommentBlock<'a>, PatchError> {
    let mut search_from = 0;

    while let Some(rel_open) = text[search_from..].find("/*") {
        let open = search_from + rel_open;
        let content_start = open + 2;
        let Some(rel_close) = text[content_start..].find("*/") else {
            break;
        };
        let close = content_start + rel_close;
        let content = &text[content_start..close];

        if content.contains(marker) {
            return Ok(CommentBlock {
                head: &text[..open],
                body: content.trim(),
                tail: &text[close + 2..],
            });
        }
        search_from = content_start;
    }

    Err(PatchError::BlockNotFound {
        marker: marker.to_string(),
    })
}
