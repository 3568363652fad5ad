//! User mention redaction.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

pub const MENTION_PLACEHOLDER: &str = "[USER MENTION REMOVED]";

/// A bare `u/name` (optionally `/u/name`) or the anchor Reddit renders for it,
/// preceded by start-of-text or whitespace.
static USER_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<lead>^|\s)(?:<a href="/?u/[a-zA-Z0-9_-]+?">/?u/[a-zA-Z0-9_-]+?</a>|/?u/[a-zA-Z0-9_-]+)"#,
    )
    .expect("mention pattern is valid")
});

/// Replace every user mention in `body` with [`MENTION_PLACEHOLDER`], keeping
/// the boundary character in front of it.
#[must_use]
pub fn redact_mentions(body: &str) -> Cow<'_, str> {
    USER_MENTION.replace_all(body, format!("${{lead}}{MENTION_PLACEHOLDER}"))
}
