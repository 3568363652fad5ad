//! The remote record value and its listing/format enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A remote comment as fetched from the service. Read-only to the job engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable base-36 identifier (without the `t1_` kind prefix).
    pub id: String,
    /// Name of the container (subreddit) the comment was posted in.
    pub subreddit: String,
    /// Markdown source of the comment.
    pub body: String,
    /// Rendered HTML of the comment.
    pub body_html: String,
    /// Site-relative permalink, when the service returned one.
    pub permalink: Option<String>,
}

impl Record {
    /// Fully qualified thing name used by the edit endpoint.
    #[must_use]
    pub fn fullname(&self) -> String {
        format!("t1_{}", self.id)
    }

    #[must_use]
    pub fn body_for(&self, format: BodyFormat) -> &str {
        match format {
            BodyFormat::Markdown => &self.body,
            BodyFormat::Html => &self.body_html,
        }
    }
}

/// Sort order of a user comment listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingOrder {
    Controversial,
    Hot,
    New,
    Top,
}

impl ListingOrder {
    /// All orders, in the sequence their listings are merged.
    pub const ALL: [Self; 4] = [Self::Controversial, Self::Hot, Self::New, Self::Top];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Controversial => "controversial",
            Self::Hot => "hot",
            Self::New => "new",
            Self::Top => "top",
        }
    }
}

impl fmt::Display for ListingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representation in which bodies are archived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFormat {
    #[default]
    Markdown,
    Html,
}

impl BodyFormat {
    #[must_use]
    pub const fn from_html_flag(html: bool) -> Self {
        if html { Self::Html } else { Self::Markdown }
    }

    /// File extension (with leading dot) of archived bodies.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Markdown => ".md",
            Self::Html => ".html",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record {
            id: "abc123".into(),
            subreddit: "rust".into(),
            body: "plain".into(),
            body_html: "<p>plain</p>".into(),
            permalink: Some("/r/rust/comments/x/y/abc123/".into()),
        }
    }

    #[test]
    fn fullname_has_comment_prefix() {
        assert_eq!(record().fullname(), "t1_abc123");
    }

    #[test]
    fn body_for_selects_representation() {
        let r = record();
        assert_eq!(r.body_for(BodyFormat::Markdown), "plain");
        assert_eq!(r.body_for(BodyFormat::Html), "<p>plain</p>");
    }

    #[test]
    fn extensions_match_format() {
        assert_eq!(BodyFormat::from_html_flag(false).extension(), ".md");
        assert_eq!(BodyFormat::from_html_flag(true).extension(), ".html");
    }

    #[test]
    fn listing_orders_render_as_query_values() {
        let names: Vec<_> = ListingOrder::ALL.iter().map(|o| o.as_str()).collect();
        assert_eq!(names, ["controversial", "hot", "new", "top"]);
    }
}
