//! Predicates that protect comments from being edited.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;
use rme_core::Record;

use crate::error::JobError;

/// Why a comment was left out of the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Seen earlier through another listing.
    AlreadyArchived,
    Subreddit(String),
    Literal(String),
    Pattern(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyArchived => f.write_str("already archived"),
            Self::Subreddit(name) => write!(f, "whitelisted subreddit {name}"),
            Self::Literal(text) => write!(f, "contains whitelisted text {text:?}"),
            Self::Pattern(pattern) => write!(f, "matches whitelisted pattern {pattern}"),
        }
    }
}

/// Skip a comment if any predicate matches.
///
/// Literals and patterns are tested against the Markdown body; subreddit
/// names compare case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct WhitelistSpec {
    literals: Vec<String>,
    patterns: Vec<Regex>,
    subreddits: HashSet<String>,
}

impl WhitelistSpec {
    /// # Errors
    ///
    /// Returns `JobError::InvalidPattern` for the first regex that does not compile.
    pub fn new(
        literals: Vec<String>,
        patterns: &[String],
        subreddits: &[String],
    ) -> Result<Self, JobError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| JobError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            literals,
            patterns,
            subreddits: subreddits.iter().map(|s| s.to_lowercase()).collect(),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.patterns.is_empty() && self.subreddits.is_empty()
    }

    /// The first predicate protecting `record`, if any.
    #[must_use]
    pub fn matches(&self, record: &Record) -> Option<SkipReason> {
        if self.subreddits.contains(&record.subreddit.to_lowercase()) {
            return Some(SkipReason::Subreddit(record.subreddit.clone()));
        }
        if let Some(literal) = self.literals.iter().find(|l| record.body.contains(l.as_str())) {
            return Some(SkipReason::Literal(literal.clone()));
        }
        self.patterns
            .iter()
            .find(|p| p.is_match(&record.body))
            .map(|p| SkipReason::Pattern(p.as_str().to_string()))
    }
}
