//! JSON shapes of the Reddit endpoints the client calls.

use rme_core::Record;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    /// A string such as `invalid_grant`, or a status code on 401s.
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct Me {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    pub after: Option<String>,
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
pub struct Thing {
    pub kind: String,
    pub data: CommentData,
}

#[derive(Debug, Deserialize)]
pub struct CommentData {
    pub id: String,
    pub subreddit: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub body_html: String,
    pub permalink: Option<String>,
}

impl From<CommentData> for Record {
    fn from(data: CommentData) -> Self {
        Self {
            id: data.id,
            subreddit: data.subreddit,
            body: data.body,
            body_html: data.body_html,
            permalink: data.permalink,
        }
    }
}

impl Listing {
    /// Comments of the page (non-comment things dropped) and the next cursor.
    pub fn into_page(self) -> (Vec<Record>, Option<String>) {
        let records = self
            .data
            .children
            .into_iter()
            .filter(|thing| thing.kind == "t1")
            .map(|thing| thing.data.into())
            .collect();
        (records, self.data.after)
    }
}

#[derive(Debug, Deserialize)]
pub struct EditResponse {
    pub json: EditJson,
}

#[derive(Debug, Deserialize)]
pub struct EditJson {
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

impl EditResponse {
    /// Joined error descriptions, if the edit was refused.
    pub fn error_message(&self) -> Option<String> {
        if self.json.errors.is_empty() {
            return None;
        }
        Some(
            self.json
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
