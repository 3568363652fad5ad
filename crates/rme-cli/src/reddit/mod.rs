//! Reddit implementation of the remote record service.
//!
//! A listing order only reaches about the newest thousand comments, which is
//! why a job walks all four orders.

mod login;
mod wire;

use std::collections::VecDeque;

use futures::StreamExt;
use futures::stream;
use rme_core::{CoreError, ListingOrder, Record, RecordService, RecordStream};

pub use login::Login;
use wire::{EditResponse, Listing, Me};

const API_BASE: &str = "https://oauth.reddit.com";
const PAGE_LIMIT: &str = "100";

fn transport(error: reqwest::Error) -> CoreError {
    CoreError::Transport(error.to_string())
}

/// An authenticated Reddit session.
pub struct RedditClient {
    http: reqwest::Client,
    token: String,
}

#[derive(Default)]
struct ListingCursor {
    buffer: VecDeque<Record>,
    after: Option<String>,
    exhausted: bool,
}

impl RedditClient {
    pub(crate) const fn new(http: reqwest::Client, token: String) -> Self {
        Self { http, token }
    }

    async fn fetch_page(
        &self,
        user: &str,
        order: ListingOrder,
        after: Option<&str>,
    ) -> Result<(Vec<Record>, Option<String>), CoreError> {
        let listing_error = |message: String| CoreError::Listing { order, message };

        let mut query = vec![
            ("sort", order.as_str()),
            ("t", "all"),
            ("limit", PAGE_LIMIT),
            ("raw_json", "1"),
        ];
        if let Some(after) = after {
            query.push(("after", after));
        }

        let listing: Listing = self
            .http
            .get(format!("{API_BASE}/user/{user}/comments"))
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| listing_error(e.to_string()))?
            .json()
            .await
            .map_err(|e| listing_error(e.to_string()))?;

        tracing::debug!(%order, after = ?after, "fetched listing page");
        Ok(listing.into_page())
    }
}

impl RecordService for RedditClient {
    async fn current_user(&self) -> Result<String, CoreError> {
        let me: Me = self
            .http
            .get(format!("{API_BASE}/api/v1/me"))
            .bearer_auth(&self.token)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)?;
        Ok(me.name)
    }

    /// Pages are fetched lazily; a failed page yields one error and ends the listing.
    fn list_comments<'a>(&'a self, user: &'a str, order: ListingOrder) -> RecordStream<'a> {
        stream::unfold(Some(ListingCursor::default()), move |state| async move {
            let mut cursor = state?;
            loop {
                if let Some(record) = cursor.buffer.pop_front() {
                    return Some((Ok(record), Some(cursor)));
                }
                if cursor.exhausted {
                    return None;
                }
                match self.fetch_page(user, order, cursor.after.as_deref()).await {
                    Ok((records, after)) => {
                        cursor.exhausted = after.is_none() || records.is_empty();
                        cursor.after = after;
                        cursor.buffer.extend(records);
                    }
                    Err(error) => return Some((Err(error), None)),
                }
            }
        })
        .boxed()
    }

    async fn edit(&self, record: &Record, text: &str) -> Result<(), CoreError> {
        let fullname = record.fullname();
        let response: EditResponse = self
            .http
            .post(format!("{API_BASE}/api/editusertext"))
            .bearer_auth(&self.token)
            .form(&[
                ("api_type", "json"),
                ("thing_id", fullname.as_str()),
                ("text", text),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)?;

        match response.error_message() {
            Some(message) => Err(CoreError::Edit {
                id: record.id.clone(),
                message,
            }),
            None => Ok(()),
        }
    }
}
