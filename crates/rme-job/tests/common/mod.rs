//! Scripted stand-ins for the remote record service.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use futures::StreamExt;
use futures::stream;
use rme_core::{Authenticator, CoreError, JobId, ListingOrder, Record, RecordService, RecordStream};

pub fn record(id: &str, body: &str) -> Record {
    Record {
        id: id.to_string(),
        subreddit: "rust".to_string(),
        body: body.to_string(),
        body_html: format!("<div class=\"md\"><p>{body}</p></div>"),
        permalink: Some(format!("/r/rust/comments/post/title/{id}/")),
    }
}

/// `n` records `c1..=cn` with distinct bodies.
pub fn records(n: usize) -> Vec<Record> {
    (1..=n)
        .map(|i| record(&format!("c{i}"), &format!("body {i}")))
        .collect()
}

#[derive(Debug, Clone)]
pub enum Scripted {
    Record(Record),
    PageFailure(String),
}

pub type EditLog = Arc<Mutex<Vec<(String, String)>>>;

#[derive(Debug, Default)]
pub struct MockService {
    user: String,
    listings: HashMap<ListingOrder, Vec<Scripted>>,
    failing_edits: HashSet<String>,
    edits: EditLog,
}

impl MockService {
    pub fn new(user: &str) -> Self {
        Self {
            user: user.to_string(),
            ..Self::default()
        }
    }

    pub fn with_listing(mut self, order: ListingOrder, records: Vec<Record>) -> Self {
        self.listings
            .insert(order, records.into_iter().map(Scripted::Record).collect());
        self
    }

    pub fn with_script(mut self, order: ListingOrder, script: Vec<Scripted>) -> Self {
        self.listings.insert(order, script);
        self
    }

    pub fn failing_edit(mut self, id: &str) -> Self {
        self.failing_edits.insert(id.to_string());
        self
    }

    /// Every edit attempted so far, successful or not, in call order.
    pub fn edit_log(&self) -> EditLog {
        Arc::clone(&self.edits)
    }
}

impl RecordService for MockService {
    async fn current_user(&self) -> Result<String, CoreError> {
        Ok(self.user.clone())
    }

    fn list_comments<'a>(&'a self, user: &'a str, order: ListingOrder) -> RecordStream<'a> {
        assert_eq!(user, self.user, "listing requested for another user");
        let script = self.listings.get(&order).cloned().unwrap_or_default();
        stream::iter(script.into_iter().map(move |item| match item {
            Scripted::Record(record) => Ok(record),
            Scripted::PageFailure(message) => Err(CoreError::Listing { order, message }),
        }))
        .boxed()
    }

    async fn edit(&self, record: &Record, text: &str) -> Result<(), CoreError> {
        self.edits
            .lock()
            .expect("edit log lock")
            .push((record.id.clone(), text.to_string()));
        if self.failing_edits.contains(&record.id) {
            return Err(CoreError::Edit {
                id: record.id.clone(),
                message: "RATELIMIT".to_string(),
            });
        }
        Ok(())
    }
}

/// Hands out a prepared session.
pub struct Granting(pub MockService);

impl Authenticator for Granting {
    type Session = MockService;

    async fn authenticate(self, _job_id: &JobId) -> Result<MockService, CoreError> {
        Ok(self.0)
    }
}

/// Rejects every login.
pub struct Refusing;

impl Authenticator for Refusing {
    type Session = MockService;

    async fn authenticate(self, _job_id: &JobId) -> Result<MockService, CoreError> {
        Err(CoreError::Authentication("invalid_grant".to_string()))
    }
}
