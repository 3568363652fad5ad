//! Content-addressed archive of comment bodies.
//!
//! Layout of a job workspace:
//!
//! ```text
//! jobs/<job-id>/map.json          {"<comment id>": "<sha256 hex>", ...}
//! jobs/<job-id>/<sha256>.md|.html one file per distinct body
//! ```
//!
//! Bodies are deduplicated by hash, not by comment id. The map is rewritten
//! whole on each flush through a temp file in the same directory that is then
//! renamed over `map.json`, so a reader never sees a half-written map.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rme_core::BodyFormat;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::JobError;

pub const MAP_FILE_NAME: &str = "map.json";

/// Comment id -> content hash.
pub type ArchiveMap = BTreeMap<String, String>;

/// Hex SHA-256 of the UTF-8 encoding of `body`.
#[must_use]
pub fn content_hash(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

/// Decides when the archive map is flushed during the archive phase.
///
/// An interval of 0 disables periodic flushes; the final flush always runs.
#[derive(Debug, Clone, Copy)]
pub struct FlushPolicy {
    interval: u32,
    pending: u32,
}

impl FlushPolicy {
    #[must_use]
    pub const fn every(interval: u32) -> Self {
        Self {
            interval,
            pending: 0,
        }
    }

    /// Count one archived comment; true when a flush is due now.
    pub const fn record_archived(&mut self) -> bool {
        self.pending = self.pending.saturating_add(1);
        if self.interval > 0 && self.pending >= self.interval {
            self.pending = 0;
            true
        } else {
            false
        }
    }

    /// Archived comments not yet covered by a flush.
    #[must_use]
    pub const fn pending(&self) -> u32 {
        self.pending
    }
}

#[derive(Debug)]
pub struct ArchiveStore {
    dir: PathBuf,
    format: BodyFormat,
    map: ArchiveMap,
}

impl ArchiveStore {
    /// Open a store over an existing job workspace directory.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>, format: BodyFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
            map: ArchiveMap::new(),
        }
    }

    #[must_use]
    pub fn map_path(&self) -> PathBuf {
        self.dir.join(MAP_FILE_NAME)
    }

    /// Path of the body file for `hash`.
    #[must_use]
    pub fn body_path(&self, hash: &str) -> PathBuf {
        self.dir.join(format!("{hash}{}", self.format.extension()))
    }

    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    #[must_use]
    pub fn hash_of(&self, id: &str) -> Option<&str> {
        self.map.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of distinct bodies archived so far.
    #[must_use]
    pub fn unique_hashes(&self) -> usize {
        self.map.values().collect::<BTreeSet<_>>().len()
    }

    #[must_use]
    pub const fn entries(&self) -> &ArchiveMap {
        &self.map
    }

    /// Archive `body` for comment `id` and return its content hash.
    ///
    /// The body file is written only if no file for that hash exists yet. The
    /// id is recorded in the in-memory map after the body is on disk.
    ///
    /// # Errors
    ///
    /// - `JobError::AlreadyArchived` if `id` was archived before (callers check [`Self::has`])
    /// - `JobError::Io` if the body file cannot be written
    pub fn archive(&mut self, id: &str, body: &str) -> Result<String, JobError> {
        if self.has(id) {
            return Err(JobError::AlreadyArchived(id.to_string()));
        }

        let hash = content_hash(body);
        let path = self.body_path(&hash);
        if !path.is_file() {
            write_replacing(&self.dir, &path, body.as_bytes())?;
        }

        self.map.insert(id.to_string(), hash.clone());
        Ok(hash)
    }

    /// Overwrite `map.json` with the full in-memory map.
    ///
    /// # Errors
    ///
    /// Returns `JobError::Io` / `JobError::MapEncoding` if the snapshot cannot be written.
    pub fn flush(&self) -> Result<(), JobError> {
        let encoded = serde_json::to_vec(&self.map)?;
        write_replacing(&self.dir, &self.map_path(), &encoded)?;
        tracing::debug!(entries = self.map.len(), path = %self.map_path().display(), "flushed archive map");
        Ok(())
    }

    /// Flush run once after the archive phase, whatever the flush interval.
    ///
    /// # Errors
    ///
    /// Same as [`Self::flush`].
    pub fn final_flush(&self) -> Result<(), JobError> {
        self.flush()
    }

    /// Read back the map as currently persisted on disk.
    ///
    /// A missing map file reads as an empty map.
    ///
    /// # Errors
    ///
    /// Returns `JobError::Io` if the file cannot be read and
    /// `JobError::MapEncoding` if it is not a JSON object of strings.
    pub fn load_persisted(&self) -> Result<ArchiveMap, JobError> {
        let path = self.map_path();
        match fs::read(&path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(ArchiveMap::new()),
            Err(source) => Err(JobError::Io { path, source }),
        }
    }
}

/// Write `bytes` to `target` via a temp file in `dir` renamed into place.
fn write_replacing(dir: &Path, target: &Path, bytes: &[u8]) -> Result<(), JobError> {
    let io_err = |source| JobError::Io {
        path: target.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(target).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn store(format: BodyFormat) -> (tempfile::TempDir, ArchiveStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ArchiveStore::open(dir.path(), format);
        (dir, store)
    }

    #[test]
    fn hash_is_sha256_hex_of_utf8_bytes() {
        assert_eq!(
            content_hash("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[rstest]
    #[case(BodyFormat::Markdown, ".md")]
    #[case(BodyFormat::Html, ".html")]
    fn body_file_is_named_by_hash_and_format(#[case] format: BodyFormat, #[case] ext: &str) {
        let (_dir, mut store) = store(format);
        let hash = store.archive("c1", "body text").expect("archive");

        let path = store.body_path(&hash);
        assert!(path.to_string_lossy().ends_with(&format!("{hash}{ext}")));
        assert_eq!(fs::read_to_string(path).expect("read body"), "body text");
    }

    #[test]
    fn identical_bodies_share_one_file_and_hash() {
        let (dir, mut store) = store(BodyFormat::Markdown);
        let first = store.archive("c1", "same").expect("archive");
        let second = store.archive("c2", "same").expect("archive");

        assert_eq!(first, second);
        assert_eq!(store.len(), 2);
        assert_eq!(store.unique_hashes(), 1);

        let bodies = fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|x| x == "md"))
            .count();
        assert_eq!(bodies, 1);
    }

    #[test]
    fn archiving_an_id_twice_is_rejected() {
        let (_dir, mut store) = store(BodyFormat::Markdown);
        store.archive("c1", "one").expect("archive");
        assert!(matches!(
            store.archive("c1", "two"),
            Err(JobError::AlreadyArchived(ref id)) if id == "c1"
        ));
        assert_eq!(store.hash_of("c1"), Some(content_hash("one").as_str()));
    }

    #[test]
    fn map_is_not_persisted_before_flush() {
        let (_dir, mut store) = store(BodyFormat::Markdown);
        store.archive("c1", "one").expect("archive");
        assert!(!store.map_path().exists());
        assert!(store.load_persisted().expect("load").is_empty());
    }

    #[test]
    fn flush_overwrites_with_full_snapshot() {
        let (_dir, mut store) = store(BodyFormat::Markdown);
        store.archive("c1", "one").expect("archive");
        store.flush().expect("flush");
        store.archive("c2", "two").expect("archive");
        store.flush().expect("flush");

        let persisted = store.load_persisted().expect("load");
        assert_eq!(&persisted, store.entries());

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.map_path()).expect("read map"))
                .expect("valid json");
        assert_eq!(raw["c1"], content_hash("one"));
        assert_eq!(raw["c2"], content_hash("two"));
    }

    #[test]
    fn flush_leaves_no_temp_files_behind() {
        let (dir, mut store) = store(BodyFormat::Html);
        store.archive("c1", "<p>x</p>").expect("archive");
        store.flush().expect("flush");

        let names: BTreeSet<String> = fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        let expected: BTreeSet<String> = [
            MAP_FILE_NAME.to_string(),
            format!("{}.html", content_hash("<p>x</p>")),
        ]
        .into_iter()
        .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn interval_policy_flushes_every_k() {
        let mut policy = FlushPolicy::every(2);
        let due: Vec<bool> = (0..5).map(|_| policy.record_archived()).collect();
        assert_eq!(due, [false, true, false, true, false]);
        assert_eq!(policy.pending(), 1);
    }

    #[test]
    fn zero_interval_never_flushes_periodically() {
        let mut policy = FlushPolicy::every(0);
        assert!((0..50).all(|_| !policy.record_archived()));
    }

    #[test]
    fn pending_count_saturates_when_never_flushed() {
        let mut policy = FlushPolicy {
            interval: 0,
            pending: u32::MAX - 1,
        };
        assert!(!policy.record_archived());
        assert!(!policy.record_archived());
        assert_eq!(policy.pending(), u32::MAX);
    }

    #[test]
    fn unwritable_body_path_fails_without_recording_the_id() {
        let (_dir, mut store) = store(BodyFormat::Markdown);
        let blocked = store.body_path(&content_hash("blocked"));
        fs::create_dir(&blocked).expect("occupy body path");
        fs::write(blocked.join("keep"), "x").expect("non-empty dir");

        assert!(matches!(
            store.archive("c1", "blocked"),
            Err(JobError::Io { .. })
        ));
        assert!(!store.has("c1"));
        assert!(store.is_empty());
    }
}
