//! Date-bucketed disk cache for aggregated result sets.
//!
//! Entries live at `<app_dir>/.cache/<YYYY-MM>/<DD>/<name>--<sha256>` where
//! `name` is a readable fragment of the query and the digest covers the
//! `(query, requested)` pair. Entries are never expired; a new calendar day
//! simply lands in a new bucket.
//!
//! Every failure here is non-fatal: lookups degrade to a miss and stores
//! report `false`, both with a logged warning.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::ResultSet;

/// Directory under the application dir that holds all buckets.
pub const CACHE_DIR_NAME: &str = ".cache";

/// Bumped whenever the on-disk entry layout changes.
const FORMAT_VERSION: u32 = 1;

/// Longest readable query fragment kept in a file name.
const MAX_NAME_LEN: usize = 64;

/// Deterministic location of one cached result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    month: String,
    day: String,
    file_name: String,
}

impl CacheKey {
    /// Build the key for `(query, requested)` on `date`.
    pub fn new(query: &str, requested: u32, date: NaiveDate) -> Self {
        let digest = digest_hex(query, requested);
        Self {
            month: date.format("%Y-%m").to_string(),
            day: date.format("%d").to_string(),
            file_name: format!("{}--{digest}", file_fragment(query)),
        }
    }

    /// Path relative to the cache root: `<YYYY-MM>/<DD>/<name>--<digest>`.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.month).join(&self.day).join(&self.file_name)
    }

    /// The file name component.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// Replace every char outside `[A-Za-z0-9_.-]` with `-` and collapse runs
/// of `-`.
///
/// Also used to derive default report file names.
pub fn sanitize_query(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for c in query.chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
            c
        } else {
            '-'
        };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out
}

fn file_fragment(query: &str) -> String {
    let sanitized = sanitize_query(query);
    let mut name: String = sanitized.trim_matches('-').chars().take(MAX_NAME_LEN).collect();
    while name.ends_with('-') {
        name.pop();
    }
    if name.is_empty() {
        "query".to_owned()
    } else {
        name
    }
}

fn digest_hex(query: &str, requested: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hasher.update([0u8]);
    hasher.update(requested.to_string().as_bytes());
    let digest = hasher.finalize();
    format!("{digest:x}")
}

#[derive(Deserialize)]
struct CacheEntry {
    format_version: u32,
    query: String,
    requested: u32,
    #[allow(dead_code)]
    stored_at: DateTime<Utc>,
    results: ResultSet,
}

#[derive(Serialize)]
struct CacheEntryRef<'a> {
    format_version: u32,
    query: &'a str,
    requested: u32,
    stored_at: DateTime<Utc>,
    results: &'a ResultSet,
}

/// Disk-backed result cache rooted at `<app_dir>/.cache`.
#[derive(Debug, Clone)]
pub struct ResultCache {
    root: PathBuf,
}

impl ResultCache {
    /// Cache rooted under `app_dir`.
    pub fn new(app_dir: impl AsRef<Path>) -> Self {
        Self {
            root: app_dir.as_ref().join(CACHE_DIR_NAME),
        }
    }

    /// The `.cache` directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the entry for `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.relative_path())
    }

    /// Look up today's entry for `(query, requested)`.
    pub fn lookup(&self, query: &str, requested: u32) -> Option<ResultSet> {
        self.lookup_on(query, requested, today())
    }

    /// Look up the entry for `(query, requested)` in the bucket of `date`.
    ///
    /// Missing, unreadable, corrupt, or mismatched entries are all a miss.
    pub fn lookup_on(&self, query: &str, requested: u32, date: NaiveDate) -> Option<ResultSet> {
        let path = self.path_for(&CacheKey::new(query, requested, date));

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cache entry unreadable");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt cache entry");
                return None;
            }
        };

        if entry.format_version != FORMAT_VERSION
            || entry.query != query
            || entry.requested != requested
        {
            tracing::warn!(
                path = %path.display(),
                version = entry.format_version,
                "cache entry does not match its key, ignoring"
            );
            return None;
        }

        tracing::debug!(path = %path.display(), count = entry.results.len(), "cache hit");
        Some(entry.results)
    }

    /// Store `results` in today's bucket. Returns `false` on any failure.
    pub fn store(&self, results: &ResultSet, query: &str, requested: u32) -> bool {
        self.store_on(results, query, requested, today())
    }

    /// Store `results` in the bucket of `date`. Returns `false` on any failure.
    pub fn store_on(
        &self,
        results: &ResultSet,
        query: &str,
        requested: u32,
        date: NaiveDate,
    ) -> bool {
        let path = self.path_for(&CacheKey::new(query, requested, date));

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(
                    dir = %parent.display(),
                    error = %e,
                    "failed to create cache bucket"
                );
                return false;
            }
        }

        let entry = CacheEntryRef {
            format_version: FORMAT_VERSION,
            query,
            requested,
            stored_at: Utc::now(),
            results,
        };
        let bytes = match serde_json::to_vec_pretty(&entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize cache entry");
                return false;
            }
        };

        match fs::write(&path, bytes) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), count = results.len(), "cache stored");
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to write cache entry");
                false
            }
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SearchResultItem, Thumbnail};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn sample() -> ResultSet {
        ResultSet::new(vec![
            SearchResultItem::new("Rust", "https://www.rust-lang.org/", "Reliable software")
                .with_thumbnail(Thumbnail {
                    url: "https://img.example/rust.png".into(),
                    width: Some(225),
                    height: Some(225),
                }),
            SearchResultItem::new("Book", "https://doc.rust-lang.org/book/", "The book"),
        ])
    }

    #[test]
    fn cache_key_deterministic_for_same_inputs() {
        let day = date(2026, 10, 16);
        assert_eq!(CacheKey::new("rust lang", 5, day), CacheKey::new("rust lang", 5, day));
    }

    #[test]
    fn cache_key_differs_when_count_differs() {
        let day = date(2026, 10, 16);
        assert_ne!(CacheKey::new("rust lang", 5, day), CacheKey::new("rust lang", 50, day));
    }

    #[test]
    fn cache_key_differs_when_query_differs() {
        let day = date(2026, 10, 16);
        assert_ne!(CacheKey::new("rust", 5, day), CacheKey::new("python", 5, day));
    }

    #[test]
    fn cache_key_layout() {
        let key = CacheKey::new("rust lang", 5, date(2026, 3, 7));
        let rel = key.relative_path();
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        assert_eq!(parts[0], "2026-03");
        assert_eq!(parts[1], "07");
        assert!(parts[2].starts_with("rust-lang--"));
        // 64 hex chars of SHA-256 after the separator.
        assert_eq!(parts[2].len(), "rust-lang--".len() + 64);
    }

    #[test]
    fn sanitize_query_collapses_runs() {
        assert_eq!(sanitize_query("rust  lang!!"), "rust-lang-");
        assert_eq!(sanitize_query("a/b\\c"), "a-b-c");
        assert_eq!(sanitize_query("v1.2_beta-3"), "v1.2_beta-3");
        assert_eq!(sanitize_query("café"), "caf-");
    }

    #[test]
    fn file_fragment_trims_and_truncates() {
        assert_eq!(file_fragment("  rust  "), "rust");
        assert_eq!(file_fragment("???"), "query");
        assert_eq!(file_fragment(&"x".repeat(200)).len(), MAX_NAME_LEN);
    }

    #[test]
    fn store_then_lookup_round_trips() {
        let dir = TempDir::new().expect("tempdir");
        let cache = ResultCache::new(dir.path());
        let day = date(2026, 10, 16);

        assert!(cache.store_on(&sample(), "rust lang", 5, day));
        let cached = cache.lookup_on("rust lang", 5, day).expect("hit");
        assert_eq!(cached, sample());
    }

    #[test]
    fn entry_written_under_month_and_day_buckets() {
        let dir = TempDir::new().expect("tempdir");
        let cache = ResultCache::new(dir.path());
        let day = date(2026, 10, 16);
        assert!(cache.store_on(&sample(), "rust lang", 5, day));

        let bucket = dir.path().join(".cache").join("2026-10").join("16");
        let files: Vec<_> = fs::read_dir(&bucket).expect("bucket").collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn distinct_counts_do_not_collide() {
        let dir = TempDir::new().expect("tempdir");
        let cache = ResultCache::new(dir.path());
        let day = date(2026, 10, 16);

        assert!(cache.store_on(&sample(), "rust lang", 5, day));
        assert!(cache.lookup_on("rust lang", 6, day).is_none());
    }

    #[test]
    fn different_day_is_a_miss() {
        let dir = TempDir::new().expect("tempdir");
        let cache = ResultCache::new(dir.path());

        assert!(cache.store_on(&sample(), "rust lang", 5, date(2026, 10, 16)));
        assert!(cache.lookup_on("rust lang", 5, date(2026, 10, 17)).is_none());
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let dir = TempDir::new().expect("tempdir");
        let cache = ResultCache::new(dir.path());
        let day = date(2026, 10, 16);
        let path = cache.path_for(&CacheKey::new("rust lang", 5, day));
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, b"{not json").expect("write");

        assert!(cache.lookup_on("rust lang", 5, day).is_none());
    }

    #[test]
    fn store_fails_softly_when_root_is_a_file() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join(CACHE_DIR_NAME), b"occupied").expect("write");
        let cache = ResultCache::new(dir.path());

        assert!(!cache.store_on(&sample(), "rust lang", 5, date(2026, 10, 16)));
    }

    #[test]
    fn empty_result_set_round_trips() {
        let dir = TempDir::new().expect("tempdir");
        let cache = ResultCache::new(dir.path());
        let day = date(2026, 1, 2);

        assert!(cache.store_on(&ResultSet::default(), "nothing here", 3, day));
        let cached = cache.lookup_on("nothing here", 3, day).expect("hit");
        assert!(cached.is_empty());
    }
}
