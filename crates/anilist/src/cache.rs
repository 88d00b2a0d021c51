//! Date-stamped disk cache for fetched user lists.
//!
//! One JSON file per user and day, named `{user}-{YYYYMMDD}-list.json`. A
//! file is fresh while its stamp is within one calendar day of today; lookup
//! returns the newest fresh file for the user and deletes every other one
//! (stale or superseded), keeping the cache directory flat.

use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::error::{AnilistError, Result};
use crate::types::ListEntry;

/// Maximum stamp age, in calendar days, for a cache file to count as fresh.
const MAX_AGE_DAYS: i64 = 1;

const FILE_SUFFIX: &str = "-list.json";
const STAMP_FORMAT: &str = "%Y%m%d";

/// Disk cache of fetched user lists.
#[derive(Debug, Clone)]
pub struct ListCache {
    dir: PathBuf,
    max_age_days: i64,
    clean: bool,
}

impl ListCache {
    /// Creates a cache rooted at `dir` with the default freshness window
    /// and stale-file cleanup enabled.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ListCache {
            dir: dir.into(),
            max_age_days: MAX_AGE_DAYS,
            clean: true,
        }
    }

    /// Overrides the freshness window.
    pub fn with_max_age_days(mut self, days: i64) -> Self {
        self.max_age_days = days;
        self
    }

    /// Disables (or re-enables) deletion of stale and superseded files
    /// during lookup.
    pub fn with_cleaning(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Loads the newest fresh cached list for `user_name`, if one exists.
    pub fn load(&self, user_name: &str) -> Result<Option<Vec<ListEntry>>> {
        let today = Local::now().date_naive();
        let Some(path) = self.latest_fresh_file(user_name, today)? else {
            return Ok(None);
        };
        debug!("Loading cached list from {}", path.display());
        let raw = fs::read_to_string(&path)?;
        let entries = serde_json::from_str(&raw).map_err(|source| AnilistError::CorruptCache {
            path: path.clone(),
            source,
        })?;
        Ok(Some(entries))
    }

    /// Writes `entries` to today's cache file for `user_name`, creating the
    /// cache directory if needed. Returns the file path.
    pub fn store(&self, user_name: &str, entries: &[ListEntry]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let today = Local::now().date_naive();
        let path = self.dir.join(file_name(user_name, today));
        let json = serde_json::to_string(entries).map_err(|source| AnilistError::EncodeCache {
            user: user_name.to_string(),
            source,
        })?;
        fs::write(&path, json)?;
        info!("Cached {} entries at {}", entries.len(), path.display());
        Ok(path)
    }

    /// Scans the cache directory for this user's files and picks the newest
    /// fresh one. Everything else belonging to the user is removed when
    /// cleaning is on.
    fn latest_fresh_file(&self, user_name: &str, today: NaiveDate) -> Result<Option<PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(None);
        }
        let mut best: Option<(NaiveDate, PathBuf)> = None;
        let mut discarded: Vec<PathBuf> = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(stamp) = parse_stamp(name, user_name) else {
                continue;
            };
            if !is_fresh(stamp, today, self.max_age_days) {
                discarded.push(path);
                continue;
            }
            let is_newer = match &best {
                Some((best_stamp, _)) => stamp > *best_stamp,
                None => true,
            };
            if is_newer {
                if let Some((_, superseded)) = best.replace((stamp, path)) {
                    discarded.push(superseded);
                }
            } else {
                discarded.push(path);
            }
        }
        if self.clean {
            for path in discarded {
                debug!("Removing outdated cache file {}", path.display());
                if let Err(err) = fs::remove_file(&path) {
                    warn!("Could not remove {}: {}", path.display(), err);
                }
            }
        }
        Ok(best.map(|(_, path)| path))
    }
}

/// Builds the cache file name for a user and date stamp.
fn file_name(user_name: &str, date: NaiveDate) -> String {
    format!("{}-{}{}", user_name, date.format(STAMP_FORMAT), FILE_SUFFIX)
}

/// Extracts the date stamp from a cache file name belonging to `user_name`.
/// Returns `None` for files of other users or other shapes.
fn parse_stamp(file_name: &str, user_name: &str) -> Option<NaiveDate> {
    let rest = file_name.strip_prefix(user_name)?.strip_prefix('-')?;
    let stamp = rest.strip_suffix(FILE_SUFFIX)?;
    NaiveDate::parse_from_str(stamp, STAMP_FORMAT).ok()
}

/// Whether a stamp lies within the freshness window around `today`.
fn is_fresh(stamp: NaiveDate, today: NaiveDate, max_age_days: i64) -> bool {
    (today - stamp).num_days().abs() <= max_age_days
}
