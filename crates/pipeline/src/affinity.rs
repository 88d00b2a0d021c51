//! User taste aggregation: mean score and per-dimension affinity tables.
//!
//! ## Algorithm
//! 1. The user's mean score is the arithmetic mean of their positive scores
//!    (50.0 when none exist).
//! 2. Each list entry contributes an effective score: the raw score when
//!    positive, 25.0 for unrated dropped entries, otherwise the user mean.
//! 3. Every attribute occurrence folds the entry's effective score into a
//!    weighted running mean per attribute (weight 1, or the tag's rank).
//! 4. Finalizing keeps attributes whose accumulated weight clears the
//!    dimension threshold and ranks them by mean score, descending.

use std::collections::HashMap;
use std::hash::Hash;

use anilist::{EntryStatus, ListEntry, Media, Staff, Studio, Tag};

use crate::dimension::Dimension;

/// Substitute score for unrated entries the user dropped.
pub const DROPPED_SCORE: f64 = 25.0;

/// Mean assumed for users without a single positive score.
pub const NEUTRAL_MEAN: f64 = 50.0;

/// Arithmetic mean of the user's positive scores.
pub fn mean_score(entries: &[ListEntry]) -> f64 {
    let mut total = 0.0;
    let mut count = 0u32;
    for entry in entries {
        if entry.score > 0.0 {
            total += entry.score;
            count += 1;
        }
    }
    if count == 0 {
        NEUTRAL_MEAN
    } else {
        total / f64::from(count)
    }
}

/// Score an entry contributes to aggregation.
pub fn effective_score(entry: &ListEntry, user_mean: f64) -> f64 {
    if entry.score > 0.0 {
        entry.score
    } else if entry.status == Some(EntryStatus::Dropped) {
        DROPPED_SCORE
    } else {
        user_mean
    }
}

/// Decade bucket for a release year (1994 becomes 1990).
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Weighted running mean for one attribute.
#[derive(Debug)]
struct Accumulator<V> {
    value: V,
    sum: f64,
    weight: f64,
}

/// Accumulates weighted scores per attribute key of one dimension.
#[derive(Debug)]
pub struct AffinityTable<K, V> {
    entries: HashMap<K, Accumulator<V>>,
}

impl<K, V> Default for AffinityTable<K, V> {
    fn default() -> Self {
        AffinityTable {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Ord + Clone, V> AffinityTable<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one occurrence into the running mean for `key`.
    ///
    /// `weight` is 1 for most dimensions and the tag's rank for tags. The
    /// first occurrence supplies the stored payload.
    pub fn accumulate(&mut self, key: K, value: V, score: f64, weight: f64) {
        let acc = self.entries.entry(key).or_insert_with(|| Accumulator {
            value,
            sum: 0.0,
            weight: 0.0,
        });
        acc.sum += score * weight;
        acc.weight += weight;
    }

    /// Keeps keys whose accumulated weight exceeds `min_weight`, scores
    /// each as `sum / weight`, and ranks them descending (ties broken by
    /// key so runs are reproducible).
    pub fn finalize(self, min_weight: f64) -> FinalizedAffinity<K, V> {
        let mut ranked: Vec<AffinityScore<K, V>> = self
            .entries
            .into_iter()
            .filter(|(_, acc)| acc.weight > min_weight)
            .map(|(key, acc)| AffinityScore {
                score: acc.sum / acc.weight,
                key,
                value: acc.value,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.key.cmp(&b.key))
        });
        let scores = ranked
            .iter()
            .map(|entry| (entry.key.clone(), entry.score))
            .collect();
        FinalizedAffinity { ranked, scores }
    }
}

/// One retained attribute with its affinity score.
#[derive(Debug, Clone)]
pub struct AffinityScore<K, V> {
    pub key: K,
    pub value: V,
    pub score: f64,
}

/// Finalized ranking plus a key-indexed score lookup for bias combination.
#[derive(Debug, Clone)]
pub struct FinalizedAffinity<K, V> {
    ranked: Vec<AffinityScore<K, V>>,
    scores: HashMap<K, f64>,
}

impl<K, V> Default for FinalizedAffinity<K, V> {
    fn default() -> Self {
        FinalizedAffinity {
            ranked: Vec::new(),
            scores: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> FinalizedAffinity<K, V> {
    /// Affinity score for one attribute key, when it was retained.
    pub fn score(&self, key: &K) -> Option<f64> {
        self.scores.get(key).copied()
    }

    /// Retained attributes in rank order.
    pub fn ranked(&self) -> &[AffinityScore<K, V>] {
        &self.ranked
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// A user's finalized attribute affinities plus their mean score.
#[derive(Debug, Clone)]
pub struct TasteProfile {
    pub mean_score: f64,
    pub tags: FinalizedAffinity<i64, Tag>,
    pub studios: FinalizedAffinity<i64, Studio>,
    pub staff: FinalizedAffinity<i64, Staff>,
    pub genres: FinalizedAffinity<String, ()>,
    pub decades: FinalizedAffinity<i32, ()>,
}

impl TasteProfile {
    /// A profile with no retained attributes, at the given mean.
    pub fn empty(mean_score: f64) -> Self {
        TasteProfile {
            mean_score,
            tags: FinalizedAffinity::default(),
            studios: FinalizedAffinity::default(),
            staff: FinalizedAffinity::default(),
            genres: FinalizedAffinity::default(),
            decades: FinalizedAffinity::default(),
        }
    }
}

/// Accumulates attribute affinities across a user's list entries.
#[derive(Debug, Default)]
pub struct TasteProfileBuilder {
    tags: AffinityTable<i64, Tag>,
    studios: AffinityTable<i64, Studio>,
    staff: AffinityTable<i64, Staff>,
    genres: AffinityTable<String, ()>,
    decades: AffinityTable<i32, ()>,
}

impl TasteProfileBuilder {
    pub fn new() -> Self {
        TasteProfileBuilder::default()
    }

    /// Folds one media's attributes in at the given effective score.
    ///
    /// Media without a release year contribute to no decade bucket.
    pub fn add(&mut self, media: &Media, score: f64) {
        for tag in &media.tags {
            self.tags
                .accumulate(tag.id, tag.clone(), score, tag.rank as f64);
        }
        for studio in media.studio_nodes() {
            self.studios.accumulate(studio.id, studio.clone(), score, 1.0);
        }
        for person in media.staff_nodes() {
            self.staff.accumulate(person.id, person.clone(), score, 1.0);
        }
        for genre in &media.genres {
            self.genres.accumulate(genre.clone(), (), score, 1.0);
        }
        if let Some(year) = media.release_year() {
            self.decades.accumulate(decade_of(year), (), score, 1.0);
        }
    }

    /// Applies the per-dimension thresholds and ranks every table.
    pub fn finish(self, mean_score: f64) -> TasteProfile {
        TasteProfile {
            mean_score,
            tags: self.tags.finalize(Dimension::Tags.min_weight()),
            studios: self.studios.finalize(Dimension::Studios.min_weight()),
            staff: self.staff.finalize(Dimension::Staff.min_weight()),
            genres: self.genres.finalize(Dimension::Genres.min_weight()),
            decades: self.decades.finalize(Dimension::Decades.min_weight()),
        }
    }
}
