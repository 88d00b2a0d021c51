//! Provenance tracking for recommendation explanations.
//!
//! While candidates are collected and biased, every signal speaking for a
//! candidate is recorded here: the user's own rating of it, the rated media
//! whose peer recommendations pointed at it, and the attribute matches that
//! cleared the user's significance threshold. The report renders these;
//! scoring never reads them back.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use anilist::{MediaId, Staff, Studio, Tag};

/// Everything recorded in favor of one candidate.
#[derive(Debug, Clone, Default)]
pub struct MediaOrigins {
    /// The user's own raw score for this media, when it sits on their list.
    pub user_rating: Option<f64>,
    /// Source media whose peer recommendations pointed here strongly,
    /// id to display title.
    pub liked: BTreeMap<MediaId, String>,
    pub tags: BTreeMap<i64, Tag>,
    pub studios: BTreeMap<i64, Studio>,
    pub staff: BTreeMap<i64, Staff>,
    pub genres: BTreeSet<String>,
    pub decades: BTreeSet<i32>,
}

impl MediaOrigins {
    /// True when nothing has been recorded for this media.
    pub fn is_empty(&self) -> bool {
        self.user_rating.is_none()
            && self.liked.is_empty()
            && self.tags.is_empty()
            && self.studios.is_empty()
            && self.staff.is_empty()
            && self.genres.is_empty()
            && self.decades.is_empty()
    }
}

/// Per-candidate origin records for one user's pipeline run.
#[derive(Debug, Clone, Default)]
pub struct Origins {
    by_media: HashMap<MediaId, MediaOrigins>,
}

impl Origins {
    pub fn new() -> Self {
        Origins::default()
    }

    /// Records the user's own rating of a candidate.
    pub fn note_user_rating(&mut self, media_id: MediaId, score: f64) {
        self.by_media.entry(media_id).or_default().user_rating = Some(score);
    }

    /// Records a source media whose recommendation edge favored the
    /// candidate.
    pub fn note_liked(&mut self, media_id: MediaId, source_id: MediaId, source_title: &str) {
        self.by_media
            .entry(media_id)
            .or_default()
            .liked
            .insert(source_id, source_title.to_string());
    }

    /// Records a tag the user scores above their significance threshold.
    pub fn note_tag(&mut self, media_id: MediaId, tag: &Tag) {
        self.by_media
            .entry(media_id)
            .or_default()
            .tags
            .insert(tag.id, tag.clone());
    }

    pub fn note_studio(&mut self, media_id: MediaId, studio: &Studio) {
        self.by_media
            .entry(media_id)
            .or_default()
            .studios
            .insert(studio.id, studio.clone());
    }

    pub fn note_staff(&mut self, media_id: MediaId, staff: &Staff) {
        self.by_media
            .entry(media_id)
            .or_default()
            .staff
            .insert(staff.id, staff.clone());
    }

    pub fn note_genre(&mut self, media_id: MediaId, genre: &str) {
        self.by_media
            .entry(media_id)
            .or_default()
            .genres
            .insert(genre.to_string());
    }

    pub fn note_decade(&mut self, media_id: MediaId, decade: i32) {
        self.by_media
            .entry(media_id)
            .or_default()
            .decades
            .insert(decade);
    }

    /// Origins recorded for one candidate, if any.
    pub fn get(&self, media_id: &MediaId) -> Option<&MediaOrigins> {
        self.by_media.get(media_id)
    }

    pub fn len(&self) -> usize {
        self.by_media.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_media.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_accumulate_under_one_media() {
        let mut origins = Origins::new();
        origins.note_user_rating(7, 85.0);
        origins.note_liked(7, 21, "Monster");
        origins.note_genre(7, "Drama");
        origins.note_decade(7, 1990);

        let media = origins.get(&7).unwrap();
        assert_eq!(media.user_rating, Some(85.0));
        assert_eq!(media.liked.get(&21).map(String::as_str), Some("Monster"));
        assert!(media.genres.contains("Drama"));
        assert!(media.decades.contains(&1990));
        assert_eq!(origins.len(), 1);
    }

    #[test]
    fn repeated_notes_deduplicate() {
        let mut origins = Origins::new();
        let tag = Tag {
            id: 4,
            name: "Historical".into(),
            rank: 80,
        };
        origins.note_tag(9, &tag);
        origins.note_tag(9, &tag);
        origins.note_genre(9, "Action");
        origins.note_genre(9, "Action");

        let media = origins.get(&9).unwrap();
        assert_eq!(media.tags.len(), 1);
        assert_eq!(media.genres.len(), 1);
    }

    #[test]
    fn liked_sources_keep_latest_title() {
        let mut origins = Origins::new();
        origins.note_liked(3, 11, "Old Title");
        origins.note_liked(3, 11, "New Title");

        let media = origins.get(&3).unwrap();
        assert_eq!(media.liked.len(), 1);
        assert_eq!(media.liked.get(&11).map(String::as_str), Some("New Title"));
    }

    #[test]
    fn empty_checks() {
        let origins = Origins::new();
        assert!(origins.is_empty());
        assert!(origins.get(&1).is_none());

        let mut with_rating = Origins::new();
        with_rating.note_user_rating(1, 10.0);
        assert!(!with_rating.is_empty());
        assert!(!with_rating.get(&1).unwrap().is_empty());
        assert!(MediaOrigins::default().is_empty());
    }
}
