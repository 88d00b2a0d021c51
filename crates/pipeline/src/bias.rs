//! Taste biasing: reweights candidate scores by attribute affinity.
//!
//! ## Algorithm
//! 1. Each candidate is checked against the user's finalized affinities,
//!    one factor per dimension. A factor is the weighted mean of the
//!    user's scores over the candidate's matching attributes (candidate
//!    tag rank as weight for tags, weight 1 elsewhere).
//! 2. Dimensions that are disabled, or that the candidate shares nothing
//!    with, contribute the user's mean score instead, leaving the
//!    candidate's relative position untouched.
//! 3. The candidate's score is multiplied by all five factors. Scales blow
//!    up here; the normalization pass flattens them afterwards.
//! 4. Matches scoring above the user-calibrated origin threshold are noted
//!    for the report.

use anilist::Media;

use crate::affinity::{decade_of, TasteProfile};
use crate::collector::{sort_scored, ScoredRec};
use crate::dimension::{Dimension, DimensionToggles};
use crate::origins::Origins;

/// Affinity score above which a match is worth telling the user about.
///
/// Quadratic in the user's mean so that generous raters (whose affinities
/// all sit high) do not get every attribute echoed back at them.
pub fn origin_threshold(mean: f64) -> f64 {
    -0.2 + 0.853 * mean + 1.49e-3 * mean * mean
}

/// Applies per-dimension affinity factors to collected candidates.
#[derive(Debug)]
pub struct BiasCombiner<'a> {
    profile: &'a TasteProfile,
    toggles: DimensionToggles,
    threshold: f64,
}

impl<'a> BiasCombiner<'a> {
    pub fn new(profile: &'a TasteProfile, toggles: DimensionToggles) -> Self {
        BiasCombiner {
            profile,
            toggles,
            threshold: origin_threshold(profile.mean_score),
        }
    }

    /// Reweights every candidate and re-ranks the list.
    pub fn combine(&self, mut recs: Vec<ScoredRec>, origins: &mut Origins) -> Vec<ScoredRec> {
        for rec in &mut recs {
            let media = &rec.media;
            rec.score *= self.tag_factor(media, origins)
                * self.studio_factor(media, origins)
                * self.staff_factor(media, origins)
                * self.genre_factor(media, origins)
                * self.decade_factor(media, origins);
        }
        sort_scored(&mut recs);
        recs
    }

    fn tag_factor(&self, media: &Media, origins: &mut Origins) -> f64 {
        if !self.toggles.enabled(Dimension::Tags) {
            return self.profile.mean_score;
        }
        let mut sum = 0.0;
        let mut weight = 0.0;
        for tag in &media.tags {
            let Some(score) = self.profile.tags.score(&tag.id) else {
                continue;
            };
            if score > self.threshold {
                origins.note_tag(media.id, tag);
            }
            sum += score * tag.rank as f64;
            weight += tag.rank as f64;
        }
        if weight > 0.0 {
            sum / weight
        } else {
            self.profile.mean_score
        }
    }

    fn studio_factor(&self, media: &Media, origins: &mut Origins) -> f64 {
        if !self.toggles.enabled(Dimension::Studios) {
            return self.profile.mean_score;
        }
        let mut sum = 0.0;
        let mut count = 0u32;
        for studio in media.studio_nodes() {
            let Some(score) = self.profile.studios.score(&studio.id) else {
                continue;
            };
            if score > self.threshold {
                origins.note_studio(media.id, studio);
            }
            sum += score;
            count += 1;
        }
        if count > 0 {
            sum / f64::from(count)
        } else {
            self.profile.mean_score
        }
    }

    fn staff_factor(&self, media: &Media, origins: &mut Origins) -> f64 {
        if !self.toggles.enabled(Dimension::Staff) {
            return self.profile.mean_score;
        }
        let mut sum = 0.0;
        let mut count = 0u32;
        for person in media.staff_nodes() {
            let Some(score) = self.profile.staff.score(&person.id) else {
                continue;
            };
            if score > self.threshold {
                origins.note_staff(media.id, person);
            }
            sum += score;
            count += 1;
        }
        if count > 0 {
            sum / f64::from(count)
        } else {
            self.profile.mean_score
        }
    }

    fn genre_factor(&self, media: &Media, origins: &mut Origins) -> f64 {
        if !self.toggles.enabled(Dimension::Genres) {
            return self.profile.mean_score;
        }
        let mut sum = 0.0;
        let mut count = 0u32;
        for genre in &media.genres {
            let Some(score) = self.profile.genres.score(genre) else {
                continue;
            };
            if score > self.threshold {
                origins.note_genre(media.id, genre);
            }
            sum += score;
            count += 1;
        }
        if count > 0 {
            sum / f64::from(count)
        } else {
            self.profile.mean_score
        }
    }

    fn decade_factor(&self, media: &Media, origins: &mut Origins) -> f64 {
        if !self.toggles.enabled(Dimension::Decades) {
            return self.profile.mean_score;
        }
        let Some(year) = media.release_year() else {
            return self.profile.mean_score;
        };
        let decade = decade_of(year);
        match self.profile.decades.score(&decade) {
            Some(score) => {
                if score > self.threshold {
                    origins.note_decade(media.id, decade);
                }
                score
            }
            None => self.profile.mean_score,
        }
    }
}
