//! Coordinates the whole per-user pipeline:
//! 1. Compute the user's mean score
//! 2. Fold every list entry into taste profile and candidate pool
//! 3. Finalize per-dimension affinities
//! 4. Bias candidate scores by the profile
//! 5. Normalize onto the 0 to 100 display range

use std::collections::HashMap;
use std::time::Instant;

use anilist::{ListEntry, MediaId};
use tracing::{info, instrument};

use crate::affinity::{effective_score, mean_score, TasteProfile, TasteProfileBuilder};
use crate::bias::BiasCombiner;
use crate::collector::{RecommendationCollector, ScoredRec};
use crate::dimension::DimensionToggles;
use crate::normalize::normalize;
use crate::origins::Origins;

/// Everything one pipeline run produces for a user.
#[derive(Debug, Clone)]
pub struct UserRecommendations {
    pub user: String,
    pub profile: TasteProfile,
    pub recommendations: Vec<ScoredRec>,
    pub origins: Origins,
    /// The user's raw list scores, keyed by media id. Fusion and seen
    /// filtering need these after the run.
    pub own_ratings: HashMap<MediaId, f64>,
}

/// Runs the scoring pipeline over one user's list.
#[derive(Debug, Clone, Copy)]
pub struct Recommender {
    toggles: DimensionToggles,
    exclude_listed: bool,
}

impl Default for Recommender {
    fn default() -> Self {
        Recommender {
            toggles: DimensionToggles::none(),
            exclude_listed: true,
        }
    }
}

impl Recommender {
    pub fn new(toggles: DimensionToggles) -> Self {
        Recommender {
            toggles,
            exclude_listed: true,
        }
    }

    /// Keep candidates the user already has on their list.
    pub fn with_exclude_listed(mut self, exclude: bool) -> Self {
        self.exclude_listed = exclude;
        self
    }

    /// Scores every reachable candidate for one user.
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    pub fn recommend(&self, user: &str, entries: &[ListEntry]) -> UserRecommendations {
        let start_time = Instant::now();

        let mean = mean_score(entries);
        info!("Mean score for {}: {:.2} across {} entries", user, mean, entries.len());

        let own_ratings: HashMap<MediaId, f64> = entries
            .iter()
            .map(|entry| (entry.media.id, entry.score))
            .collect();

        // One pass feeds both the taste profile and the candidate pool.
        let mut builder = TasteProfileBuilder::new();
        let mut collector =
            RecommendationCollector::new().with_exclude_listed(self.exclude_listed);
        let mut origins = Origins::new();
        for entry in entries {
            let effective = effective_score(entry, mean);
            builder.add(&entry.media, effective);
            collector.collect(entry, effective, &own_ratings, &mut origins);
        }

        let profile = builder.finish(mean);
        info!(
            "Built taste profile for {}: {} tags, {} studios, {} staff, {} genres, {} decades",
            user,
            profile.tags.len(),
            profile.studios.len(),
            profile.staff.len(),
            profile.genres.len(),
            profile.decades.len()
        );

        let candidates = collector.finish();
        info!("Gathered {} candidates for {}", candidates.len(), user);

        let combiner = BiasCombiner::new(&profile, self.toggles);
        let mut recommendations = combiner.combine(candidates, &mut origins);
        normalize(&mut recommendations);
        info!(
            "Ranked {} recommendations for {} in {:.2?}",
            recommendations.len(),
            user,
            start_time.elapsed()
        );

        UserRecommendations {
            user: user.to_string(),
            profile,
            recommendations,
            origins,
            own_ratings,
        }
    }
}
