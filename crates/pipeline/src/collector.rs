//! Candidate gathering from peer recommendation edges.
//!
//! ## Algorithm
//! 1. Every list entry carries community recommendation edges (a target
//!    media plus a peer vote rating). Edges rated below 1 or whose target
//!    was deleted are skipped.
//! 2. Each edge is normalized by the combined popularity of source and
//!    target, then scaled by the source's effective score and community
//!    mean. Popularity damping keeps juggernaut titles from drowning out
//!    everything else.
//! 3. Edge scores accumulate per target; targets backed by a single edge
//!    are dropped as noise.
//! 4. Targets already on the user's list are excluded by default, after
//!    their own rating has been noted for reporting.

use std::collections::HashMap;

use anilist::{ListEntry, Media, MediaId};

use crate::origins::Origins;

/// Minimum normalized edge score for a "because you liked" note.
pub const LIKED_ORIGIN_FLOOR: f64 = 0.005;

/// Community mean assumed for media AniList has no usable mean for.
pub const DEFAULT_MEAN_SCORE: f64 = 100.0;

/// Edge-score accumulator for one candidate.
#[derive(Debug)]
struct CandidateAcc {
    media: Media,
    sum: f64,
    count: u32,
}

/// A candidate with its pipeline score.
///
/// The score's meaning depends on the stage: summed edge scores out of the
/// collector, bias-adjusted after combination, 0 to 100 once normalized.
#[derive(Debug, Clone)]
pub struct ScoredRec {
    pub media: Media,
    pub score: f64,
}

impl ScoredRec {
    pub fn id(&self) -> MediaId {
        self.media.id
    }
}

/// Descending by score, ties broken by media id so runs are reproducible.
pub(crate) fn sort_scored(recs: &mut [ScoredRec]) {
    recs.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.media.id.cmp(&b.media.id))
    });
}

/// Accumulates recommendation edges across a user's list.
#[derive(Debug)]
pub struct RecommendationCollector {
    exclude_listed: bool,
    candidates: HashMap<MediaId, CandidateAcc>,
}

impl Default for RecommendationCollector {
    fn default() -> Self {
        RecommendationCollector {
            exclude_listed: true,
            candidates: HashMap::new(),
        }
    }
}

impl RecommendationCollector {
    pub fn new() -> Self {
        RecommendationCollector::default()
    }

    /// Keep candidates the user already has on their list.
    pub fn with_exclude_listed(mut self, exclude: bool) -> Self {
        self.exclude_listed = exclude;
        self
    }

    /// Folds one entry's recommendation edges into the candidate pool.
    ///
    /// # Arguments
    /// * `entry` - Source list entry whose edges are walked
    /// * `effective` - The entry's effective score
    /// * `own_ratings` - The user's list, media id to raw score
    /// * `origins` - Sink for rating and liked-media notes
    pub fn collect(
        &mut self,
        entry: &ListEntry,
        effective: f64,
        own_ratings: &HashMap<MediaId, f64>,
        origins: &mut Origins,
    ) {
        let source = &entry.media;
        for edge in source.recommendation_nodes() {
            if edge.rating < 1 {
                continue;
            }
            let Some(target) = &edge.media_recommendation else {
                continue;
            };

            if let Some(&rating) = own_ratings.get(&target.id) {
                // Noted before the exclusion so joint reports can still
                // say what this user rated it.
                if rating > 0.0 {
                    origins.note_user_rating(target.id, rating);
                }
                if self.exclude_listed {
                    continue;
                }
            }

            let combined_popularity = source.popularity + target.popularity;
            if combined_popularity <= 0 {
                continue;
            }
            let normalized = edge.rating as f64 / combined_popularity as f64 * effective;
            if normalized > LIKED_ORIGIN_FLOOR {
                origins.note_liked(target.id, source.id, source.display_title());
            }

            // Unrated media report a mean of 0; treat that like no mean.
            let community_mean = match source.mean_score {
                Some(mean) if mean > 0.0 => mean,
                _ => DEFAULT_MEAN_SCORE,
            };
            let scaled = normalized * community_mean * 2.0;

            let acc = self
                .candidates
                .entry(target.id)
                .or_insert_with(|| CandidateAcc {
                    media: target.clone(),
                    sum: 0.0,
                    count: 0,
                });
            acc.sum += scaled;
            acc.count += 1;
        }
    }

    /// Averages each candidate's edges and drops single-edge candidates.
    pub fn finish(self) -> Vec<ScoredRec> {
        let mut recs: Vec<ScoredRec> = self
            .candidates
            .into_values()
            .filter(|acc| acc.count > 1)
            .map(|acc| ScoredRec {
                score: acc.sum / f64::from(acc.count),
                media: acc.media,
            })
            .collect();
        sort_scored(&mut recs);
        recs
    }

    /// Candidates gathered so far, before the multi-edge cut.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anilist::{NodeList, PeerRec};

    fn target(id: MediaId, popularity: i64) -> Media {
        Media {
            id,
            popularity,
            ..Media::default()
        }
    }

    fn source_entry(source: Media, edges: Vec<PeerRec>) -> ListEntry {
        let mut media = source;
        media.recommendations = Some(NodeList { nodes: edges });
        ListEntry {
            score: 0.0,
            status: None,
            media,
        }
    }

    fn edge(rating: i64, to: Media) -> PeerRec {
        PeerRec {
            rating,
            media_recommendation: Some(to),
        }
    }

    fn collect_one(
        collector: &mut RecommendationCollector,
        entry: &ListEntry,
        effective: f64,
    ) -> Origins {
        let mut origins = Origins::new();
        collector.collect(entry, effective, &HashMap::new(), &mut origins);
        origins
    }

    // =========================================================================
    // Edge filtering
    // =========================================================================

    #[test]
    fn low_rated_edges_are_ignored() {
        let entry = source_entry(
            target(1, 1000),
            vec![edge(0, target(2, 1000)), edge(-3, target(3, 1000))],
        );
        let mut collector = RecommendationCollector::new();
        collect_one(&mut collector, &entry, 80.0);
        assert!(collector.is_empty());
    }

    #[test]
    fn deleted_targets_are_skipped() {
        let entry = source_entry(
            target(1, 1000),
            vec![PeerRec {
                rating: 50,
                media_recommendation: None,
            }],
        );
        let mut collector = RecommendationCollector::new();
        collect_one(&mut collector, &entry, 80.0);
        assert!(collector.is_empty());
    }

    #[test]
    fn zero_popularity_edges_are_skipped() {
        let entry = source_entry(target(1, 0), vec![edge(50, target(2, 0))]);
        let mut collector = RecommendationCollector::new();
        collect_one(&mut collector, &entry, 80.0);
        assert!(collector.is_empty());
    }

    // =========================================================================
    // Scoring
    // =========================================================================

    #[test]
    fn edge_scores_average_across_sources() {
        let mut first_source = target(1, 1000);
        first_source.mean_score = Some(80.0);
        let first = source_entry(first_source, vec![edge(100, target(9, 1000))]);
        // No community mean on the second source: falls back to 100.
        let second = source_entry(target(2, 3000), vec![edge(50, target(9, 1000))]);

        let mut collector = RecommendationCollector::new();
        collect_one(&mut collector, &first, 90.0);
        collect_one(&mut collector, &second, 60.0);
        let recs = collector.finish();

        // 100/2000*90 * 160 = 720; 50/4000*60 * 200 = 150; mean 435.
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id(), 9);
        assert!((recs[0].score - 435.0).abs() < 1e-9);
    }

    #[test]
    fn zero_community_mean_counts_as_missing() {
        let mut unrated = target(1, 1000);
        unrated.mean_score = Some(0.0);
        let entry = source_entry(unrated, vec![edge(100, target(9, 1000))]);
        let also = source_entry(target(2, 1000), vec![edge(100, target(9, 1000))]);

        let mut collector = RecommendationCollector::new();
        collect_one(&mut collector, &entry, 90.0);
        collect_one(&mut collector, &also, 90.0);
        let recs = collector.finish();

        // Both edges scale by the 100-point default: 100/2000*90*200 = 900.
        assert!((recs[0].score - 900.0).abs() < 1e-9);
    }

    #[test]
    fn single_edge_candidates_are_dropped() {
        let entry = source_entry(
            target(1, 1000),
            vec![edge(60, target(8, 1000)), edge(60, target(9, 1000))],
        );
        let also = source_entry(target(2, 1000), vec![edge(60, target(9, 1000))]);

        let mut collector = RecommendationCollector::new();
        collect_one(&mut collector, &entry, 80.0);
        collect_one(&mut collector, &also, 80.0);
        let recs = collector.finish();

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id(), 9);
    }

    #[test]
    fn finish_ranks_candidates_by_score() {
        let strong = source_entry(
            target(1, 1000),
            vec![edge(100, target(8, 1000)), edge(10, target(9, 1000))],
        );
        let weak = source_entry(
            target(2, 1000),
            vec![edge(100, target(8, 1000)), edge(10, target(9, 1000))],
        );

        let mut collector = RecommendationCollector::new();
        collect_one(&mut collector, &strong, 80.0);
        collect_one(&mut collector, &weak, 80.0);
        let recs = collector.finish();

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].id(), 8);
        assert_eq!(recs[1].id(), 9);
        assert!(recs[0].score > recs[1].score);
    }

    // =========================================================================
    // Origins
    // =========================================================================

    #[test]
    fn strong_edges_note_the_liked_source() {
        let mut source = target(1, 1000);
        source.title = Some(anilist::MediaTitle {
            english: Some("Liked Show".into()),
            user_preferred: None,
        });
        let entry = source_entry(source, vec![edge(100, target(9, 1000))]);

        let mut collector = RecommendationCollector::new();
        let origins = collect_one(&mut collector, &entry, 90.0);

        let noted = origins.get(&9).unwrap();
        assert_eq!(noted.liked.get(&1).map(String::as_str), Some("Liked Show"));
    }

    #[test]
    fn faint_edges_stay_anonymous() {
        // 1/200000*90 = 0.00045, under the floor.
        let entry = source_entry(target(1, 100_000), vec![edge(1, target(9, 100_000))]);

        let mut collector = RecommendationCollector::new();
        let origins = collect_one(&mut collector, &entry, 90.0);

        assert!(origins.get(&9).is_none());
        assert_eq!(collector.len(), 1);
    }

    // =========================================================================
    // Already-listed exclusion
    // =========================================================================

    #[test]
    fn listed_targets_are_excluded_by_default() {
        let entry = source_entry(target(1, 1000), vec![edge(100, target(9, 1000))]);
        let own_ratings = HashMap::from([(9, 85.0)]);

        let mut collector = RecommendationCollector::new();
        let mut origins = Origins::new();
        collector.collect(&entry, 90.0, &own_ratings, &mut origins);

        assert!(collector.is_empty());
        // The user's rating still reaches the report.
        assert_eq!(origins.get(&9).unwrap().user_rating, Some(85.0));
    }

    #[test]
    fn exclusion_can_be_disabled() {
        let entry = source_entry(target(1, 1000), vec![edge(100, target(9, 1000))]);
        let own_ratings = HashMap::from([(9, 85.0)]);

        let mut collector = RecommendationCollector::new().with_exclude_listed(false);
        let mut origins = Origins::new();
        collector.collect(&entry, 90.0, &own_ratings, &mut origins);

        assert_eq!(collector.len(), 1);
        assert_eq!(origins.get(&9).unwrap().user_rating, Some(85.0));
    }

    #[test]
    fn unrated_listed_targets_leave_no_rating_note() {
        let entry = source_entry(target(1, 1000), vec![edge(100, target(9, 1000))]);
        let own_ratings = HashMap::from([(9, 0.0)]);

        let mut collector = RecommendationCollector::new();
        let mut origins = Origins::new();
        collector.collect(&entry, 90.0, &own_ratings, &mut origins);

        assert!(collector.is_empty());
        assert!(origins.get(&9).is_none());
    }
}
