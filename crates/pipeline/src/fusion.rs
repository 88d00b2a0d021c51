//! Joint recommendations for groups and the watched-title filter.
//!
//! ## Algorithm
//! 1. The candidate pool is the union of every user's normalized list.
//! 2. Each user contributes their own raw rating when they scored the
//!    title, otherwise their normalized recommendation score, otherwise
//!    zero. The joint score is the mean contribution, so titles every
//!    user is lukewarm about beat titles only one user loves.
//! 3. A seen filter drops titles the group has already watched. For one
//!    user that includes anything currently airing on their list; for a
//!    group a title only drops when every user has seen it, since a shared
//!    first watch is still worth suggesting.

use std::collections::{HashMap, HashSet};

use anilist::{EntryStatus, ListEntry, Media, MediaId};

use crate::collector::{sort_scored, ScoredRec};

/// One user's finished pipeline output, ready for fusion.
#[derive(Debug, Clone)]
pub struct UserRun {
    pub user: String,
    pub recommendations: Vec<ScoredRec>,
    pub own_ratings: HashMap<MediaId, f64>,
}

/// Averages per-user contributions over the union of candidates.
///
/// Later runs override the media payload when users share a candidate.
pub fn fuse(runs: &[UserRun]) -> Vec<ScoredRec> {
    if runs.is_empty() {
        return Vec::new();
    }

    let mut pool: HashMap<MediaId, Media> = HashMap::new();
    let mut per_run: Vec<HashMap<MediaId, f64>> = Vec::with_capacity(runs.len());
    for run in runs {
        let mut scores = HashMap::with_capacity(run.recommendations.len());
        for rec in &run.recommendations {
            pool.insert(rec.id(), rec.media.clone());
            scores.insert(rec.id(), rec.score);
        }
        per_run.push(scores);
    }

    let user_count = runs.len() as f64;
    let mut fused: Vec<ScoredRec> = pool
        .into_iter()
        .map(|(id, media)| {
            let total: f64 = runs
                .iter()
                .zip(&per_run)
                .map(|(run, scores)| match run.own_ratings.get(&id) {
                    Some(&rating) if rating > 0.0 => rating,
                    _ => scores.get(&id).copied().unwrap_or(0.0),
                })
                .sum();
            ScoredRec {
                media,
                score: total / user_count,
            }
        })
        .collect();
    sort_scored(&mut fused);
    fused
}

/// Statuses that mean a single user has already watched a title.
const SEEN_SINGLE: &[EntryStatus] = &[
    EntryStatus::Completed,
    EntryStatus::Repeating,
    EntryStatus::Dropped,
    EntryStatus::Current,
];

/// Statuses that count as seen when filtering for a group.
const SEEN_JOINT: &[EntryStatus] = &[
    EntryStatus::Completed,
    EntryStatus::Repeating,
    EntryStatus::Dropped,
];

/// Removes candidates the audience has already watched.
#[derive(Debug, Clone, Copy)]
pub struct SeenFilter {
    statuses: &'static [EntryStatus],
    rewatch: bool,
}

impl SeenFilter {
    /// Filter for one user's own list; currently airing counts as seen.
    pub fn single_user() -> Self {
        SeenFilter {
            statuses: SEEN_SINGLE,
            rewatch: false,
        }
    }

    /// Filter for a group; a title drops only when every user has seen it.
    pub fn joint() -> Self {
        SeenFilter {
            statuses: SEEN_JOINT,
            rewatch: false,
        }
    }

    /// Keep watched titles so finished shows can come up again.
    pub fn with_rewatch(mut self, rewatch: bool) -> Self {
        self.rewatch = rewatch;
        self
    }

    /// Media ids this filter counts as seen in one user's list.
    pub fn seen_ids(&self, entries: &[ListEntry]) -> HashSet<MediaId> {
        entries
            .iter()
            .filter(|entry| {
                entry
                    .status
                    .is_some_and(|status| self.statuses.contains(&status))
            })
            .map(|entry| entry.media.id)
            .collect()
    }

    /// Drops candidates every seen-set contains.
    pub fn apply(&self, recs: Vec<ScoredRec>, seen: &[HashSet<MediaId>]) -> Vec<ScoredRec> {
        if self.rewatch || seen.is_empty() {
            return recs;
        }
        recs.into_iter()
            .filter(|rec| !seen.iter().all(|ids| ids.contains(&rec.id())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: MediaId, score: f64) -> ScoredRec {
        ScoredRec {
            media: Media {
                id,
                ..Media::default()
            },
            score,
        }
    }

    fn titled_rec(id: MediaId, title: &str, score: f64) -> ScoredRec {
        let mut rec = rec(id, score);
        rec.media.title = Some(anilist::MediaTitle {
            english: Some(title.to_string()),
            user_preferred: None,
        });
        rec
    }

    fn run(user: &str, recs: Vec<ScoredRec>, ratings: &[(MediaId, f64)]) -> UserRun {
        UserRun {
            user: user.to_string(),
            recommendations: recs,
            own_ratings: ratings.iter().copied().collect(),
        }
    }

    fn entry(id: MediaId, status: EntryStatus) -> ListEntry {
        ListEntry {
            score: 0.0,
            status: Some(status),
            media: Media {
                id,
                ..Media::default()
            },
        }
    }

    // =========================================================================
    // Fusion
    // =========================================================================

    #[test]
    fn joint_scores_average_contributions() {
        let runs = vec![
            run("ayla", vec![rec(9, 80.0)], &[]),
            run("brook", vec![], &[(9, 90.0)]),
        ];
        let fused = fuse(&runs);

        assert_eq!(fused.len(), 1);
        assert!((fused[0].score - 85.0).abs() < 1e-9);
    }

    #[test]
    fn absent_candidates_drag_the_average_down() {
        let runs = vec![run("ayla", vec![rec(9, 80.0)], &[]), run("brook", vec![], &[])];
        let fused = fuse(&runs);

        assert!((fused[0].score - 40.0).abs() < 1e-9);
    }

    #[test]
    fn own_ratings_beat_recommendation_scores() {
        // The same title both recommended to and rated by one user.
        let runs = vec![run("ayla", vec![rec(9, 40.0)], &[(9, 95.0)])];
        let fused = fuse(&runs);

        assert!((fused[0].score - 95.0).abs() < 1e-9);
    }

    #[test]
    fn unrated_listings_fall_back_to_the_rec_score() {
        let runs = vec![run("ayla", vec![rec(9, 40.0)], &[(9, 0.0)])];
        let fused = fuse(&runs);

        assert!((fused[0].score - 40.0).abs() < 1e-9);
    }

    #[test]
    fn later_runs_override_shared_payloads() {
        let runs = vec![
            run("ayla", vec![titled_rec(9, "First Fetch", 50.0)], &[]),
            run("brook", vec![titled_rec(9, "Second Fetch", 70.0)], &[]),
        ];
        let fused = fuse(&runs);

        assert_eq!(fused[0].media.display_title(), "Second Fetch");
        assert!((fused[0].score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn fused_lists_are_ranked() {
        let runs = vec![
            run("ayla", vec![rec(1, 30.0), rec(2, 90.0)], &[]),
            run("brook", vec![rec(3, 60.0)], &[]),
        ];
        let fused = fuse(&runs);

        let order: Vec<MediaId> = fused.iter().map(ScoredRec::id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn fusing_nothing_yields_nothing() {
        assert!(fuse(&[]).is_empty());
    }

    // =========================================================================
    // Seen filter
    // =========================================================================

    #[test]
    fn single_user_filter_counts_current_watches() {
        let filter = SeenFilter::single_user();
        let entries = vec![
            entry(1, EntryStatus::Current),
            entry(2, EntryStatus::Paused),
            entry(3, EntryStatus::Completed),
        ];
        let seen = filter.seen_ids(&entries);

        assert!(seen.contains(&1));
        assert!(!seen.contains(&2));
        assert!(seen.contains(&3));
    }

    #[test]
    fn joint_filter_lets_current_watches_through() {
        let filter = SeenFilter::joint();
        let entries = vec![entry(1, EntryStatus::Current), entry(2, EntryStatus::Dropped)];
        let seen = filter.seen_ids(&entries);

        assert!(!seen.contains(&1));
        assert!(seen.contains(&2));
    }

    #[test]
    fn titles_drop_only_when_every_user_has_seen_them() {
        let filter = SeenFilter::joint();
        let both = HashSet::from([7, 8]);
        let one = HashSet::from([7]);

        let kept = filter.apply(vec![rec(7, 90.0), rec(8, 80.0)], &[both, one]);

        let ids: Vec<MediaId> = kept.iter().map(ScoredRec::id).collect();
        assert_eq!(ids, vec![8]);
    }

    #[test]
    fn rewatch_keeps_watched_titles() {
        let filter = SeenFilter::single_user().with_rewatch(true);
        let seen = HashSet::from([7]);

        let kept = filter.apply(vec![rec(7, 90.0)], &[seen]);
        assert_eq!(kept.len(), 1);
    }
}
