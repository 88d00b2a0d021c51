//! Integration tests for the pipeline.
//!
//! These tests run the full scoring path over two synthetic user lists
//! and fuse the results, the way the CLI drives it.

use std::collections::HashSet;

use anilist::{EntryStatus, ListEntry, Media, MediaId, MediaTitle, NodeList, PeerRec};
use pipeline::{fuse, DimensionToggles, Recommender, ScoredRec, SeenFilter, UserRun};

fn media(id: MediaId, title: &str, popularity: i64) -> Media {
    Media {
        id,
        title: Some(MediaTitle {
            english: Some(title.to_string()),
            user_preferred: None,
        }),
        popularity,
        ..Media::default()
    }
}

fn edge(rating: i64, to: Media) -> PeerRec {
    PeerRec {
        rating,
        media_recommendation: Some(to),
    }
}

fn entry(
    mut media: Media,
    score: f64,
    status: Option<EntryStatus>,
    edges: Vec<PeerRec>,
) -> ListEntry {
    media.recommendations = Some(NodeList { nodes: edges });
    ListEntry {
        score,
        status,
        media,
    }
}

/// Candidates both lists push towards.
fn candidate_pool() -> (Media, Media, Media) {
    let mut garden = media(100, "Garden of Sparks", 2000);
    garden.genres = vec!["Action".into()];
    let tin_orbit = media(101, "Tin Orbit", 1500);
    let paper_comet = media(102, "Paper Comet", 3000);
    (garden, tin_orbit, paper_comet)
}

/// First user: three Action shows, every candidate backed by two edges.
fn first_list() -> Vec<ListEntry> {
    let (garden, tin_orbit, paper_comet) = candidate_pool();

    let mut spring = media(1, "Spring Circuit", 1000);
    spring.mean_score = Some(80.0);
    spring.genres = vec!["Action".into()];

    let mut harbor = media(2, "Glass Harbor", 1200);
    harbor.mean_score = Some(75.0);
    harbor.genres = vec!["Action".into()];

    let mut relay = media(3, "Night Relay", 900);
    relay.genres = vec!["Action".into()];

    vec![
        entry(
            spring,
            90.0,
            Some(EntryStatus::Completed),
            vec![edge(90, garden.clone()), edge(60, tin_orbit.clone())],
        ),
        entry(
            harbor,
            70.0,
            Some(EntryStatus::Current),
            vec![edge(70, garden), edge(40, paper_comet.clone())],
        ),
        entry(
            relay,
            0.0,
            Some(EntryStatus::Dropped),
            vec![edge(50, tin_orbit), edge(30, paper_comet)],
        ),
    ]
}

/// Second user: has already finished "Garden of Sparks" at 88.
fn second_list() -> Vec<ListEntry> {
    let (garden, tin_orbit, paper_comet) = candidate_pool();

    let quarry = media(5, "Quarry Lights", 800);
    let ferry = media(6, "Last Ferry", 1000);

    vec![
        entry(
            garden.clone(),
            88.0,
            Some(EntryStatus::Completed),
            vec![edge(40, tin_orbit.clone()), edge(80, paper_comet.clone())],
        ),
        entry(
            quarry,
            60.0,
            Some(EntryStatus::Completed),
            vec![
                edge(70, tin_orbit.clone()),
                edge(90, paper_comet.clone()),
                edge(30, garden),
            ],
        ),
        entry(
            ferry,
            0.0,
            None,
            vec![edge(20, tin_orbit), edge(50, paper_comet)],
        ),
    ]
}

#[test]
fn test_single_user_run_ranks_the_candidate_pool() {
    let entries = first_list();
    let recommender = Recommender::new(DimensionToggles::all());
    let result = recommender.recommend("ayla", &entries);

    assert_eq!(result.profile.mean_score, 80.0, "mean of the two rated shows");

    let ids: HashSet<MediaId> = result.recommendations.iter().map(ScoredRec::id).collect();
    assert_eq!(
        ids,
        HashSet::from([100, 101, 102]),
        "every multi-edge candidate should be ranked"
    );
    assert_eq!(
        result.recommendations[0].score, 100.0,
        "top candidate should normalize to exactly 100"
    );
    for rec in &result.recommendations {
        assert!(rec.score > 0.0 && rec.score <= 100.0);
    }
}

#[test]
fn test_seen_filter_leaves_unwatched_candidates_alone() {
    let entries = first_list();
    let recommender = Recommender::new(DimensionToggles::all());
    let result = recommender.recommend("ayla", &entries);

    let filter = SeenFilter::single_user();
    let seen = filter.seen_ids(&entries);
    assert_eq!(
        seen,
        HashSet::from([1, 2, 3]),
        "completed, current and dropped entries all count as seen"
    );

    let before = result.recommendations.len();
    let kept = filter.apply(result.recommendations, &[seen]);
    assert_eq!(kept.len(), before, "no candidate is on the user's own list");
}

#[test]
fn test_rated_candidates_carry_their_rating_into_origins() {
    let recommender = Recommender::new(DimensionToggles::all());
    let result = recommender.recommend("brook", &second_list());

    // "Garden of Sparks" is on the list, so it is excluded from the
    // ranking but its rating is kept for joint reports.
    assert!(result.recommendations.iter().all(|rec| rec.id() != 100));
    assert_eq!(result.origins.get(&100).unwrap().user_rating, Some(88.0));
}

#[test]
fn test_joint_list_averages_ratings_and_rec_scores() {
    let recommender = Recommender::new(DimensionToggles::all());
    let first = recommender.recommend("ayla", &first_list());
    let second = recommender.recommend("brook", &second_list());

    let first_garden = first
        .recommendations
        .iter()
        .find(|rec| rec.id() == 100)
        .map(|rec| rec.score)
        .unwrap();

    let runs = vec![
        UserRun {
            user: first.user.clone(),
            recommendations: first.recommendations.clone(),
            own_ratings: first.own_ratings.clone(),
        },
        UserRun {
            user: second.user.clone(),
            recommendations: second.recommendations.clone(),
            own_ratings: second.own_ratings.clone(),
        },
    ];
    let fused = fuse(&runs);

    let ids: HashSet<MediaId> = fused.iter().map(ScoredRec::id).collect();
    assert_eq!(
        ids,
        HashSet::from([100, 101, 102]),
        "joint pool is the union of both users' candidates"
    );

    let garden = fused.iter().find(|rec| rec.id() == 100).unwrap();
    let expected = (first_garden + 88.0) / 2.0;
    assert!(
        (garden.score - expected).abs() < 1e-9,
        "one user's rec score averages with the other's raw rating"
    );

    for pair in fused.windows(2) {
        assert!(pair[0].score >= pair[1].score, "joint list should be ranked");
    }
}

#[test]
fn test_joint_seen_filter_keeps_half_watched_titles() {
    let recommender = Recommender::new(DimensionToggles::all());
    let first_entries = first_list();
    let second_entries = second_list();
    let first = recommender.recommend("ayla", &first_entries);
    let second = recommender.recommend("brook", &second_entries);

    let runs = vec![
        UserRun {
            user: first.user.clone(),
            recommendations: first.recommendations,
            own_ratings: first.own_ratings,
        },
        UserRun {
            user: second.user.clone(),
            recommendations: second.recommendations,
            own_ratings: second.own_ratings,
        },
    ];
    let fused = fuse(&runs);

    let filter = SeenFilter::joint();
    let seen = [
        filter.seen_ids(&first_entries),
        filter.seen_ids(&second_entries),
    ];
    let kept = filter.apply(fused, &seen);

    // Only the second user has watched "Garden of Sparks".
    assert!(
        kept.iter().any(|rec| rec.id() == 100),
        "titles one user has not seen stay on the joint list"
    );
}
