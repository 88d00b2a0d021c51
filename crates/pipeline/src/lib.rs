//! Scoring pipeline that turns AniList user lists into ranked
//! recommendations.
//!
//! This crate provides:
//! - TasteProfileBuilder for per-dimension affinity aggregation
//! - RecommendationCollector for gathering peer recommendation edges
//! - BiasCombiner for reweighting candidates by the user's taste
//! - Fusion and seen filtering for joint lists across several users
//!
//! ## Architecture
//! The pipeline processes one user's list in stages:
//! 1. Mean score and effective scores are derived from the raw list
//! 2. One pass accumulates attribute affinities and candidate edges
//! 3. Finalized affinities bias each candidate's score
//! 4. Scores are normalized onto a 0 to 100 display range
//!
//! Several users' runs can then be fused into one joint list.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{DimensionToggles, Recommender, SeenFilter};
//!
//! // Score one user's list
//! let recommender = Recommender::new(DimensionToggles::all());
//! let result = recommender.recommend("ayla", &entries);
//!
//! // Hide what they have already watched
//! let filter = SeenFilter::single_user();
//! let seen = filter.seen_ids(&entries);
//! let fresh = filter.apply(result.recommendations, &[seen]);
//! ```

pub mod affinity;
pub mod bias;
pub mod collector;
pub mod dimension;
pub mod fusion;
pub mod normalize;
pub mod origins;
pub mod recommender;

// Re-export main types
pub use affinity::{
    decade_of, effective_score, mean_score, AffinityScore, AffinityTable, FinalizedAffinity,
    TasteProfile, TasteProfileBuilder,
};
pub use bias::{origin_threshold, BiasCombiner};
pub use collector::{RecommendationCollector, ScoredRec};
pub use dimension::{Dimension, DimensionToggles};
pub use fusion::{fuse, SeenFilter, UserRun};
pub use normalize::normalize;
pub use origins::{MediaOrigins, Origins};
pub use recommender::{Recommender, UserRecommendations};
