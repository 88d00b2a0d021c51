//! The attribute dimensions recommendations are biased along.
//!
//! Every dimension carries its own aggregation threshold, weighting rule,
//! and display strings, so adding one means adding a variant here and
//! teaching [`crate::affinity::TasteProfileBuilder`] where its values come
//! from.

use std::fmt;

/// One attribute family of a media entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Tags,
    Studios,
    Staff,
    Genres,
    Decades,
}

impl Dimension {
    /// All dimensions, in report order.
    pub const ALL: [Dimension; 5] = [
        Dimension::Tags,
        Dimension::Studios,
        Dimension::Staff,
        Dimension::Genres,
        Dimension::Decades,
    ];

    /// Short name, used for taste-profile file names.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Tags => "tags",
            Dimension::Studios => "studios",
            Dimension::Staff => "staff",
            Dimension::Genres => "genres",
            Dimension::Decades => "decades",
        }
    }

    /// Lead-in phrase for this dimension's line in an origin block.
    pub fn origin_phrase(self) -> &'static str {
        match self {
            Dimension::Tags => "it shares tags you score highly:",
            Dimension::Studios => "it was made by studios you like:",
            Dimension::Staff => "it involves staff you like:",
            Dimension::Genres => "it has genres you enjoy:",
            Dimension::Decades => "it's from the",
        }
    }

    /// Minimum accumulated weight an attribute needs before its affinity
    /// score is trusted. Tag weight accumulates ranks (0-100 per
    /// occurrence), so the bar sits far above the once-per-media dimensions.
    pub fn min_weight(self) -> f64 {
        match self {
            Dimension::Tags => 200.0,
            Dimension::Studios => 2.0,
            Dimension::Staff => 2.0,
            Dimension::Genres => 2.0,
            Dimension::Decades => 0.0,
        }
    }

    /// Whether occurrences are weighted by tag rank instead of counting
    /// once each.
    pub fn weights_by_rank(self) -> bool {
        matches!(self, Dimension::Tags)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which dimensions participate in bias combination.
///
/// A disabled dimension contributes the user's mean score instead of a
/// measured affinity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionToggles {
    pub tags: bool,
    pub studios: bool,
    pub staff: bool,
    pub genres: bool,
    pub decades: bool,
}

impl DimensionToggles {
    /// Every dimension enabled.
    pub fn all() -> Self {
        DimensionToggles {
            tags: true,
            studios: true,
            staff: true,
            genres: true,
            decades: true,
        }
    }

    /// No dimension enabled.
    pub fn none() -> Self {
        DimensionToggles::default()
    }

    pub fn enabled(&self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::Tags => self.tags,
            Dimension::Studios => self.studios,
            Dimension::Staff => self.staff,
            Dimension::Genres => self.genres,
            Dimension::Decades => self.decades,
        }
    }
}
