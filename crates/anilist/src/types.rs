//! Core domain types for AniList media lists.
//!
//! These structs mirror the shape of the AniList GraphQL responses
//! (camelCase on the wire), so the same definitions serve the HTTP client,
//! the on-disk list cache, and the scoring pipeline. AniList omits or nulls
//! fields freely; everything optional collapses into `Option` or an empty
//! collection instead of failing the whole list.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a media entry (shared across anime and manga)
pub type MediaId = i64;

// =============================================================================
// List Entries
// =============================================================================

/// A single entry on a user's media list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    /// Raw user score on the 0-100 scale. Zero means unrated.
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub status: Option<EntryStatus>,
    pub media: Media,
}

/// Watch/read status of a list entry.
///
/// AniList adds statuses occasionally; anything unrecognized lands on
/// `Other` rather than failing deserialization of the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Current,
    Planning,
    Completed,
    Dropped,
    Paused,
    Repeating,
    #[serde(other)]
    Other,
}

// =============================================================================
// Media and its Attributes
// =============================================================================

/// A piece of media (anime or manga) with the attributes the scoring
/// pipeline consumes.
///
/// The same struct covers both list entries and the targets of peer
/// recommendations; the latter arrive without a `recommendations` field of
/// their own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: MediaId,
    #[serde(default)]
    pub title: Option<MediaTitle>,
    /// Site-wide average score (0-100); absent for obscure titles.
    #[serde(default)]
    pub mean_score: Option<f64>,
    /// Number of users with this media on their list.
    #[serde(default)]
    pub popularity: i64,
    /// Release format, e.g. "TV", "MOVIE", "MANGA".
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub start_date: Option<FuzzyDate>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub studios: Option<NodeList<Studio>>,
    #[serde(default)]
    pub staff: Option<NodeList<Staff>>,
    #[serde(default)]
    pub recommendations: Option<NodeList<PeerRec>>,
}

impl Media {
    /// Best available display title, preferring the English one.
    pub fn display_title(&self) -> &str {
        self.title
            .as_ref()
            .and_then(MediaTitle::best)
            .unwrap_or("(untitled)")
    }

    /// Release year, when AniList knows it.
    pub fn release_year(&self) -> Option<i32> {
        self.start_date.as_ref().and_then(|d| d.year)
    }

    /// Main studios credited on this media; empty when none were fetched.
    pub fn studio_nodes(&self) -> &[Studio] {
        self.studios
            .as_ref()
            .map(|n| n.nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Top staff credited on this media; empty when none were fetched.
    pub fn staff_nodes(&self) -> &[Staff] {
        self.staff
            .as_ref()
            .map(|n| n.nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Peer-recommendation edges attached to this media.
    pub fn recommendation_nodes(&self) -> &[PeerRec] {
        self.recommendations
            .as_ref()
            .map(|n| n.nodes.as_slice())
            .unwrap_or(&[])
    }
}

/// Title variants served by AniList.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTitle {
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub user_preferred: Option<String>,
}

impl MediaTitle {
    /// English title when present and non-empty, otherwise the
    /// user-preferred romaji.
    pub fn best(&self) -> Option<&str> {
        self.english
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.user_preferred.as_deref())
    }
}

/// AniList fuzzy date; only the year matters for decade bucketing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FuzzyDate {
    #[serde(default)]
    pub year: Option<i32>,
}

/// A weighted descriptive tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i64,
    pub name: String,
    /// Relevance of the tag to this media, 0-100. Doubles as the weight
    /// when averaging tag affinities.
    #[serde(default)]
    pub rank: i64,
}

/// A production studio (only main studios are fetched).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Studio {
    pub id: i64,
    pub name: String,
}

/// A staff member credited on a media.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Staff {
    pub id: i64,
    #[serde(default)]
    pub name: Option<StaffName>,
}

impl Staff {
    /// Display name, falling back when AniList has no preferred form.
    pub fn display_name(&self) -> &str {
        self.name
            .as_ref()
            .and_then(|n| n.user_preferred.as_deref())
            .unwrap_or("(unnamed)")
    }
}

/// Name variants for a staff member.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffName {
    #[serde(default)]
    pub user_preferred: Option<String>,
}

/// Wrapper for AniList's `{ nodes: [...] }` connection envelopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeList<T> {
    #[serde(default)]
    pub nodes: Vec<T>,
}

impl<T> Default for NodeList<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

/// A peer-recommendation edge attached to a media the user rated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerRec {
    /// Net community votes for this recommendation pairing. Can be negative.
    #[serde(default)]
    pub rating: i64,
    /// The suggested media. `None` when the target was deleted from the
    /// catalog after the recommendation was made.
    #[serde(default)]
    pub media_recommendation: Option<Media>,
}

// =============================================================================
// Media Type Selector
// =============================================================================

/// The two media categories fetched for every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Anime,
    Manga,
}

impl MediaType {
    /// Fetch order for a full user list.
    pub const ALL: [MediaType; 2] = [MediaType::Anime, MediaType::Manga];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Anime => "ANIME",
            MediaType::Manga => "MANGA",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// GraphQL Response Envelopes
// =============================================================================

/// The `MediaListCollection` payload returned by the list query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListCollection {
    #[serde(default)]
    pub has_next_chunk: bool,
    #[serde(default)]
    pub lists: Vec<ListGroup>,
}

impl MediaListCollection {
    /// Flattens the standard lists into one entry sequence.
    ///
    /// Custom lists duplicate entries already present on the standard lists
    /// and are skipped.
    pub fn into_entries(self) -> Vec<ListEntry> {
        self.lists
            .into_iter()
            .filter(|group| !group.is_custom_list)
            .flat_map(|group| group.entries)
            .collect()
    }
}

/// One named list inside a collection ("Completed", "Watching", custom lists).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_custom_list: bool,
    #[serde(default)]
    pub entries: Vec<ListEntry>,
}
