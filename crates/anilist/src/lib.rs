//! # AniList Crate
//!
//! This crate handles everything between the recommendation pipeline and the
//! AniList GraphQL API.
//!
//! ## Main Components
//!
//! - **types**: Domain types mirroring the AniList wire shapes
//! - **query**: GraphQL document and variable construction
//! - **client**: Async HTTP client with pagination and rate-limit retries
//! - **cache**: Date-stamped on-disk cache of fetched lists
//! - **error**: Error types for fetching and caching
//!
//! ## Example Usage
//!
//! ```ignore
//! use anilist::{AnilistClient, ListCache};
//!
//! let client = AnilistClient::new();
//! let cache = ListCache::new(".");
//!
//! // Serve from disk while fresh, otherwise fetch and cache
//! let entries = match cache.load("somebody")? {
//!     Some(entries) => entries,
//!     None => {
//!         let entries = client.fetch_user_list("somebody").await?;
//!         cache.store("somebody", &entries)?;
//!         entries
//!     }
//! };
//!
//! println!("somebody has {} rated entries", entries.len());
//! ```

// Public modules
pub mod cache;
pub mod client;
pub mod error;
pub mod query;
pub mod types;

// Re-export commonly used types for convenience
pub use cache::ListCache;
pub use client::{AnilistClient, API_URL};
pub use error::{AnilistError, Result};
pub use types::{
    // Type aliases
    MediaId,
    // Core types
    FuzzyDate,
    ListEntry,
    Media,
    MediaListCollection,
    MediaTitle,
    NodeList,
    PeerRec,
    Staff,
    Studio,
    Tag,
    // Enums
    EntryStatus,
    MediaType,
};
