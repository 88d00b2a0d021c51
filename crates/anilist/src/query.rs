//! GraphQL query construction for the AniList API.
//!
//! One document covers the whole fetch: a user's `MediaListCollection` for a
//! given media type, one chunk at a time. Planned-but-unwatched entries are
//! excluded server-side (`status_not: PLANNING`). Each entry pulls the media
//! attributes the scoring pipeline needs, plus the peer-recommendation edges
//! with the same attribute selection on the recommended media (which carry no
//! nested recommendations of their own).

use serde_json::{Value, json};

use crate::types::MediaType;

/// Entries fetched per chunk. AniList caps list chunks at 500; 60 keeps
/// individual responses small enough to stay under the rate limiter.
pub const PER_CHUNK: u32 = 60;

/// The media list query document.
pub const USER_LIST_QUERY: &str = r#"query UserList($name: String, $type: MediaType, $chunk: Int, $perChunk: Int) {
  MediaListCollection(userName: $name, type: $type, status_not: PLANNING, chunk: $chunk, perChunk: $perChunk) {
    hasNextChunk
    lists {
      name
      isCustomList
      entries {
        score(format: POINT_100)
        status
        media {
          id
          title {
            english
            userPreferred
          }
          meanScore
          format
          popularity
          startDate {
            year
          }
          genres
          tags {
            id
            rank
            name
          }
          studios(isMain: true) {
            nodes {
              id
              name
            }
          }
          staff(page: 1, perPage: 20, sort: FAVOURITES_DESC) {
            nodes {
              id
              name {
                userPreferred
              }
            }
          }
          recommendations(sort: RATING_DESC) {
            nodes {
              rating
              mediaRecommendation {
                id
                title {
                  english
                  userPreferred
                }
                meanScore
                format
                popularity
                startDate {
                  year
                }
                genres
                tags {
                  id
                  rank
                  name
                }
                studios(isMain: true) {
                  nodes {
                    id
                    name
                  }
                }
                staff(page: 1, perPage: 20, sort: FAVOURITES_DESC) {
                  nodes {
                    id
                    name {
                      userPreferred
                    }
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}"#;

/// Variables object for one chunk of one user's list.
pub fn user_list_variables(user_name: &str, media_type: MediaType, chunk: u32) -> Value {
    json!({
        "name": user_name,
        "type": media_type,
        "chunk": chunk,
        "perChunk": PER_CHUNK,
    })
}

/// Full request body for the GraphQL POST.
pub fn user_list_request(user_name: &str, media_type: MediaType, chunk: u32) -> Value {
    json!({
        "query": USER_LIST_QUERY,
        "variables": user_list_variables(user_name, media_type, chunk),
    })
}
