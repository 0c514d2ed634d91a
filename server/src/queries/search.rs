use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::count_upcoming;
use crate::db::{artists, shows, venues, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Venue,
    Artist,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub search_term: String,
    pub data: Vec<SearchHit>,
}

/// Case-insensitive substring match. The empty term matches everything.
pub fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// Matches are ordered by name, then id. Surrounding whitespace in `term`
/// is ignored for matching; the term is echoed back as submitted.
pub async fn search_by_name(
    pool: &SqlitePool,
    kind: SearchKind,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults, StoreError> {
    let (candidates, start_times): (Vec<(Uuid, String)>, _) = match kind {
        SearchKind::Venue => (
            venues::list(pool)
                .await?
                .into_iter()
                .map(|venue| (venue.id, venue.name))
                .collect(),
            shows::venue_start_times(pool).await?,
        ),
        SearchKind::Artist => (
            artists::list(pool)
                .await?
                .into_iter()
                .map(|artist| (artist.id, artist.name))
                .collect(),
            shows::artist_start_times(pool).await?,
        ),
    };

    let needle = term.trim();
    let upcoming = count_upcoming(start_times, now);
    let data: Vec<SearchHit> = candidates
        .into_iter()
        .filter(|(_, name)| name_matches(name, needle))
        .map(|(id, name)| SearchHit {
            num_upcoming_shows: upcoming.get(&id).copied().unwrap_or(0),
            id,
            name,
        })
        .collect();

    Ok(SearchResults {
        count: data.len(),
        search_term: term.to_string(),
        data,
    })
}
