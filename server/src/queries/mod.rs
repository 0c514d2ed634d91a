//! Read side: listings, name search, and the past/upcoming split of shows.
//!
//! A show is upcoming when it starts strictly after `now` and past when it
//! started strictly before. A show starting exactly at `now` is neither.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{artists, shows, venues, StoreError};
use crate::models::{Artist, ArtistShow, ShowListing, Venue, VenueShow};

pub mod areas;
pub mod search;

pub use areas::{venues_by_area, Area, AreaVenue};
pub use search::{name_matches, search_by_name, SearchHit, SearchKind, SearchResults};

pub trait Scheduled {
    fn start_time(&self) -> DateTime<Utc>;
}

impl Scheduled for ArtistShow {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Scheduled for VenueShow {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowPartition<T> {
    pub past_shows: Vec<T>,
    pub upcoming_shows: Vec<T>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// Splits shows around `now`, each side ordered by start time. Input order
/// breaks ties.
pub fn partition_shows<T, I>(shows: I, now: DateTime<Utc>) -> ShowPartition<T>
where
    T: Scheduled,
    I: IntoIterator<Item = T>,
{
    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();

    for show in shows {
        let start = show.start_time();
        if start > now {
            upcoming_shows.push(show);
        } else if start < now {
            past_shows.push(show);
        }
    }

    past_shows.sort_by_key(|show| show.start_time());
    upcoming_shows.sort_by_key(|show| show.start_time());

    ShowPartition {
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    }
}

/// Upcoming show count per owner id.
pub fn count_upcoming(
    start_times: impl IntoIterator<Item = (Uuid, DateTime<Utc>)>,
    now: DateTime<Utc>,
) -> HashMap<Uuid, usize> {
    let mut counts = HashMap::new();
    for (owner, start) in start_times {
        if start > now {
            *counts.entry(owner).or_insert(0) += 1;
        }
    }
    counts
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    #[serde(flatten)]
    pub shows: ShowPartition<ArtistShow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    #[serde(flatten)]
    pub shows: ShowPartition<VenueShow>,
}

pub async fn shows_for_venue(
    pool: &SqlitePool,
    venue_id: Uuid,
    now: DateTime<Utc>,
) -> Result<VenueDetail, StoreError> {
    let venue = venues::find(pool, venue_id).await?;
    let booked = shows::for_venue(pool, venue_id).await?;

    Ok(VenueDetail {
        venue,
        shows: partition_shows(booked, now),
    })
}

pub async fn shows_for_artist(
    pool: &SqlitePool,
    artist_id: Uuid,
    now: DateTime<Utc>,
) -> Result<ArtistDetail, StoreError> {
    let artist = artists::find(pool, artist_id).await?;
    let booked = shows::for_artist(pool, artist_id).await?;

    Ok(ArtistDetail {
        artist,
        shows: partition_shows(booked, now),
    })
}

pub async fn list_all_venues(pool: &SqlitePool) -> Result<Vec<Venue>, StoreError> {
    venues::list(pool).await
}

pub async fn list_all_artists(pool: &SqlitePool) -> Result<Vec<Artist>, StoreError> {
    artists::list(pool).await
}

pub async fn list_all_shows(pool: &SqlitePool) -> Result<Vec<ShowListing>, StoreError> {
    shows::list_with_details(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;
    use crate::models::{ArtistForm, ShowForm, VenueForm};
    use chrono::{Duration, TimeZone};

    fn at(start_time: DateTime<Utc>) -> ArtistShow {
        ArtistShow {
            artist_id: Uuid::new_v4(),
            artist_name: "Guns N Petals".into(),
            artist_image_link: None,
            start_time,
        }
    }

    #[test]
    fn test_partition_is_strict_on_both_sides() {
        let now = Utc.with_ymd_and_hms(2030, 6, 15, 12, 0, 0).unwrap();
        let shows = vec![
            at(now + Duration::seconds(1)),
            at(now),
            at(now - Duration::seconds(1)),
        ];

        let split = partition_shows(shows, now);

        assert_eq!(split.upcoming_shows_count, 1);
        assert_eq!(split.past_shows_count, 1);
        assert_eq!(split.upcoming_shows[0].start_time, now + Duration::seconds(1));
        assert_eq!(split.past_shows[0].start_time, now - Duration::seconds(1));
    }

    #[test]
    fn test_show_starting_now_is_neither_past_nor_upcoming() {
        let now = Utc::now();

        let split = partition_shows(vec![at(now)], now);

        assert!(split.upcoming_shows.is_empty());
        assert!(split.past_shows.is_empty());
    }

    #[test]
    fn test_partition_orders_each_side_by_start() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let shows = vec![
            at(now + Duration::days(3)),
            at(now - Duration::days(1)),
            at(now + Duration::days(1)),
            at(now - Duration::days(5)),
        ];

        let split = partition_shows(shows, now);

        let upcoming: Vec<_> = split.upcoming_shows.iter().map(|s| s.start_time).collect();
        assert_eq!(upcoming, vec![now + Duration::days(1), now + Duration::days(3)]);
        let past: Vec<_> = split.past_shows.iter().map(|s| s.start_time).collect();
        assert_eq!(past, vec![now - Duration::days(5), now - Duration::days(1)]);
    }

    #[test]
    fn test_count_upcoming_ignores_past_and_present() {
        let now = Utc::now();
        let venue = Uuid::new_v4();
        let other = Uuid::new_v4();

        let counts = count_upcoming(
            vec![
                (venue, now + Duration::hours(1)),
                (venue, now + Duration::hours(2)),
                (venue, now),
                (other, now - Duration::hours(1)),
            ],
            now,
        );

        assert_eq!(counts.get(&venue), Some(&2));
        assert_eq!(counts.get(&other), None);
    }

    #[tokio::test]
    async fn test_past_show_lands_in_past_for_venue_and_artist() {
        let pool = memory_pool().await;
        let venue = venues::create(
            &pool,
            VenueForm {
                name: Some("The Musical Hop".into()),
                city: Some("San Francisco".into()),
                state: Some("CA".into()),
                address: Some("1015 Folsom Street".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let artist = artists::create(
            &pool,
            ArtistForm {
                name: Some("Guns N Petals".into()),
                city: Some("San Francisco".into()),
                state: Some("CA".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        shows::create(
            &pool,
            ShowForm {
                artist_id: Some(artist.id.to_string()),
                venue_id: Some(venue.id.to_string()),
                start_time: Some("2019-05-21T21:30:00Z".into()),
            },
        )
        .await
        .unwrap();

        let now = Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap();

        let detail = shows_for_venue(&pool, venue.id, now).await.unwrap();
        assert_eq!(detail.shows.past_shows_count, 1);
        assert_eq!(detail.shows.upcoming_shows_count, 0);
        assert_eq!(detail.shows.past_shows[0].artist_id, artist.id);

        let detail = shows_for_artist(&pool, artist.id, now).await.unwrap();
        assert_eq!(detail.shows.past_shows_count, 1);
        assert_eq!(detail.shows.past_shows[0].venue_name, "The Musical Hop");

        let before = Utc.with_ymd_and_hms(2019, 5, 1, 0, 0, 0).unwrap();
        let detail = shows_for_venue(&pool, venue.id, before).await.unwrap();
        assert_eq!(detail.shows.upcoming_shows_count, 1);
        assert_eq!(detail.shows.past_shows_count, 0);
    }

    #[tokio::test]
    async fn test_detail_for_missing_venue_is_not_found() {
        let pool = memory_pool().await;

        let err = shows_for_venue(&pool, Uuid::new_v4(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
