use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::count_upcoming;
use crate::db::{shows, venues, StoreError};
use crate::models::Venue;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaVenue {
    pub id: Uuid,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<AreaVenue>,
}

/// Venues grouped by `(city, state)`, areas ordered by state then city.
///
/// The venue scan and the show scan are separate reads, so a concurrent write
/// can land between them.
pub async fn venues_by_area(pool: &SqlitePool, now: DateTime<Utc>) -> Result<Vec<Area>, StoreError> {
    let all = venues::list_by_location(pool).await?;
    let upcoming = count_upcoming(shows::venue_start_times(pool).await?, now);

    Ok(group_by_area(all, &upcoming))
}

pub(crate) fn group_by_area(venues: Vec<Venue>, upcoming: &HashMap<Uuid, usize>) -> Vec<Area> {
    let mut areas: BTreeMap<(String, String), Vec<AreaVenue>> = BTreeMap::new();

    for venue in venues {
        areas
            .entry((venue.state, venue.city))
            .or_default()
            .push(AreaVenue {
                num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
                id: venue.id,
                name: venue.name,
            });
    }

    areas
        .into_iter()
        .map(|((state, city), venues)| Area {
            city,
            state,
            venues,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;
    use crate::models::{ArtistForm, ShowForm, VenueForm};
    use crate::db::artists;
    use chrono::Duration;

    fn venue(name: &str, city: &str, state: &str) -> Venue {
        VenueForm {
            name: Some(name.into()),
            city: Some(city.into()),
            state: Some(state.into()),
            address: Some("1 Main Street".into()),
            ..Default::default()
        }
        .into_venue(Uuid::new_v4(), Utc::now())
        .unwrap()
    }

    #[test]
    fn test_group_by_area_collects_distinct_locations() {
        let hop = venue("The Musical Hop", "San Francisco", "CA");
        let park = venue("Park Square Live Music & Coffee", "San Francisco", "CA");
        let pianos = venue("The Dueling Pianos Bar", "New York", "NY");
        let mut upcoming = HashMap::new();
        upcoming.insert(hop.id, 2);

        let areas = group_by_area(vec![pianos.clone(), hop.clone(), park.clone()], &upcoming);

        assert_eq!(areas.len(), 2);
        assert_eq!((areas[0].city.as_str(), areas[0].state.as_str()), ("San Francisco", "CA"));
        assert_eq!(areas[0].venues.len(), 2);
        assert_eq!(areas[0].venues[0].num_upcoming_shows, 2);
        assert_eq!(areas[0].venues[1].num_upcoming_shows, 0);
        assert_eq!(areas[1].venues[0].id, pianos.id);
    }

    #[tokio::test]
    async fn test_venues_by_area_counts_only_upcoming() {
        let pool = memory_pool().await;
        let hop = venues::create(
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

        let now = Utc::now();
        for offset in [Duration::days(-30), Duration::days(7), Duration::days(14)] {
            shows::create(
                &pool,
                ShowForm {
                    artist_id: Some(artist.id.to_string()),
                    venue_id: Some(hop.id.to_string()),
                    start_time: Some((now + offset).to_rfc3339()),
                },
            )
            .await
            .unwrap();
        }

        let areas = venues_by_area(&pool, now).await.unwrap();

        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].venues[0].id, hop.id);
        assert_eq!(areas[0].venues[0].num_upcoming_shows, 2);
    }
}
