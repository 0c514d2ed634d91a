use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use super::{artists, venues, StoreError};
use crate::models::{ArtistShow, Show, ShowForm, ShowListing, VenueShow};

pub async fn create(pool: &SqlitePool, form: ShowForm) -> Result<Show, StoreError> {
    let new_show = form.validate()?;

    let mut tx = pool.begin().await?;

    if venues::find_in(&mut *tx, new_show.venue_id).await?.is_none() {
        return Err(StoreError::Validation(format!(
            "venue_id '{}' does not match any venue",
            new_show.venue_id
        )));
    }
    if artists::find_in(&mut *tx, new_show.artist_id).await?.is_none() {
        return Err(StoreError::Validation(format!(
            "artist_id '{}' does not match any artist",
            new_show.artist_id
        )));
    }

    let show = new_show.into_show(Uuid::new_v4(), Utc::now());
    sqlx::query(
        "INSERT INTO shows (id, venue_id, artist_id, start_time, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(show.id)
    .bind(show.venue_id)
    .bind(show.artist_id)
    .bind(show.start_time)
    .bind(show.created_at)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    debug!(show_id = %show.id, venue_id = %show.venue_id, artist_id = %show.artist_id, "Inserted show");
    Ok(show)
}

pub async fn count(pool: &SqlitePool) -> Result<i64, StoreError> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM shows")
        .fetch_one(pool)
        .await?)
}

/// Shows booked at a venue, with the artist playing each.
pub async fn for_venue(pool: &SqlitePool, venue_id: Uuid) -> Result<Vec<ArtistShow>, StoreError> {
    Ok(sqlx::query_as::<_, ArtistShow>(
        "SELECT a.id AS artist_id, a.name AS artist_name, a.image_link AS artist_image_link, \
         s.start_time \
         FROM shows s JOIN artists a ON a.id = s.artist_id \
         WHERE s.venue_id = ? \
         ORDER BY s.start_time, s.id",
    )
    .bind(venue_id)
    .fetch_all(pool)
    .await?)
}

/// Shows an artist is booked for, with the hosting venue.
pub async fn for_artist(pool: &SqlitePool, artist_id: Uuid) -> Result<Vec<VenueShow>, StoreError> {
    Ok(sqlx::query_as::<_, VenueShow>(
        "SELECT v.id AS venue_id, v.name AS venue_name, v.image_link AS venue_image_link, \
         s.start_time \
         FROM shows s JOIN venues v ON v.id = s.venue_id \
         WHERE s.artist_id = ? \
         ORDER BY s.start_time, s.id",
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?)
}

pub async fn list_with_details(pool: &SqlitePool) -> Result<Vec<ShowListing>, StoreError> {
    Ok(sqlx::query_as::<_, ShowListing>(
        "SELECT s.id, v.id AS venue_id, v.name AS venue_name, a.id AS artist_id, \
         a.name AS artist_name, a.image_link AS artist_image_link, s.start_time \
         FROM shows s \
         JOIN venues v ON v.id = s.venue_id \
         JOIN artists a ON a.id = s.artist_id \
         ORDER BY s.start_time, s.id",
    )
    .fetch_all(pool)
    .await?)
}

/// `(venue_id, start_time)` for every show.
pub async fn venue_start_times(pool: &SqlitePool) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
    Ok(sqlx::query_as("SELECT venue_id, start_time FROM shows")
        .fetch_all(pool)
        .await?)
}

/// `(artist_id, start_time)` for every show.
pub async fn artist_start_times(
    pool: &SqlitePool,
) -> Result<Vec<(Uuid, DateTime<Utc>)>, StoreError> {
    Ok(sqlx::query_as("SELECT artist_id, start_time FROM shows")
        .fetch_all(pool)
        .await?)
}
