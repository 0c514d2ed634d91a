use chrono::Utc;
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::{EntityKind, StoreError};
use crate::models::{Venue, VenueForm};

const SELECT_VENUES: &str = "SELECT id, name, city, state, address, phone, image_link, genres, \
     facebook_link, website, seeking_talent, seeking_description, created_at, updated_at \
     FROM venues";

pub async fn list(pool: &SqlitePool) -> Result<Vec<Venue>, StoreError> {
    let sql = format!("{SELECT_VENUES} ORDER BY name COLLATE NOCASE, id");
    Ok(sqlx::query_as::<_, Venue>(&sql).fetch_all(pool).await?)
}

/// Venues ordered the way the areas view groups them.
pub async fn list_by_location(pool: &SqlitePool) -> Result<Vec<Venue>, StoreError> {
    let sql = format!("{SELECT_VENUES} ORDER BY state, city, name COLLATE NOCASE, id");
    Ok(sqlx::query_as::<_, Venue>(&sql).fetch_all(pool).await?)
}

pub async fn find(pool: &SqlitePool, id: Uuid) -> Result<Venue, StoreError> {
    let mut conn = pool.acquire().await?;
    find_in(&mut *conn, id)
        .await?
        .ok_or_else(|| StoreError::not_found(EntityKind::Venue, id))
}

pub(crate) async fn find_in(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<Venue>, sqlx::Error> {
    let sql = format!("{SELECT_VENUES} WHERE id = ?");
    sqlx::query_as::<_, Venue>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn count(pool: &SqlitePool) -> Result<i64, StoreError> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM venues")
        .fetch_one(pool)
        .await?)
}

pub async fn create(pool: &SqlitePool, form: VenueForm) -> Result<Venue, StoreError> {
    let venue = form.into_venue(Uuid::new_v4(), Utc::now())?;

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO venues (id, name, city, state, address, phone, image_link, genres, \
         facebook_link, website, seeking_talent, seeking_description, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(venue.id)
    .bind(&venue.name)
    .bind(&venue.city)
    .bind(&venue.state)
    .bind(&venue.address)
    .bind(&venue.phone)
    .bind(&venue.image_link)
    .bind(Json(&venue.genres))
    .bind(&venue.facebook_link)
    .bind(&venue.website)
    .bind(venue.seeking_talent)
    .bind(&venue.seeking_description)
    .bind(venue.created_at)
    .bind(venue.updated_at)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    debug!(venue_id = %venue.id, "Inserted venue");
    Ok(venue)
}

/// Read-modify-write of the submitted fields inside one transaction.
pub async fn update(pool: &SqlitePool, id: Uuid, form: VenueForm) -> Result<Venue, StoreError> {
    let mut tx = pool.begin().await?;

    let mut venue = find_in(&mut *tx, id)
        .await?
        .ok_or_else(|| StoreError::not_found(EntityKind::Venue, id))?;
    form.apply_to(&mut venue, Utc::now())?;

    sqlx::query(
        "UPDATE venues SET name = ?, city = ?, state = ?, address = ?, phone = ?, \
         image_link = ?, genres = ?, facebook_link = ?, website = ?, seeking_talent = ?, \
         seeking_description = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&venue.name)
    .bind(&venue.city)
    .bind(&venue.state)
    .bind(&venue.address)
    .bind(&venue.phone)
    .bind(&venue.image_link)
    .bind(Json(&venue.genres))
    .bind(&venue.facebook_link)
    .bind(&venue.website)
    .bind(venue.seeking_talent)
    .bind(&venue.seeking_description)
    .bind(venue.updated_at)
    .bind(venue.id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(venue)
}

/// Deletes a venue that has no shows. Venues with bookings are kept and the
/// call fails with [`StoreError::Conflict`].
pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<Venue, StoreError> {
    let mut tx = pool.begin().await?;

    let venue = find_in(&mut *tx, id)
        .await?
        .ok_or_else(|| StoreError::not_found(EntityKind::Venue, id))?;

    let shows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows WHERE venue_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if shows > 0 {
        return Err(StoreError::Conflict(format!(
            "Venue '{}' still has {shows} show(s) booked.",
            venue.name
        )));
    }

    sqlx::query("DELETE FROM venues WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(venue)
}
