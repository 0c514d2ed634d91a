use chrono::Utc;
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::{EntityKind, StoreError};
use crate::models::{Artist, ArtistForm};

const SELECT_ARTISTS: &str = "SELECT id, name, city, state, phone, genres, image_link, \
     facebook_link, website_link, seeking_venue, seeking_description, created_at, updated_at \
     FROM artists";

pub async fn list(pool: &SqlitePool) -> Result<Vec<Artist>, StoreError> {
    let sql = format!("{SELECT_ARTISTS} ORDER BY name COLLATE NOCASE, id");
    Ok(sqlx::query_as::<_, Artist>(&sql).fetch_all(pool).await?)
}

pub async fn find(pool: &SqlitePool, id: Uuid) -> Result<Artist, StoreError> {
    let mut conn = pool.acquire().await?;
    find_in(&mut *conn, id)
        .await?
        .ok_or_else(|| StoreError::not_found(EntityKind::Artist, id))
}

pub(crate) async fn find_in(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<Artist>, sqlx::Error> {
    let sql = format!("{SELECT_ARTISTS} WHERE id = ?");
    sqlx::query_as::<_, Artist>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn count(pool: &SqlitePool) -> Result<i64, StoreError> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM artists")
        .fetch_one(pool)
        .await?)
}

pub async fn create(pool: &SqlitePool, form: ArtistForm) -> Result<Artist, StoreError> {
    let artist = form.into_artist(Uuid::new_v4(), Utc::now())?;

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO artists (id, name, city, state, phone, genres, image_link, facebook_link, \
         website_link, seeking_venue, seeking_description, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(artist.id)
    .bind(&artist.name)
    .bind(&artist.city)
    .bind(&artist.state)
    .bind(&artist.phone)
    .bind(Json(&artist.genres))
    .bind(&artist.image_link)
    .bind(&artist.facebook_link)
    .bind(&artist.website_link)
    .bind(artist.seeking_venue)
    .bind(&artist.seeking_description)
    .bind(artist.created_at)
    .bind(artist.updated_at)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    debug!(artist_id = %artist.id, "Inserted artist");
    Ok(artist)
}

pub async fn update(pool: &SqlitePool, id: Uuid, form: ArtistForm) -> Result<Artist, StoreError> {
    let mut tx = pool.begin().await?;

    let mut artist = find_in(&mut *tx, id)
        .await?
        .ok_or_else(|| StoreError::not_found(EntityKind::Artist, id))?;
    form.apply_to(&mut artist, Utc::now())?;

    sqlx::query(
        "UPDATE artists SET name = ?, city = ?, state = ?, phone = ?, genres = ?, \
         image_link = ?, facebook_link = ?, website_link = ?, seeking_venue = ?, \
         seeking_description = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&artist.name)
    .bind(&artist.city)
    .bind(&artist.state)
    .bind(&artist.phone)
    .bind(Json(&artist.genres))
    .bind(&artist.image_link)
    .bind(&artist.facebook_link)
    .bind(&artist.website_link)
    .bind(artist.seeking_venue)
    .bind(&artist.seeking_description)
    .bind(artist.updated_at)
    .bind(artist.id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(artist)
}

/// Deletes an artist with no shows; artists with bookings are rejected.
pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<Artist, StoreError> {
    let mut tx = pool.begin().await?;

    let artist = find_in(&mut *tx, id)
        .await?
        .ok_or_else(|| StoreError::not_found(EntityKind::Artist, id))?;

    let shows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows WHERE artist_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if shows > 0 {
        return Err(StoreError::Conflict(format!(
            "Artist '{}' still has {shows} show(s) booked.",
            artist.name
        )));
    }

    sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(artist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;

    fn form(name: &str) -> ArtistForm {
        ArtistForm {
            name: Some(name.into()),
            city: Some("San Francisco".into()),
            state: Some("CA".into()),
            phone: Some("326-123-5000".into()),
            genres: Some(vec!["Rock n Roll".into()]),
            image_link: Some("https://images.example/guns-n-petals.jpg".into()),
            website_link: Some("https://www.gunsnpetalsband.com".into()),
            seeking_venue: Some(true),
            seeking_description: Some("Looking for shows to perform at in the Bay Area!".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_find_round_trips() {
        let pool = memory_pool().await;

        let created = create(&pool, form("Guns N Petals")).await.unwrap();
        let found = find(&pool, created.id).await.unwrap();

        assert_eq!(found, created);
        assert!(found.seeking_venue);
        assert_eq!(found.facebook_link, None);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let pool = memory_pool().await;
        create(&pool, form("The Wild Sax Band")).await.unwrap();
        create(&pool, form("guns n petals")).await.unwrap();
        create(&pool, form("Matt Quevedo")).await.unwrap();

        let names: Vec<String> = list(&pool).await.unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["guns n petals", "Matt Quevedo", "The Wild Sax Band"]);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_count_unchanged() {
        let pool = memory_pool().await;

        let invalid = ArtistForm {
            name: Some("   ".into()),
            ..form("ignored")
        };
        assert!(create(&pool, invalid).await.is_err());
        assert_eq!(count(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_then_find_is_not_found() {
        let pool = memory_pool().await;
        let created = create(&pool, form("Matt Quevedo")).await.unwrap();

        delete(&pool, created.id).await.unwrap();

        let err = find(&pool, created.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: EntityKind::Artist, .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let pool = memory_pool().await;

        let err = delete(&pool, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
