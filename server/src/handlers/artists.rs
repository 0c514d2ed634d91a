use axum::extract::{Path, State};
use axum::response::Response;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::{settle, Deleted, SearchForm};
use crate::db::{self, EntityKind};
use crate::models::ArtistForm;
use crate::queries::{self, SearchKind};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::{parse_id, JsonBody};
use crate::utils::response::{created, data, success};

#[derive(Serialize)]
struct ArtistSummary {
    id: Uuid,
    name: String,
}

#[derive(Serialize)]
struct EditArtist {
    id: Uuid,
    form: ArtistForm,
}

pub async fn list_artists(State(state): State<AppState>) -> Result<Response, AppError> {
    let artists: Vec<ArtistSummary> = queries::list_all_artists(&state.pool)
        .await?
        .into_iter()
        .map(|artist| ArtistSummary {
            id: artist.id,
            name: artist.name,
        })
        .collect();
    Ok(data(artists))
}

pub async fn search_artists(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<SearchForm>,
) -> Result<Response, AppError> {
    let results = queries::search_by_name(
        &state.pool,
        SearchKind::Artist,
        &form.search_term,
        Utc::now(),
    )
    .await?;
    Ok(data(results))
}

pub async fn show_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(EntityKind::Artist, &artist_id)?;
    let detail = queries::shows_for_artist(&state.pool, id, Utc::now()).await?;
    Ok(data(detail))
}

pub async fn create_artist_form() -> Response {
    data(ArtistForm::default())
}

pub async fn create_artist_submission(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<ArtistForm>,
) -> Result<Response, AppError> {
    let name = form.display_name();
    let artist = settle(
        db::artists::create(&state.pool, form).await,
        EntityKind::Artist,
        "create",
        || format!("An error occurred. Artist {name} could not be listed."),
    )?;

    let message = format!("Artist {} was successfully listed!", artist.name);
    Ok(created(artist, message))
}

pub async fn edit_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(EntityKind::Artist, &artist_id)?;
    let artist = db::artists::find(&state.pool, id).await?;
    Ok(data(EditArtist {
        id,
        form: ArtistForm::from(&artist),
    }))
}

pub async fn edit_artist_submission(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    JsonBody(form): JsonBody<ArtistForm>,
) -> Result<Response, AppError> {
    let id = parse_id(EntityKind::Artist, &artist_id)?;
    let subject = artist_subject(&state, id).await;
    let artist = settle(
        db::artists::update(&state.pool, id, form).await,
        EntityKind::Artist,
        "update",
        || format!("An error occurred. {subject} could not be updated."),
    )?;

    let message = format!("Artist {} was successfully updated!", artist.name);
    Ok(success(artist, message))
}

pub async fn delete_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(EntityKind::Artist, &artist_id)?;
    let subject = artist_subject(&state, id).await;
    let artist = settle(
        db::artists::delete(&state.pool, id).await,
        EntityKind::Artist,
        "delete",
        || format!("An error occurred. {subject} could not be deleted."),
    )?;

    Ok(success(
        Deleted { id },
        format!("Artist {} was successfully deleted!", artist.name),
    ))
}

/// Names the artist in failure messages, e.g. "Artist The Name", or
/// "This artist" when it cannot be read.
async fn artist_subject(state: &AppState, id: Uuid) -> String {
    match db::artists::find(&state.pool, id).await {
        Ok(artist) => format!("Artist {}", artist.name),
        Err(_) => "This artist".to_string(),
    }
}
