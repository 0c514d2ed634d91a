use axum::extract::{Path, State};
use axum::response::Response;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::{settle, Deleted, SearchForm};
use crate::db::{self, EntityKind};
use crate::models::VenueForm;
use crate::queries::{self, Area, SearchKind};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::{parse_id, JsonBody};
use crate::utils::response::{created, data, success};

#[derive(Serialize)]
struct VenueListing {
    areas: Vec<Area>,
}

#[derive(Serialize)]
struct EditVenue {
    id: Uuid,
    form: VenueForm,
}

pub async fn list_venues(State(state): State<AppState>) -> Result<Response, AppError> {
    let areas = queries::venues_by_area(&state.pool, Utc::now()).await?;
    Ok(data(VenueListing { areas }))
}

pub async fn search_venues(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<SearchForm>,
) -> Result<Response, AppError> {
    let results = queries::search_by_name(
        &state.pool,
        SearchKind::Venue,
        &form.search_term,
        Utc::now(),
    )
    .await?;
    Ok(data(results))
}

pub async fn show_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(EntityKind::Venue, &venue_id)?;
    let detail = queries::shows_for_venue(&state.pool, id, Utc::now()).await?;
    Ok(data(detail))
}

pub async fn create_venue_form() -> Response {
    data(VenueForm::default())
}

pub async fn create_venue_submission(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<VenueForm>,
) -> Result<Response, AppError> {
    let name = form.display_name();
    let venue = settle(
        db::venues::create(&state.pool, form).await,
        EntityKind::Venue,
        "create",
        || format!("An error occurred. Venue {name} could not be listed."),
    )?;

    let message = format!("Venue {} was successfully listed!", venue.name);
    Ok(created(venue, message))
}

pub async fn edit_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(EntityKind::Venue, &venue_id)?;
    let venue = db::venues::find(&state.pool, id).await?;
    Ok(data(EditVenue {
        id,
        form: VenueForm::from(&venue),
    }))
}

pub async fn edit_venue_submission(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
    JsonBody(form): JsonBody<VenueForm>,
) -> Result<Response, AppError> {
    let id = parse_id(EntityKind::Venue, &venue_id)?;
    let subject = venue_subject(&state, id).await;
    let venue = settle(
        db::venues::update(&state.pool, id, form).await,
        EntityKind::Venue,
        "update",
        || format!("An error occurred. {subject} could not be updated."),
    )?;

    let message = format!("Venue {} was successfully updated!", venue.name);
    Ok(success(venue, message))
}

pub async fn delete_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(EntityKind::Venue, &venue_id)?;
    let subject = venue_subject(&state, id).await;
    let venue = settle(
        db::venues::delete(&state.pool, id).await,
        EntityKind::Venue,
        "delete",
        || format!("An error occurred. {subject} could not be deleted."),
    )?;

    Ok(success(
        Deleted { id },
        format!("Venue {} was successfully deleted!", venue.name),
    ))
}

/// Names the venue in failure messages, e.g. "Venue The Name", or
/// "This venue" when it cannot be read.
async fn venue_subject(state: &AppState, id: Uuid) -> String {
    match db::venues::find(&state.pool, id).await {
        Ok(venue) => format!("Venue {}", venue.name),
        Err(_) => "This venue".to_string(),
    }
}
