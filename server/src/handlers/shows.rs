use axum::extract::State;
use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;

use super::settle;
use crate::db::{self, EntityKind};
use crate::models::ShowForm;
use crate::queries;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::JsonBody;
use crate::utils::response::{created, data};

#[derive(Serialize)]
struct Choice {
    id: Uuid,
    name: String,
}

/// Empty show form plus the venues and artists it can reference.
#[derive(Serialize)]
struct NewShowForm {
    form: ShowForm,
    venues: Vec<Choice>,
    artists: Vec<Choice>,
}

pub async fn list_shows(State(state): State<AppState>) -> Result<Response, AppError> {
    let shows = queries::list_all_shows(&state.pool).await?;
    Ok(data(shows))
}

pub async fn create_show_form(State(state): State<AppState>) -> Result<Response, AppError> {
    let venues = queries::list_all_venues(&state.pool)
        .await?
        .into_iter()
        .map(|venue| Choice {
            id: venue.id,
            name: venue.name,
        })
        .collect();
    let artists = queries::list_all_artists(&state.pool)
        .await?
        .into_iter()
        .map(|artist| Choice {
            id: artist.id,
            name: artist.name,
        })
        .collect();

    Ok(data(NewShowForm {
        form: ShowForm::default(),
        venues,
        artists,
    }))
}

pub async fn create_show_submission(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<ShowForm>,
) -> Result<Response, AppError> {
    let show = settle(
        db::shows::create(&state.pool, form).await,
        EntityKind::Show,
        "create",
        || "An error occurred. Show could not be listed.".to_string(),
    )?;

    Ok(created(show, "Show was successfully listed!"))
}
