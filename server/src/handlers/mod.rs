use std::any::Any;

use axum::extract::State;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::db::{EntityKind, StoreError};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{data, success};

pub mod artists;
pub mod shows;
pub mod venues;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

/// Body of `POST /venues/search` and `POST /artists/search`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search_term: String,
}

#[derive(Serialize)]
pub struct Deleted {
    pub id: uuid::Uuid,
}

#[derive(Serialize)]
struct HomePayload {
    service: &'static str,
    venues: i64,
    artists: i64,
    shows: i64,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "fyyur-api",
    };

    success(payload, "Health check successful")
}

pub async fn home(State(state): State<AppState>) -> Result<Response, AppError> {
    let payload = HomePayload {
        service: "fyyur-api",
        venues: crate::db::venues::count(&state.pool).await?,
        artists: crate::db::artists::count(&state.pool).await?,
        shows: crate::db::shows::count(&state.pool).await?,
    };

    Ok(data(payload))
}

pub async fn not_found(uri: Uri) -> Response {
    AppError::NotFound(format!("No route for '{}'", uri.path())).into_response()
}

pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(panic = %detail, "Handler panicked");
    AppError::InternalServerError("The server encountered an unexpected error".to_string())
        .into_response()
}

/// Logs how a mutating request's transaction ended and turns a rollback
/// into the user-facing failure.
pub(crate) fn settle<T>(
    outcome: Result<T, StoreError>,
    entity: EntityKind,
    action: &str,
    failure: impl FnOnce() -> String,
) -> Result<T, AppError> {
    match outcome {
        Ok(value) => {
            info!(entity = %entity, action, "Committed");
            Ok(value)
        }
        Err(err) => {
            warn!(entity = %entity, action, error = %err, "Rolled back");
            Err(AppError::mutation(err, failure()))
        }
    }
}
