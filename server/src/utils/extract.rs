use axum::extract::FromRequest;
use uuid::Uuid;

use crate::db::EntityKind;
use crate::utils::error::AppError;

/// `axum::Json` whose rejections are reported in the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Ids arrive as raw path segments so that garbage resolves to a 404 rather
/// than a 400 from the path extractor.
pub fn parse_id(entity: EntityKind, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::NotFound(format!("{entity} with id '{raw}' was not found")))
}
