pub mod artist;
pub mod show;
pub mod venue;

pub use artist::{Artist, ArtistForm};
pub use show::{ArtistShow, NewShow, Show, ShowForm, ShowListing, VenueShow};
pub use venue::{Venue, VenueForm};

use crate::db::StoreError;

/// Trims a submitted value; blank means absent.
pub(crate) fn non_blank(value: impl AsRef<str>) -> Option<String> {
    let trimmed = value.as_ref().trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn required(field: &str, value: Option<String>) -> Result<String, StoreError> {
    value
        .and_then(non_blank)
        .ok_or_else(|| StoreError::Validation(format!("{field} is required")))
}

pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value.and_then(non_blank)
}

pub(crate) fn clean_genres(genres: Vec<String>) -> Vec<String> {
    genres.into_iter().filter_map(non_blank).collect()
}
