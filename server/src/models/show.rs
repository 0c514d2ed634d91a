use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::required;
use crate::db::StoreError;

/// Layout used by the show form's date picker.
const FORM_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Show {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub artist_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A show on a venue's page: the artist playing it.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ArtistShow {
    pub artist_id: Uuid,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// A show on an artist's page: the venue hosting it.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct VenueShow {
    pub venue_id: Uuid,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// One row of the global shows listing.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ShowListing {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub venue_name: String,
    pub artist_id: Uuid,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: Option<String>,
    pub venue_id: Option<String>,
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewShow {
    pub artist_id: Uuid,
    pub venue_id: Uuid,
    pub start_time: DateTime<Utc>,
}

impl ShowForm {
    pub fn validate(self) -> Result<NewShow, StoreError> {
        let artist_id = parse_uuid("artist_id", required("artist_id", self.artist_id)?)?;
        let venue_id = parse_uuid("venue_id", required("venue_id", self.venue_id)?)?;
        let start_time = parse_start_time(&required("start_time", self.start_time)?)?;

        Ok(NewShow {
            artist_id,
            venue_id,
            start_time,
        })
    }
}

impl NewShow {
    pub fn into_show(self, id: Uuid, now: DateTime<Utc>) -> Show {
        Show {
            id,
            venue_id: self.venue_id,
            artist_id: self.artist_id,
            start_time: self.start_time,
            created_at: now,
        }
    }
}

fn parse_uuid(field: &str, raw: String) -> Result<Uuid, StoreError> {
    Uuid::parse_str(&raw)
        .map_err(|_| StoreError::Validation(format!("{field} '{raw}' is not a valid id")))
}

/// Accepts RFC 3339, or the form's `YYYY-MM-DD HH:MM:SS` taken as UTC.
pub fn parse_start_time(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, FORM_DATETIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| StoreError::Validation(format!("start_time '{raw}' is not a valid date")))
}
