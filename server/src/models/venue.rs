use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{clean_genres, non_blank, optional, required};
use crate::db::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    #[sqlx(json)]
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Venue submission, shared by create and edit.
///
/// On create, missing required fields are a validation failure. On edit an
/// absent field leaves the stored value alone, while a blank optional field
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Option<Vec<String>>,
    pub facebook_link: Option<String>,
    #[serde(alias = "website_link")]
    pub website: Option<String>,
    pub seeking_talent: Option<bool>,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    /// Name as submitted, for user-facing messages.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }

    pub fn into_venue(self, id: Uuid, now: DateTime<Utc>) -> Result<Venue, StoreError> {
        Ok(Venue {
            id,
            name: required("name", self.name)?,
            city: required("city", self.city)?,
            state: required("state", self.state)?,
            address: required("address", self.address)?,
            phone: optional(self.phone),
            image_link: optional(self.image_link),
            genres: clean_genres(self.genres.unwrap_or_default()),
            facebook_link: optional(self.facebook_link),
            website: optional(self.website),
            seeking_talent: self.seeking_talent.unwrap_or(false),
            seeking_description: optional(self.seeking_description),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies only the submitted fields. Nothing is written to `venue`
    /// unless every submitted field is valid.
    pub fn apply_to(self, venue: &mut Venue, now: DateTime<Utc>) -> Result<(), StoreError> {
        let mut updated = venue.clone();

        if self.name.is_some() {
            updated.name = required("name", self.name)?;
        }
        if self.city.is_some() {
            updated.city = required("city", self.city)?;
        }
        if self.state.is_some() {
            updated.state = required("state", self.state)?;
        }
        if self.address.is_some() {
            updated.address = required("address", self.address)?;
        }
        if let Some(phone) = self.phone {
            updated.phone = non_blank(phone);
        }
        if let Some(image_link) = self.image_link {
            updated.image_link = non_blank(image_link);
        }
        if let Some(genres) = self.genres {
            updated.genres = clean_genres(genres);
        }
        if let Some(facebook_link) = self.facebook_link {
            updated.facebook_link = non_blank(facebook_link);
        }
        if let Some(website) = self.website {
            updated.website = non_blank(website);
        }
        if let Some(seeking_talent) = self.seeking_talent {
            updated.seeking_talent = seeking_talent;
        }
        if let Some(seeking_description) = self.seeking_description {
            updated.seeking_description = non_blank(seeking_description);
        }

        updated.updated_at = now;
        *venue = updated;
        Ok(())
    }
}

impl From<&Venue> for VenueForm {
    fn from(venue: &Venue) -> Self {
        Self {
            name: Some(venue.name.clone()),
            city: Some(venue.city.clone()),
            state: Some(venue.state.clone()),
            address: Some(venue.address.clone()),
            phone: venue.phone.clone(),
            image_link: venue.image_link.clone(),
            genres: Some(venue.genres.clone()),
            facebook_link: venue.facebook_link.clone(),
            website: venue.website.clone(),
            seeking_talent: Some(venue.seeking_talent),
            seeking_description: venue.seeking_description.clone(),
        }
    }
}
