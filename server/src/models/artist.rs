use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{clean_genres, non_blank, optional, required};
use crate::db::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Artist {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    #[sqlx(json)]
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Artist submission, shared by create and edit. Same absent/blank rules as
/// [`super::VenueForm`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<Vec<String>>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: Option<bool>,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }

    pub fn into_artist(self, id: Uuid, now: DateTime<Utc>) -> Result<Artist, StoreError> {
        Ok(Artist {
            id,
            name: required("name", self.name)?,
            city: required("city", self.city)?,
            state: required("state", self.state)?,
            phone: optional(self.phone),
            genres: clean_genres(self.genres.unwrap_or_default()),
            image_link: optional(self.image_link),
            facebook_link: optional(self.facebook_link),
            website_link: optional(self.website_link),
            seeking_venue: self.seeking_venue.unwrap_or(false),
            seeking_description: optional(self.seeking_description),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_to(self, artist: &mut Artist, now: DateTime<Utc>) -> Result<(), StoreError> {
        let mut updated = artist.clone();

        if self.name.is_some() {
            updated.name = required("name", self.name)?;
        }
        if self.city.is_some() {
            updated.city = required("city", self.city)?;
        }
        if self.state.is_some() {
            updated.state = required("state", self.state)?;
        }
        if let Some(phone) = self.phone {
            updated.phone = non_blank(phone);
        }
        if let Some(genres) = self.genres {
            updated.genres = clean_genres(genres);
        }
        if let Some(image_link) = self.image_link {
            updated.image_link = non_blank(image_link);
        }
        if let Some(facebook_link) = self.facebook_link {
            updated.facebook_link = non_blank(facebook_link);
        }
        if let Some(website_link) = self.website_link {
            updated.website_link = non_blank(website_link);
        }
        if let Some(seeking_venue) = self.seeking_venue {
            updated.seeking_venue = seeking_venue;
        }
        if let Some(seeking_description) = self.seeking_description {
            updated.seeking_description = non_blank(seeking_description);
        }

        updated.updated_at = now;
        *artist = updated;
        Ok(())
    }
}

impl From<&Artist> for ArtistForm {
    fn from(artist: &Artist) -> Self {
        Self {
            name: Some(artist.name.clone()),
            city: Some(artist.city.clone()),
            state: Some(artist.state.clone()),
            phone: artist.phone.clone(),
            genres: Some(artist.genres.clone()),
            image_link: artist.image_link.clone(),
            facebook_link: artist.facebook_link.clone(),
            website_link: artist.website_link.clone(),
            seeking_venue: Some(artist.seeking_venue),
            seeking_description: artist.seeking_description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_artist_requires_state() {
        let form = ArtistForm {
            name: Some("Guns N Petals".into()),
            city: Some("San Francisco".into()),
            ..Default::default()
        };
        let err = form.into_artist(Uuid::new_v4(), Utc::now()).unwrap_err();
        assert!(matches!(err, StoreError::Validation(msg) if msg == "state is required"));
    }

    #[test]
    fn test_edit_form_round_trips_stored_values() {
        let form = ArtistForm {
            name: Some("Matt Quevedo".into()),
            city: Some("New York".into()),
            state: Some("NY".into()),
            genres: Some(vec!["Jazz".into()]),
            seeking_venue: Some(true),
            ..Default::default()
        };
        let artist = form.clone().into_artist(Uuid::new_v4(), Utc::now()).unwrap();

        assert_eq!(ArtistForm::from(&artist), form);
    }

    #[test]
    fn test_blank_optional_field_clears_it() {
        let mut artist = ArtistForm {
            name: Some("The Wild Sax Band".into()),
            city: Some("San Francisco".into()),
            state: Some("CA".into()),
            phone: Some("432-325-5432".into()),
            ..Default::default()
        }
        .into_artist(Uuid::new_v4(), Utc::now())
        .unwrap();

        let edit = ArtistForm {
            phone: Some(" ".into()),
            ..Default::default()
        };
        edit.apply_to(&mut artist, Utc::now()).unwrap();

        assert_eq!(artist.phone, None);
        assert_eq!(artist.name, "The Wild Sax Band");
    }
}
