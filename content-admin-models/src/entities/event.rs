//! Events: name, venue, optional date/time, description, image.

use crate::{
    constants::NOT_CONFIRMED,
    record::{Cell, Record, RecordId},
    serde_ext::{empty_string_as_none, lenient_timestamp},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_default_from_null;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: RecordId,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub venue: String,
    /// Free-form date as entered, e.g. `2025-03-01`.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date: Option<String>,
    /// Free-form time as entered, e.g. `18:00`.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub description: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub image: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct EventDraft {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "venue is required"))]
    pub venue: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub time: Option<String>,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
}

impl Record for Event {
    type Draft = EventDraft;

    const TABLE: &'static str = "events";
    const LABEL: &'static str = "event";
    const FOLDER: &'static str = "events";

    fn id(&self) -> RecordId {
        self.id
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn draft(&self) -> EventDraft {
        EventDraft {
            name: self.name.clone(),
            venue: self.venue.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            description: self.description.clone(),
        }
    }

    fn columns() -> &'static [&'static str] {
        &["Name", "Venue", "Description", "Date", "Time", "Image"]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Some(self.name.clone()),
            Some(self.venue.clone()),
            Some(self.description.clone()),
            Some(self.date.clone().unwrap_or_else(|| NOT_CONFIRMED.into())),
            Some(self.time.clone().unwrap_or_else(|| NOT_CONFIRMED.into())),
            self.image.clone(),
        ]
    }
}
