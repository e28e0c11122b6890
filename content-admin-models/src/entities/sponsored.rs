//! Sponsored events with nested details and links.
//!
//! `details` and `links` are ordered JSON arrays stored in the row itself.
//! Entries are not deduplicated and may carry empty strings.

use crate::{
    record::{Cell, Record, RecordId},
    serde_ext::{empty_string_as_none, lenient_timestamp},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_default_from_null;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum SponsoredStatus {
    Active,
    #[default]
    Inactive,
}

impl From<String> for SponsoredStatus {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("active") {
            SponsoredStatus::Active
        } else {
            SponsoredStatus::Inactive
        }
    }
}

impl SponsoredStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SponsoredStatus::Active => "Active",
            SponsoredStatus::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsoredDetail {
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub description: String,
}

/// A labelled link. Stored as `{ "linkName": .., "link": .. }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsoredLink {
    #[serde(
        rename = "linkName",
        alias = "label",
        default,
        deserialize_with = "deserialize_default_from_null"
    )]
    pub label: String,
    #[serde(
        rename = "link",
        alias = "url",
        default,
        deserialize_with = "deserialize_default_from_null"
    )]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsoredEvent {
    pub id: RecordId,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub status: SponsoredStatus,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub details: Vec<SponsoredDetail>,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub links: Vec<SponsoredLink>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SponsoredDraft {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub status: SponsoredStatus,
    #[serde(default)]
    pub details: Vec<SponsoredDetail>,
    #[serde(default)]
    pub links: Vec<SponsoredLink>,
}

impl Record for SponsoredEvent {
    type Draft = SponsoredDraft;

    const TABLE: &'static str = "sponsoreds";
    const LABEL: &'static str = "sponsored event";
    const FOLDER: &'static str = "images";

    fn id(&self) -> RecordId {
        self.id
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn draft(&self) -> SponsoredDraft {
        SponsoredDraft {
            name: self.name.clone(),
            status: self.status,
            details: self.details.clone(),
            links: self.links.clone(),
        }
    }

    fn columns() -> &'static [&'static str] {
        &["Name", "Status", "Details", "Links", "Image"]
    }

    fn cells(&self) -> Vec<Cell> {
        let details = self
            .details
            .iter()
            .map(|d| format!("{}: {}", d.title, d.description))
            .collect::<Vec<_>>()
            .join("; ");
        let links = self
            .links
            .iter()
            .map(|l| format!("{} <{}>", l.label, l.url))
            .collect::<Vec<_>>()
            .join("; ");
        vec![
            Some(self.name.clone()),
            Some(self.status.as_str().to_string()),
            Some(details),
            Some(links),
            self.image.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_lists_keep_order_and_empty_entries() {
        let row: SponsoredEvent = serde_json::from_value(json!({
            "id": 3,
            "name": "Open Source Day",
            "status": "Active",
            "details": [
                {"title": "Prize", "description": "Swag"},
                {"title": "", "description": ""}
            ],
            "links": [{"linkName": "Site", "link": "https://example.org"}]
        }))
        .unwrap();
        assert_eq!(row.status, SponsoredStatus::Active);
        assert_eq!(row.details.len(), 2);
        assert_eq!(row.details[1], SponsoredDetail::default());
        assert_eq!(row.links[0].label, "Site");

        let wire = serde_json::to_value(&row.links[0]).unwrap();
        assert_eq!(wire, json!({"linkName": "Site", "link": "https://example.org"}));
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let row: SponsoredEvent =
            serde_json::from_value(json!({"id": 4, "name": "x", "details": null})).unwrap();
        assert!(row.details.is_empty());
        assert!(row.links.is_empty());
        assert_eq!(row.status, SponsoredStatus::Inactive);
    }
}
