//! News items with rich-text content and a normal/special flag.

use crate::{
    record::{Cell, Record, RecordId},
    serde_ext::{empty_string_as_none, lenient_timestamp},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_default_from_null;
use validator::Validate;

/// Stored in the `type` column. Unknown or empty values read as `Normal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum NewsKind {
    #[default]
    Normal,
    Special,
}

impl From<String> for NewsKind {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("special") {
            NewsKind::Special
        } else {
            NewsKind::Normal
        }
    }
}

impl NewsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsKind::Normal => "normal",
            NewsKind::Special => "special",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: RecordId,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub name: String,
    /// Rich text (HTML) as produced by the editor.
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub link: String,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_default_from_null"
    )]
    pub kind: NewsKind,
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
pub struct NewsDraft {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "link is required"))]
    pub link: String,
    #[serde(rename = "type", default)]
    pub kind: NewsKind,
}

impl Record for NewsItem {
    type Draft = NewsDraft;

    const TABLE: &'static str = "news";
    const LABEL: &'static str = "news";
    const FOLDER: &'static str = "news";

    fn id(&self) -> RecordId {
        self.id
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn draft(&self) -> NewsDraft {
        NewsDraft {
            name: self.name.clone(),
            content: self.content.clone(),
            link: self.link.clone(),
            kind: self.kind,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["Name", "Type", "Link", "Content", "Image"]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Some(self.name.clone()),
            Some(self.kind.as_str().to_string()),
            Some(self.link.clone()),
            Some(self.content.clone()),
            self.image.clone(),
        ]
    }
}
