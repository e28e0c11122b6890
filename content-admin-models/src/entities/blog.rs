//! Blog posts.

use crate::{
    record::{Cell, Record, RecordId},
    serde_ext::{empty_string_as_none, lenient_timestamp},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_default_from_null;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: RecordId,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub author: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date: Option<String>,
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
pub struct BlogDraft {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "author is required"))]
    pub author: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(required(message = "date is required"))]
    pub date: Option<String>,
}

impl Record for BlogPost {
    type Draft = BlogDraft;

    const TABLE: &'static str = "blogs";
    const LABEL: &'static str = "blog";
    const FOLDER: &'static str = "blogs/images";

    fn id(&self) -> RecordId {
        self.id
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn draft(&self) -> BlogDraft {
        BlogDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
            date: self.date.clone(),
        }
    }

    fn columns() -> &'static [&'static str] {
        &["Title", "Author", "Date", "Content", "Image"]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Some(self.title.clone()),
            Some(self.author.clone()),
            self.date.clone(),
            Some(self.content.clone()),
            self.image.clone(),
        ]
    }
}
