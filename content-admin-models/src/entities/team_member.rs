//! Team member profiles, listed by `order_index` then creation time.

use crate::{
    order::{OrderKey, OrderSpec},
    record::{Cell, Record, RecordId},
    serde_ext::{empty_string_as_none, lenient_timestamp},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_default_from_null;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
}

impl From<String> for MemberStatus {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("inactive") {
            MemberStatus::Inactive
        } else {
            MemberStatus::Active
        }
    }
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: RecordId,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub designation: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub quote: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub status: MemberStatus,
    #[serde(default)]
    pub order_index: Option<i32>,
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
pub struct TeamMemberDraft {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "designation is required"))]
    pub designation: String,
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(default)]
    pub order_index: Option<i32>,
}

impl Record for TeamMember {
    type Draft = TeamMemberDraft;

    const TABLE: &'static str = "team_members";
    const LABEL: &'static str = "team member";
    const FOLDER: &'static str = "team";

    fn id(&self) -> RecordId {
        self.id
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn draft(&self) -> TeamMemberDraft {
        TeamMemberDraft {
            name: self.name.clone(),
            designation: self.designation.clone(),
            quote: self.quote.clone(),
            status: self.status,
            order_index: self.order_index,
        }
    }

    fn default_order() -> OrderSpec {
        OrderSpec::by(OrderKey::asc("order_index")).then(OrderKey::asc("created_at"))
    }

    fn columns() -> &'static [&'static str] {
        &["Order", "Name", "Designation", "Quote", "Status", "Image"]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.order_index.map(|i| i.to_string()),
            Some(self.name.clone()),
            Some(self.designation.clone()),
            Some(self.quote.clone()),
            Some(self.status.as_str().to_string()),
            self.image.clone(),
        ]
    }
}
