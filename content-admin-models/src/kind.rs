use crate::{
    entities::prelude::{BlogPost, Event, NewsItem, SponsoredEvent, TeamMember},
    record::Record,
};
use std::{fmt, str::FromStr};

/// The content tables managed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Events,
    News,
    Blogs,
    Sponsoreds,
    TeamMembers,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Events,
        EntityKind::News,
        EntityKind::Blogs,
        EntityKind::Sponsoreds,
        EntityKind::TeamMembers,
    ];

    /// URL path segment of the resource.
    pub fn resource(&self) -> &'static str {
        match self {
            EntityKind::Events => "events",
            EntityKind::News => "news",
            EntityKind::Blogs => "blogs",
            EntityKind::Sponsoreds => "sponsoreds",
            EntityKind::TeamMembers => "team-members",
        }
    }

    /// Remote table backing the resource.
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Events => Event::TABLE,
            EntityKind::News => NewsItem::TABLE,
            EntityKind::Blogs => BlogPost::TABLE,
            EntityKind::Sponsoreds => SponsoredEvent::TABLE,
            EntityKind::TeamMembers => TeamMember::TABLE,
        }
    }

    pub fn from_table(table: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.table() == table)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "events" | "event" => Ok(EntityKind::Events),
            "news" => Ok(EntityKind::News),
            "blogs" | "blog" => Ok(EntityKind::Blogs),
            "sponsoreds" | "sponsored" => Ok(EntityKind::Sponsoreds),
            "team-members" | "team" => Ok(EntityKind::TeamMembers),
            other => Err(format!("unknown entity `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_resource() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.resource().parse::<EntityKind>(), Ok(kind));
        }
        assert_eq!("team_members".parse(), Ok(EntityKind::TeamMembers));
        assert!("widgets".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_table_lookup() {
        assert_eq!(EntityKind::TeamMembers.table(), "team_members");
        assert_eq!(EntityKind::from_table("sponsoreds"), Some(EntityKind::Sponsoreds));
        assert_eq!(EntityKind::from_table("team-members"), None);
    }
}
