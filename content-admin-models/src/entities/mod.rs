//! The five content tables.
pub mod blog;
pub mod event;
pub mod news;
pub mod sponsored;
pub mod team_member;

pub mod prelude {
    pub use super::blog::{BlogDraft, BlogPost};
    pub use super::event::{Event, EventDraft};
    pub use super::news::{NewsDraft, NewsItem, NewsKind};
    pub use super::sponsored::{
        SponsoredDetail, SponsoredDraft, SponsoredEvent, SponsoredLink, SponsoredStatus,
    };
    pub use super::team_member::{MemberStatus, TeamMember, TeamMemberDraft};
}
