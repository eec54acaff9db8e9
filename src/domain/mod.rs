//! Domain Layer
//!
//! Contains all domain entities and the pure client-side derivations over
//! them: filtering, timeline, tag suggestions, analytics and form validation.
//! Nothing in this layer performs I/O.

mod entity;
mod error;
mod project;
pub mod analytics;
pub mod filter;
pub mod tags;
pub mod timeline;
pub mod validation;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, FieldError, ParseError, ValidationErrors};
pub use project::{
    ActivityLog, AiTask, Milestone, Progress, Project, ProjectStatus, ProjectType, Usefulness,
};
pub use analytics::{ProjectStats, TagCount};
pub use filter::{filter_projects, ProjectFilter};
pub use tags::TagIndex;
pub use timeline::{derive_timeline, timeline_item, timeline_range, TimelineItem, TimelineRange};
pub use validation::ProjectDraft;
