//! Entity Trait
//!
//! Anything a repository stores. IDs come from the store, so they are
//! strings for backend records rather than database integers.

/// A stored record identified by `Id`
pub trait Entity: Sized + Send + Sync + Clone {
    type Id: Clone + Eq + std::hash::Hash + std::fmt::Display + Send + Sync;

    fn id(&self) -> Self::Id;
}
