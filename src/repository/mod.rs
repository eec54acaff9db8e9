//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod memory_repo;
mod remote_repo;


pub use traits::{ProjectQuery, Repository};
pub use memory_repo::MemoryProjectRepository;
pub use remote_repo::RemoteProjectRepository;

/// Project repository as held by the application state
pub type ProjectRepository = dyn ProjectQuery;
