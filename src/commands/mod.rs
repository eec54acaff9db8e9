//! Commands Layer
//!
//! Handlers that bridge the CLI to the repository, store and services.

mod project_cmd;
mod io_cmd;
mod view_cmd;
mod insight_cmd;

pub use project_cmd::*;
pub use io_cmd::*;
pub use view_cmd::*;
pub use insight_cmd::*;
