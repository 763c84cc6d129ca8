//! View helpers shared by several controllers.

mod project_activity;

pub use project_activity::ProjectActivityHelper;
