//! Entity types persisted by the stores.
//!
//! Each entity comes with a `New*` struct describing the fields accepted on
//! creation; everything else is filled in by the store.

mod activity;
mod board;
mod category;
mod common;
mod project;
mod task;
mod user;

pub use activity::*;
pub use board::*;
pub use category::*;
pub use common::*;
pub use project::*;
pub use task::*;
pub use user::*;
