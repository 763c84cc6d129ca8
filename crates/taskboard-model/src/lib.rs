//! Entity models and persistence for taskboard.
//!
//! This crate owns everything the query pipeline and the controllers treat as
//! collaborators: the SQLite schema and per-entity stores, the validators that
//! guard writes, project permissions, the color palette and the date parser.
//!
//! # Quick Start
//!
//! ```
//! use taskboard_model::prelude::*;
//!
//! let conn = open_db_in_memory()?;
//! let projects = SqliteProjectStore::new(&conn);
//! let id = projects.create(&NewProject::team("Website"))?;
//! assert!(projects.get_by_id(id)?.is_some());
//! # Ok::<(), taskboard_model::error::StoreError>(())
//! ```

pub mod color;
pub mod date;
pub mod db;
pub mod error;
pub mod models;
pub mod permission;
pub mod prelude;
pub mod store;
pub mod validator;
pub mod values;
