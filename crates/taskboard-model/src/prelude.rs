//! Common imports for crates building on the model layer.

pub use crate::color::{ColorPalette, ColorProperties, DEFAULT_COLOR};
pub use crate::date::DateParser;
pub use crate::db::{open_db, open_db_in_memory};
pub use crate::error::{StoreError, StoreResult};
pub use crate::models::*;
pub use crate::permission::{ProjectPermission, SqliteProjectPermission};
pub use crate::store::{
    ActivityStore, BoardStore, CategoryStore, ProjectStore, SqliteActivityStore,
    SqliteBoardStore, SqliteCategoryStore, SqliteProjectStore, SqliteTaskStore, SqliteUserStore,
    TaskStore, UserStore,
};
pub use crate::validator::{CategoryValidator, TaskValidator, Validation, ValidationErrors};
pub use crate::values::{Changes, Values};
