//! Category procedures.

use log::{info, warn};
use taskboard_model::prelude::*;

/// Category procedures over a [`CategoryStore`].
///
/// Writes are validated first; invalid input never reaches the store.
pub struct CategoryApi<S: CategoryStore> {
    store: S,
    validator: CategoryValidator,
}

impl<S: CategoryStore> CategoryApi<S> {
    /// Creates an API over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            validator: CategoryValidator,
        }
    }

    /// Returns the category, if it exists.
    pub fn get_category(&self, category_id: i64) -> StoreResult<Option<Category>> {
        self.store.get_by_id(category_id)
    }

    /// Returns the project's categories ordered by name.
    pub fn get_all_categories(&self, project_id: i64) -> StoreResult<Vec<Category>> {
        self.store.get_all(project_id)
    }

    /// Removes a category and detaches it from its tasks.
    ///
    /// # Returns
    /// `false` if no such category exists.
    pub fn remove_category(&self, category_id: i64) -> StoreResult<bool> {
        let removed = self.store.remove(category_id)?;
        info!("event=category_remove module=api category_id={category_id} removed={removed}");
        Ok(removed)
    }

    /// Creates a category.
    ///
    /// # Returns
    /// The new id, or `None` when the input is invalid, the name is already
    /// taken in the project or the project does not exist.
    pub fn create_category(&self, project_id: i64, name: &str) -> StoreResult<Option<i64>> {
        let values = Values::new().with("project_id", project_id).with("name", name);
        if let Err(errors) = self.validator.validate_creation(&values) {
            warn!("event=category_create module=api status=invalid project_id={project_id} errors=\"{errors}\"");
            return Ok(None);
        }

        match self.store.create(&NewCategory::new(project_id, name)) {
            Ok(id) => {
                info!("event=category_create module=api status=ok category_id={id}");
                Ok(Some(id))
            }
            Err(err) if err.is_constraint_violation() => {
                warn!("event=category_create module=api status=rejected project_id={project_id} error={err}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Renames a category.
    ///
    /// # Returns
    /// `false` when the input is invalid, the name is taken or the category
    /// does not exist.
    pub fn update_category(&self, category_id: i64, name: &str) -> StoreResult<bool> {
        let values = Values::new().with("id", category_id).with("name", name);
        if let Err(errors) = self.validator.validate_modification(&values) {
            warn!("event=category_update module=api status=invalid category_id={category_id} errors=\"{errors}\"");
            return Ok(false);
        }

        let changes = Changes::new().set("name", name.trim().to_string());
        match self.store.update(category_id, &changes) {
            Err(err) if err.is_constraint_violation() => {
                warn!("event=category_update module=api status=rejected category_id={category_id} error={err}");
                Ok(false)
            }
            result => result,
        }
    }
}
