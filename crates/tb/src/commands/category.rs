//! Category commands.
//!
//! Reads require project membership, writes require a role that may edit the
//! project. The writes themselves go through [`CategoryApi`].

use taskboard_model::prelude::*;

use super::{CommandContext, CommandError, Result};
use crate::api::CategoryApi;
use crate::app::App;
use crate::output::{
    format_categories_json, format_categories_table, format_category_change, format_category_json,
    format_category_table, CategoryChange,
};

fn api(app: &App) -> CategoryApi<SqliteCategoryStore<'_>> {
    CategoryApi::new(app.categories())
}

fn require_view(app: &App, project_id: i64) -> Result<()> {
    if app.projects().get_by_id(project_id)?.is_none() {
        return Err(CommandError::NotFound(format!("project {project_id}")));
    }
    if app.permission().can_view(app.user(), project_id)? {
        Ok(())
    } else {
        Err(CommandError::Rejected(403))
    }
}

fn require_edit(app: &App, project_id: i64) -> Result<()> {
    require_view(app, project_id)?;
    if app.permission().can_edit(app.user(), project_id)? {
        Ok(())
    } else {
        Err(CommandError::Rejected(403))
    }
}

fn get_category(app: &App, category_id: i64) -> Result<Category> {
    api(app)
        .get_category(category_id)?
        .ok_or_else(|| CommandError::NotFound(format!("category {category_id}")))
}

fn print_change(ctx: &CommandContext, change: &CategoryChange<'_>) -> Result<()> {
    if ctx.json_output || !ctx.quiet {
        println!("{}", format_category_change(change, ctx.json_output)?);
    }
    if change.status == "rejected" {
        return Err(CommandError::Rejected(400));
    }
    Ok(())
}

/// Lists the categories of a project.
pub fn execute_list(ctx: &CommandContext, app: &App, project_id: i64) -> Result<()> {
    require_view(app, project_id)?;
    let categories = api(app).get_all_categories(project_id)?;

    if ctx.json_output {
        println!("{}", format_categories_json(project_id, &categories)?);
    } else if !ctx.quiet {
        print!("{}", format_categories_table(&categories, ctx.use_colors));
    }
    Ok(())
}

/// Shows one category.
pub fn execute_show(ctx: &CommandContext, app: &App, category_id: i64) -> Result<()> {
    let category = get_category(app, category_id)?;
    require_view(app, category.project_id)?;

    if ctx.json_output {
        println!("{}", format_category_json(&category)?);
    } else if !ctx.quiet {
        print!("{}", format_category_table(&category, ctx.use_colors));
    }
    Ok(())
}

/// Creates a category.
pub fn execute_add(ctx: &CommandContext, app: &App, project_id: i64, name: &str) -> Result<()> {
    require_edit(app, project_id)?;
    let id = api(app).create_category(project_id, name)?;
    print_change(
        ctx,
        &CategoryChange {
            id,
            name: Some(name),
            status: if id.is_some() { "created" } else { "rejected" },
        },
    )
}

/// Renames a category.
pub fn execute_rename(ctx: &CommandContext, app: &App, category_id: i64, name: &str) -> Result<()> {
    let category = get_category(app, category_id)?;
    require_edit(app, category.project_id)?;
    let renamed = api(app).update_category(category_id, name)?;
    print_change(
        ctx,
        &CategoryChange {
            id: Some(category_id),
            name: Some(name),
            status: if renamed { "renamed" } else { "rejected" },
        },
    )
}

/// Removes a category.
pub fn execute_remove(ctx: &CommandContext, app: &App, category_id: i64) -> Result<()> {
    let category = get_category(app, category_id)?;
    require_edit(app, category.project_id)?;
    let removed = api(app).remove_category(category_id)?;
    print_change(
        ctx,
        &CategoryChange {
            id: Some(category_id),
            name: Some(&category.name),
            status: if removed { "removed" } else { "rejected" },
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{fixture, fixture_as};
    use crate::app::Settings;

    fn quiet() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
        }
    }

    #[test]
    fn test_add_and_rename() {
        let fx = fixture();
        execute_add(&quiet(), &fx.app, fx.website, "Bug").unwrap();
        let category = api(&fx.app).get_all_categories(fx.website).unwrap().remove(0);
        assert_eq!(category.name, "Bug");

        execute_rename(&quiet(), &fx.app, category.id, "Defect").unwrap();
        assert_eq!(get_category(&fx.app, category.id).unwrap().name, "Defect");
    }

    #[test]
    fn test_rejected_write_is_an_error() {
        let fx = fixture();
        assert!(matches!(
            execute_add(&quiet(), &fx.app, fx.website, " "),
            Err(CommandError::Rejected(400))
        ));
        assert!(matches!(
            execute_add(&quiet(), &fx.app, 999, "Bug"),
            Err(CommandError::NotFound(_))
        ));
    }

    #[test]
    fn test_membership_gates() {
        let fx = fixture_as("bob", Settings::default());
        assert!(matches!(
            execute_list(&quiet(), &fx.app, fx.secret),
            Err(CommandError::Rejected(403))
        ));
        execute_add(&quiet(), &fx.app, fx.website, "Bug").unwrap();
        let id = api(&fx.app).get_all_categories(fx.website).unwrap()[0].id;
        execute_remove(&quiet(), &fx.app, id).unwrap();
        assert!(matches!(
            execute_show(&quiet(), &fx.app, id),
            Err(CommandError::NotFound(_))
        ));
    }
}
