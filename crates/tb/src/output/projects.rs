//! Project, user and member output formatting.

use std::collections::BTreeMap;

use owo_colors::OwoColorize;
use serde::Serialize;
use taskboard_model::models::{Project, ProjectRole, User};

use super::helpers::{header, truncate_str};

/// JSON output structure for projects list command.
#[derive(Serialize)]
pub struct ProjectsListOutput<'a> {
    pub projects: &'a [Project],
}

/// Formats projects as JSON.
pub fn format_projects_json(projects: &[Project]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ProjectsListOutput { projects })
}

/// Formats projects as a table.
pub fn format_projects_table(projects: &[Project], use_colors: bool) -> String {
    if projects.is_empty() {
        return "No projects found.\n".to_string();
    }

    let mut output = header(
        &format!("{:<6} {:<30} {:<10} {:<10} {}", "ID", "Name", "Start", "End", "Status"),
        use_colors,
    );
    for project in projects {
        let status = if project.is_active() { "active" } else { "archived" };
        let status = if use_colors && !project.is_active() {
            status.dimmed().to_string()
        } else {
            status.to_string()
        };
        let line = format!(
            "{:<6} {:<30} {:<10} {:<10} {}",
            project.id,
            truncate_str(&project.name, 30),
            project.start_date.as_deref().unwrap_or("-"),
            project.end_date.as_deref().unwrap_or("-"),
            status
        );
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// JSON output structure for users list command.
#[derive(Serialize)]
pub struct UsersListOutput<'a> {
    pub users: &'a [User],
}

/// Formats users as JSON.
pub fn format_users_json(users: &[User]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&UsersListOutput { users })
}

/// Formats users as a table.
pub fn format_users_table(users: &[User], use_colors: bool) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }

    let mut output = header(
        &format!("{:<6} {:<20} {:<24} {}", "ID", "Username", "Name", "Role"),
        use_colors,
    );
    for user in users {
        let role = if user.is_admin() { "admin" } else { "user" };
        let line = format!(
            "{:<6} {:<20} {:<24} {}",
            user.id,
            truncate_str(&user.username, 20),
            truncate_str(&user.name, 24),
            role
        );
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// Formats project members grouped by role as JSON.
pub fn format_members_json(
    project_id: i64,
    members: &BTreeMap<ProjectRole, Vec<String>>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "project_id": project_id,
        "members": members,
    }))
}

/// Formats project members grouped by role.
pub fn format_members_table(members: &BTreeMap<ProjectRole, Vec<String>>, use_colors: bool) -> String {
    if members.is_empty() {
        return "No members found.\n".to_string();
    }

    let mut output = String::new();
    for (role, names) in members {
        let title = role.as_str();
        if use_colors {
            output.push_str(&format!("{}\n", title.bold()));
        } else {
            output.push_str(&format!("{title}\n"));
        }
        for name in names {
            output.push_str(&format!("  {name}\n"));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_model::models::{ProjectStatus, ProjectType};

    fn project(name: &str, status: ProjectStatus) -> Project {
        Project {
            id: 3,
            name: name.to_string(),
            description: String::new(),
            status,
            project_type: ProjectType::Team,
            owner_id: None,
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
            default_filter: String::new(),
            last_modified: 0,
        }
    }

    #[test]
    fn test_projects_table() {
        let table = format_projects_table(
            &[project("Website", ProjectStatus::Active), project("Old", ProjectStatus::Inactive)],
            false,
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("2024-01-01"));
        assert!(lines[1].ends_with("active"));
        assert!(lines[2].ends_with("archived"));
    }

    #[test]
    fn test_members_table_groups_by_role() {
        let mut members = BTreeMap::new();
        members.insert(ProjectRole::Manager, vec!["Alice Doe".to_string()]);
        members.insert(ProjectRole::Member, vec!["bob".to_string()]);

        let table = format_members_table(&members, false);
        assert_eq!(table, "project-manager\n  Alice Doe\nproject-member\n  bob\n");
    }
}
