//! Project membership, roles and capability checks.

use std::collections::BTreeMap;

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{StoreError, StoreResult};
use crate::models::{ProjectRole, ProjectStatus, Task, User, UserRole};

/// Membership and authorization queries scoped to projects.
pub trait ProjectPermission {
    /// Ids of the active projects `user_id` can see. Administrators see every
    /// active project.
    fn active_project_ids(&self, user_id: i64) -> StoreResult<Vec<i64>>;

    /// Active projects `user_id` can see, keyed by id.
    fn projects_by_user(&self, user_id: i64) -> StoreResult<BTreeMap<i64, String>>;

    fn is_member(&self, project_id: i64, user_id: i64) -> StoreResult<bool>;

    /// The member's role, or `None` if the user is not a member.
    fn role(&self, project_id: i64, user_id: i64) -> StoreResult<Option<ProjectRole>>;

    /// Adds a member or changes the role of an existing one.
    fn add_user(&self, project_id: i64, user_id: i64, role: ProjectRole) -> StoreResult<()>;

    /// Display names of the project's members grouped by role; roles without
    /// members are omitted.
    fn users_grouped_by_role(&self, project_id: i64)
        -> StoreResult<BTreeMap<ProjectRole, Vec<String>>>;

    /// Active members allowed to own tasks, as `(id, display name)`.
    fn assignable_users(&self, project_id: i64) -> StoreResult<Vec<(i64, String)>>;

    /// Returns true if `user` may open the project.
    fn can_view(&self, user: &User, project_id: i64) -> StoreResult<bool> {
        Ok(user.is_admin() || self.is_member(project_id, user.id)?)
    }

    /// Returns true if `user` may create and change tasks in the project.
    fn can_edit(&self, user: &User, project_id: i64) -> StoreResult<bool> {
        if user.is_admin() {
            return Ok(true);
        }
        Ok(self
            .role(project_id, user.id)?
            .is_some_and(ProjectRole::can_edit))
    }

    /// Administrators, the task creator and project managers may remove a task.
    fn can_remove_task(&self, user: &User, task: &Task) -> StoreResult<bool> {
        if user.is_admin() || task.creator_id == Some(user.id) {
            return Ok(true);
        }
        Ok(self.role(task.project_id, user.id)? == Some(ProjectRole::Manager))
    }
}

/// SQLite-backed permission queries.
pub struct SqliteProjectPermission<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectPermission<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn is_admin(&self, user_id: i64) -> StoreResult<bool> {
        let role: Option<String> = self
            .conn
            .query_row("SELECT role FROM users WHERE id = ?1", [user_id], |row| row.get(0))
            .optional()?;
        Ok(role.as_deref() == Some(UserRole::Admin.as_str()))
    }

    fn visible_projects(&self, user_id: i64) -> StoreResult<Vec<(i64, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.name FROM projects p
             WHERE p.is_active = ?1
               AND (?2 = 1 OR EXISTS (
                   SELECT 1 FROM project_has_users pu
                   WHERE pu.project_id = p.id AND pu.user_id = ?3
               ))
             ORDER BY p.name COLLATE NOCASE",
        )?;
        let rows = stmt
            .query_map(
                params![
                    ProjectStatus::Active.as_db(),
                    self.is_admin(user_id)? as i64,
                    user_id
                ],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(
            "event=visible_projects module=permission user_id={user_id} count={}",
            rows.len()
        );
        Ok(rows)
    }
}

impl ProjectPermission for SqliteProjectPermission<'_> {
    fn active_project_ids(&self, user_id: i64) -> StoreResult<Vec<i64>> {
        let mut ids: Vec<i64> = self
            .visible_projects(user_id)?
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    fn projects_by_user(&self, user_id: i64) -> StoreResult<BTreeMap<i64, String>> {
        Ok(self.visible_projects(user_id)?.into_iter().collect())
    }

    fn is_member(&self, project_id: i64, user_id: i64) -> StoreResult<bool> {
        Ok(self.role(project_id, user_id)?.is_some())
    }

    fn role(&self, project_id: i64, user_id: i64) -> StoreResult<Option<ProjectRole>> {
        let role: Option<String> = self
            .conn
            .query_row(
                "SELECT role FROM project_has_users WHERE project_id = ?1 AND user_id = ?2",
                params![project_id, user_id],
                |row| row.get(0),
            )
            .optional()?;
        match role {
            None => Ok(None),
            Some(role) => ProjectRole::parse(&role)
                .map(Some)
                .ok_or_else(|| StoreError::invalid_data(format!("unknown project role '{role}'"))),
        }
    }

    fn add_user(&self, project_id: i64, user_id: i64, role: ProjectRole) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO project_has_users (project_id, user_id, role) VALUES (?1, ?2, ?3)
             ON CONFLICT (project_id, user_id) DO UPDATE SET role = excluded.role",
            params![project_id, user_id, role.as_str()],
        )?;
        Ok(())
    }

    fn users_grouped_by_role(
        &self,
        project_id: i64,
    ) -> StoreResult<BTreeMap<ProjectRole, Vec<String>>> {
        let mut stmt = self.conn.prepare(
            "SELECT pu.role, u.username, u.name FROM project_has_users pu
             JOIN users u ON u.id = pu.user_id
             WHERE pu.project_id = ?1
             ORDER BY u.username COLLATE NOCASE",
        )?;
        let rows = stmt.query_map([project_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut grouped: BTreeMap<ProjectRole, Vec<String>> = BTreeMap::new();
        for row in rows {
            let (role, username, name) = row?;
            let role = ProjectRole::parse(&role)
                .ok_or_else(|| StoreError::invalid_data(format!("unknown project role '{role}'")))?;
            let display = if name.is_empty() { username } else { name };
            grouped.entry(role).or_default().push(display);
        }
        Ok(grouped)
    }

    fn assignable_users(&self, project_id: i64) -> StoreResult<Vec<(i64, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.id, u.username, u.name FROM project_has_users pu
             JOIN users u ON u.id = pu.user_id
             WHERE pu.project_id = ?1 AND u.is_active = 1 AND pu.role IN (?2, ?3)
             ORDER BY u.username COLLATE NOCASE",
        )?;
        let rows = stmt.query_map(
            params![
                project_id,
                ProjectRole::Manager.as_str(),
                ProjectRole::Member.as_str()
            ],
            |row| {
                let username: String = row.get(1)?;
                let name: String = row.get(2)?;
                Ok((row.get(0)?, if name.is_empty() { username } else { name }))
            },
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
