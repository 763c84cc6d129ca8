//! User persistence.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{StoreError, StoreResult};
use crate::models::{NewUser, User, UserRole};

const USER_SELECT_SQL: &str = "SELECT id, username, name, email, role, is_active FROM users";

/// Persistence contract for users.
pub trait UserStore {
    fn get_by_id(&self, id: i64) -> StoreResult<Option<User>>;
    fn get_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    fn get_all(&self) -> StoreResult<Vec<User>>;
    fn create(&self, user: &NewUser) -> StoreResult<i64>;
}

/// SQLite-backed user store.
pub struct SqliteUserStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserStore for SqliteUserStore<'_> {
    fn get_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let row = self
            .conn
            .query_row(&format!("{USER_SELECT_SQL} WHERE id = ?1"), [id], parse_row)
            .optional()?;
        row.transpose()
    }

    fn get_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE username = ?1 COLLATE NOCASE"),
                [username],
                parse_row,
            )
            .optional()?;
        row.transpose()
    }

    fn get_all(&self) -> StoreResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY username"))?;
        let rows = stmt.query_map([], parse_row)?;
        let mut users = Vec::new();
        for row in rows {
            users.push(row??);
        }
        Ok(users)
    }

    fn create(&self, user: &NewUser) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO users (username, name, email, role) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.username.trim(),
                user.name.as_str(),
                user.email.as_str(),
                user.role.as_str()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

/// Reads one user row; an unknown role is reported as invalid data.
fn parse_row(row: &Row<'_>) -> rusqlite::Result<StoreResult<User>> {
    let role: String = row.get(4)?;
    let Some(role) = UserRole::parse(&role) else {
        return Ok(Err(StoreError::invalid_data(format!("unknown user role '{role}'"))));
    };

    Ok(Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        role,
        is_active: row.get::<_, i64>(5)? != 0,
    }))
}
