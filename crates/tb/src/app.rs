//! Application container.
//!
//! One [`App`] is built per invocation. It owns the database connection, the
//! acting user, the hook registry and the view environment; controllers borrow
//! their collaborators from it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rusqlite::Connection;
use taskboard_model::prelude::*;
use taskboard_query::filter::{ActivityLexer, TaskLexer};

use crate::commands::config::{default_database_path, Config, DEFAULT_ACTIVITY_LIMIT};
use crate::commands::{CommandError, Result};
use crate::hook::{HookRegistry, TASK_FORM_DEFAULT};
use crate::response::Session;
use crate::url::UrlBuilder;
use crate::view::View;

/// Settings resolved from flags, environment and the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database: PathBuf,
    pub user: Option<String>,
    pub timezone: Option<String>,
    pub url_base: String,
    pub default_color: Option<String>,
    pub activity_limit: usize,
    pub task_form_defaults: BTreeMap<String, String>,
}

impl Settings {
    /// Resolves settings with precedence flag > env > config > default.
    ///
    /// Flags and their environment variables are already merged by clap, so
    /// `db` and `user` carry either.
    pub fn resolve(db: Option<&Path>, user: Option<&str>, config: &Config) -> Result<Self> {
        let database = match (db, config.database.as_deref()) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(path)) => PathBuf::from(path),
            (None, None) => default_database_path()?,
        };

        Ok(Self {
            database,
            user: user.map(str::to_string).or_else(|| config.user.clone()),
            timezone: config.timezone.clone(),
            url_base: config.url_base.clone().unwrap_or_else(|| "/".to_string()),
            default_color: config.defaults.color.clone(),
            activity_limit: config.activity.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT),
            task_form_defaults: config.hooks.task_form_defaults.clone(),
        })
    }

    fn dates(&self) -> Result<DateParser> {
        match self.timezone.as_deref() {
            None => Ok(DateParser::default()),
            Some(name) => DateParser::from_timezone_name(name)
                .ok_or_else(|| CommandError::Config(format!("Unknown time zone '{name}'"))),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: PathBuf::from(":memory:"),
            user: None,
            timezone: None,
            url_base: "/".to_string(),
            default_color: None,
            activity_limit: DEFAULT_ACTIVITY_LIMIT,
            task_form_defaults: BTreeMap::new(),
        }
    }
}

/// Per-invocation application state.
pub struct App {
    conn: Connection,
    user: User,
    dates: DateParser,
    hooks: HookRegistry,
    view: View,
    urls: UrlBuilder,
    session: Session,
    settings: Settings,
}

impl App {
    /// Opens the configured database and loads the acting user.
    pub fn open(settings: Settings) -> Result<Self> {
        let username = settings.user.clone().ok_or_else(|| {
            CommandError::Config(
                "No user selected. Pass --user, set TB_USER or run 'tb config set user <name>'"
                    .to_string(),
            )
        })?;
        let conn = open_db(&settings.database)?;
        let user = SqliteUserStore::new(&conn)
            .get_by_username(&username)?
            .ok_or_else(|| {
                CommandError::Config(format!(
                    "Unknown user '{username}'. Run 'tb user add {username}' first"
                ))
            })?;
        Self::new(conn, user, settings)
    }

    /// Builds the container over an open connection.
    pub fn new(conn: Connection, user: User, settings: Settings) -> Result<Self> {
        let dates = settings.dates()?;
        let mut hooks = HookRegistry::new();
        register_config_hooks(&mut hooks, &settings);

        debug!(
            "event=app_open module=app user={} timezone={} hooks={:?}",
            user.username,
            dates.timezone(),
            hooks
        );
        info!("event=app_open module=app status=ok user_id={}", user.id);

        Ok(Self {
            conn,
            user,
            dates,
            hooks,
            view: View::new()?,
            urls: UrlBuilder::new(settings.url_base.clone()),
            session: Session::default(),
            settings,
        })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// The acting user.
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn dates(&self) -> &DateParser {
        &self.dates
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn projects(&self) -> SqliteProjectStore<'_> {
        SqliteProjectStore::new(&self.conn)
    }

    pub fn tasks(&self) -> SqliteTaskStore<'_> {
        SqliteTaskStore::new(&self.conn)
    }

    pub fn categories(&self) -> SqliteCategoryStore<'_> {
        SqliteCategoryStore::new(&self.conn)
    }

    pub fn board(&self) -> SqliteBoardStore<'_> {
        SqliteBoardStore::new(&self.conn)
    }

    pub fn users(&self) -> SqliteUserStore<'_> {
        SqliteUserStore::new(&self.conn)
    }

    pub fn activities(&self) -> SqliteActivityStore<'_> {
        SqliteActivityStore::new(&self.conn)
    }

    pub fn permission(&self) -> SqliteProjectPermission<'_> {
        SqliteProjectPermission::new(&self.conn)
    }

    /// Task search lexer for the acting user.
    pub fn task_lexer(&self) -> TaskLexer {
        TaskLexer::new(self.user.id, self.dates.clone())
    }

    /// Activity search lexer for the acting user.
    pub fn activity_lexer(&self) -> ActivityLexer {
        ActivityLexer::new(self.user.id, self.dates.clone())
    }

    pub fn task_validator(&self) -> TaskValidator {
        TaskValidator::new(self.dates.clone())
    }

    /// Color of new tasks: the configured default when it exists, else the
    /// palette default.
    pub fn default_color(&self) -> &str {
        self.settings
            .default_color
            .as_deref()
            .filter(|color| ColorPalette.exists(color))
            .unwrap_or(DEFAULT_COLOR)
    }
}

/// Registers the merge callbacks declared in the config file.
fn register_config_hooks(hooks: &mut HookRegistry, settings: &Settings) {
    if settings.task_form_defaults.is_empty() {
        return;
    }
    let defaults: Values = settings
        .task_form_defaults
        .iter()
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect();
    hooks.on_merge(TASK_FORM_DEFAULT, move |_| defaults.clone());
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_resolve_precedence() {
        let mut config = Config::default();
        config.database = Some("/from/config.db".to_string());
        config.user = Some("carol".to_string());

        let settings = Settings::resolve(Some(Path::new("/from/flag.db")), None, &config).unwrap();
        assert_eq!(settings.database, PathBuf::from("/from/flag.db"));
        assert_eq!(settings.user.as_deref(), Some("carol"));

        let settings = Settings::resolve(None, Some("dave"), &config).unwrap();
        assert_eq!(settings.database, PathBuf::from("/from/config.db"));
        assert_eq!(settings.user.as_deref(), Some("dave"));
        assert_eq!(settings.activity_limit, DEFAULT_ACTIVITY_LIMIT);
    }

    #[test]
    fn test_unknown_timezone_is_config_error() {
        let conn = open_db_in_memory().unwrap();
        let users = SqliteUserStore::new(&conn);
        let id = users.create(&NewUser::new("alice")).unwrap();
        let user = users.get_by_id(id).unwrap().unwrap();

        let settings = Settings {
            timezone: Some("Mars/Olympus".to_string()),
            ..Settings::default()
        };
        assert!(matches!(
            App::new(conn, user, settings),
            Err(CommandError::Config(_))
        ));
    }

    #[test]
    fn test_open_requires_known_user() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            database: dir.path().join("board.db"),
            user: Some("ghost".to_string()),
            ..Settings::default()
        };
        let err = App::open(settings).err().unwrap();
        assert!(err.to_string().contains("ghost"));

        let settings = Settings {
            database: dir.path().join("board.db"),
            ..Settings::default()
        };
        assert!(matches!(App::open(settings), Err(CommandError::Config(_))));
    }

    #[test]
    fn test_config_hook_registered() {
        let mut defaults = BTreeMap::new();
        defaults.insert("color_id".to_string(), "green".to_string());
        let fx = fixture_as(
            "alice",
            Settings {
                task_form_defaults: defaults,
                ..Settings::default()
            },
        );

        let values = Values::new().with("color_id", "yellow");
        let merged = fx.app.hooks().merge(TASK_FORM_DEFAULT, values.clone(), &values);
        assert_eq!(merged.get("color_id"), Some("green"));
    }

    #[test]
    fn test_default_color_falls_back() {
        let fx = fixture_as(
            "alice",
            Settings {
                default_color: Some("ultraviolet".to_string()),
                ..Settings::default()
            },
        );
        assert_eq!(fx.app.default_color(), DEFAULT_COLOR);
    }
}
