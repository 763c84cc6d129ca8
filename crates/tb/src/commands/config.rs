//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/tb/config.toml.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use taskboard_model::color::ColorPalette;

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Number of events shown by `tb activity project|projects` when not configured.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 50;

/// File name of the database inside the data directory.
const DATABASE_FILE: &str = "taskboard.db";

/// Configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Database file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Username acting on the board.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// IANA time zone used to read and display dates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Base path of generated links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_base: Option<String>,

    /// Default values for new entities.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Activity feed settings.
    #[serde(default)]
    pub activity: ActivityConfig,

    /// Hook callbacks declared in configuration.
    #[serde(default)]
    pub hooks: HooksConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            database: None,
            user: None,
            timezone: None,
            url_base: None,
            defaults: DefaultsConfig::default(),
            activity: ActivityConfig::default(),
            hooks: HooksConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Defaults for new entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Color of new tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Activity feed configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Events shown per project feed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Hook configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Fields merged into every task creation form.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub task_form_defaults: BTreeMap<String, String>,
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/tb/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(path) = env::var("TB_CONFIG") {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            return Ok(parent.to_path_buf());
        }
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("tb"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("tb"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("TB_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Default database location: the platform data directory.
pub fn default_database_path() -> Result<PathBuf> {
    ProjectDirs::from("", "", "taskboard")
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
        .ok_or_else(|| CommandError::Config("Could not determine data directory".to_string()))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    parse_config(&content)
}

/// Parses and validates config file contents.
pub fn parse_config(content: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    if let Some(ref tz) = config.timezone {
        validate_timezone(tz)?;
    }

    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("Settings:");
            if let Some(ref database) = config.database {
                println!("  database: {}", database);
            }
            if let Some(ref user) = config.user {
                println!("  user: {}", user);
            }
            if let Some(ref timezone) = config.timezone {
                println!("  timezone: {}", timezone);
            }
            if let Some(ref url_base) = config.url_base {
                println!("  url_base: {}", url_base);
            }

            println!("\n[defaults]");
            if let Some(ref color) = config.defaults.color {
                println!("  color: {}", color);
            }

            println!("\n[activity]");
            if let Some(limit) = config.activity.limit {
                println!("  limit: {}", limit);
            }

            if !config.hooks.task_form_defaults.is_empty() {
                println!("\n[hooks.task_form_defaults]");
                for (field, value) in &config.hooks.task_form_defaults {
                    println!("  {}: {}", field, value);
                }
            }

            println!("\n[output]");
            if let Some(color) = config.output.color {
                println!("  color: {}", color);
            }
        } else {
            println!("(No config file exists. Run 'tb config set <key> <value>' to create one.)");
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Applies one `key = value` assignment to a config.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    if let Some(name) = key.strip_prefix("hooks.task_form_defaults.") {
        if name.is_empty() || name.contains('.') {
            return Err(CommandError::Config(format!("Invalid hook field '{}'", key)));
        }
        config
            .hooks
            .task_form_defaults
            .insert(name.to_string(), value.to_string());
        return Ok(());
    }

    let (section, field) = match key.split_once('.') {
        Some((section, field)) => (Some(section), field),
        None => (None, key),
    };

    match (section, field) {
        (None, "database") => config.database = Some(value.to_string()),
        (None, "user") => config.user = Some(value.to_string()),
        (None, "timezone") => {
            validate_timezone(value)?;
            config.timezone = Some(value.to_string());
        }
        (None, "url_base") => config.url_base = Some(value.to_string()),
        (Some("defaults"), "color") => {
            if !ColorPalette.exists(value) {
                let valid: Vec<&str> = ColorPalette.list().into_iter().map(|(id, _)| id).collect();
                return Err(CommandError::Config(format!(
                    "Invalid color '{}'. Valid colors: {}",
                    value,
                    valid.join(", ")
                )));
            }
            config.defaults.color = Some(value.to_string());
        }
        (Some("activity"), "limit") => {
            let limit = value
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| {
                    CommandError::Config(format!("Invalid activity limit '{}'", value))
                })?;
            config.activity.limit = Some(limit);
        }
        (Some("output"), "color") => {
            config.output.color = Some(parse_bool(value)?);
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: database, user, timezone, url_base, defaults.color, activity.limit, output.color, hooks.task_form_defaults.<field>",
                key
            )));
        }
    }
    Ok(())
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

fn validate_timezone(name: &str) -> Result<()> {
    name.parse::<chrono_tz::Tz>()
        .map(|_| ())
        .map_err(|_| CommandError::Config(format!("Unknown time zone '{}'", name)))
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}
