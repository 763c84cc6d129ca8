//! Enumerations shared by several entities.
//!
//! The database stores these as small integers or short strings; each type
//! converts to and from its persisted form and carries its display label.

use serde::{Deserialize, Serialize};

/// Project visibility type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Shared project with explicit members.
    Team,
    /// Personal project visible to its owner only.
    Private,
}

impl ProjectType {
    /// Returns the value stored in `projects.is_private`.
    pub fn as_db(self) -> i64 {
        match self {
            ProjectType::Team => 0,
            ProjectType::Private => 1,
        }
    }

    /// Converts a `projects.is_private` value.
    pub fn from_db(value: i64) -> Self {
        if value == 0 {
            ProjectType::Team
        } else {
            ProjectType::Private
        }
    }
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Inactive,
}

impl ProjectStatus {
    /// Returns the value stored in `projects.is_active`.
    pub fn as_db(self) -> i64 {
        match self {
            ProjectStatus::Active => 1,
            ProjectStatus::Inactive => 0,
        }
    }

    /// Converts a `projects.is_active` value.
    pub fn from_db(value: i64) -> Self {
        if value == 0 {
            ProjectStatus::Inactive
        } else {
            ProjectStatus::Active
        }
    }
}

/// Task open/closed status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Closed,
}

impl TaskStatus {
    /// Returns the value stored in `tasks.is_active`.
    pub fn as_db(self) -> i64 {
        match self {
            TaskStatus::Open => 1,
            TaskStatus::Closed => 0,
        }
    }

    /// Converts a `tasks.is_active` value.
    pub fn from_db(value: i64) -> Self {
        if value == 0 {
            TaskStatus::Closed
        } else {
            TaskStatus::Open
        }
    }

    /// Parses a search keyword (`open`, `closed`, `active`, `inactive`).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_lowercase().as_str() {
            "open" | "active" | "opened" => Some(TaskStatus::Open),
            "closed" | "inactive" | "done" => Some(TaskStatus::Closed),
            _ => None,
        }
    }
}

/// Application-wide user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "app-admin")]
    Admin,
    #[serde(rename = "app-user")]
    User,
}

impl UserRole {
    /// Returns the persisted role name.
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "app-admin",
            UserRole::User => "app-user",
        }
    }

    /// Parses a persisted role name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "app-admin" => Some(UserRole::Admin),
            "app-user" => Some(UserRole::User),
            _ => None,
        }
    }
}

/// Role of a user inside one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectRole {
    #[serde(rename = "project-manager")]
    Manager,
    #[serde(rename = "project-member")]
    Member,
    #[serde(rename = "project-viewer")]
    Viewer,
}

impl ProjectRole {
    /// All roles, highest privilege first.
    pub const ALL: [ProjectRole; 3] = [ProjectRole::Manager, ProjectRole::Member, ProjectRole::Viewer];

    /// Returns the persisted role name.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectRole::Manager => "project-manager",
            ProjectRole::Member => "project-member",
            ProjectRole::Viewer => "project-viewer",
        }
    }

    /// Parses a persisted role name, also accepting the short forms used on
    /// the command line (`manager`, `member`, `viewer`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "project-manager" | "manager" => Some(ProjectRole::Manager),
            "project-member" | "member" => Some(ProjectRole::Member),
            "project-viewer" | "viewer" => Some(ProjectRole::Viewer),
            _ => None,
        }
    }

    /// Returns true if the role may create and modify tasks.
    pub fn can_edit(self) -> bool {
        matches!(self, ProjectRole::Manager | ProjectRole::Member)
    }
}

/// Declares a recurrence enum with an integer representation and a label.
macro_rules! recurrence_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $value:literal => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Returns the persisted integer value.
            pub fn as_db(self) -> i64 {
                match self {
                    $($name::$variant => $value),+
                }
            }

            /// Converts a persisted integer value.
            pub fn from_db(value: i64) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Returns the human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }
    };
}

recurrence_enum! {
    /// Whether a task generates a follow-up occurrence.
    RecurrenceStatus {
        None = 0 => "No",
        Pending = 1 => "Yes",
        Processed = 2 => "Processed",
    }
}

impl RecurrenceStatus {
    /// Choices offered on the recurrence form.
    ///
    /// `Processed` is set by the system and is not selectable.
    pub fn choices() -> Vec<(i64, &'static str)> {
        [RecurrenceStatus::None, RecurrenceStatus::Pending]
            .iter()
            .map(|s| (s.as_db(), s.label()))
            .collect()
    }
}

recurrence_enum! {
    /// Event that spawns the next occurrence.
    RecurrenceTrigger {
        FirstColumn = 0 => "When task is moved from first column",
        LastColumn = 1 => "When task is moved to last column",
        Close = 2 => "When task is closed",
    }
}

recurrence_enum! {
    /// Unit of the recurrence factor.
    RecurrenceTimeframe {
        Days = 0 => "Day(s)",
        Months = 1 => "Month(s)",
        Years = 2 => "Year(s)",
    }
}

recurrence_enum! {
    /// Date the next due date is computed from.
    RecurrenceBasedate {
        DueDate = 0 => "Existing due date",
        TriggerDate = 1 => "Action date",
    }
}

impl RecurrenceTrigger {
    /// Choices offered on the recurrence form.
    pub fn choices() -> Vec<(i64, &'static str)> {
        [
            RecurrenceTrigger::FirstColumn,
            RecurrenceTrigger::LastColumn,
            RecurrenceTrigger::Close,
        ]
        .iter()
        .map(|t| (t.as_db(), t.label()))
        .collect()
    }
}

impl RecurrenceTimeframe {
    /// Choices offered on the recurrence form.
    pub fn choices() -> Vec<(i64, &'static str)> {
        [
            RecurrenceTimeframe::Days,
            RecurrenceTimeframe::Months,
            RecurrenceTimeframe::Years,
        ]
        .iter()
        .map(|t| (t.as_db(), t.label()))
        .collect()
    }
}

impl RecurrenceBasedate {
    /// Choices offered on the recurrence form.
    pub fn choices() -> Vec<(i64, &'static str)> {
        [RecurrenceBasedate::DueDate, RecurrenceBasedate::TriggerDate]
            .iter()
            .map(|b| (b.as_db(), b.label()))
            .collect()
    }
}
