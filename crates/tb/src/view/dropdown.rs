//! Task action menu.

use serde::Serialize;
use serde_json::json;
use taskboard_model::models::Task;

use crate::hook::{HookRegistry, TASK_DROPDOWN};
use crate::url::UrlBuilder;

/// One entry of the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub icon: &'static str,
    pub label: &'static str,
    pub link: String,
    /// Opens in a popover instead of navigating.
    pub popover: bool,
}

/// View model of `task/dropdown.html`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDropdown {
    pub task_id: i64,
    pub project_id: i64,
    pub items: Vec<MenuItem>,
    /// Markup contributed by `template:task:dropdown` callbacks.
    pub hook_markup: String,
}

/// Entries shown for every task: icon, label, controller, action.
const COMMON_ITEMS: [(&str, &str, &str, &str); 12] = [
    ("user", "Change assignee", "TaskPopoverController", "changeAssignee"),
    ("tag", "Change category", "TaskPopoverController", "changeCategory"),
    ("pencil-square-o", "Edit the task", "TaskModificationController", "edit"),
    ("align-left", "Edit the description", "TaskModificationController", "description"),
    ("plus", "Add a sub-task", "SubtaskController", "create"),
    ("code-fork", "Add internal link", "TaskInternalLinkController", "create"),
    ("external-link", "Add external link", "TaskExternalLinkController", "find"),
    ("comment-o", "Add a comment", "CommentController", "create"),
    ("camera", "Add a screenshot", "TaskPopoverController", "screenshot"),
    ("files-o", "Duplicate", "TaskDuplicationController", "duplicate"),
    ("clipboard", "Duplicate to another project", "TaskDuplicationController", "copy"),
    ("clone", "Move to another project", "TaskDuplicationController", "move"),
];

impl TaskDropdown {
    /// Builds the menu of `task` for a viewer who may or may not remove it.
    pub fn build(task: &Task, can_remove: bool, urls: &UrlBuilder, hooks: &HookRegistry) -> Self {
        let params = [
            ("task_id", task.id.to_string()),
            ("project_id", task.project_id.to_string()),
        ];
        let item = |icon, label, controller, action, popover| MenuItem {
            icon,
            label,
            link: urls.to(controller, action, &params),
            popover,
        };

        let mut items = Vec::with_capacity(COMMON_ITEMS.len() + 3);
        if task.date_started.is_none() {
            items.push(item(
                "play",
                "Set automatically the start date",
                "TaskModificationController",
                "start",
                false,
            ));
        }
        for (icon, label, controller, action) in COMMON_ITEMS {
            items.push(item(icon, label, controller, action, true));
        }
        if can_remove {
            items.push(item("trash-o", "Remove", "TaskViewController", "remove", true));
        }
        if task.is_open() {
            items.push(item("times", "Close this task", "TaskStatusController", "close", true));
        } else {
            items.push(item(
                "check-square-o",
                "Open this task",
                "TaskStatusController",
                "open",
                true,
            ));
        }

        let hook_markup = hooks.render(TASK_DROPDOWN, &json!({ "task": task }));

        Self {
            task_id: task.id,
            project_id: task.project_id,
            items,
            hook_markup,
        }
    }

    /// Returns true if an entry with `label` is present.
    pub fn has(&self, label: &str) -> bool {
        self.items.iter().any(|item| item.label == label)
    }
}
