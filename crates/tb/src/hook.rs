//! Named extension points.
//!
//! Two kinds of callbacks can be attached to a hook name:
//!
//! - merge callbacks return field values that are merged over the values
//!   passed in (`controller:task:form:default`, ...);
//! - render callbacks return markup that is appended where a template asks
//!   for it (`template:task:dropdown`, ...).
//!
//! The registry is owned by the [`App`](crate::app::App) and lives exactly as
//! long as it does.

use std::collections::BTreeMap;

use log::debug;
use serde_json::Value;
use taskboard_model::values::Values;

/// Defaults of the task creation form.
pub const TASK_FORM_DEFAULT: &str = "controller:task:form:default";
/// Defaults of the Gantt task creation form.
pub const GANTT_TASK_FORM_DEFAULT: &str = "controller:gantt:task:form:default";
/// Extra entries of the task action menu.
pub const TASK_DROPDOWN: &str = "template:task:dropdown";

type MergeCallback = Box<dyn Fn(&Values) -> Values>;
type RenderCallback = Box<dyn Fn(&Value) -> String>;

/// Registry of merge and render callbacks.
#[derive(Default)]
pub struct HookRegistry {
    merges: BTreeMap<String, Vec<MergeCallback>>,
    renders: BTreeMap<String, Vec<RenderCallback>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a merge callback. The callback receives the context values and
    /// returns the fields to override.
    pub fn on_merge(&mut self, name: &str, callback: impl Fn(&Values) -> Values + 'static) {
        self.merges
            .entry(name.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Attaches a render callback.
    pub fn on_render(&mut self, name: &str, callback: impl Fn(&Value) -> String + 'static) {
        self.renders
            .entry(name.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Runs the merge callbacks of `name` in registration order, each result
    /// merged over the values so far.
    pub fn merge(&self, name: &str, values: Values, context: &Values) -> Values {
        let Some(callbacks) = self.merges.get(name) else {
            return values;
        };
        debug!(
            "event=hook_merge module=hook name={name} callbacks={}",
            callbacks.len()
        );
        callbacks.iter().fold(values, |mut merged, callback| {
            merged.merge(&callback(context));
            merged
        })
    }

    /// Concatenates the markup of every render callback of `name`.
    pub fn render(&self, name: &str, context: &Value) -> String {
        self.renders
            .get(name)
            .map(|callbacks| callbacks.iter().map(|callback| callback(context)).collect())
            .unwrap_or_default()
    }

    /// Returns true if anything is attached to `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.merges.contains_key(name) || self.renders.contains_key(name)
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("merges", &self.merges.keys().collect::<Vec<_>>())
            .field("renders", &self.renders.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_without_callbacks_returns_input() {
        let hooks = HookRegistry::new();
        let values = Values::new().with("position", 1);
        assert_eq!(hooks.merge(TASK_FORM_DEFAULT, values.clone(), &values), values);
    }

    #[test]
    fn test_merge_runs_in_registration_order() {
        let mut hooks = HookRegistry::new();
        hooks.on_merge(TASK_FORM_DEFAULT, |_| Values::new().with("color_id", "red"));
        hooks.on_merge(TASK_FORM_DEFAULT, |_| Values::new().with("color_id", "blue"));

        let values = Values::new().with("color_id", "yellow").with("position", 1);
        let merged = hooks.merge(TASK_FORM_DEFAULT, values.clone(), &values);
        assert_eq!(merged.get("color_id"), Some("blue"));
        assert_eq!(merged.get("position"), Some("1"));
    }

    #[test]
    fn test_merge_callback_sees_context() {
        let mut hooks = HookRegistry::new();
        hooks.on_merge(GANTT_TASK_FORM_DEFAULT, |context| {
            Values::new().with("title", format!("Task for {}", context.get("project_id").unwrap_or("?")))
        });
        let values = Values::new().with("project_id", 3);
        let merged = hooks.merge(GANTT_TASK_FORM_DEFAULT, values.clone(), &values);
        assert_eq!(merged.get("title"), Some("Task for 3"));
    }

    #[test]
    fn test_render_concatenates() {
        let mut hooks = HookRegistry::new();
        hooks.on_render(TASK_DROPDOWN, |ctx| format!("<li>{}</li>", ctx["task"]["id"]));
        hooks.on_render(TASK_DROPDOWN, |_| "<li>b</li>".to_string());

        let markup = hooks.render(TASK_DROPDOWN, &json!({ "task": { "id": 4 } }));
        assert_eq!(markup, "<li>4</li><li>b</li>");
        assert_eq!(hooks.render("template:unknown", &json!({})), "");
        assert!(hooks.exists(TASK_DROPDOWN));
    }
}
