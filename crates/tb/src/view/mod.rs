//! HTML views.
//!
//! Templates are compiled into the binary and rendered with minijinja. Every
//! template name ends in `.html`, so values are HTML-escaped unless a template
//! marks them `|safe` (hook markup only).

mod dropdown;

pub use dropdown::{MenuItem, TaskDropdown};

use minijinja::{Environment, UndefinedBehavior, Value};
use serde_json::json;

const TEMPLATES: [(&str, &str); 10] = [
    ("layout.html", include_str!("../../templates/layout.html")),
    ("gantt/projects.html", include_str!("../../templates/gantt/projects.html")),
    ("gantt/project.html", include_str!("../../templates/gantt/project.html")),
    (
        "gantt/task_creation.html",
        include_str!("../../templates/gantt/task_creation.html"),
    ),
    (
        "task_recurrence/edit.html",
        include_str!("../../templates/task_recurrence/edit.html"),
    ),
    ("task/dropdown.html", include_str!("../../templates/task/dropdown.html")),
    ("activity/events.html", include_str!("../../templates/activity/events.html")),
    ("error/not_found.html", include_str!("../../templates/error/not_found.html")),
    ("error/forbidden.html", include_str!("../../templates/error/forbidden.html")),
    ("error/internal.html", include_str!("../../templates/error/internal.html")),
];

/// The template environment.
pub struct View {
    env: Environment<'static>,
}

impl View {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        env.add_filter("ymd", |parts: Vec<i32>| -> String {
            match parts.as_slice() {
                [y, m, d] => format!("{y:04}-{m:02}-{d:02}"),
                _ => String::new(),
            }
        });
        Ok(Self { env })
    }

    /// Renders a registered template with a JSON view model.
    pub fn render(&self, template: &str, data: &serde_json::Value) -> Result<String, minijinja::Error> {
        self.env
            .get_template(template)?
            .render(Value::from_serialize(data))
    }
}

/// `[{"value": …, "label": …}]` entries for a select list.
pub fn choices<K: ToString, L: ToString>(pairs: impl IntoIterator<Item = (K, L)>) -> serde_json::Value {
    pairs
        .into_iter()
        .map(|(value, label)| json!({ "value": value.to_string(), "label": label.to_string() }))
        .collect()
}
