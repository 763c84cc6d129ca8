//! Controller responses and the per-invocation session.

use std::cell::RefCell;

use serde::Serialize;
use serde_json::{json, Value};

static NO_DATA: Value = Value::Null;

/// Result of one controller action.
///
/// Pages carry their view model and the template that renders it; rendering
/// happens at the output boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Page {
        status: u16,
        template: &'static str,
        data: Value,
    },
    Json {
        status: u16,
        body: Value,
    },
    Redirect {
        location: String,
    },
}

impl Response {
    pub fn page(template: &'static str, data: Value) -> Self {
        Response::Page {
            status: 200,
            template,
            data,
        }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Response::Json { status, body }
    }

    /// `{"message": …}` with a status code.
    pub fn message(status: u16, message: &str) -> Self {
        Response::json(status, json!({ "message": message }))
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Response::Redirect {
            location: location.into(),
        }
    }

    pub fn not_found() -> Self {
        Response::Page {
            status: 404,
            template: "error/not_found.html",
            data: json!({ "title": "Page not found" }),
        }
    }

    pub fn forbidden() -> Self {
        Response::Page {
            status: 403,
            template: "error/forbidden.html",
            data: json!({ "title": "Access Forbidden" }),
        }
    }

    /// Generic failure page for errors the user cannot fix.
    pub fn internal_error(message: impl std::fmt::Display) -> Self {
        Response::Page {
            status: 500,
            template: "error/internal.html",
            data: json!({ "title": "Internal error", "message": message.to_string() }),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Response::Page { status, .. } | Response::Json { status, .. } => *status,
            Response::Redirect { .. } => 302,
        }
    }

    /// The view model or JSON body; `Null` for redirects.
    pub fn data(&self) -> &Value {
        match self {
            Response::Page { data, .. } => data,
            Response::Json { body, .. } => body,
            Response::Redirect { .. } => &NO_DATA,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() < 400
    }
}

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Failure,
}

/// A one-shot message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// State of the current invocation: flash messages queued by controllers.
#[derive(Debug, Default)]
pub struct Session {
    flashes: RefCell<Vec<Flash>>,
}

impl Session {
    pub fn success(&self, message: impl Into<String>) {
        self.push(FlashLevel::Success, message.into());
    }

    pub fn failure(&self, message: impl Into<String>) {
        self.push(FlashLevel::Failure, message.into());
    }

    fn push(&self, level: FlashLevel, message: String) {
        self.flashes.borrow_mut().push(Flash { level, message });
    }

    /// Removes and returns the queued messages.
    pub fn take_flashes(&self) -> Vec<Flash> {
        self.flashes.take()
    }
}
