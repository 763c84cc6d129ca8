//! Activity feed recording.

use log::warn;
use serde_json::{Map, Value};
use taskboard_model::models::{NewActivity, Task};
use taskboard_model::store::ActivityStore;

/// Appends task events to the project activity feed.
///
/// Recording is best effort: a failed insert is logged and never undoes the
/// action that triggered it.
pub struct ActivityRecorder<'a> {
    store: &'a dyn ActivityStore,
    creator_id: i64,
}

impl<'a> ActivityRecorder<'a> {
    pub fn new(store: &'a dyn ActivityStore, creator_id: i64) -> Self {
        Self { store, creator_id }
    }

    /// Records `event_name` with a snapshot of `task`.
    pub fn task_event(&self, event_name: &str, task: &Task) -> Option<i64> {
        let mut data = Map::new();
        match serde_json::to_value(task) {
            Ok(snapshot) => {
                data.insert("task".to_string(), snapshot);
            }
            Err(err) => {
                warn!("event=activity_snapshot module=activity status=error task_id={} error={err}", task.id);
                data.insert("task".to_string(), Value::Object(Map::new()));
            }
        }

        let activity = NewActivity {
            event_name: event_name.to_string(),
            creator_id: Some(self.creator_id),
            project_id: task.project_id,
            task_id: Some(task.id),
            data,
        };
        match self.store.create(&activity) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(
                    "event=activity_record module=activity status=error event_name={event_name} task_id={} error={err}",
                    task.id
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::fixture;
    use taskboard_model::models::events;

    #[test]
    fn test_task_event_stores_snapshot() {
        let fx = fixture();
        let task = fx.task(fx.website, "Write docs");
        let store = fx.app.activities();
        let recorder = ActivityRecorder::new(&store, fx.alice.id);

        let id = recorder.task_event(events::TASK_CREATE, &task).unwrap();
        let activity = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(activity.event_name, "task.create");
        assert_eq!(activity.task_id, Some(task.id));
        assert_eq!(activity.creator_id, Some(fx.alice.id));
        assert_eq!(activity.data["task"]["title"], "Write docs");
    }
}
