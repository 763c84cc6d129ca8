//! Activity feeds scoped to what the current user may see.

use log::{debug, warn};
use rusqlite::Connection;
use taskboard_model::permission::ProjectPermission;
use taskboard_query::filter::{ActivityFilter, SearchLexer};
use taskboard_query::formatter::{ActivityEvent, ActivityEventFormatter};
use taskboard_query::{QueryBuilder, QueryResult};

/// Maximum number of events returned by a search.
pub const SEARCH_LIMIT: usize = 500;

pub struct ProjectActivityHelper<'a> {
    conn: &'a Connection,
    permission: &'a dyn ProjectPermission,
    lexer: &'a dyn SearchLexer<Filter = ActivityFilter>,
    formatter: ActivityEventFormatter,
    user_id: i64,
}

impl<'a> ProjectActivityHelper<'a> {
    pub fn new(
        conn: &'a Connection,
        permission: &'a dyn ProjectPermission,
        lexer: &'a dyn SearchLexer<Filter = ActivityFilter>,
        formatter: ActivityEventFormatter,
        user_id: i64,
    ) -> Self {
        Self {
            conn,
            permission,
            lexer,
            formatter,
            user_id,
        }
    }

    /// Searches the events of every project the user belongs to, newest
    /// first.
    ///
    /// A blank search returns nothing; a search that does not parse is
    /// logged and returns nothing.
    pub fn search_events(&self, search: &str) -> QueryResult<Vec<ActivityEvent>> {
        if search.trim().is_empty() {
            return Ok(Vec::new());
        }

        let builder = match self.lexer.build(search) {
            Ok(builder) => builder,
            Err(err) => {
                warn!("event=activity_search module=helper status=invalid user_id={} error={err}", self.user_id);
                return Ok(Vec::new());
            }
        };

        let project_ids = self.visible_project_ids()?;
        let mut builder = builder.with_filter(ActivityFilter::ProjectIds(project_ids));
        builder.query_mut().desc("project_activities.id").limit(SEARCH_LIMIT);
        self.format(&builder)
    }

    /// Latest events of one project.
    pub fn get_project_events(&self, project_id: i64, limit: usize) -> QueryResult<Vec<ActivityEvent>> {
        let mut builder = QueryBuilder::new().with_filter(ActivityFilter::ProjectId(project_id));
        builder.query_mut().desc("project_activities.id").limit(limit);
        self.format(&builder)
    }

    /// Latest events across several projects.
    pub fn get_projects_events(&self, project_ids: &[i64], limit: usize) -> QueryResult<Vec<ActivityEvent>> {
        let mut builder = QueryBuilder::new().with_filter(ActivityFilter::ProjectIds(project_ids.to_vec()));
        builder.query_mut().desc("project_activities.id").limit(limit);
        self.format(&builder)
    }

    /// Every event of one task.
    pub fn get_task_events(&self, task_id: i64) -> QueryResult<Vec<ActivityEvent>> {
        let mut builder = QueryBuilder::new().with_filter(ActivityFilter::TaskId(task_id));
        builder.query_mut().desc("project_activities.id");
        self.format(&builder)
    }

    fn visible_project_ids(&self) -> QueryResult<Vec<i64>> {
        Ok(self
            .permission
            .projects_by_user(self.user_id)?
            .into_keys()
            .collect())
    }

    fn format(&self, builder: &QueryBuilder<ActivityFilter>) -> QueryResult<Vec<ActivityEvent>> {
        let events = builder.format(self.conn, &self.formatter)?;
        debug!("event=activity_events module=helper count={}", events.len());
        Ok(events)
    }
}
