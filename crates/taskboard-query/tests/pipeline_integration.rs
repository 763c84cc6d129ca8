//! Integration tests for the search pipeline.
//!
//! Each test seeds a real SQLite database, runs lexer output through a
//! `QueryBuilder` and checks the rows or view models that come back.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;
use taskboard_model::prelude::*;
use taskboard_query::filter::{
    ActivityFilter, ActivityLexer, ProjectFilter, TaskFilter, TaskLexer,
};
use taskboard_query::formatter::{
    ActivityEventFormatter, ProjectGanttFormatter, TaskGanttFormatter,
};
use taskboard_query::{Formatter, LinkBuilder, QueryBuilder, Record};

/// Link builder producing `controller/action?k=v` strings.
struct PlainLinks;

impl LinkBuilder for PlainLinks {
    fn link(&self, controller: &str, action: &str, params: &[(&str, String)]) -> String {
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{controller}/{action}?{}", query.join("&"))
    }
}

fn dates() -> DateParser {
    DateParser::default().with_now(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap())
}

struct Fixture {
    conn: Connection,
    alice: i64,
    bob: i64,
    website: i64,
    mobile: i64,
}

fn fixture() -> Fixture {
    let conn = open_db_in_memory().expect("open db");
    let (alice, bob, website, mobile) = {
        let users = SqliteUserStore::new(&conn);
        let mut alice = NewUser::new("alice");
        alice.name = "Alice Doe".to_string();
        let alice = users.create(&alice).expect("create alice");
        let bob = users.create(&NewUser::new("bob")).expect("create bob");

        let projects = SqliteProjectStore::new(&conn);
        let mut website = NewProject::team("Website").owned_by(alice);
        website.start_date = Some("2024-02-01".to_string());
        website.end_date = Some("2024-03-01".to_string());
        let website = projects.create(&website).expect("create website");
        let mobile = projects
            .create(&NewProject::team("Mobile").owned_by(bob))
            .expect("create mobile");
        (alice, bob, website, mobile)
    };
    Fixture {
        conn,
        alice,
        bob,
        website,
        mobile,
    }
}

fn create_task(conn: &Connection, task: NewTask) -> i64 {
    SqliteTaskStore::new(conn).create(&task).expect("create task")
}

fn ids(records: &[Record]) -> Vec<i64> {
    records.iter().filter_map(|r| r.int("id")).collect()
}

#[test]
fn test_filters_are_anded() {
    let f = fixture();
    let mut mine = NewTask::new(f.website, "Fix login");
    mine.owner_id = Some(f.alice);
    let mine = create_task(&f.conn, mine);
    create_task(&f.conn, NewTask::new(f.website, "Fix logout"));
    let mut other = NewTask::new(f.mobile, "Fix login on mobile");
    other.owner_id = Some(f.alice);
    create_task(&f.conn, other);

    let builder = QueryBuilder::new()
        .with_filter(TaskFilter::Project(f.website))
        .with_filter(TaskFilter::Title("login".to_string()))
        .with_filter(TaskFilter::Assignee(
            taskboard_query::filter::AssigneeMatch::User(f.alice),
        ));

    let records = builder.records(&f.conn).expect("records");
    assert_eq!(ids(&records), vec![mine]);
}

#[test]
fn test_empty_project_set_returns_nothing() {
    let f = fixture();
    create_task(&f.conn, NewTask::new(f.website, "Anything"));

    let records = QueryBuilder::new()
        .with_filter(TaskFilter::ProjectIds(vec![]))
        .records(&f.conn)
        .expect("records");
    assert!(records.is_empty());

    let projects = QueryBuilder::new()
        .with_filter(ProjectFilter::Ids(vec![]))
        .records(&f.conn)
        .expect("records");
    assert!(projects.is_empty());
}

#[test]
fn test_lexer_search_against_database() {
    let f = fixture();
    let mut red = NewTask::new(f.website, "Landing page");
    red.color_id = Some("red".to_string());
    red.owner_id = Some(f.bob);
    let red = create_task(&f.conn, red);
    let mut blue = NewTask::new(f.website, "Pricing page");
    blue.color_id = Some("blue".to_string());
    let blue = create_task(&f.conn, blue);
    let mut green = NewTask::new(f.website, "Footer");
    green.color_id = Some("green".to_string());
    create_task(&f.conn, green);

    let lexer = TaskLexer::new(f.bob, dates());

    let builder = lexer.build("color:red color:blue").expect("parse");
    let mut found = ids(&builder.records(&f.conn).expect("records"));
    found.sort_unstable();
    assert_eq!(found, vec![red, blue]);

    let builder = lexer.build("assignee:me page").expect("parse");
    assert_eq!(ids(&builder.records(&f.conn).expect("records")), vec![red]);

    let builder = lexer.build("assignee:nobody").expect("parse");
    let mut unassigned = ids(&builder.records(&f.conn).expect("records"));
    unassigned.sort_unstable();
    assert_eq!(unassigned.len(), 2);
    assert!(!unassigned.contains(&red));
}

#[test]
fn test_status_and_column_search() {
    let f = fixture();
    let open = create_task(&f.conn, NewTask::new(f.website, "Open one"));
    let closed = create_task(&f.conn, NewTask::new(f.website, "Closed one"));
    SqliteTaskStore::new(&f.conn)
        .update(closed, &Changes::new().set("is_active", 0_i64))
        .expect("close");

    let lexer = TaskLexer::new(f.alice, dates());
    let open_ids = ids(
        &lexer
            .build("status:open project:Website")
            .expect("parse")
            .records(&f.conn)
            .expect("records"),
    );
    assert_eq!(open_ids, vec![open]);

    let backlog = lexer
        .build(r#"column:backlog status:closed"#)
        .expect("parse")
        .records(&f.conn)
        .expect("records");
    assert_eq!(ids(&backlog), vec![closed]);
}

#[test]
fn test_due_date_excludes_unset_dates() {
    let f = fixture();
    let dates = dates();
    let mut due = NewTask::new(f.website, "Due soon");
    due.date_due = dates.parse_timestamp("2024-01-16");
    let due = create_task(&f.conn, due);
    create_task(&f.conn, NewTask::new(f.website, "No due date"));

    let records = TaskLexer::new(f.alice, dates)
        .build("due:<=tomorrow")
        .expect("parse")
        .records(&f.conn)
        .expect("records");
    assert_eq!(ids(&records), vec![due]);
}

#[test]
fn test_due_on_epoch_day_excludes_unset_dates() {
    let f = fixture();
    create_task(&f.conn, NewTask::new(f.website, "No due date"));

    let lexer = TaskLexer::new(f.alice, dates());
    for search in ["due:1970-01-01", "due:<=1970-01-01", "due:<1970-01-02"] {
        let records = lexer
            .build(search)
            .expect("parse")
            .records(&f.conn)
            .expect("records");
        assert!(records.is_empty(), "{search} matched an unset due date");
    }
}

#[test]
fn test_sort_order_is_preserved() {
    let f = fixture();
    let first = create_task(&f.conn, NewTask::new(f.website, "b"));
    let second = create_task(&f.conn, NewTask::new(f.website, "a"));

    let mut builder = QueryBuilder::new().with_filter(TaskFilter::Project(f.website));
    builder.query_mut().asc("tasks.title");
    assert_eq!(ids(&builder.records(&f.conn).expect("records")), vec![second, first]);

    builder.query_mut().limit(1);
    assert_eq!(ids(&builder.records(&f.conn).expect("records")), vec![second]);
}

#[test]
fn test_running_twice_gives_same_sql_and_rows() {
    let f = fixture();
    create_task(&f.conn, NewTask::new(f.website, "Once"));
    let builder = QueryBuilder::new().with_filter(TaskFilter::Project(f.website));

    assert_eq!(builder.build().to_sql(), builder.build().to_sql());
    assert!(builder.query().conditions().is_empty());
    assert_eq!(builder.build().conditions().len(), 1);
    assert_eq!(
        builder.records(&f.conn).expect("first"),
        builder.records(&f.conn).expect("second")
    );
}

#[test]
fn test_task_gantt_progress() {
    let f = fixture();
    let board = SqliteBoardStore::new(&f.conn);
    let columns = board.columns(f.website).expect("columns");
    assert_eq!(columns.len(), 4);

    let mut ready = NewTask::new(f.website, "In ready");
    ready.column_id = Some(columns[1].id);
    ready.owner_id = Some(f.alice);
    let ready = create_task(&f.conn, ready);
    let closed = create_task(&f.conn, NewTask::new(f.website, "Closed"));
    SqliteTaskStore::new(&f.conn)
        .update(closed, &Changes::new().set("is_active", 0_i64))
        .expect("close");

    let mut builder = QueryBuilder::new().with_filter(TaskFilter::Project(f.website));
    builder.query_mut().asc("tasks.id");
    let formatter = TaskGanttFormatter::new(&board, &PlainLinks, dates());
    let bars = builder.format(&f.conn, &formatter).expect("format");

    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].id, ready);
    assert_eq!(bars[0].progress, 25.0);
    assert_eq!(bars[0].progress_label(), "25%");
    assert_eq!(bars[0].assignee, "Alice Doe");
    assert_eq!(bars[0].column_title, "Ready");
    assert!(bars[0].not_defined);
    assert_eq!(bars[0].start, [2024, 1, 15]);
    assert_eq!(
        bars[0].link,
        format!("TaskViewController/show?project_id={}&task_id={ready}", f.website)
    );
    assert_eq!(bars[1].progress, 100.0);
}

#[test]
fn test_project_gantt_bars() {
    let f = fixture();
    let permission = SqliteProjectPermission::new(&f.conn);
    permission
        .add_user(f.website, f.bob, ProjectRole::Member)
        .expect("add member");

    let mut builder = QueryBuilder::new().with_filter(ProjectFilter::Ids(vec![f.website, f.mobile]));
    builder.query_mut().asc("projects.id");
    let formatter = ProjectGanttFormatter::new(&permission, &PlainLinks, dates());
    let bars = builder.format(&f.conn, &formatter).expect("format");

    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].title, "Website");
    assert_eq!(bars[0].start, [2024, 2, 1]);
    assert_eq!(bars[0].end, [2024, 3, 1]);
    assert!(!bars[0].not_defined);
    assert_eq!(bars[0].gantt_link, format!("GanttController/project?project_id={}", f.website));

    let mut expected = BTreeMap::new();
    expected.insert("project-manager".to_string(), vec!["Alice Doe".to_string()]);
    expected.insert("project-member".to_string(), vec!["bob".to_string()]);
    assert_eq!(bars[0].users, expected);

    assert!(bars[1].not_defined);
    assert_eq!(bars[1].start, [2024, 1, 15]);
    assert_eq!(bars[1].end, bars[1].start);
}

#[test]
fn test_activity_feed_formatting() {
    let temp_dir = tempdir().expect("temp dir");
    let conn = open_db(temp_dir.path().join("feed.db")).expect("open db");
    let alice = SqliteUserStore::new(&conn)
        .create(&NewUser::new("alice"))
        .expect("create user");
    let project = SqliteProjectStore::new(&conn)
        .create(&NewProject::team("Website").owned_by(alice))
        .expect("create project");
    let task = create_task(&conn, NewTask::new(project, "Fix login"));

    let activities = SqliteActivityStore::new(&conn);
    for event_name in [events::TASK_CREATE, events::TASK_CLOSE] {
        let data = json!({ "task": { "id": task, "title": "Fix login" } });
        activities
            .create(&NewActivity {
                event_name: event_name.to_string(),
                creator_id: Some(alice),
                project_id: project,
                task_id: Some(task),
                data: data.as_object().cloned().unwrap_or_default(),
            })
            .expect("record activity");
    }

    let mut builder = ActivityLexer::new(alice, dates())
        .build("creator:me")
        .expect("parse")
        .with_filter(ActivityFilter::ProjectIds(vec![project]));
    builder.query_mut().desc("project_activities.id");
    let feed = builder
        .format(&conn, &ActivityEventFormatter::new(dates()))
        .expect("format");

    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].event_title, format!("alice closed the task #{task}"));
    assert_eq!(feed[1].event_title, format!("alice created the task #{task}"));
    assert_eq!(feed[0].event_content, "Fix login");
    assert_eq!(feed[0].project_name, "Website");
}

#[test]
fn test_formatter_is_pure() {
    let record = Record::from_pairs([("id", rusqlite::types::Value::Integer(1))]);
    let formatter = ActivityEventFormatter::new(dates());
    assert_eq!(formatter.map(&record), formatter.map(&record));
}
