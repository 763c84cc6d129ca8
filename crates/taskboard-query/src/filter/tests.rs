use chrono::{TimeZone, Utc};
use rusqlite::types::Value;
use taskboard_model::date::DateParser;
use taskboard_model::models::{ProjectStatus, TaskStatus};

use super::*;

fn dates() -> DateParser {
    DateParser::default().with_now(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap())
}

fn task_lexer() -> TaskLexer {
    TaskLexer::new(7, dates())
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

#[test]
fn test_project_ids_empty_matches_nothing() {
    let condition = ProjectFilter::Ids(vec![]).condition();
    assert_eq!(condition.sql(), "0 = 1");
    assert!(condition.params().is_empty());
}

#[test]
fn test_project_status_binds_flag() {
    let condition = ProjectFilter::Status(ProjectStatus::Inactive).condition();
    assert_eq!(condition.params(), &[Value::Integer(0)]);
}

#[test]
fn test_title_with_id_matches_id_or_title() {
    let condition = TaskFilter::Title("#12".to_string()).condition();
    assert!(condition.sql().contains("tasks.id"));
    assert!(condition.sql().contains("LIKE"));
    assert_eq!(condition.params()[0], Value::Integer(12));
}

#[test]
fn test_plain_title_has_no_id_branch() {
    let condition = TaskFilter::Title("login".to_string()).condition();
    assert!(!condition.sql().contains("tasks.id"));
}

#[test]
fn test_any_of_empty_matches_nothing() {
    assert_eq!(TaskFilter::Any(vec![]).condition().sql(), "0 = 1");
    assert_eq!(ActivityFilter::Any(vec![]).condition().sql(), "0 = 1");
}

#[test]
fn test_apply_adds_one_condition() {
    let mut query = TaskFilter::base_query();
    TaskFilter::Project(3).apply(&mut query);
    TaskFilter::Status(TaskStatus::Open).apply(&mut query);
    assert_eq!(query.conditions().len(), 2);
}

#[test]
fn test_parse_id() {
    assert_eq!(parse_id("#42"), Some(42));
    assert_eq!(parse_id(" 7 "), Some(7));
    assert_eq!(parse_id("0"), None);
    assert_eq!(parse_id("abc"), None);
}

// ---------------------------------------------------------------------------
// Task lexer
// ---------------------------------------------------------------------------

#[test]
fn test_empty_search_is_an_error() {
    assert_eq!(task_lexer().parse("   "), Err(FilterError::EmptyExpression));
    assert!(matches!(task_lexer().build(""), Err(FilterError::EmptyExpression)));
}

#[test]
fn test_assignee_me_resolves_current_user() {
    let filters = task_lexer().parse("assignee:me").unwrap();
    assert_eq!(filters, vec![TaskFilter::Assignee(AssigneeMatch::User(7))]);
}

#[test]
fn test_assignee_nobody_and_name() {
    let filters = task_lexer().parse("assignee:nobody").unwrap();
    assert_eq!(filters, vec![TaskFilter::Assignee(AssigneeMatch::Nobody)]);

    let filters = task_lexer().parse(r#"assignee:"John Doe""#).unwrap();
    assert_eq!(
        filters,
        vec![TaskFilter::Assignee(AssigneeMatch::Name("John Doe".to_string()))]
    );
}

#[test]
fn test_different_attributes_are_anded() {
    let filters = task_lexer().parse("status:open assignee:me").unwrap();
    assert_eq!(
        filters,
        vec![
            TaskFilter::Status(TaskStatus::Open),
            TaskFilter::Assignee(AssigneeMatch::User(7)),
        ]
    );
}

#[test]
fn test_repeated_attribute_is_ored() {
    let filters = task_lexer().parse("color:red status:open color:Blue").unwrap();
    assert_eq!(
        filters,
        vec![
            TaskFilter::Any(vec![
                TaskFilter::Color("red".to_string()),
                TaskFilter::Color("blue".to_string()),
            ]),
            TaskFilter::Status(TaskStatus::Open),
        ]
    );
}

#[test]
fn test_unknown_color_is_used_raw() {
    let filters = task_lexer().parse("color:chartreuse").unwrap();
    assert_eq!(filters, vec![TaskFilter::Color("chartreuse".to_string())]);
}

#[test]
fn test_free_words_match_title_one_each() {
    let filters = task_lexer().parse("fix login").unwrap();
    assert_eq!(
        filters,
        vec![
            TaskFilter::Title("fix".to_string()),
            TaskFilter::Title("login".to_string()),
        ]
    );
}

#[test]
fn test_unknown_attribute_becomes_title() {
    let filters = task_lexer().parse("stauts:open").unwrap();
    assert_eq!(filters, vec![TaskFilter::Title("stauts:open".to_string())]);
}

#[test]
fn test_invalid_status_value() {
    let err = task_lexer().parse("status:maybe").unwrap_err();
    assert_eq!(
        err,
        FilterError::InvalidValue {
            attribute: "status".to_string(),
            value: "maybe".to_string(),
            expected: "open or closed",
        }
    );
}

#[test]
fn test_invalid_date_value() {
    let err = task_lexer().parse("due:someday").unwrap_err();
    assert!(matches!(err, FilterError::InvalidValue { ref attribute, .. } if attribute == "due"));
}

#[test]
fn test_invalid_priority_value() {
    let err = task_lexer().parse("priority:>high").unwrap_err();
    assert!(matches!(err, FilterError::InvalidValue { expected: "an integer", .. }));
}

#[test]
fn test_empty_attribute_value() {
    let err = task_lexer().parse("column:").unwrap_err();
    assert!(matches!(err, FilterError::InvalidValue { expected: "a non-empty value", .. }));
}

#[test]
fn test_priority_comparison() {
    let filters = task_lexer().parse("priority:>=2").unwrap();
    assert_eq!(filters, vec![TaskFilter::Priority(Comparison::Ge, 2)]);
}

#[test]
fn test_due_resolves_relative_dates() {
    let filters = task_lexer().parse("due:<=tomorrow").unwrap();
    let TaskFilter::Due(date) = &filters[0] else {
        panic!("expected a due filter, got {filters:?}");
    };
    assert_eq!(date.comparison, Comparison::Le);
    // 2024-01-16 00:00 UTC
    assert_eq!(date.start, 1_705_363_200);
}

#[test]
fn test_project_by_id_or_name() {
    assert_eq!(task_lexer().parse("project:3").unwrap(), vec![TaskFilter::Project(3)]);
    assert_eq!(
        task_lexer().parse("project:Website").unwrap(),
        vec![TaskFilter::ProjectName("Website".to_string())]
    );
}

#[test]
fn test_category_none() {
    assert_eq!(
        task_lexer().parse("category:none").unwrap(),
        vec![TaskFilter::Category(CategoryMatch::None)]
    );
}

#[test]
fn test_aliases_share_a_group() {
    let filters = task_lexer().parse("desc:a description:b").unwrap();
    assert_eq!(
        filters,
        vec![TaskFilter::Any(vec![
            TaskFilter::Description("a".to_string()),
            TaskFilter::Description("b".to_string()),
        ])]
    );
}

#[test]
fn test_build_registers_filters_in_order() {
    let builder = task_lexer().build("status:closed #5").unwrap();
    assert_eq!(
        builder.filters(),
        &[
            TaskFilter::Status(TaskStatus::Closed),
            TaskFilter::Title("#5".to_string()),
        ]
    );
}

// ---------------------------------------------------------------------------
// Activity lexer
// ---------------------------------------------------------------------------

#[test]
fn test_activity_creator_me() {
    let filters = ActivityLexer::new(3, dates()).parse("creator:me").unwrap();
    assert_eq!(filters, vec![ActivityFilter::Creator(CreatorMatch::User(3))]);
}

#[test]
fn test_activity_task_and_title_alias_are_ored() {
    let filters = ActivityLexer::new(3, dates()).parse("task:a title:b").unwrap();
    assert_eq!(
        filters,
        vec![ActivityFilter::Any(vec![
            ActivityFilter::TaskTitle("a".to_string()),
            ActivityFilter::TaskTitle("b".to_string()),
        ])]
    );
}

#[test]
fn test_activity_empty_search() {
    assert_eq!(
        ActivityLexer::new(3, dates()).parse(""),
        Err(FilterError::EmptyExpression)
    );
}

#[test]
fn test_activity_invalid_created() {
    let err = ActivityLexer::new(3, dates()).parse("created:later").unwrap_err();
    assert!(matches!(err, FilterError::InvalidValue { expected: "a date", .. }));
}
