//! Project bars of the all-projects Gantt chart.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use log::warn;
use serde::Serialize;
use taskboard_model::color::{ColorPalette, ColorProperties, DEFAULT_COLOR};
use taskboard_model::date::DateParser;
use taskboard_model::permission::ProjectPermission;

use super::{Formatter, LinkBuilder};
use crate::record::Record;

/// One project on the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectGanttBar {
    pub id: i64,
    pub title: String,
    /// `[year, month, day]`.
    pub start: [i32; 3],
    pub end: [i32; 3],
    pub link: String,
    pub board_link: String,
    pub gantt_link: String,
    pub color: ColorProperties,
    /// True when either planned date is missing.
    pub not_defined: bool,
    /// Member display names keyed by role name.
    pub users: BTreeMap<String, Vec<String>>,
}

/// Formats project rows; members are looked up per project.
pub struct ProjectGanttFormatter<'a> {
    permission: &'a dyn ProjectPermission,
    links: &'a dyn LinkBuilder,
    dates: DateParser,
}

impl<'a> ProjectGanttFormatter<'a> {
    pub fn new(
        permission: &'a dyn ProjectPermission,
        links: &'a dyn LinkBuilder,
        dates: DateParser,
    ) -> Self {
        Self {
            permission,
            links,
            dates,
        }
    }

    fn users(&self, project_id: i64) -> BTreeMap<String, Vec<String>> {
        match self.permission.users_grouped_by_role(project_id) {
            Ok(grouped) => grouped
                .into_iter()
                .map(|(role, names)| (role.as_str().to_string(), names))
                .collect(),
            Err(err) => {
                warn!(
                    "event=gantt_users module=formatter status=error project_id={project_id} error={err}"
                );
                BTreeMap::new()
            }
        }
    }
}

impl Formatter for ProjectGanttFormatter<'_> {
    type Output = ProjectGanttBar;

    fn map(&self, record: &Record) -> ProjectGanttBar {
        let id = record.int("id").unwrap_or_default();
        let start_date = record.non_empty("start_date").and_then(|d| self.dates.parse_date(d));
        let end_date = record.non_empty("end_date").and_then(|d| self.dates.parse_date(d));

        let start = start_date.unwrap_or_else(|| self.dates.today());
        let end = end_date.unwrap_or(start);
        let params = [("project_id", id.to_string())];

        ProjectGanttBar {
            id,
            title: record.text_or_empty("name"),
            start: ymd(start),
            end: ymd(end),
            link: self.links.link("ProjectViewController", "show", &params),
            board_link: self.links.link("BoardViewController", "show", &params),
            gantt_link: self.links.link("GanttController", "project", &params),
            color: ColorPalette.properties(DEFAULT_COLOR),
            not_defined: start_date.is_none() || end_date.is_none(),
            users: self.users(id),
        }
    }
}

fn ymd(date: NaiveDate) -> [i32; 3] {
    [date.year(), date.month() as i32, date.day() as i32]
}
