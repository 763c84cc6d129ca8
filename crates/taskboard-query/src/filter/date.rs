//! Comparisons used by date and number attributes.

use taskboard_model::date::DateParser;

use crate::query::Condition;

/// Comparison operator written before a value (`<`, `<=`, `>`, `>=`, `=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl Comparison {
    /// Splits a leading operator from `text`; no operator means equality.
    pub fn split(text: &str) -> (Comparison, &str) {
        let text = text.trim();
        for (prefix, op) in [
            ("<=", Comparison::Le),
            (">=", Comparison::Ge),
            ("<", Comparison::Lt),
            (">", Comparison::Gt),
            ("=", Comparison::Eq),
        ] {
            if let Some(rest) = text.strip_prefix(prefix) {
                return (op, rest.trim_start());
            }
        }
        (Comparison::Eq, text)
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Eq => "=",
        }
    }
}

/// A comparison against one calendar day, resolved to Unix bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatch {
    pub comparison: Comparison,
    /// First second of the day.
    pub start: i64,
    /// First second of the following day.
    pub end: i64,
}

impl DateMatch {
    /// Parses `[op]date` where the date is ISO, `today`, `tomorrow` or
    /// `yesterday`, in the parser's time zone.
    pub fn parse(text: &str, dates: &DateParser) -> Option<Self> {
        let (comparison, rest) = Comparison::split(text);
        let date = dates.parse_date(rest)?;
        let (start, end) = dates.day_bounds(date);
        Some(Self {
            comparison,
            start,
            end,
        })
    }

    /// Condition on a timestamp column where `0` means unset; unset dates
    /// never match.
    pub fn condition(&self, column: &str) -> Condition {
        let set = Condition::new(format!("{column} <> 0"), Vec::new());
        let mut conditions = vec![set];
        match self.comparison {
            Comparison::Eq => {
                conditions.push(Condition::compare(column, ">=", self.start));
                conditions.push(Condition::compare(column, "<", self.end));
            }
            Comparison::Lt => conditions.push(Condition::compare(column, "<", self.start)),
            Comparison::Le => conditions.push(Condition::compare(column, "<", self.end)),
            Comparison::Gt => conditions.push(Condition::compare(column, ">=", self.end)),
            Comparison::Ge => conditions.push(Condition::compare(column, ">=", self.start)),
        }
        Condition::all(conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn parser() -> DateParser {
        DateParser::default().with_now(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap())
    }

    #[test]
    fn test_split_operators() {
        assert_eq!(Comparison::split("<=3"), (Comparison::Le, "3"));
        assert_eq!(Comparison::split(">2024-01-01"), (Comparison::Gt, "2024-01-01"));
        assert_eq!(Comparison::split("today"), (Comparison::Eq, "today"));
    }

    #[test]
    fn test_parse_day_bounds() {
        let m = DateMatch::parse("2024-01-01", &parser()).unwrap();
        assert_eq!(m.start, 1_704_067_200);
        assert_eq!(m.end, 1_704_067_200 + 86_400);
    }

    #[test]
    fn test_parse_relative() {
        let m = DateMatch::parse("<tomorrow", &parser()).unwrap();
        assert_eq!(m.comparison, Comparison::Lt);
        assert_eq!(m.start, 1_705_363_200);
        assert!(DateMatch::parse("soon", &parser()).is_none());
    }

    #[test]
    fn test_condition_excludes_unset() {
        let m = DateMatch::parse("<2024-01-01", &parser()).unwrap();
        let condition = m.condition("tasks.date_due");
        assert_eq!(condition.sql(), "(tasks.date_due <> 0) AND (tasks.date_due < ?)");
    }

    #[test]
    fn test_equality_on_epoch_day_excludes_unset() {
        let m = DateMatch::parse("1970-01-01", &parser()).unwrap();
        assert_eq!(m.start, 0);
        let condition = m.condition("tasks.date_due");
        assert_eq!(
            condition.sql(),
            "(tasks.date_due <> 0) AND (tasks.date_due >= ?) AND (tasks.date_due < ?)"
        );
    }
}
