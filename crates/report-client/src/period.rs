//! Date ranges for the report commands. Every helper takes "today" explicitly.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};

use crate::error::ReportError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive date range of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses two `YYYY-MM-DD` dates, as typed in `report 2024-01-01 2024-01-31`.
    pub fn parse(start: &str, end: &str) -> Result<Self, ReportError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// `report_from 2024-01-01_to_2024-01-31.xlsx`, or `report_from 2024-01-01.xlsx` for one day.
    pub fn file_name(&self) -> String {
        if self.start == self.end {
            format!("report_from {}.xlsx", self.start)
        } else {
            format!("report_from {}_to_{}.xlsx", self.start, self.end)
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ReportError::InvalidDate(raw.to_string()))
}

pub fn today(day: NaiveDate) -> ReportPeriod {
    ReportPeriod { start: day, end: day }
}

/// Monday to Sunday of the week containing `day`.
pub fn current_week(day: NaiveDate) -> ReportPeriod {
    let monday = day - Days::new(u64::from(day.weekday().num_days_from_monday()));
    ReportPeriod {
        start: monday,
        end: monday + Days::new(6),
    }
}

/// First to last day of the month containing `day`.
pub fn current_month(day: NaiveDate) -> ReportPeriod {
    let first = first_of_month(day);
    let next_first = first_of_month(first + Days::new(32));
    ReportPeriod {
        start: first,
        end: next_first - Days::new(1),
    }
}

pub fn last_week(day: NaiveDate) -> ReportPeriod {
    current_week(day - Days::new(7))
}

pub fn last_month(day: NaiveDate) -> ReportPeriod {
    current_month(first_of_month(day) - Days::new(1))
}

/// The `n` days ending with `day` (at least one).
pub fn last_days(day: NaiveDate, n: u32) -> ReportPeriod {
    let span = u64::from(n.max(1) - 1);
    ReportPeriod {
        start: day - Days::new(span),
        end: day,
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day - Days::new(u64::from(day.day0()))
}
