//! Named date ranges for filtering expenses
//!
//! Ranges are always resolved against an explicit `today`.

use chrono::{Datelike, NaiveDate};
use spendlog_config::TimeRange;

/// A time range plus the bounds used when it is `Custom`
#[derive(Debug, Clone, PartialEq)]
pub struct TimeContext {
    pub range: TimeRange,
    pub custom_start: Option<NaiveDate>,
    pub custom_end: Option<NaiveDate>,
}

impl Default for TimeContext {
    fn default() -> Self {
        Self::new(TimeRange::All)
    }
}

impl TimeContext {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            custom_start: None,
            custom_end: None,
        }
    }

    /// Custom range; either bound may be open
    pub fn custom(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            range: TimeRange::Custom,
            custom_start: start,
            custom_end: end,
        }
    }

    /// Effective first day of the range
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self.range {
            TimeRange::Month => Some(first_of_month(today)),
            TimeRange::Quarter => {
                let quarter_start = (today.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(today.year(), quarter_start, 1)
            }
            TimeRange::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            TimeRange::All => None,
            TimeRange::Custom => self.custom_start,
        }
    }

    /// Effective last day of the range
    pub fn end_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self.range {
            TimeRange::Month => Some(last_of_month(today.year(), today.month())),
            TimeRange::Quarter => {
                let quarter_end = (today.month0() / 3 + 1) * 3;
                Some(last_of_month(today.year(), quarter_end))
            }
            TimeRange::Year => NaiveDate::from_ymd_opt(today.year(), 12, 31),
            TimeRange::All => None,
            TimeRange::Custom => self.custom_end,
        }
    }

    /// Check if a date is within the range
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let after_start = self.start_date(today).map_or(true, |s| date >= s);
        let before_end = self.end_date(today).map_or(true, |e| date <= e);
        after_start && before_end
    }

    /// Human-readable description of the range
    pub fn description(&self) -> String {
        match self.range {
            TimeRange::Month => "Current Month".to_string(),
            TimeRange::Quarter => "Current Quarter".to_string(),
            TimeRange::Year => "Current Year".to_string(),
            TimeRange::All => "All Time".to_string(),
            TimeRange::Custom => match (self.custom_start, self.custom_end) {
                (Some(start), Some(end)) => format!("{} to {}", start, end),
                (Some(start), None) => format!("From {}", start),
                (None, Some(end)) => format!("Until {}", end),
                (None, None) => "All Time".to_string(),
            },
        }
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
