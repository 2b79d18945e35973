//! Filter criteria for the expense list

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::ExpenseRecord;
use crate::time::TimeContext;

/// Optional constraints; an absent field does not restrict anything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub payment_mode: Option<String>,
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank values clear the constraint
    pub fn payment_mode(mut self, mode: impl Into<String>) -> Self {
        self.payment_mode = non_blank(mode.into());
        self
    }

    /// Blank values clear the constraint
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category.into());
        self
    }

    pub fn date_from(mut self, from: NaiveDate) -> Self {
        self.date_from = Some(from);
        self
    }

    pub fn date_to(mut self, to: NaiveDate) -> Self {
        self.date_to = Some(to);
        self
    }

    /// Take both date bounds from a time range resolved against `today`
    pub fn within(mut self, context: &TimeContext, today: NaiveDate) -> Self {
        self.date_from = context.start_date(today);
        self.date_to = context.end_date(today);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.payment_mode.is_none()
            && self.category.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// Check every present constraint; date bounds are inclusive
    pub fn matches(&self, record: &ExpenseRecord) -> bool {
        if let Some(ref mode) = self.payment_mode {
            if record.payment_mode != *mode {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if record.category != *category {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if record.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if record.date > to {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
