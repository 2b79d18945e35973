//! Expense record models

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A single spending event as stored in the slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    /// Unique record identifier
    pub id: String,
    /// Amount spent, always positive. Written as an exact JSON number
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    /// Payment mode label (e.g., "cash", "card")
    pub payment_mode: String,
    /// Category label (e.g., "food")
    pub category: String,
    /// Day the expense happened (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Free-text annotation
    #[serde(default)]
    pub remarks: String,
    /// When the record was created
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Check the invariants every persisted record must hold
    pub fn check_invariants(&self) -> CoreResult<()> {
        if self.id.trim().is_empty() {
            return Err(CoreError::validation("id", "must not be empty"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(CoreError::validation(
                "amount",
                format!("must be greater than zero, got {}", self.amount),
            ));
        }
        if self.payment_mode.trim().is_empty() {
            return Err(CoreError::validation("paymentMode", "must not be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(CoreError::validation("category", "must not be empty"));
        }
        Ok(())
    }

    /// Month key in `YYYY-MM` form
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.date.year(), self.date.month())
    }

    /// Check if the expense falls in the same calendar month as `day`
    pub fn in_month_of(&self, day: NaiveDate) -> bool {
        self.date.year() == day.year() && self.date.month() == day.month()
    }
}

/// Caller-supplied fields for a new expense; the store assigns id and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub amount: Decimal,
    pub payment_mode: String,
    pub category: String,
    pub date: NaiveDate,
    pub remarks: String,
}

impl NewExpense {
    pub fn new(
        amount: Decimal,
        payment_mode: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            payment_mode: payment_mode.into(),
            category: category.into(),
            date,
            remarks: String::new(),
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = remarks.into();
        self
    }

    /// Build the stored record, trimming the text fields
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> ExpenseRecord {
        ExpenseRecord {
            id,
            amount: self.amount,
            payment_mode: self.payment_mode.trim().to_string(),
            category: self.category.trim().to_string(),
            date: self.date,
            remarks: self.remarks.trim().to_string(),
            created_at,
        }
    }
}

/// Parse a user-entered amount into a positive decimal
pub fn parse_amount(input: &str) -> CoreResult<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("amount", "is required"));
    }
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| CoreError::validation("amount", format!("'{}' is not a number", trimmed)))?;
    if amount <= Decimal::ZERO {
        return Err(CoreError::validation("amount", "must be greater than zero"));
    }
    Ok(amount)
}

/// Convert a floating-point amount from an outer boundary into a decimal
pub fn amount_from_f64(value: f64) -> CoreResult<Decimal> {
    if !value.is_finite() {
        return Err(CoreError::validation("amount", "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(CoreError::validation("amount", "must be greater than zero"));
    }
    Decimal::from_str(&value.to_string())
        .map_err(|_| CoreError::validation("amount", format!("{} is out of range", value)))
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::validation("date", format!("'{}' is not a valid YYYY-MM-DD date", input.trim())))
}

// ==================== Tests ====================
