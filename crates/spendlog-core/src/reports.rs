//! Spending breakdowns for the summary view

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::ExpenseRecord;

/// Spending grouped under one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub label: String,
    pub amount: Decimal,
    /// Share of the grand total, in percent with two decimals
    pub percentage: Decimal,
    pub count: usize,
}

/// Spending in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub total: Decimal,
    pub count: usize,
}

/// Per-category totals, largest first
pub fn category_breakdown(records: &[ExpenseRecord]) -> Vec<Breakdown> {
    breakdown_by(records, |r| r.category.as_str())
}

/// Per-payment-mode totals, largest first
pub fn payment_mode_breakdown(records: &[ExpenseRecord]) -> Vec<Breakdown> {
    breakdown_by(records, |r| r.payment_mode.as_str())
}

fn breakdown_by<'a, F>(records: &'a [ExpenseRecord], key: F) -> Vec<Breakdown>
where
    F: Fn(&'a ExpenseRecord) -> &'a str,
{
    let mut groups: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(key(record)).or_insert((Decimal::ZERO, 0));
        entry.0 += record.amount;
        entry.1 += 1;
    }

    let grand_total: Decimal = groups.values().map(|(amount, _)| *amount).sum();

    let mut entries: Vec<Breakdown> = groups
        .into_iter()
        .map(|(label, (amount, count))| Breakdown {
            label: label.to_string(),
            amount,
            percentage: percentage_of(amount, grand_total),
            count,
        })
        .collect();

    // BTreeMap order breaks ties by label
    entries.sort_by(|a, b| b.amount.cmp(&a.amount));
    entries
}

fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part * Decimal::ONE_HUNDRED / whole)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Totals per month, newest month first
pub fn monthly_summaries(records: &[ExpenseRecord]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
    for record in records {
        let entry = months.entry(record.month_key()).or_insert((Decimal::ZERO, 0));
        entry.0 += record.amount;
        entry.1 += 1;
    }

    months
        .into_iter()
        .rev()
        .map(|(month, (total, count))| MonthlySummary { month, total, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::str::FromStr;

    fn record(amount: &str, mode: &str, category: &str, y: i32, m: u32, d: u32) -> ExpenseRecord {
        ExpenseRecord {
            id: format!("{}-{}-{}-{}", category, y, m, d),
            amount: Decimal::from_str(amount).unwrap(),
            payment_mode: mode.to_string(),
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            remarks: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<ExpenseRecord> {
        vec![
            record("100", "cash", "bills", 2024, 1, 5),
            record("30", "card", "food", 2024, 2, 10),
            record("20", "upi", "food", 2024, 2, 12),
            record("50", "card", "transport", 2024, 3, 1),
        ]
    }

    #[test]
    fn test_category_breakdown() {
        let breakdown = category_breakdown(&sample());
        let labels: Vec<_> = breakdown.iter().map(|b| b.label.as_str()).collect();
        // food and transport tie at 50, ordered by label
        assert_eq!(labels, vec!["bills", "food", "transport"]);

        assert_eq!(breakdown[0].amount, Decimal::from(100));
        assert_eq!(breakdown[0].percentage, Decimal::from(50));
        assert_eq!(breakdown[1].count, 2);
        assert_eq!(breakdown[1].percentage, Decimal::from(25));
    }

    #[test]
    fn test_payment_mode_breakdown() {
        let breakdown = payment_mode_breakdown(&sample());
        assert_eq!(breakdown[0].label, "cash");
        assert_eq!(breakdown[1].label, "card");
        assert_eq!(breakdown[1].amount, Decimal::from(80));
        assert_eq!(breakdown[2].label, "upi");
    }

    #[test]
    fn test_percentage_rounding() {
        let records = vec![
            record("1", "cash", "a", 2024, 1, 1),
            record("1", "cash", "b", 2024, 1, 1),
            record("1", "cash", "c", 2024, 1, 1),
        ];
        let breakdown = category_breakdown(&records);
        assert!(breakdown.iter().all(|b| b.percentage == Decimal::from_str("33.33").unwrap()));
    }

    #[test]
    fn test_empty_breakdown() {
        assert!(category_breakdown(&[]).is_empty());
        assert!(monthly_summaries(&[]).is_empty());
    }

    #[test]
    fn test_monthly_summaries_newest_first() {
        let summaries = monthly_summaries(&sample());
        let months: Vec<_> = summaries.iter().map(|s| s.month.as_str()).collect();
        assert_eq!(months, vec!["2024-03", "2024-02", "2024-01"]);
        assert_eq!(summaries[1].total, Decimal::from(50));
        assert_eq!(summaries[1].count, 2);
    }
}
