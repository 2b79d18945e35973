//! Query engine: filtering, ordering and totals over expense records
//!
//! Everything here is pure. `today` is always passed in.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::filter::FilterSpec;
use crate::models::ExpenseRecord;

/// Result of [`render`]: the list to show and the totals over it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseView {
    pub view: Vec<ExpenseRecord>,
    pub total: Decimal,
    pub month_total: Decimal,
}

/// Keep the records that satisfy every constraint in `spec`, in input order
pub fn filter(records: &[ExpenseRecord], spec: &FilterSpec) -> Vec<ExpenseRecord> {
    records.iter().filter(|r| spec.matches(r)).cloned().collect()
}

/// Newest date first; records sharing a date keep their input order
pub fn sort_by_date_descending(records: &[ExpenseRecord]) -> Vec<ExpenseRecord> {
    let mut sorted = records.to_vec();
    // slice::sort_by is stable
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Exact decimal sum of the amounts
pub fn total(records: &[ExpenseRecord]) -> Decimal {
    records.iter().map(|r| r.amount).sum()
}

/// Sum of the amounts dated in the same calendar month as `today`
pub fn current_month_total(records: &[ExpenseRecord], today: NaiveDate) -> Decimal {
    records
        .iter()
        .filter(|r| r.in_month_of(today))
        .map(|r| r.amount)
        .sum()
}

/// Records dated between `start` and `end`, both inclusive
pub fn records_in_range(records: &[ExpenseRecord], start: NaiveDate, end: NaiveDate) -> Vec<ExpenseRecord> {
    filter(records, &FilterSpec::new().date_from(start).date_to(end))
}

/// Filter, sort and total in one pass; totals cover the filtered records only
pub fn render(records: &[ExpenseRecord], spec: &FilterSpec, today: NaiveDate) -> ExpenseView {
    let filtered = filter(records, spec);
    ExpenseView {
        total: total(&filtered),
        month_total: current_month_total(&filtered, today),
        view: sort_by_date_descending(&filtered),
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: &str, amount: &str, mode: &str, category: &str, day: NaiveDate) -> ExpenseRecord {
        ExpenseRecord {
            id: id.to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            payment_mode: mode.to_string(),
            category: category.to_string(),
            date: day,
            remarks: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 2, 15, 9, 0, 0).unwrap(),
        }
    }

    /// January cash bill and February card lunch
    fn two_months() -> Vec<ExpenseRecord> {
        vec![
            record("jan", "100", "cash", "bills", date(2024, 1, 5)),
            record("feb", "50", "card", "food", date(2024, 2, 10)),
        ]
    }

    fn ids(records: &[ExpenseRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_filter_empty_spec_is_identity() {
        let records = vec![
            record("b", "1", "card", "food", date(2024, 3, 1)),
            record("a", "2", "cash", "bills", date(2024, 1, 1)),
            record("c", "3", "upi", "food", date(2024, 2, 1)),
        ];
        assert_eq!(filter(&records, &FilterSpec::new()), records);
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let records = vec![
            record("1", "10", "cash", "food", date(2024, 1, 1)),
            record("2", "10", "cash", "bills", date(2024, 1, 1)),
            record("3", "10", "card", "food", date(2024, 1, 1)),
        ];
        let spec = FilterSpec::new().payment_mode("cash").category("food");
        assert_eq!(ids(&filter(&records, &spec)), vec!["1"]);
    }

    #[test]
    fn test_filter_by_date_range() {
        let spec = FilterSpec::new().date_from(date(2024, 2, 1)).date_to(date(2024, 2, 28));
        assert_eq!(ids(&filter(&two_months(), &spec)), vec!["feb"]);
    }

    #[test]
    fn test_filter_inverted_range_is_empty() {
        let spec = FilterSpec::new().date_from(date(2024, 3, 1)).date_to(date(2024, 1, 1));
        assert!(filter(&two_months(), &spec).is_empty());
    }

    #[test]
    fn test_sort_by_date_descending() {
        let records = vec![
            record("old", "1", "cash", "food", date(2023, 12, 31)),
            record("new", "1", "cash", "food", date(2024, 2, 1)),
            record("mid", "1", "cash", "food", date(2024, 1, 15)),
        ];
        assert_eq!(ids(&sort_by_date_descending(&records)), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let same_day = date(2024, 2, 10);
        let records = vec![
            record("first", "1", "cash", "food", same_day),
            record("older", "1", "cash", "food", date(2024, 2, 9)),
            record("second", "1", "card", "food", same_day),
            record("third", "1", "upi", "food", same_day),
        ];
        assert_eq!(
            ids(&sort_by_date_descending(&records)),
            vec!["first", "second", "third", "older"]
        );

        let reversed: Vec<_> = records.iter().rev().cloned().collect();
        assert_eq!(
            ids(&sort_by_date_descending(&reversed)),
            vec!["third", "second", "first", "older"]
        );
    }

    #[test]
    fn test_total() {
        assert_eq!(total(&[]), Decimal::ZERO);

        let records = vec![
            record("1", "10", "cash", "food", date(2024, 1, 1)),
            record("2", "5.5", "cash", "food", date(2024, 1, 2)),
        ];
        assert_eq!(total(&records), Decimal::from_str("15.5").unwrap());
    }

    #[test]
    fn test_total_has_no_float_drift() {
        let records: Vec<_> = (0..10)
            .map(|i| record(&i.to_string(), "0.1", "cash", "food", date(2024, 1, 1)))
            .collect();
        assert_eq!(total(&records), Decimal::ONE);

        let cents = vec![
            record("a", "0.1", "cash", "food", date(2024, 1, 1)),
            record("b", "0.2", "cash", "food", date(2024, 1, 1)),
        ];
        assert_eq!(total(&cents), Decimal::from_str("0.3").unwrap());
    }

    #[test]
    fn test_current_month_total() {
        let today = date(2024, 2, 15);
        assert_eq!(current_month_total(&two_months(), today), Decimal::from(50));
        assert_eq!(total(&two_months()), Decimal::from(150));

        // Same month of another year does not count
        let last_year = vec![record("x", "70", "cash", "food", date(2023, 2, 10))];
        assert_eq!(current_month_total(&last_year, today), Decimal::ZERO);
    }

    #[test]
    fn test_records_in_range() {
        let range = records_in_range(&two_months(), date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(ids(&range), vec!["jan"]);
    }

    #[test]
    fn test_render_totals_follow_filter() {
        let today = date(2024, 2, 15);

        let all = render(&two_months(), &FilterSpec::new(), today);
        assert_eq!(ids(&all.view), vec!["feb", "jan"]);
        assert_eq!(all.total, Decimal::from(150));
        assert_eq!(all.month_total, Decimal::from(50));

        let cash = render(&two_months(), &FilterSpec::new().payment_mode("cash"), today);
        assert_eq!(ids(&cash.view), vec!["jan"]);
        assert_eq!(cash.total, Decimal::from(100));
        assert_eq!(cash.month_total, Decimal::ZERO);
    }

    #[test]
    fn test_render_empty() {
        let view = render(&[], &FilterSpec::new(), date(2024, 2, 15));
        assert!(view.view.is_empty());
        assert_eq!(view.total, Decimal::ZERO);
        assert_eq!(view.month_total, Decimal::ZERO);
    }
}
