//! Utility functions and helpers

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use spendlog_config::{CurrencyConfig, SymbolPosition};
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a unique record ID from the creation time in milliseconds.
///
/// IDs are strictly increasing within a process: a second call in the same
/// millisecond gets the next integer instead of a duplicate.
pub fn generate_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = if millis > last { millis } else { last + 1 };
        match LAST_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(actual) => last = actual,
        }
    }
}

/// Insert a separator every three digits of an unsigned digit string
pub fn format_number(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format a decimal with fixed places and the given separators
pub fn format_amount(
    amount: Decimal,
    decimal_places: u32,
    thousands_separator: &str,
    decimal_separator: &str,
) -> String {
    let rounded = amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", decimal_places as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&format_number(int_part, thousands_separator));
    if let Some(frac) = frac_part {
        out.push_str(decimal_separator);
        out.push_str(frac);
    }
    out
}

/// Format an amount for display using the configured currency settings
pub fn format_currency(amount: Decimal, currency: &CurrencyConfig) -> String {
    let number = format_amount(
        amount,
        currency.decimal_places,
        &currency.thousands_separator,
        &currency.decimal_separator,
    );
    match currency.symbol_position {
        SymbolPosition::Before => format!("{}{}", currency.symbol, number),
        SymbolPosition::After => format!("{} {}", number, currency.symbol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_generate_id_is_unique_within_millisecond() {
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 10, 0, 0).unwrap();
        let first = generate_id(now);
        let second = generate_id(now);
        assert_ne!(first, second);
        assert!(second.parse::<i64>().unwrap() > first.parse::<i64>().unwrap());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number("1234567", ","), "1,234,567");
        assert_eq!(format_number("123", ","), "123");
        assert_eq!(format_number("1000", "."), "1.000");
    }

    #[test]
    fn test_format_amount() {
        let amount = Decimal::from_str("1234.5").unwrap();
        assert_eq!(format_amount(amount, 2, ",", "."), "1,234.50");
        assert_eq!(format_amount(amount, 0, ",", "."), "1,235");
        assert_eq!(format_amount(Decimal::ZERO, 2, ",", "."), "0.00");
        assert_eq!(format_amount(Decimal::from_str("-0.125").unwrap(), 2, ",", "."), "-0.13");
    }

    #[test]
    fn test_format_currency() {
        let mut currency = CurrencyConfig::default();
        assert_eq!(format_currency(Decimal::from_str("150").unwrap(), &currency), "₹150.00");

        currency.symbol = "EUR".to_string();
        currency.symbol_position = SymbolPosition::After;
        currency.thousands_separator = ".".to_string();
        currency.decimal_separator = ",".to_string();
        assert_eq!(format_currency(Decimal::from_str("1999.9").unwrap(), &currency), "1.999,90 EUR");
    }
}
