use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

pub const CURRENCY_PREFIX: &str = "Rp ";

/// Above this magnitude `f64` no longer holds every cent exactly.
const F64_EXACT_LIMIT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Formats the magnitude of `amount` as `Rp 1,234,567.50`.
pub fn format_currency(amount: Decimal) -> String {
    let magnitude = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let grouped = if magnitude < F64_EXACT_LIMIT {
        format_num::format_num!(",.2", magnitude.to_f64().unwrap_or_default())
    } else {
        group_thousands(&format!("{:.2}", magnitude))
    };
    format!("{}{}", CURRENCY_PREFIX, grouped)
}

/// Inserts `,` separators into the integer part of a plain decimal string.
fn group_thousands(plain: &str) -> String {
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain, ""));
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + fraction.len() + 1);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_currency_groups_thousands() {
        let amount = Decimal::from_str("1234567.5").unwrap();
        assert_eq!(format_currency(amount), "Rp 1,234,567.50");
    }

    #[test]
    fn test_format_currency_whole_amount() {
        assert_eq!(format_currency(Decimal::from(50000)), "Rp 50,000.00");
        assert_eq!(format_currency(Decimal::from(5000000)), "Rp 5,000,000.00");
    }

    #[test]
    fn test_format_currency_small_amount() {
        assert_eq!(format_currency(Decimal::new(75, 2)), "Rp 0.75");
        assert_eq!(format_currency(Decimal::from(999)), "Rp 999.00");
    }

    #[test]
    fn test_format_currency_drops_sign() {
        assert_eq!(format_currency(Decimal::from(-25000)), "Rp 25,000.00");
    }

    #[test]
    fn test_format_currency_rounds_to_two_places() {
        let amount = Decimal::from_str("1000.125").unwrap();
        assert_eq!(format_currency(amount), "Rp 1,000.13");
    }

    #[test]
    fn test_format_currency_keeps_every_digit_of_large_amounts() {
        let amount = Decimal::from_str("12345678901234567.89").unwrap();
        assert_eq!(format_currency(amount), "Rp 12,345,678,901,234,567.89");

        let amount = Decimal::from_str("90071992547409.93").unwrap();
        assert_eq!(format_currency(amount), "Rp 90,071,992,547,409.93");

        let amount = Decimal::from_str("10000000000000000000000000").unwrap();
        assert_eq!(format_currency(amount), "Rp 10,000,000,000,000,000,000,000,000.00");
    }

    #[test]
    fn test_format_currency_around_exact_limit() {
        assert_eq!(format_currency(Decimal::from(999_999_999)), "Rp 999,999,999.00");
        assert_eq!(format_currency(Decimal::from(1_000_000_000)), "Rp 1,000,000,000.00");
        assert_eq!(format_currency(Decimal::new(-100_000_000_055, 2)), "Rp 1,000,000,000.55");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("123.45"), "123.45");
        assert_eq!(group_thousands("1234.00"), "1,234.00");
        assert_eq!(group_thousands("123456"), "123,456");
    }

    #[test]
    fn test_format_date_is_iso() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "2024-01-05");
    }
}
