use crate::models::transaction::SUGGESTED_CATEGORIES;
use crate::operations::ledger_view::{MAX_YEAR, MIN_YEAR};
use chrono::{Datelike, Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Largest amount the form accepts.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Category,
    Amount,
    Description,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Date => Field::Category,
            Field::Category => Field::Amount,
            Field::Amount => Field::Description,
            Field::Description => Field::Date,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Field::Date => Field::Description,
            Field::Category => Field::Date,
            Field::Amount => Field::Category,
            Field::Description => Field::Amount,
        }
    }
}

/// Input state of the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    pub date: NaiveDate,
    pub category_index: usize,
    pub amount_input: String,
    pub description: String,
    pub focus: Field,
}

impl EntryForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today,
            category_index: 0,
            amount_input: String::new(),
            description: String::new(),
            focus: Field::Date,
        }
    }

    pub fn category(&self) -> &'static str {
        SUGGESTED_CATEGORIES[self.category_index % SUGGESTED_CATEGORIES.len()]
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let len = SUGGESTED_CATEGORIES.len();
        self.category_index = if forward {
            (self.category_index + 1) % len
        } else {
            (self.category_index + len - 1) % len
        };
    }

    pub fn shift_days(&mut self, days: i64) {
        let shifted = self.date.checked_add_signed(Duration::days(days));
        self.set_date(shifted);
    }

    pub fn shift_months(&mut self, forward: bool) {
        let shifted = if forward {
            self.date.checked_add_months(Months::new(1))
        } else {
            self.date.checked_sub_months(Months::new(1))
        };
        self.set_date(shifted);
    }

    fn set_date(&mut self, date: Option<NaiveDate>) {
        if let Some(date) = date.filter(|d| (MIN_YEAR..=MAX_YEAR).contains(&d.year())) {
            self.date = date;
        }
    }

    /// Accepts digits and a single decimal point with at most two decimals.
    pub fn push_amount_char(&mut self, ch: char) {
        if ch.is_ascii_digit() {
            if let Some((_, decimals)) = self.amount_input.split_once('.') {
                if decimals.len() >= 2 {
                    return;
                }
            }
            self.amount_input.push(ch);
        } else if ch == '.' && !self.amount_input.contains('.') {
            if self.amount_input.is_empty() {
                self.amount_input.push('0');
            }
            self.amount_input.push('.');
        }
    }

    /// Empty input reads as zero.
    pub fn amount(&self) -> Result<Decimal, String> {
        let raw = self.amount_input.trim();
        if raw.is_empty() {
            return Ok(Decimal::ZERO);
        }
        let amount = Decimal::from_str(raw)
            .map_err(|_| format!("Invalid amount '{}'. Please provide a valid number.", raw))?;
        if amount > MAX_AMOUNT {
            return Err("Amount cannot exceed 999,999,999".to_string());
        }
        Ok(amount)
    }

    pub fn amount_display(&self) -> &str {
        if self.amount_input.is_empty() {
            "0"
        } else {
            &self.amount_input
        }
    }

    /// Clears amount and description after a successful entry. Date and
    /// category are kept for the next entry.
    pub fn reset_transient(&mut self) {
        self.amount_input.clear();
        self.description.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> EntryForm {
        EntryForm::new(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
    }

    #[test]
    fn test_empty_amount_is_zero() {
        assert_eq!(form().amount().unwrap(), Decimal::ZERO);
        assert_eq!(form().amount_display(), "0");
    }

    #[test]
    fn test_amount_input_filters_characters() {
        let mut form = form();
        for ch in "1a2.3.45x6".chars() {
            form.push_amount_char(ch);
        }
        assert_eq!(form.amount_input, "12.34");
        assert_eq!(form.amount().unwrap(), Decimal::new(1234, 2));
    }

    #[test]
    fn test_leading_decimal_point_gets_zero() {
        let mut form = form();
        form.push_amount_char('.');
        form.push_amount_char('5');
        assert_eq!(form.amount_input, "0.5");
    }

    #[test]
    fn test_amount_above_maximum_is_rejected() {
        let mut form = form();
        form.amount_input = "1000000000".to_string();
        assert!(form.amount().unwrap_err().contains("cannot exceed"));

        form.amount_input = "999999999".to_string();
        assert_eq!(form.amount().unwrap(), MAX_AMOUNT);
    }

    #[test]
    fn test_reset_transient_keeps_date_and_category() {
        let mut form = form();
        form.cycle_category(true);
        form.amount_input = "150".to_string();
        form.description = "bus".to_string();

        form.reset_transient();

        assert_eq!(form.amount().unwrap(), Decimal::ZERO);
        assert_eq!(form.description, "");
        assert_eq!(form.category(), "Food");
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_cycle_category_wraps() {
        let mut form = form();
        form.cycle_category(false);
        assert_eq!(form.category(), "Other");
        form.cycle_category(true);
        assert_eq!(form.category(), "Salary");
    }

    #[test]
    fn test_shift_date() {
        let mut form = form();
        form.shift_days(1);
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        form.shift_months(true);
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        form.shift_days(-1);
        form.shift_months(false);
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2024, 1, 29).unwrap());
    }

    #[test]
    fn test_date_stays_within_four_digit_years() {
        let mut form = EntryForm::new(NaiveDate::from_ymd_opt(9999, 12, 15).unwrap());
        form.shift_months(true);
        assert_eq!(form.date, NaiveDate::from_ymd_opt(9999, 12, 15).unwrap());
        form.shift_days(17);
        assert_eq!(form.date, NaiveDate::from_ymd_opt(9999, 12, 15).unwrap());
        form.shift_days(16);
        assert_eq!(form.date, NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());

        let mut form = EntryForm::new(NaiveDate::from_ymd_opt(0, 1, 1).unwrap());
        form.shift_days(-1);
        assert_eq!(form.date, NaiveDate::from_ymd_opt(0, 1, 1).unwrap());
    }

    #[test]
    fn test_focus_cycles_through_fields() {
        let mut focus = Field::Date;
        for _ in 0..4 {
            focus = focus.next();
        }
        assert_eq!(focus, Field::Date);
        assert_eq!(Field::Date.previous(), Field::Description);
    }
}
