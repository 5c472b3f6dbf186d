use csv::StringRecord;
use serde::Deserialize;
use thiserror::Error;

use crate::{month::Month, usd::Usd};

/// Number of comma-separated fields on every transaction line.
pub const FIELDS: usize = 5;

/// Reasons a line of the sales log is rejected.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum LineError {
    #[error("malformed line: {0}")]
    MalformedLine(String),
    #[error("invalid date or month number: {0:?}")]
    InvalidDate(String),
    #[error("invalid {field}: {value:?}")]
    InvalidNumeric { field: &'static str, value: String },
}

/// One validated sale, as read from a single line of the log.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub month: Month,
    pub item: String,
    pub quantity: u32,
    pub revenue: Usd,
}

/// Defines the positional layout of a line, before validation.
#[derive(Debug, Deserialize)]
struct RawRecord {
    date: String,
    item: String,
    _unit_price: String,
    quantity: String,
    total: String,
}

impl Transaction {
    /// Validates a record of the sales log.
    ///
    /// Fields are trimmed of surrounding whitespace. The record must have
    /// exactly [`FIELDS`] fields, in the order date (`YYYY-MM-DD`), item,
    /// unit price (ignored), quantity, and total revenue.
    ///
    /// # Errors
    ///
    /// Returns:
    /// * [`LineError::MalformedLine`] if the field count is wrong or the date,
    ///   item, quantity, or total is empty
    /// * [`LineError::InvalidDate`] if the month segment of the date is not a
    ///   number from 1 to 12
    /// * [`LineError::InvalidNumeric`] if the quantity is not a positive
    ///   integer, or the total is not a positive amount
    pub fn from_record(record: &StringRecord) -> Result<Self, LineError> {
        if record.len() != FIELDS {
            return Err(LineError::MalformedLine(format!(
                "expected {FIELDS} fields, found {}",
                record.len()
            )));
        }
        let raw: RawRecord = record
            .deserialize(None)
            .map_err(|e| LineError::MalformedLine(e.to_string()))?;
        raw.validate()
    }
}

impl RawRecord {
    fn validate(self) -> Result<Transaction, LineError> {
        let date = self.date.trim();
        let item = self.item.trim();
        let quantity = self.quantity.trim();
        let total = self.total.trim();
        if date.is_empty() || item.is_empty() || quantity.is_empty() || total.is_empty() {
            return Err(LineError::MalformedLine(
                "missing date, item, quantity, or total".into(),
            ));
        }
        let month = date
            .split('-')
            .nth(1)
            .and_then(|m| m.parse::<u8>().ok())
            .and_then(Month::from_number)
            .ok_or_else(|| LineError::InvalidDate(date.to_string()))?;
        let qty = quantity
            .parse::<u32>()
            .ok()
            .filter(|&qty| qty > 0)
            .ok_or_else(|| LineError::InvalidNumeric {
                field: "quantity",
                value: quantity.to_string(),
            })?;
        let revenue = total
            .parse::<Usd>()
            .ok()
            .filter(|&revenue| revenue > Usd::ZERO)
            .ok_or_else(|| LineError::InvalidNumeric {
                field: "total",
                value: total.to_string(),
            })?;
        Ok(Transaction {
            month,
            item: item.to_string(),
            quantity: qty,
            revenue,
        })
    }
}

/// Parses one line of text from the sales log (not the header).
///
/// # Examples
///
/// ```
/// # use monthly_sales::parse_line;
/// let tx = parse_line("2024-01-15, SKU1, 10.00, 2, 20.00").unwrap();
/// assert_eq!(tx.month.name(), "January");
/// assert_eq!(tx.item, "SKU1");
/// assert_eq!(tx.quantity, 2);
/// assert_eq!(tx.revenue.to_string(), "20.00");
/// ```
///
/// # Errors
///
/// Returns a [`LineError`] describing why the line was rejected; see
/// [`Transaction::from_record`].
pub fn parse_line(line: &str) -> Result<Transaction, LineError> {
    Transaction::from_record(&line.split(',').collect::<StringRecord>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_fn_trims_fields_and_resolves_month() {
        let tx = parse_line("  2024-03-02 ,SKU9,  1.00,7 , 7.00  ").unwrap();
        assert_eq!(
            tx,
            Transaction {
                month: Month::from_number(3).unwrap(),
                item: "SKU9".into(),
                quantity: 7,
                revenue: Usd::from_cents(700),
            }
        );
    }

    #[test]
    fn parse_line_fn_ignores_unit_price() {
        let tx = parse_line("2024-05-01, SKU1, not a price, 1, 2.50").unwrap();
        assert_eq!(tx.revenue, Usd::from_cents(250));
        let tx = parse_line("2024-05-01, SKU1, , 1, 2.50").unwrap();
        assert_eq!(tx.quantity, 1);
    }

    #[test]
    fn parse_line_fn_rejects_missing_fields() {
        for line in [
            "",
            ", SKU1, 1.00, 1, 1.00",
            "2024-01-01, , 1.00, 1, 1.00",
            "2024-01-01, SKU1, 1.00, , 1.00",
            "2024-01-01, SKU1, 1.00, 1,   ",
        ] {
            assert!(
                matches!(parse_line(line), Err(LineError::MalformedLine(_))),
                "{line:?} accepted"
            );
        }
    }

    #[test]
    fn parse_line_fn_rejects_wrong_field_count() {
        assert!(matches!(
            parse_line("2024-01-01, SKU1, 1.00, 1"),
            Err(LineError::MalformedLine(_))
        ));
        assert!(matches!(
            parse_line("2024-01-01, SKU1, 1.00, 1, 1.00, extra"),
            Err(LineError::MalformedLine(_))
        ));
    }

    #[test]
    fn parse_line_fn_rejects_bad_months() {
        for line in [
            "2024-13-01, SKUX, 1.00, 1, 1.00",
            "2024-00-01, SKUX, 1.00, 1, 1.00",
            "2024, SKUX, 1.00, 1, 1.00",
            "2024-Jan-01, SKUX, 1.00, 1, 1.00",
            "yesterday, SKUX, 1.00, 1, 1.00",
        ] {
            assert_eq!(
                parse_line(line),
                Err(LineError::InvalidDate(line.split(',').next().unwrap().trim().into())),
            );
        }
    }

    #[test]
    fn parse_line_fn_accepts_totals_below_one_cent() {
        let tx = parse_line("2024-01-01, A, 0.001, 1, 0.001").unwrap();
        assert_eq!(tx.revenue, "0.001".parse::<Usd>().unwrap());
    }

    #[test]
    fn parse_line_fn_rejects_fractional_quantity() {
        assert_eq!(
            parse_line("2024-01-01, SKU1, 1.00, 2.5, 2.50"),
            Err(LineError::InvalidNumeric {
                field: "quantity",
                value: "2.5".into(),
            })
        );
    }

    #[test]
    fn parse_line_fn_rejects_totals_above_limit() {
        assert!(matches!(
            parse_line("2024-01-01, A, 1, 1, 5e16"),
            Err(LineError::InvalidNumeric { field: "total", .. })
        ));
    }

    #[test]
    fn parse_line_fn_rejects_bad_numbers() {
        for (line, field) in [
            ("2024-01-01, SKU1, 1.00, 0, 1.00", "quantity"),
            ("2024-01-01, SKU1, 1.00, -2, 1.00", "quantity"),
            ("2024-01-01, SKU1, 1.00, 2.5, 1.00", "quantity"),
            ("2024-01-01, SKU1, 1.00, many, 1.00", "quantity"),
            ("2024-01-01, SKU1, 1.00, 1, 0", "total"),
            ("2024-01-01, SKU1, 1.00, 1, -4.00", "total"),
            ("2024-01-01, SKU1, 1.00, 1, lots", "total"),
        ] {
            assert!(
                matches!(parse_line(line), Err(LineError::InvalidNumeric { field: f, .. }) if f == field),
                "{line:?}"
            );
        }
    }
}
