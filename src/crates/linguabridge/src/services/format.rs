//! Money and date formatting for emails and API responses

use chrono::{DateTime, NaiveDate, Utc};

/// Round to whole cents, half away from zero
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// US dollar display form, e.g. `$1,234.50` or `-$1.00`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Long date form, e.g. `January 5, 2026`
///
/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates. Anything else is
/// returned unchanged.
pub fn format_date(value: &str) -> String {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return at.format("%B %-d, %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.format("%B %-d, %Y").to_string();
    }
    value.to_string()
}

/// Long date plus time of day, e.g. `January 5, 2026 at 2:30 PM UTC`
pub fn format_datetime(value: &str) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(at) => at
            .with_timezone(&Utc)
            .format("%B %-d, %Y at %-I:%M %p UTC")
            .to_string(),
        Err(_) => format_date(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-1.0), "-$1.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-01-05T14:30:00Z"), "January 5, 2026");
        assert_eq!(format_date("2026-12-25"), "December 25, 2026");
        assert_eq!(format_date("next tuesday"), "next tuesday");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(
            format_datetime("2026-01-05T14:30:00Z"),
            "January 5, 2026 at 2:30 PM UTC"
        );
        assert_eq!(format_datetime("2026-01-05"), "January 5, 2026");
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(10.005_000_1), 10.01);
        assert_eq!(round_cents(-2.345_000_1), -2.35);
        assert_eq!(round_cents(7.0), 7.0);
    }
}
