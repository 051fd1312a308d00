//! Display formatting

use chrono::NaiveDate;

/// Placeholder for missing text
pub const EMPTY: &str = "—";

/// Format an amount as `AED 1,234.50`; negatives as `-AED 1,234.50`
pub fn money(amount: f64, currency: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}{} {}.{:02}",
        sign,
        currency,
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Text or the placeholder when blank
pub fn or_dash(text: &str) -> String {
    if text.trim().is_empty() {
        EMPTY.to_string()
    } else {
        text.to_string()
    }
}

/// Header date, e.g. `Sun, Oct 18, 2026`
pub fn now_line(today: NaiveDate) -> String {
    today.format("%a, %b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(1200.0, "AED"), "AED 1,200.00");
        assert_eq!(money(0.0, "AED"), "AED 0.00");
        assert_eq!(money(-50.0, "AED"), "-AED 50.00");
        assert_eq!(money(1234567.891, "USD"), "USD 1,234,567.89");
        assert_eq!(money(999.999, "AED"), "AED 1,000.00");
        assert_eq!(money(f64::NAN, "AED"), "AED 0.00");
        assert_eq!(money(-0.001, "AED"), "AED 0.00");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(""), "—");
        assert_eq!(or_dash("A-1"), "A-1");
    }

    #[test]
    fn test_now_line() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(now_line(today), "Sun, Oct 18, 2026");
    }
}
