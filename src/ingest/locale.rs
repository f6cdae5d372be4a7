//! Brazilian-locale number parsing
//!
//! Source values look like `"R$ 1.234,56"`, `"+5,00%"`, `"-96,59%"` or
//! `"90.473.100"`: dots group thousands and the comma is the decimal mark.

const CURRENCY_MARKER: &str = "R$";

/// Parse a currency amount such as `"R$ 0,81"`.
///
/// Never absent: empty, malformed or negative input yields `0.0`.
pub fn parse_currency(value: &str) -> f64 {
    let cleaned: String = value
        .replace(CURRENCY_MARKER, "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    to_finite(&cleaned)
        .filter(|v| *v >= 0.0)
        .unwrap_or(0.0)
}

/// Parse a percentage such as `"+5,00%"` or `"-96,59%"`.
///
/// Empty input is `None`, which is distinct from `"0,00%"` (`Some(0.0)`).
pub fn parse_percentage(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let without_percent = trimmed.replace('%', "");
    let unsigned = without_percent.trim().strip_prefix('+').unwrap_or(without_percent.trim());
    to_finite(&unsigned.replace(',', "."))
}

/// Parse a plain number such as `"90.473.100"` or `"-17,22"`.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    to_finite(&cleaned)
}

// `f64::from_str` accepts "inf" and "NaN"; those never reach a Stock
fn to_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
