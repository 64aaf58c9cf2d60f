use rust_decimal::Decimal;
use thiserror::Error;

use tax_core::calculations::common::{parse_amount, round_half_up};

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

impl ParseDecimalError {
    /// The original, untrimmed text.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Parses an optional form field into a [`Decimal`].
///
/// Missing, empty or whitespace-only input is `None`. Handles comma as
/// thousands separator (e.g. `"1,234.56"`). Scientific notation such as
/// `"1e5"` is accepted because browsers may submit it from number inputs.
pub fn parse_optional_decimal(s: Option<&str>) -> Result<Option<Decimal>, ParseDecimalError> {
    let Some(raw) = s else {
        return Ok(None);
    };

    parse_amount(raw).map_err(|e| {
        tracing::debug!(input = %raw, "invalid decimal: {}", e);
        ParseDecimalError {
            input: raw.to_string(),
            source: e,
        }
    })
}

/// Formats an amount as US dollars with thousands separators: `$1,234.56`.
///
/// Negative amounts render as `-$1,234.56`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(integer_part.len() + integer_part.len() / 3);
    for (idx, ch) in integer_part.chars().enumerate() {
        if idx > 0 && (integer_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

/// Formats a rate such as `0.37` as `37%`.
pub fn format_percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

/// Escapes text for safe inclusion in HTML element content or attributes.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
