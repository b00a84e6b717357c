//! Human-facing number formatting and suffixed amount parsing.
//!
//! The command front-end accepts shorthand like `1.5k` or `2m` and every
//! display surface prints grouped or abbreviated values. Parsing rejects
//! malformed input here, at the translation-shim boundary, so the core
//! ledger only ever sees validated numbers.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// One thousand.
const THOUSAND: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);
/// One million.
const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// One billion.
const BILLION: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// An amount string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAmountError {
    /// The input was empty or all whitespace.
    #[error("amount is empty")]
    Empty,

    /// The input was not a number (with an optional k/m/b suffix).
    #[error("invalid amount: {0}")]
    Invalid(String),
}

/// Parse a user-supplied amount, honoring `k`, `m`, and `b` suffixes.
///
/// Commas are ignored, so `"1,500"`, `"1500"`, and `"1.5k"` all parse to
/// the same value. The sign is preserved; clamping negative targets is the
/// currency services' job, not the parser's.
///
/// # Errors
///
/// Returns [`ParseAmountError::Empty`] for blank input and
/// [`ParseAmountError::Invalid`] for anything that is not a number.
pub fn parse_amount(input: &str) -> Result<Decimal, ParseAmountError> {
    let cleaned = input.trim().to_lowercase().replace(',', "");
    if cleaned.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let (number_part, multiplier) = match cleaned.strip_suffix(['k', 'm', 'b']) {
        Some(stripped) if cleaned.ends_with('k') => (stripped, THOUSAND),
        Some(stripped) if cleaned.ends_with('m') => (stripped, MILLION),
        Some(stripped) => (stripped, BILLION),
        None => (cleaned.as_str(), Decimal::ONE),
    };

    let number: Decimal = number_part
        .parse()
        .map_err(|_| ParseAmountError::Invalid(input.trim().to_owned()))?;

    number
        .checked_mul(multiplier)
        .ok_or_else(|| ParseAmountError::Invalid(input.trim().to_owned()))
}

/// Parse a user-supplied integer amount, honoring `k`, `m`, and `b`
/// suffixes. Fractional results truncate toward zero (`"1.5k"` is 1500,
/// `"0.5"` is 0).
///
/// # Errors
///
/// Returns [`ParseAmountError`] if the input is not a number or does not
/// fit in an `i64`.
pub fn parse_amount_int(input: &str) -> Result<i64, ParseAmountError> {
    let amount = parse_amount(input)?;
    amount
        .trunc()
        .to_i64()
        .ok_or_else(|| ParseAmountError::Invalid(input.trim().to_owned()))
}

/// Format a decimal with comma grouping and exactly two decimal places.
pub fn format_grouped_decimal(value: Decimal) -> String {
    let rendered = format!("{value:.2}");
    match rendered.split_once('.') {
        Some((integer, fraction)) => format!("{}.{fraction}", group_digits(integer)),
        None => group_digits(&rendered),
    }
}

/// Format an integer with comma grouping.
pub fn format_grouped_int(value: i64) -> String {
    group_digits(&value.to_string())
}

/// Abbreviate a decimal with a `K`/`M`/`B` suffix and two decimal places.
///
/// Values below one thousand render as plain two-decimal numbers.
pub fn format_abbreviated(value: Decimal) -> String {
    if value >= BILLION {
        format!("{:.2}B", value / BILLION)
    } else if value >= MILLION {
        format!("{:.2}M", value / MILLION)
    } else if value >= THOUSAND {
        format!("{:.2}K", value / THOUSAND)
    } else {
        format!("{value:.2}")
    }
}

/// Abbreviate an integer with a `K`/`M`/`B` suffix.
///
/// Values below one thousand render as plain digits, with no decimal
/// places.
pub fn format_abbreviated_int(value: i64) -> String {
    if value >= 1_000 {
        format_abbreviated(Decimal::from(value))
    } else {
        value.to_string()
    }
}

/// Insert comma separators into the integer digits of `raw`, preserving a
/// leading minus sign.
fn group_digits(raw: &str) -> String {
    let (sign, digits) = raw.strip_prefix('-').map_or(("", raw), |rest| ("-", rest));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && i % 3 == offset {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}")
}
