use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::BillError;

pub type Figure = Decimal;
pub type Sign = String;

pub const DEFAULT_CURRENCY_SIGN: &str = "R$";

// Longest first, "R$" must be stripped before "$"
const CURRENCY_PREFIXES: [&str; 4] = ["R$", "$", "€", "£"];

/// Rounds half-up to cents and always keeps a two digit scale, so that
/// `100` is stored and printed as `100.00`.
pub fn quantize(figure: Figure) -> Figure {
    let mut rounded = figure.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Reads an amount typed by a user in either the `1.234,56` or the
/// `1,234.56` convention.
///
/// When both separators appear, the last one is the decimal point and the
/// other one groups thousands. A lone comma is a decimal point. Anything
/// else is handed to the decimal parser as is.
pub fn parse_money(raw: &str) -> Result<Figure, BillError> {
    let mut cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if let Some(prefix) = CURRENCY_PREFIXES.iter().find(|prefix| cleaned.starts_with(*prefix)) {
        cleaned = cleaned[prefix.len()..].to_string();
    }

    if cleaned.is_empty() {
        return Err(BillError::validation("The amount cannot be empty"));
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    Decimal::from_str(&normalized)
        .map(quantize)
        .map_err(|_| BillError::validation(format!("Could not read the amount '{}'", raw.trim())))
}

/// `R$ 1.234,56`. Absent figures are shown as zero.
pub fn format_money(figure: Option<&Figure>, sign: &str) -> String {
    let figure = quantize(figure.copied().unwrap_or(Decimal::ZERO));
    let negative = figure.is_sign_negative() && !figure.is_zero();

    let digits = figure.abs().to_string();
    let (units, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (position, digit) in units.chars().enumerate() {
        if position > 0 && (units.len() - position) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{} {}{},{}", sign, if negative { "-" } else { "" }, grouped, cents)
}

/// Splits `total` into `count` parts of `total / count` rounded to cents.
/// The last part absorbs the rounding remainder so the parts always add up
/// to the total.
pub fn split_installments(total: Figure, count: u32) -> Vec<Figure> {
    let total = quantize(total);
    if count <= 1 {
        return vec![total];
    }

    let base = quantize(total / Decimal::from(count));
    let mut parts = vec![base; count as usize];

    let remainder = total - base * Decimal::from(count);
    if let Some(last) = parts.last_mut() {
        *last = quantize(*last + remainder);
    }

    parts
}
