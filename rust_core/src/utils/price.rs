//! Price parsing and odds arithmetic.
//!
//! Sources report prices as strings ("1.85", "1,85", "17/20"). Parsing is an
//! explicit fallible step so a bad price is dropped deliberately instead of
//! leaking a NaN into persisted rows.

use crate::error::ParseError;

/// Parse a single decimal number, accepting `,` as the decimal separator when
/// no `.` is present.
fn parse_decimal(raw: &str) -> Result<f64, ParseError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(ParseError::Empty);
    }

    let parsed = if s.contains(',') && !s.contains('.') {
        s.replace(',', ".").parse::<f64>()
    } else {
        s.parse::<f64>()
    };

    parsed.map_err(|_| ParseError::InvalidNumber(s.to_string()))
}

/// Parse a scraped price into decimal odds.
///
/// Accepts decimal odds (`"1.85"`, `"1,85"`) and fractional odds (`"17/20"`,
/// converted to `1 + 17/20`). The result is always finite and strictly positive.
pub fn parse_price(raw: &str) -> Result<f64, ParseError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(ParseError::Empty);
    }

    let value = match s.split_once('/') {
        Some((num, den)) => {
            let num = parse_decimal(num)?;
            let den = parse_decimal(den)?;
            if den == 0.0 || num < 0.0 || den < 0.0 {
                return Err(ParseError::InvalidNumber(s.to_string()));
            }
            1.0 + num / den
        }
        None => parse_decimal(s)?,
    };

    if !value.is_finite() {
        return Err(ParseError::NonFinite(s.to_string()));
    }
    if value <= 0.0 {
        return Err(ParseError::NonPositive(value));
    }

    Ok(value)
}

/// Implied probability of decimal odds (0.0 for non-positive input).
#[inline]
pub fn implied_probability(price: f64) -> f64 {
    if price <= 0.0 {
        0.0
    } else {
        1.0 / price
    }
}

/// Bookmaker margin in percent for a complete set of mutually exclusive prices.
///
/// A fair book sums to 100% implied probability; anything above is the margin.
pub fn overround_pct(prices: &[f64]) -> f64 {
    if prices.is_empty() || prices.iter().any(|p| *p <= 0.0) {
        return 0.0;
    }
    let implied: f64 = prices.iter().map(|p| implied_probability(*p)).sum();
    (implied - 1.0) * 100.0
}
