//! Money parsing and currency symbol mapping.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount written with either US (`1,234.56`) or EU (`1.234,56`)
/// separators. When both separators appear, the one occurring last is the
/// decimal separator. Returns `None` for anything that does not parse to a
/// non-negative decimal.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => {
            // EU style: '.' thousands, ',' decimal
            cleaned.replace('.', "").replace(',', ".")
        }
        (Some(_), Some(_)) => {
            // US style: ',' thousands, '.' decimal
            cleaned.replace(',', "")
        }
        (Some(_), None) => {
            // Comma only: assume decimal comma
            cleaned.replace(',', ".")
        }
        (None, _) => {
            // Dots only or plain digits: all but the last dot are thousands
            let parts: Vec<&str> = cleaned.split('.').collect();
            if parts.len() > 2 {
                format!("{}.{}", parts[..parts.len() - 1].concat(), parts[parts.len() - 1])
            } else {
                cleaned
            }
        }
    };

    Decimal::from_str(&normalized)
        .ok()
        .filter(|d| !d.is_sign_negative())
}

/// Map a currency symbol to its ISO-style code. Unknown symbols map to
/// `None`; the extractor never guesses a default currency.
pub fn currency_from_symbol(symbol: &str) -> Option<&'static str> {
    match symbol {
        "$" => Some("USD"),
        "€" => Some("EUR"),
        "£" => Some("GBP"),
        "¥" => Some("JPY"),
        "د.ل" => Some("LYD"),
        "د.إ" => Some("AED"),
        "﷼" => Some("SAR"),
        _ => None,
    }
}
