//! Structured field extraction for documents classified as invoices.
//!
//! Extraction never fails: each field is tried against its candidate
//! patterns in priority order, implausible matches fall through to the next
//! candidate, and a field with no plausible match stays `None`.

pub mod dates;
pub mod money;
pub mod patterns;

pub use dates::normalize_date;
pub use money::{currency_from_symbol, parse_amount};

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use patterns::{
    CUSTOMER_LABELED, INVOICE_DATE_LABELED, INVOICE_NUMBER_LABELED, INVOICE_NUMBER_STANDALONE,
    TOTAL_LABELED,
};

/// Fields extracted from an invoice. Every field is independently
/// nullable; partial extraction is a normal outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceFields {
    pub invoice_number: Option<String>,

    pub customer_name: Option<String>,

    /// Normalized calendar date, serialized as YYYY-MM-DD.
    pub invoice_date: Option<NaiveDate>,

    /// Total amount as a decimal, serialized as a number.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_value: Option<Decimal>,

    /// ISO-style code derived from a symbol adjacent to the total.
    pub currency: Option<String>,
}

impl InvoiceFields {
    /// True when no field was extracted.
    pub fn is_empty(&self) -> bool {
        self.invoice_number.is_none()
            && self.customer_name.is_none()
            && self.invoice_date.is_none()
            && self.total_value.is_none()
            && self.currency.is_none()
    }
}

/// Extract invoice fields from document text.
pub fn extract_invoice_fields(text: &str) -> InvoiceFields {
    let (total_value, currency) = extract_total(text);
    let fields = InvoiceFields {
        invoice_number: extract_invoice_number(text),
        customer_name: extract_customer_name(text),
        invoice_date: extract_invoice_date(text),
        total_value,
        currency,
    };
    debug!(empty = fields.is_empty(), "extracted invoice fields");
    fields
}

fn extract_invoice_number(text: &str) -> Option<String> {
    for caps in INVOICE_NUMBER_LABELED.captures_iter(text) {
        let candidate = caps[1].trim_matches(['-', '/']).to_string();
        if candidate.len() >= 3 {
            return Some(candidate);
        }
    }
    INVOICE_NUMBER_STANDALONE
        .captures(text)
        .map(|caps| caps[1].to_uppercase())
}

fn extract_customer_name(text: &str) -> Option<String> {
    lazy_static! {
        static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
    }

    for caps in CUSTOMER_LABELED.captures_iter(text) {
        let cleaned = SPACES.replace_all(&caps[1], " ");
        let cleaned = cleaned.trim_matches([' ', ':', ',', '.']);
        // A plausible name has at least two letters and is not just
        // punctuation left over from the label line.
        if cleaned.chars().filter(|c| c.is_alphabetic()).count() >= 2 {
            return Some(cleaned.to_string());
        }
    }
    None
}

fn extract_invoice_date(text: &str) -> Option<NaiveDate> {
    // A pattern can match text that fails calendar normalization (e.g.
    // 31.02.2024); skip to the next candidate instead of giving up.
    INVOICE_DATE_LABELED
        .captures_iter(text)
        .find_map(|caps| normalize_date(&caps[1]))
}

fn extract_total(text: &str) -> (Option<Decimal>, Option<String>) {
    for caps in TOTAL_LABELED.captures_iter(text) {
        let Some(value) = parse_amount(&caps[2]) else {
            continue;
        };
        let symbol = caps.get(1).or_else(|| caps.get(3));
        let currency = symbol
            .and_then(|m| currency_from_symbol(m.as_str()))
            .map(str::to_string);
        return (Some(value), currency);
    }
    (None, None)
}
