//! Candidate regex patterns for invoice field extraction.
//!
//! Each field has an ordered list of candidates; the extractor tries them
//! in priority order and takes the first match that yields a plausible
//! value. Labels match case-insensitively while value captures stay
//! case-sensitive, so label words like "Date" are not mistaken for values.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice number: labeled form first
    pub static ref INVOICE_NUMBER_LABELED: Regex = Regex::new(
        r"(?i:invoice\s*(?:no\.?|number|num\.?)?\s*[:#]?)\s*([A-Z0-9][A-Z0-9/-]{2,})"
    ).unwrap();

    // Standalone form like INV-12345 or INV/2024/001
    pub static ref INVOICE_NUMBER_STANDALONE: Regex = Regex::new(
        r"\b((?i:INV)[-/]?\d[\dA-Z/-]*)\b"
    ).unwrap();

    // Customer name after a billing label
    pub static ref CUSTOMER_LABELED: Regex = Regex::new(
        r"(?is)\b(?:bill(?:ed)?\s+to|customer|client)\b\s*[:\n\r]+[ \t]*([\p{L}][\p{L} .,&'-]{1,79})"
    ).unwrap();

    // Labeled date with the value in one of the supported surface forms
    pub static ref INVOICE_DATE_LABELED: Regex = Regex::new(
        r"(?i:\b(?:invoice\s+date|date\s+of\s+issue|issue\s+date|date)\b\s*[:#-]?)\s*(\d{4}[./-]\d{1,2}[./-]\d{1,2}|\d{1,2}[./-]\d{1,2}[./-]\d{2,4}|[A-Za-z]{3,9}\.?\s+\d{1,2},?\s+\d{2,4}|\d{1,2}\s+[A-Za-z]{3,9}\.?,?\s+\d{2,4})"
    ).unwrap();

    // Labeled total with optional adjacent currency symbol on either side
    pub static ref TOTAL_LABELED: Regex = Regex::new(
        r"(?is)\b(?:grand\s+total|total\s+due|amount\s+due|total)\b\s*[:#-]?\s*(\p{Sc})?\s*((?:\d{1,3}(?:[.,]\d{3})+|\d+)(?:[.,]\d{1,2})?)(?:\s*(\p{Sc}))?"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_labeled_skips_label_words() {
        // "Date" after "Invoice" must not be captured as a number.
        assert!(INVOICE_NUMBER_LABELED.captures("Invoice Date: 01.02.2024").is_none());

        let caps = INVOICE_NUMBER_LABELED
            .captures("Invoice No: INV-12345")
            .unwrap();
        assert_eq!(&caps[1], "INV-12345");
    }

    #[test]
    fn test_invoice_number_standalone() {
        let caps = INVOICE_NUMBER_STANDALONE
            .captures("see inv/2024/001 for details")
            .unwrap();
        assert_eq!(&caps[1], "inv/2024/001");
    }

    #[test]
    fn test_total_captures_symbol_on_either_side() {
        let caps = TOTAL_LABELED.captures("Total due: € 1.234,56").unwrap();
        assert_eq!(&caps[1], "€");
        assert_eq!(&caps[2], "1.234,56");

        let caps = TOTAL_LABELED.captures("Grand Total 99.50 $").unwrap();
        assert!(caps.get(1).is_none());
        assert_eq!(&caps[2], "99.50");
        assert_eq!(&caps[3], "$");
    }
}
