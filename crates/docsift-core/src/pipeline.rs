//! Pipeline composition: classification followed by conditional extraction.

use crate::classify::{Classification, Classifier};
use crate::extract::{InvoiceFields, extract_invoice_fields};

/// Classification plus the extraction that ran for it, if any.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub classification: Classification,
    pub extracted: Option<InvoiceFields>,
}

/// Class for which field extraction is defined.
pub const INVOICE_CLASS: &str = "invoice";

/// Run the per-document pipeline on extracted text: score, calibrate,
/// threshold, and — when the decision is `invoice` — extract fields.
/// Rename planning needs destination-directory state and stays with the
/// caller.
pub fn analyze_text(classifier: &Classifier, text: &str) -> Analysis {
    let classification = classifier.classify(text);
    let extracted =
        (classification.top_class == INVOICE_CLASS).then(|| extract_invoice_fields(text));

    Analysis {
        classification,
        extracted,
    }
}
