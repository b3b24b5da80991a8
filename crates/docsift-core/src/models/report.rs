//! Per-document result shape consumed by the CLI for printing and CSV
//! export.

use serde::{Deserialize, Serialize};

use crate::classify::ProbabilityVector;
use crate::extract::InvoiceFields;

/// Everything the pipeline produced for one document.
///
/// An upstream text-extraction failure is carried in `error` rather than
/// raised, so a batch can report per-document errors while still emitting a
/// well-formed record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Input path of the document.
    pub path_in: String,

    /// Path the document was actually renamed to, when a rename ran.
    pub path_out: Option<String>,

    /// Decided class, fallback override already applied.
    pub top_class: String,

    /// Probability of the winning class.
    pub confidence: f64,

    /// Full calibrated distribution.
    pub probabilities: ProbabilityVector,

    /// Extracted invoice fields; `None` for non-invoice decisions.
    pub extracted: Option<InvoiceFields>,

    /// Collision-free target name proposed by the renamer.
    pub proposed_path: Option<String>,

    /// Upstream text-extraction or rename error, represented as data.
    pub error: Option<String>,
}
