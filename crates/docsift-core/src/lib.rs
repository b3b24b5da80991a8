//! Core library for document classification and invoice auto-renaming.
//!
//! This crate provides:
//! - Rule-set configuration (keywords, phrases, regexes, weighted per class)
//! - Raw scoring and temperature-scaled softmax calibration
//! - Confidence thresholding with a reserved fallback class
//! - Invoice field extraction (number, customer, date, total, currency)
//! - Collision-free rename planning
//!
//! The library is a pure computation core: PDF parsing, OCR, and the actual
//! on-disk renames belong to the surrounding driver.

pub mod classify;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod rename;
pub mod rules;

pub use classify::{Classification, Classifier, ProbabilityVector, ScoreVector};
pub use error::{ConfigError, DocsiftError, RenameError, Result};
pub use extract::{InvoiceFields, extract_invoice_fields};
pub use models::{DocumentReport, PipelineConfig, SignalWeights};
pub use pipeline::{Analysis, INVOICE_CLASS, analyze_text};
pub use rename::{RenamePlan, RenamePlanner, build_invoice_filename, sanitize_component};
pub use rules::{ClassSpec, FALLBACK_CLASS, RuleSet};
