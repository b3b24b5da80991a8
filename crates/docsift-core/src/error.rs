//! Error types for the docsift-core library.

use thiserror::Error;

/// Main error type for the docsift library.
#[derive(Error, Debug)]
pub enum DocsiftError {
    /// Rule set or pipeline configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rename planning error.
    #[error("rename error: {0}")]
    Rename(#[from] RenameError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading and validating a rule set or pipeline
/// configuration. These are all load-time failures: the pipeline never
/// starts processing documents with an invalid configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A rule regex failed to compile.
    #[error("invalid regex {pattern:?} for class {class:?}: {source}")]
    InvalidRegex {
        class: String,
        pattern: String,
        source: regex::Error,
    },

    /// A signal weight is negative.
    #[error("negative {kind} weight {value} for class {class:?}")]
    NegativeWeight {
        class: String,
        kind: &'static str,
        value: f64,
    },

    /// A per-class temperature is zero or negative.
    #[error("non-positive temperature {value} for class {class:?}")]
    NonPositiveTemperature { class: String, value: f64 },

    /// The global temperature default is zero or negative.
    #[error("non-positive default temperature {0}")]
    NonPositiveDefaultTemperature(f64),

    /// The confidence threshold is outside [0, 1].
    #[error("min_confidence {0} is outside [0, 1]")]
    InvalidMinConfidence(f64),

    /// The rules document failed to parse.
    #[error("failed to parse rules: {0}")]
    Parse(#[from] serde_json::Error),

    /// The rules file could not be read.
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while planning a rename.
#[derive(Error, Debug)]
pub enum RenameError {
    /// No free name could be found within the disambiguation bound.
    #[error("no free name for {base:?} after {attempts} attempts")]
    CollisionExhausted { base: String, attempts: u32 },

    /// The original path has no file name component.
    #[error("path has no file name: {0}")]
    NoFileName(String),
}

/// Result type for the docsift library.
pub type Result<T> = std::result::Result<T, DocsiftError>;
