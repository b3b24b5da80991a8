//! Rename planning: filename building, sanitization, collision resolution.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::RenameError;
use crate::extract::InvoiceFields;

/// Placeholder substituted for a missing field so a rename degrades
/// gracefully instead of producing a malformed name.
pub const MISSING_FIELD: &str = "NA";

/// Extension used when the original file has none.
pub const DEFAULT_EXTENSION: &str = ".pdf";

/// Upper bound on collision disambiguation attempts.
pub const MAX_COLLISION_ATTEMPTS: u32 = 9999;

const MAX_COMPONENT_LEN: usize = 180;

/// A planned rename. The proposed path stays in the planner's directory
/// and is guaranteed free at plan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    /// Path of the document as it exists now.
    pub original: PathBuf,

    /// Collision-free target path.
    pub proposed: PathBuf,

    /// Disambiguation counter; 0 when the base name was free.
    pub counter: u32,
}

/// Sanitize one filename component: path separators and characters illegal
/// on common filesystems become underscores, runs of whitespace and
/// underscores collapse to a single underscore, and leading/trailing dots
/// and underscores are trimmed. Idempotent.
pub fn sanitize_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_sep = false;
    for c in s.chars().take(MAX_COMPONENT_LEN) {
        let c = if matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
        {
            '_'
        } else {
            c
        };
        if c == '_' || c.is_whitespace() {
            pending_sep = true;
        } else {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        }
    }
    out.trim_matches(['.', '_', ' ']).to_string()
}

/// Build the target filename for an extracted invoice:
/// `Inv_{number}_{customer}_{total}_{date}` plus the extension. Missing
/// fields substitute [`MISSING_FIELD`]; the total keeps two decimals.
pub fn build_invoice_filename(fields: &InvoiceFields, extension: &str) -> String {
    let number = fields.invoice_number.as_deref().unwrap_or(MISSING_FIELD);
    let customer = fields.customer_name.as_deref().unwrap_or(MISSING_FIELD);
    let total = fields
        .total_value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| MISSING_FIELD.to_string());
    let date = fields
        .invoice_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| MISSING_FIELD.to_string());

    format!(
        "Inv_{}_{}_{}_{}{}",
        sanitize_component(number),
        sanitize_component(customer),
        sanitize_component(&total),
        sanitize_component(&date),
        extension,
    )
}

/// Collision-resolution authority for one destination directory.
///
/// The planner is seeded with a snapshot of the names already present and
/// records every name it hands out, so routing all plans for a directory
/// through one planner guarantees no two documents get the same target,
/// regardless of how the surrounding batch is parallelized.
#[derive(Debug, Clone)]
pub struct RenamePlanner {
    dir: PathBuf,
    taken: HashSet<String>,
    max_attempts: u32,
}

impl RenamePlanner {
    /// Create a planner seeded from the directory's current contents.
    pub fn scan(dir: &Path) -> crate::error::Result<Self> {
        let mut taken = HashSet::new();
        for entry in std::fs::read_dir(dir)? {
            taken.insert(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(Self::with_existing(dir, taken))
    }

    /// Create a planner from an explicit set of occupied names.
    pub fn with_existing<I>(dir: &Path, names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            dir: dir.to_path_buf(),
            taken: names.into_iter().collect(),
            max_attempts: MAX_COLLISION_ATTEMPTS,
        }
    }

    /// Lower the disambiguation bound (mainly for tests).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Plan a rename for one document. Deterministic given the same
    /// directory snapshot and planning order.
    pub fn plan(
        &mut self,
        original: &Path,
        fields: &InvoiceFields,
    ) -> Result<RenamePlan, RenameError> {
        if original.file_name().is_none() {
            return Err(RenameError::NoFileName(original.display().to_string()));
        }

        let extension = original
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        let base = build_invoice_filename(fields, &extension);
        let stem = &base[..base.len() - extension.len()];

        let (name, counter) = self.resolve(&base, stem, &extension)?;
        self.taken.insert(name.clone());

        debug!(original = %original.display(), proposed = %name, counter, "planned rename");

        Ok(RenamePlan {
            original: original.to_path_buf(),
            proposed: self.dir.join(name),
            counter,
        })
    }

    fn resolve(
        &self,
        base: &str,
        stem: &str,
        extension: &str,
    ) -> Result<(String, u32), RenameError> {
        if self.is_free(base) {
            return Ok((base.to_string(), 0));
        }
        for counter in 1..=self.max_attempts {
            let candidate = format!("{stem}_{counter}{extension}");
            if self.is_free(&candidate) {
                return Ok((candidate, counter));
            }
        }
        Err(RenameError::CollisionExhausted {
            base: base.to_string(),
            attempts: self.max_attempts,
        })
    }

    fn is_free(&self, name: &str) -> bool {
        !self.taken.contains(name) && !self.dir.join(name).exists()
    }
}
