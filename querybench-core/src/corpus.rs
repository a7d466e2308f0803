//! Query Corpus Loading
//!
//! Loads `.sql` files from a directory into `Statement`s. Only the file
//! extension is inspected, case-insensitively; everything else in the
//! directory is ignored. Statements come back sorted by name so every run
//! walks the corpus in the same order.

use crate::Statement;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading the query corpus
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus directory does not exist or is not a directory
    #[error("query directory not found: {0}")]
    NotFound(String),

    /// Two corpus files derive the same statement name
    #[error("duplicate statement name '{name}' (from {first} and {second})")]
    DuplicateName {
        /// The colliding name
        name: String,
        /// First file deriving the name
        first: String,
        /// Second file deriving the name
        second: String,
    },

    /// Underlying filesystem failure
    #[error("failed to read query corpus: {0}")]
    Io(#[from] std::io::Error),
}

/// Load every `.sql` statement in `dir`, sorted by statement name.
///
/// The statement name is the file stem, so `daily_revenue.sql` becomes
/// `daily_revenue`. Non-`.sql` entries are skipped. An empty directory
/// yields an empty corpus, which is not an error.
pub fn load_statements(dir: impl AsRef<Path>) -> Result<Vec<Statement>, CorpusError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(CorpusError::NotFound(dir.display().to_string()));
    }

    let mut entries: Vec<(String, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_sql = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"));
        if !is_sql {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        entries.push((name.to_string(), path));
    }

    // Name order is the execution order for the whole run.
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut statements = Vec::with_capacity(entries.len());
    for (i, (name, path)) in entries.iter().enumerate() {
        if i > 0 && entries[i - 1].0 == *name {
            return Err(CorpusError::DuplicateName {
                name: name.clone(),
                first: entries[i - 1].1.display().to_string(),
                second: path.display().to_string(),
            });
        }
        let sql = std::fs::read_to_string(path)?;
        statements.push(Statement::new(name.clone(), sql));
    }
    Ok(statements)
}
