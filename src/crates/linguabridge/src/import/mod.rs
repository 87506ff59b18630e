//! Batch import of legacy CRM exports
//!
//! Reads TSV/CSV files with the `csv` crate, maps loosely named columns onto
//! the schema and inserts row by row. A row missing a required field is
//! skipped; a row the database rejects (duplicate email, for example) is
//! counted as failed. Neither stops the run.

mod columns;
pub mod customers;
pub mod linguists;

use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub use customers::import_customers;
pub use linguists::import_linguists;

use crate::db::DatabasePool;

/// Errors that abort an import
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Cannot open input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed input: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column missing: {0}")]
    MissingColumn(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Field separator of the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
        }
    }

    /// Guess from the file extension; anything but `.csv` is treated as TSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Delimiter::Comma,
            _ => Delimiter::Tab,
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tab" | "tsv" | "\\t" => Ok(Delimiter::Tab),
            "comma" | "csv" | "," => Ok(Delimiter::Comma),
            other => Err(format!("unknown delimiter: {}", other)),
        }
    }
}

/// Row counts of one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.imported + self.skipped + self.failed
    }
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "imported={} skipped={} failed={}",
            self.imported, self.skipped, self.failed
        )
    }
}

/// What kind of record a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Linguists,
    Customers,
}

/// Import a file from disk
pub async fn import_file(
    pool: &DatabasePool,
    kind: ImportKind,
    path: &Path,
    delimiter: Delimiter,
) -> Result<ImportSummary, ImportError> {
    let file = File::open(path)?;
    let summary = match kind {
        ImportKind::Linguists => import_linguists(pool, file, delimiter).await?,
        ImportKind::Customers => import_customers(pool, file, delimiter).await?,
    };
    tracing::info!("Import of {} finished: {}", path.display(), summary);
    Ok(summary)
}

fn reader<R: std::io::Read>(input: R, delimiter: Delimiter) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}
