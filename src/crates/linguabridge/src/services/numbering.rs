//! Human-facing document numbers: `Q-`, `INV-` and `PO-YYYYMMDD-NNNN`

use chrono::NaiveDate;
use sqlx::SqliteConnection;

use crate::Result;

/// Attempts a creator makes before giving up on a number collision
pub const MAX_NUMBER_ATTEMPTS: u32 = 5;

/// Kind of numbered document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Quote,
    Invoice,
    PurchaseOrder,
}

impl DocumentKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "Q",
            DocumentKind::Invoice => "INV",
            DocumentKind::PurchaseOrder => "PO",
        }
    }

    fn table_and_column(&self) -> (&'static str, &'static str) {
        match self {
            DocumentKind::Quote => ("quotes", "quote_number"),
            DocumentKind::Invoice => ("invoices", "invoice_number"),
            DocumentKind::PurchaseOrder => ("purchase_orders", "po_number"),
        }
    }

    /// `table.column` as it appears in SQLite UNIQUE failures
    pub fn unique_column(&self) -> String {
        let (table, column) = self.table_and_column();
        format!("{}.{}", table, column)
    }
}

/// Render a document number
pub fn format_number(kind: DocumentKind, date: NaiveDate, sequence: u32) -> String {
    format!("{}-{}-{:04}", kind.prefix(), date.format("%Y%m%d"), sequence)
}

/// Sequence part of a number issued for `kind` on `date`
pub fn parse_sequence(kind: DocumentKind, date: NaiveDate, number: &str) -> Option<u32> {
    let day_prefix = format!("{}-{}-", kind.prefix(), date.format("%Y%m%d"));
    number.strip_prefix(&day_prefix)?.parse().ok()
}

/// Next free number for the day; `attempt` skips past numbers lost to a race
pub async fn next_number(
    conn: &mut SqliteConnection,
    kind: DocumentKind,
    date: NaiveDate,
    attempt: u32,
) -> Result<String> {
    let (table, column) = kind.table_and_column();
    let pattern = format!("{}-{}-%", kind.prefix(), date.format("%Y%m%d"));
    let sql = format!("SELECT {column} FROM {table} WHERE {column} LIKE ?");

    let issued: Vec<(String,)> = sqlx::query_as(&sql)
        .bind(&pattern)
        .fetch_all(&mut *conn)
        .await?;

    let highest = issued
        .iter()
        .filter_map(|(number,)| parse_sequence(kind, date, number))
        .max()
        .unwrap_or(0);

    Ok(format_number(kind, date, highest + 1 + attempt))
}
