//! Header matching for legacy exports
//!
//! Headers are compared after lowercasing and dropping everything that is not
//! a letter or digit, so `First Name`, `first_name` and `FIRSTNAME` agree.

use std::collections::HashMap;

use csv::StringRecord;

/// A schema field and the header spellings that feed it
pub(crate) struct Column {
    pub field: &'static str,
    pub aliases: &'static [&'static str],
}

pub(crate) fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Field name to column index for one file
pub(crate) struct ColumnMap {
    index: HashMap<&'static str, usize>,
}

impl ColumnMap {
    /// First matching header wins for each field
    pub fn new(headers: &StringRecord, columns: &[Column]) -> Self {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut index = HashMap::new();
        for column in columns {
            let position = normalized
                .iter()
                .position(|h| column.aliases.iter().any(|alias| h == alias));
            if let Some(position) = position {
                index.insert(column.field, position);
            }
        }
        Self { index }
    }

    pub fn has(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// Trimmed, non-empty cell value
    pub fn get<'r>(&self, record: &'r StringRecord, field: &str) -> Option<&'r str> {
        let position = *self.index.get(field)?;
        record.get(position).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn get_string(&self, record: &StringRecord, field: &str) -> Option<String> {
        self.get(record, field).map(str::to_string)
    }

    /// Numbers may carry currency or unit decoration (`$45.00`, `30 mi`)
    pub fn get_f64(&self, record: &StringRecord, field: &str) -> Option<f64> {
        let raw = self.get(record, field)?;
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
            .collect();
        cleaned.parse().ok()
    }

    pub fn get_bool(&self, record: &StringRecord, field: &str) -> Option<bool> {
        self.get(record, field).map(parse_flag)
    }
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "true" | "t" | "1" | "x" | "active"
    )
}

/// Split a language cell such as `English, Spanish; Haitian Creole | fr`
pub(crate) fn split_languages(value: &str) -> Vec<String> {
    value
        .split([',', ';', '|'])
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
