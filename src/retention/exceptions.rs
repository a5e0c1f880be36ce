use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::error::{RetentionError, RetentionResult};

/// Column read from the exception file when none is configured.
pub const DEFAULT_EXCEPTION_COLUMN: &str = "Archivo";

/// Protected paths. Membership is exact string equality: no trailing-slash
/// or case normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionSet {
    paths: HashSet<String>,
}

impl ExceptionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Load `column` from an exception file, picking the reader by extension:
    /// `.csv` as delimited text, anything else (`.xlsx`, `.xls`) as a workbook.
    pub fn load(path: &Path, column: &str) -> RetentionResult<Self> {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        let set = if is_csv {
            Self::load_csv(path, column)?
        } else {
            Self::load_workbook(path, column)?
        };
        log::info!(
            "Loaded {} exception paths from {}",
            set.len(),
            path.display()
        );
        Ok(set)
    }

    /// Load one column of the first sheet of an Excel workbook; row one holds the headers.
    pub fn load_workbook(path: &Path, column: &str) -> RetentionResult<Self> {
        let source_err = |reason: String| RetentionError::ExceptionSource {
            path: path.display().to_string(),
            reason,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| source_err(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| source_err("workbook has no sheets".to_string()))?
            .map_err(|e| source_err(e.to_string()))?;

        let mut rows = range.rows();
        let index = rows
            .next()
            .and_then(|header| {
                header
                    .iter()
                    .position(|cell| matches!(cell, Data::String(name) if name == column))
            })
            .ok_or_else(|| source_err(format!("column '{}' not found", column)))?;

        let mut paths = HashSet::new();
        for row in rows {
            match row.get(index) {
                None | Some(Data::Empty) => {}
                Some(Data::String(value)) if value.is_empty() => {}
                Some(cell) => {
                    paths.insert(cell.to_string());
                }
            }
        }
        Ok(ExceptionSet { paths })
    }

    /// Load one column of a CSV file with a header row.
    pub fn load_csv(path: &Path, column: &str) -> RetentionResult<Self> {
        let source_err = |reason: String| RetentionError::ExceptionSource {
            path: path.display().to_string(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| source_err(e.to_string()))?;

        let headers = reader.headers().map_err(|e| source_err(e.to_string()))?;
        let index = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| source_err(format!("column '{}' not found", column)))?;

        let mut paths = HashSet::new();
        for record in reader.records() {
            let record = record.map_err(|e| source_err(e.to_string()))?;
            match record.get(index) {
                Some(value) if !value.is_empty() => {
                    paths.insert(value.to_string());
                }
                _ => {}
            }
        }
        Ok(ExceptionSet { paths })
    }

    /// Drop protected paths, keeping candidate order.
    pub fn filter(&self, candidates: Vec<String>) -> Vec<String> {
        candidates
            .into_iter()
            .filter(|path| !self.contains(path))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ExceptionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        ExceptionSet {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}
