//! CSV Helpers
//!
//! Local checks on a user import file before it is uploaded, and parsing of
//! CSV exports for display. The backend stays the authority on what it
//! accepts; the pre-flight only catches files it would certainly reject.

use crate::model::Role;
use std::path::Path;
use thiserror::Error;

/// Columns every user import file must carry
pub const REQUIRED_USER_COLUMNS: [&str; 2] = ["username", "role"];

const MAX_REPORTED_ERRORS: usize = 100;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Outcome of checking a user import file locally
#[derive(Debug, Default)]
pub struct ImportPreflight {
    pub headers: Vec<String>,
    pub rows: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl ImportPreflight {
    pub fn is_clean(&self) -> bool {
        self.rows_failed == 0
    }
}

/// Check a user import file: required headers, non-blank usernames, and
/// known roles in any casing
pub fn preflight_user_import(data: &[u8]) -> Result<ImportPreflight, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();

    let missing: Vec<String> = REQUIRED_USER_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .map(|s| s.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CsvError::MissingColumns(missing));
    }

    let column = |name: &str| headers.iter().position(|h| h == name);
    let username_col = column("username");
    let role_col = column("role");

    let mut check = ImportPreflight {
        headers: headers.clone(),
        ..Default::default()
    };

    for (index, result) in reader.records().enumerate() {
        // Header is line 1
        let line = index + 2;
        check.rows += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                check.errors.push(format!("Line {line}: {e}"));
                check.rows_failed += 1;
                continue;
            }
        };

        let username = username_col.and_then(|i| record.get(i)).unwrap_or_default();
        let role = role_col.and_then(|i| record.get(i)).unwrap_or_default();

        let mut row_ok = true;
        if username.is_empty() {
            check.errors.push(format!("Line {line}: username is empty"));
            row_ok = false;
        }
        if let Err(e) = role.parse::<Role>() {
            check.errors.push(format!("Line {line}: {e}"));
            row_ok = false;
        }
        if !row_ok {
            check.rows_failed += 1;
        }
    }

    if check.errors.len() > MAX_REPORTED_ERRORS {
        let total = check.errors.len();
        check.errors.truncate(MAX_REPORTED_ERRORS);
        check
            .errors
            .push(format!("... and {} more errors", total - MAX_REPORTED_ERRORS));
    }

    tracing::debug!(rows = check.rows, failed = check.rows_failed, "User import pre-flight");
    Ok(check)
}

/// Read and check an import file from disk
pub fn preflight_user_import_file(path: &Path) -> Result<(Vec<u8>, ImportPreflight), CsvError> {
    let data = std::fs::read(path)?;
    let check = preflight_user_import(&data)?;
    Ok((data, check))
}

/// A parsed CSV export
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn parse(data: &[u8]) -> Result<Self, CsvError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader
            .records()
            .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
            .collect::<Result<_, _>>()?;
        Ok(Self { headers, rows })
    }

    /// Render as left-aligned columns with a rule under the header
    pub fn render(&self) -> String {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);

        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&self.headers).chain(&self.rows) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let line = |row: &[String]| -> String {
            widths
                .iter()
                .enumerate()
                .map(|(i, &w)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    format!("{cell:<w$}")
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = line(&self.headers);
        out.push('\n');
        out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * columns.saturating_sub(1)));
        for row in &self.rows {
            out.push('\n');
            out.push_str(&line(row));
        }
        out
    }
}
