//! CSV ingest and normalization.
//!
//! This module turns a heterogeneous load–elongation CSV (testing machines
//! and spreadsheet exports disagree on headers) into a clean, ordered set of
//! `TestRow`s that are safe to analyze.
//!
//! Design goals:
//! - **Flexible headers** via a case-insensitive alias table
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (stable sort, no hidden heuristics)
//! - **Separation of concerns**: no stress/strain math here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::TestRow;
use crate::error::AppError;

/// Accepted header names for the force column, lowercase.
const FORCE_ALIASES: [&str; 5] = ["force", "force (n)", "force_n", "load", "load (n)"];

/// Accepted header names for the elongation column, lowercase.
const ELONGATION_ALIASES: [&str; 6] = [
    "elongation",
    "elongation (mm)",
    "elongation_mm",
    "extension",
    "extension (mm)",
    "displacement",
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: ordered rows + counters for the validity report.
#[derive(Debug, Clone)]
pub struct IngestedRows {
    /// Usable rows, ordered by elongation.
    pub rows: Vec<TestRow>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
    /// Number of adjacent input pairs that were out of order before sorting.
    pub out_of_order: usize,
    /// Number of rows sharing an elongation value with their predecessor.
    pub duplicate_elongation: usize,
}

impl IngestedRows {
    /// Wrap already-clean rows (simulator path) so the rest of the pipeline
    /// sees the same shape as a CSV ingest.
    pub fn from_rows(rows: Vec<TestRow>) -> Self {
        let n = rows.len();
        Self {
            rows,
            row_errors: Vec::new(),
            rows_read: n,
            rows_used: n,
            out_of_order: 0,
            duplicate_elongation: 0,
        }
    }
}

/// Load and normalize a load–elongation CSV.
pub fn load_test_rows(path: &Path) -> Result<IngestedRows, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let force_idx = resolve_column(&header_map, &FORCE_ALIASES).ok_or_else(|| {
        AppError::usage(format!(
            "Missing force column. Accepted headers: {}.",
            FORCE_ALIASES.join(", ")
        ))
    })?;
    let elong_idx = resolve_column(&header_map, &ELONGATION_ALIASES).ok_or_else(|| {
        AppError::usage(format!(
            "Missing elongation column. Accepted headers: {}.",
            ELONGATION_ALIASES.join(", ")
        ))
    })?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, line, force_idx, elong_idx) {
            Ok(row) => rows.push(row),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if rows.is_empty() {
        return Err(AppError::data(
            "No valid measurement rows remain after validation.",
        ));
    }

    let out_of_order = rows
        .windows(2)
        .filter(|w| w[1].elongation_mm < w[0].elongation_mm)
        .count();
    if out_of_order > 0 {
        rows.sort_by(|a, b| {
            a.elongation_mm
                .partial_cmp(&b.elongation_mm)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
    let duplicate_elongation = rows
        .windows(2)
        .filter(|w| w[1].elongation_mm == w[0].elongation_mm)
        .count();

    let rows_used = rows.len();
    Ok(IngestedRows {
        rows,
        row_errors,
        rows_read,
        rows_used,
        out_of_order,
        duplicate_elongation,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿force"). If we don't strip it, column resolution
    // will incorrectly report a missing column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_column(header_map: &HashMap<String, usize>, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|a| header_map.get(*a).copied())
}

fn parse_row(
    record: &StringRecord,
    line: usize,
    force_idx: usize,
    elong_idx: usize,
) -> Result<TestRow, String> {
    let force_n = parse_field(record, force_idx, "force")?;
    let elongation_mm = parse_field(record, elong_idx, "elongation")?;

    if force_n < 0.0 {
        return Err(format!("Negative force value: {force_n}"));
    }
    if elongation_mm < 0.0 {
        return Err(format!("Negative elongation value: {elongation_mm}"));
    }

    Ok(TestRow {
        line,
        force_n,
        elongation_mm,
    })
}

fn parse_field(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing `{name}` value."))?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{raw}'."))?;
    if !v.is_finite() {
        return Err(format!("Non-finite `{name}` value '{raw}'."));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        let unique = format!(
            "tensile_ingest_test_{}_{:x}.csv",
            std::process::id(),
            contents.len() * 31 + contents.bytes().map(usize::from).sum::<usize>()
        );
        path.push(unique);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_canonical_headers() {
        let path = write_temp_csv("Force (N),Elongation (mm)\n0,0\n1000,0.1\n2000,0.2\n");
        let ingest = load_test_rows(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ingest.rows_used, 3);
        assert!(ingest.row_errors.is_empty());
        assert_eq!(ingest.rows[2].line, 4);
        assert!((ingest.rows[2].force_n - 2000.0).abs() < 1e-12);
    }

    #[test]
    fn resolves_alias_headers_and_bom() {
        let path = write_temp_csv("\u{feff}Load,Extension\n100,0.01\n200,0.02\n");
        let ingest = load_test_rows(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(ingest.rows_used, 2);
    }

    #[test]
    fn bad_rows_are_skipped_with_diagnostics() {
        let path = write_temp_csv("force,elongation\n100,0.01\nnot-a-number,0.02\n300,\n-5,0.04\n400,0.05\n");
        let ingest = load_test_rows(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ingest.rows_used, 2);
        assert_eq!(ingest.row_errors.len(), 3);
        assert_eq!(ingest.row_errors[0].line, 3);
    }

    #[test]
    fn unordered_rows_are_sorted_and_counted() {
        let path = write_temp_csv("force,elongation\n100,0.02\n50,0.01\n200,0.03\n");
        let ingest = load_test_rows(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ingest.out_of_order, 1);
        assert!(ingest.rows.windows(2).all(|w| w[0].elongation_mm <= w[1].elongation_mm));
    }

    #[test]
    fn missing_force_column_is_usage_error() {
        let path = write_temp_csv("stress,elongation\n100,0.01\n");
        let err = load_test_rows(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn all_rows_invalid_is_data_error() {
        let path = write_temp_csv("force,elongation\nx,y\n");
        let err = load_test_rows(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), 3);
    }
}
