mod cells;
mod columns;
mod csv_out;
mod document;
mod error;
mod header;
mod json_out;
mod merge;
mod model;
mod normalize;
mod options;
mod pdf_reader;
mod rows;
mod segment;
mod source;
mod warning;

use std::path::Path;

use serde::Serialize;

pub use cells::{assign_cells, is_blank};
pub use columns::{choose_strategy, cluster_anchors, detect_columns, header_anchors};
pub use csv_out::{write_csv, write_csv_to_string};
pub use document::{extract_page_tables, extract_tables, extract_tables_from_source};
pub use error::ExtractError;
pub use header::{HeaderChoice, HeaderReason, classify_header, header_reason};
pub use json_out::{write_json, write_json_to_string};
pub use model::{ColumnAnchor, ColumnStrategy, DocumentTables, Page, RawToken, Row, Table, Token};
pub use normalize::{normalize_text, normalize_token, normalize_tokens};
pub use options::{DecodeFailurePolicy, ExtractOptions, HeaderMode, PageSelection, TableSettings};
pub use pdf_reader::PdfTokenSource;
pub use rows::{estimate_vertical_tolerance, group_rows};
pub use segment::{candidate_rows, segment_tables};
pub use source::{TokenSource, VecTokenSource, collect_pages};
pub use warning::{ExtractWarning, WarningCode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub table_count: usize,
    pub row_count: usize,
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractionReport {
    fn from_result(result: &DocumentTables) -> Self {
        Self {
            table_count: result.tables.len(),
            row_count: result.row_count(),
            warnings: result.warnings.clone(),
        }
    }
}

pub fn extract_pdf_tables(
    input_pdf: &Path,
    options: &ExtractOptions,
) -> Result<DocumentTables, ExtractError> {
    options.validate()?;
    let source = PdfTokenSource::open(input_pdf)?;
    extract_tables_from_source(&source, options)
}

pub fn extract_pdf_bytes_tables(
    input_pdf: &[u8],
    options: &ExtractOptions,
) -> Result<DocumentTables, ExtractError> {
    options.validate()?;
    let source = PdfTokenSource::from_bytes(input_pdf)?;
    extract_tables_from_source(&source, options)
}

pub fn extract_pdf_to_csv(
    input_pdf: &Path,
    output_csv: &Path,
    options: &ExtractOptions,
) -> Result<ExtractionReport, ExtractError> {
    let result = extract_pdf_tables(input_pdf, options)?;
    write_csv(output_csv, &result.tables, options.delimiter)?;
    Ok(ExtractionReport::from_result(&result))
}

pub fn extract_pdf_bytes_to_csv_string(
    input_pdf: &[u8],
    options: &ExtractOptions,
) -> Result<(String, ExtractionReport), ExtractError> {
    let result = extract_pdf_bytes_tables(input_pdf, options)?;
    let csv = write_csv_to_string(&result.tables, options.delimiter)?;
    Ok((csv, ExtractionReport::from_result(&result)))
}
