use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::model::{DocumentTables, Page, Table};
use crate::normalize::normalize_tokens;
use crate::options::ExtractOptions;
use crate::rows::{estimate_vertical_tolerance, group_rows};
use crate::segment::segment_tables;
use crate::source::{TokenSource, collect_pages};
use crate::warning::{ExtractWarning, WarningCode};

#[must_use]
pub fn extract_page_tables(
    page: &Page,
    options: &ExtractOptions,
) -> (Vec<Table>, Vec<ExtractWarning>) {
    let settings = &options.settings;
    let mut warnings = Vec::new();

    let (tokens, skipped) = normalize_tokens(&page.tokens);
    if skipped > 0 {
        warn!(page = page.number, skipped, "skipped tokens without geometry");
        warnings.push(
            ExtractWarning::new(
                WarningCode::MalformedTokensSkipped,
                format!("{skipped} token(s) without position or size were skipped"),
            )
            .with_page(page.number),
        );
    }

    let tolerance = estimate_vertical_tolerance(&tokens, settings);
    let rows = group_rows(&tokens, tolerance);
    let tables = segment_tables(
        page.number,
        &rows,
        options.header_mode,
        settings,
        &mut warnings,
    );
    debug!(
        page = page.number,
        tokens = tokens.len(),
        tolerance,
        rows = rows.len(),
        tables = tables.len(),
        "page reconstructed"
    );

    (tables, warnings)
}

#[must_use]
pub fn extract_tables(pages: &[Page], options: &ExtractOptions) -> DocumentTables {
    let mut per_page = if options.parallel {
        pages
            .par_iter()
            .map(|page| (page.number, extract_page_tables(page, options)))
            .collect::<Vec<_>>()
    } else {
        pages
            .iter()
            .map(|page| (page.number, extract_page_tables(page, options)))
            .collect::<Vec<_>>()
    };
    per_page.sort_by_key(|(number, _)| *number);

    let mut result = DocumentTables::default();
    for (_, (tables, warnings)) in per_page {
        result.tables.extend(tables);
        result.warnings.extend(warnings);
    }

    if result.is_empty() {
        result.warnings.push(ExtractWarning::new(
            WarningCode::NoTablesDetected,
            "no tables were detected in the selected pages",
        ));
    }

    result
}

pub fn extract_tables_from_source<S: TokenSource + ?Sized>(
    source: &S,
    options: &ExtractOptions,
) -> Result<DocumentTables, ExtractError> {
    options.validate()?;

    let mut decode_warnings = Vec::new();
    let pages = collect_pages(source, options, &mut decode_warnings)?;
    let mut result = extract_tables(&pages, options);
    decode_warnings.append(&mut result.warnings);
    result.warnings = decode_warnings;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{extract_page_tables, extract_tables};
    use crate::model::{Page, RawToken};
    use crate::options::ExtractOptions;
    use crate::warning::WarningCode;

    fn grid_page(number: u32, labels: &[&str; 9]) -> Page {
        let mut tokens = Vec::new();
        for (index, label) in labels.iter().enumerate() {
            let column = index % 3;
            let row = index / 3;
            #[allow(clippy::cast_precision_loss)]
            let (x, y) = (5.0 + 40.0 * column as f64, 100.0 - 20.0 * row as f64);
            tokens.push(RawToken::placed(*label, x, y, 10.0, 8.0));
        }
        Page { number, tokens }
    }

    #[test]
    fn reports_malformed_tokens_but_keeps_going() {
        let mut page = grid_page(1, &["A", "B", "C", "D", "E", "F", "G", "H", "I"]);
        page.tokens.push(RawToken {
            text: "lost".to_string(),
            ..RawToken::default()
        });

        let (tables, warnings) = extract_page_tables(&page, &ExtractOptions::default());
        assert_eq!(tables.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::MalformedTokensSkipped);
    }

    #[test]
    fn concatenates_pages_in_order() {
        let pages = vec![
            grid_page(1, &["A", "B", "C", "D", "E", "F", "G", "H", "I"]),
            grid_page(2, &["J", "K", "L", "M", "N", "O", "P", "Q", "R"]),
        ];
        let result = extract_tables(&pages, &ExtractOptions::default());

        assert_eq!(result.tables.len(), 2);
        assert_eq!(result.tables[0].page(), 1);
        assert_eq!(result.tables[1].page(), 2);
        assert_eq!(result.tables[1].rows()[0], vec!["J", "K", "L"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn parallel_run_matches_sequential_run() {
        let pages = (1..=8)
            .map(|number| grid_page(number, &["A", "B", "C", "D", "E", "F", "G", "H", "I"]))
            .collect::<Vec<_>>();

        let sequential = extract_tables(&pages, &ExtractOptions::default());
        let parallel = extract_tables(
            &pages,
            &ExtractOptions {
                parallel: true,
                ..ExtractOptions::default()
            },
        );
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn empty_document_is_reported_not_failed() {
        let pages = vec![Page {
            number: 1,
            tokens: vec![RawToken::placed("Just a sentence.", 10.0, 700.0, 90.0, 10.0)],
        }];
        let result = extract_tables(&pages, &ExtractOptions::default());
        assert!(result.is_empty());
        assert_eq!(result.warnings[0].code, WarningCode::NoTablesDetected);
    }

    #[test]
    fn tables_follow_page_number_not_input_order() {
        let pages = vec![
            grid_page(2, &["J", "K", "L", "M", "N", "O", "P", "Q", "R"]),
            grid_page(1, &["A", "B", "C", "D", "E", "F", "G", "H", "I"]),
        ];

        for parallel in [false, true] {
            let options = ExtractOptions {
                parallel,
                ..ExtractOptions::default()
            };
            let result = extract_tables(&pages, &options);
            assert_eq!(
                result.tables.iter().map(|table| table.page()).collect::<Vec<_>>(),
                vec![1, 2]
            );
            assert_eq!(result.tables[0].rows()[0], vec!["A", "B", "C"]);
        }
    }
}
