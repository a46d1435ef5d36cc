use tracing::debug;

use crate::cells::{assign_cells, is_blank};
use crate::columns::{choose_strategy, detect_columns};
use crate::model::{Row, Table};
use crate::options::{HeaderMode, TableSettings};
use crate::warning::{ExtractWarning, WarningCode};

#[must_use]
pub fn candidate_rows(rows: &[Row], settings: &TableSettings) -> Vec<Row> {
    rows.iter()
        .filter(|row| row.content_len() >= settings.min_row_tokens)
        .cloned()
        .collect()
}

pub fn segment_tables(
    page: u32,
    rows: &[Row],
    mode: HeaderMode,
    settings: &TableSettings,
    warnings: &mut Vec<ExtractWarning>,
) -> Vec<Table> {
    let candidates = candidate_rows(rows, settings);
    if candidates.len() < settings.min_table_rows {
        debug!(page, candidates = candidates.len(), "not enough candidate rows");
        return Vec::new();
    }

    let Some(strategy) = choose_strategy(&candidates, mode, settings) else {
        return Vec::new();
    };
    let anchors = detect_columns(&candidates, strategy, settings);
    let column_count = anchors.len();
    debug!(page, ?strategy, column_count, "derived column anchors");

    let mut tables = Vec::new();
    let mut current: Vec<Vec<String>> = Vec::new();

    let mut flush = |current: &mut Vec<Vec<String>>, tables: &mut Vec<Table>| {
        if current.len() < settings.min_table_rows {
            current.clear();
            return;
        }

        let rows = std::mem::take(current);
        if column_count < settings.min_table_columns {
            warnings.push(
                ExtractWarning::new(
                    WarningCode::NarrowSegmentDropped,
                    format!(
                        "dropped {} aligned rows with only {column_count} column(s)",
                        rows.len()
                    ),
                )
                .with_page(page),
            );
            return;
        }

        tables.push(Table::new(page, strategy, column_count, rows));
    };

    for row in rows {
        let cells = assign_cells(row, &anchors);
        if is_blank(&cells) {
            flush(&mut current, &mut tables);
        } else {
            current.push(cells);
        }
    }
    flush(&mut current, &mut tables);

    tables
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::segment_tables;
    use crate::model::{ColumnStrategy, Row, Token};
    use crate::options::{HeaderMode, TableSettings};
    use crate::warning::WarningCode;

    fn row(y: f64, cells: &[(&str, f64)]) -> Row {
        Row {
            anchor_y: y,
            tokens: cells
                .iter()
                .map(|&(text, x)| Token {
                    text: text.to_string(),
                    x,
                    y,
                    width: 10.0,
                    height: 8.0,
                    font: None,
                })
                .collect(),
        }
    }

    fn segment(rows: &[Row], mode: HeaderMode) -> (Vec<Vec<Vec<String>>>, usize) {
        let mut warnings = Vec::new();
        let tables = segment_tables(1, rows, mode, &TableSettings::default(), &mut warnings);
        (
            tables.iter().map(|table| table.rows().to_vec()).collect(),
            warnings.len(),
        )
    }

    #[test]
    fn single_grid_becomes_one_table() {
        let rows = vec![
            row(100.0, &[("A", 5.0), ("B", 45.0), ("C", 85.0)]),
            row(80.0, &[("D", 5.0), ("E", 45.0), ("F", 85.0)]),
            row(60.0, &[("G", 5.0), ("H", 45.0), ("I", 85.0)]),
        ];
        let (tables, _) = segment(&rows, HeaderMode::AutoDetect);
        assert_eq!(
            tables,
            vec![vec![
                vec!["A", "B", "C"],
                vec!["D", "E", "F"],
                vec!["G", "H", "I"],
            ]]
        );
    }

    #[test]
    fn sparse_rows_are_kept_as_sparse_cells() {
        let rows = vec![
            row(100.0, &[("Item", 5.0), ("Qty", 45.0)]),
            row(80.0, &[("Pen", 5.0), ("3", 45.0)]),
            row(60.0, &[("note", 45.0)]),
        ];
        let (tables, _) = segment(&rows, HeaderMode::AutoDetect);
        assert_eq!(tables[0][2], vec!["", "note"]);
    }

    #[test]
    fn blank_row_splits_tables() {
        let rows = vec![
            row(140.0, &[("A", 5.0), ("B", 45.0)]),
            row(120.0, &[("1", 5.0), ("2", 45.0)]),
            row(100.0, &[("", 5.0), ("", 45.0)]),
            row(80.0, &[("C", 5.0), ("D", 45.0)]),
            row(60.0, &[("3", 5.0), ("4", 45.0)]),
        ];
        let (tables, _) = segment(&rows, HeaderMode::AutoDetect);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1][0], vec!["C", "D"]);
    }

    #[test]
    fn single_row_segments_are_dropped() {
        let rows = vec![
            row(100.0, &[("A", 5.0), ("B", 45.0), ("C", 85.0), ("D", 125.0)]),
            row(80.0, &[("", 5.0), ("", 45.0)]),
            row(60.0, &[("E", 5.0), ("F", 45.0), ("G", 85.0)]),
        ];
        let (tables, _) = segment(&rows, HeaderMode::AutoDetect);
        assert!(tables.is_empty());
    }

    #[test]
    fn leading_blank_rows_are_ignored() {
        let rows = vec![
            row(120.0, &[("", 5.0), ("", 45.0)]),
            row(100.0, &[("A", 5.0), ("B", 45.0)]),
            row(80.0, &[("1", 5.0), ("2", 45.0)]),
        ];
        let (tables, _) = segment(&rows, HeaderMode::AutoDetect);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 2);
    }

    #[test]
    fn too_few_candidate_rows_yield_nothing() {
        let rows = vec![
            row(100.0, &[("Title", 5.0)]),
            row(80.0, &[("A", 5.0), ("B", 45.0)]),
            row(60.0, &[("only", 5.0)]),
        ];
        let (tables, _) = segment(&rows, HeaderMode::AutoDetect);
        assert!(tables.is_empty());
    }

    #[test]
    fn single_cluster_segment_is_dropped_with_warning() {
        let rows = vec![
            row(100.0, &[("a", 0.0), ("b", 6.0)]),
            row(80.0, &[("c", 2.0), ("d", 8.0)]),
        ];
        let (tables, warnings) = segment(&rows, HeaderMode::NoHeader);
        assert!(tables.is_empty());
        assert_eq!(warnings, 1);
    }

    #[test]
    fn clustered_tables_record_their_strategy() {
        let rows = vec![
            row(100.0, &[("A", 5.0), ("B", 45.0)]),
            row(80.0, &[("1", 5.0), ("2", 45.0)]),
        ];
        let mut warnings = Vec::new();
        let tables = segment_tables(
            3,
            &rows,
            HeaderMode::NoHeader,
            &TableSettings::default(),
            &mut warnings,
        );
        assert_eq!(tables[0].strategy(), ColumnStrategy::Clustered);
        assert_eq!(tables[0].page(), 3);
        assert_eq!(tables[0].column_count(), 2);
        assert!(warnings.iter().all(|w| w.code != WarningCode::NarrowSegmentDropped));
    }
}
