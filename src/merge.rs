use crate::model::{MergedOutput, Table};

pub(crate) fn merge_tables(tables: &[Table]) -> MergedOutput {
    let width = tables.iter().map(Table::column_count).max().unwrap_or(0);

    let mut headers = vec!["page".to_string(), "table_id".to_string()];
    headers.extend((1..=width).map(|index| format!("col_{index}")));

    let mut rows = Vec::new();
    for (index, table) in tables.iter().enumerate() {
        let table_id = (index + 1).to_string();
        for cells in table.rows() {
            let mut row = Vec::with_capacity(width + 2);
            row.push(table.page().to_string());
            row.push(table_id.clone());
            row.extend(cells.iter().cloned());
            row.resize(width + 2, String::new());
            rows.push(row);
        }
    }

    MergedOutput { headers, rows }
}
