use crate::model::{ColumnAnchor, Row};

/// Index of the anchor closest to `x`; the leftmost anchor wins ties.
pub(crate) fn nearest_anchor(x: f64, anchors: &[ColumnAnchor]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, anchor) in anchors.iter().enumerate() {
        let distance = (x - anchor.x()).abs();
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best.min(anchors.len().saturating_sub(1))
}

#[must_use]
pub fn assign_cells(row: &Row, anchors: &[ColumnAnchor]) -> Vec<String> {
    let mut cells = vec![String::new(); anchors.len()];
    if anchors.is_empty() {
        return cells;
    }

    for token in row.content_tokens() {
        let cell = &mut cells[nearest_anchor(token.center_x(), anchors)];
        if !cell.is_empty() {
            cell.push(' ');
        }
        cell.push_str(&token.text);
    }

    for cell in &mut cells {
        *cell = cell.trim().to_string();
    }

    cells
}

#[must_use]
pub fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(String::is_empty)
}
