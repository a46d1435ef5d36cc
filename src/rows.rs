use std::collections::HashMap;

use crate::model::{Row, Token};
use crate::options::TableSettings;

#[must_use]
pub fn estimate_vertical_tolerance(tokens: &[Token], settings: &TableSettings) -> f64 {
    if tokens.len() < 2 {
        return settings.default_tolerance;
    }

    let mut ys = tokens.iter().map(|token| token.y).collect::<Vec<_>>();
    ys.sort_by(f64::total_cmp);
    ys.dedup();

    let mut freq: HashMap<i64, usize> = HashMap::new();
    let mut modal: Option<(i64, usize)> = None;
    for pair in ys.windows(2) {
        let diff = (pair[1] - pair[0]).abs();
        if diff <= settings.noise_floor {
            continue;
        }

        #[allow(clippy::cast_possible_truncation)]
        let rounded = diff.round() as i64;
        let count = freq.entry(rounded).or_insert(0);
        *count += 1;
        // First spacing to reach the highest count wins.
        if modal.is_none_or(|(_, best)| *count > best) {
            modal = Some((rounded, *count));
        }
    }

    modal.map_or(settings.default_tolerance, |(spacing, _)| {
        #[allow(clippy::cast_precision_loss)]
        let spacing = spacing as f64;
        spacing * settings.tolerance_factor
    })
}

#[must_use]
pub fn group_rows(tokens: &[Token], tolerance: f64) -> Vec<Row> {
    let mut sorted = tokens.to_vec();
    // Page origin is bottom-left, so the topmost token has the largest y.
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y));

    let mut rows: Vec<Row> = Vec::new();
    for token in sorted {
        match rows.last_mut() {
            Some(row) if (token.y - row.anchor_y).abs() <= tolerance => row.tokens.push(token),
            _ => rows.push(Row {
                anchor_y: token.y,
                tokens: vec![token],
            }),
        }
    }

    for row in &mut rows {
        row.tokens.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    rows
}
