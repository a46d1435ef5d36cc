use crate::model::Row;
use crate::options::TableSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderReason {
    Leading,
    Emphasized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderChoice {
    pub index: usize,
    pub reason: HeaderReason,
}

// Rows whose token counts differ by more than one never align.
pub(crate) fn rows_align(row: &Row, next: &Row, settings: &TableSettings) -> bool {
    let row_xs = row.content_tokens().map(|token| token.x).collect::<Vec<_>>();
    let next_xs = next.content_tokens().map(|token| token.x).collect::<Vec<_>>();
    if row_xs.len().abs_diff(next_xs.len()) > 1 {
        return false;
    }

    let matching = row_xs
        .iter()
        .filter(|&&x| {
            next_xs
                .iter()
                .any(|&next_x| (x - next_x).abs() < settings.header_align_distance)
        })
        .count();

    #[allow(clippy::cast_precision_loss)]
    let required = row_xs.len().min(next_xs.len()) as f64 * settings.header_align_ratio;
    #[allow(clippy::cast_precision_loss)]
    let matched = matching as f64;
    matched >= required
}

#[must_use]
pub fn header_reason(
    candidates: &[Row],
    index: usize,
    settings: &TableSettings,
) -> Option<HeaderReason> {
    if index == 0 {
        return Some(HeaderReason::Leading);
    }

    let row = candidates.get(index)?;
    if !row.has_bold() {
        return None;
    }

    match candidates.get(index + 1) {
        Some(next) if rows_align(row, next, settings) => None,
        _ => Some(HeaderReason::Emphasized),
    }
}

/// The first candidate always qualifies, so this is `None` only when there
/// are no candidates.
#[must_use]
pub fn classify_header(candidates: &[Row], settings: &TableSettings) -> Option<HeaderChoice> {
    let scanned = candidates.len().min(settings.header_scan_rows);
    (0..scanned).find_map(|index| {
        header_reason(candidates, index, settings).map(|reason| HeaderChoice { index, reason })
    })
}
