use crate::header::classify_header;
use crate::model::{ColumnAnchor, ColumnStrategy, Row};
use crate::options::{HeaderMode, TableSettings};

#[must_use]
pub fn header_anchors(header: &Row) -> Vec<ColumnAnchor> {
    header
        .content_tokens()
        .map(|token| ColumnAnchor(token.center_x()))
        .collect()
}

#[must_use]
pub fn cluster_anchors(rows: &[Row], gap: f64) -> Vec<ColumnAnchor> {
    let mut xs = rows
        .iter()
        .flat_map(Row::content_tokens)
        .map(|token| token.x)
        .collect::<Vec<_>>();
    xs.sort_by(f64::total_cmp);

    let mut anchors = Vec::new();
    let mut cluster: Vec<f64> = Vec::new();
    for x in xs {
        if cluster.last().is_some_and(|&previous| x - previous > gap) {
            anchors.push(cluster_mean(&cluster));
            cluster.clear();
        }
        cluster.push(x);
    }
    if !cluster.is_empty() {
        anchors.push(cluster_mean(&cluster));
    }

    anchors
}

fn cluster_mean(members: &[f64]) -> ColumnAnchor {
    #[allow(clippy::cast_precision_loss)]
    let count = members.len() as f64;
    ColumnAnchor(members.iter().sum::<f64>() / count)
}

#[must_use]
pub fn choose_strategy(
    candidates: &[Row],
    mode: HeaderMode,
    settings: &TableSettings,
) -> Option<ColumnStrategy> {
    if candidates.is_empty() {
        return None;
    }

    let strategy = match mode {
        HeaderMode::AutoDetect => {
            let choice = classify_header(candidates, settings)?;
            ColumnStrategy::HeaderAnchored {
                header_row: choice.index,
            }
        }
        HeaderMode::HasHeader => ColumnStrategy::HeaderAnchored { header_row: 0 },
        HeaderMode::NoHeader => ColumnStrategy::Clustered,
    };
    Some(strategy)
}

#[must_use]
pub fn detect_columns(
    candidates: &[Row],
    strategy: ColumnStrategy,
    settings: &TableSettings,
) -> Vec<ColumnAnchor> {
    match strategy {
        ColumnStrategy::HeaderAnchored { header_row } => candidates
            .get(header_row)
            .map(header_anchors)
            .unwrap_or_default(),
        ColumnStrategy::Clustered => cluster_anchors(candidates, settings.cluster_gap),
    }
}
