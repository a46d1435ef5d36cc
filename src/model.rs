use serde::Serialize;

use crate::warning::ExtractWarning;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawToken {
    pub text: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub font: Option<String>,
}

impl RawToken {
    #[must_use]
    pub fn placed(text: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            text: text.into(),
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            font: None,
        }
    }

    #[must_use]
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }
}

/// A normalized token with complete geometry. `y` grows upwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font: Option<String>,
}

impl Token {
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[must_use]
    pub fn is_bold(&self) -> bool {
        self.font
            .as_deref()
            .is_some_and(|font| font.to_ascii_lowercase().contains("bold"))
    }

    // Text normalized to nothing; kept for row geometry only.
    #[must_use]
    pub fn is_spacer(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub anchor_y: f64,
    pub tokens: Vec<Token>,
}

impl Row {
    pub fn content_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|token| !token.is_spacer())
    }

    #[must_use]
    pub fn content_len(&self) -> usize {
        self.content_tokens().count()
    }

    #[must_use]
    pub fn has_bold(&self) -> bool {
        self.content_tokens().any(Token::is_bold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnAnchor(pub f64);

impl ColumnAnchor {
    #[must_use]
    pub fn x(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStrategy {
    HeaderAnchored { header_row: usize },
    Clustered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    page: u32,
    strategy: ColumnStrategy,
    column_count: usize,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub(crate) fn new(
        page: u32,
        strategy: ColumnStrategy,
        column_count: usize,
        rows: Vec<Vec<String>>,
    ) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == column_count));
        Self {
            page,
            strategy,
            column_count,
            rows,
        }
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn strategy(&self) -> ColumnStrategy {
        self.strategy
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub number: u32,
    pub tokens: Vec<RawToken>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DocumentTables {
    pub tables: Vec<Table>,
    pub warnings: Vec<ExtractWarning>,
}

impl DocumentTables {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(Table::row_count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MergedOutput {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
