use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("cannot read tokens for page {page}: {reason}")]
    DecodeUnavailable { page: u32, reason: String },

    #[error("invalid page selection: {0}")]
    InvalidPageSelection(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no pages available after applying selection")]
    NoPagesSelected,
}

impl ExtractError {
    pub(crate) fn decode_unavailable(page: u32, reason: impl Into<String>) -> Self {
        Self::DecodeUnavailable {
            page,
            reason: reason.into(),
        }
    }
}
