use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    AutoDetect,
    HasHeader,
    NoHeader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailurePolicy {
    Abort,
    SkipPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pages: BTreeSet<u32>,
}

impl PageSelection {
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }
}

fn invalid_selection(message: impl Into<String>) -> ExtractError {
    ExtractError::InvalidPageSelection(message.into())
}

fn parse_page_number(raw: &str, what: &str) -> Result<u32, ExtractError> {
    let page: u32 = raw
        .trim()
        .parse()
        .map_err(|_| invalid_selection(format!("invalid {what}: '{}'", raw.trim())))?;
    if page == 0 {
        return Err(invalid_selection("pages are 1-based"));
    }
    Ok(page)
}

impl FromStr for PageSelection {
    type Err = ExtractError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut pages = BTreeSet::new();
        for part in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page_number(start, "page range start")?;
                    let end = parse_page_number(end, "page range end")?;
                    if end < start {
                        return Err(invalid_selection(format!(
                            "invalid range '{part}': end is before start"
                        )));
                    }
                    pages.extend(start..=end);
                }
                None => {
                    pages.insert(parse_page_number(part, "page number")?);
                }
            }
        }

        if pages.is_empty() {
            return Err(invalid_selection("page selection cannot be empty"));
        }

        Ok(Self { pages })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSettings {
    pub default_tolerance: f64,
    pub noise_floor: f64,
    pub tolerance_factor: f64,
    pub header_align_distance: f64,
    pub header_align_ratio: f64,
    pub header_scan_rows: usize,
    pub cluster_gap: f64,
    pub min_row_tokens: usize,
    pub min_table_rows: usize,
    pub min_table_columns: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            default_tolerance: 5.0,
            noise_floor: 1.0,
            tolerance_factor: 0.6,
            header_align_distance: 10.0,
            header_align_ratio: 0.7,
            header_scan_rows: 3,
            cluster_gap: 10.0,
            min_row_tokens: 2,
            min_table_rows: 2,
            min_table_columns: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    pub pages: Option<PageSelection>,
    pub header_mode: HeaderMode,
    pub decode_failure: DecodeFailurePolicy,
    pub parallel: bool,
    pub delimiter: u8,
    pub settings: TableSettings,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            pages: None,
            header_mode: HeaderMode::AutoDetect,
            decode_failure: DecodeFailurePolicy::Abort,
            parallel: false,
            delimiter: b',',
            settings: TableSettings::default(),
        }
    }
}

impl ExtractOptions {
    pub fn validate(&self) -> Result<(), ExtractError> {
        let settings = &self.settings;
        if settings.min_row_tokens < 2 {
            return Err(ExtractError::InvalidOption(
                "min_row_tokens must be at least 2".to_string(),
            ));
        }
        if settings.min_table_rows < 2 {
            return Err(ExtractError::InvalidOption(
                "min_table_rows must be at least 2".to_string(),
            ));
        }
        if settings.min_table_columns < 2 {
            return Err(ExtractError::InvalidOption(
                "min_table_columns must be at least 2".to_string(),
            ));
        }
        if settings.header_scan_rows == 0 {
            return Err(ExtractError::InvalidOption(
                "header_scan_rows must be at least 1".to_string(),
            ));
        }

        let positive = [
            ("default_tolerance", settings.default_tolerance),
            ("tolerance_factor", settings.tolerance_factor),
            ("header_align_distance", settings.header_align_distance),
            ("cluster_gap", settings.cluster_gap),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ExtractError::InvalidOption(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if !(settings.noise_floor.is_finite() && settings.noise_floor >= 0.0) {
            return Err(ExtractError::InvalidOption(
                "noise_floor must not be negative".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&settings.header_align_ratio) {
            return Err(ExtractError::InvalidOption(
                "header_align_ratio must be within 0..=1".to_string(),
            ));
        }

        Ok(())
    }
}
