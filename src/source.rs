use tracing::warn;

use crate::error::ExtractError;
use crate::model::{Page, RawToken};
use crate::options::{DecodeFailurePolicy, ExtractOptions};
use crate::warning::{ExtractWarning, WarningCode};

pub trait TokenSource {
    /// 1-based page numbers in document order.
    fn page_numbers(&self) -> Vec<u32>;

    fn page_tokens(&self, page: u32) -> Result<Vec<RawToken>, ExtractError>;
}

#[derive(Debug, Clone, Default)]
pub struct VecTokenSource {
    pages: Vec<Page>,
}

impl VecTokenSource {
    #[must_use]
    pub fn new(mut pages: Vec<Page>) -> Self {
        pages.sort_by_key(|page| page.number);
        Self { pages }
    }
}

impl TokenSource for VecTokenSource {
    fn page_numbers(&self) -> Vec<u32> {
        self.pages.iter().map(|page| page.number).collect()
    }

    fn page_tokens(&self, page: u32) -> Result<Vec<RawToken>, ExtractError> {
        self.pages
            .iter()
            .find(|candidate| candidate.number == page)
            .map(|found| found.tokens.clone())
            .ok_or_else(|| ExtractError::decode_unavailable(page, "page not present"))
    }
}

pub fn collect_pages<S: TokenSource + ?Sized>(
    source: &S,
    options: &ExtractOptions,
    warnings: &mut Vec<ExtractWarning>,
) -> Result<Vec<Page>, ExtractError> {
    let mut selected = source
        .page_numbers()
        .into_iter()
        .filter(|number| {
            options
                .pages
                .as_ref()
                .is_none_or(|selection| selection.contains(*number))
        })
        .collect::<Vec<_>>();
    selected.sort_unstable();
    selected.dedup();
    if selected.is_empty() {
        return Err(ExtractError::NoPagesSelected);
    }

    let mut pages = Vec::with_capacity(selected.len());
    for number in selected {
        match source.page_tokens(number) {
            Ok(tokens) => pages.push(Page { number, tokens }),
            Err(error) => match options.decode_failure {
                DecodeFailurePolicy::Abort => return Err(error),
                DecodeFailurePolicy::SkipPage => {
                    warn!(page = number, %error, "skipping page that failed to decode");
                    warnings.push(
                        ExtractWarning::new(
                            WarningCode::PageDecodeSkipped,
                            format!("page skipped: {error}"),
                        )
                        .with_page(number),
                    );
                }
            },
        }
    }

    Ok(pages)
}
