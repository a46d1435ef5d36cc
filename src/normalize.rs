use std::sync::LazyLock;

use regex::Regex;

use crate::model::{RawToken, Token};

static UNICODE_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{00A0}\x{1680}\x{2000}-\x{200A}\x{202F}\x{205F}\x{3000}]")
        .expect("hardcoded unicode space regex is valid")
});

static CONTROL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{0000}-\x{001F}\x{007F}-\x{009F}]")
        .expect("hardcoded control character regex is valid")
});

// White square and replacement character stand in for glyphs the decoder
// could not map.
static PLACEHOLDER_GLYPHS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{25A1}\x{FFFD}]").expect("hardcoded placeholder glyph regex is valid")
});

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("hardcoded whitespace regex is valid"));

#[must_use]
pub fn normalize_text(text: &str) -> String {
    let text = UNICODE_SPACES.replace_all(text, " ");
    let text = CONTROL_CHARS.replace_all(&text, "");
    let text = PLACEHOLDER_GLYPHS.replace_all(&text, " ");
    let text = WHITESPACE_RUNS.replace_all(&text, " ");
    text.trim().to_string()
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite())
}

#[must_use]
pub fn normalize_token(raw: &RawToken) -> Option<Token> {
    Some(Token {
        text: normalize_text(&raw.text),
        x: finite(raw.x)?,
        y: finite(raw.y)?,
        width: finite(raw.width)?,
        height: finite(raw.height)?,
        font: raw.font.clone(),
    })
}

#[must_use]
pub fn normalize_tokens(raw: &[RawToken]) -> (Vec<Token>, usize) {
    let tokens = raw.iter().filter_map(normalize_token).collect::<Vec<_>>();
    let skipped = raw.len() - tokens.len();
    (tokens, skipped)
}
