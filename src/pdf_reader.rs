use std::collections::BTreeMap;
use std::path::Path;

use encoding_rs::{BIG5, UTF_16BE};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use crate::error::ExtractError;
use crate::model::RawToken;
use crate::source::TokenSource;

/// Average glyph advance as a fraction of the font size. The decoder does not
/// read font metrics, so widths are estimates.
const GLYPH_WIDTH_EM: f64 = 0.5;

/// `TJ` adjustments wider than this (thousandths of an em) split a run.
const TJ_SPLIT_THRESHOLD: f64 = 250.0;

fn looks_decoding_broken(text: &str) -> bool {
    let total = text.chars().count();
    if total == 0 {
        return false;
    }
    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let replacement = text.matches('\u{FFFD}').count();
    let control = text
        .chars()
        .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t'))
        .count();
    replacement * 8 > total || control * 5 > total
}

fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_decoding_broken(&decoded) {
        return decoded;
    }

    if bytes.starts_with(&[0xFE, 0xFF]) {
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(&bytes[2..]);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }

    let hint = encoding.map(str::to_ascii_lowercase).unwrap_or_default();
    if hint.contains("identity-h") || hint.contains("ucs2") || hint.contains("utf16") {
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }
    if hint.contains("b5") || hint.contains("big5") || hint.contains("eten") {
        let (big5, _, had_errors) = BIG5.decode(bytes);
        if !had_errors && !big5.is_empty() {
            return big5.into_owned();
        }
    }

    decoded
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Matrix {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        let [a, b, c, d, e, f] = operands else {
            return None;
        };
        Some(Self {
            a: number(a)?,
            b: number(b)?,
            c: number(c)?,
            d: number(d)?,
            e: number(e)?,
            f: number(f)?,
        })
    }

    fn then(self, other: Self) -> Self {
        Self {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn horizontal_scale(self) -> f64 {
        self.a.hypot(self.b)
    }

    fn vertical_scale(self) -> f64 {
        self.c.hypot(self.d)
    }
}

fn number(object: &Object) -> Option<f64> {
    match object {
        #[allow(clippy::cast_precision_loss)]
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}

fn operand(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(number)
}

#[derive(Debug, Clone)]
struct PageFont<'a> {
    encoding: &'a str,
    base_font: Option<String>,
}

struct TextWalker<'a> {
    fonts: BTreeMap<Vec<u8>, PageFont<'a>>,
    ctm: Matrix,
    saved_ctm: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    font: Option<PageFont<'a>>,
    font_size: f64,
    leading: f64,
    char_spacing: f64,
    word_spacing: f64,
    horizontal_scaling: f64,
    tokens: Vec<RawToken>,
}

impl<'a> TextWalker<'a> {
    fn new(fonts: BTreeMap<Vec<u8>, PageFont<'a>>) -> Self {
        Self {
            fonts,
            ctm: Matrix::IDENTITY,
            saved_ctm: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            font: None,
            font_size: 0.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            tokens: Vec::new(),
        }
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.tlm = Matrix::translation(tx, ty).then(self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let encoding = self.font.as_ref().map(|font| font.encoding);
        decode_pdf_bytes(encoding, bytes)
    }

    fn advance_of(&self, text: &str) -> f64 {
        let (glyphs, spaces) = text.chars().fold((0_u32, 0_u32), |(glyphs, spaces), ch| {
            (glyphs + 1, spaces + u32::from(ch == ' '))
        });
        (f64::from(glyphs) * (GLYPH_WIDTH_EM * self.font_size + self.char_spacing)
            + f64::from(spaces) * self.word_spacing)
            * self.horizontal_scaling
    }

    fn advance(&mut self, tx: f64) {
        self.tm = Matrix::translation(tx, 0.0).then(self.tm);
    }

    fn emit(&mut self, text: String, advance: f64) {
        let placement = self.tm.then(self.ctm);
        self.tokens.push(RawToken {
            text,
            x: Some(placement.e),
            y: Some(placement.f),
            width: Some(advance * placement.horizontal_scale()),
            height: Some(self.font_size * placement.vertical_scale()),
            font: self.font.as_ref().and_then(|font| font.base_font.clone()),
        });
    }

    fn show_string(&mut self, bytes: &[u8]) {
        let text = self.decode(bytes);
        let advance = self.advance_of(&text);
        self.emit(text, advance);
        self.advance(advance);
    }

    fn show_array(&mut self, items: &[Object]) {
        let mut run = String::new();
        let mut run_advance = 0.0;
        let mut run_start = self.tm;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    if run.is_empty() {
                        run_start = self.tm;
                        run_advance = 0.0;
                    }
                    let text = self.decode(bytes);
                    let advance = self.advance_of(&text);
                    run.push_str(&text);
                    run_advance += advance;
                    self.advance(advance);
                }
                other => {
                    let Some(adjustment) = number(other) else {
                        continue;
                    };
                    let shift = -adjustment / 1000.0 * self.font_size * self.horizontal_scaling;
                    if -adjustment > TJ_SPLIT_THRESHOLD && !run.is_empty() {
                        let end = self.tm;
                        self.tm = run_start;
                        self.emit(std::mem::take(&mut run), run_advance);
                        self.tm = end;
                    } else if !run.is_empty() {
                        run_advance += shift;
                    }
                    self.advance(shift);
                }
            }
        }

        if !run.is_empty() {
            let end = self.tm;
            self.tm = run_start;
            self.emit(run, run_advance);
            self.tm = end;
        }
    }

    fn apply(&mut self, operator: &str, operands: &[Object]) {
        match operator {
            "q" => self.saved_ctm.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.saved_ctm.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(matrix) = Matrix::from_operands(operands) {
                    self.ctm = matrix.then(self.ctm);
                }
            }
            "BT" => {
                self.tm = Matrix::IDENTITY;
                self.tlm = Matrix::IDENTITY;
            }
            "Tf" => {
                if let Some(name) = operands.first().and_then(|name| name.as_name().ok()) {
                    self.font = self.fonts.get(name).cloned();
                }
                if let Some(size) = operand(operands, 1) {
                    self.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = operand(operands, 0) {
                    self.leading = leading;
                }
            }
            "Tc" => {
                if let Some(spacing) = operand(operands, 0) {
                    self.char_spacing = spacing;
                }
            }
            "Tw" => {
                if let Some(spacing) = operand(operands, 0) {
                    self.word_spacing = spacing;
                }
            }
            "Tz" => {
                if let Some(scale) = operand(operands, 0) {
                    self.horizontal_scaling = scale / 100.0;
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (operand(operands, 0), operand(operands, 1)) {
                    if operator == "TD" {
                        self.leading = -ty;
                    }
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(matrix) = Matrix::from_operands(operands) {
                    self.tm = matrix;
                    self.tlm = matrix;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show_string(bytes);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show_string(bytes);
                }
            }
            "\"" => {
                if let (Some(word), Some(character)) = (operand(operands, 0), operand(operands, 1))
                {
                    self.word_spacing = word;
                    self.char_spacing = character;
                }
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show_string(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show_array(items);
                }
            }
            _ => {}
        }
    }
}

fn page_fonts(document: &Document, page_id: ObjectId) -> BTreeMap<Vec<u8>, PageFont<'_>> {
    document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| {
            let base_font = font
                .get(b"BaseFont")
                .and_then(|value| value.as_name())
                .ok()
                .map(|value| String::from_utf8_lossy(value).into_owned());
            (
                name,
                PageFont {
                    encoding: font.get_font_encoding(),
                    base_font,
                },
            )
        })
        .collect()
}

pub struct PdfTokenSource {
    document: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfTokenSource {
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        Ok(Self::from_document(Document::load(path)?))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractError> {
        Ok(Self::from_document(Document::load_mem(bytes)?))
    }

    fn from_document(document: Document) -> Self {
        let pages = document.get_pages();
        Self { document, pages }
    }
}

impl TokenSource for PdfTokenSource {
    fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    fn page_tokens(&self, page: u32) -> Result<Vec<RawToken>, ExtractError> {
        let page_id = *self
            .pages
            .get(&page)
            .ok_or_else(|| ExtractError::decode_unavailable(page, "page not present"))?;

        let raw_content = self
            .document
            .get_page_content(page_id)
            .map_err(|error| ExtractError::decode_unavailable(page, error.to_string()))?;
        let content = Content::decode(&raw_content)
            .map_err(|error| ExtractError::decode_unavailable(page, error.to_string()))?;

        let mut walker = TextWalker::new(page_fonts(&self.document, page_id));
        for operation in &content.operations {
            walker.apply(&operation.operator, &operation.operands);
        }

        Ok(walker.tokens)
    }
}
