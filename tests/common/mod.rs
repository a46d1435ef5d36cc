#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub text: &'a str,
    pub x: i64,
    pub y: i64,
    pub bold: bool,
}

pub fn at(text: &str, x: i64, y: i64) -> Placed<'_> {
    Placed {
        text,
        x,
        y,
        bold: false,
    }
}

pub fn bold_at(text: &str, x: i64, y: i64) -> Placed<'_> {
    Placed {
        text,
        x,
        y,
        bold: true,
    }
}

pub fn grid<'a>(rows: &[&[&'a str]], xs: &[i64], top: i64, pitch: i64) -> Vec<Placed<'a>> {
    let mut placed = Vec::new();
    let mut y = top;
    for row in rows {
        for (text, x) in row.iter().zip(xs) {
            placed.push(at(*text, *x, y));
        }
        y -= pitch;
    }
    placed
}

pub fn build_pdf(pages: &[Vec<Placed<'_>>]) -> Result<Document, Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut page_ids = Vec::new();
    for cells in pages {
        let mut operations = Vec::new();
        for cell in cells {
            let font = if cell.bold { "F2" } else { "F1" };
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![font.into(), 10.into()]),
                Operation::new("Td", vec![cell.x.into(), cell.y.into()]),
                Operation::new("Tj", vec![Object::string_literal(cell.text)]),
                Operation::new("ET", vec![]),
            ]);
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    Ok(doc)
}

pub fn create_test_pdf(
    path: &Path,
    pages: &[Vec<Placed<'_>>],
) -> Result<(), Box<dyn std::error::Error>> {
    build_pdf(pages)?.save(path)?;
    Ok(())
}

pub fn test_pdf_bytes(pages: &[Vec<Placed<'_>>]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut bytes = Vec::new();
    build_pdf(pages)?.save_to(&mut bytes)?;
    Ok(bytes)
}
