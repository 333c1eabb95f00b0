use std::io::Write;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use crate::core::{InvoiceError, Section};
use crate::render::fonts::encode_win_ansi;
use crate::render::layout::{
    Color, DocumentLayout, Element, Font, Line, PAGE_HEIGHT, PAGE_WIDTH, Page, Rect, TextRun,
};

const PRODUCER: &str = "qrfaktura";

fn encoding_error(e: impl std::fmt::Display) -> InvoiceError {
    InvoiceError::render(Section::Encoding, format!("PDF write error: {e}"))
}

/// Encode a layout as PDF bytes in memory.
pub fn write_pdf(layout: &DocumentLayout, title: &str) -> Result<Vec<u8>, InvoiceError> {
    let mut output = Vec::new();
    write_pdf_to(layout, title, &mut output)?;
    Ok(output)
}

/// Encode a layout as PDF into `out`.
///
/// The output carries no timestamps or random ids, so equal layouts give
/// byte-identical files.
pub fn write_pdf_to<W: Write>(
    layout: &DocumentLayout,
    title: &str,
    out: &mut W,
) -> Result<(), InvoiceError> {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(font_dictionary("Helvetica"));
    let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(regular_id),
            "F2" => Object::Reference(bold_id),
        },
    });

    let mut kids = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = Content {
            operations: page_operations(page),
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().map_err(encoding_error)?,
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
        });
        kids.push(Object::Reference(page_id));
    }
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.trailer.set("Info", Object::Reference(info_id));

    doc.compress();
    doc.save_to(out).map_err(encoding_error)?;
    Ok(())
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn font_name(font: Font) -> Object {
    let name: &[u8] = match font {
        Font::Regular => b"F1",
        Font::Bold => b"F2",
    };
    Object::Name(name.to_vec())
}

fn rgb(color: Color) -> Vec<Object> {
    [color.r, color.g, color.b]
        .into_iter()
        .map(|c| (f32::from(c) / 255.0).into())
        .collect()
}

/// Flip a top-left y coordinate to PDF user space.
fn flip(y: f32) -> f32 {
    PAGE_HEIGHT - y
}

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut ops = Vec::new();
    let mut fill = None;
    let mut set_fill = |ops: &mut Vec<Operation>, color: Color| {
        if fill != Some(color) {
            ops.push(Operation::new("rg", rgb(color)));
            fill = Some(color);
        }
    };

    for element in &page.elements {
        match element {
            Element::Text(run) => {
                set_fill(&mut ops, Color::BLACK);
                text_operations(&mut ops, run);
            }
            Element::Rect(rect) => {
                set_fill(&mut ops, rect.fill);
                rect_operations(&mut ops, rect);
            }
            Element::Line(line) => line_operations(&mut ops, line),
        }
    }
    ops
}

fn text_operations(ops: &mut Vec<Operation>, run: &TextRun) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font_name(run.font), run.size.into()]));
    ops.push(Operation::new("Td", vec![run.x.into(), flip(run.y).into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn rect_operations(ops: &mut Vec<Operation>, rect: &Rect) {
    ops.push(Operation::new(
        "re",
        vec![
            rect.x.into(),
            flip(rect.y + rect.height).into(),
            rect.width.into(),
            rect.height.into(),
        ],
    ));
    ops.push(Operation::new("f", vec![]));
}

fn line_operations(ops: &mut Vec<Operation>, line: &Line) {
    let dash: Vec<Object> = line
        .dash
        .map(|d| vec![d.into(), d.into()])
        .unwrap_or_default();
    ops.push(Operation::new("w", vec![line.width.into()]));
    ops.push(Operation::new("d", vec![Object::Array(dash), 0.into()]));
    ops.push(Operation::new("m", vec![line.x1.into(), flip(line.y1).into()]));
    ops.push(Operation::new("l", vec![line.x2.into(), flip(line.y2).into()]));
    ops.push(Operation::new("S", vec![]));
}
