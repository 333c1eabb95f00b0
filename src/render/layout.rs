//! Page model shared by the invoice body and the payment slip.
//!
//! Coordinates are PDF points with the origin at the top-left corner of
//! the page; the PDF writer flips them.

use super::fonts::{ASCENT, line_height, text_width, wrap_text};
use super::table::ItemTable;

/// Points per millimetre (72 pt per inch, 25.4 mm per inch).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Millimetres to points.
pub const fn mm(value: f32) -> f32 {
    value * PT_PER_MM
}

/// A4 portrait.
pub const PAGE_WIDTH: f32 = mm(210.0);
pub const PAGE_HEIGHT: f32 = mm(297.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    /// Helvetica
    Regular,
    /// Helvetica-Bold
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A single line of text. `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font: Font,
    pub size: f32,
}

/// A filled rectangle. `y` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Color,
}

/// A stroked black line, optionally dashed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub width: f32,
    /// Dash and gap length.
    pub dash: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextRun),
    Rect(Rect),
    Line(Line),
}

/// One page, drawn in element order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

/// A text box: position, size and style for [`Page::text_box`].
#[derive(Debug, Clone, Copy)]
pub struct TextBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Lines that would extend below this height are dropped.
    pub height: Option<f32>,
    pub font: Font,
    pub size: f32,
    pub align: Align,
}

impl TextBox {
    pub fn new(x: f32, y: f32, width: f32, font: Font, size: f32) -> Self {
        Self {
            x,
            y,
            width,
            height: None,
            font,
            size,
            align: Align::Left,
        }
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

impl Page {
    /// Place a single line with its top edge at `top`.
    pub fn text(&mut self, x: f32, top: f32, text: impl Into<String>, font: Font, size: f32) {
        self.elements.push(Element::Text(TextRun {
            x,
            y: top + size * ASCENT,
            text: text.into(),
            font,
            size,
        }));
    }

    /// Wrap `text` into `bx` and place each line. Empty lines take their
    /// vertical slot but emit nothing. Returns the bottom of the last line.
    pub fn text_box(&mut self, bx: TextBox, text: &str) -> f32 {
        let advance = line_height(bx.size);
        let mut top = bx.y;
        for line in wrap_text(text, bx.font, bx.size, bx.width) {
            if bx.height.is_some_and(|h| top + advance > bx.y + h) {
                break;
            }
            if !line.is_empty() {
                let x = match bx.align {
                    Align::Left => bx.x,
                    Align::Right => bx.x + bx.width - text_width(&line, bx.font, bx.size),
                };
                self.text(x, top, line, bx.font, bx.size);
            }
            top += advance;
        }
        top
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Color) {
        self.elements.push(Element::Rect(Rect {
            x,
            y,
            width,
            height,
            fill,
        }));
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, dash: Option<f32>) {
        self.elements.push(Element::Line(Line {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
            width,
            dash,
        }));
    }

    /// All text runs on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(t) => Some(t),
            _ => None,
        })
    }
}

/// The laid-out invoice before PDF encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<Page>,
    /// Logical content of the item table (also drawn on the pages).
    pub table: ItemTable,
}

impl DocumentLayout {
    /// Every text run of the document, page by page.
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(Page::texts)
    }

    /// True if some text run equals `text`.
    pub fn contains_text(&self, text: &str) -> bool {
        self.texts().any(|t| t.text == text)
    }
}
