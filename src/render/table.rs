//! The itemized table: header, one row per order line, shipping, grand
//! total and a trailing spacer.

use crate::core::{InvoiceError, InvoiceInput, NumberLocale, Section, format_minor};

use super::fonts::{line_height, text_width, wrap_text};
use super::labels::InvoiceLabels;
use super::layout::{Align, Color, Font, PAGE_HEIGHT, Page, TextBox, mm};

pub const TABLE_X: f32 = mm(20.0);
pub const TABLE_WIDTH: f32 = mm(170.0);
/// Top of the table on continuation pages.
pub const TOP_MARGIN: f32 = mm(20.0);
/// Rows may not extend below this line.
pub const BOTTOM_LIMIT: f32 = PAGE_HEIGHT - mm(15.0);

const FIXED_COLUMNS: [f32; 3] = [mm(20.0), mm(20.0), mm(30.0)];
const CELL_PADDING: f32 = 5.0;
const FONT_SIZE: f32 = 11.0;
const AMOUNT_COLUMN: usize = 3;
const HEADER_FILL: Color = Color::rgb(0xec, 0xf0, 0xf1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Item,
    Shipping,
    GrandTotal,
    Spacer,
}

impl RowKind {
    fn min_height(self) -> f32 {
        match self {
            Self::Header => 30.0,
            Self::Shipping | Self::GrandTotal => 40.0,
            Self::Item | Self::Spacer => 0.0,
        }
    }
}

/// Position, quantity, description, total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub kind: RowKind,
    pub cells: [String; 4],
}

impl TableRow {
    fn new(kind: RowKind, cells: [String; 4]) -> Self {
        Self { kind, cells }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTable {
    pub rows: Vec<TableRow>,
}

impl ItemTable {
    pub fn from_input(input: &InvoiceInput, labels: &InvoiceLabels, locale: NumberLocale) -> Self {
        let money = |minor| format_minor(minor, &input.currency, locale);
        let mut rows = Vec::with_capacity(input.line_items.len() + 4);

        rows.push(TableRow::new(
            RowKind::Header,
            [
                labels.position.into(),
                labels.quantity.into(),
                labels.description.into(),
                labels.total.into(),
            ],
        ));
        for (i, line) in input.line_items.iter().enumerate() {
            rows.push(TableRow::new(
                RowKind::Item,
                [
                    (i + 1).to_string(),
                    line.quantity.to_string(),
                    line.description.clone(),
                    money(line.line_total_minor),
                ],
            ));
        }
        rows.push(TableRow::new(
            RowKind::Shipping,
            [
                String::new(),
                String::new(),
                labels.shipping.into(),
                money(input.shipping_total_minor),
            ],
        ));
        rows.push(TableRow::new(
            RowKind::GrandTotal,
            [
                String::new(),
                String::new(),
                labels.invoice_total.into(),
                money(input.grand_total_minor),
            ],
        ));
        rows.push(TableRow::new(RowKind::Spacer, Default::default()));

        Self { rows }
    }

    pub fn rows_of(&self, kind: RowKind) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(move |r| r.kind == kind)
    }

    /// Draw the table starting at `top` on the last page, adding pages as
    /// rows overflow. Returns the bottom edge of the last row.
    pub fn place(&self, pages: &mut Vec<Page>, top: f32) -> Result<f32, InvoiceError> {
        let [pos_w, qty_w, total_w] = FIXED_COLUMNS;
        let desc_w = TABLE_WIDTH - pos_w - qty_w - total_w;
        let widths = [pos_w, qty_w, desc_w, total_w];
        let size_for = |c: usize, text: &str, font: Font| {
            if c == AMOUNT_COLUMN {
                amount_size(text, font, widths[c] - 2.0 * CELL_PADDING)
            } else {
                FONT_SIZE
            }
        };

        let mut y = top;
        for (index, row) in self.rows.iter().enumerate() {
            let fonts = cell_fonts(row.kind);
            let lines = (0..4)
                .map(|c| {
                    let size = size_for(c, &row.cells[c], fonts[c]);
                    wrap_text(&row.cells[c], fonts[c], size, widths[c] - 2.0 * CELL_PADDING).len()
                })
                .max()
                .unwrap_or(1);
            let height = row
                .kind
                .min_height()
                .max(2.0 * CELL_PADDING + lines as f32 * line_height(FONT_SIZE));

            if y + height > BOTTOM_LIMIT {
                if height > BOTTOM_LIMIT - TOP_MARGIN {
                    return Err(InvoiceError::render(
                        Section::ItemTable,
                        format!("row {index} is {height:.0} pt high and does not fit on a page"),
                    ));
                }
                pages.push(Page::default());
                y = TOP_MARGIN;
            }
            let Some(page) = pages.last_mut() else {
                return Err(InvoiceError::render(Section::ItemTable, "no page to draw on"));
            };

            if row.kind == RowKind::Header {
                page.rect(TABLE_X, y, TABLE_WIDTH, height, HEADER_FILL);
            }
            let mut x = TABLE_X;
            for (c, width) in widths.iter().enumerate() {
                let align = if c == AMOUNT_COLUMN { Align::Right } else { Align::Left };
                page.text_box(
                    TextBox::new(
                        x + CELL_PADDING,
                        y + CELL_PADDING,
                        width - 2.0 * CELL_PADDING,
                        fonts[c],
                        size_for(c, &row.cells[c], fonts[c]),
                    )
                    .align(align),
                    &row.cells[c],
                );
                x += width;
            }
            y += height;
        }
        Ok(y)
    }
}

/// Font size at which an amount fits the column on one line. Amounts are
/// never broken between digits.
fn amount_size(text: &str, font: Font, width: f32) -> f32 {
    let natural = text_width(text, font, FONT_SIZE);
    if natural <= width {
        FONT_SIZE
    } else {
        // Rounded down so the scaled width stays below the column width.
        (FONT_SIZE * width / natural * 10.0).floor() / 10.0
    }
}

fn cell_fonts(kind: RowKind) -> [Font; 4] {
    match kind {
        RowKind::GrandTotal => [Font::Regular, Font::Regular, Font::Bold, Font::Bold],
        _ => [Font::Regular; 4],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Creditor, Debtor, Language, LineItem};

    fn input(lines: Vec<LineItem>) -> InvoiceInput {
        InvoiceInput {
            currency: "CHF".into(),
            amount_minor: 10000,
            reference: "ORD123".into(),
            creditor: Creditor {
                name: "Shop".into(),
                street: String::new(),
                postal_code: "8000".into(),
                city: "Zürich".into(),
                country_code: "CH".into(),
                account: "CH1400781612451952002".into(),
                tax_id: String::new(),
            },
            debtor: Debtor::default(),
            line_items: lines,
            shipping_total_minor: 2000,
            grand_total_minor: 10000,
        }
    }

    fn table(lines: Vec<LineItem>) -> ItemTable {
        ItemTable::from_input(
            &input(lines),
            &InvoiceLabels::for_language(Language::En),
            NumberLocale::DeCh,
        )
    }

    #[test]
    fn row_sequence() {
        let t = table(vec![LineItem::new(2, "Candle", 8000)]);
        let kinds: Vec<_> = t.rows.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            [
                RowKind::Header,
                RowKind::Item,
                RowKind::Shipping,
                RowKind::GrandTotal,
                RowKind::Spacer
            ]
        );
        assert_eq!(t.rows[1].cells, ["1", "2", "Candle", "CHF\u{a0}80.00"]);
        assert_eq!(t.rows[2].cells[2], "Shipping");
        assert_eq!(t.rows[3].cells[3], "CHF\u{a0}100.00");
        assert!(t.rows[4].cells.iter().all(String::is_empty));
    }

    #[test]
    fn long_tables_flow_onto_new_pages() {
        let lines = (0..60).map(|i| LineItem::new(1, format!("Item {i}"), 100)).collect();
        let t = table(lines);
        let mut pages = vec![Page::default()];
        let bottom = t.place(&mut pages, mm(112.0)).unwrap();
        assert!(pages.len() > 1);
        assert!(bottom <= BOTTOM_LIMIT);
    }

    #[test]
    fn large_amounts_stay_on_one_line() {
        let mut inp = input(vec![LineItem::new(1, "Studio", 12_345_678)]);
        inp.amount_minor = 999_999_999_99;
        inp.grand_total_minor = 999_999_999_99;
        let labels = InvoiceLabels::for_language(Language::De);
        let t = ItemTable::from_input(&inp, &labels, NumberLocale::DeCh);
        let mut pages = vec![Page::default()];
        t.place(&mut pages, mm(112.0)).unwrap();
        let page = &pages[0];
        assert!(page.texts().any(|t| t.text == "CHF\u{a0}123\u{2019}456.78"));
        let total = page
            .texts()
            .find(|t| t.text == "CHF\u{a0}999\u{2019}999\u{2019}999.99")
            .unwrap();
        assert!(total.size < FONT_SIZE);
        assert!(total.x + text_width(&total.text, Font::Bold, total.size) <= TABLE_X + TABLE_WIDTH);
    }

    #[test]
    fn short_amounts_keep_the_table_font_size() {
        assert_eq!(amount_size("CHF\u{a0}80.00", Font::Regular, mm(30.0) - 10.0), FONT_SIZE);
    }

    #[test]
    fn oversized_row_is_an_error() {
        let t = table(vec![LineItem::new(1, "word ".repeat(3000), 100)]);
        let mut pages = vec![Page::default()];
        let err = t.place(&mut pages, mm(112.0)).unwrap_err();
        assert_eq!(err.section(), Some(Section::ItemTable));
    }
}
