//! Visual layout of the receipt and payment part at the bottom of the page.

use crate::core::{InvoiceInput, format_slip_amount, validate_iban};
use crate::render::labels::SlipLabels;
use crate::render::layout::{Align, Font, PAGE_WIDTH, Page, TextBox, mm};

use super::code::QrMatrix;
use super::payload::QrPayload;

/// Height of the slip band.
pub const SLIP_HEIGHT: f32 = mm(105.0);
const RECEIPT_WIDTH: f32 = mm(62.0);
const MARGIN: f32 = mm(5.0);

const TITLE_SIZE: f32 = 11.0;
const RECEIPT_HEADING: f32 = 6.0;
const RECEIPT_VALUE: f32 = 8.0;
const PAYMENT_HEADING: f32 = 8.0;
const PAYMENT_VALUE: f32 = 10.0;

const SEPARATOR_WIDTH: f32 = 0.5;
const SEPARATOR_DASH: f32 = 2.0;
const CORNER_LENGTH: f32 = mm(3.0);
const CORNER_WIDTH: f32 = 0.75;

/// Heading and value sizes of one column.
#[derive(Clone, Copy)]
struct Column {
    x: f32,
    width: f32,
    heading: f32,
    value: f32,
}

impl Column {
    /// Heading followed by its value lines; returns the top of the next block.
    fn block(&self, page: &mut Page, top: f32, heading: &str, lines: &[String]) -> f32 {
        let mut y = page.text_box(
            TextBox::new(self.x, top, self.width, Font::Bold, self.heading),
            heading,
        );
        for line in lines {
            y = page.text_box(TextBox::new(self.x, y, self.width, Font::Regular, self.value), line);
        }
        y + self.value
    }
}

fn address_lines(name: &str, street: &str, postal_code: &str, city: &str) -> Vec<String> {
    let town = format!("{} {}", postal_code.trim(), city.trim());
    [name.trim(), street.trim(), town.trim()]
        .into_iter()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Place the slip with its top edge at `top`.
pub fn layout_slip(
    page: &mut Page,
    top: f32,
    input: &InvoiceInput,
    payload: &QrPayload,
    matrix: &QrMatrix,
    labels: &SlipLabels,
) {
    let creditor = &input.creditor;
    let account = validate_iban(&creditor.account)
        .map(|iban| iban.formatted())
        .unwrap_or_else(|_| creditor.account.clone());
    let mut payable_to = vec![account];
    payable_to.extend(address_lines(
        &creditor.name,
        &creditor.street,
        &creditor.postal_code,
        &creditor.city,
    ));

    let debtor = payload.has_debtor().then(|| {
        let d = &input.debtor;
        address_lines(&d.name, &d.street, &d.postal_code, &d.city)
    });
    let amount = format_slip_amount(input.amount_minor);
    let currency = input.currency.trim().to_string();

    // Separators
    page.line((0.0, top), (PAGE_WIDTH, top), SEPARATOR_WIDTH, Some(SEPARATOR_DASH));
    page.line(
        (RECEIPT_WIDTH, top),
        (RECEIPT_WIDTH, top + SLIP_HEIGHT),
        SEPARATOR_WIDTH,
        Some(SEPARATOR_DASH),
    );

    // Receipt
    let receipt = Column {
        x: MARGIN,
        width: RECEIPT_WIDTH - 2.0 * MARGIN,
        heading: RECEIPT_HEADING,
        value: RECEIPT_VALUE,
    };
    page.text(MARGIN, top + mm(5.0), labels.receipt, Font::Bold, TITLE_SIZE);
    let y = receipt.block(page, top + mm(12.0), labels.account_payable_to, &payable_to);
    match &debtor {
        Some(lines) => {
            receipt.block(page, y, labels.payable_by, lines);
        }
        None => {
            let y = receipt.block(page, y, labels.payable_by_blank, &[]);
            blank_box(page, receipt.x, y - receipt.value + mm(1.0), mm(52.0), mm(20.0));
        }
    }
    let amount_top = top + mm(68.0);
    page.text(receipt.x, amount_top, labels.currency, Font::Bold, RECEIPT_HEADING);
    page.text(mm(22.0), amount_top, labels.amount, Font::Bold, RECEIPT_HEADING);
    page.text(receipt.x, amount_top + mm(3.5), currency.as_str(), Font::Regular, RECEIPT_VALUE);
    page.text(mm(22.0), amount_top + mm(3.5), amount.as_str(), Font::Regular, RECEIPT_VALUE);
    page.text_box(
        TextBox::new(receipt.x, top + mm(82.0), receipt.width, Font::Bold, RECEIPT_HEADING)
            .align(Align::Right),
        labels.acceptance_point,
    );

    // Payment part
    let left = RECEIPT_WIDTH + MARGIN;
    page.text(left, top + mm(5.0), labels.payment_part, Font::Bold, TITLE_SIZE);
    matrix.draw(page, left, top + mm(17.0));
    page.text(left, amount_top, labels.currency, Font::Bold, PAYMENT_HEADING);
    page.text(left + mm(20.0), amount_top, labels.amount, Font::Bold, PAYMENT_HEADING);
    page.text(left, amount_top + mm(4.5), currency.as_str(), Font::Regular, PAYMENT_VALUE);
    page.text(left + mm(20.0), amount_top + mm(4.5), amount.as_str(), Font::Regular, PAYMENT_VALUE);

    let info = Column {
        x: mm(118.0),
        width: PAGE_WIDTH - mm(118.0) - MARGIN,
        heading: PAYMENT_HEADING,
        value: PAYMENT_VALUE,
    };
    let y = info.block(page, top + mm(5.0), labels.account_payable_to, &payable_to);
    let y = info.block(
        page,
        y,
        labels.additional_information,
        &[input.reference.trim().to_string()],
    );
    match &debtor {
        Some(lines) => {
            info.block(page, y, labels.payable_by, lines);
        }
        None => {
            let y = info.block(page, y, labels.payable_by_blank, &[]);
            blank_box(page, info.x, y - info.value + mm(1.0), mm(65.0), mm(25.0));
        }
    }
}

/// Corner marks of a field the payer fills in by hand.
fn blank_box(page: &mut Page, x: f32, y: f32, width: f32, height: f32) {
    let (right, bottom) = (x + width, y + height);
    for (cx, cy, dx, dy) in [
        (x, y, 1.0, 1.0),
        (right, y, -1.0, 1.0),
        (x, bottom, 1.0, -1.0),
        (right, bottom, -1.0, -1.0),
    ] {
        page.line((cx, cy), (cx + dx * CORNER_LENGTH, cy), CORNER_WIDTH, None);
        page.line((cx, cy), (cx, cy + dy * CORNER_LENGTH), CORNER_WIDTH, None);
    }
}
