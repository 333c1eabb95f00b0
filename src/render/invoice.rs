use chrono::{Datelike, NaiveDate};

use crate::core::{
    InvoiceError, InvoiceInput, InvoiceSettings, RenderedDocument, document_filename, into_error,
    reconcile_totals, validate_input,
};
use crate::pdf;
use crate::qrbill::{self, SLIP_HEIGHT};

use super::fonts::ASCENT;
use super::labels::{InvoiceLabels, SlipLabels};
use super::layout::{Align, DocumentLayout, Font, PAGE_HEIGHT, Page, TextBox, mm};
use super::sink::{DocumentSink, deliver};
use super::table::ItemTable;

const ADDRESS_SIZE: f32 = 12.0;
const TITLE_SIZE: f32 = 14.0;
const DATE_SIZE: f32 = 11.0;

const CREDITOR_BOX: (f32, f32, f32, f32) = (mm(20.0), mm(35.0), mm(100.0), mm(50.0));
const DEBTOR_BOX: (f32, f32, f32, f32) = (mm(130.0), mm(60.0), mm(70.0), mm(50.0));
const TITLE_POS: (f32, f32) = (mm(20.0), mm(100.0));
const BODY_WIDTH: f32 = mm(170.0);
const TABLE_TOP: f32 = mm(112.0);

/// Renders invoice documents for one shop.
///
/// The renderer holds only its settings. Each call starts from a blank
/// document, so one renderer can serve concurrent builds.
///
/// ```
/// use chrono::NaiveDate;
/// use qrfaktura::core::*;
/// use qrfaktura::render::InvoiceRenderer;
///
/// let creditor = CreditorBuilder::new("Yoga Studio", "CH14 0078 1612 4519 5200 2")
///     .address("Sonnenhaldenstrasse 5", "8360", "Wallenwil", "CH")
///     .build();
/// let input = InvoiceInputBuilder::new("ORD123", 10000)
///     .creditor(creditor.clone())
///     .add_line(LineItem::new(2, "Candle", 8000))
///     .shipping_total(2000)
///     .build()
///     .unwrap();
///
/// let renderer = InvoiceRenderer::new(InvoiceSettings::new(creditor));
/// let doc = renderer
///     .build_on(&input, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
///     .unwrap();
/// assert_eq!(doc.filename, "ORD123.pdf");
/// assert!(doc.bytes.starts_with(b"%PDF"));
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceRenderer {
    settings: InvoiceSettings,
    labels: InvoiceLabels,
    slip_labels: SlipLabels,
}

impl InvoiceRenderer {
    pub fn new(settings: InvoiceSettings) -> Self {
        Self {
            labels: InvoiceLabels::for_language(settings.language),
            slip_labels: SlipLabels::for_language(settings.language),
            settings,
        }
    }

    pub fn settings(&self) -> &InvoiceSettings {
        &self.settings
    }

    /// Render with the date chosen by the settings' [`DatePolicy`](crate::core::DatePolicy).
    pub fn build(&self, input: &InvoiceInput) -> Result<RenderedDocument, InvoiceError> {
        self.build_on(input, self.settings.date_policy.resolve())
    }

    /// Render with an explicit date on the date line.
    pub fn build_on(
        &self,
        input: &InvoiceInput,
        date: NaiveDate,
    ) -> Result<RenderedDocument, InvoiceError> {
        let layout = self.layout_on(input, date)?;
        let bytes = pdf::write_pdf(&layout, &input.reference)?;
        Ok(RenderedDocument {
            filename: document_filename(&input.reference),
            bytes,
            page_count: layout.pages.len(),
        })
    }

    /// Render straight into a sink. The sink is only opened once the
    /// document has been laid out and encoded.
    pub fn render_into<S: DocumentSink>(
        &self,
        input: &InvoiceInput,
        sink: &mut S,
    ) -> Result<S::Output, InvoiceError> {
        let doc = self.build(input)?;
        deliver(sink, &doc.filename, &doc.bytes)
    }

    /// Lay out the document without encoding it.
    pub fn layout_on(
        &self,
        input: &InvoiceInput,
        date: NaiveDate,
    ) -> Result<DocumentLayout, InvoiceError> {
        let span = tracing::debug_span!("invoice", reference = %input.reference);
        let _enter = span.enter();

        if let Some(err) = into_error(&validate_input(input)) {
            tracing::debug!(error = %err, "invoice input rejected");
            return Err(err);
        }
        if let Some(mismatch) = reconcile_totals(input) {
            tracing::warn!(
                stated = mismatch.stated_minor,
                computed = mismatch.computed_minor,
                "grand total does not match line items plus shipping; rendering stated total"
            );
        }
        if !input.debtor.is_complete() {
            tracing::warn!("debtor address incomplete; payment part leaves payable-by blank");
        }

        let mut pages = vec![Page::default()];
        let first = &mut pages[0];
        self.creditor_block(first, input);
        self.debtor_block(first, input);
        self.title_and_date(first, input, date);

        let locale = self.settings.language.number_locale();
        let table = ItemTable::from_input(input, &self.labels, locale);
        let table_bottom = table.place(&mut pages, TABLE_TOP)?;
        tracing::debug!(rows = table.rows.len(), pages = pages.len(), "item table placed");

        let (payload, matrix) = qrbill::encode(input)?;
        let slip_top = PAGE_HEIGHT - SLIP_HEIGHT;
        if table_bottom > slip_top {
            pages.push(Page::default());
        }
        if let Some(last) = pages.last_mut() {
            qrbill::layout_slip(last, slip_top, input, &payload, &matrix, &self.slip_labels);
        }
        tracing::debug!(pages = pages.len(), "payment part placed");

        Ok(DocumentLayout { pages, table })
    }

    fn creditor_block(&self, page: &mut Page, input: &InvoiceInput) {
        let c = &input.creditor;
        let text = format!(
            "{}\n{}\n{}\n{}",
            c.name,
            c.street,
            town_line(&c.postal_code, &c.city),
            c.tax_id
        );
        let (x, y, width, height) = CREDITOR_BOX;
        page.text_box(
            TextBox::new(x, y, width, Font::Regular, ADDRESS_SIZE).height(height),
            &text,
        );
    }

    fn debtor_block(&self, page: &mut Page, input: &InvoiceInput) {
        let d = &input.debtor;
        let text = format!(
            "{}\n{}\n{}",
            d.name,
            d.street,
            town_line(&d.postal_code, &d.city)
        );
        let (x, y, width, height) = DEBTOR_BOX;
        page.text_box(
            TextBox::new(x, y, width, Font::Regular, ADDRESS_SIZE).height(height),
            &text,
        );
    }

    fn title_and_date(&self, page: &mut Page, input: &InvoiceInput, date: NaiveDate) {
        let (x, y) = TITLE_POS;
        page.text_box(
            TextBox::new(x, y, BODY_WIDTH, Font::Bold, TITLE_SIZE),
            &self.labels.title_line(&input.reference),
        );
        // Same band as the title, sharing its baseline.
        page.text_box(
            TextBox::new(
                x,
                y + (TITLE_SIZE - DATE_SIZE) * ASCENT,
                BODY_WIDTH,
                Font::Regular,
                DATE_SIZE,
            )
            .align(Align::Right),
            &self.date_line(date),
        );
    }

    /// `"{place} {day}.{month}.{year}"` without zero padding.
    pub fn date_line(&self, date: NaiveDate) -> String {
        format!(
            "{} {}.{}.{}",
            self.settings.place_name(),
            date.day(),
            date.month(),
            date.year()
        )
    }
}

fn town_line(postal_code: &str, city: &str) -> String {
    format!("{} {}", postal_code.trim(), city.trim())
        .trim()
        .to_string()
}
