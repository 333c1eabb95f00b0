//! Integration tests for invoice layout, PDF encoding and sinks.

#![cfg(feature = "render")]

use chrono::NaiveDate;
use lopdf::Document;
use qrfaktura::core::*;
use qrfaktura::render::layout::{Element, TextRun};
use qrfaktura::render::{
    DocumentLayout, DocumentSink, FileSink, InvoiceRenderer, MemorySink, RowKind,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn creditor() -> Creditor {
    CreditorBuilder::new("Yoga Studio", "CH14 0078 1612 4519 5200 2")
        .address("Sonnenhaldenstrasse 5", "8360", "Wallenwil", "CH")
        .tax_id("UID: CHE-154.780.687")
        .build()
}

fn renderer() -> InvoiceRenderer {
    InvoiceRenderer::new(InvoiceSettings::new(creditor()))
}

/// The ORD123 order: one candle line, CHF 20 shipping, CHF 100 total.
fn ord123() -> InvoiceInput {
    InvoiceInputBuilder::new("ORD123", 10000)
        .creditor(creditor())
        .debtor(
            DebtorBuilder::new("Jane Doe")
                .address("Main St 1", "8000", "Zurich", "CH")
                .build(),
        )
        .add_line(LineItem::new(2, "Candle", 8000))
        .shipping_total(2000)
        .build()
        .unwrap()
}

fn with_lines(n: usize) -> InvoiceInput {
    let lines = (0..n).map(|i| LineItem::new(1, format!("Yoga mat {i}"), 100));
    let total = n as i64 * 100 + 2000;
    InvoiceInputBuilder::new("ORD900", total)
        .creditor(creditor())
        .lines(lines)
        .shipping_total(2000)
        .build()
        .unwrap()
}

fn layout(input: &InvoiceInput) -> DocumentLayout {
    renderer().layout_on(input, date(2024, 6, 15)).unwrap()
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[test]
fn ord123_table_rows() {
    let layout = layout(&ord123());
    let rows = &layout.table.rows;
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].cells, ["Position", "Anzahl", "Bezeichnung", "Total"]);
    assert_eq!(rows[1].cells, ["1", "2", "Candle", "CHF\u{a0}80.00"]);
    assert_eq!(rows[2].cells[2..], ["Versandkosten", "CHF\u{a0}20.00"]);
    assert_eq!(rows[3].cells[2..], ["Rechnungstotal", "CHF\u{a0}100.00"]);
    assert_eq!(rows[4].kind, RowKind::Spacer);
}

#[test]
fn ord123_page_content() {
    let layout = layout(&ord123());
    assert_eq!(layout.pages.len(), 1);
    for text in [
        "Rechnung zur Bestellung: ORD123",
        "Wallenwil 15.6.2024",
        "CHF\u{a0}80.00",
        "CHF\u{a0}100.00",
        "Empfangsschein",
        "Zahlteil",
        "CH14 0078 1612 4519 5200 2",
        "100.00",
        "ORD123",
        "Jane Doe",
    ] {
        assert!(layout.contains_text(text), "missing {text:?}");
    }
}

#[test]
fn ord123_grand_total_is_bold() {
    let layout = layout(&ord123());
    let bold: Vec<_> = layout
        .texts()
        .filter(|t| t.font == qrfaktura::render::layout::Font::Bold)
        .map(|t| t.text.as_str())
        .collect();
    assert!(bold.contains(&"Rechnungstotal"));
    assert!(bold.contains(&"CHF\u{a0}100.00"));
}

#[test]
fn ord123_pdf() {
    let doc = renderer().build_on(&ord123(), date(2024, 6, 15)).unwrap();
    assert_eq!(doc.filename, "ORD123.pdf");
    assert_eq!(doc.page_count, 1);
    let pdf = Document::load_mem(&doc.bytes).unwrap();
    assert_eq!(pdf.get_pages().len(), 1);
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[test]
fn empty_line_items_still_render() {
    let layout = layout(&with_lines(0));
    let kinds: Vec<_> = layout.table.rows.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        [RowKind::Header, RowKind::Shipping, RowKind::GrandTotal, RowKind::Spacer]
    );
}

#[test]
fn long_orders_span_pages() {
    let input = with_lines(80);
    let layout = layout(&input);
    assert!(layout.pages.len() >= 3, "got {} pages", layout.pages.len());
    assert_eq!(layout.table.rows.len(), 84);
    // The slip is only on the last page.
    let last = layout.pages.len() - 1;
    for (i, page) in layout.pages.iter().enumerate() {
        let has_slip = page.texts().any(|t| t.text == "Zahlteil");
        assert_eq!(has_slip, i == last, "page {i}");
    }
}

#[test]
fn table_ending_low_moves_slip_to_new_page() {
    // Enough rows to end below the slip band but still on the first page.
    let n = (1..40)
        .find(|&n| layout(&with_lines(n)).pages.len() == 2)
        .unwrap();
    let doc = layout(&with_lines(n));
    assert!(doc.table.rows.len() < 20);
    assert!(doc.pages[0].texts().all(|t| t.text != "Zahlteil"));
    assert!(doc.pages[1].texts().any(|t| t.text == "Zahlteil"));
}

#[test]
fn oversized_description_is_item_table_error() {
    let input = InvoiceInputBuilder::new("ORD1", 100)
        .creditor(creditor())
        .add_line(LineItem::new(1, "word ".repeat(4000), 100))
        .build()
        .unwrap();
    let err = renderer().build_on(&input, date(2024, 6, 15)).unwrap_err();
    assert_eq!(err.section(), Some(Section::ItemTable));
}

#[test]
fn six_digit_total_is_one_text_run() {
    let input = InvoiceInputBuilder::new("ORD8", 12_345_678)
        .creditor(creditor())
        .add_line(LineItem::new(1, "Studio", 12_345_678))
        .build()
        .unwrap();
    let layout = layout(&input);
    let amount = format_minor(12_345_678, "CHF", NumberLocale::DeCh);
    assert!(layout.contains_text(&amount));
    assert!(!layout.contains_text("8"));
}

// ---------------------------------------------------------------------------
// Validation and failures
// ---------------------------------------------------------------------------

#[test]
fn zero_amount_fails_before_rendering() {
    let input = InvoiceInputBuilder::new("ORD1", 0)
        .creditor(creditor())
        .build_unchecked()
        .unwrap();
    let err = renderer().build_on(&input, date(2024, 6, 15)).unwrap_err();
    assert!(matches!(err, InvoiceError::InvalidInput(_)), "{err:?}");
}

#[test]
fn invalid_account_is_payment_part_error() {
    let mut input = ord123();
    input.creditor.account = "CH00 1234".into();
    let err = renderer().build_on(&input, date(2024, 6, 15)).unwrap_err();
    assert_eq!(err.section(), Some(Section::PaymentPart));
}

#[test]
fn totals_mismatch_still_renders_stated_total() {
    let input = InvoiceInputBuilder::new("ORD7", 10000)
        .creditor(creditor())
        .add_line(LineItem::new(1, "Mat", 5000))
        .build()
        .unwrap();
    let layout = layout(&input);
    assert_eq!(layout.table.rows[3].cells[3], "CHF\u{a0}100.00");
}

#[test]
fn blank_debtor_renders_blank_box() {
    let layout = layout(&with_lines(1));
    assert!(layout.contains_text("Zahlbar durch (Name/Adresse)"));
    assert!(!layout.contains_text("Zahlbar durch"));
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

fn elements_without(layout: &DocumentLayout, date_line: &str) -> Vec<Element> {
    layout
        .pages
        .iter()
        .flat_map(|p| p.elements.iter())
        .filter(|e| !matches!(e, Element::Text(TextRun { text, .. }) if text == date_line))
        .cloned()
        .collect()
}

#[test]
fn documents_differ_only_in_date_line() {
    let r = renderer();
    let a = r.layout_on(&ord123(), date(2024, 1, 5)).unwrap();
    let b = r.layout_on(&ord123(), date(2025, 12, 31)).unwrap();
    assert!(a.contains_text("Wallenwil 5.1.2024"));
    assert!(b.contains_text("Wallenwil 31.12.2025"));
    assert_eq!(
        elements_without(&a, "Wallenwil 5.1.2024"),
        elements_without(&b, "Wallenwil 31.12.2025")
    );
}

#[test]
fn same_input_same_bytes() {
    let r = renderer();
    let a = r.build_on(&ord123(), date(2024, 6, 15)).unwrap();
    let b = r.build_on(&ord123(), date(2024, 6, 15)).unwrap();
    assert_eq!(a.bytes, b.bytes);
}

#[test]
fn renderer_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<InvoiceRenderer>();

    let r = renderer();
    let input = ord123();
    let expected = r.build_on(&input, date(2024, 6, 15)).unwrap().bytes;
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| r.build_on(&input, date(2024, 6, 15)).unwrap().bytes))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

#[test]
fn english_labels() {
    let r = InvoiceRenderer::new(InvoiceSettings::new(creditor()).language(Language::En));
    let layout = r.layout_on(&ord123(), date(2024, 6, 15)).unwrap();
    assert!(layout.contains_text("Invoice for order: ORD123"));
    assert!(layout.contains_text("Payment part"));
    assert_eq!(layout.table.rows[2].cells[2], "Shipping");
}

#[test]
fn french_amounts() {
    let r = InvoiceRenderer::new(InvoiceSettings::new(creditor()).language(Language::Fr));
    let layout = r.layout_on(&ord123(), date(2024, 6, 15)).unwrap();
    assert_eq!(layout.table.rows[3].cells[3], "100.00\u{a0}CHF");
}

#[test]
fn place_overrides_creditor_city() {
    let r = InvoiceRenderer::new(InvoiceSettings::new(creditor()).place("Wil SG"));
    assert_eq!(r.date_line(date(2024, 6, 15)), "Wil SG 15.6.2024");
}

#[test]
fn fixed_date_policy() {
    let settings =
        InvoiceSettings::new(creditor()).date_policy(DatePolicy::Fixed(date(2023, 2, 1)));
    let r = InvoiceRenderer::new(settings);
    let a = r.build(&ord123()).unwrap();
    let b = r.build_on(&ord123(), date(2023, 2, 1)).unwrap();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

#[test]
fn render_into_memory() {
    let settings = renderer()
        .settings()
        .clone()
        .date_policy(DatePolicy::Fixed(date(2024, 6, 15)));
    let r = InvoiceRenderer::new(settings);
    let bytes = r.render_into(&ord123(), &mut MemorySink).unwrap();
    assert_eq!(bytes, r.build(&ord123()).unwrap().bytes);
}

#[test]
fn render_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(dir.path().join("vendure-invoices"));
    let path = renderer().render_into(&ord123(), &mut sink).unwrap();
    assert_eq!(path.file_name().unwrap(), "ORD123.pdf");
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
}

#[test]
fn failed_render_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(dir.path());
    let input = InvoiceInputBuilder::new("ORD1", 0)
        .creditor(creditor())
        .build_unchecked()
        .unwrap();
    assert!(renderer().render_into(&input, &mut sink).is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn sink_trait_is_usable_generically() {
    fn write_with<S: DocumentSink>(sink: &mut S) -> S::Output {
        let writer = sink.begin("x.pdf").unwrap();
        sink.commit(writer).unwrap()
    }
    assert!(write_with(&mut MemorySink).is_empty());
}
