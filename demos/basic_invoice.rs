use chrono::NaiveDate;
use qrfaktura::core::*;
use qrfaktura::render::{FileSink, InvoiceRenderer};

fn main() {
    // The shop's payee profile, normally loaded from configuration
    let shop = CreditorBuilder::new("Yoga Studio", "CH14 0078 1612 4519 5200 2")
        .address("Sonnenhaldenstrasse 5", "8360", "Wallenwil", "CH")
        .tax_id("UID: CHE-154.780.687")
        .build();

    let input = InvoiceInputBuilder::new("ORD123", 10000)
        .creditor(shop.clone())
        .debtor(
            DebtorBuilder::new("Jane Doe")
                .address("Main St 1", "8000", "Zurich", "CH")
                .build(),
        )
        .add_line(LineItem::new(2, "Candle", 8000))
        .shipping_total(2000)
        .build()
        .expect("order should be a valid invoice");

    if let Some(mismatch) = reconcile_totals(&input) {
        println!("Totals differ by {}", mismatch.difference_minor());
    }

    let settings = InvoiceSettings::new(shop)
        .date_policy(DatePolicy::Fixed(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
    let renderer = InvoiceRenderer::new(settings);

    let doc = renderer.build(&input).expect("invoice should render");
    println!("{}: {} page(s), {} bytes", doc.filename, doc.page_count, doc.bytes.len());
    println!(
        "Total: {}",
        format_minor(input.grand_total_minor, &input.currency, NumberLocale::DeCh)
    );

    let dir = std::env::temp_dir().join("qrfaktura-invoices");
    let path = renderer
        .render_into(&input, &mut FileSink::new(&dir))
        .expect("invoice should be written");
    println!("Written to {}", path.display());

    // Invalid input is rejected before anything is drawn
    let broken = InvoiceInputBuilder::new("ORD124", 0)
        .creditor(creditor_without_account())
        .build_unchecked()
        .unwrap();
    match renderer.build(&broken) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Rejected: {e}"),
    }
}

fn creditor_without_account() -> Creditor {
    CreditorBuilder::new("Yoga Studio", "")
        .address("Sonnenhaldenstrasse 5", "8360", "Wallenwil", "CH")
        .build()
}
