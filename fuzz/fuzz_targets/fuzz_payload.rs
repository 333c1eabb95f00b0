#![no_main]

use libfuzzer_sys::fuzz_target;
use qrfaktura::core::{CreditorBuilder, Debtor, InvoiceInputBuilder};
use qrfaktura::qrbill::QrPayload;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = s.splitn(3, '|');
    let name = parts.next().unwrap_or_default();
    let city = parts.next().unwrap_or_default();
    let reference = parts.next().unwrap_or_default();

    let creditor = CreditorBuilder::new("Shop", "CH14 0078 1612 4519 5200 2")
        .address("Hauptstrasse 1", "8000", "Zurich", "CH")
        .build();
    let debtor = Debtor {
        name: name.into(),
        postal_code: "8000".into(),
        city: city.into(),
        country_code: "CH".into(),
        ..Debtor::default()
    };
    let Ok(input) = InvoiceInputBuilder::new(reference, 100)
        .creditor(creditor)
        .debtor(debtor)
        .build_unchecked()
    else {
        return;
    };
    // Field values must never add or remove payload lines.
    if let Ok(payload) = QrPayload::from_input(&input) {
        assert_eq!(payload.as_str().split('\n').count(), 31);
    }
});
