use serde::{Deserialize, Serialize};

/// Everything needed to render one invoice. Built per order, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceInput {
    /// ISO 4217 currency code ("CHF" for the shop).
    pub currency: String,
    /// Amount to pay including tax, in minor units (Rappen / cents).
    pub amount_minor: i64,
    /// Free-text reference shown on the invoice and sent as the
    /// additional information of the payment (the order code).
    pub reference: String,
    /// Payee.
    pub creditor: Creditor,
    /// Payer, taken from the order's shipping address. May be blank.
    pub debtor: Debtor,
    /// Order lines in display order.
    pub line_items: Vec<LineItem>,
    /// Shipping cost including tax, in minor units.
    pub shipping_total_minor: i64,
    /// Invoice total shown in the table, in minor units.
    pub grand_total_minor: i64,
}

/// The business that receives the payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creditor {
    pub name: String,
    /// Street and house number.
    pub street: String,
    pub postal_code: String,
    pub city: String,
    /// ISO 3166-1 alpha-2.
    pub country_code: String,
    /// IBAN, spaces allowed.
    pub account: String,
    /// VAT / UID line printed under the address (e.g. "UID: CHE-123.456.789").
    pub tax_id: String,
}

/// The customer who pays. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debtor {
    pub name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub country_code: String,
}

impl Debtor {
    /// True when the debtor carries enough data to be encoded in the
    /// payment part (name, postal code, town and country).
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.postal_code, &self.city, &self.country_code]
            .iter()
            .all(|s| !s.trim().is_empty())
    }

    /// True when every field is blank.
    pub fn is_blank(&self) -> bool {
        [
            &self.name,
            &self.street,
            &self.postal_code,
            &self.city,
            &self.country_code,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }
}

/// One order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub quantity: u32,
    pub description: String,
    /// Line total including tax, in minor units.
    pub line_total_minor: i64,
}

impl LineItem {
    pub fn new(quantity: u32, description: impl Into<String>, line_total_minor: i64) -> Self {
        Self {
            quantity,
            description: description.into(),
            line_total_minor,
        }
    }
}

/// A finished invoice document, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Attachment file name, see [`document_filename`].
    pub filename: String,
    /// Complete PDF byte stream.
    pub bytes: Vec<u8>,
    /// Number of pages in the document.
    pub page_count: usize,
}

/// Attachment file name for a reference.
///
/// Path separators and control characters become `_`, as does a leading
/// dot, so the name is always a plain file name.
pub fn document_filename(reference: &str) -> String {
    let mut name: String = reference
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if name.is_empty() || name.starts_with('.') {
        name.insert(0, '_');
    }
    format!("{name}.pdf")
}
