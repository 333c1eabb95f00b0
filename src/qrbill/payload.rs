//! Swiss Payment Code: the text encoded in the QR code.

use crate::core::{
    Creditor, Debtor, InvoiceError, InvoiceInput, Section, format_payload_amount, validate_iban,
};

/// Maximum payload length accepted by the standard.
pub const MAX_PAYLOAD_CHARS: usize = 997;

const QR_TYPE: &str = "SPC";
const VERSION: &str = "0200";
const CODING_UTF8: &str = "1";
const ADDRESS_STRUCTURED: &str = "S";
const REFERENCE_NONE: &str = "NON";
const TRAILER: &str = "EPD";

/// The payload of one QR-bill, ready to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    text: String,
    debtor_encoded: bool,
}

impl QrPayload {
    /// Build the Swiss Payment Code for an invoice.
    ///
    /// The reference is sent as the unstructured message (reference type
    /// `NON`). An incomplete debtor is left out; the slip then shows the
    /// blank "payable by" box.
    pub fn from_input(input: &InvoiceInput) -> Result<Self, InvoiceError> {
        let iban = validate_iban(&input.creditor.account)
            .map_err(|e| InvoiceError::render(Section::PaymentPart, e.to_string()))?;

        let mut fields: Vec<String> = vec![
            QR_TYPE.into(),
            VERSION.into(),
            CODING_UTF8.into(),
            iban.as_str().into(),
        ];
        fields.extend(creditor_fields(&input.creditor));
        // Ultimate creditor: reserved, always empty.
        fields.extend(std::iter::repeat_n(String::new(), 7));
        fields.push(format_payload_amount(input.amount_minor));
        fields.push(input.currency.trim().into());

        let debtor_encoded = input.debtor.is_complete();
        if debtor_encoded {
            fields.extend(debtor_fields(&input.debtor));
        } else {
            fields.extend(std::iter::repeat_n(String::new(), 7));
        }

        fields.push(REFERENCE_NONE.into());
        fields.push(String::new());
        fields.push(clean(&input.reference));
        fields.push(TRAILER.into());

        let text = fields.join("\n");
        let chars = text.chars().count();
        if chars > MAX_PAYLOAD_CHARS {
            return Err(InvoiceError::render(
                Section::PaymentPart,
                format!("QR payload has {chars} characters, at most {MAX_PAYLOAD_CHARS} allowed"),
            ));
        }

        Ok(Self {
            text,
            debtor_encoded,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the debtor address is part of the payload.
    pub fn has_debtor(&self) -> bool {
        self.debtor_encoded
    }
}

fn creditor_fields(c: &Creditor) -> [String; 7] {
    [
        ADDRESS_STRUCTURED.into(),
        clean(&c.name),
        clean(&c.street),
        String::new(),
        clean(&c.postal_code),
        clean(&c.city),
        clean(&c.country_code),
    ]
}

fn debtor_fields(d: &Debtor) -> [String; 7] {
    [
        ADDRESS_STRUCTURED.into(),
        clean(&d.name),
        clean(&d.street),
        String::new(),
        clean(&d.postal_code),
        clean(&d.city),
        clean(&d.country_code),
    ]
}

/// Fields are line-separated, so line breaks and other control characters
/// inside a value become spaces.
fn clean(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
