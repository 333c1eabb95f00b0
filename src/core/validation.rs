use super::codes::{is_known_country_code, is_known_currency_code, is_qr_bill_currency};
use super::error::ValidationError;
use super::iban::validate_iban;
use super::types::*;

/// Maximum length of the unstructured message (additional information).
pub const MAX_REFERENCE_LEN: usize = 140;
/// Largest amount the payment part can carry, in minor units (999 999 999.99).
pub const MAX_AMOUNT_MINOR: i64 = 99_999_999_999;

const MAX_NAME_LEN: usize = 70;
const MAX_STREET_LEN: usize = 70;
const MAX_POSTAL_CODE_LEN: usize = 16;
const MAX_TOWN_LEN: usize = 35;

/// Validate an invoice input. Returns all problems found (not just the first).
///
/// Blank debtor fields are never reported; the document renders them empty.
pub fn validate_input(input: &InvoiceInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if input.amount_minor <= 0 {
        errors.push(ValidationError::input(
            "amount_minor",
            format!("amount must be positive, got {}", input.amount_minor),
        ));
    }
    if input.currency.trim().is_empty() {
        errors.push(ValidationError::input("currency", "currency must not be empty"));
    }

    let reference_len = input.reference.chars().count();
    if input.reference.trim().is_empty() {
        errors.push(ValidationError::input("reference", "reference must not be empty"));
    } else if reference_len > MAX_REFERENCE_LEN {
        errors.push(ValidationError::input(
            "reference",
            format!("reference has {reference_len} characters, at most {MAX_REFERENCE_LEN} allowed"),
        ));
    }

    if input.grand_total_minor != input.amount_minor {
        errors.push(ValidationError::input(
            "grand_total_minor",
            format!(
                "grand total {} does not match amount {}",
                input.grand_total_minor, input.amount_minor
            ),
        ));
    }
    if input.shipping_total_minor < 0 {
        errors.push(ValidationError::input(
            "shipping_total_minor",
            "shipping total must not be negative",
        ));
    }
    for (i, line) in input.line_items.iter().enumerate() {
        if line.quantity == 0 {
            errors.push(ValidationError::input(
                format!("line_items[{i}].quantity"),
                "quantity must be positive",
            ));
        }
        if line.line_total_minor < 0 {
            errors.push(ValidationError::input(
                format!("line_items[{i}].line_total_minor"),
                "line total must not be negative",
            ));
        }
    }

    validate_payment_part(input, &mut errors);
    errors
}

/// Rules of the QR-bill encoding itself.
fn validate_payment_part(input: &InvoiceInput, errors: &mut Vec<ValidationError>) {
    let currency = input.currency.trim();
    if !currency.is_empty() && !is_qr_bill_currency(currency) {
        let reason = if is_known_currency_code(currency) {
            format!("currency '{currency}' is not allowed on a QR-bill (CHF or EUR)")
        } else {
            format!("currency '{currency}' is not a known ISO 4217 code")
        };
        errors.push(ValidationError::payment_part("currency", reason));
    }

    if input.amount_minor > MAX_AMOUNT_MINOR {
        errors.push(ValidationError::payment_part(
            "amount_minor",
            "amount exceeds 999 999 999.99",
        ));
    }

    match validate_iban(&input.creditor.account) {
        Ok(iban) => {
            if !matches!(iban.country(), "CH" | "LI") {
                errors.push(ValidationError::payment_part(
                    "creditor.account",
                    format!("only CH and LI accounts are allowed, got {}", iban.country()),
                ));
            }
            // An unstructured reference (type NON) cannot be paid to a QR-IBAN.
            if iban.is_qr_iban() {
                errors.push(ValidationError::payment_part(
                    "creditor.account",
                    "QR-IBAN requires a structured QR reference",
                ));
            }
        }
        Err(e) => errors.push(ValidationError::payment_part("creditor.account", e.to_string())),
    }

    let creditor = &input.creditor;
    for (field, value) in [
        ("creditor.name", &creditor.name),
        ("creditor.postal_code", &creditor.postal_code),
        ("creditor.city", &creditor.city),
        ("creditor.country_code", &creditor.country_code),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::payment_part(field, "must not be empty"));
        }
    }
    check_address(
        "creditor",
        [
            &creditor.name,
            &creditor.street,
            &creditor.postal_code,
            &creditor.city,
            &creditor.country_code,
        ],
        errors,
    );

    // Only a complete debtor is encoded; otherwise the slip leaves the box blank.
    let debtor = &input.debtor;
    if debtor.is_complete() {
        check_address(
            "debtor",
            [
                &debtor.name,
                &debtor.street,
                &debtor.postal_code,
                &debtor.city,
                &debtor.country_code,
            ],
            errors,
        );
    }
}

fn check_address(prefix: &str, fields: [&String; 5], errors: &mut Vec<ValidationError>) {
    let [name, street, postal_code, city, country] = fields;
    let limits = [
        ("name", name, MAX_NAME_LEN),
        ("street", street, MAX_STREET_LEN),
        ("postal_code", postal_code, MAX_POSTAL_CODE_LEN),
        ("city", city, MAX_TOWN_LEN),
    ];
    for (field, value, max) in limits {
        let len = value.trim().chars().count();
        if len > max {
            errors.push(ValidationError::payment_part(
                format!("{prefix}.{field}"),
                format!("{len} characters, at most {max} allowed"),
            ));
        }
    }
    let country = country.trim();
    if !country.is_empty() && !is_known_country_code(country) {
        errors.push(ValidationError::payment_part(
            format!("{prefix}.country_code"),
            format!("'{country}' is not an ISO 3166-1 alpha-2 code"),
        ));
    }
}

/// Difference between the stated grand total and the sum of the table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalsMismatch {
    /// Grand total supplied by the caller.
    pub stated_minor: i64,
    /// Sum of line totals plus shipping.
    pub computed_minor: i64,
}

impl TotalsMismatch {
    pub fn difference_minor(&self) -> i64 {
        self.stated_minor - self.computed_minor
    }
}

/// Check `grand_total == Σ line totals + shipping`.
///
/// Returns `None` when the rows add up. A mismatch is not an error; the
/// invoice shows the stated grand total.
pub fn reconcile_totals(input: &InvoiceInput) -> Option<TotalsMismatch> {
    let computed_minor = input
        .line_items
        .iter()
        .map(|l| l.line_total_minor)
        .fold(input.shipping_total_minor, i64::saturating_add);
    (computed_minor != input.grand_total_minor).then_some(TotalsMismatch {
        stated_minor: input.grand_total_minor,
        computed_minor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ValidationKind;

    fn input() -> InvoiceInput {
        InvoiceInput {
            currency: "CHF".into(),
            amount_minor: 10000,
            reference: "ORD123".into(),
            creditor: Creditor {
                name: "Yoga Studio".into(),
                street: "Sonnenhaldenstrasse 5".into(),
                postal_code: "8360".into(),
                city: "Wallenwil".into(),
                country_code: "CH".into(),
                account: "CH14 0078 1612 4519 5200 2".into(),
                tax_id: "UID: CHE-154.780.687".into(),
            },
            debtor: Debtor::default(),
            line_items: vec![LineItem::new(2, "Candle", 8000)],
            shipping_total_minor: 2000,
            grand_total_minor: 10000,
        }
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_input_with_blank_debtor() {
        assert!(validate_input(&input()).is_empty());
    }

    #[test]
    fn zero_amount_is_input_error() {
        let mut inv = input();
        inv.amount_minor = 0;
        inv.grand_total_minor = 0;
        let errors = validate_input(&inv);
        assert_eq!(fields(&errors), ["amount_minor"]);
        assert_eq!(errors[0].kind, ValidationKind::Input);
    }

    #[test]
    fn reference_limit_counts_chars() {
        let mut inv = input();
        inv.reference = "ä".repeat(140);
        assert!(validate_input(&inv).is_empty());
        inv.reference.push('x');
        assert_eq!(fields(&validate_input(&inv)), ["reference"]);
    }

    #[test]
    fn foreign_currency_is_payment_part_error() {
        let mut inv = input();
        inv.currency = "USD".into();
        let errors = validate_input(&inv);
        assert_eq!(fields(&errors), ["currency"]);
        assert_eq!(errors[0].kind, ValidationKind::PaymentPart);
    }

    #[test]
    fn qr_iban_rejected_for_unstructured_reference() {
        let mut inv = input();
        inv.creditor.account = "CH44 3199 9123 0008 8901 2".into();
        let errors = validate_input(&inv);
        assert_eq!(fields(&errors), ["creditor.account"]);
        assert!(errors[0].message.contains("QR-IBAN"));
    }

    #[test]
    fn incomplete_debtor_is_not_checked() {
        let mut inv = input();
        inv.debtor.name = "x".repeat(200);
        assert!(validate_input(&inv).is_empty());
        inv.debtor.postal_code = "8000".into();
        inv.debtor.city = "Zürich".into();
        inv.debtor.country_code = "CH".into();
        assert_eq!(fields(&validate_input(&inv)), ["debtor.name"]);
    }

    #[test]
    fn reconcile() {
        let mut inv = input();
        assert_eq!(reconcile_totals(&inv), None);
        inv.shipping_total_minor = 1500;
        let mismatch = reconcile_totals(&inv).unwrap();
        assert_eq!(mismatch.computed_minor, 9500);
        assert_eq!(mismatch.difference_minor(), 500);
    }
}
