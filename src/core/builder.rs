use super::error::{InvoiceError, into_error};
use super::types::*;
use super::validation;

/// Builder for [`InvoiceInput`].
///
/// ```
/// use qrfaktura::core::*;
///
/// let input = InvoiceInputBuilder::new("ORD123", 10000)
///     .creditor(
///         CreditorBuilder::new("Yoga Studio", "CH14 0078 1612 4519 5200 2")
///             .address("Sonnenhaldenstrasse 5", "8360", "Wallenwil", "CH")
///             .tax_id("UID: CHE-154.780.687")
///             .build(),
///     )
///     .debtor(DebtorBuilder::new("Jane Doe").address("Main St 1", "8000", "Zurich", "CH").build())
///     .add_line(LineItem::new(2, "Candle", 8000))
///     .shipping_total(2000)
///     .build()
///     .unwrap();
///
/// assert_eq!(input.grand_total_minor, 10000);
/// ```
pub struct InvoiceInputBuilder {
    reference: String,
    amount_minor: i64,
    currency: String,
    creditor: Option<Creditor>,
    debtor: Debtor,
    line_items: Vec<LineItem>,
    shipping_total_minor: i64,
    grand_total_minor: Option<i64>,
}

impl InvoiceInputBuilder {
    pub fn new(reference: impl Into<String>, amount_minor: i64) -> Self {
        Self {
            reference: reference.into(),
            amount_minor,
            currency: "CHF".to_string(),
            creditor: None,
            debtor: Debtor::default(),
            line_items: Vec::new(),
            shipping_total_minor: 0,
            grand_total_minor: None,
        }
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn creditor(mut self, creditor: Creditor) -> Self {
        self.creditor = Some(creditor);
        self
    }

    pub fn debtor(mut self, debtor: Debtor) -> Self {
        self.debtor = debtor;
        self
    }

    pub fn add_line(mut self, line: LineItem) -> Self {
        self.line_items.push(line);
        self
    }

    pub fn lines(mut self, lines: impl IntoIterator<Item = LineItem>) -> Self {
        self.line_items.extend(lines);
        self
    }

    pub fn shipping_total(mut self, amount_minor: i64) -> Self {
        self.shipping_total_minor = amount_minor;
        self
    }

    /// Override the grand total row. Defaults to the payable amount.
    pub fn grand_total(mut self, amount_minor: i64) -> Self {
        self.grand_total_minor = Some(amount_minor);
        self
    }

    /// Build and validate. Returns all validation errors joined into one.
    pub fn build(self) -> Result<InvoiceInput, InvoiceError> {
        let input = self.build_unchecked()?;
        let errors = validation::validate_input(&input);
        match into_error(&errors) {
            Some(err) => Err(err),
            None => Ok(input),
        }
    }

    /// Build without validation. The renderer still validates before layout.
    pub fn build_unchecked(self) -> Result<InvoiceInput, InvoiceError> {
        let creditor = self
            .creditor
            .ok_or_else(|| InvoiceError::InvalidInput("creditor is required".into()))?;

        Ok(InvoiceInput {
            currency: self.currency,
            amount_minor: self.amount_minor,
            reference: self.reference,
            creditor,
            debtor: self.debtor,
            line_items: self.line_items,
            shipping_total_minor: self.shipping_total_minor,
            grand_total_minor: self.grand_total_minor.unwrap_or(self.amount_minor),
        })
    }
}

/// Builder for [`Creditor`].
pub struct CreditorBuilder {
    name: String,
    account: String,
    street: String,
    postal_code: String,
    city: String,
    country_code: String,
    tax_id: String,
}

impl CreditorBuilder {
    pub fn new(name: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            account: account.into(),
            street: String::new(),
            postal_code: String::new(),
            city: String::new(),
            country_code: "CH".to_string(),
            tax_id: String::new(),
        }
    }

    pub fn address(
        mut self,
        street: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        self.street = street.into();
        self.postal_code = postal_code.into();
        self.city = city.into();
        self.country_code = country_code.into();
        self
    }

    pub fn tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = tax_id.into();
        self
    }

    pub fn build(self) -> Creditor {
        Creditor {
            name: self.name,
            street: self.street,
            postal_code: self.postal_code,
            city: self.city,
            country_code: self.country_code,
            account: self.account,
            tax_id: self.tax_id,
        }
    }
}

/// Builder for [`Debtor`].
pub struct DebtorBuilder {
    debtor: Debtor,
}

impl DebtorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            debtor: Debtor {
                name: name.into(),
                ..Debtor::default()
            },
        }
    }

    pub fn address(
        mut self,
        street: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        self.debtor.street = street.into();
        self.debtor.postal_code = postal_code.into();
        self.debtor.city = city.into();
        self.debtor.country_code = country_code.into();
        self
    }

    pub fn build(self) -> Debtor {
        self.debtor
    }
}
