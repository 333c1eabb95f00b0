use std::fmt;

use thiserror::Error;

/// Errors that can occur while building or delivering an invoice document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// The input cannot describe a payable invoice (amount, currency, reference).
    /// Raised before any rendering starts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A document section could not be constructed.
    #[error("render error in {section}: {message}")]
    Render {
        /// Section that failed.
        section: Section,
        /// Human-readable cause.
        message: String,
    },

    /// Writing the finished document to its sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be parsed or are inconsistent.
    #[error("settings error: {0}")]
    Settings(String),

    /// The mail transport rejected a message.
    #[error("mail error: {0}")]
    Mail(String),
}

impl InvoiceError {
    pub(crate) fn render(section: Section, message: impl Into<String>) -> Self {
        Self::Render {
            section,
            message: message.into(),
        }
    }

    /// The failed section, if this is a render error.
    pub fn section(&self) -> Option<Section> {
        match self {
            Self::Render { section, .. } => Some(*section),
            _ => None,
        }
    }
}

/// Document sections whose construction can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    ItemTable,
    PaymentPart,
    /// Final serialization of the page model.
    Encoding,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ItemTable => "item table",
            Self::PaymentPart => "payment part",
            Self::Encoding => "encoding",
        };
        f.write_str(name)
    }
}

/// Which kind of failure a validation finding maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// Reported as [`InvoiceError::InvalidInput`].
    Input,
    /// Rejected by the QR-bill encoding; reported as a payment part render error.
    PaymentPart,
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "creditor.account").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    pub kind: ValidationKind,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    /// Create an input error.
    pub fn input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: ValidationKind::Input,
        }
    }

    /// Create an error raised by the payment part encoding rules.
    pub fn payment_part(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: ValidationKind::PaymentPart,
        }
    }
}

/// Collapse a list of findings into one error. Input errors win over
/// payment part errors since they are checked first.
pub(crate) fn into_error(errors: &[ValidationError]) -> Option<InvoiceError> {
    let join = |kind: ValidationKind| {
        errors
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    };

    let input = join(ValidationKind::Input);
    if !input.is_empty() {
        return Some(InvoiceError::InvalidInput(input));
    }
    let payment = join(ValidationKind::PaymentPart);
    if !payment.is_empty() {
        return Some(InvoiceError::render(Section::PaymentPart, payment));
    }
    None
}
