//! Invoice input types, validation, and formatting.
//!
//! This module holds everything that does not depend on a PDF or QR
//! library: the per-order [`InvoiceInput`], its builders, validation rules
//! of the Swiss QR-bill, IBAN checks and Swiss currency formatting.

mod builder;
pub mod codes;
mod error;
mod iban;
mod money;
mod settings;
mod types;
mod validation;

pub use builder::*;
pub use error::*;
pub use iban::{Iban, IbanError, validate_iban};
pub use money::*;
pub use settings::*;
pub use types::*;
pub use validation::*;
