//! Swiss QR-bill payment part.
//!
//! Turns the payment fields of an invoice (creditor, debtor, currency,
//! amount, reference) into the Swiss Payment Code text, encodes it as a QR
//! code with the Swiss cross and lays out the receipt and payment part at
//! the bottom of a page. Identical inputs always give identical output.
//!
//! | Part | Size |
//! |------|------|
//! | Slip band | 210 × 105 mm |
//! | Receipt | 62 mm wide |
//! | QR code | 46 × 46 mm, error correction M |
//! | Swiss cross | 7 × 7 mm |

mod code;
mod payload;
mod slip;

pub use code::{CODE_SIZE, QrMatrix};
pub use payload::{MAX_PAYLOAD_CHARS, QrPayload};
pub use slip::{SLIP_HEIGHT, layout_slip};

use crate::core::{InvoiceError, InvoiceInput};

/// Payload and module matrix for an invoice.
pub fn encode(input: &InvoiceInput) -> Result<(QrPayload, QrMatrix), InvoiceError> {
    let payload = QrPayload::from_input(input)?;
    let matrix = QrMatrix::encode(payload.as_str())?;
    Ok((payload, matrix))
}
