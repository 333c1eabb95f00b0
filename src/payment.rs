//! The "Swiss QR invoice" payment method.
//!
//! Paying by QR-bill happens outside the shop: the customer receives the
//! invoice and transfers the money. The method therefore authorizes every
//! payment immediately and reports every settlement as successful.

use serde::{Deserialize, Serialize};

/// Payment states the method can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentState {
    Created,
    Authorized,
    Settled,
    Declined,
    Error,
    Cancelled,
}

/// Result of [`QrInvoicePaymentMethod::create_payment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentResult {
    /// Authorized amount in minor units.
    pub amount: i64,
    pub state: PaymentState,
}

/// Result of [`QrInvoicePaymentMethod::settle_payment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlePaymentResult {
    pub success: bool,
}

/// Payment method handler registered under [`QrInvoicePaymentMethod::CODE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QrInvoicePaymentMethod;

impl QrInvoicePaymentMethod {
    /// Method code stored on payments.
    pub const CODE: &'static str = "swissqrinvoice";

    pub fn description(&self) -> &'static str {
        "Swissqrinvoice"
    }

    /// Authorize `amount` (minor units) without contacting anyone.
    pub fn create_payment(&self, amount: i64) -> CreatePaymentResult {
        CreatePaymentResult {
            amount,
            state: PaymentState::Authorized,
        }
    }

    /// Settle an authorized payment. Always succeeds.
    pub fn settle_payment(&self) -> SettlePaymentResult {
        SettlePaymentResult { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorizes_any_amount() {
        let method = QrInvoicePaymentMethod;
        let result = method.create_payment(12_345);
        assert_eq!(result.amount, 12_345);
        assert_eq!(result.state, PaymentState::Authorized);
    }

    #[test]
    fn settlement_always_succeeds() {
        assert!(QrInvoicePaymentMethod.settle_payment().success);
    }
}
