//! Shop events the notification layer reacts to.
//!
//! Field names serialize in camelCase so that email templates can use the
//! same paths as the shop (`{{ order.code }}`, `{{ order.totalWithTax }}`).

use serde::{Deserialize, Serialize};

use crate::payment::PaymentState;

/// Lifecycle states of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderState {
    AddingItems,
    ArrangingPayment,
    PaymentAuthorized,
    PaymentSettled,
    PartiallyShipped,
    Shipped,
    PartiallyDelivered,
    Delivered,
    Modifying,
    ArrangingAdditionalPayment,
    Cancelled,
    /// Any state added by shop plugins.
    #[serde(other)]
    Other,
}

/// Shipping address of an order. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub street_line1: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub quantity: u32,
    /// Name of the ordered product variant.
    pub product_name: String,
    /// Line price including tax, in minor units.
    pub line_price_with_tax: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub email_address: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// An order as seen by the notification handlers. Amounts are minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub code: String,
    /// Total without tax.
    pub total: i64,
    pub total_with_tax: i64,
    pub shipping_with_tax: i64,
    #[serde(default)]
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
    #[serde(default)]
    pub customer: Option<Customer>,
}

impl Order {
    /// Tax contained in the order total, in minor units.
    pub fn tax_included_minor(&self) -> i64 {
        self.total_with_tax - self.total
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Code of the payment method handler.
    pub method: String,
    pub amount: i64,
    pub state: PaymentState,
}

/// Credentials of a user that logs in with email and password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeAuth {
    pub identifier: String,
    #[serde(default)]
    pub verification_token: Option<String>,
    #[serde(default)]
    pub password_reset_token: Option<String>,
    #[serde(default)]
    pub identifier_change_token: Option<String>,
    /// New email address awaiting confirmation.
    #[serde(default)]
    pub pending_identifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthenticationMethod {
    Native(NativeAuth),
    /// Login through an external identity provider.
    #[serde(rename_all = "camelCase")]
    External {
        strategy: String,
        external_identifier: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Login identifier, usually the email address.
    pub identifier: String,
    #[serde(default)]
    pub authentication_methods: Vec<AuthenticationMethod>,
}

impl User {
    /// The native (email and password) method, if the user has one.
    pub fn native_auth(&self) -> Option<&NativeAuth> {
        self.authentication_methods.iter().find_map(|m| match m {
            AuthenticationMethod::Native(native) => Some(native),
            AuthenticationMethod::External { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStateTransition {
    pub from_state: PaymentState,
    pub to_state: PaymentState,
    pub payment: Payment,
    pub order: Order,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStateTransition {
    pub from_state: OrderState,
    pub to_state: OrderState,
    pub order: Order,
}

/// Events that may trigger an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    PaymentStateTransition(PaymentStateTransition),
    OrderStateTransition(OrderStateTransition),
    AccountRegistration { user: User },
    PasswordReset { user: User },
    IdentifierChangeRequest { user: User },
}

impl DomainEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PaymentStateTransition(_) => "payment_state_transition",
            Self::OrderStateTransition(_) => "order_state_transition",
            Self::AccountRegistration { .. } => "account_registration",
            Self::PasswordReset { .. } => "password_reset",
            Self::IdentifierChangeRequest { .. } => "identifier_change_request",
        }
    }
}
