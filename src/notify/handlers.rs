use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::core::{
    Creditor, Debtor, InvoiceError, InvoiceInput, InvoiceSettings, LineItem, minor_to_decimal,
};
use crate::payment::{PaymentState, QrInvoicePaymentMethod};
use crate::render::{FileSink, InvoiceRenderer, deliver};

use super::events::{DomainEvent, Order, OrderState, OrderStateTransition, PaymentStateTransition, User};
use super::mail::{
    Attachment, AttachmentContent, EmailMessage, InvoiceStorage, MailSettings, MailTransport,
};
use super::template::render_template;

/// Currency of every shop invoice.
pub const INVOICE_CURRENCY: &str = "CHF";

pub const SEND_INVOICE: &str = "send-invoice";
pub const ORDER_CONFIRMATION: &str = "order-confirmation";
pub const EMAIL_VERIFICATION: &str = "email-verification";
pub const PASSWORD_RESET: &str = "password-reset";
pub const EMAIL_ADDRESS_CHANGE: &str = "email-address-change";

const INVOICE_SUBJECT: &str = "Rechnung für Bestellung #{{ order.code }}";
const CONFIRMATION_SUBJECT: &str = "Bestellbestätigung für #{{ order.code }}";
const VERIFICATION_SUBJECT: &str = "E-Mail-Adresse bestätigen";
const PASSWORD_RESET_SUBJECT: &str = "Passwort zurücksetzen";
const ADDRESS_CHANGE_SUBJECT: &str = "Neue E-Mail-Adresse bestätigen";

/// Invoice data for an order: amount and total are the order total with
/// tax, the reference is the order code and the debtor is the shipping
/// address.
pub fn invoice_input_from_order(order: &Order, creditor: &Creditor) -> InvoiceInput {
    let address = &order.shipping_address;
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    InvoiceInput {
        currency: INVOICE_CURRENCY.to_string(),
        amount_minor: order.total_with_tax,
        reference: order.code.clone(),
        creditor: creditor.clone(),
        debtor: Debtor {
            name: field(&address.full_name),
            street: field(&address.street_line1),
            postal_code: field(&address.postal_code),
            city: field(&address.city),
            country_code: field(&address.country_code),
        },
        line_items: order
            .lines
            .iter()
            .map(|l| LineItem::new(l.quantity, l.product_name.clone(), l.line_price_with_tax))
            .collect(),
        shipping_total_minor: order.shipping_with_tax,
        grand_total_minor: order.total_with_tax,
    }
}

/// Turns shop events into email messages.
///
/// | Handler | Event | Condition |
/// |---------|-------|-----------|
/// | `send-invoice` | payment state transition | to `Authorized`, method `swissqrinvoice`, order has a customer |
/// | `order-confirmation` | order state transition | to `PaymentSettled`, not from `Modifying`, order has a customer |
/// | `email-verification` | account registration | native login with an identifier |
/// | `password-reset` | password reset | native login |
/// | `email-address-change` | identifier change request | native login with a pending identifier |
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    renderer: InvoiceRenderer,
    mail: MailSettings,
}

impl NotificationDispatcher {
    pub fn new(invoice: InvoiceSettings, mail: MailSettings) -> Self {
        Self {
            renderer: InvoiceRenderer::new(invoice),
            mail,
        }
    }

    pub fn renderer(&self) -> &InvoiceRenderer {
        &self.renderer
    }

    pub fn mail_settings(&self) -> &MailSettings {
        &self.mail
    }

    /// Build the message for `event`, or `None` if no handler applies.
    ///
    /// # Errors
    ///
    /// Fails when the invoice cannot be rendered or stored. Nothing is
    /// retried; the caller decides whether to skip the event.
    pub fn handle(&self, event: &DomainEvent) -> Result<Option<EmailMessage>, InvoiceError> {
        let date = self.renderer.settings().date_policy.resolve();
        match event {
            DomainEvent::PaymentStateTransition(t) => self.send_invoice(t, date),
            DomainEvent::OrderStateTransition(t) => Ok(self.order_confirmation(t, date)),
            DomainEvent::AccountRegistration { user } => Ok(self.email_verification(user)),
            DomainEvent::PasswordReset { user } => Ok(self.password_reset(user)),
            DomainEvent::IdentifierChangeRequest { user } => Ok(self.email_address_change(user)),
        }
    }

    /// Handle `event` and send the resulting message, if any. Returns
    /// whether a message was sent.
    pub fn dispatch<T: MailTransport + ?Sized>(
        &self,
        event: &DomainEvent,
        transport: &T,
    ) -> Result<bool, InvoiceError> {
        let Some(message) = self.handle(event)? else {
            tracing::debug!(event = event.event_type(), "no email handler applies");
            return Ok(false);
        };
        tracing::info!(
            handler = message.event_type,
            recipient = %message.recipient,
            attachments = message.attachments.len(),
            "sending email"
        );
        transport.send(&message).inspect_err(|e| {
            tracing::error!(handler = message.event_type, error = %e, "email not sent");
        })?;
        Ok(true)
    }

    fn send_invoice(
        &self,
        t: &PaymentStateTransition,
        date: NaiveDate,
    ) -> Result<Option<EmailMessage>, InvoiceError> {
        let order = &t.order;
        let Some(customer) = &order.customer else {
            return Ok(None);
        };
        if t.to_state != PaymentState::Authorized
            || t.payment.method != QrInvoicePaymentMethod::CODE
        {
            return Ok(None);
        }

        let input = invoice_input_from_order(order, &self.renderer.settings().creditor);
        let doc = self.renderer.build_on(&input, date).inspect_err(|e| {
            tracing::error!(order = %order.code, error = %e, "invoice rendering failed");
        })?;
        let content = match &self.mail.invoice_storage {
            InvoiceStorage::Memory => AttachmentContent::Bytes(doc.bytes),
            InvoiceStorage::Directory(dir) => {
                let path = deliver(&mut FileSink::new(dir), &doc.filename, &doc.bytes)
                    .inspect_err(|e| {
                        tracing::error!(order = %order.code, error = %e, "invoice could not be stored");
                    })?;
                AttachmentContent::Path(path)
            }
        };

        let vars = self.order_vars(order, date);
        let from = self
            .mail
            .invoice_from
            .clone()
            .unwrap_or_else(|| self.mail.from_address().to_string());
        Ok(Some(EmailMessage {
            event_type: SEND_INVOICE,
            recipient: customer.email_address.clone(),
            from,
            bcc: self.mail.bcc.clone(),
            subject: render_template(INVOICE_SUBJECT, &vars),
            attachments: vec![Attachment {
                filename: doc.filename,
                content,
            }],
            template_vars: vars,
        }))
    }

    fn order_confirmation(&self, t: &OrderStateTransition, date: NaiveDate) -> Option<EmailMessage> {
        let customer = t.order.customer.as_ref()?;
        if t.to_state != OrderState::PaymentSettled || t.from_state == OrderState::Modifying {
            return None;
        }
        let vars = self.order_vars(&t.order, date);
        Some(EmailMessage {
            event_type: ORDER_CONFIRMATION,
            recipient: customer.email_address.clone(),
            from: self.mail.from_address().to_string(),
            bcc: self.mail.bcc.clone(),
            subject: render_template(CONFIRMATION_SUBJECT, &vars),
            attachments: Vec::new(),
            template_vars: vars,
        })
    }

    fn email_verification(&self, user: &User) -> Option<EmailMessage> {
        let native = user.native_auth().filter(|n| !n.identifier.is_empty())?;
        Some(self.account_message(
            EMAIL_VERIFICATION,
            user.identifier.clone(),
            VERIFICATION_SUBJECT,
            json!({ "verificationToken": native.verification_token }),
        ))
    }

    fn password_reset(&self, user: &User) -> Option<EmailMessage> {
        let Some(native) = user.native_auth() else {
            tracing::warn!(user = %user.identifier, "password reset for user without native login");
            return None;
        };
        Some(self.account_message(
            PASSWORD_RESET,
            user.identifier.clone(),
            PASSWORD_RESET_SUBJECT,
            json!({ "passwordResetToken": native.password_reset_token }),
        ))
    }

    fn email_address_change(&self, user: &User) -> Option<EmailMessage> {
        let native = user.native_auth()?;
        let Some(pending) = native.pending_identifier.clone() else {
            tracing::warn!(user = %user.identifier, "identifier change without pending identifier");
            return None;
        };
        Some(self.account_message(
            EMAIL_ADDRESS_CHANGE,
            pending,
            ADDRESS_CHANGE_SUBJECT,
            json!({ "identifierChangeToken": native.identifier_change_token }),
        ))
    }

    fn account_message(
        &self,
        event_type: &'static str,
        recipient: String,
        subject: &str,
        vars: Value,
    ) -> EmailMessage {
        let vars = self.with_globals(vars);
        EmailMessage {
            event_type,
            recipient,
            from: self.mail.from_address().to_string(),
            bcc: Vec::new(),
            subject: render_template(subject, &vars),
            attachments: Vec::new(),
            template_vars: vars,
        }
    }

    fn order_vars(&self, order: &Order, date: NaiveDate) -> Value {
        self.with_globals(json!({
            "order": order,
            "date": date.to_string(),
            "taxIncluded": minor_to_decimal(order.tax_included_minor()),
        }))
    }

    /// Add the global variables under the handler's own ones.
    fn with_globals(&self, mut vars: Value) -> Value {
        if let Value::Object(map) = &mut vars {
            for (name, value) in &self.mail.global_vars {
                map.entry(name.clone())
                    .or_insert_with(|| Value::String(value.clone()));
            }
        }
        vars
    }
}
