//! Integration tests for the email handlers.

#![cfg(feature = "notify")]

use chrono::NaiveDate;
use qrfaktura::core::*;
use qrfaktura::notify::*;
use qrfaktura::payment::PaymentState;
use serde_json::json;

fn creditor() -> Creditor {
    CreditorBuilder::new("Yoga Studio", "CH14 0078 1612 4519 5200 2")
        .address("Sonnenhaldenstrasse 5", "8360", "Wallenwil", "CH")
        .tax_id("UID: CHE-154.780.687")
        .build()
}

fn mail() -> MailSettings {
    MailSettings::new("\"Yoga Studio\" <noreply@example.com>")
        .invoice_from("\"Yoga Studio\" <no-reply@yoga.example>")
        .bcc("owner@example.com")
        .global_var("verifyEmailAddressUrl", "http://localhost:8080/verify")
}

fn dispatcher() -> NotificationDispatcher {
    let settings = InvoiceSettings::new(creditor())
        .date_policy(DatePolicy::Fixed(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
    NotificationDispatcher::new(settings, mail())
}

fn order() -> Order {
    Order {
        code: "ORD123".into(),
        total: 9250,
        total_with_tax: 10000,
        shipping_with_tax: 2000,
        shipping_address: ShippingAddress {
            full_name: Some("Jane Doe".into()),
            street_line1: Some("Main St 1".into()),
            postal_code: Some("8000".into()),
            city: Some("Zurich".into()),
            country_code: Some("CH".into()),
        },
        lines: vec![OrderLine {
            quantity: 2,
            product_name: "Candle".into(),
            line_price_with_tax: 8000,
        }],
        customer: Some(Customer {
            email_address: "jane@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        }),
    }
}

fn payment_event(to_state: PaymentState, method: &str, order: Order) -> DomainEvent {
    DomainEvent::PaymentStateTransition(PaymentStateTransition {
        from_state: PaymentState::Created,
        to_state,
        payment: Payment {
            method: method.into(),
            amount: order.total_with_tax,
            state: to_state,
        },
        order,
    })
}

fn order_event(from_state: OrderState, to_state: OrderState, order: Order) -> DomainEvent {
    DomainEvent::OrderStateTransition(OrderStateTransition {
        from_state,
        to_state,
        order,
    })
}

fn native_user(native: NativeAuth) -> User {
    User {
        identifier: "jane@example.com".into(),
        authentication_methods: vec![AuthenticationMethod::Native(native)],
    }
}

// ---------------------------------------------------------------------------
// send-invoice
// ---------------------------------------------------------------------------

#[test]
fn invoice_sent_on_authorized_qr_payment() {
    let event = payment_event(PaymentState::Authorized, "swissqrinvoice", order());
    let msg = dispatcher().handle(&event).unwrap().unwrap();

    assert_eq!(msg.event_type, "send-invoice");
    assert_eq!(msg.recipient, "jane@example.com");
    assert_eq!(msg.from, "\"Yoga Studio\" <no-reply@yoga.example>");
    assert_eq!(msg.bcc, ["owner@example.com"]);
    assert_eq!(msg.subject, "Rechnung für Bestellung #ORD123");
    assert_eq!(msg.template_vars["taxIncluded"], json!("7.50"));
    assert_eq!(msg.template_vars["date"], json!("2024-06-15"));
    assert_eq!(msg.template_vars["order"]["code"], json!("ORD123"));

    assert_eq!(msg.attachments.len(), 1);
    let attachment = &msg.attachments[0];
    assert_eq!(attachment.filename, "ORD123.pdf");
    let AttachmentContent::Bytes(bytes) = &attachment.content else {
        panic!("expected in-memory attachment");
    };
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn attached_invoice_matches_direct_render() {
    let d = dispatcher();
    let event = payment_event(PaymentState::Authorized, "swissqrinvoice", order());
    let msg = d.handle(&event).unwrap().unwrap();
    let input = invoice_input_from_order(&order(), &creditor());
    let direct = d.renderer().build(&input).unwrap();
    assert_eq!(msg.attachments[0].content, AttachmentContent::Bytes(direct.bytes));
}

#[test]
fn invoice_stored_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    let settings = InvoiceSettings::new(creditor());
    let mail = mail().invoice_storage(InvoiceStorage::Directory(dir.path().join("vendure-invoices")));
    let d = NotificationDispatcher::new(settings, mail);

    let event = payment_event(PaymentState::Authorized, "swissqrinvoice", order());
    let msg = d.handle(&event).unwrap().unwrap();
    let expected = dir.path().join("vendure-invoices").join("ORD123.pdf");
    assert_eq!(msg.attachments[0].content, AttachmentContent::Path(expected.clone()));
    assert!(std::fs::read(expected).unwrap().starts_with(b"%PDF"));
}

#[test]
fn order_code_with_slash_is_stored_under_plain_name() {
    let dir = tempfile::tempdir().unwrap();
    let settings = InvoiceSettings::new(creditor());
    let mail = mail().invoice_storage(InvoiceStorage::Directory(dir.path().to_path_buf()));
    let d = NotificationDispatcher::new(settings, mail);

    let mut order = order();
    order.code = "2024/ORD9".into();
    let event = payment_event(PaymentState::Authorized, "swissqrinvoice", order);
    let msg = d.handle(&event).unwrap().unwrap();
    let expected = dir.path().join("2024_ORD9.pdf");
    assert_eq!(msg.attachments[0].filename, "2024_ORD9.pdf");
    assert_eq!(msg.attachments[0].content, AttachmentContent::Path(expected.clone()));
    assert!(expected.exists());
}

#[test]
fn no_invoice_for_other_methods_or_states() {
    let d = dispatcher();
    for event in [
        payment_event(PaymentState::Authorized, "stripe", order()),
        payment_event(PaymentState::Settled, "swissqrinvoice", order()),
        payment_event(PaymentState::Declined, "swissqrinvoice", order()),
    ] {
        assert_eq!(d.handle(&event).unwrap(), None);
    }
}

#[test]
fn no_invoice_without_customer() {
    let mut order = order();
    order.customer = None;
    let event = payment_event(PaymentState::Authorized, "swissqrinvoice", order);
    assert_eq!(dispatcher().handle(&event).unwrap(), None);
}

#[test]
fn missing_shipping_address_still_invoiced() {
    let mut order = order();
    order.shipping_address = ShippingAddress::default();
    let event = payment_event(PaymentState::Authorized, "swissqrinvoice", order);
    let msg = dispatcher().handle(&event).unwrap().unwrap();
    assert_eq!(msg.attachments.len(), 1);
}

#[test]
fn render_failure_is_returned() {
    let mut order = order();
    order.total_with_tax = 0;
    let event = payment_event(PaymentState::Authorized, "swissqrinvoice", order);
    let err = dispatcher().handle(&event).unwrap_err();
    assert!(matches!(err, InvoiceError::InvalidInput(_)));
}

// ---------------------------------------------------------------------------
// order-confirmation
// ---------------------------------------------------------------------------

#[test]
fn confirmation_on_payment_settled() {
    let event = order_event(OrderState::ArrangingPayment, OrderState::PaymentSettled, order());
    let msg = dispatcher().handle(&event).unwrap().unwrap();
    assert_eq!(msg.event_type, "order-confirmation");
    assert_eq!(msg.subject, "Bestellbestätigung für #ORD123");
    assert_eq!(msg.from, "\"Yoga Studio\" <noreply@example.com>");
    assert_eq!(msg.bcc, ["owner@example.com"]);
    assert!(msg.attachments.is_empty());
    assert_eq!(msg.template_vars["taxIncluded"], json!("7.50"));
}

#[test]
fn no_confirmation_after_modification() {
    let event = order_event(OrderState::Modifying, OrderState::PaymentSettled, order());
    assert_eq!(dispatcher().handle(&event).unwrap(), None);
}

#[test]
fn no_confirmation_for_other_states() {
    let event = order_event(OrderState::PaymentSettled, OrderState::Shipped, order());
    assert_eq!(dispatcher().handle(&event).unwrap(), None);
}

// ---------------------------------------------------------------------------
// Account emails
// ---------------------------------------------------------------------------

#[test]
fn verification_email() {
    let user = native_user(NativeAuth {
        identifier: "jane@example.com".into(),
        verification_token: Some("verify-1".into()),
        ..Default::default()
    });
    let msg = dispatcher()
        .handle(&DomainEvent::AccountRegistration { user })
        .unwrap()
        .unwrap();
    assert_eq!(msg.event_type, "email-verification");
    assert_eq!(msg.recipient, "jane@example.com");
    assert_eq!(msg.subject, "E-Mail-Adresse bestätigen");
    assert_eq!(msg.template_vars["verificationToken"], json!("verify-1"));
    assert_eq!(
        msg.template_vars["verifyEmailAddressUrl"],
        json!("http://localhost:8080/verify")
    );
    assert!(msg.bcc.is_empty());
}

#[test]
fn no_verification_for_external_login() {
    let user = User {
        identifier: "jane@example.com".into(),
        authentication_methods: vec![AuthenticationMethod::External {
            strategy: "google".into(),
            external_identifier: "g-1".into(),
        }],
    };
    let event = DomainEvent::AccountRegistration { user };
    assert_eq!(dispatcher().handle(&event).unwrap(), None);
}

#[test]
fn no_verification_without_identifier() {
    let user = native_user(NativeAuth::default());
    let event = DomainEvent::AccountRegistration { user };
    assert_eq!(dispatcher().handle(&event).unwrap(), None);
}

#[test]
fn password_reset_email() {
    let user = native_user(NativeAuth {
        identifier: "jane@example.com".into(),
        password_reset_token: Some("reset-1".into()),
        ..Default::default()
    });
    let msg = dispatcher()
        .handle(&DomainEvent::PasswordReset { user })
        .unwrap()
        .unwrap();
    assert_eq!(msg.event_type, "password-reset");
    assert_eq!(msg.subject, "Passwort zurücksetzen");
    assert_eq!(msg.template_vars["passwordResetToken"], json!("reset-1"));
}

#[test]
fn address_change_goes_to_pending_identifier() {
    let user = native_user(NativeAuth {
        identifier: "jane@example.com".into(),
        identifier_change_token: Some("change-1".into()),
        pending_identifier: Some("jane@new.example".into()),
        ..Default::default()
    });
    let msg = dispatcher()
        .handle(&DomainEvent::IdentifierChangeRequest { user })
        .unwrap()
        .unwrap();
    assert_eq!(msg.event_type, "email-address-change");
    assert_eq!(msg.recipient, "jane@new.example");
    assert_eq!(msg.subject, "Neue E-Mail-Adresse bestätigen");
    assert_eq!(msg.template_vars["identifierChangeToken"], json!("change-1"));
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn dispatch_sends_through_transport() {
    let outbox = MemoryTransport::new();
    let d = dispatcher();
    let sent = d
        .dispatch(&payment_event(PaymentState::Authorized, "swissqrinvoice", order()), &outbox)
        .unwrap();
    assert!(sent);
    let skipped = d
        .dispatch(&payment_event(PaymentState::Authorized, "stripe", order()), &outbox)
        .unwrap();
    assert!(!skipped);
    assert_eq!(outbox.sent().len(), 1);
}

struct FailingTransport;

impl MailTransport for FailingTransport {
    fn send(&self, _message: &EmailMessage) -> Result<(), InvoiceError> {
        Err(InvoiceError::Mail("smtp unavailable".into()))
    }
}

#[test]
fn transport_errors_propagate() {
    let event = order_event(OrderState::ArrangingPayment, OrderState::PaymentSettled, order());
    let err = dispatcher().dispatch(&event, &FailingTransport).unwrap_err();
    assert!(matches!(err, InvoiceError::Mail(_)));
}

#[test]
fn dispatch_accepts_trait_objects() {
    let outbox = MemoryTransport::new();
    let transport: &dyn MailTransport = &outbox;
    let event = order_event(OrderState::ArrangingPayment, OrderState::PaymentSettled, order());
    assert!(dispatcher().dispatch(&event, transport).unwrap());
}

#[test]
fn events_from_json_dispatch() {
    let event: DomainEvent = serde_json::from_value(json!({
        "type": "payment_state_transition",
        "fromState": "Created",
        "toState": "Authorized",
        "payment": { "method": "swissqrinvoice", "amount": 10000, "state": "Authorized" },
        "order": {
            "code": "ORD9",
            "total": 9250,
            "totalWithTax": 10000,
            "shippingWithTax": 2000,
            "lines": [{ "quantity": 2, "productName": "Candle", "linePriceWithTax": 8000 }],
            "customer": { "emailAddress": "jane@example.com" }
        }
    }))
    .unwrap();
    let msg = dispatcher().handle(&event).unwrap().unwrap();
    assert_eq!(msg.subject, "Rechnung für Bestellung #ORD9");
}
