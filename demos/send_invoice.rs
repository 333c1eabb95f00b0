use qrfaktura::core::*;
use qrfaktura::notify::*;
use qrfaktura::payment::PaymentState;

/// Prints messages instead of sending them.
struct StdoutTransport;

impl MailTransport for StdoutTransport {
    fn send(&self, message: &EmailMessage) -> Result<(), InvoiceError> {
        println!("To:      {}", message.recipient);
        println!("From:    {}", message.from);
        println!("Bcc:     {}", message.bcc.join(", "));
        println!("Subject: {}", message.subject);
        for attachment in &message.attachments {
            let size = match &attachment.content {
                AttachmentContent::Bytes(bytes) => format!("{} bytes", bytes.len()),
                AttachmentContent::Path(path) => path.display().to_string(),
            };
            println!("Attach:  {} ({size})", attachment.filename);
        }
        println!();
        Ok(())
    }
}

fn main() {
    let shop = CreditorBuilder::new("Yoga Studio", "CH14 0078 1612 4519 5200 2")
        .address("Sonnenhaldenstrasse 5", "8360", "Wallenwil", "CH")
        .tax_id("UID: CHE-154.780.687")
        .build();
    let mail = MailSettings::new("\"Yoga Studio\" <noreply@example.com>")
        .bcc("owner@example.com")
        .global_var("passwordResetUrl", "http://localhost:8080/password-reset");
    let dispatcher = NotificationDispatcher::new(InvoiceSettings::new(shop), mail);

    let order = Order {
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
    };

    let events = [
        DomainEvent::PaymentStateTransition(PaymentStateTransition {
            from_state: PaymentState::Created,
            to_state: PaymentState::Authorized,
            payment: Payment {
                method: "swissqrinvoice".into(),
                amount: order.total_with_tax,
                state: PaymentState::Authorized,
            },
            order: order.clone(),
        }),
        DomainEvent::OrderStateTransition(OrderStateTransition {
            from_state: OrderState::ArrangingPayment,
            to_state: OrderState::PaymentSettled,
            order,
        }),
    ];

    for event in &events {
        match dispatcher.dispatch(event, &StdoutTransport) {
            Ok(true) => {}
            Ok(false) => println!("{}: no email\n", event.event_type()),
            Err(e) => eprintln!("{}: {e}", event.event_type()),
        }
    }
}
