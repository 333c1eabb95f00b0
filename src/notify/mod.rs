//! Email notifications for shop events.
//!
//! [`NotificationDispatcher`] maps each [`DomainEvent`] to at most one
//! [`EmailMessage`] and hands it to a [`MailTransport`]. The invoice email
//! carries the rendered QR-bill invoice as `{order code}.pdf`.
//!
//! ```
//! use qrfaktura::core::*;
//! use qrfaktura::notify::*;
//!
//! let shop = CreditorBuilder::new("Yoga Studio", "CH14 0078 1612 4519 5200 2")
//!     .address("Sonnenhaldenstrasse 5", "8360", "Wallenwil", "CH")
//!     .build();
//! let dispatcher = NotificationDispatcher::new(
//!     InvoiceSettings::new(shop),
//!     MailSettings::new("\"Yoga Studio\" <noreply@example.com>"),
//! );
//!
//! let event = DomainEvent::PasswordReset {
//!     user: User {
//!         identifier: "jane@example.com".into(),
//!         authentication_methods: vec![AuthenticationMethod::Native(NativeAuth {
//!             identifier: "jane@example.com".into(),
//!             password_reset_token: Some("t0k3n".into()),
//!             ..Default::default()
//!         })],
//!     },
//! };
//!
//! let outbox = MemoryTransport::new();
//! assert!(dispatcher.dispatch(&event, &outbox).unwrap());
//! assert_eq!(outbox.sent()[0].subject, "Passwort zurücksetzen");
//! ```

mod events;
mod handlers;
mod mail;
mod template;

pub use events::*;
pub use handlers::*;
pub use mail::*;
pub use template::{lookup, render_template};
