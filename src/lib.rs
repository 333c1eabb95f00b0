//! # qrfaktura
//!
//! Invoice PDFs with a Swiss QR-bill payment part, generated from shop
//! orders and sent to the customer as an email attachment.
//!
//! Amounts are carried as integer minor units (Rappen / cents) and only
//! converted to [`rust_decimal::Decimal`] for display values; no floating
//! point touches money. The payment part follows the Swiss Payment
//! Standards (QR-bill, version 2.0).
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use qrfaktura::core::*;
//! use qrfaktura::render::InvoiceRenderer;
//!
//! let shop = CreditorBuilder::new("Yoga Studio", "CH14 0078 1612 4519 5200 2")
//!     .address("Sonnenhaldenstrasse 5", "8360", "Wallenwil", "CH")
//!     .tax_id("UID: CHE-154.780.687")
//!     .build();
//!
//! let input = InvoiceInputBuilder::new("ORD123", 10000)
//!     .creditor(shop.clone())
//!     .debtor(DebtorBuilder::new("Jane Doe").address("Main St 1", "8000", "Zürich", "CH").build())
//!     .add_line(LineItem::new(2, "Candle", 8000))
//!     .shipping_total(2000)
//!     .build()
//!     .unwrap();
//!
//! let renderer = InvoiceRenderer::new(InvoiceSettings::new(shop));
//! let doc = renderer.build_on(&input, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()).unwrap();
//!
//! assert_eq!(doc.filename, "ORD123.pdf");
//! assert_eq!(doc.page_count, 1);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Input types, builders, validation, IBAN, currency formatting, payment method |
//! | `render` (default) | Page layout, QR-bill payment part, PDF encoding, document sinks |
//! | `notify` | Shop event handlers, email templates, invoice attachments |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod payment;

#[cfg(feature = "render")]
pub mod render;

#[cfg(feature = "render")]
pub mod qrbill;

#[cfg(feature = "render")]
pub mod pdf;

#[cfg(feature = "notify")]
pub mod notify;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
