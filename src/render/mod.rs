//! Invoice page layout and delivery.
//!
//! [`InvoiceRenderer`] lays out one A4 invoice per order: creditor and
//! debtor address blocks, the title and date line, the item table and the
//! QR-bill payment part on the last page. The finished layout is encoded
//! by [`crate::pdf`] and handed to a [`DocumentSink`].

pub mod fonts;
mod invoice;
pub mod labels;
pub mod layout;
pub mod sink;
pub mod table;

pub use invoice::InvoiceRenderer;
pub use labels::{InvoiceLabels, SlipLabels};
pub use layout::{DocumentLayout, Page, mm};
pub use sink::{DocumentSink, FileSink, MemorySink, PartFile, deliver};
pub use table::{ItemTable, RowKind, TableRow};
