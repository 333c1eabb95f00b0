use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::core::InvoiceError;

/// Global template variable holding the default sender.
pub const FROM_ADDRESS_VAR: &str = "fromAddress";

/// Body of an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentContent {
    Bytes(Vec<u8>),
    /// A file the transport reads when sending.
    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: AttachmentContent,
}

/// A fully resolved email, ready for a [`MailTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    /// Handler name, e.g. `"send-invoice"`. Also selects the body template.
    pub event_type: &'static str,
    pub recipient: String,
    pub from: String,
    pub bcc: Vec<String>,
    pub subject: String,
    pub attachments: Vec<Attachment>,
    /// Variables for the body template.
    pub template_vars: serde_json::Value,
}

/// Delivers email messages. Implementations own retries and queueing.
pub trait MailTransport: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<(), InvoiceError>;
}

/// Keeps every message in memory. Useful for development and tests.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<EmailMessage>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<EmailMessage> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl MailTransport for MemoryTransport {
    fn send(&self, message: &EmailMessage) -> Result<(), InvoiceError> {
        self.sent
            .lock()
            .map_err(|_| InvoiceError::Mail("outbox lock poisoned".into()))?
            .push(message.clone());
        Ok(())
    }
}

/// Where invoice PDFs are kept before they are attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum InvoiceStorage {
    /// Attach the bytes directly.
    #[default]
    Memory,
    /// Write `{dir}/{code}.pdf` and attach the file by path.
    Directory(PathBuf),
}

/// Sender addresses, recipients in copy and template globals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailSettings {
    /// Available to every template; `fromAddress` is the default sender.
    #[serde(default)]
    pub global_vars: BTreeMap<String, String>,
    /// Sender for invoices. Falls back to `fromAddress`.
    #[serde(default)]
    pub invoice_from: Option<String>,
    /// Copy recipients for order emails (invoice and confirmation).
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub invoice_storage: InvoiceStorage,
}

impl MailSettings {
    pub fn new(from_address: impl Into<String>) -> Self {
        let mut settings = Self::default();
        settings
            .global_vars
            .insert(FROM_ADDRESS_VAR.to_string(), from_address.into());
        settings
    }

    pub fn invoice_from(mut self, from: impl Into<String>) -> Self {
        self.invoice_from = Some(from.into());
        self
    }

    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    pub fn global_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.global_vars.insert(name.into(), value.into());
        self
    }

    pub fn invoice_storage(mut self, storage: InvoiceStorage) -> Self {
        self.invoice_storage = storage;
        self
    }

    /// The default sender, empty if unset.
    pub fn from_address(&self) -> &str {
        self.global_vars
            .get(FROM_ADDRESS_VAR)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Parse settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, InvoiceError> {
        serde_json::from_str(json).map_err(|e| InvoiceError::Settings(e.to_string()))
    }
}
