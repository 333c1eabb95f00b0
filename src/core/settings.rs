//! Deployment settings injected into the renderer.

use std::sync::OnceLock;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::money::NumberLocale;
use super::types::Creditor;

/// Which date the invoice's date line shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Today's date at render time.
    #[default]
    PerCall,
    /// The date captured by the first render in this process, reused for
    /// every later render (the old shop's behavior).
    ProcessStart,
    /// Always this date.
    Fixed(NaiveDate),
}

static PROCESS_DATE: OnceLock<NaiveDate> = OnceLock::new();

impl DatePolicy {
    /// Resolve the date for one render.
    pub fn resolve(&self) -> NaiveDate {
        match self {
            Self::PerCall => Local::now().date_naive(),
            Self::ProcessStart => *PROCESS_DATE.get_or_init(|| Local::now().date_naive()),
            Self::Fixed(date) => *date,
        }
    }
}

/// Language of the invoice texts and payment slip labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
    Fr,
    It,
}

impl Language {
    /// Number conventions for amounts in this language.
    pub fn number_locale(self) -> NumberLocale {
        match self {
            Self::De => NumberLocale::DeCh,
            Self::En => NumberLocale::EnCh,
            Self::Fr => NumberLocale::FrCh,
            Self::It => NumberLocale::ItCh,
        }
    }
}

/// Everything about the shop that goes onto every invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSettings {
    /// The shop's payee profile.
    pub creditor: Creditor,
    #[serde(default)]
    pub language: Language,
    /// Place printed before the date. Defaults to the creditor's city.
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub date_policy: DatePolicy,
}

impl InvoiceSettings {
    pub fn new(creditor: Creditor) -> Self {
        Self {
            creditor,
            language: Language::default(),
            place: None,
            date_policy: DatePolicy::default(),
        }
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    pub fn date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    /// Place for the date line.
    pub fn place_name(&self) -> &str {
        self.place.as_deref().unwrap_or(&self.creditor.city)
    }

    /// Parse settings from JSON.
    #[cfg(feature = "notify")]
    pub fn from_json(json: &str) -> Result<Self, super::InvoiceError> {
        serde_json::from_str(json).map_err(|e| super::InvoiceError::Settings(e.to_string()))
    }
}
