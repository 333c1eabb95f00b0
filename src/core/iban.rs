//! IBAN validation (ISO 13616) for the creditor account.
//!
//! The QR-bill only accepts Swiss and Liechtenstein accounts. An IBAN whose
//! institution identifier lies in 30000–31999 is a QR-IBAN and may only be
//! used together with a structured QR reference.

use std::fmt;

/// Error returned when an account fails IBAN validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbanError {
    /// The input value.
    pub value: String,
    /// Why the value failed validation.
    pub reason: String,
}

impl fmt::Display for IbanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid IBAN '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for IbanError {}

/// A checksum-valid IBAN in electronic format (no spaces, upper case).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iban(String);

impl Iban {
    /// Electronic format, as encoded in the QR code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-letter country prefix.
    pub fn country(&self) -> &str {
        &self.0[..2]
    }

    /// Print format: groups of four characters separated by spaces.
    pub fn formatted(&self) -> String {
        self.0
            .as_bytes()
            .chunks(4)
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// True for CH/LI QR-IBANs (institution id 30000–31999).
    pub fn is_qr_iban(&self) -> bool {
        if !matches!(self.country(), "CH" | "LI") {
            return false;
        }
        self.0[4..9]
            .parse::<u32>()
            .is_ok_and(|iid| (30000..=31999).contains(&iid))
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Expected IBAN length per country, for the countries the shop deals with.
fn expected_length(country: &str) -> Option<usize> {
    let len = match country {
        "AT" => 20,
        "BE" => 16,
        "CH" | "LI" => 21,
        "DE" => 22,
        "DK" | "FI" | "NL" => 18,
        "ES" | "SE" => 24,
        "FR" | "IT" | "MC" => 27,
        "GB" | "IE" => 22,
        "LU" => 20,
        "NO" => 15,
        "PL" => 28,
        "PT" => 25,
        _ => return None,
    };
    Some(len)
}

/// Validate an IBAN. Spaces are ignored and letters are upper-cased.
pub fn validate_iban(value: &str) -> Result<Iban, IbanError> {
    let err = |reason: &str| IbanError {
        value: value.into(),
        reason: reason.into(),
    };

    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();

    if compact.len() < 5 || compact.len() > 34 {
        return Err(err("length must be between 5 and 34 characters"));
    }
    if !compact.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(err("only letters and digits are allowed"));
    }

    let bytes = compact.as_bytes();
    if !bytes[..2].iter().all(u8::is_ascii_alphabetic) {
        return Err(err("must start with a two-letter country code"));
    }
    if !bytes[2..4].iter().all(u8::is_ascii_digit) {
        return Err(err("check digits must be numeric"));
    }
    if let Some(len) = expected_length(&compact[..2]) {
        if compact.len() != len {
            return Err(err(&format!(
                "{} IBANs have {len} characters, got {}",
                &compact[..2],
                compact.len()
            )));
        }
    }
    if mod97(&compact) != 1 {
        return Err(err("checksum mismatch"));
    }

    Ok(Iban(compact))
}

/// ISO 7064 MOD 97-10 over the rearranged IBAN (first four chars moved to the end,
/// letters expanded to 10..35).
fn mod97(compact: &str) -> u32 {
    let rearranged = compact[4..].chars().chain(compact[..4].chars());
    let mut remainder: u32 = 0;
    for c in rearranged {
        // Input is ASCII alphanumeric at this point.
        let value = c.to_digit(36).unwrap_or(0);
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }
    remainder
}
