//! Formatting of minor-unit amounts.
//!
//! All arithmetic is integer division by 100, so every amount prints exactly.
//! Every currency is assumed to have two fraction digits; zero- or
//! three-digit currencies (JPY, BHD) would print wrong.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Swiss number-format conventions, matching what browsers produce for
/// `Intl.NumberFormat(locale, { style: "currency" })`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NumberLocale {
    /// `CHF 1’500.00`
    #[default]
    DeCh,
    /// `1 500.00 CHF` (narrow no-break space grouping)
    FrCh,
    /// `CHF 1500.00`, grouping only from five integer digits
    ItCh,
    /// `CHF 1’500.00`
    EnCh,
}

const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';
const APOSTROPHE: char = '\u{2019}';

impl NumberLocale {
    fn group_separator(self) -> char {
        match self {
            Self::FrCh => NARROW_NBSP,
            _ => APOSTROPHE,
        }
    }

    fn min_grouping_digits(self) -> usize {
        match self {
            Self::ItCh => 5,
            _ => 4,
        }
    }

    fn symbol(self, currency: &str) -> &str {
        match (self, currency) {
            (Self::DeCh, _) => currency,
            (_, "EUR") => "€",
            _ => currency,
        }
    }

    fn symbol_after(self) -> bool {
        matches!(self, Self::FrCh)
    }
}

/// Split a minor amount into sign, whole units and cents.
fn split(amount_minor: i64) -> (bool, u64, u64) {
    let negative = amount_minor < 0;
    let abs = amount_minor.unsigned_abs();
    (negative, abs / 100, abs % 100)
}

fn group(whole: u64, separator: char, min_digits: usize) -> String {
    let digits = whole.to_string();
    if digits.len() < min_digits {
        return digits;
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Format an amount as a localized currency string with two fraction digits.
///
/// ```
/// use qrfaktura::core::{NumberLocale, format_minor};
///
/// assert_eq!(format_minor(150000, "CHF", NumberLocale::DeCh), "CHF\u{a0}1\u{2019}500.00");
/// ```
pub fn format_minor(amount_minor: i64, currency: &str, locale: NumberLocale) -> String {
    let (negative, whole, cents) = split(amount_minor);
    let sign = if negative { "-" } else { "" };
    let number = format!(
        "{sign}{}.{cents:02}",
        group(whole, locale.group_separator(), locale.min_grouping_digits())
    );
    let symbol = locale.symbol(currency);
    if locale.symbol_after() {
        format!("{number}{NBSP}{symbol}")
    } else {
        format!("{symbol}{NBSP}{number}")
    }
}

/// Amount as printed on the payment slip: space grouping, two decimals (`1 500.00`).
pub fn format_slip_amount(amount_minor: i64) -> String {
    let (negative, whole, cents) = split(amount_minor);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{}.{cents:02}", group(whole, ' ', 4))
}

/// Amount as encoded in the QR code: no grouping, two decimals (`1500.00`).
pub fn format_payload_amount(amount_minor: i64) -> String {
    let (negative, whole, cents) = split(amount_minor);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{whole}.{cents:02}")
}

/// Minor units as a decimal amount (`1999` → `19.99`).
pub fn minor_to_decimal(amount_minor: i64) -> Decimal {
    Decimal::new(amount_minor, 2)
}
