//! Payment record types and their normalization.
//!
//! Field names follow the Swiss Implementation Guidelines for the QR-bill. Validation is lenient:
//! values that violate a field constraint are truncated or filtered, never rejected.
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Unambiguous indicator for the Swiss QR Code ("Swiss Payments Code").
pub const QR_TYPE: &str = "SPC";

/// Version 2.0 of the Implementation Guidelines.
pub const VERSION: &str = "0200";

/// UTF-8 restricted to the Latin character set.
pub const CODING_TYPE: &str = "1";

/// End Payment Data.
pub const TRAILER: &str = "EPD";

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").expect("valid regex"));

// Permitted characters of the unstructured message, as declared by the SIX reference standard.
static UNSTRUCTURED_CHAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"[a-zA-Z0-9.,;:'+\-/()?*\[\]{}\\`´~ ]",
        r##"|[!"#%&<>÷=@_$£]"##,
        r"|[àáâäçèéêëìíîïñòóôöùúûüýßÀÁÂÄÇÈÉÊËÌÍÎÏÒÓÔÖÙÚÛÜÑ]",
    ))
    .expect("valid regex")
});

/// Corresponds to `AdrTp` in ISO 20022.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressType {
    /// Street and building number in separate fields.
    #[serde(rename = "S")]
    Structured,
    /// Free form address lines.
    #[serde(rename = "K")]
    Combined,
}

impl AddressType {
    pub fn code(self) -> &'static str {
        match self {
            AddressType::Structured => "S",
            AddressType::Combined => "K",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// `None` leaves the address type line empty.
    pub address_type: Option<AddressType>,
    /// First name and last name, or company name. Max. 70 characters.
    pub name: String,
    /// Street, or first address line. Max. 70 characters.
    pub address_line1: String,
    /// Building number, or second address line. Max. 16 characters.
    pub address_line2: String,
    /// Postal code without country prefix.
    pub postal_code: String,
    /// Town. Max. 35 characters.
    pub town: String,
    /// Two letter ISO 3166-1 country code.
    pub country: String,
}

impl Address {
    pub fn validate(&self) -> Address {
        Address {
            address_type: self.address_type,
            name: truncate(&self.name, 70),
            address_line1: truncate(&self.address_line1, 70),
            address_line2: truncate(&self.address_line2, 16),
            postal_code: self.postal_code.clone(),
            town: truncate(&self.town, 35),
            country: self.country.clone(),
        }
    }

    /// The seven payload lines of this address, in canonical order.
    pub(crate) fn fields(&self) -> [&str; 7] {
        [
            self.address_type.map(AddressType::code).unwrap_or(""),
            self.name.as_str(),
            self.address_line1.as_str(),
            self.address_line2.as_str(),
            self.postal_code.as_str(),
            self.town.as_str(),
            self.country.as_str(),
        ]
    }
}

/// Fixed header values. Whatever the caller puts here is overwritten by validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub qr_type: String,
    pub version: String,
    pub coding_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditorInfo {
    pub iban: String,
    pub creditor: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountInfo {
    /// Decimal amount, empty when the debtor fills it in.
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemittanceInfo {
    /// Reference type, e.g. `NON`.
    pub reference_type: String,
    pub reference: String,
    pub unstructured_message: String,
    pub trailer: String,
}

/// A complete QR-bill payment record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentRecord {
    pub header: Header,
    /// Account / payable to.
    pub creditor_info: CreditorInfo,
    /// Reserved for future use, always emitted blank.
    pub ultimate_creditor: Address,
    pub amount_info: AmountInfo,
    /// Payable by.
    pub ultimate_debtor: Address,
    pub remittance_info: RemittanceInfo,
}

impl PaymentRecord {
    /// Returns a normalized copy of the record with every field constraint enforced.
    ///
    /// Never fails and never touches `self`. Applying it twice gives the same result as applying
    /// it once.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qrbill::model::PaymentRecord;
    ///
    /// let mut record = PaymentRecord::default();
    /// record.creditor_info.iban = "CH02 0900 0008 7091 3543".to_string();
    /// record.amount_info.amount = "50".to_string();
    ///
    /// let validated = record.validate();
    /// assert_eq!(validated.creditor_info.iban, "CH0209000000870913543");
    /// assert_eq!(validated.amount_info.amount, "50.00");
    /// assert_eq!(validated.header.qr_type, "SPC");
    /// ```
    pub fn validate(&self) -> PaymentRecord {
        let remittance = &self.remittance_info;

        PaymentRecord {
            header: Header {
                qr_type: QR_TYPE.to_string(),
                version: VERSION.to_string(),
                coding_type: CODING_TYPE.to_string(),
            },
            creditor_info: CreditorInfo {
                iban: strip_non_alphanumeric(&self.creditor_info.iban),
                creditor: self.creditor_info.creditor.validate(),
            },
            ultimate_creditor: Address::default(),
            amount_info: AmountInfo {
                amount: normalize_amount(&self.amount_info.amount),
                currency: self.amount_info.currency.clone(),
            },
            ultimate_debtor: self.ultimate_debtor.validate(),
            remittance_info: RemittanceInfo {
                reference_type: truncate(&strip_non_alphanumeric(&remittance.reference_type), 4),
                reference: truncate(&strip_non_alphanumeric(&remittance.reference), 27),
                unstructured_message: truncate(
                    &filter_unstructured(&remittance.unstructured_message),
                    140,
                ),
                trailer: TRAILER.to_string(),
            },
        }
    }
}

/// Keeps the first `max` characters of `s`.
fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn strip_non_alphanumeric(s: &str) -> String {
    NON_ALPHANUMERIC.replace_all(s, "").into_owned()
}

/// Drops every character outside the permitted set, keeping the rest in order.
fn filter_unstructured(s: &str) -> String {
    UNSTRUCTURED_CHAR.find_iter(s).map(|m| m.as_str()).collect()
}

/// Formats `amount` with exactly two fraction digits.
///
/// Empty stays empty and anything that does not parse as a decimal number becomes `0.00`.
fn normalize_amount(amount: &str) -> String {
    if amount.is_empty() {
        return String::new();
    }

    // ".30" is a valid amount, but not a valid Decimal literal.
    let literal = match amount.strip_prefix('.') {
        Some(fraction) => format!("0.{fraction}"),
        None => amount.to_string(),
    };

    let value = match Decimal::from_str(&literal) {
        Ok(value) => value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        Err(_) => Decimal::ZERO,
    };
    // rescale(2) silently keeps scale 0 above 28 integer digits, the formatter always pads.
    format!("{value:.2}")
}
