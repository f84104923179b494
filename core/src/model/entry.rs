use serde::{Deserialize, Serialize};
use chrono::NaiveTime;

use crate::error::ValidationError;
use crate::input::{parse_quantity, parse_unit_price};
use crate::time::parse_entry_time;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(from = "String", into = "String")]
pub enum SaleStatus {
    Closing,
    FollowUp,
    Nego,
    #[default]
    Prospek,
    Other,
}

impl SaleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SaleStatus::Closing => "Closing",
            SaleStatus::FollowUp => "Follow Up",
            SaleStatus::Nego => "Nego",
            SaleStatus::Prospek => "Prospek",
            SaleStatus::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SaleStatus::Closing => "✅",
            SaleStatus::FollowUp => "🔄",
            SaleStatus::Nego => "💬",
            _ => "❓",
        }
    }

    /// Lenient parse for user input. Unknown text is `Other`.
    pub fn parse(input: &str) -> SaleStatus {
        let normalized: String = input
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect();

        match normalized.as_str() {
            "closing" | "closed" | "close" => SaleStatus::Closing,
            "followup" | "fu" => SaleStatus::FollowUp,
            "nego" | "negotiation" => SaleStatus::Nego,
            "prospek" | "prospect" => SaleStatus::Prospek,
            _ => SaleStatus::Other,
        }
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for SaleStatus {
    fn from(value: String) -> Self {
        SaleStatus::parse(&value)
    }
}

impl From<SaleStatus> for String {
    fn from(value: SaleStatus) -> Self {
        value.label().to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SaleEntry {
    pub sequence_number: u32,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub customer_name: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub status: SaleStatus,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub proof_reference: Option<String>,
}

impl SaleEntry {
    pub fn new(sequence_number: u32, entry: NewEntry) -> Self {
        Self {
            sequence_number,
            time: entry.time,
            customer_name: entry.customer_name,
            product_name: entry.product_name,
            quantity: entry.quantity,
            unit_price: entry.unit_price,
            status: entry.status,
            note: entry.note,
            proof_reference: entry.proof_reference,
        }
    }

    /// Always derived from quantity and unit price so edits can't leave a stale total.
    pub fn total(&self) -> f64 {
        let price = if self.unit_price.is_finite() { self.unit_price } else { 0.0 };
        self.quantity as f64 * price
    }

    pub fn is_closing(&self) -> bool {
        self.status == SaleStatus::Closing
    }
}

/// A validated entry waiting for its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub time: NaiveTime,
    pub customer_name: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub status: SaleStatus,
    pub note: String,
    pub proof_reference: Option<String>,
}

/// Raw "add entry" form input, all text.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub time: String,
    pub customer_name: String,
    pub product_name: String,
    pub quantity: String,
    pub unit_price: String,
    pub status: String,
    pub note: String,
    pub proof_reference: String,
}

impl EntryDraft {
    /// Blank time falls back to `default_time`. Nothing partial is returned on error.
    pub fn validate(self, default_time: NaiveTime) -> Result<NewEntry, ValidationError> {
        let customer_name = self.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(ValidationError::MissingCustomer);
        }
        let product_name = self.product_name.trim().to_string();
        if product_name.is_empty() {
            return Err(ValidationError::MissingProduct);
        }

        let quantity = parse_quantity(&self.quantity)?;
        let unit_price = parse_unit_price(&self.unit_price)?;
        if !(quantity as f64 * unit_price).is_finite() {
            return Err(ValidationError::InvalidUnitPrice(self.unit_price.clone()));
        }

        let time = if self.time.trim().is_empty() {
            default_time
        } else {
            parse_entry_time(&self.time)?
        };

        let status = if self.status.trim().is_empty() {
            SaleStatus::default()
        } else {
            SaleStatus::parse(&self.status)
        };

        let proof = self.proof_reference.trim();

        Ok(NewEntry {
            time,
            customer_name,
            product_name,
            quantity,
            unit_price,
            status,
            note: self.note.trim().to_string(),
            proof_reference: if proof.is_empty() { None } else { Some(proof.to_string()) },
        })
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
