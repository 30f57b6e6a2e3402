pub mod format;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use format::{format_currency, format_date};

/// Server-assigned identifier of an investment.
///
/// The API hands ids out as JSON numbers, but nothing on the client side does
/// arithmetic with them, so they are kept as opaque text. Both numbers and
/// strings are accepted when decoding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvestmentId(String);

impl InvestmentId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvestmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InvestmentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("investment id is empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<i64> for InvestmentId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for InvestmentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for InvestmentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Unsigned(u64),
            Float(f64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Ok(Self(n.to_string())),
            RawId::Unsigned(n) => Ok(Self(n.to_string())),
            RawId::Float(n) => Ok(Self(n.to_string())),
            RawId::Text(s) => Ok(Self(s)),
        }
    }
}

/// One investment as returned by the list and detail endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: InvestmentId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "valor")]
    pub value: f64,
    #[serde(rename = "data_investimento")]
    pub date: String,
}

/// Body of a create or update request. Never carries an id: creation lets the
/// server assign one and updates address the record through the URL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "valor")]
    pub value: f64,
    #[serde(rename = "data_investimento")]
    pub date: String,
}

impl From<&Investment> for InvestmentPayload {
    fn from(inv: &Investment) -> Self {
        Self {
            name: inv.name.clone(),
            kind: inv.kind.clone(),
            value: inv.value,
            date: inv.date.clone(),
        }
    }
}

/// Error body sent by the API on failures.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Strings are surfaced verbatim; structured details (validation error
    /// lists) fall back to their compact JSON form.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
