use super::catalog::Dimension;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Result of a single field test at a terminal.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One crowdsourced observation of a terminal.
///
/// Every dimension tag is optional: an attempt only speaks for the dimensions it
/// names. Records are immutable snapshots handed over by the Record Store.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Default)]
pub struct AttemptRecord {
    #[serde(default, deserialize_with = "deserialize_outcome")]
    pub outcome: Outcome,
    /// Only meaningful for failures: the author asserts the failure proves
    /// the capability is missing.
    #[serde(
        rename = "conclusive",
        default,
        deserialize_with = "deserialize_flag"
    )]
    pub is_conclusive_failure: bool,
    #[serde(default)]
    pub card_network: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub verification_mode: Option<String>,
    #[serde(default)]
    pub acquiring_mode: Option<String>,
    #[serde(default)]
    pub checkout_location: Option<String>,
    #[serde(default)]
    pub acquiring_institution: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Number(i64),
    Text(String),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let flag = match Option::<FlagRepr>::deserialize(deserializer)? {
        None => false,
        Some(FlagRepr::Bool(b)) => b,
        Some(FlagRepr::Number(n)) => n != 0,
        Some(FlagRepr::Text(text)) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
    };
    Ok(flag)
}

fn deserialize_outcome<'de, D>(deserializer: D) -> Result<Outcome, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    let outcome = match raw.trim().to_ascii_lowercase().as_str() {
        "success" => Outcome::Success,
        "failure" => Outcome::Failure,
        _ => Outcome::Unknown,
    };
    Ok(outcome)
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Parses an RFC 3339 timestamp. Unparseable input is treated as absent.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

impl AttemptRecord {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            ..Self::default()
        }
    }

    pub fn success() -> Self {
        Self::new(Outcome::Success)
    }

    pub fn failure(conclusive: bool) -> Self {
        Self {
            is_conclusive_failure: conclusive,
            ..Self::new(Outcome::Failure)
        }
    }

    pub fn with_tag(mut self, dimension: Dimension, value: impl Into<String>) -> Self {
        *self.tag_slot(dimension) = Some(value.into());
        self
    }

    pub fn by(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    pub fn occurred(mut self, at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(at);
        self
    }

    pub fn recorded(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(at);
        self
    }

    fn tag_slot(&mut self, dimension: Dimension) -> &mut Option<String> {
        match dimension {
            Dimension::CardNetwork => &mut self.card_network,
            Dimension::PaymentMethod => &mut self.payment_method,
            Dimension::VerificationMode => &mut self.verification_mode,
            Dimension::AcquiringMode => &mut self.acquiring_mode,
            Dimension::CheckoutLocation => &mut self.checkout_location,
            Dimension::AcquiringInstitution => &mut self.acquiring_institution,
        }
    }

    /// The raw tag this attempt carries for a dimension, if any.
    pub fn tag(&self, dimension: Dimension) -> Option<&str> {
        let slot = match dimension {
            Dimension::CardNetwork => &self.card_network,
            Dimension::PaymentMethod => &self.payment_method,
            Dimension::VerificationMode => &self.verification_mode,
            Dimension::AcquiringMode => &self.acquiring_mode,
            Dimension::CheckoutLocation => &self.checkout_location,
            Dimension::AcquiringInstitution => &self.acquiring_institution,
        };
        slot.as_deref()
    }

    pub fn tags(&self) -> impl Iterator<Item = (Dimension, &str)> {
        Dimension::ALL
            .into_iter()
            .filter_map(move |d| self.tag(d).map(|v| (d, v)))
    }

    /// When the attempt happened: `occurred_at`, falling back to `recorded_at`.
    pub fn effective_time(&self) -> Option<DateTime<Utc>> {
        self.occurred_at.or(self.recorded_at)
    }
}
