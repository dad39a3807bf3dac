use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis of terminal capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    CardNetwork,
    PaymentMethod,
    VerificationMode,
    AcquiringMode,
    CheckoutLocation,
    AcquiringInstitution,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::CardNetwork,
        Dimension::PaymentMethod,
        Dimension::VerificationMode,
        Dimension::AcquiringMode,
        Dimension::CheckoutLocation,
        Dimension::AcquiringInstitution,
    ];

    /// Stable key used in output documents and note lookups.
    pub fn key(&self) -> &'static str {
        match self {
            Dimension::CardNetwork => "card_network",
            Dimension::PaymentMethod => "payment_method",
            Dimension::VerificationMode => "verification_mode",
            Dimension::AcquiringMode => "acquiring_mode",
            Dimension::CheckoutLocation => "checkout_location",
            Dimension::AcquiringInstitution => "acquiring_institution",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Dimension::CardNetwork => "Card networks",
            Dimension::PaymentMethod => "Payment methods",
            Dimension::VerificationMode => "Verification",
            Dimension::AcquiringMode => "Acquiring modes",
            Dimension::CheckoutLocation => "Checkout location",
            Dimension::AcquiringInstitution => "Acquiring institution",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A recognized value of a closed dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogValue {
    pub key: &'static str,
    pub label: &'static str,
    pub aliases: &'static [&'static str],
}

const fn value(
    key: &'static str,
    label: &'static str,
    aliases: &'static [&'static str],
) -> CatalogValue {
    CatalogValue {
        key,
        label,
        aliases,
    }
}

const CARD_NETWORKS: &[CatalogValue] = &[
    value("visa", "Visa", &[]),
    value("mastercard", "Mastercard", &["master", "mc"]),
    value("unionpay", "UnionPay", &["union_pay", "cup"]),
    value("amex", "American Express", &["american_express"]),
    value("jcb", "JCB", &[]),
    value("discover", "Discover", &[]),
    value("diners", "Diners Club", &["diners_club"]),
];

const PAYMENT_METHODS: &[CatalogValue] = &[
    value("contactless", "Contactless", &["tap", "nfc"]),
    value("chip", "Chip insert", &["insert", "emv"]),
    value("swipe", "Magnetic stripe", &["magstripe"]),
    value("apple_pay", "Apple Pay", &["applepay"]),
    value("google_pay", "Google Pay", &["googlepay"]),
];

const VERIFICATION_MODES: &[CatalogValue] = &[
    value("no_pin", "No PIN", &["nopin", "no_cvm"]),
    value("pin", "PIN", &[]),
    value("signature", "Signature", &[]),
];

const ACQUIRING_MODES: &[CatalogValue] = &[
    value("edc", "EDC (local currency)", &[]),
    value("dcc", "DCC (card currency)", &[]),
];

const CHECKOUT_LOCATIONS: &[CatalogValue] = &[
    value("counter", "Counter", &["cashier"]),
    value("self_checkout", "Self-checkout", &["self"]),
    value("table_service", "Table service", &["table"]),
    value("kiosk", "Kiosk", &[]),
];

/// The fixed enumeration of dimensions and their recognized values.
///
/// Closed dimensions only accept catalog keys (or their aliases). The acquiring
/// institution dimension is open: any non-empty name is a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionCatalog;

impl DimensionCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Values of a closed dimension, in display order. Empty for open dimensions.
    pub fn values(&self, dimension: Dimension) -> &'static [CatalogValue] {
        match dimension {
            Dimension::CardNetwork => CARD_NETWORKS,
            Dimension::PaymentMethod => PAYMENT_METHODS,
            Dimension::VerificationMode => VERIFICATION_MODES,
            Dimension::AcquiringMode => ACQUIRING_MODES,
            Dimension::CheckoutLocation => CHECKOUT_LOCATIONS,
            Dimension::AcquiringInstitution => &[],
        }
    }

    pub fn is_open(&self, dimension: Dimension) -> bool {
        matches!(dimension, Dimension::AcquiringInstitution)
    }

    /// Maps a raw tag to its catalog key, or `None` when the catalog does not
    /// recognize it.
    pub fn canonicalize(&self, dimension: Dimension, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if self.is_open(dimension) {
            return Some(raw.to_string());
        }
        self.values(dimension)
            .iter()
            .find(|v| {
                v.key.eq_ignore_ascii_case(raw)
                    || v.aliases.iter().any(|a| a.eq_ignore_ascii_case(raw))
            })
            .map(|v| v.key.to_string())
    }

    /// Human label for a value key; open values are their own label.
    pub fn label(&self, dimension: Dimension, key: &str) -> String {
        self.values(dimension)
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.label.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}
