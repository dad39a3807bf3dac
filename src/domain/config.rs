use super::catalog::Dimension;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Currency symbol used in notes when the document does not name one.
pub const DEFAULT_CURRENCY: &str = "¥";

/// A terminal's declared capabilities, as stored by the Record Store.
///
/// Each dimension has its own encoding: boolean flags for payment and
/// acquiring modes, a supported list plus `unsupported` / `uncertain` lists for
/// card networks and verification modes, and exact-value fields for checkout
/// location and acquiring institution. [`ManualConfiguration::declaration`]
/// gives a uniform view.
///
/// Documents written before the nested groups existed used flat keys
/// (`supportedCardNetworks`, `supportsContactless`, `supportsDcc`, ...); those
/// are still read, and a nested entry wins over its flat counterpart.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Default)]
#[serde(rename_all = "camelCase", from = "ConfigDocument")]
pub struct ManualConfiguration {
    pub card_networks: ListDeclaration,
    pub payment_methods: PaymentMethodFlags,
    pub verification_modes: Option<VerificationModes>,
    pub acquiring_modes: AcquiringModeFlags,
    pub checkout_location: Option<String>,
    pub acquiring_institution: Option<String>,

    /// Free-text remarks keyed by `"<dimension>.<value>"`.
    pub notes: BTreeMap<String, String>,
}

/// A supported list with independent unsupported and uncertain lists.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Default)]
#[serde(default)]
pub struct ListDeclaration {
    pub supported: Vec<String>,
    pub unsupported: Vec<String>,
    pub uncertain: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentMethodFlags {
    pub contactless: Option<bool>,
    pub chip: Option<bool>,
    pub swipe: Option<bool>,
    #[serde(alias = "apple_pay")]
    pub apple_pay: Option<bool>,
    #[serde(alias = "google_pay")]
    pub google_pay: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[serde(default)]
pub struct AcquiringModeFlags {
    pub edc: Option<bool>,
    pub dcc: Option<bool>,
}

/// Declared verification modes together with their amount thresholds.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationModes {
    pub supported: Vec<String>,
    pub unsupported: Vec<String>,
    pub uncertain: Vec<String>,
    /// Largest amount accepted without a PIN.
    pub no_pin_limit: Option<Decimal>,
    /// Amount above which a signature is requested.
    pub signature_threshold: Option<Decimal>,
    pub currency: Option<String>,
}

impl VerificationModes {
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }
}

/// Wire shape of the configuration document: the nested groups plus the flat
/// legacy keys they replaced.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ConfigDocument {
    card_networks: Option<ListDeclaration>,
    payment_methods: PaymentMethodFlags,
    verification_modes: Option<VerificationModes>,
    acquiring_modes: AcquiringModeFlags,
    checkout_location: Option<String>,
    #[serde(alias = "acquirer")]
    acquiring_institution: Option<String>,
    notes: BTreeMap<String, String>,

    supported_card_networks: Vec<String>,
    unsupported_card_networks: Vec<String>,
    uncertain_card_networks: Vec<String>,
    supports_contactless: Option<bool>,
    supports_chip: Option<bool>,
    supports_swipe: Option<bool>,
    supports_apple_pay: Option<bool>,
    supports_google_pay: Option<bool>,
    supports_edc: Option<bool>,
    supports_dcc: Option<bool>,

    #[serde(flatten)]
    unrecognized: BTreeMap<String, serde_json::Value>,
}

impl From<ConfigDocument> for ManualConfiguration {
    fn from(doc: ConfigDocument) -> Self {
        for key in doc.unrecognized.keys() {
            warn!(key = key.as_str(), "Ignoring unrecognized configuration key");
        }
        let card_networks = doc.card_networks.unwrap_or(ListDeclaration {
            supported: doc.supported_card_networks,
            unsupported: doc.unsupported_card_networks,
            uncertain: doc.uncertain_card_networks,
        });
        let methods = doc.payment_methods;
        let modes = doc.acquiring_modes;
        Self {
            card_networks,
            payment_methods: PaymentMethodFlags {
                contactless: methods.contactless.or(doc.supports_contactless),
                chip: methods.chip.or(doc.supports_chip),
                swipe: methods.swipe.or(doc.supports_swipe),
                apple_pay: methods.apple_pay.or(doc.supports_apple_pay),
                google_pay: methods.google_pay.or(doc.supports_google_pay),
            },
            verification_modes: doc.verification_modes,
            acquiring_modes: AcquiringModeFlags {
                edc: modes.edc.or(doc.supports_edc),
                dcc: modes.dcc.or(doc.supports_dcc),
            },
            checkout_location: doc.checkout_location,
            acquiring_institution: doc.acquiring_institution,
            notes: doc.notes,
        }
    }
}

/// How the document speaks about one dimension value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration<'a> {
    /// A yes/no flag; `None` when the flag is absent.
    Flag(Option<bool>),
    /// A supported list with independent unsupported and uncertain lists.
    Listed {
        supported: &'a [String],
        unsupported: &'a [String],
        uncertain: &'a [String],
    },
    /// A single declared value for a single-select dimension.
    Exact(Option<&'a str>),
}

const NO_ENTRIES: &[String] = &[];

impl ManualConfiguration {
    /// The raw declaration covering `value` of `dimension`.
    ///
    /// Flag dimensions return the flag for that particular value; list and
    /// exact dimensions return the whole dimension entry, which the caller
    /// matches against the value.
    pub fn declaration(&self, dimension: Dimension, value: &str) -> Declaration<'_> {
        match dimension {
            Dimension::CardNetwork => Declaration::Listed {
                supported: &self.card_networks.supported,
                unsupported: &self.card_networks.unsupported,
                uncertain: &self.card_networks.uncertain,
            },
            Dimension::PaymentMethod => Declaration::Flag(match value {
                "contactless" => self.payment_methods.contactless,
                "chip" => self.payment_methods.chip,
                "swipe" => self.payment_methods.swipe,
                "apple_pay" => self.payment_methods.apple_pay,
                "google_pay" => self.payment_methods.google_pay,
                _ => None,
            }),
            Dimension::VerificationMode => match &self.verification_modes {
                Some(modes) => Declaration::Listed {
                    supported: &modes.supported,
                    unsupported: &modes.unsupported,
                    uncertain: &modes.uncertain,
                },
                None => Declaration::Listed {
                    supported: NO_ENTRIES,
                    unsupported: NO_ENTRIES,
                    uncertain: NO_ENTRIES,
                },
            },
            Dimension::AcquiringMode => Declaration::Flag(match value {
                "edc" => self.acquiring_modes.edc,
                "dcc" => self.acquiring_modes.dcc,
                _ => None,
            }),
            Dimension::CheckoutLocation | Dimension::AcquiringInstitution => {
                Declaration::Exact(self.declared_value(dimension))
            }
        }
    }

    /// The single value declared for an exact-value dimension. Always `None`
    /// for flag and list dimensions.
    pub fn declared_value(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::CheckoutLocation => self.checkout_location.as_deref(),
            Dimension::AcquiringInstitution => self.acquiring_institution.as_deref(),
            _ => None,
        }
    }

    /// Free-text remark attached to a dimension value.
    pub fn note(&self, dimension: Dimension, value: &str) -> Option<&str> {
        self.notes
            .get(&format!("{}.{}", dimension.key(), value))
            .map(String::as_str)
    }
}
