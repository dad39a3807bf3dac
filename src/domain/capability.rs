use super::attempt::AttemptRecord;
use super::catalog::Dimension;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-valued verdict on a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreeState {
    Supported,
    Unsupported,
    #[default]
    Unknown,
}

impl ThreeState {
    pub fn is_known(&self) -> bool {
        !matches!(self, ThreeState::Unknown)
    }
}

impl fmt::Display for ThreeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreeState::Supported => write!(f, "supported"),
            ThreeState::Unsupported => write!(f, "unsupported"),
            ThreeState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Identifies one value of one dimension.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapabilityKey {
    pub dimension: Dimension,
    pub value: String,
}

impl CapabilityKey {
    pub fn new(dimension: Dimension, value: impl Into<String>) -> Self {
        Self {
            dimension,
            value: value.into(),
        }
    }
}

/// Attempts speaking for and against one capability value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvidenceBucket<'a> {
    pub supporting: Vec<&'a AttemptRecord>,
    pub refuting: Vec<&'a AttemptRecord>,
}

impl EvidenceBucket<'_> {
    pub fn is_empty(&self) -> bool {
        self.supporting.is_empty() && self.refuting.is_empty()
    }
}

/// Final verdict for one dimension value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCapabilityItem {
    pub dimension_key: Dimension,
    pub value_key: String,
    pub label: String,
    pub manual_state: ThreeState,
    pub inferred_state: ThreeState,
    pub resolved_state: ThreeState,
    pub has_conflict: bool,
    pub supporting_count: usize,
    pub refuting_count: usize,
    pub evidence_note: Option<String>,
    pub manual_note: Option<String>,
}

/// Whether a section holds capability data or operational details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Capability,
    Operational,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub key: String,
    pub title: String,
    pub kind: SectionKind,
    pub items: Vec<ResolvedCapabilityItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Section>,
}

impl Section {
    /// Items of this section and of all of its sub-groups, depth first.
    pub fn all_items(&self) -> Box<dyn Iterator<Item = &ResolvedCapabilityItem> + '_> {
        Box::new(
            self.items
                .iter()
                .chain(self.groups.iter().flat_map(|g| g.all_items())),
        )
    }
}

/// Tallies over the capability sections of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub supported_count: usize,
    pub unsupported_count: usize,
    pub unknown_count: usize,
    pub conflict_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityMatrix {
    pub sections: Vec<Section>,
    pub summary: Summary,
}

impl CapabilityMatrix {
    pub fn items(&self) -> impl Iterator<Item = &ResolvedCapabilityItem> {
        self.sections.iter().flat_map(|s| s.all_items())
    }

    pub fn item(&self, dimension: Dimension, value: &str) -> Option<&ResolvedCapabilityItem> {
        self.items()
            .find(|i| i.dimension_key == dimension && i.value_key == value)
    }
}
