use super::evidence::{self, EvidenceMap};
use super::{fusion, inference, manual, summary};
use crate::domain::attempt::AttemptRecord;
use crate::domain::capability::{
    CapabilityKey, CapabilityMatrix, EvidenceBucket, ResolvedCapabilityItem, Section, SectionKind,
};
use crate::domain::catalog::{Dimension, DimensionCatalog};
use crate::domain::config::ManualConfiguration;
use std::collections::BTreeSet;
use tracing::debug;

/// Dimensions rendered as capability sections, in display order.
pub const CAPABILITY_DIMENSIONS: [Dimension; 4] = [
    Dimension::CardNetwork,
    Dimension::PaymentMethod,
    Dimension::VerificationMode,
    Dimension::AcquiringMode,
];

pub const DEVICE_SECTION_KEY: &str = "device";
pub const DEVICE_SECTION_TITLE: &str = "Device & acquiring";

/// Reconciles a terminal's attempts with its declared configuration.
///
/// Pure and infallible: the same inputs always give the same matrix, whatever
/// order the attempts come in.
pub fn reconcile(
    attempts: &[AttemptRecord],
    config: &ManualConfiguration,
    catalog: &DimensionCatalog,
) -> CapabilityMatrix {
    let evidence = evidence::aggregate(attempts, catalog);
    debug!(
        attempts = attempts.len(),
        buckets = evidence.len(),
        "Aggregated attempt evidence"
    );

    let section = |dimension: Dimension, kind: SectionKind| Section {
        key: dimension.key().to_string(),
        title: dimension.title().to_string(),
        kind,
        items: resolve_dimension(dimension, &evidence, config, catalog),
        groups: Vec::new(),
    };

    let mut sections: Vec<Section> = CAPABILITY_DIMENSIONS
        .into_iter()
        .map(|d| section(d, SectionKind::Capability))
        .collect();
    sections.push(Section {
        key: DEVICE_SECTION_KEY.to_string(),
        title: DEVICE_SECTION_TITLE.to_string(),
        kind: SectionKind::Operational,
        items: Vec::new(),
        groups: vec![
            section(Dimension::CheckoutLocation, SectionKind::Operational),
            section(Dimension::AcquiringInstitution, SectionKind::Operational),
        ],
    });

    let summary = summary::summarize(&sections);
    CapabilityMatrix { sections, summary }
}

/// Resolves every candidate value of one dimension.
pub fn resolve_dimension(
    dimension: Dimension,
    evidence: &EvidenceMap<'_>,
    config: &ManualConfiguration,
    catalog: &DimensionCatalog,
) -> Vec<ResolvedCapabilityItem> {
    let empty = EvidenceBucket::default();
    candidate_values(dimension, evidence, config, catalog)
        .into_iter()
        .map(|value| {
            let key = CapabilityKey::new(dimension, value);
            let bucket = evidence.get(&key).unwrap_or(&empty);
            resolve_item(&key, bucket, config, catalog)
        })
        .collect()
}

/// Values shown for a dimension.
///
/// Closed dimensions list their whole catalog. Open dimensions only list the
/// declared value and the values seen in evidence.
pub fn candidate_values(
    dimension: Dimension,
    evidence: &EvidenceMap<'_>,
    config: &ManualConfiguration,
    catalog: &DimensionCatalog,
) -> Vec<String> {
    if !catalog.is_open(dimension) {
        return catalog
            .values(dimension)
            .iter()
            .map(|v| v.key.to_string())
            .collect();
    }

    let mut values = BTreeSet::new();
    if let Some(declared) = config.declared_value(dimension)
        && let Some(value) = catalog.canonicalize(dimension, declared)
    {
        values.insert(value);
    }
    values.extend(
        evidence
            .keys()
            .filter(|k| k.dimension == dimension)
            .map(|k| k.value.clone()),
    );
    values.into_iter().collect()
}

/// Runs the manual, inference and fusion stages for one value.
pub fn resolve_item(
    key: &CapabilityKey,
    bucket: &EvidenceBucket<'_>,
    config: &ManualConfiguration,
    catalog: &DimensionCatalog,
) -> ResolvedCapabilityItem {
    let manual_state = manual::normalize(config, catalog, key.dimension, &key.value);
    let inferred = inference::infer(bucket);
    let resolution = fusion::fuse(manual_state, inferred);

    ResolvedCapabilityItem {
        dimension_key: key.dimension,
        value_key: key.value.clone(),
        label: catalog.label(key.dimension, &key.value),
        manual_state,
        inferred_state: inferred.state,
        resolved_state: resolution.state,
        has_conflict: resolution.has_conflict,
        supporting_count: bucket.supporting.len(),
        refuting_count: bucket.refuting.len(),
        evidence_note: evidence::describe(bucket),
        manual_note: manual::manual_note(config, catalog, key.dimension, &key.value),
    }
}
