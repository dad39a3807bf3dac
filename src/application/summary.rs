use crate::domain::capability::{Section, SectionKind, Summary, ThreeState};

/// Counts resolved states and conflicts over the capability sections.
/// Operational sections are left out.
pub fn summarize(sections: &[Section]) -> Summary {
    sections
        .iter()
        .filter(|s| s.kind == SectionKind::Capability)
        .flat_map(|s| s.all_items())
        .fold(Summary::default(), |mut summary, item| {
            match item.resolved_state {
                ThreeState::Supported => summary.supported_count += 1,
                ThreeState::Unsupported => summary.unsupported_count += 1,
                ThreeState::Unknown => summary.unknown_count += 1,
            }
            if item.has_conflict {
                summary.conflict_count += 1;
            }
            summary
        })
}
