use crate::domain::capability::{CapabilityMatrix, ResolvedCapabilityItem, Section, ThreeState};
use crate::domain::catalog::Dimension;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct MatrixRow<'a> {
    section: &'a str,
    dimension: Dimension,
    value: &'a str,
    label: &'a str,
    manual: ThreeState,
    inferred: ThreeState,
    resolved: ThreeState,
    conflict: bool,
    supporting: usize,
    refuting: usize,
    evidence_note: Option<&'a str>,
    manual_note: Option<&'a str>,
}

impl<'a> MatrixRow<'a> {
    fn new(section: &'a str, item: &'a ResolvedCapabilityItem) -> Self {
        Self {
            section,
            dimension: item.dimension_key,
            value: &item.value_key,
            label: &item.label,
            manual: item.manual_state,
            inferred: item.inferred_state,
            resolved: item.resolved_state,
            conflict: item.has_conflict,
            supporting: item.supporting_count,
            refuting: item.refuting_count,
            evidence_note: item.evidence_note.as_deref(),
            manual_note: item.manual_note.as_deref(),
        }
    }
}

/// Writes a capability matrix as CSV, one row per resolved item.
///
/// Sub-group items are labelled with their top-level section key.
pub struct MatrixWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> MatrixWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_matrix(&mut self, matrix: &CapabilityMatrix) -> Result<()> {
        for section in &matrix.sections {
            self.write_section(&section.key, section)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_section(&mut self, top_key: &str, section: &Section) -> Result<()> {
        for item in section.all_items() {
            self.writer.serialize(MatrixRow::new(top_key, item))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::matrix::reconcile;
    use crate::domain::attempt::AttemptRecord;
    use crate::domain::catalog::DimensionCatalog;
    use crate::domain::config::ManualConfiguration;

    #[test]
    fn test_write_matrix_rows() {
        let attempts = vec![
            AttemptRecord::success()
                .with_tag(Dimension::CardNetwork, "visa")
                .with_tag(Dimension::CheckoutLocation, "kiosk"),
        ];
        let matrix = reconcile(&attempts, &ManualConfiguration::default(), &DimensionCatalog::new());

        let mut out = Vec::new();
        MatrixWriter::new(&mut out).write_matrix(&matrix).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("section,dimension,value,label,manual,inferred,resolved,conflict,supporting,refuting,evidence_note,manual_note")
        );
        assert!(text.contains("card_network,card_network,visa,Visa,unknown,supported,supported,false,1,0,1 success (anonymous undated),"));
        assert!(text.contains("device,checkout_location,kiosk,Kiosk,unknown,supported,supported,false,1,0,"));
        assert_eq!(text.lines().count(), 1 + matrix.items().count());
    }
}
