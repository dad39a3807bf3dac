use crate::domain::capability::{CapabilityMatrix, ResolvedCapabilityItem, Section, ThreeState};
use crate::error::Result;
use std::io::Write;

const LABEL_WIDTH: usize = 24;

fn glyph(state: ThreeState) -> char {
    match state {
        ThreeState::Supported => '+',
        ThreeState::Unsupported => '-',
        ThreeState::Unknown => '?',
    }
}

/// Renders a matrix as an indented plain-text report for terminals and logs.
pub fn write_report<W: Write>(out: &mut W, matrix: &CapabilityMatrix) -> Result<()> {
    for section in &matrix.sections {
        write_section(out, section, 0)?;
    }
    let summary = &matrix.summary;
    writeln!(
        out,
        "Summary: {} supported, {} unsupported, {} unknown, {} needing review",
        summary.supported_count,
        summary.unsupported_count,
        summary.unknown_count,
        summary.conflict_count
    )?;
    Ok(())
}

fn write_section<W: Write>(out: &mut W, section: &Section, depth: usize) -> Result<()> {
    let indent = "  ".repeat(depth);
    writeln!(out, "{}{}", indent, section.title)?;
    if section.items.is_empty() && section.groups.is_empty() {
        writeln!(out, "{}  (none)", indent)?;
    }
    for item in &section.items {
        write_item(out, item, &indent)?;
    }
    for group in &section.groups {
        write_section(out, group, depth + 1)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_item<W: Write>(out: &mut W, item: &ResolvedCapabilityItem, indent: &str) -> Result<()> {
    let review = if item.has_conflict { "  [review]" } else { "" };
    writeln!(
        out,
        "{}  {} {:<width$} {}{}",
        indent,
        glyph(item.resolved_state),
        item.label,
        item.resolved_state,
        review,
        width = LABEL_WIDTH
    )?;
    if item.manual_state.is_known() {
        writeln!(out, "{}      declared: {}", indent, item.manual_state)?;
    }
    if let Some(note) = &item.manual_note {
        writeln!(out, "{}      note: {}", indent, note)?;
    }
    if let Some(note) = &item.evidence_note {
        writeln!(out, "{}      evidence: {}", indent, note)?;
    }
    Ok(())
}
