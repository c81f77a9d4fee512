use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::models::{Block, Document, Footnotes, RunMarker, merge_runs};

const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// Maps ASCII digits to their superscript forms, leaving anything else as is.
pub fn to_superscript(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => SUPERSCRIPT_DIGITS[d as usize],
            None => c,
        })
        .collect()
}

/// Moves footnote definitions out of the block flow and renders every
/// `[^n]` marker as superscript text.
///
/// Rendered markers become ordinary text and merge with their neighbours.
/// Undefined references are reported but still rendered.
pub fn normalize_footnotes(doc: Document, diagnostics: &mut Diagnostics) -> (Document, Footnotes) {
    let mut footnotes = Footnotes::default();
    let mut blocks = Vec::with_capacity(doc.blocks.len());
    for block in doc.blocks {
        match block {
            Block::FootnoteDefinition { label, text } => footnotes.insert(label, text),
            other => blocks.push(other),
        }
    }

    for block in &mut blocks {
        block.visit_runs_mut(&mut |runs| {
            for run in runs.iter_mut() {
                if let Some(RunMarker::FootnoteRef { label }) = &run.marker {
                    if !footnotes.contains(label) {
                        diagnostics.push(Diagnostic::new(
                            DiagnosticKind::MissingFootnoteDefinition,
                            format!("[^{label}]"),
                        ));
                    }
                    run.text = to_superscript(label);
                    run.marker = None;
                }
            }
            *runs = merge_runs(std::mem::take(runs));
        });
    }

    (Document { blocks }, footnotes)
}
