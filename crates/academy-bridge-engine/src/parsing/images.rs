use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::models::{Block, Document, Link, RunMarker, TextRun, merge_runs};

pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpeg", "jpg", "gif", "png", "svg", "webp"];

/// Whether the path part of `url` ends in a recognised image extension.
pub fn has_image_extension(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty()
            && IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

enum Piece {
    Runs(Vec<TextRun>),
    Image(Block),
}

/// Turns image marker runs into `ImageEmbed` blocks.
///
/// A paragraph is split around its images so each embed keeps its position.
/// Images inside other blocks are lifted out and placed right after the
/// root block holding them. Unrecognised extensions stay as link runs.
pub fn embed_images(doc: Document, diagnostics: &mut Diagnostics) -> Document {
    let mut blocks = Vec::with_capacity(doc.blocks.len());
    for block in doc.blocks {
        match block {
            Block::Paragraph { runs } => split_paragraph(runs, &mut blocks, diagnostics),
            mut other => {
                let mut lifted = vec![];
                other.visit_runs_mut(&mut |runs| {
                    let mut kept = vec![];
                    for piece in pieces(std::mem::take(runs), diagnostics) {
                        match piece {
                            Piece::Runs(r) => kept.extend(r),
                            Piece::Image(b) => lifted.push(b),
                        }
                    }
                    *runs = merge_runs(kept);
                });
                blocks.push(other);
                blocks.extend(lifted);
            }
        }
    }
    Document { blocks }
}

fn split_paragraph(runs: Vec<TextRun>, out: &mut Vec<Block>, diagnostics: &mut Diagnostics) {
    for piece in pieces(runs, diagnostics) {
        match piece {
            Piece::Runs(r) => {
                let r = trim_runs(merge_runs(r));
                if !r.is_empty() {
                    out.push(Block::Paragraph { runs: r });
                }
            }
            Piece::Image(b) => out.push(b),
        }
    }
}

/// Splits runs at supported image markers.
fn pieces(runs: Vec<TextRun>, diagnostics: &mut Diagnostics) -> Vec<Piece> {
    let mut out = vec![];
    let mut current = vec![];
    for run in runs {
        let Some(RunMarker::Image { url }) = &run.marker else {
            current.push(run);
            continue;
        };
        if has_image_extension(url) {
            let caption = if run.text.is_empty() {
                vec![]
            } else {
                vec![TextRun::styled(run.text.clone(), run.style)]
            };
            out.push(Piece::Runs(std::mem::take(&mut current)));
            out.push(Piece::Image(Block::ImageEmbed {
                url: url.clone(),
                caption,
            }));
        } else {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnsupportedImageExtension,
                url.clone(),
            ));
            let text = if run.text.is_empty() {
                url.clone()
            } else {
                run.text.clone()
            };
            current.push(TextRun::styled(text, run.style).with_link(Link::classify(url)));
        }
    }
    out.push(Piece::Runs(current));
    out
}

/// Trims whitespace at the outer edges of a run sequence.
fn trim_runs(mut runs: Vec<TextRun>) -> Vec<TextRun> {
    if let Some(first) = runs.first_mut() {
        first.text = first.text.trim_start().to_string();
    }
    if let Some(last) = runs.last_mut() {
        last.text = last.text.trim_end().to_string();
    }
    runs.retain(|r| !r.text.is_empty() || r.marker.is_some());
    runs
}
