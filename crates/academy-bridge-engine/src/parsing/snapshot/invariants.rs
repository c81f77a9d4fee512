use crate::models::{Block, Document, TextRun};

/// Panics when a converted document breaks a structural invariant:
/// runs are maximal and non-empty, no footnote definition or run marker
/// survived, headings are 1-6 and quote children are deeper than their parent.
pub fn check(doc: &Document) {
    for block in &doc.blocks {
        check_block(block, None);
    }
}

fn check_block(block: &Block, parent_depth: Option<u8>) {
    assert!(
        !matches!(block, Block::FootnoteDefinition { .. }),
        "footnote definition left in tree: {block:?}"
    );
    if let Block::Heading { level, .. } = block {
        assert!((1..=6).contains(level), "heading level out of range: {level}");
    }
    if let Block::Quote(q) | Block::EmptyQuotePlaceholder(q) = block {
        if let Some(parent) = parent_depth {
            assert!(
                q.depth > parent,
                "child quote depth {} not deeper than parent {parent}",
                q.depth
            );
        }
        for child in &q.children {
            check_block(child, Some(q.depth));
        }
        for line in &q.lines {
            check_runs(line);
        }
        return;
    }
    block.visit_runs(&mut |runs| check_runs(runs));
}

fn check_runs(runs: &[TextRun]) {
    for pair in runs.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.style != b.style || a.link != b.link,
            "adjacent runs not merged: {a:?} {b:?}"
        );
    }
    for r in runs {
        assert!(r.marker.is_none(), "marker left in runs: {r:?}");
        assert!(!r.text.is_empty(), "empty run: {r:?}");
    }
}
