use crate::models::{Block, Quote, TextRun};

/// Open blockquotes, outermost first.
///
/// A line at depth `d` closes every quote deeper than `d`, then continues the
/// quote at `d` or opens a new one. Closed quotes become children of the
/// quote below them, or root blocks when nothing is below.
#[derive(Debug, Default)]
pub struct QuoteStack {
    open: Vec<Quote>,
}

impl QuoteStack {
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn push_line(&mut self, depth: u8, runs: Vec<TextRun>, out: &mut Vec<Block>) {
        self.close_deeper_than(depth, out);
        match self.open.last_mut() {
            Some(top) if top.depth == depth => top.lines.push(runs),
            _ => {
                let mut quote = Quote::new(depth);
                quote.lines.push(runs);
                self.open.push(quote);
            }
        }
    }

    pub fn close_all(&mut self, out: &mut Vec<Block>) {
        self.close_deeper_than(0, out);
    }

    fn close_deeper_than(&mut self, depth: u8, out: &mut Vec<Block>) {
        while self.open.last().is_some_and(|q| q.depth > depth) {
            let Some(quote) = self.open.pop() else {
                break;
            };
            let block = Self::finish(quote);
            match self.open.last_mut() {
                Some(parent) => parent.children.push(block),
                None => out.push(block),
            }
        }
    }

    fn finish(quote: Quote) -> Block {
        if quote.is_blank() {
            Block::empty_quote(quote.depth, quote.children)
        } else {
            Block::Quote(quote)
        }
    }
}

/// Maps list indentation to nesting depth.
///
/// Each new indent value nests one deeper than the nearest open indent that
/// is smaller than it; returning to a known indent reuses its depth.
#[derive(Debug, Default)]
pub struct ListStack {
    frames: Vec<(usize, usize)>,
}

impl ListStack {
    pub fn depth_for(&mut self, indent: usize) -> usize {
        while self.frames.last().is_some_and(|(i, _)| *i > indent) {
            self.frames.pop();
        }
        match self.frames.last() {
            Some(&(i, depth)) if i == indent => depth,
            Some(&(_, depth)) => {
                self.frames.push((indent, depth + 1));
                depth + 1
            }
            None => {
                self.frames.push((indent, 0));
                0
            }
        }
    }

    pub fn reset(&mut self) {
        self.frames.clear();
    }
}
