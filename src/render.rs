//! Viewport rendering: nested spans -> innermost label per byte, projected onto lines.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

use crate::grammar::{Grammar, Label};
use crate::perf;
use crate::scan::{self, ScanError, Span};

/// Highlighted range relative to its line start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan<'g> {
    pub start: usize,
    pub end: usize,
    pub label: &'g Label,
}

/// Piece of the viewport painted with the innermost open label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece<'g> {
    start: usize,
    end: usize,
    label: &'g Label,
}

/// Per-line spans for lines `start_line..end_line_exclusive` of `rope`.
///
/// The text is scanned from the beginning (regions may open above the viewport) but
/// the stream is dropped as soon as it moves past the last requested line.
pub fn highlight_lines<'g>(
    grammar: &'g Grammar,
    rope: &Rope,
    start_line: usize,
    end_line_exclusive: usize,
) -> Result<Vec<Vec<LineSpan<'g>>>, ScanError> {
    let _scope = perf::scope("render.highlight_lines");
    let total_lines = rope.len_lines().max(1);
    let start_line = start_line.min(total_lines);
    let end_line_exclusive = end_line_exclusive.min(total_lines);
    if start_line >= end_line_exclusive {
        return Ok(Vec::new());
    }

    let range_start = rope.line_to_byte(start_line);
    let range_end = rope.line_to_byte(end_line_exclusive);
    let text: Cow<'_, str> = rope.into();

    let mut flattener = Flattener::new(range_start, range_end);
    for span in scan::scan(grammar, &text) {
        let span = span?;
        if span.start >= range_end {
            break;
        }
        flattener.push(span);
    }

    Ok(project_to_lines(
        rope,
        start_line,
        end_line_exclusive,
        &flattener.finish(),
    ))
}

/// Highlight a whole snippet; one entry per line.
pub fn highlight_snippet<'g>(
    grammar: &'g Grammar,
    text: &str,
) -> Result<Vec<Vec<LineSpan<'g>>>, ScanError> {
    let rope = Rope::from_str(text);
    let total_lines = rope.len_lines().max(1);
    highlight_lines(grammar, &rope, 0, total_lines)
}

/// Turns the pre-order span stream into non-overlapping pieces, innermost label on
/// top. Nested spans lie inside their parent, so the open spans form a stack ordered
/// by end offset.
struct Flattener<'g> {
    window: Range<usize>,
    open: Vec<(usize, &'g Label)>,
    cursor: usize,
    pieces: Vec<Piece<'g>>,
}

impl<'g> Flattener<'g> {
    fn new(start: usize, end: usize) -> Self {
        Self {
            window: start..end,
            open: Vec::new(),
            cursor: 0,
            pieces: Vec::new(),
        }
    }

    fn push(&mut self, span: Span<'g>) {
        let Some(label) = span.label else {
            return;
        };
        self.close_until(span.start);
        self.paint(span.start);
        self.open.push((span.end, label));
    }

    fn finish(mut self) -> Vec<Piece<'g>> {
        self.close_until(usize::MAX);
        self.pieces
    }

    fn close_until(&mut self, pos: usize) {
        while let Some(&(end, _)) = self.open.last() {
            if end > pos {
                break;
            }
            self.paint(end);
            self.open.pop();
        }
    }

    /// Paint `cursor..upto` with the innermost open label, clipped to the window.
    fn paint(&mut self, upto: usize) {
        let from = self.cursor.max(self.window.start);
        let to = upto.min(self.window.end);
        self.cursor = self.cursor.max(upto);
        let Some(&(_, label)) = self.open.last() else {
            return;
        };
        if from >= to {
            return;
        }
        match self.pieces.last_mut() {
            Some(prev) if prev.label == label && prev.end == from => prev.end = to,
            _ => self.pieces.push(Piece {
                start: from,
                end: to,
                label,
            }),
        }
    }
}

/// Split pieces at line starts; offsets become line-relative.
fn project_to_lines<'g>(
    rope: &Rope,
    start_line: usize,
    end_line_exclusive: usize,
    pieces: &[Piece<'g>],
) -> Vec<Vec<LineSpan<'g>>> {
    let mut per_line = vec![Vec::new(); end_line_exclusive - start_line];
    for piece in pieces {
        let mut at = piece.start;
        while at < piece.end {
            let line = rope.byte_to_line(at);
            let line_start = rope.line_to_byte(line);
            let upto = rope.line_to_byte(line + 1).min(piece.end);
            per_line[line - start_line].push(LineSpan {
                start: at - line_start,
                end: upto - line_start,
                label: piece.label,
            });
            at = upto;
        }
    }
    per_line
}

#[cfg(test)]
#[path = "../tests/unit/render.rs"]
mod tests;
