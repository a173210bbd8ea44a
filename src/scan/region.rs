//! Open regions and the pending span buffer.
//!
//! Regions live on an explicit stack so nesting depth is bounded by memory, not by the
//! call stack. A labeled region reserves its span when it opens; the end offset is
//! patched in when the region closes. Spans before the outermost open labeled region
//! are final and can be handed out.

use std::collections::VecDeque;

use super::Span;
use crate::grammar::{Label, RuleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame {
    pub rule: RuleId,
    pub start: usize,
    /// Absolute index of the region's own span, if labeled.
    slot: Option<usize>,
    /// Depth of spans emitted inside this region.
    depth: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Regions<'g> {
    frames: Vec<Frame>,
    out: VecDeque<Span<'g>>,
    /// Absolute index of `out[0]`.
    base: usize,
    /// Slot of the outermost open labeled region.
    first_open: Option<usize>,
    /// Start of unclassified top-level text not yet emitted.
    plain_start: Option<usize>,
}

impl<'g> Regions<'g> {
    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Number of open frames of `rule` that started at `start`.
    pub(crate) fn open_at(&self, rule: RuleId, start: usize) -> usize {
        self.frames
            .iter()
            .rev()
            .take_while(|frame| frame.start >= start)
            .filter(|frame| frame.rule == rule && frame.start == start)
            .count()
    }

    fn depth(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.depth)
    }

    /// Classified span at the current depth.
    pub(crate) fn emit(&mut self, label: &'g Label, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let depth = self.depth();
        if depth == 0 {
            self.flush_plain(start);
        }
        self.out.push_back(Span {
            label: Some(label),
            start,
            end,
            depth,
        });
    }

    /// Text that gets no span of its own. Inside a labeled region it belongs to that
    /// region; at the top it joins the current run of plain text.
    pub(crate) fn consume_plain(&mut self, start: usize, end: usize) {
        if start >= end || self.depth() > 0 {
            return;
        }
        self.plain_start.get_or_insert(start);
    }

    pub(crate) fn flush_plain(&mut self, upto: usize) {
        let Some(start) = self.plain_start.take() else {
            return;
        };
        if start < upto {
            self.out.push_back(Span {
                label: None,
                start,
                end: upto,
                depth: 0,
            });
        }
    }

    pub(crate) fn open(&mut self, rule: RuleId, label: Option<&'g Label>, start: usize) {
        let parent_depth = self.depth();
        let slot = label.map(|label| {
            if parent_depth == 0 {
                self.flush_plain(start);
            }
            let slot = self.base + self.out.len();
            self.out.push_back(Span {
                label: Some(label),
                start,
                end: start,
                depth: parent_depth,
            });
            slot
        });
        if self.first_open.is_none() {
            self.first_open = slot;
        }
        self.frames.push(Frame {
            rule,
            start,
            slot,
            depth: parent_depth + usize::from(slot.is_some()),
        });
    }

    pub(crate) fn close(&mut self, end: usize) -> Option<Frame> {
        let frame = self.frames.pop()?;
        if let Some(slot) = frame.slot {
            if let Some(span) = self.out.get_mut(slot - self.base) {
                span.end = end;
            }
            if self.first_open == Some(slot) {
                self.first_open = None;
            }
        }
        Some(frame)
    }

    pub(crate) fn pop_ready(&mut self) -> Option<Span<'g>> {
        let limit = self.first_open.unwrap_or(self.base + self.out.len());
        if self.base >= limit {
            return None;
        }
        let span = self.out.pop_front()?;
        self.base += 1;
        Some(span)
    }

    /// Drop everything; used when a scan is aborted.
    pub(crate) fn clear(&mut self) {
        self.frames.clear();
        self.base += self.out.len();
        self.out.clear();
        self.first_open = None;
        self.plain_start = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scan/region.rs"]
mod tests;
