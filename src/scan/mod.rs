//! Scanning: grammar + text -> lazy stream of classified spans.
//!
//! Spans come out in pre-order. Depth-0 spans tile the input, with unclassified text
//! reported as spans without a label. A region span at depth `d` is followed by the
//! classified spans nested inside it at depth `d + 1`; text inside a region that has
//! no span of its own carries the region's classification.

mod lookbehind;
mod matcher;
mod region;

pub use matcher::MatchRole;

use compact_str::CompactString;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Range;

use self::matcher::{Found, PatternMatcher};
use self::region::Regions;
use crate::config::ScanOptions;
use crate::grammar::{Grammar, Label, RuleId};
use crate::perf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'g> {
    pub label: Option<&'g Label>,
    pub start: usize,
    pub end: usize,
    pub depth: usize,
}

impl<'g> Span<'g> {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn label_str(&self) -> Option<&'g str> {
        self.label.map(Label::as_str)
    }

    pub fn is_plain(&self) -> bool {
        self.label.is_none()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn text<'t>(&self, source: &'t str) -> &'t str {
        &source[self.range()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A rule matched the empty string again at an offset where nothing was consumed
    /// since its previous empty match.
    ZeroWidthLoop {
        rule: CompactString,
        role: MatchRole,
        offset: usize,
    },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::ZeroWidthLoop { rule, role, offset } => write!(
                f,
                "rule `{}` repeated an empty {} match at byte {}",
                rule, role, offset
            ),
        }
    }
}

impl std::error::Error for ScanError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Done,
}

/// Lazy, forward-only span stream over one input.
///
/// Dropping the scanner at any point abandons the scan; there is nothing to tear down.
pub struct Scanner<'g, 't> {
    grammar: &'g Grammar,
    text: &'t str,
    options: ScanOptions,
    matcher: PatternMatcher<'g, 't>,
    regions: Regions<'g>,
    cursor: usize,
    /// Empty matches seen at `cursor` since the last time it moved, keyed by the
    /// number of open regions when each was taken.
    stalled: Vec<(RuleId, MatchRole, usize)>,
    depth_limited: bool,
    relevance: u64,
    state: State,
}

pub fn scan<'g, 't>(grammar: &'g Grammar, text: &'t str) -> Scanner<'g, 't> {
    Scanner::new(grammar, text)
}

/// Scan to completion.
pub fn collect_spans<'g>(grammar: &'g Grammar, text: &str) -> Result<Vec<Span<'g>>, ScanError> {
    let _scope = perf::scope("scan.collect");
    scan(grammar, text).collect()
}

impl<'g, 't> Scanner<'g, 't> {
    pub fn new(grammar: &'g Grammar, text: &'t str) -> Self {
        Self::with_options(grammar, text, ScanOptions::default())
    }

    pub fn with_options(grammar: &'g Grammar, text: &'t str, options: ScanOptions) -> Self {
        Self {
            grammar,
            text,
            options,
            matcher: PatternMatcher::new(grammar, text),
            regions: Regions::default(),
            cursor: 0,
            stalled: Vec::new(),
            depth_limited: false,
            relevance: 0,
            state: State::Running,
        }
    }

    /// Sum of the relevance of every rule applied and keyword classified so far.
    pub fn relevance(&self) -> u64 {
        self.relevance
    }

    /// Byte offset up to which the input has been consumed.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    fn step(&mut self) -> Result<(), ScanError> {
        let grammar = self.grammar;
        let pos = self.cursor;
        let top = self.regions.top().copied();

        let candidates = match top {
            Some(frame) => grammar.get(frame.rule).children(),
            None => grammar.top_level(),
        };
        let allow_regions = self.options.allows_region_at(self.regions.len());
        if !allow_regions && !self.depth_limited {
            self.depth_limited = true;
            tracing::warn!(
                grammar = grammar.name(),
                offset = pos,
                depth = self.regions.len(),
                "region depth limit reached"
            );
        }

        let child = self.matcher.earliest(candidates, pos, allow_regions);
        let end = top.and_then(|frame| self.matcher.terminator(frame.rule, pos));

        let depth = self.regions.len();
        match (child, end) {
            (child, Some(end)) if child.map_or(true, |c| end.start <= c.start) => {
                self.gap(pos, end.start);
                self.close_region(end);
                self.advance(pos, depth, end, MatchRole::Terminator)
            }
            (Some(child), _) => {
                self.gap(pos, child.start);
                self.enter(child);
                self.advance(pos, depth, child, MatchRole::Trigger)
            }
            _ => {
                let len = self.text.len();
                self.gap(pos, len);
                self.cursor = len;
                if pos == len {
                    self.finish();
                }
                Ok(())
            }
        }
    }

    /// Move past `found`. An empty match is progress only if the same rule has not
    /// already matched empty here with the same number of open regions, and a region
    /// opened empty must not already be open at this offset.
    fn advance(
        &mut self,
        pos: usize,
        depth: usize,
        found: Found,
        role: MatchRole,
    ) -> Result<(), ScanError> {
        self.cursor = found.end;
        if found.end > pos {
            self.stalled.clear();
            return Ok(());
        }

        let key = (found.rule, role, depth);
        let reopened = role == MatchRole::Trigger && self.regions.open_at(found.rule, pos) > 1;
        if reopened || self.stalled.contains(&key) {
            let rule = self.grammar.get(found.rule).name();
            tracing::error!(rule, %role, offset = pos, "zero-width match loop");
            return Err(ScanError::ZeroWidthLoop {
                rule: rule.into(),
                role,
                offset: pos,
            });
        }
        self.stalled.push(key);
        Ok(())
    }

    /// Text between matches: keyword classification or plain text.
    fn gap(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let grammar = self.grammar;
        let scope = match self.regions.top() {
            Some(frame) => grammar.get(frame.rule).keyword_sets.as_slice(),
            None => grammar.top_keywords(),
        };
        if scope.is_empty() {
            self.regions.consume_plain(start, end);
            return;
        }

        let classifier = grammar.classifier();
        let mut plain_from = start;
        for (s, e) in classifier.identifiers(&self.text[start..end]) {
            let (s, e) = (start + s, start + e);
            if let Some(hit) = classifier.classify(&self.text[s..e], scope) {
                self.regions.consume_plain(plain_from, s);
                self.regions.emit(hit.label, s, e);
                self.relevance += u64::from(hit.relevance);
                plain_from = e;
            }
        }
        self.regions.consume_plain(plain_from, end);
    }

    fn enter(&mut self, found: Found) {
        let grammar = self.grammar;
        let rule = grammar.get(found.rule);
        self.relevance += u64::from(rule.relevance);

        if !rule.is_region() {
            match &rule.label {
                Some(label) => self.regions.emit(label, found.start, found.end),
                None => self.regions.consume_plain(found.start, found.end),
            }
            return;
        }

        self.regions.open(found.rule, rule.label.as_ref(), found.start);
        match &rule.begin_label {
            Some(label) => self.regions.emit(label, found.start, found.end),
            None => self.regions.consume_plain(found.start, found.end),
        }
        tracing::trace!(
            rule = rule.name(),
            offset = found.start,
            depth = self.regions.len(),
            "region opened"
        );
    }

    fn close_region(&mut self, found: Found) {
        let grammar = self.grammar;
        let rule = grammar.get(found.rule);
        match &rule.end_label {
            Some(label) => self.regions.emit(label, found.start, found.end),
            None => self.regions.consume_plain(found.start, found.end),
        }
        self.regions.close(found.end);
        tracing::trace!(
            rule = rule.name(),
            offset = found.end,
            depth = self.regions.len(),
            "region closed"
        );
    }

    /// End of input: close whatever is still open.
    fn finish(&mut self) {
        let len = self.text.len();
        while let Some(frame) = self.regions.close(len) {
            tracing::warn!(
                rule = self.grammar.get(frame.rule).name(),
                start = frame.start,
                "unterminated region closed at end of input"
            );
        }
        self.regions.flush_plain(len);
        self.state = State::Done;
    }
}

impl<'g> Iterator for Scanner<'g, '_> {
    type Item = Result<Span<'g>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(span) = self.regions.pop_ready() {
                return Some(Ok(span));
            }
            if self.state == State::Done {
                return None;
            }
            if let Err(err) = self.step() {
                self.state = State::Done;
                self.regions.clear();
                return Some(Err(err));
            }
        }
    }
}

impl FusedIterator for Scanner<'_, '_> {}

#[cfg(test)]
#[path = "../../tests/unit/scan.rs"]
mod tests;
