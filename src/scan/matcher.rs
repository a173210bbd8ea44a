//! Candidate selection: earliest start wins, declaration order breaks ties.

use slotmap::SecondaryMap;
use std::fmt;

use super::lookbehind::preceded_by_keyword;
use crate::grammar::{Grammar, Rule, RuleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRole {
    Trigger,
    Terminator,
}

impl fmt::Display for MatchRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchRole::Trigger => f.write_str("trigger"),
            MatchRole::Terminator => f.write_str("terminator"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Found {
    pub rule: RuleId,
    pub start: usize,
    pub end: usize,
}

/// Result of an earlier search started at `from`.
#[derive(Debug, Clone, Copy)]
struct Cached {
    from: usize,
    found: Option<(usize, usize)>,
}

impl Cached {
    /// The cursor only moves forward and every precondition is positional, so the
    /// first accepted match at or after `from` is also the first one at or after `pos`
    /// as long as it does not start before `pos`.
    fn answers(&self, pos: usize) -> bool {
        self.from <= pos && self.found.map_or(true, |(start, _)| start >= pos)
    }
}

pub(crate) struct PatternMatcher<'g, 't> {
    grammar: &'g Grammar,
    text: &'t str,
    cache: SecondaryMap<RuleId, [Option<Cached>; 2]>,
}

impl<'g, 't> PatternMatcher<'g, 't> {
    pub(crate) fn new(grammar: &'g Grammar, text: &'t str) -> Self {
        Self {
            grammar,
            text,
            cache: SecondaryMap::with_capacity(grammar.rule_count()),
        }
    }

    /// Earliest accepted trigger among `candidates` at or after `pos`.
    ///
    /// With `allow_regions == false` candidates that would open a region are skipped.
    pub(crate) fn earliest(
        &mut self,
        candidates: &[RuleId],
        pos: usize,
        allow_regions: bool,
    ) -> Option<Found> {
        let mut best: Option<Found> = None;
        for &id in candidates {
            if !allow_regions && self.grammar.get(id).is_region() {
                continue;
            }
            let Some((start, end)) = self.find(id, MatchRole::Trigger, pos) else {
                continue;
            };
            if best.map_or(true, |b| start < b.start) {
                best = Some(Found {
                    rule: id,
                    start,
                    end,
                });
                if start == pos {
                    break;
                }
            }
        }
        best
    }

    pub(crate) fn terminator(&mut self, rule: RuleId, pos: usize) -> Option<Found> {
        self.find(rule, MatchRole::Terminator, pos)
            .map(|(start, end)| Found { rule, start, end })
    }

    fn find(&mut self, id: RuleId, role: MatchRole, pos: usize) -> Option<(usize, usize)> {
        let slot = role as usize;
        if let Some(cached) = self.cache.get(id).and_then(|entry| entry[slot]) {
            if cached.answers(pos) {
                return cached.found;
            }
        }

        let found = self.search(self.grammar.get(id), role, pos);
        let cached = Cached { from: pos, found };
        match self.cache.get_mut(id) {
            Some(entry) => entry[slot] = Some(cached),
            None => {
                let mut entry = [None; 2];
                entry[slot] = Some(cached);
                self.cache.insert(id, entry);
            }
        }
        found
    }

    fn search(&self, rule: &Rule, role: MatchRole, pos: usize) -> Option<(usize, usize)> {
        let matcher = match role {
            MatchRole::Trigger => &rule.trigger,
            MatchRole::Terminator => rule.terminator.as_ref()?,
        };

        let mut from = pos;
        loop {
            let (start, end) = matcher.find_at(self.text, from)?;
            if role == MatchRole::Terminator || self.accepts(rule, start, end) {
                return Some((start, end));
            }
            // A title needs whitespace right before it; nothing inside the same run
            // of non-whitespace can pass.
            from = if rule.preceded_by.is_empty() {
                next_char_boundary(self.text, start)?
            } else {
                next_spaced_start(self.text, start)?
            };
        }
    }

    /// Positional preconditions of a trigger match.
    fn accepts(&self, rule: &Rule, start: usize, end: usize) -> bool {
        let classifier = self.grammar.classifier();
        if !rule.preceded_by.is_empty()
            && !preceded_by_keyword(
                &self.text[..start],
                &rule.preceded_by,
                classifier,
                self.grammar.is_case_insensitive(),
            )
        {
            return false;
        }
        if let Some(after) = &rule.followed_by {
            if !after.is_match(&self.text[end..]) {
                return false;
            }
        }
        if rule.unless_keyword && classifier.is_keyword(&self.text[start..end]) {
            return false;
        }
        true
    }
}

fn next_char_boundary(text: &str, at: usize) -> Option<usize> {
    let ch = text.get(at..)?.chars().next()?;
    Some(at + ch.len_utf8())
}

/// First offset after `at` that directly follows a whitespace character.
fn next_spaced_start(text: &str, at: usize) -> Option<usize> {
    let (i, ch) = text
        .get(at..)?
        .char_indices()
        .find(|&(_, ch)| ch.is_whitespace())?;
    Some(at + i + ch.len_utf8())
}

#[cfg(test)]
#[path = "../../tests/unit/scan/matcher.rs"]
mod tests;
