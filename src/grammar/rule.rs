//! Rule model: the typed form of one matching rule.

use compact_str::CompactString;
use memchr::memmem::Finder;
use regex::{Regex, RegexBuilder};
use slotmap::new_key_type;
use std::fmt;

new_key_type! { pub struct RuleId; }

/// Classification label attached to emitted spans (`comment`, `title.function`, ...).
///
/// Dot-separated segments are meaningful to consumers only; the engine compares labels
/// as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(CompactString);

impl Label {
    pub fn new(label: impl Into<CompactString>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Exact text.
    Literal(CompactString),
    /// Regular expression, compiled multi-line.
    Regex(CompactString),
    /// Zero-width: matches at the first position where the expression would match,
    /// consuming nothing.
    Lookahead(CompactString),
}

impl Pattern {
    pub fn literal(text: impl Into<CompactString>) -> Self {
        Self::Literal(text.into())
    }

    pub fn regex(source: impl Into<CompactString>) -> Self {
        Self::Regex(source.into())
    }

    pub fn lookahead(source: impl Into<CompactString>) -> Self {
        Self::Lookahead(source.into())
    }

    pub fn source(&self) -> &str {
        match self {
            Self::Literal(s) | Self::Regex(s) | Self::Lookahead(s) => s.as_str(),
        }
    }
}

/// Child reference used while declaring a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    /// The rule being declared, re-entered at a fresh nesting level.
    This,
    Rule(RuleId),
}

impl From<RuleId> for Child {
    fn from(id: RuleId) -> Self {
        Self::Rule(id)
    }
}

/// Declarative description of a rule, compiled by [`super::GrammarBuilder::build`].
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub(crate) name: CompactString,
    pub(crate) trigger: Pattern,
    pub(crate) terminator: Option<Pattern>,
    pub(crate) label: Option<Label>,
    pub(crate) begin_label: Option<Label>,
    pub(crate) end_label: Option<Label>,
    pub(crate) relevance: u32,
    pub(crate) preceded_by: Vec<CompactString>,
    pub(crate) followed_by: Option<CompactString>,
    pub(crate) unless_keyword: bool,
    pub(crate) keyword_sets: Vec<CompactString>,
    pub(crate) children: Vec<Child>,
}

impl RuleSpec {
    /// A rule consuming only its trigger.
    pub fn single(name: impl Into<CompactString>, trigger: Pattern) -> Self {
        Self {
            name: name.into(),
            trigger,
            terminator: None,
            label: None,
            begin_label: None,
            end_label: None,
            relevance: 1,
            preceded_by: Vec::new(),
            followed_by: None,
            unless_keyword: false,
            keyword_sets: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A rule opening a region that lasts until `terminator`.
    pub fn region(name: impl Into<CompactString>, trigger: Pattern, terminator: Pattern) -> Self {
        Self {
            terminator: Some(terminator),
            ..Self::single(name, trigger)
        }
    }

    pub fn label(mut self, label: impl Into<Label>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn begin_label(mut self, label: impl Into<Label>) -> Self {
        self.begin_label = Some(label.into());
        self
    }

    pub fn end_label(mut self, label: impl Into<Label>) -> Self {
        self.end_label = Some(label.into());
        self
    }

    pub fn relevance(mut self, relevance: u32) -> Self {
        self.relevance = relevance;
        self
    }

    /// Accept a match only right after one of `keywords` plus mandatory whitespace.
    pub fn preceded_by<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.preceded_by = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Accept a match only when `source` matches right after it (not consumed).
    pub fn followed_by(mut self, source: impl Into<CompactString>) -> Self {
        self.followed_by = Some(source.into());
        self
    }

    pub fn unless_keyword(mut self) -> Self {
        self.unless_keyword = true;
        self
    }

    /// Keyword sets classified inside the region body.
    pub fn keywords<I, S>(mut self, sets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.keyword_sets = sets.into_iter().map(Into::into).collect();
        self
    }

    pub fn children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Compiled pattern.
#[derive(Debug, Clone)]
pub(crate) enum Matcher {
    Literal(Finder<'static>),
    Regex(Regex),
    Lookahead(Regex),
}

impl Matcher {
    pub(crate) fn compile(pattern: &Pattern, case_insensitive: bool) -> Result<Self, regex::Error> {
        match pattern {
            Pattern::Literal(text) if case_insensitive => {
                Ok(Self::Regex(build_regex(&regex::escape(text), true)?))
            }
            Pattern::Literal(text) => Ok(Self::Literal(Finder::new(text.as_bytes()).into_owned())),
            Pattern::Regex(source) => Ok(Self::Regex(build_regex(source, case_insensitive)?)),
            Pattern::Lookahead(source) => {
                Ok(Self::Lookahead(build_regex(source, case_insensitive)?))
            }
        }
    }

    /// Leftmost match starting at or after `from`, as a byte range.
    pub(crate) fn find_at(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        if from > text.len() {
            return None;
        }
        match self {
            Self::Literal(finder) => {
                let start = from + finder.find(&text.as_bytes()[from..])?;
                Some((start, start + finder.needle().len()))
            }
            Self::Regex(re) => re.find_at(text, from).map(|m| (m.start(), m.end())),
            Self::Lookahead(re) => re.find_at(text, from).map(|m| (m.start(), m.start())),
        }
    }
}

pub(crate) fn build_regex(source: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source)
        .case_insensitive(case_insensitive)
        .multi_line(true)
        .crlf(true)
        .build()
}

/// Compiled, immutable rule. Obtained from [`super::Grammar::rule`].
#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) name: CompactString,
    pub(crate) trigger: Matcher,
    pub(crate) terminator: Option<Matcher>,
    pub(crate) label: Option<Label>,
    pub(crate) begin_label: Option<Label>,
    pub(crate) end_label: Option<Label>,
    pub(crate) relevance: u32,
    pub(crate) preceded_by: Vec<CompactString>,
    pub(crate) followed_by: Option<Regex>,
    pub(crate) unless_keyword: bool,
    pub(crate) keyword_sets: Vec<usize>,
    pub(crate) children: Vec<RuleId>,
}

impl Rule {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn relevance(&self) -> u32 {
        self.relevance
    }

    pub fn children(&self) -> &[RuleId] {
        &self.children
    }

    pub fn is_region(&self) -> bool {
        self.terminator.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grammar/rule.rs"]
mod tests;
