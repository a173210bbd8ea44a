//! Keyword classifier: maps identifier tokens to labels through ordered keyword sets.

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use unicode_xid::UnicodeXID;

use super::rule::Label;

#[derive(Debug, Clone)]
pub struct KeywordSet {
    name: CompactString,
    label: Label,
    words: FxHashMap<CompactString, u32>,
}

impl KeywordSet {
    /// Words may carry a relevance suffix (`"end|0"`); the default is 1.
    pub fn new<I, S>(name: impl Into<CompactString>, label: impl Into<Label>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = FxHashMap::default();
        for word in words {
            let (word, relevance) = split_relevance(word.as_ref());
            if word.is_empty() {
                continue;
            }
            table.insert(CompactString::from(word), relevance);
        }
        Self {
            name: name.into(),
            label: label.into(),
            words: table,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn normalized(mut self) -> Self {
        self.words = self
            .words
            .into_iter()
            .map(|(word, relevance)| (CompactString::from(word.to_lowercase()), relevance))
            .collect();
        self
    }
}

fn split_relevance(word: &str) -> (&str, u32) {
    match word.rsplit_once('|') {
        Some((word, relevance)) => match relevance.trim().parse() {
            Ok(relevance) => (word.trim(), relevance),
            Err(_) => (word.trim(), 1),
        },
        None => (word.trim(), 1),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordHit<'a> {
    pub set: usize,
    pub label: &'a Label,
    pub relevance: u32,
}

#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    sets: Vec<KeywordSet>,
    case_insensitive: bool,
    sigils: Vec<char>,
}

impl KeywordClassifier {
    pub fn new(sets: Vec<KeywordSet>, case_insensitive: bool, sigils: &str) -> Self {
        let sets = if case_insensitive {
            sets.into_iter().map(KeywordSet::normalized).collect()
        } else {
            sets
        };
        Self {
            sets,
            case_insensitive,
            sigils: sigils.chars().collect(),
        }
    }

    pub fn sets(&self) -> &[KeywordSet] {
        &self.sets
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.sets.iter().position(|set| set.name == name)
    }

    /// Classify `word` against the sets listed in `scope` (indices, declaration order).
    pub fn classify(&self, word: &str, scope: &[usize]) -> Option<KeywordHit<'_>> {
        if scope.is_empty() {
            return None;
        }
        let key = self.fold(word);
        scope.iter().find_map(|&index| {
            let set = self.sets.get(index)?;
            let relevance = *set.words.get(key.as_ref())?;
            Some(KeywordHit {
                set: index,
                label: &set.label,
                relevance,
            })
        })
    }

    /// Whether `word` belongs to any set.
    pub fn is_keyword(&self, word: &str) -> bool {
        let key = self.fold(word);
        self.sets
            .iter()
            .any(|set| set.words.contains_key(key.as_ref()))
    }

    fn fold<'w>(&self, word: &'w str) -> Cow<'w, str> {
        if self.case_insensitive {
            Cow::Owned(word.to_lowercase())
        } else {
            Cow::Borrowed(word)
        }
    }

    pub fn is_identifier_start(&self, ch: char) -> bool {
        ch == '_' || ch.is_xid_start() || self.sigils.contains(&ch)
    }

    pub fn is_identifier_continue(&self, ch: char) -> bool {
        ch.is_xid_continue() || self.sigils.contains(&ch)
    }

    /// Maximal identifier tokens of `text`, as byte ranges relative to `text`.
    ///
    /// Runs of word characters that do not begin with an identifier start (`1if`) are
    /// skipped whole, so a keyword is only ever found as a full token.
    pub fn identifiers<'a>(&'a self, text: &'a str) -> Identifiers<'a> {
        Identifiers {
            classifier: self,
            text,
            pos: 0,
        }
    }
}

pub struct Identifiers<'a> {
    classifier: &'a KeywordClassifier,
    text: &'a str,
    pos: usize,
}

impl Iterator for Identifiers<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            let rest = &self.text[self.pos..];
            let Some(first) = rest.chars().next() else {
                break;
            };
            let start = self.pos;
            if !self.classifier.is_identifier_continue(first)
                && !self.classifier.is_identifier_start(first)
            {
                self.pos += first.len_utf8();
                continue;
            }

            let len = rest
                .char_indices()
                .find(|&(_, ch)| {
                    !self.classifier.is_identifier_continue(ch)
                        && !self.classifier.is_identifier_start(ch)
                })
                .map_or(rest.len(), |(i, _)| i);
            self.pos = start + len;

            if self.classifier.is_identifier_start(first) {
                return Some((start, start + len));
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grammar/keywords.rs"]
mod tests;
