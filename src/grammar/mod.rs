//! Grammar: ordered rule tree + keyword sets for one language.
//!
//! A grammar is assembled with [`GrammarBuilder`] (or compiled from a JSON
//! [`GrammarDef`]) and is immutable afterwards, so one instance can serve any number of
//! concurrent scans.

mod def;
mod error;
mod keywords;
mod rule;

pub use def::{GrammarDef, KeywordSetDef, RuleDef, VariantDef};
pub use error::{GrammarError, Result};
pub use keywords::{Identifiers, KeywordClassifier, KeywordHit, KeywordSet};
pub use rule::{Child, Label, Pattern, Rule, RuleId, RuleSpec};

pub(crate) use rule::Matcher;

use crate::perf;
use compact_str::CompactString;
use rustc_hash::FxHashSet;
use slotmap::{SecondaryMap, SlotMap};

#[derive(Debug)]
pub struct GrammarBuilder {
    name: CompactString,
    case_insensitive: bool,
    sigils: CompactString,
    keyword_sets: Vec<KeywordSet>,
    rules: SlotMap<RuleId, RuleSpec>,
    top: Vec<RuleId>,
}

impl GrammarBuilder {
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            case_insensitive: false,
            sigils: CompactString::default(),
            keyword_sets: Vec::new(),
            rules: SlotMap::with_key(),
            top: Vec::new(),
        }
    }

    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Extra characters allowed in identifiers besides XID characters and `_`.
    pub fn sigils(mut self, sigils: &str) -> Self {
        self.sigils = sigils.into();
        self
    }

    /// Keyword sets are consulted in the order they are added.
    pub fn keyword_set(&mut self, set: KeywordSet) -> &mut Self {
        self.keyword_sets.push(set);
        self
    }

    pub fn add(&mut self, spec: RuleSpec) -> RuleId {
        self.rules.insert(spec)
    }

    /// Replace the children of `id`; used to close cycles between rules.
    pub fn set_children<I, C>(&mut self, id: RuleId, children: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        if let Some(spec) = self.rules.get_mut(id) {
            spec.children = children.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Append a top-level rule; declaration order is match priority.
    pub fn push_top(&mut self, id: RuleId) -> &mut Self {
        self.top.push(id);
        self
    }

    pub fn build(self) -> Result<Grammar> {
        let _scope = perf::scope("grammar.build");

        let mut set_names = FxHashSet::default();
        for set in &self.keyword_sets {
            if !set_names.insert(set.name().to_string()) {
                return Err(GrammarError::DuplicateKeywordSet(set.name().into()));
            }
        }
        let mut rule_names = FxHashSet::default();
        for spec in self.rules.values() {
            if !rule_names.insert(spec.name.clone()) {
                return Err(GrammarError::DuplicateRule(spec.name.clone()));
            }
        }

        let classifier =
            KeywordClassifier::new(self.keyword_sets, self.case_insensitive, &self.sigils);

        let mut rules = SecondaryMap::with_capacity(self.rules.len());
        for (id, spec) in &self.rules {
            let rule = compile_rule(id, spec, &self.rules, &classifier, self.case_insensitive)?;
            rules.insert(id, rule);
        }

        for id in &self.top {
            if !self.rules.contains_key(*id) {
                return Err(GrammarError::UnknownRule {
                    referrer: "<top>".into(),
                    target: format!("{:?}", id).into(),
                });
            }
        }

        let top_keywords = (0..classifier.sets().len()).collect();

        tracing::debug!(
            grammar = %self.name,
            rules = rules.len(),
            keyword_sets = classifier.sets().len(),
            "grammar built"
        );

        Ok(Grammar {
            name: self.name,
            case_insensitive: self.case_insensitive,
            rules,
            top: self.top,
            classifier,
            top_keywords,
        })
    }
}

fn compile_rule(
    id: RuleId,
    spec: &RuleSpec,
    specs: &SlotMap<RuleId, RuleSpec>,
    classifier: &KeywordClassifier,
    case_insensitive: bool,
) -> Result<Rule> {
    let compile = |pattern: &Pattern| -> Result<Matcher> {
        if matches!(pattern, Pattern::Literal(text) if text.is_empty()) {
            return Err(GrammarError::EmptyLiteral {
                rule: spec.name.clone(),
            });
        }
        Matcher::compile(pattern, case_insensitive).map_err(|source| {
            GrammarError::InvalidPattern {
                rule: spec.name.clone(),
                pattern: pattern.source().into(),
                source,
            }
        })
    };

    let trigger = compile(&spec.trigger)?;
    let terminator = spec.terminator.as_ref().map(compile).transpose()?;

    let followed_by = match &spec.followed_by {
        Some(source) => Some(
            rule::build_regex(&format!(r"\A(?:{})", source), case_insensitive).map_err(
                |err| GrammarError::InvalidPattern {
                    rule: spec.name.clone(),
                    pattern: source.clone(),
                    source: err,
                },
            )?,
        ),
        None => None,
    };

    let preceded_by = spec
        .preceded_by
        .iter()
        .map(|word| {
            if case_insensitive {
                CompactString::from(word.to_lowercase())
            } else {
                word.clone()
            }
        })
        .collect();

    let mut keyword_sets = Vec::with_capacity(spec.keyword_sets.len());
    for name in &spec.keyword_sets {
        let index = classifier
            .position(name)
            .ok_or_else(|| GrammarError::UnknownKeywordSet {
                rule: spec.name.clone(),
                set: name.clone(),
            })?;
        keyword_sets.push(index);
    }
    keyword_sets.sort_unstable();
    keyword_sets.dedup();

    let mut children = Vec::with_capacity(spec.children.len());
    for child in &spec.children {
        let child_id = match *child {
            Child::This => id,
            Child::Rule(child_id) => child_id,
        };
        if !specs.contains_key(child_id) {
            return Err(GrammarError::UnknownRule {
                referrer: spec.name.clone(),
                target: format!("{:?}", child_id).into(),
            });
        }
        children.push(child_id);
    }

    Ok(Rule {
        name: spec.name.clone(),
        trigger,
        terminator,
        label: spec.label.clone(),
        begin_label: spec.begin_label.clone(),
        end_label: spec.end_label.clone(),
        relevance: spec.relevance,
        preceded_by,
        followed_by,
        unless_keyword: spec.unless_keyword,
        keyword_sets,
        children,
    })
}

/// Compiled grammar. Immutable and safe to share across threads.
#[derive(Debug)]
pub struct Grammar {
    name: CompactString,
    case_insensitive: bool,
    rules: SecondaryMap<RuleId, Rule>,
    top: Vec<RuleId>,
    classifier: KeywordClassifier,
    top_keywords: Vec<usize>,
}

impl Grammar {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id)
    }

    pub fn rule_by_name(&self, name: &str) -> Option<RuleId> {
        self.rules
            .iter()
            .find(|(_, rule)| rule.name == name)
            .map(|(id, _)| id)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Top-level candidates in priority order.
    pub fn top_level(&self) -> &[RuleId] {
        &self.top
    }

    pub fn classifier(&self) -> &KeywordClassifier {
        &self.classifier
    }

    pub(crate) fn top_keywords(&self) -> &[usize] {
        &self.top_keywords
    }

    /// Rule ids handed out by this grammar's builder are always present.
    pub(crate) fn get(&self, id: RuleId) -> &Rule {
        &self.rules[id]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grammar.rs"]
mod tests;
