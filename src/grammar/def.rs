//! Serializable grammar definitions.
//!
//! The JSON shape mirrors the builder: named keyword sets in priority order, named
//! rules, and a top-level `contains` list. `"self"` inside a rule's `contains` is the
//! self-reference sentinel. A rule with `variants` expands into one sibling rule per
//! variant; referring to the rule by name refers to all of its variants in order.

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    Child, Grammar, GrammarBuilder, GrammarError, KeywordSet, Pattern, Result, RuleId, RuleSpec,
};

const SELF_REFERENCE: &str = "self";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrammarDef {
    pub name: String,
    pub case_insensitive: bool,
    pub identifier_sigils: String,
    pub keywords: Vec<KeywordSetDef>,
    pub rules: Vec<RuleDef>,
    pub contains: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordSetDef {
    pub name: String,
    /// Defaults to the set name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleDef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_literal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_literal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lookahead: Option<String>,
    pub contains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<u32>,
    pub preceded_by: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followed_by: Option<String>,
    pub unless_keyword: bool,
    pub keywords: Vec<String>,
    pub variants: Vec<VariantDef>,
}

/// Alternative trigger/terminator for a rule; unset fields fall back to the rule's own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariantDef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_literal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_literal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lookahead: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<u32>,
}

impl GrammarDef {
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn compile(&self) -> Result<Grammar> {
        let mut builder = GrammarBuilder::new(self.name.as_str())
            .case_insensitive(self.case_insensitive)
            .sigils(&self.identifier_sigils);

        for set in &self.keywords {
            let label = set.label.as_deref().unwrap_or(&set.name);
            builder.keyword_set(KeywordSet::new(set.name.as_str(), label, &set.words));
        }

        let mut ids: FxHashMap<&str, Vec<RuleId>> = FxHashMap::default();
        for def in &self.rules {
            if ids.contains_key(def.name.as_str()) {
                return Err(GrammarError::DuplicateRule(def.name.as_str().into()));
            }
            let expanded = def
                .expand()?
                .into_iter()
                .map(|spec| builder.add(spec))
                .collect();
            ids.insert(def.name.as_str(), expanded);
        }

        for def in &self.rules {
            let children = resolve(&def.name, &def.contains, &ids, true)?;
            for &id in &ids[def.name.as_str()] {
                builder.set_children(id, children.iter().copied());
            }
        }

        for child in resolve("<top>", &self.contains, &ids, false)? {
            if let Child::Rule(id) = child {
                builder.push_top(id);
            }
        }

        builder.build()
    }
}

fn resolve(
    referrer: &str,
    names: &[String],
    ids: &FxHashMap<&str, Vec<RuleId>>,
    allow_self: bool,
) -> Result<Vec<Child>> {
    let mut children = Vec::with_capacity(names.len());
    for name in names {
        if allow_self && name == SELF_REFERENCE {
            children.push(Child::This);
            continue;
        }
        let targets = ids
            .get(name.as_str())
            .ok_or_else(|| GrammarError::UnknownRule {
                referrer: referrer.into(),
                target: name.as_str().into(),
            })?;
        children.extend(targets.iter().copied().map(Child::Rule));
    }
    Ok(children)
}

impl RuleDef {
    fn expand(&self) -> Result<Vec<RuleSpec>> {
        if self.variants.is_empty() {
            return Ok(vec![self.spec(self.name.as_str().into(), None)?]);
        }
        self.variants
            .iter()
            .enumerate()
            .map(|(i, variant)| {
                let name = CompactString::from(format!("{}[{}]", self.name, i));
                self.spec(name, Some(variant))
            })
            .collect()
    }

    fn spec(&self, name: CompactString, variant: Option<&VariantDef>) -> Result<RuleSpec> {
        let begin = variant.and_then(|v| v.begin.as_ref()).or(self.begin.as_ref());
        let begin_literal = variant
            .and_then(|v| v.begin_literal.as_ref())
            .or(self.begin_literal.as_ref());
        let trigger = match (begin_literal, begin) {
            (Some(text), _) => Pattern::literal(text.as_str()),
            (None, Some(source)) => Pattern::regex(source.as_str()),
            (None, None) => return Err(GrammarError::MissingTrigger { rule: name }),
        };

        let end_literal = variant
            .and_then(|v| v.end_literal.as_ref())
            .or(self.end_literal.as_ref());
        let end_lookahead = variant
            .and_then(|v| v.end_lookahead.as_ref())
            .or(self.end_lookahead.as_ref());
        let end = variant.and_then(|v| v.end.as_ref()).or(self.end.as_ref());
        let terminator = match (end_literal, end_lookahead, end) {
            (Some(text), _, _) => Some(Pattern::literal(text.as_str())),
            (None, Some(source), _) => Some(Pattern::lookahead(source.as_str())),
            (None, None, Some(source)) => Some(Pattern::regex(source.as_str())),
            (None, None, None) => None,
        };

        let mut spec = match terminator {
            Some(terminator) => RuleSpec::region(name, trigger, terminator),
            None => RuleSpec::single(name, trigger),
        };
        if let Some(label) = &self.label {
            spec = spec.label(label.as_str());
        }
        if let Some(label) = &self.begin_label {
            spec = spec.begin_label(label.as_str());
        }
        if let Some(label) = &self.end_label {
            spec = spec.end_label(label.as_str());
        }
        if let Some(relevance) = variant.and_then(|v| v.relevance).or(self.relevance) {
            spec = spec.relevance(relevance);
        }
        if !self.preceded_by.is_empty() {
            spec = spec.preceded_by(self.preceded_by.iter().map(String::as_str));
        }
        if let Some(source) = &self.followed_by {
            spec = spec.followed_by(source.as_str());
        }
        if self.unless_keyword {
            spec = spec.unless_keyword();
        }
        if !self.keywords.is_empty() {
            spec = spec.keywords(self.keywords.iter().map(String::as_str));
        }
        Ok(spec)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grammar/def.rs"]
mod tests;
