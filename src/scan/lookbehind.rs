//! Positional "preceded by keyword" check used for declaration titles.
//!
//! `class Shape` classifies `Shape` as a title because the text before it is the
//! full token `class` plus at least one whitespace character. The check looks only at
//! the slice before the candidate match, so it needs no regex lookbehind support and
//! carries no state between matches.

use compact_str::CompactString;

use crate::grammar::KeywordClassifier;

pub(crate) fn preceded_by_keyword(
    before: &str,
    keywords: &[CompactString],
    classifier: &KeywordClassifier,
    case_insensitive: bool,
) -> bool {
    if keywords.is_empty() {
        return true;
    }

    let head = before.trim_end_matches(char::is_whitespace);
    if head.len() == before.len() {
        return false;
    }

    let token_start = head
        .char_indices()
        .rev()
        .take_while(|&(_, ch)| {
            classifier.is_identifier_continue(ch) || classifier.is_identifier_start(ch)
        })
        .last()
        .map_or(head.len(), |(i, _)| i);
    let token = &head[token_start..];
    if token.is_empty() {
        return false;
    }

    if case_insensitive {
        let folded = token.to_lowercase();
        keywords.iter().any(|keyword| keyword.as_str() == folded)
    } else {
        keywords.iter().any(|keyword| keyword.as_str() == token)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scan/lookbehind.rs"]
mod tests;
