use super::*;

#[test]
fn label_displays_as_written() {
    let label = Label::new("title.class.inherited");
    assert_eq!(label.as_str(), "title.class.inherited");
    assert_eq!(label.to_string(), "title.class.inherited");
}

#[test]
fn region_spec_defaults_relevance_to_one() {
    let spec = RuleSpec::region("string", Pattern::literal("\""), Pattern::literal("\""));
    assert_eq!(spec.relevance, 1);
    assert!(spec.terminator.is_some());
    assert_eq!(spec.name(), "string");
}

#[test]
fn literal_matcher_finds_exact_text() {
    let matcher = Matcher::compile(&Pattern::literal("/*"), false).unwrap();
    assert_eq!(matcher.find_at("a /* b /*", 0), Some((2, 4)));
    assert_eq!(matcher.find_at("a /* b /*", 3), Some((7, 9)));
    assert_eq!(matcher.find_at("a /* b /*", 8), None);
}

#[test]
fn case_insensitive_literal_matches_any_case() {
    let matcher = Matcher::compile(&Pattern::literal("End"), true).unwrap();
    assert_eq!(matcher.find_at("x END", 0), Some((2, 5)));
}

#[test]
fn regex_anchors_are_line_based() {
    let matcher = Matcher::compile(&Pattern::regex("$"), false).unwrap();
    assert_eq!(matcher.find_at("ab\r\ncd", 0), Some((2, 2)));
    assert_eq!(matcher.find_at("ab\r\ncd", 4), Some((6, 6)));
}

#[test]
fn lookahead_matcher_consumes_nothing() {
    let matcher = Matcher::compile(&Pattern::lookahead(r"\s"), false).unwrap();
    assert_eq!(matcher.find_at("class Shape", 0), Some((5, 5)));
}

#[test]
fn find_past_end_is_none() {
    let matcher = Matcher::compile(&Pattern::regex("x*"), false).unwrap();
    assert_eq!(matcher.find_at("ab", 2), Some((2, 2)));
    assert_eq!(matcher.find_at("ab", 3), None);
}
