use super::*;

fn classifier(case_insensitive: bool) -> KeywordClassifier {
    KeywordClassifier::new(
        vec![
            KeywordSet::new("keyword", "keyword", ["if", "end|0", "Then"]),
            KeywordSet::new("literal", "literal", ["true", "if"]),
        ],
        case_insensitive,
        "@$",
    )
}

#[test]
fn relevance_suffix_is_parsed() {
    let c = classifier(false);
    let hit = c.classify("end", &[0, 1]).unwrap();
    assert_eq!(hit.relevance, 0);
    assert_eq!(c.classify("if", &[0]).unwrap().relevance, 1);
    assert_eq!(c.sets()[0].len(), 3);
}

#[test]
fn first_set_in_scope_wins() {
    let c = classifier(false);
    assert_eq!(c.classify("if", &[0, 1]).unwrap().label.as_str(), "keyword");
    assert_eq!(c.classify("if", &[1]).unwrap().label.as_str(), "literal");
    assert!(c.classify("if", &[]).is_none());
}

#[test]
fn case_sensitive_lookup_is_exact() {
    let c = classifier(false);
    assert!(c.classify("IF", &[0, 1]).is_none());
    assert!(c.classify("Then", &[0]).is_some());
    assert!(c.classify("then", &[0]).is_none());
}

#[test]
fn case_insensitive_lookup_folds_both_sides() {
    let c = classifier(true);
    for word in ["if", "If", "IF", "then", "THEN"] {
        assert!(c.classify(word, &[0]).is_some(), "{word}");
    }
    assert!(c.is_keyword("TRUE"));
    assert!(!c.is_keyword("classic"));
}

#[test]
fn position_finds_set_by_name() {
    let c = classifier(false);
    assert_eq!(c.position("literal"), Some(1));
    assert_eq!(c.position("missing"), None);
}

#[test]
fn identifiers_are_maximal_tokens() {
    let c = classifier(false);
    let text = "if x1 then @name $v";
    let tokens: Vec<&str> = c.identifiers(text).map(|(s, e)| &text[s..e]).collect();
    assert_eq!(tokens, vec!["if", "x1", "then", "@name", "$v"]);
}

#[test]
fn identifiers_skip_runs_starting_with_digits() {
    let c = classifier(false);
    let text = "1if if_1 9";
    let tokens: Vec<&str> = c.identifiers(text).map(|(s, e)| &text[s..e]).collect();
    assert_eq!(tokens, vec!["if_1"]);
}

#[test]
fn identifiers_accept_unicode_letters() {
    let c = classifier(false);
    let text = "größe = wert";
    let tokens: Vec<&str> = c.identifiers(text).map(|(s, e)| &text[s..e]).collect();
    assert_eq!(tokens, vec!["größe", "wert"]);
}
