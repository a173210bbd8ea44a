use super::*;
use crate::grammar::{GrammarBuilder, KeywordSet, Pattern, RuleSpec};

struct Fixture {
    grammar: Grammar,
    word: RuleId,
    ident: RuleId,
    block: RuleId,
    title: RuleId,
    call: RuleId,
}

fn fixture() -> Fixture {
    let mut g = GrammarBuilder::new("fixture").case_insensitive(true);
    g.keyword_set(KeywordSet::new("keyword", "keyword", ["if", "class"]));
    let word = g.add(RuleSpec::single("word", Pattern::literal("ab")).label("word"));
    let ident = g.add(RuleSpec::single("ident", Pattern::regex(r"[a-z]+")).label("ident"));
    let block = g.add(
        RuleSpec::region("block", Pattern::literal("{"), Pattern::literal("}")).label("block"),
    );
    let title = g.add(
        RuleSpec::single("title", Pattern::regex(r"[a-z]+"))
            .label("title")
            .preceded_by(["class"]),
    );
    let call = g.add(
        RuleSpec::single("call", Pattern::regex(r"\b[a-z]+"))
            .label("call")
            .followed_by(r"\s*\(")
            .unless_keyword(),
    );
    for id in [word, ident, block, title, call] {
        g.push_top(id);
    }
    Fixture {
        grammar: g.build().unwrap(),
        word,
        ident,
        block,
        title,
        call,
    }
}

#[test]
fn earliest_start_wins() {
    let f = fixture();
    let mut m = PatternMatcher::new(&f.grammar, "  xyz ab");
    let found = m.earliest(&[f.word, f.ident], 0, true).unwrap();
    assert_eq!((found.rule, found.start, found.end), (f.ident, 2, 5));
}

#[test]
fn declaration_order_breaks_ties() {
    let f = fixture();
    let mut m = PatternMatcher::new(&f.grammar, "abc");
    let found = m.earliest(&[f.word, f.ident], 0, true).unwrap();
    assert_eq!(found.rule, f.word);
    let found = m.earliest(&[f.ident, f.word], 0, true).unwrap();
    assert_eq!((found.rule, found.end), (f.ident, 3));
}

#[test]
fn regions_can_be_excluded() {
    let f = fixture();
    let mut m = PatternMatcher::new(&f.grammar, "{ ab }");
    assert_eq!(m.earliest(&[f.block, f.word], 0, true).unwrap().rule, f.block);
    assert_eq!(m.earliest(&[f.block, f.word], 0, false).unwrap().rule, f.word);
}

#[test]
fn terminator_is_searched_from_position() {
    let f = fixture();
    let mut m = PatternMatcher::new(&f.grammar, "{ a } }");
    let end = m.terminator(f.block, 1).unwrap();
    assert_eq!((end.start, end.end), (4, 5));
    let end = m.terminator(f.block, 5).unwrap();
    assert_eq!((end.start, end.end), (6, 7));
    assert!(m.terminator(f.block, 7).is_none());
    assert!(m.terminator(f.word, 0).is_none());
}

#[test]
fn lookbehind_skips_to_the_next_candidate() {
    let f = fixture();
    let text = "shape class Shape";
    let mut m = PatternMatcher::new(&f.grammar, text);
    let found = m.earliest(&[f.title], 0, true).unwrap();
    assert_eq!(&text[found.start..found.end], "Shape");
    assert_eq!(found.start, 12);
}

#[test]
fn lookbehind_rejection_skips_the_rest_of_the_word() {
    let f = fixture();
    let text = "a.b class Shape";
    let mut m = PatternMatcher::new(&f.grammar, text);
    let found = m.earliest(&[f.title], 0, true).unwrap();
    assert_eq!((found.start, found.end), (10, 15));

    let long = "x".repeat(50_000);
    let mut m = PatternMatcher::new(&f.grammar, &long);
    assert!(m.earliest(&[f.title], 0, true).is_none());
    assert!(m.earliest(&[f.title], 25_000, true).is_none());
}

#[test]
fn lookahead_and_keyword_filters() {
    let f = fixture();
    let text = "if (x) foo (y) bar";
    let mut m = PatternMatcher::new(&f.grammar, text);
    let found = m.earliest(&[f.call], 0, true).unwrap();
    assert_eq!(&text[found.start..found.end], "foo");
    assert!(m.earliest(&[f.call], found.end, true).is_none());
}

#[test]
fn cached_result_is_reused_only_ahead_of_cursor() {
    let f = fixture();
    let mut m = PatternMatcher::new(&f.grammar, "ab ab");
    assert_eq!(m.earliest(&[f.word], 0, true).unwrap().start, 0);
    assert_eq!(m.earliest(&[f.word], 1, true).unwrap().start, 3);
    assert_eq!(m.earliest(&[f.word], 2, true).unwrap().start, 3);
    assert!(m.earliest(&[f.word], 4, true).is_none());
}

#[test]
fn non_ascii_text_advances_by_char() {
    let f = fixture();
    let text = "ü class é";
    let mut m = PatternMatcher::new(&f.grammar, text);
    assert!(m.earliest(&[f.title], 0, true).is_none());
}

#[test]
fn role_display() {
    assert_eq!(MatchRole::Trigger.to_string(), "trigger");
    assert_eq!(MatchRole::Terminator.to_string(), "terminator");
}
