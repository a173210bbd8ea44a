use super::*;
use crate::grammar::{Child, GrammarBuilder, Pattern, RuleSpec};

fn grammar() -> Grammar {
    let mut g = GrammarBuilder::new("render");
    let escape = g.add(RuleSpec::single("escape", Pattern::regex(r"\\.")).label("escape"));
    let string = g.add(
        RuleSpec::region("string", Pattern::literal("\""), Pattern::literal("\""))
            .label("string")
            .children([escape]),
    );
    let comment = g.add(
        RuleSpec::region("comment", Pattern::literal("/*"), Pattern::literal("*/"))
            .label("comment")
            .children([Child::This]),
    );
    let word = g.add(RuleSpec::single("word", Pattern::regex(r"[a-z]+")).label("word"));
    let marker = g.add(RuleSpec::single("marker", Pattern::lookahead("!")).label("marker"));
    for id in [string, comment, word, marker] {
        g.push_top(id);
    }
    g.build().unwrap()
}

fn render<'g>(lines: &[Vec<LineSpan<'g>>]) -> Vec<Vec<(usize, usize, &'g str)>> {
    lines
        .iter()
        .map(|line| {
            line.iter()
                .map(|span| (span.start, span.end, span.label.as_str()))
                .collect()
        })
        .collect()
}

#[test]
fn innermost_label_wins() {
    let grammar = grammar();
    let lines = highlight_snippet(&grammar, "\"a\\nb\"").unwrap();
    assert_eq!(
        render(&lines),
        vec![vec![(0, 2, "string"), (2, 4, "escape"), (4, 6, "string")]]
    );
}

#[test]
fn multi_line_spans_are_split_per_line() {
    let grammar = grammar();
    let lines = highlight_snippet(&grammar, "/* a\nb */ c\n").unwrap();
    assert_eq!(
        render(&lines),
        vec![
            vec![(0, 5, "comment")],
            vec![(0, 4, "comment"), (5, 6, "word")],
            vec![],
        ]
    );
}

#[test]
fn viewport_clips_to_requested_lines() {
    let grammar = grammar();
    let rope = Rope::from_str("ab\n/* x\ny */\ncd\n");
    let lines = highlight_lines(&grammar, &rope, 2, 3).unwrap();
    assert_eq!(render(&lines), vec![vec![(0, 4, "comment")]]);
}

#[test]
fn scanning_stops_after_the_viewport() {
    let grammar = grammar();
    let rope = Rope::from_str("ab\ncd\n!");
    let lines = highlight_lines(&grammar, &rope, 0, 1).unwrap();
    assert_eq!(render(&lines), vec![vec![(0, 2, "word")]]);
    assert!(matches!(
        highlight_lines(&grammar, &rope, 0, 3),
        Err(ScanError::ZeroWidthLoop { .. })
    ));
}

#[test]
fn out_of_range_lines_are_empty() {
    let grammar = grammar();
    let rope = Rope::from_str("ab");
    assert!(highlight_lines(&grammar, &rope, 5, 9).unwrap().is_empty());
    assert!(highlight_lines(&grammar, &rope, 1, 1).unwrap().is_empty());
}

fn span<'g>(label: &'g Label, start: usize, end: usize, depth: usize) -> Span<'g> {
    Span {
        label: Some(label),
        start,
        end,
        depth,
    }
}

#[test]
fn flattener_prefers_deeper_spans_within_the_window() {
    let outer = Label::new("outer");
    let inner = Label::new("inner");
    let mut flattener = Flattener::new(1, 8);
    flattener.push(span(&outer, 0, 10, 0));
    flattener.push(span(&inner, 2, 4, 1));
    let shape: Vec<_> = flattener
        .finish()
        .iter()
        .map(|p| (p.start, p.end, p.label.as_str()))
        .collect();
    assert_eq!(shape, vec![(1, 2, "outer"), (2, 4, "inner"), (4, 8, "outer")]);
}

#[test]
fn flattener_joins_touching_siblings_and_skips_plain_text() {
    let word = Label::new("word");
    let mut flattener = Flattener::new(0, 20);
    flattener.push(span(&word, 0, 2, 0));
    flattener.push(span(&word, 2, 5, 0));
    flattener.push(Span {
        label: None,
        start: 5,
        end: 6,
        depth: 0,
    });
    flattener.push(span(&word, 6, 8, 0));
    let shape: Vec<_> = flattener
        .finish()
        .iter()
        .map(|p| (p.start, p.end))
        .collect();
    assert_eq!(shape, vec![(0, 5), (6, 8)]);
}
