use super::*;
use crate::scan::collect_spans;

fn labeled(text: &str) -> Vec<(String, String, usize)> {
    let grammar = build().unwrap();
    collect_spans(&grammar, text)
        .unwrap()
        .into_iter()
        .filter_map(|span| {
            Some((
                span.label_str()?.to_string(),
                span.text(text).to_string(),
                span.depth,
            ))
        })
        .collect()
}

fn top(text: &str) -> Vec<(String, String)> {
    labeled(text)
        .into_iter()
        .filter(|(_, _, depth)| *depth == 0)
        .map(|(label, text, _)| (label, text))
        .collect()
}

fn pair(label: &str, text: &str) -> (String, String) {
    (label.to_string(), text.to_string())
}

#[test]
fn grammar_builds() {
    let grammar = build().unwrap();
    assert!(grammar.is_case_insensitive());
    assert_eq!(grammar.classifier().sets().len(), 6);
    assert!(grammar.rule_by_name("builtin.call").is_some());
}

#[test]
fn comments() {
    assert_eq!(
        top("x // note\n# hash\n/* a /* b */ c */"),
        vec![
            pair("comment", "// note"),
            pair("comment", "# hash"),
            pair("comment", "/* a /* b */ c */"),
        ]
    );
}

#[test]
fn scanner_commands_are_meta() {
    assert_eq!(
        top("  loadsyntax \"x\""),
        vec![pair("meta", "  loadsyntax"), pair("string", "\"x\"")]
    );
}

#[test]
fn class_declaration_title() {
    assert_eq!(
        top("class Shape from Base"),
        vec![
            pair("keyword", "class"),
            pair("title.class", "Shape"),
            pair("keyword", "from"),
            pair("title.class.inherited", "Base"),
        ]
    );
}

#[test]
fn function_and_package_titles() {
    assert_eq!(
        top("func area(x)"),
        vec![pair("keyword", "func"), pair("title.function", "area")]
    );
    assert_eq!(
        top("import system.web"),
        vec![pair("keyword", "import"), pair("title.class.inherited", "system.web")]
    );
}

#[test]
fn calls_builtins_and_keywords() {
    assert_eq!(
        top("if len(x) foo(y) new Point"),
        vec![
            pair("keyword", "if"),
            pair("built_in", "len"),
            pair("title.function.invoke", "foo"),
            pair("keyword", "new"),
            pair("title.class", "Point"),
        ]
    );
}

#[test]
fn keyword_followed_by_paren_is_not_a_call() {
    assert_eq!(top("while (x)"), vec![pair("keyword", "while")]);
}

#[test]
fn numbers_symbols_operators() {
    assert_eq!(
        top("0x1F 0b101 0o17 3.14e2 1_000 :name += @x"),
        vec![
            pair("number", "0x1F"),
            pair("number", "0b101"),
            pair("number", "0o17"),
            pair("number", "3.14e2"),
            pair("number", "1_000"),
            pair("symbol", ":name"),
            pair("operator", "+="),
        ]
    );
}

#[test]
fn escapes_stay_inside_strings() {
    assert_eq!(
        labeled(r#"'it\'s' "a\"b""#),
        vec![
            ("string".to_string(), r"'it\'s'".to_string(), 0),
            ("string".to_string(), r#""a\"b""#.to_string(), 0),
        ]
    );
}

#[test]
fn interpolation_holds_keywords_and_numbers() {
    assert_eq!(
        labeled("`v #{ x + 1 and true }`"),
        vec![
            ("string".to_string(), "`v #{ x + 1 and true }`".to_string(), 0),
            ("subst".to_string(), "#{ x + 1 and true }".to_string(), 1),
            ("number".to_string(), "1".to_string(), 2),
            ("operator.word".to_string(), "and".to_string(), 2),
            ("built_in".to_string(), "true".to_string(), 2),
        ]
    );
}
