use super::*;
use std::path::PathBuf;

#[test]
fn from_path_matches_ring_extension() {
    assert_eq!(
        LanguageId::from_path(Path::new("src/main.ring")),
        Some(LanguageId::Ring)
    );
    assert_eq!(LanguageId::from_path(Path::new("main.rs")), None);
    assert_eq!(LanguageId::from_path(Path::new("Makefile")), None);
}

#[test]
fn builtin_grammar_is_compiled_once() {
    let a = LanguageId::Ring.grammar().unwrap();
    let b = LanguageId::Ring.grammar().unwrap();
    assert!(std::ptr::eq(a, b));
    assert_eq!(a.name(), "ring");
}

#[test]
fn registry_shares_builtin_grammars() {
    let registry = Registry::with_builtins().unwrap();
    let grammar = registry.for_path(Path::new("demo.RING")).unwrap();
    assert!(std::ptr::eq(
        &*grammar,
        LanguageId::Ring.grammar().unwrap()
    ));
    assert!(registry.for_extension("txt").is_none());
    assert!(!registry.is_empty());
}

#[test]
fn registry_loads_configured_grammars() {
    let dir = tempfile::tempdir().unwrap();
    let grammar_path = dir.path().join("ini.json");
    std::fs::write(
        &grammar_path,
        r#"{ "name": "ini",
             "rules": [ { "name": "comment", "label": "comment", "begin": ";", "end": "$" } ],
             "contains": ["comment"] }"#,
    )
    .unwrap();

    let settings = Settings {
        grammars: vec![crate::config::GrammarSource {
            path: grammar_path,
            extensions: vec![".ini".to_string(), "CFG".to_string()],
        }],
        ..Settings::default()
    };
    let registry = Registry::from_settings(&settings).unwrap();
    assert_eq!(registry.for_extension("ini").unwrap().name(), "ini");
    assert_eq!(registry.for_path(Path::new("a.cfg")).unwrap().name(), "ini");
    assert_eq!(registry.for_extension("ring").unwrap().name(), "ring");
    assert_eq!(registry.len(), 3);
}

#[test]
fn registry_reports_missing_grammar_files() {
    let settings = Settings {
        grammars: vec![crate::config::GrammarSource {
            path: PathBuf::from("/nonexistent/zlex/grammar.json"),
            extensions: vec!["x".to_string()],
        }],
        ..Settings::default()
    };
    assert!(matches!(
        Registry::from_settings(&settings),
        Err(GrammarError::Io(_))
    ));
}
