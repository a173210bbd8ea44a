//! zlex - declarative lexical grammar engine
//!
//! Modules:
//! - grammar: rule model, keyword sets, grammar builder and JSON definitions
//! - scan: pattern matching, region resolution, the span stream
//! - languages: built-in grammars and the extension registry
//! - render: per-line projection of spans for a viewport
//! - config / logging / perf: settings, tracing setup, timing scopes

pub mod config;
pub mod grammar;
pub mod languages;
pub mod logging;
pub mod perf;
pub mod render;
pub mod scan;

pub use config::{ScanOptions, Settings};
pub use grammar::{Grammar, GrammarBuilder, GrammarDef, GrammarError, Label, Pattern, RuleSpec};
pub use languages::{LanguageId, Registry};
pub use scan::{collect_spans, scan, ScanError, Scanner, Span};
