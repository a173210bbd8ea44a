use compact_str::CompactString;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, GrammarError>;

/// Faults in a grammar definition, reported before any scan begins.
#[derive(Debug)]
pub enum GrammarError {
    Io(io::Error),
    Definition(serde_json::Error),
    InvalidPattern {
        rule: CompactString,
        pattern: CompactString,
        source: regex::Error,
    },
    EmptyLiteral {
        rule: CompactString,
    },
    MissingTrigger {
        rule: CompactString,
    },
    UnknownKeywordSet {
        rule: CompactString,
        set: CompactString,
    },
    UnknownRule {
        referrer: CompactString,
        target: CompactString,
    },
    DuplicateRule(CompactString),
    DuplicateKeywordSet(CompactString),
    /// A built-in grammar failed to compile; the message is cached with it.
    Builtin {
        language: &'static str,
        message: String,
    },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Io(e) => write!(f, "IO error: {}", e),
            GrammarError::Definition(e) => write!(f, "invalid grammar definition: {}", e),
            GrammarError::InvalidPattern {
                rule,
                pattern,
                source,
            } => write!(f, "rule `{}`: invalid pattern `{}`: {}", rule, pattern, source),
            GrammarError::EmptyLiteral { rule } => {
                write!(f, "rule `{}`: literal pattern is empty", rule)
            }
            GrammarError::MissingTrigger { rule } => {
                write!(f, "rule `{}`: no begin pattern", rule)
            }
            GrammarError::UnknownKeywordSet { rule, set } => {
                write!(f, "rule `{}`: unknown keyword set `{}`", rule, set)
            }
            GrammarError::UnknownRule { referrer, target } => {
                write!(f, "rule `{}`: unknown rule reference `{}`", referrer, target)
            }
            GrammarError::DuplicateRule(name) => write!(f, "duplicate rule name `{}`", name),
            GrammarError::DuplicateKeywordSet(name) => {
                write!(f, "duplicate keyword set `{}`", name)
            }
            GrammarError::Builtin { language, message } => {
                write!(f, "built-in grammar `{}`: {}", language, message)
            }
        }
    }
}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrammarError::Io(e) => Some(e),
            GrammarError::Definition(e) => Some(e),
            GrammarError::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for GrammarError {
    fn from(e: io::Error) -> Self {
        GrammarError::Io(e)
    }
}

impl From<serde_json::Error> for GrammarError {
    fn from(e: serde_json::Error) -> Self {
        GrammarError::Definition(e)
    }
}
