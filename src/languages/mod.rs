//! Built-in grammars and the extension-keyed registry.

mod ring;

use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::config::Settings;
use crate::grammar::{Grammar, GrammarDef, GrammarError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LanguageId {
    Ring,
}

impl LanguageId {
    pub const ALL: [Self; 1] = [Self::Ring];

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str())? {
            "ring" => Some(Self::Ring),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ring => "ring",
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Ring => &["ring"],
        }
    }

    /// Compiled on first use and shared for the rest of the process.
    pub fn grammar(self) -> Result<&'static Grammar> {
        self.cached().map(|grammar| &**grammar)
    }

    fn shared(self) -> Result<Arc<Grammar>> {
        self.cached().cloned()
    }

    fn cached(self) -> Result<&'static Arc<Grammar>> {
        static RING: OnceLock<std::result::Result<Arc<Grammar>, String>> = OnceLock::new();
        let (cell, build): (_, fn() -> Result<Grammar>) = match self {
            Self::Ring => (&RING, ring::build),
        };
        cell.get_or_init(|| build().map(Arc::new).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|message| GrammarError::Builtin {
                language: self.name(),
                message: message.clone(),
            })
    }
}

/// Grammars by file extension: built-ins plus JSON definitions named in settings.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    by_extension: FxHashMap<String, Arc<Grammar>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for language in LanguageId::ALL {
            registry.register(language.shared()?, language.extensions().iter().copied());
        }
        Ok(registry)
    }

    /// Built-ins, then every grammar listed in `settings`. Later entries win on
    /// extension conflicts.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut registry = Self::with_builtins()?;
        for source in &settings.grammars {
            let grammar = GrammarDef::load(&source.path)?.compile()?;
            tracing::info!(
                grammar = grammar.name(),
                path = %source.path.display(),
                "grammar loaded"
            );
            registry.register(
                Arc::new(grammar),
                source.extensions.iter().map(String::as_str),
            );
        }
        Ok(registry)
    }

    pub fn register<'a, I>(&mut self, grammar: Arc<Grammar>, extensions: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for ext in extensions {
            let ext = ext.trim_start_matches('.').to_ascii_lowercase();
            self.by_extension.insert(ext, grammar.clone());
        }
    }

    pub fn for_extension(&self, ext: &str) -> Option<Arc<Grammar>> {
        self.by_extension.get(&ext.to_ascii_lowercase()).cloned()
    }

    pub fn for_path(&self, path: &Path) -> Option<Arc<Grammar>> {
        let ext = path.extension().and_then(|s| s.to_str())?;
        self.for_extension(ext)
    }

    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/languages.rs"]
mod tests;
