//! Help and usage rendering backed by the man-page table.
//!
//! The framework's generated help is never shown. Every help request (the
//! `-h/--help` flag, usage printing, and the `help` subcommand) resolves a
//! command name against a static [`ManPages`] table instead.

use std::collections::BTreeMap;
use std::io::{self, Write};

use lfs_core::Translator;

use crate::manpages;

/// Topic that stands for "no argument given"; resolves to the root command.
pub const HELP_TOKEN: &str = "--help";

/// Help topics that have a page but no command node.
pub const HELP_ALIAS_TOPICS: &[&str] = &["config", "faq"];

// ============================================================================
// Renderer capabilities
// ============================================================================

/// Renders full help for a topic.
pub trait HelpRenderer: Send + Sync {
    fn render_help(&self, topic: &str, out: &mut dyn Write) -> io::Result<()>;
}

/// Renders usage for a command.
pub trait UsageRenderer: Send + Sync {
    fn render_usage(&self, command: &str, out: &mut dyn Write) -> io::Result<()>;
}

// ============================================================================
// ManPages
// ============================================================================

/// Immutable mapping from command name to its help text.
#[derive(Debug, Clone, Default)]
pub struct ManPages {
    pages: BTreeMap<String, String>,
}

impl ManPages {
    /// Build a table from `(name, text)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pages: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The pages shipped with the binary.
    pub fn builtin() -> Self {
        Self::from_pairs(manpages::BUILTIN.iter().copied())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pages.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

// ============================================================================
// HelpResolver
// ============================================================================

/// Resolves help topics against the man-page table.
#[derive(Debug, Clone)]
pub struct HelpResolver {
    root_name: String,
    pages: ManPages,
    translator: Translator,
}

impl HelpResolver {
    /// Create a resolver for the root command `root_name`.
    pub fn new(root_name: impl Into<String>, pages: ManPages) -> Self {
        Self {
            root_name: root_name.into(),
            pages,
            translator: Translator::identity(),
        }
    }

    /// Use `translator` for the fallback message.
    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    /// Resolve `name` to its help text.
    ///
    /// [`HELP_TOKEN`] resolves the root command. Unknown names produce a
    /// localised "no usage text" message rather than an error.
    pub fn resolve(&self, name: &str) -> String {
        let name = if name == HELP_TOKEN {
            self.root_name.as_str()
        } else {
            name
        };
        match self.pages.get(name) {
            Some(text) => text.trim().to_string(),
            None => self
                .translator
                .get("Sorry, no usage text found for {}", &[&format!("{name:?}")]),
        }
    }
}

impl HelpRenderer for HelpResolver {
    fn render_help(&self, topic: &str, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.resolve(topic))
    }
}

impl UsageRenderer for HelpResolver {
    fn render_usage(&self, command: &str, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.resolve(command))
    }
}

// ============================================================================
// Tests
// ============================================================================
