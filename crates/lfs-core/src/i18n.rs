//! Message catalog for user-facing strings.
//!
//! Messages are looked up by their English text (the msgid). A catalog is a
//! flat JSON object mapping msgids to translations; anything missing falls
//! back to the msgid itself. `{}` placeholders are filled positionally.

use std::collections::HashMap;
use std::fmt::Display;

use crate::{Error, Result};

/// Localised message lookup and formatting.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    messages: HashMap<String, String>,
}

impl Translator {
    /// A translator that returns every msgid unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON object of `msgid -> translation`.
    pub fn from_json(json: &str) -> Result<Self> {
        let messages: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| Error::invalid_data(format!("message catalog: {e}")))?;
        Ok(Self { messages })
    }

    /// Number of translated messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Translate `msgid` and fill its `{}` placeholders with `args`.
    ///
    /// Surplus placeholders are left as-is; surplus arguments are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use lfs_core::Translator;
    ///
    /// let tr = Translator::identity();
    /// assert_eq!(tr.get("Unknown help topic {}", &[&"x"]), "Unknown help topic x");
    /// ```
    pub fn get(&self, msgid: &str, args: &[&dyn Display]) -> String {
        let template = self.messages.get(msgid).map_or(msgid, String::as_str);
        let mut out = String::with_capacity(template.len());
        let mut args = args.iter();
        let mut rest = template;
        while let Some(pos) = rest.find("{}") {
            out.push_str(&rest[..pos]);
            match args.next() {
                Some(arg) => out.push_str(&arg.to_string()),
                None => out.push_str("{}"),
            }
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        out
    }
}
