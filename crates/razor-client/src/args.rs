//! Command argument renaming.
//!
//! Some Razor command arguments are spelled with hyphens on the wire
//! (`iso-url`) but are naturally written with underscores by callers.
//! Only the keys listed in the rename table are rewritten; other
//! underscores are legitimate and pass through.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use rz_domain::error::{Error, Result};

/// Built-in renames (`local name → wire name`).
pub const DEFAULT_ARG_RENAMES: &[(&str, &str)] =
    &[("broker_type", "broker-type"), ("iso_url", "iso-url")];

/// Applies a closed rename table to command arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgTransformer {
    renames: BTreeMap<String, String>,
}

impl Default for ArgTransformer {
    fn default() -> Self {
        Self {
            renames: DEFAULT_ARG_RENAMES
                .iter()
                .map(|(from, to)| ((*from).to_owned(), (*to).to_owned()))
                .collect(),
        }
    }
}

impl ArgTransformer {
    /// A transformer with exactly `renames` and nothing else.
    pub fn new(renames: BTreeMap<String, String>) -> Result<Self> {
        let transformer = Self { renames };
        transformer.validate()?;
        Ok(transformer)
    }

    /// The built-in table extended (or overridden) by `extra`.
    pub fn with_extra(extra: BTreeMap<String, String>) -> Result<Self> {
        let mut transformer = Self::default();
        transformer.renames.extend(extra);
        transformer.validate()?;
        Ok(transformer)
    }

    /// A wire name that is itself a rename source would make `transform`
    /// non-idempotent (`a → b`, `b → c`).
    fn validate(&self) -> Result<()> {
        for (from, to) in &self.renames {
            if self.renames.contains_key(to) {
                return Err(Error::Config(format!(
                    "argument rename {from:?} -> {to:?} chains into another rename"
                )));
            }
        }
        Ok(())
    }

    /// The wire name for `key` (itself when not in the table).
    pub fn wire_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.renames.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Rewrite the keys of `args` that appear in the table.
    ///
    /// If the caller supplied both spellings (`iso_url` and `iso-url`),
    /// the renamed value wins.
    pub fn transform(&self, args: Map<String, Value>) -> Map<String, Value> {
        let mut out = Map::with_capacity(args.len());
        let mut renamed = Vec::new();

        for (key, value) in args {
            match self.renames.get(&key) {
                Some(wire) => renamed.push((wire.clone(), value)),
                None => {
                    out.insert(key, value);
                }
            }
        }
        for (wire, value) in renamed {
            out.insert(wire, value);
        }
        out
    }
}
