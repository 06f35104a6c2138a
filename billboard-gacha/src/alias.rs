//! Static command aliases.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

use crate::AliasError;

/// Lookup from alias to the command line it stands for.
///
/// The source maps each command to its aliases:
///
/// ```
/// use billboard_gacha::AliasTable;
/// use serde_json::json;
///
/// let table = AliasTable::from_value(&json!({"play": ["p", "P"], "gacha songs": ["roll"]}))
///     .expect("alias object");
/// assert_eq!(table.resolve("p"), Some("play"));
/// assert_eq!(table.resolve("roll"), Some("gacha songs"));
/// assert_eq!(table.resolve("play"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    /// Read aliases from the JSON file at `path`.
    pub fn load(path: &Utf8Path) -> Result<Self, AliasError> {
        let raw = billboard_fs::read_to_string(path).map_err(|source| AliasError::Read {
            path: path.to_owned(),
            source,
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|source| AliasError::Decode {
            path: path.to_owned(),
            source,
        })?;
        Self::from_value(&value).map_err(|_| AliasError::NotAnObject {
            path: path.to_owned(),
        })
    }

    /// Build the table from `{command: [alias, ...]}`.
    ///
    /// Entries that are not lists of strings are skipped with a warning. An
    /// alias claimed by two commands keeps the first.
    pub fn from_value(value: &Value) -> Result<Self, AliasError> {
        let Some(commands) = value.as_object() else {
            return Err(AliasError::NotAnObject {
                path: Utf8PathBuf::new(),
            });
        };
        let mut aliases = BTreeMap::new();
        for (command, listed) in commands {
            let Some(names) = listed.as_array() else {
                log::warn!("aliases for `{command}` must be a list; discarding {listed}");
                continue;
            };
            for name in names {
                let Some(alias) = name.as_str() else {
                    log::warn!("alias {name} for `{command}` is not a string; discarding");
                    continue;
                };
                if let Some(existing) = aliases.get(alias) {
                    log::warn!("alias `{alias}` already maps to `{existing}`; ignoring `{command}`");
                    continue;
                }
                aliases.insert(alias.to_owned(), command.clone());
            }
        }
        Ok(Self { aliases })
    }

    /// Command line for `alias`.
    #[must_use]
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether the table holds no aliases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
