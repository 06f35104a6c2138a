//! Named pools loaded from a JSON source.

use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use rand::Rng;
use serde_json::Value;

use crate::{PoolError, RateTable, WeightedPool};

/// Default location of the pool definitions.
const DEFAULT_PRIMARY: &str = "config/gacha.json";
/// Default location of the bundled example definitions.
const DEFAULT_EXAMPLE: &str = "config/example_gacha.json";

/// Where pool definitions are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSource {
    /// File holding the pool definitions.
    pub primary: Utf8PathBuf,
    /// Bundled example copied over `primary` when it is missing.
    pub example: Utf8PathBuf,
}

impl PoolSource {
    /// Describe a source with an explicit example fallback.
    pub fn new(primary: impl Into<Utf8PathBuf>, example: impl Into<Utf8PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            example: example.into(),
        }
    }
}

impl Default for PoolSource {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY, DEFAULT_EXAMPLE)
    }
}

/// Pools keyed by name.
///
/// Loading is lenient per entry: a pool whose value is not an object is
/// dropped and a weight that is not an integer counts as zero, each with a
/// warning. Only an unreadable or unparsable source fails the whole load.
///
/// # Examples
/// ```
/// use billboard_gacha::PoolRegistry;
/// use serde_json::json;
///
/// let registry = PoolRegistry::from_value(&json!({"gacha_example": {"play": 1, "skip": 9}}))
///     .expect("pool object");
/// let table = registry.rate_table("gacha_example").expect("known pool");
/// assert_eq!(table.maximum_value, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolRegistry {
    pools: BTreeMap<String, WeightedPool>,
}

impl PoolRegistry {
    /// Load the pools described by `source`.
    ///
    /// A missing primary file is first created from the example.
    pub fn load(source: &PoolSource) -> Result<Self, PoolError> {
        ensure_primary(source)?;
        let path = &source.primary;
        let raw = billboard_fs::read_to_string(path).map_err(|err| PoolError::Read {
            path: path.clone(),
            source: err,
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|err| PoolError::Decode {
            path: path.clone(),
            source: err,
        })?;
        Self::from_value(&value).map_err(|_| PoolError::NotAnObject { path: path.clone() })
    }

    /// Build pools from an already parsed JSON value.
    ///
    /// # Errors
    /// Returns [`PoolError::NotAnObject`] with an empty path when `value` is
    /// not a JSON object.
    pub fn from_value(value: &Value) -> Result<Self, PoolError> {
        let Some(entries) = value.as_object() else {
            return Err(PoolError::NotAnObject {
                path: Utf8PathBuf::new(),
            });
        };
        let mut pools = BTreeMap::new();
        for (name, definition) in entries {
            match definition.as_object() {
                Some(outcomes) => {
                    pools.insert(name.clone(), WeightedPool::from_json(name, outcomes));
                }
                None => log::warn!("unable to parse pool `{name}`: {definition}; discarding"),
            }
        }
        log::debug!("loaded {} gacha pools", pools.len());
        Ok(Self { pools })
    }

    /// Pool called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&WeightedPool> {
        self.pools.get(name)
    }

    /// Draw from pool `name`; `None` for unknown or weightless pools.
    pub fn draw<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Option<&str> {
        let Some(pool) = self.pools.get(name) else {
            log::debug!("no gacha pool named `{name}`");
            return None;
        };
        pool.draw(rng)
    }

    /// Odds for pool `name`.
    #[must_use]
    pub fn rate_table(&self, name: &str) -> Option<RateTable> {
        self.pools.get(name).map(|pool| RateTable::new(name, pool))
    }

    /// Pool names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    /// Number of pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether no pools were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

fn ensure_primary(source: &PoolSource) -> Result<(), PoolError> {
    if is_file(&source.primary).map_err(|err| PoolError::Read {
        path: source.primary.clone(),
        source: err,
    })? {
        return Ok(());
    }
    let has_example = is_file(&source.example).map_err(|err| PoolError::Read {
        path: source.example.clone(),
        source: err,
    })?;
    if !has_example {
        return Err(PoolError::MissingSource {
            primary: source.primary.clone(),
            example: source.example.clone(),
        });
    }
    billboard_fs::copy_file(&source.example, &source.primary).map_err(|err| PoolError::Copy {
        from: source.example.clone(),
        to: source.primary.clone(),
        source: err,
    })?;
    log::warn!(
        "pool source {} not found; copied {}",
        source.primary,
        source.example
    );
    Ok(())
}

fn is_file(path: &Utf8Path) -> io::Result<bool> {
    match billboard_fs::file_is_file(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        other => other,
    }
}
