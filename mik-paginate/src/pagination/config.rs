//! Paginator configuration and its builder.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::compile::RangeMode;
use crate::dialect::Dialect;

use super::Paginator;

/// Page size used when a request gives none or an out-of-range one.
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest page size a request may ask for.
pub const MAX_LIMIT: u64 = 100;

/// Error type for loading a configuration file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The TOML document could not be parsed into a configuration.
    #[error("invalid paginator config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Immutable paginator settings.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```
/// use mik_paginate::PaginatorConfig;
///
/// let config = PaginatorConfig::from_toml(r#"
///     default_limit = 20
///     result_key = "items"
///
///     [field_map]
///     createdAt = "created_at"
/// "#).unwrap();
///
/// assert_eq!(config.default_limit, 20);
/// assert_eq!(config.max_limit, 100);
/// assert_eq!(config.primary_key, "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaginatorConfig {
    /// Logical field name to physical column.
    pub field_map: BTreeMap<String, String>,
    /// Page size for requests without a usable limit.
    pub default_limit: u64,
    /// Upper bound on requested page sizes.
    pub max_limit: u64,
    /// Table name override; the collection's own name is used otherwise.
    pub entity: Option<String>,
    /// Key of the row array in serialized results.
    pub result_key: String,
    /// Logical name of the cursor key.
    pub primary_key: String,
    /// Handling of malformed `bw` / `nbw` filters.
    pub range_mode: RangeMode,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            field_map: BTreeMap::new(),
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            entity: None,
            result_key: "data".to_string(),
            primary_key: "id".to_string(),
            range_mode: RangeMode::Strict,
        }
    }
}

impl PaginatorConfig {
    /// Load a configuration from TOML. Out-of-range values are normalized
    /// the same way the builder setters treat them.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        Ok(config.normalized())
    }

    /// Page size for a requested limit.
    ///
    /// The request wins when it is positive and no larger than `max_limit`;
    /// anything else falls back to `default_limit`.
    #[must_use]
    pub fn effective_limit(&self, requested: Option<i64>) -> u64 {
        match requested {
            None => self.default_limit,
            Some(limit) => match u64::try_from(limit) {
                Ok(limit) if limit > 0 && limit <= self.max_limit => limit,
                _ => {
                    tracing::trace!(
                        requested = limit,
                        max_limit = self.max_limit,
                        "limit out of range, using default"
                    );
                    self.default_limit
                },
            },
        }
    }

    /// Repair zero limits and empty names, then clamp the default to the max.
    pub(crate) fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if self.max_limit == 0 {
            self.max_limit = defaults.max_limit;
        }
        if self.default_limit == 0 {
            self.default_limit = defaults.default_limit;
        }
        self.default_limit = self.default_limit.min(self.max_limit);
        if self.result_key.is_empty() {
            self.result_key = defaults.result_key;
        }
        if self.primary_key.is_empty() {
            self.primary_key = defaults.primary_key;
        }
        if self.entity.as_deref() == Some("") {
            self.entity = None;
        }
        self.field_map.retain(|k, v| !k.is_empty() && !v.is_empty());
        self
    }
}

fn positive(value: i64) -> Option<u64> {
    u64::try_from(value).ok().filter(|v| *v > 0)
}

/// Value-returning builder for a [`Paginator`].
///
/// Setters ignore non-positive limits and empty names, so a setter call
/// with a bad value leaves the previous setting in place.
///
/// ```
/// use mik_paginate::{Paginator, Postgres};
///
/// let paginator = Paginator::builder(Postgres)
///     .map_field("createdAt", "created_at")
///     .default_limit(25)
///     .max_limit(-1)
///     .result_key("items")
///     .build();
///
/// assert_eq!(paginator.config().default_limit, 25);
/// assert_eq!(paginator.config().max_limit, 100);
/// ```
#[derive(Debug, Clone)]
pub struct PaginatorBuilder<D: Dialect> {
    dialect: D,
    config: PaginatorConfig,
}

impl<D: Dialect> PaginatorBuilder<D> {
    /// Start from the built-in defaults.
    pub fn new(dialect: D) -> Self {
        Self {
            dialect,
            config: PaginatorConfig::default(),
        }
    }

    /// Replace the whole configuration, e.g. one loaded with
    /// [`PaginatorConfig::from_toml`].
    pub fn config(mut self, config: PaginatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Add every `(logical, physical)` pair to the field map.
    pub fn field_map<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (logical, physical) in entries {
            self = self.map_field(logical, physical);
        }
        self
    }

    /// Map one logical field name to a physical column.
    pub fn map_field(mut self, logical: impl Into<String>, physical: impl Into<String>) -> Self {
        let (logical, physical) = (logical.into(), physical.into());
        if !logical.is_empty() && !physical.is_empty() {
            self.config.field_map.insert(logical, physical);
        }
        self
    }

    /// Page size for requests without a usable limit.
    pub fn default_limit(mut self, limit: i64) -> Self {
        if let Some(limit) = positive(limit) {
            self.config.default_limit = limit;
        }
        self
    }

    /// Upper bound on requested page sizes.
    pub fn max_limit(mut self, limit: i64) -> Self {
        if let Some(limit) = positive(limit) {
            self.config.max_limit = limit;
        }
        self
    }

    /// Query this table instead of the collection's own name.
    pub fn entity(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.config.entity = Some(name);
        }
        self
    }

    /// Key of the row array in serialized results.
    pub fn result_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.is_empty() {
            self.config.result_key = key;
        }
        self
    }

    /// Logical name of the cursor key.
    pub fn primary_key(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !field.is_empty() {
            self.config.primary_key = field;
        }
        self
    }

    /// How `bw` / `nbw` filters without a pair are handled.
    pub fn range_mode(mut self, mode: RangeMode) -> Self {
        self.config.range_mode = mode;
        self
    }

    /// Freeze the configuration.
    pub fn build(self) -> Paginator<D> {
        Paginator::new(self.dialect, self.config)
    }
}
