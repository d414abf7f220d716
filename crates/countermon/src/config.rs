//! Counter specification table (strict parsing).
//!
//! The configuration file is a YAML mapping from fully-qualified counter
//! paths to per-counter options:
//!
//! ```yaml
//! '\Memory\Available MBytes':
//!   scheme: memory.available_mb
//!   min: 100
//! '\Processor(_Total)\% Processor Time':
//!   max: "95"
//! ```
//!
//! Only the counter path is mandatory. `min`/`max` accept YAML numbers or
//! numeric strings interchangeably.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::Deserialize;

use countermon_common::error::{CounterMonError, CounterMonResult};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "metrics.yaml";

/// Per-counter options from the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterSpec {
    /// Relative scheme override. The name derived from the counter path is
    /// used when absent.
    #[serde(default)]
    pub scheme: Option<String>,

    /// Lower bound; values strictly below it fail the check.
    #[serde(default, deserialize_with = "de_opt_number")]
    pub min: Option<f64>,

    /// Upper bound; values strictly above it fail the check.
    #[serde(default, deserialize_with = "de_opt_number")]
    pub max: Option<f64>,
}

impl CounterSpec {
    /// Returns true if this counter participates in bounds checking.
    pub fn has_bounds(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// The full counter specification table, keyed by counter path
/// (`\Object(Instance)\Counter`). Loaded once at startup.
#[derive(Debug, Default)]
pub struct MetricsConfig {
    counters: BTreeMap<String, CounterSpec>,
}

impl MetricsConfig {
    /// Loads and validates the configuration file. Any failure here is
    /// fatal: the run aborts before sampling.
    pub fn load_from_file(path: &Path) -> CounterMonResult<Self> {
        let s = fs::read_to_string(path).map_err(|e| CounterMonError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::load_from_str(&s)
    }

    /// Parses a configuration document. Unknown per-counter keys are
    /// rejected so a typoed bound fails loudly instead of silently
    /// disabling a check.
    pub fn load_from_str(s: &str) -> CounterMonResult<Self> {
        let counters: BTreeMap<String, Option<CounterSpec>> =
            serde_yaml::from_str(s).map_err(|e| CounterMonError::config_parse(e.to_string()))?;

        // A bare `COUNTER:` entry carries no options but still selects the
        // counter for sampling and emission.
        let cfg = Self {
            counters: counters
                .into_iter()
                .map(|(path, spec)| (path, spec.unwrap_or_default()))
                .collect(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> CounterMonResult<()> {
        if self.counters.is_empty() {
            return Err(CounterMonError::invalid_config(
                "counters",
                "at least one counter path must be configured",
            ));
        }
        Ok(())
    }

    /// The configured counter paths, in stable order, used verbatim as
    /// sampler arguments.
    pub fn counter_paths(&self) -> Vec<&str> {
        self.counters.keys().map(|k| k.as_str()).collect()
    }

    /// Looks up a counter by its `\`-prefixed leaf path.
    pub fn get(&self, key: &str) -> Option<&CounterSpec> {
        self.counters.get(key)
    }

    /// Number of configured counters.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Returns true if no counters are configured.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

/// Accepts a YAML number or a numeric string for `min`/`max`.
fn de_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    let value = match Option::<NumberOrText>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(NumberOrText::Number(n)) => n,
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("'{}' is not a number", s.trim())))?,
    };

    if !value.is_finite() {
        return Err(de::Error::custom("bound must be a finite number"));
    }
    Ok(Some(value))
}
