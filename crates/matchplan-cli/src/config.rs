use crate::report::OutputFormat;
use anyhow::{Context, Result};
use matchplan_calculator::parse_cents;
use matchplan_types::{AllocationParameters, PayFrequency, Strategy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "MATCHPLAN_CONFIG_PATH";
/// Configuration file used when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "matchplan.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlanSection {
    /// Annual contribution limit as dollar text, e.g. "24,500.00".
    pub annual_limit: String,
    pub match_rate_percent: i64,
    pub max_rate_percent: i64,
    pub strategy: Strategy,
    pub frequency: PayFrequency,
}

impl Default for PlanSection {
    fn default() -> Self {
        Self {
            annual_limit: "24,500.00".to_string(),
            match_rate_percent: 4,
            max_rate_percent: 75,
            strategy: Strategy::Frontload,
            frequency: PayFrequency::Quarterly,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct OutputSection {
    pub format: OutputFormat,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PlanConfig {
    pub plan: PlanSection,
    pub output: OutputSection,
}

impl PlanConfig {
    /// Loads configuration from `path`, or from `MATCHPLAN_CONFIG_PATH` / `matchplan.toml`.
    ///
    /// An explicitly requested file must exist. The implicit file may be missing, in which
    /// case the built-in defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let config_path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        if !config_path.exists() {
            warn!(
                "Configuration file '{}' not found. Using default configuration.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Reads and parses one TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration '{}'", path.display()))?;
        let config = Self::parse(&config_str)
            .with_context(|| format!("failed to parse configuration '{}'", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn parse(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Applies `MATCHPLAN_*` environment variable overrides.
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup. Values that fail to parse are
    /// ignored with a warning.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(limit) = lookup("MATCHPLAN_ANNUAL_LIMIT") {
            self.plan.annual_limit = limit;
        }
        if let Some(rate) = parse_override(&lookup, "MATCHPLAN_MATCH_RATE") {
            self.plan.match_rate_percent = rate;
        }
        if let Some(rate) = parse_override(&lookup, "MATCHPLAN_MAX_RATE") {
            self.plan.max_rate_percent = rate;
        }
        if let Some(strategy) = parse_override(&lookup, "MATCHPLAN_STRATEGY") {
            self.plan.strategy = strategy;
        }
        if let Some(frequency) = parse_override(&lookup, "MATCHPLAN_FREQUENCY") {
            self.plan.frequency = frequency;
        }
        self
    }

    /// Allocation parameters described by the `[plan]` section.
    pub fn parameters(&self) -> AllocationParameters {
        AllocationParameters::new(
            parse_cents(&self.plan.annual_limit),
            self.plan.match_rate_percent,
            self.plan.max_rate_percent,
            self.plan.strategy,
        )
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable configuration override");
            None
        }
    }
}
