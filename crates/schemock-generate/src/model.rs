use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::GenerationError;
use crate::provider::LocaleKey;

/// Inclusive size range used for containers without explicit size checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeBounds {
    pub min: usize,
    pub max: usize,
}

impl SizeBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self::new(1, 3)
    }
}

/// Options for the generation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Seed for the value provider. A random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Provider locale (`en_US` or `pt_BR`).
    pub locale: String,
    /// Element count for arrays and tuple rest runs.
    pub array: SizeBounds,
    /// Entry count for maps.
    pub map: SizeBounds,
    /// Item count for sets.
    pub set: SizeBounds,
    /// Entry count for records with open key schemas.
    pub record: SizeBounds,
    /// Chance an optional node yields `undefined`.
    pub optional_probability: f64,
    /// Chance a nullable node yields `null`.
    pub nullable_probability: f64,
    /// Chance a default/prefault node yields its declared default.
    pub default_probability: f64,
    /// Maximum number of nested lazy unfoldings.
    pub lazy_depth_limit: usize,
    /// Metadata attribute naming consistency groups; disabled when absent.
    pub consistency_key: Option<String>,
    /// Fail on unsupported kinds and unknown transforms instead of warning.
    pub strict: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: None,
            locale: LocaleKey::EnUs.as_str().to_string(),
            array: SizeBounds::default(),
            map: SizeBounds::default(),
            set: SizeBounds::default(),
            record: SizeBounds::default(),
            optional_probability: 0.5,
            nullable_probability: 0.5,
            default_probability: 0.5,
            lazy_depth_limit: 5,
            consistency_key: None,
            strict: false,
        }
    }
}

impl GenerateOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_consistency_key(mut self, key: impl Into<String>) -> Self {
        self.consistency_key = Some(key.into());
        self
    }

    /// Parse options from TOML text; missing fields keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, GenerationError> {
        let options: GenerateOptions = toml::from_str(input)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse options from a JSON value; missing fields keep their defaults.
    pub fn from_json_value(value: &Value) -> Result<Self, GenerationError> {
        let options: GenerateOptions = serde_json::from_value(value.clone())?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        for (name, probability) in [
            ("optional_probability", self.optional_probability),
            ("nullable_probability", self.nullable_probability),
            ("default_probability", self.default_probability),
        ] {
            if !(0.0..=1.0).contains(&probability) {
                return Err(GenerationError::InvalidConfig(format!(
                    "{name} must be between 0 and 1, got {probability}"
                )));
            }
        }

        for (name, bounds) in [
            ("array", self.array),
            ("map", self.map),
            ("set", self.set),
            ("record", self.record),
        ] {
            if bounds.min > bounds.max {
                return Err(GenerationError::InvalidConfig(format!(
                    "{name} size min {} exceeds max {}",
                    bounds.min, bounds.max
                )));
            }
        }

        self.locale_key()?;

        if let Some(key) = &self.consistency_key
            && key.trim().is_empty()
        {
            return Err(GenerationError::InvalidConfig(
                "consistency_key must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn locale_key(&self) -> Result<LocaleKey, GenerationError> {
        LocaleKey::parse(&self.locale).ok_or_else(|| {
            GenerationError::InvalidConfig(format!("unsupported locale '{}'", self.locale))
        })
    }
}

/// Structured generation issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl GenerationIssue {
    pub fn warning(code: &str, message: impl Into<String>, path: Option<&str>) -> Self {
        Self {
            level: "warning".to_string(),
            code: code.to_string(),
            message: message.into(),
            path: path.map(str::to_string),
        }
    }
}

/// Diagnostics for one generation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub generator_usage: BTreeMap<String, u64>,
    pub transform_usage: BTreeMap<String, u64>,
    pub fallback_count: u64,
    pub replay_count: u64,
    pub lazy_terminations: u64,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
}

impl GenerationReport {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn record_generator_usage(&mut self, id: &str) {
        *self.generator_usage.entry(id.to_string()).or_insert(0) += 1;
    }

    pub fn record_transform_usage(&mut self, id: &str) {
        *self.transform_usage.entry(id.to_string()).or_insert(0) += 1;
    }

    pub fn record_fallback(&mut self) {
        self.fallback_count += 1;
    }

    pub fn record_replay(&mut self) {
        self.replay_count += 1;
    }

    pub fn record_lazy_termination(&mut self) {
        self.lazy_terminations += 1;
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }

    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings_by_code.contains_key(code)
    }
}
