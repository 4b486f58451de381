use crate::core_types::Category;
use crate::error::{TaxonomyError, TaxonomyResult};
use crate::logging::log_debug;
use serde::{Deserialize, Serialize};

/// Backoff multipliers for the categories whose multiplier is caller-defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffHints {
    /// Multiplier applied after a [`Category::NetworkError`]
    pub network_error: u32,
    /// Multiplier applied after a [`Category::Unknown`]
    pub unknown: u32,
}

impl Default for BackoffHints {
    fn default() -> Self {
        Self {
            network_error: 1,
            unknown: 1,
        }
    }
}

/// Classifier configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// How many links of a client failure's cause chain are inspected
    pub max_cause_depth: usize,
    pub backoff: BackoffHints,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_cause_depth: 8,
            backoff: BackoffHints::default(),
        }
    }
}

impl ClassifierConfig {
    /// Parse a JSON document and validate it.
    ///
    /// Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> TaxonomyResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            TaxonomyError::configuration_error(format!("Invalid classifier configuration: {e}"))
        })?;
        config.validate()?;
        log_debug!(
            max_cause_depth = config.max_cause_depth,
            network_error_multiplier = config.backoff.network_error,
            unknown_multiplier = config.backoff.unknown,
            "Loaded classifier configuration"
        );
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::ConfigurationError`] if:
    /// - `max_cause_depth` is zero (network failures could never be detected)
    /// - a backoff multiplier is zero
    pub fn validate(&self) -> TaxonomyResult<()> {
        if self.max_cause_depth == 0 {
            return Err(TaxonomyError::configuration_error(
                "max_cause_depth must be at least 1",
            ));
        }
        if self.backoff.network_error == 0 {
            return Err(TaxonomyError::configuration_error(
                "backoff.network_error must be at least 1",
            ));
        }
        if self.backoff.unknown == 0 {
            return Err(TaxonomyError::configuration_error(
                "backoff.unknown must be at least 1",
            ));
        }
        Ok(())
    }

    /// Effective backoff multiplier for `category`.
    ///
    /// Fixed multipliers come from [`Category::backoff_multiplier`]; the rest
    /// come from [`BackoffHints`].
    pub fn multiplier_for(&self, category: Category) -> u32 {
        category.backoff_multiplier().unwrap_or(match category {
            Category::NetworkError => self.backoff.network_error,
            _ => self.backoff.unknown,
        })
    }
}
