//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading adjustment
//! configuration from YAML files.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{AdjustmentError, AdjustmentResult};
use crate::store::RecordStore;

use super::types::{
    AdjustmentConfig, CatalogConfig, MAX_RAISE_PARAM, MIN_RAISE_PARAM, Parameters, RaiseLimits,
};

/// Loads and provides access to adjustment configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── parameters.yaml   # Global parameters (min_raise, max_raise, ...)
/// └── catalog.yaml      # Bonus/penalty categories and types
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_adjustments::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let limits = loader.raise_limits().unwrap();
/// println!("Raises clamped to [{}, {}]", limits.min_raise, limits.max_raise);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AdjustmentConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing or contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> AdjustmentResult<Self> {
        let path = path.as_ref();

        let parameters = Self::load_yaml::<Parameters>(&path.join("parameters.yaml"))?;
        let catalog = Self::load_yaml::<CatalogConfig>(&path.join("catalog.yaml"))?;

        debug!(
            path = %path.display(),
            parameters = parameters.len(),
            bonus_types = catalog.bonus_types.len(),
            penalty_types = catalog.penalty_types.len(),
            "Loaded adjustment configuration"
        );

        Ok(Self {
            config: AdjustmentConfig::new(parameters, catalog),
        })
    }

    /// Builds a loader from already-parsed parts.
    pub fn from_parts(parameters: Parameters, catalog: CatalogConfig) -> Self {
        Self {
            config: AdjustmentConfig::new(parameters, catalog),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> AdjustmentResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| AdjustmentError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| AdjustmentError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AdjustmentConfig {
        &self.config
    }

    /// Returns the raw value of a parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.config.parameters().get(name).map(String::as_str)
    }

    /// Reads a numeric parameter, defaulting to zero when it is absent.
    ///
    /// A value that is present but not a number is rejected rather than
    /// silently treated as zero.
    pub fn parameter_decimal(&self, name: &str) -> AdjustmentResult<Decimal> {
        match self.parameter(name) {
            None => Ok(Decimal::ZERO),
            Some(raw) if raw.trim().is_empty() => Ok(Decimal::ZERO),
            Some(raw) => Decimal::from_str(raw.trim()).map_err(|_| {
                AdjustmentError::InvalidParameter {
                    name: name.to_string(),
                    value: raw.to_string(),
                }
            }),
        }
    }

    /// Returns the configured pay raise bounds.
    pub fn raise_limits(&self) -> AdjustmentResult<RaiseLimits> {
        Ok(RaiseLimits::new(
            self.parameter_decimal(MIN_RAISE_PARAM)?,
            self.parameter_decimal(MAX_RAISE_PARAM)?,
        ))
    }

    /// Registers the catalog's categories and types in a store.
    ///
    /// Types refer to categories by name; an unknown category name is a
    /// validation error.
    pub fn seed_store(&self, store: &mut RecordStore) -> AdjustmentResult<()> {
        let catalog = self.config.catalog();

        for category in &catalog.bonus_categories {
            store.insert_bonus_category(&category.name)?;
        }
        for entry in &catalog.bonus_types {
            let category_id = store
                .bonus_category_by_name(&entry.category)
                .ok_or_else(|| AdjustmentError::Validation {
                    message: format!(
                        "Bonus type '{}' refers to unknown category '{}'",
                        entry.name, entry.category
                    ),
                })?;
            store.insert_bonus_type(&entry.name, &entry.code, category_id)?;
        }

        for category in &catalog.penalty_categories {
            store.insert_penalty_category(&category.name)?;
        }
        for entry in &catalog.penalty_types {
            let category_id = store
                .penalty_category_by_name(&entry.category)
                .ok_or_else(|| AdjustmentError::Validation {
                    message: format!(
                        "Penalty type '{}' refers to unknown category '{}'",
                        entry.name, entry.category
                    ),
                })?;
            store.insert_penalty_type(&entry.name, &entry.code, category_id)?;
        }

        Ok(())
    }
}
