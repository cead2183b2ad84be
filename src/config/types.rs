//! Configuration types for payroll adjustments.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Name of the parameter holding the minimum pay raise.
pub const MIN_RAISE_PARAM: &str = "min_raise";

/// Name of the parameter holding the maximum pay raise.
pub const MAX_RAISE_PARAM: &str = "max_raise";

/// Global key-value parameters, stored as strings like any system parameter.
pub type Parameters = HashMap<String, String>;

/// Bounds applied to every computed pay raise.
///
/// The clamp only applies when both bounds are positive; otherwise raises
/// are left as computed.
///
/// # Example
///
/// ```
/// use payroll_adjustments::config::RaiseLimits;
/// use rust_decimal::Decimal;
///
/// let limits = RaiseLimits::new(Decimal::new(100, 0), Decimal::ZERO);
/// assert!(!limits.is_active());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RaiseLimits {
    /// Smallest raise granted.
    pub min_raise: Decimal,
    /// Largest raise granted.
    pub max_raise: Decimal,
}

impl RaiseLimits {
    /// Creates limits from a minimum and a maximum.
    pub fn new(min_raise: Decimal, max_raise: Decimal) -> Self {
        Self {
            min_raise,
            max_raise,
        }
    }

    /// Returns true when both bounds are configured.
    pub fn is_active(&self) -> bool {
        self.min_raise > Decimal::ZERO && self.max_raise > Decimal::ZERO
    }
}

/// A category entry in the catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    /// Unique category name.
    pub name: String,
}

/// A type entry in the catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeEntry {
    /// Unique type name.
    pub name: String,
    /// Unique type code.
    pub code: String,
    /// Name of the category the type belongs to.
    pub category: String,
}

/// Catalog configuration from catalog.yaml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// Bonus categories.
    #[serde(default)]
    pub bonus_categories: Vec<CategoryEntry>,
    /// Bonus types.
    #[serde(default)]
    pub bonus_types: Vec<TypeEntry>,
    /// Penalty categories.
    #[serde(default)]
    pub penalty_categories: Vec<CategoryEntry>,
    /// Penalty types.
    #[serde(default)]
    pub penalty_types: Vec<TypeEntry>,
}

/// The complete adjustment configuration loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct AdjustmentConfig {
    parameters: Parameters,
    catalog: CatalogConfig,
}

impl AdjustmentConfig {
    /// Creates an AdjustmentConfig from its component parts.
    pub fn new(parameters: Parameters, catalog: CatalogConfig) -> Self {
        Self {
            parameters,
            catalog,
        }
    }

    /// Returns all global parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the type and category catalog.
    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_active_only_when_both_positive() {
        assert!(RaiseLimits::new(Decimal::new(100, 0), Decimal::new(500, 0)).is_active());
        assert!(!RaiseLimits::new(Decimal::ZERO, Decimal::new(500, 0)).is_active());
        assert!(!RaiseLimits::new(Decimal::new(100, 0), Decimal::ZERO).is_active());
        assert!(!RaiseLimits::default().is_active());
    }

    #[test]
    fn test_catalog_sections_default_to_empty() {
        let catalog: CatalogConfig =
            serde_yaml::from_str("bonus_categories:\n  - name: Performance\n").unwrap();
        assert_eq!(catalog.bonus_categories.len(), 1);
        assert!(catalog.bonus_types.is_empty());
        assert!(catalog.penalty_types.is_empty());
    }
}
