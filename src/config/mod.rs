//! Configuration loading and management for payroll adjustments.
//!
//! This module loads global parameters (such as the pay raise bounds) and the
//! bonus/penalty type catalog from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_adjustments::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Raise limits: {:?}", config.raise_limits().unwrap());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AdjustmentConfig, CatalogConfig, CategoryEntry, MAX_RAISE_PARAM, MIN_RAISE_PARAM,
    Parameters, RaiseLimits, TypeEntry,
};
