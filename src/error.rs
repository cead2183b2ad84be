//! Error types for payroll adjustments.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure that can abort a business transaction.

use thiserror::Error;

use crate::models::{RecordId, RecordState};

/// The main error type for payroll adjustments.
///
/// Every operation returns this error type. An error always aborts the
/// enclosing transaction; nothing is retried.
///
/// # Example
///
/// ```
/// use payroll_adjustments::error::AdjustmentError;
///
/// let error = AdjustmentError::ConfigNotFound {
///     path: "/missing/parameters.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/parameters.yaml");
/// ```
#[derive(Debug, Error)]
pub enum AdjustmentError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A global parameter holds a value that is not a number.
    #[error("Parameter '{name}' is not numeric: '{value}'")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// The raw stored value.
        value: String,
    },

    /// The record's state forbids the requested action.
    #[error("Cannot {action} {record} while it is {state}")]
    StateConflict {
        /// The action that was attempted (e.g. "delete").
        action: String,
        /// A human-readable reference to the record (e.g. "bonus 4").
        record: String,
        /// The state the record was in.
        state: RecordState,
    },

    /// A business validation rule rejected the operation.
    #[error("Validation error: {message}")]
    Validation {
        /// A description of the violated rule.
        message: String,
    },

    /// A referenced record does not exist.
    #[error("{kind} {id} not found")]
    RecordNotFound {
        /// The record kind (e.g. "bonus", "contract").
        kind: String,
        /// The missing identifier.
        id: RecordId,
    },

    /// A unique field already holds the given value.
    #[error("A {kind} with the same {field} already exists: {value}")]
    DuplicateKey {
        /// The record kind.
        kind: String,
        /// The unique field.
        field: String,
        /// The conflicting value.
        value: String,
    },
}

impl AdjustmentError {
    pub(crate) fn not_found(kind: &str, id: RecordId) -> Self {
        Self::RecordNotFound {
            kind: kind.to_string(),
            id,
        }
    }

    pub(crate) fn state_conflict(action: &str, record: String, state: RecordState) -> Self {
        Self::StateConflict {
            action: action.to_string(),
            record,
            state,
        }
    }
}

/// A type alias for Results that return AdjustmentError.
pub type AdjustmentResult<T> = Result<T, AdjustmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = AdjustmentError::ConfigNotFound {
            path: "/missing/catalog.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/catalog.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = AdjustmentError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_parameter_displays_name_and_value() {
        let error = AdjustmentError::InvalidParameter {
            name: "min_raise".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(error.to_string(), "Parameter 'min_raise' is not numeric: 'abc'");
    }

    #[test]
    fn test_state_conflict_displays_action_record_and_state() {
        let error =
            AdjustmentError::state_conflict("delete", "bonus 4".to_string(), RecordState::Confirm);
        assert_eq!(error.to_string(), "Cannot delete bonus 4 while it is confirmed");
    }

    #[test]
    fn test_validation_displays_message() {
        let error = AdjustmentError::Validation {
            message: "You can't validate a cancelled payslip.".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Validation error: You can't validate a cancelled payslip."
        );
    }

    #[test]
    fn test_record_not_found_displays_kind_and_id() {
        let error = AdjustmentError::not_found("contract", 12);
        assert_eq!(error.to_string(), "contract 12 not found");
    }

    #[test]
    fn test_duplicate_key_displays_kind_field_and_value() {
        let error = AdjustmentError::DuplicateKey {
            kind: "bonus type".to_string(),
            field: "code".to_string(),
            value: "BON_ANNUAL".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "A bonus type with the same code already exists: BON_ANNUAL"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<AdjustmentError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> AdjustmentResult<()> {
            Err(AdjustmentError::not_found("payslip", 1))
        }

        fn propagates_error() -> AdjustmentResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
