//! HTTP API module for payroll adjustments.
//!
//! This module provides the REST endpoints for managing bonuses, penalties
//! and pay raises and for computing and finalizing payslips.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{FinalizeRequest, FinalizeResponse, LifecycleAction};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
