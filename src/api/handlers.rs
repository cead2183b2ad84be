//! HTTP request handlers for the payroll adjustments API.
//!
//! Every mutating handler runs its service calls inside
//! [`RecordStore::transaction`], so a rejected request leaves the store
//! untouched.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AdjustmentError, AdjustmentResult};
use crate::models::{HeaderRef, RecordId};
use crate::services::bonus::{NewBonus, create_bonus, delete_bonus};
use crate::services::lifecycle::change_state;
use crate::services::pay_raise::{
    NewPayRaise, confirm_pay_raise, create_pay_raise, delete_pay_raise,
};
use crate::services::payslip::{
    NewPayslip, compute_sheet, create_payslip, finalize_payslips, payslip_report,
};
use crate::services::penalty::{NewPenalty, create_penalty, delete_penalty};
use crate::store::RecordStore;

use super::request::{FinalizeRequest, FinalizeResponse, LifecycleAction};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/bonuses", post(create_bonus_handler))
        .route("/bonuses/:id", get(get_bonus_handler).delete(delete_bonus_handler))
        .route("/bonuses/:id/:action", post(bonus_action_handler))
        .route("/penalties", post(create_penalty_handler))
        .route(
            "/penalties/:id",
            get(get_penalty_handler).delete(delete_penalty_handler),
        )
        .route("/penalties/:id/:action", post(penalty_action_handler))
        .route("/pay-raises", post(create_pay_raise_handler))
        .route(
            "/pay-raises/:id",
            get(get_pay_raise_handler).delete(delete_pay_raise_handler),
        )
        .route("/pay-raises/:id/:action", post(pay_raise_action_handler))
        .route("/payslips", post(create_payslip_handler))
        .route("/payslips/finalize", post(finalize_handler))
        .route("/payslips/:id", get(get_payslip_handler))
        .route("/payslips/:id/compute", post(compute_payslip_handler))
        .route("/payslips/:id/report", get(payslip_report_handler))
        .with_state(state)
}

async fn create_bonus_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewBonus>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let new = match parse_body(correlation_id, payload) {
        Ok(new) => new,
        Err(response) => return response,
    };

    let mut store = state.store().lock().await;
    let result = store.transaction(|store| create_bonus(store, new));
    respond_created(correlation_id, &store, result, HeaderRef::Bonus)
}

async fn create_penalty_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewPenalty>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let new = match parse_body(correlation_id, payload) {
        Ok(new) => new,
        Err(response) => return response,
    };

    let mut store = state.store().lock().await;
    let result = store.transaction(|store| create_penalty(store, new));
    respond_created(correlation_id, &store, result, HeaderRef::Penalty)
}

async fn create_pay_raise_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewPayRaise>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let new = match parse_body(correlation_id, payload) {
        Ok(new) => new,
        Err(response) => return response,
    };
    let limits = match state.config().raise_limits() {
        Ok(limits) => limits,
        Err(err) => return error_response(correlation_id, err),
    };

    let mut store = state.store().lock().await;
    let result = store.transaction(|store| create_pay_raise(store, new, &limits));
    respond_created(correlation_id, &store, result, HeaderRef::PayRaise)
}

async fn get_bonus_handler(State(state): State<AppState>, Path(id): Path<RecordId>) -> Response {
    let store = state.store().lock().await;
    header_response(Uuid::new_v4(), &store, HeaderRef::Bonus(id), StatusCode::OK)
}

async fn get_penalty_handler(State(state): State<AppState>, Path(id): Path<RecordId>) -> Response {
    let store = state.store().lock().await;
    header_response(Uuid::new_v4(), &store, HeaderRef::Penalty(id), StatusCode::OK)
}

async fn get_pay_raise_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Response {
    let store = state.store().lock().await;
    header_response(Uuid::new_v4(), &store, HeaderRef::PayRaise(id), StatusCode::OK)
}

async fn bonus_action_handler(
    State(state): State<AppState>,
    Path((id, action)): Path<(RecordId, LifecycleAction)>,
) -> Response {
    run_action(&state, HeaderRef::Bonus(id), action).await
}

async fn penalty_action_handler(
    State(state): State<AppState>,
    Path((id, action)): Path<(RecordId, LifecycleAction)>,
) -> Response {
    run_action(&state, HeaderRef::Penalty(id), action).await
}

async fn pay_raise_action_handler(
    State(state): State<AppState>,
    Path((id, action)): Path<(RecordId, LifecycleAction)>,
) -> Response {
    run_action(&state, HeaderRef::PayRaise(id), action).await
}

async fn delete_bonus_handler(State(state): State<AppState>, Path(id): Path<RecordId>) -> Response {
    let correlation_id = Uuid::new_v4();
    let mut store = state.store().lock().await;
    match store.transaction(|store| delete_bonus(store, id)) {
        Ok(removed) => json_response(StatusCode::OK, &removed),
        Err(err) => error_response(correlation_id, err),
    }
}

async fn delete_penalty_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let mut store = state.store().lock().await;
    match store.transaction(|store| delete_penalty(store, id)) {
        Ok(removed) => json_response(StatusCode::OK, &removed),
        Err(err) => error_response(correlation_id, err),
    }
}

async fn delete_pay_raise_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let mut store = state.store().lock().await;
    match store.transaction(|store| delete_pay_raise(store, id)) {
        Ok(removed) => json_response(StatusCode::OK, &removed),
        Err(err) => error_response(correlation_id, err),
    }
}

async fn create_payslip_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewPayslip>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let new = match parse_body(correlation_id, payload) {
        Ok(new) => new,
        Err(response) => return response,
    };

    let mut store = state.store().lock().await;
    match store.transaction(|store| create_payslip(store, new)) {
        Ok(id) => payslip_response(correlation_id, &store, id, StatusCode::CREATED),
        Err(err) => error_response(correlation_id, err),
    }
}

async fn get_payslip_handler(State(state): State<AppState>, Path(id): Path<RecordId>) -> Response {
    let store = state.store().lock().await;
    payslip_response(Uuid::new_v4(), &store, id, StatusCode::OK)
}

async fn compute_payslip_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let mut store = state.store().lock().await;
    match store.transaction(|store| compute_sheet(store, id)) {
        Ok(()) => payslip_response(correlation_id, &store, id, StatusCode::OK),
        Err(err) => error_response(correlation_id, err),
    }
}

async fn finalize_handler(
    State(state): State<AppState>,
    payload: Result<Json<FinalizeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut store = state.store().lock().await;
    match finalize_payslips(&mut store, &request.payslip_ids) {
        Ok(()) => {
            info!(
                correlation_id = %correlation_id,
                payslips = request.payslip_ids.len(),
                "Finalized payslip batch"
            );
            json_response(
                StatusCode::OK,
                &FinalizeResponse {
                    finalized: request.payslip_ids,
                },
            )
        }
        Err(err) => error_response(correlation_id, err),
    }
}

async fn payslip_report_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Response {
    let store = state.store().lock().await;
    match payslip_report(&store, &[id]) {
        Ok(report) => json_response(StatusCode::OK, &report),
        Err(err) => error_response(Uuid::new_v4(), err),
    }
}

/// Applies a lifecycle action to a header and returns the updated header.
async fn run_action(state: &AppState, header: HeaderRef, action: LifecycleAction) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        record = %header,
        action = ?action,
        "Processing lifecycle action"
    );

    let mut store = state.store().lock().await;
    let result = store.transaction(|store| match (header, action) {
        (HeaderRef::PayRaise(id), LifecycleAction::Confirm) => confirm_pay_raise(store, id),
        _ => change_state(store, header, action.target_state()),
    });

    match result {
        Ok(()) => header_response(correlation_id, &store, header, StatusCode::OK),
        Err(err) => error_response(correlation_id, err),
    }
}

fn respond_created(
    correlation_id: Uuid,
    store: &RecordStore,
    result: AdjustmentResult<RecordId>,
    header: fn(RecordId) -> HeaderRef,
) -> Response {
    match result {
        Ok(id) => {
            info!(correlation_id = %correlation_id, record = %header(id), "Created record");
            header_response(correlation_id, store, header(id), StatusCode::CREATED)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn header_response(
    correlation_id: Uuid,
    store: &RecordStore,
    header: HeaderRef,
    status: StatusCode,
) -> Response {
    let response = match header {
        HeaderRef::Bonus(id) => store.bonus(id).map(|record| json_response(status, record)),
        HeaderRef::Penalty(id) => store.penalty(id).map(|record| json_response(status, record)),
        HeaderRef::TransportAllowance(id) => store
            .transport_allowance(id)
            .map(|record| json_response(status, record)),
        HeaderRef::AwardProfit(id) => store
            .award_profit(id)
            .map(|record| json_response(status, record)),
        HeaderRef::PayRaise(id) => store.pay_raise(id).map(|record| json_response(status, record)),
    };
    response.unwrap_or_else(|err| error_response(correlation_id, err))
}

fn payslip_response(
    correlation_id: Uuid,
    store: &RecordStore,
    id: RecordId,
    status: StatusCode,
) -> Response {
    match store.payslip(id) {
        Ok(payslip) => json_response(status, payslip),
        Err(err) => error_response(correlation_id, err),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: AdjustmentError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request rejected"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, &api_error.error)
}

/// Unwraps a JSON body or builds the 400 response for it.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(json_response(StatusCode::BAD_REQUEST, &error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{BonusHeader, Employee, RecordState};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/default").unwrap();
        let mut store = RecordStore::new();
        config.seed_store(&mut store).unwrap();
        store.insert_employee(Employee {
            id: 500,
            name: "Mona Adel".to_string(),
            previous_wage: None,
        });
        AppState::new(config, store)
    }

    async fn bonus_type_id(state: &AppState, code: &str) -> RecordId {
        state.store().lock().await.bonus_type_by_code(code).unwrap().id
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<String>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        let body = body.map(Body::from).unwrap_or_else(Body::empty);
        router.oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_bonus_returns_201_with_totals() {
        let state = create_test_state();
        let type_id = bonus_type_id(&state, "BON_ANNUAL").await;
        let router = create_router(state);

        let body = serde_json::json!({
            "name": "Q1 Bonus",
            "date": "2024-03-31",
            "lines": [{"employee_id": 500, "bonus_type_id": type_id, "amount": "750"}]
        });
        let response = send(router, "POST", "/bonuses", Some(body.to_string())).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let header: BonusHeader = serde_json::from_slice(&body).unwrap();
        assert_eq!(header.period_month, "March");
        assert_eq!(header.totals.len(), 1);
        assert_eq!(header.totals[0].name, "Total Bonus: Q1 Bonus");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = send(router, "POST", "/bonuses", Some("{invalid json".to_string())).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let router = create_router(create_test_state());

        let body = r#"{"name": "No date"}"#.to_string();
        let response = send(router, "POST", "/bonuses", Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("missing field"));
    }

    #[tokio::test]
    async fn test_unknown_bonus_returns_404() {
        let router = create_router(create_test_state());

        let response = send(router, "GET", "/bonuses/9999", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_confirmed_bonus_returns_409() {
        let state = create_test_state();
        let id = {
            let mut store = state.store().lock().await;
            let id = create_bonus(
                &mut store,
                NewBonus {
                    name: "Locked".to_string(),
                    category_id: None,
                    date: chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                    lines: vec![],
                },
            )
            .unwrap();
            change_state(&mut store, HeaderRef::Bonus(id), RecordState::Confirm).unwrap();
            id
        };
        let router = create_router(state.clone());

        let response = send(router, "DELETE", &format!("/bonuses/{}", id), None).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(state.store().lock().await.bonus(id).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_action_is_rejected() {
        let router = create_router(create_test_state());

        let response = send(router, "POST", "/bonuses/1/approve", None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
