use super::common::OptionalJson;
use crate::{
    entities::reservation,
    services::front_office::{BusinessDateInput, CheckoutSummary},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

pub fn front_office_routes() -> Router<AppState> {
    Router::new()
        .route("/check-in/:id", post(check_in))
        .route("/check-out/:id", post(check_out))
        .route("/in-house", get(in_house))
        .route("/arrivals", get(arrivals))
        .route("/departures", get(departures))
}

#[utoipa::path(
    post,
    path = "/api/v1/front-office/check-in/{id}",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    request_body = BusinessDateInput,
    responses(
        (status = 200, description = "Guest checked in", body = ApiResponse<reservation::Model>),
        (status = 400, description = "Reservation or room not ready", body = crate::errors::ErrorResponse),
        (status = 404, description = "Reservation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "front-office"
)]
pub async fn check_in(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    OptionalJson(payload): OptionalJson<BusinessDateInput>,
) -> ApiResult<reservation::Model> {
    let on = payload.and_then(|body| body.date);
    let checked_in = state.services.front_office.check_in(id, on).await?;
    Ok(Json(ApiResponse::success(checked_in)))
}

#[utoipa::path(
    post,
    path = "/api/v1/front-office/check-out/{id}",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    request_body = BusinessDateInput,
    responses(
        (status = 200, description = "Guest checked out, folio closed", body = ApiResponse<CheckoutSummary>),
        (status = 400, description = "Reservation is not checked in", body = crate::errors::ErrorResponse),
        (status = 404, description = "Reservation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "front-office"
)]
pub async fn check_out(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    OptionalJson(payload): OptionalJson<BusinessDateInput>,
) -> ApiResult<CheckoutSummary> {
    let on = payload.and_then(|body| body.date);
    let summary = state.services.front_office.check_out(id, on).await?;
    Ok(Json(ApiResponse::success(summary)))
}

#[utoipa::path(
    get,
    path = "/api/v1/front-office/in-house",
    responses(
        (status = 200, description = "Guests currently checked in", body = ApiResponse<Vec<reservation::Model>>)
    ),
    tag = "front-office"
)]
pub async fn in_house(State(state): State<AppState>) -> ApiResult<Vec<reservation::Model>> {
    let guests = state.services.front_office.in_house().await?;
    Ok(Json(ApiResponse::success(guests)))
}

#[utoipa::path(
    get,
    path = "/api/v1/front-office/arrivals",
    params(BusinessDateInput),
    responses(
        (status = 200, description = "Confirmed arrivals for the day", body = ApiResponse<Vec<reservation::Model>>)
    ),
    tag = "front-office"
)]
pub async fn arrivals(
    State(state): State<AppState>,
    Query(query): Query<BusinessDateInput>,
) -> ApiResult<Vec<reservation::Model>> {
    let due = state.services.front_office.arrivals(query.date).await?;
    Ok(Json(ApiResponse::success(due)))
}

#[utoipa::path(
    get,
    path = "/api/v1/front-office/departures",
    params(BusinessDateInput),
    responses(
        (status = 200, description = "In-house guests leaving on the day", body = ApiResponse<Vec<reservation::Model>>)
    ),
    tag = "front-office"
)]
pub async fn departures(
    State(state): State<AppState>,
    Query(query): Query<BusinessDateInput>,
) -> ApiResult<Vec<reservation::Model>> {
    let due = state.services.front_office.departures(query.date).await?;
    Ok(Json(ApiResponse::success(due)))
}
