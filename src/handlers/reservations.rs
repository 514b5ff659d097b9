use super::common::{created_response, paginated, CreatedResult, OptionalJson};
use crate::{
    entities::reservation,
    services::reservations::{
        CancelReservationInput, CreateReservationInput, NoShowInput, ReservationFilter,
        UpdateReservationInput,
    },
    ApiResponse, ApiResult, AppState, ListQuery, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route("/by-number/:number", get(get_reservation_by_number))
        .route("/:id", get(get_reservation).put(update_reservation))
        .route("/:id/cancel", post(cancel_reservation))
        .route("/:id/no-show", post(mark_no_show))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    params(ListQuery, ReservationFilter),
    responses(
        (status = 200, description = "Reservations listed", body = ApiResponse<PaginatedResponse<reservation::Model>>)
    ),
    tag = "reservations"
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<ReservationFilter>,
) -> ApiResult<PaginatedResponse<reservation::Model>> {
    let page = query.page();
    let limit = state.config.page_limit(query.limit);
    let (items, total) = state
        .services
        .reservations
        .list_reservations(filter, page, limit)
        .await?;
    Ok(Json(ApiResponse::success(paginated(items, total, page, limit))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    request_body = CreateReservationInput,
    responses(
        (status = 201, description = "Reservation confirmed", body = ApiResponse<reservation::Model>),
        (status = 400, description = "Invalid dates or party size", body = crate::errors::ErrorResponse),
        (status = 404, description = "Customer or room not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Room already booked for these dates", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(payload): Json<CreateReservationInput>,
) -> CreatedResult<reservation::Model> {
    let created = state
        .services
        .reservations
        .create_reservation(payload)
        .await?;
    Ok(created_response(created))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/by-number/{number}",
    params(("number" = String, Path, description = "Reservation number, e.g. RSV-20261018-7KQ2ZD")),
    responses(
        (status = 200, description = "Reservation fetched", body = ApiResponse<reservation::Model>),
        (status = 404, description = "Reservation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn get_reservation_by_number(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> ApiResult<reservation::Model> {
    let found = state.services.reservations.get_by_number(&number).await?;
    Ok(Json(ApiResponse::success(found)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation fetched", body = ApiResponse<reservation::Model>),
        (status = 404, description = "Reservation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<reservation::Model> {
    let found = state.services.reservations.get_reservation(id).await?;
    Ok(Json(ApiResponse::success(found)))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    request_body = UpdateReservationInput,
    responses(
        (status = 200, description = "Reservation amended", body = ApiResponse<reservation::Model>),
        (status = 400, description = "Reservation can no longer be changed", body = crate::errors::ErrorResponse),
        (status = 409, description = "Room already booked for these dates", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn update_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationInput>,
) -> ApiResult<reservation::Model> {
    let updated = state
        .services
        .reservations
        .update_reservation(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    request_body = CancelReservationInput,
    responses(
        (status = 200, description = "Reservation cancelled", body = ApiResponse<reservation::Model>),
        (status = 400, description = "Reservation is not confirmed", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    OptionalJson(payload): OptionalJson<CancelReservationInput>,
) -> ApiResult<reservation::Model> {
    let reason = payload.and_then(|body| body.reason);
    let cancelled = state
        .services
        .reservations
        .cancel_reservation(id, reason)
        .await?;
    Ok(Json(ApiResponse::success(cancelled)))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/no-show",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    request_body = NoShowInput,
    responses(
        (status = 200, description = "Reservation released as no-show", body = ApiResponse<reservation::Model>),
        (status = 400, description = "Arrival day has not passed or reservation is not confirmed", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn mark_no_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    OptionalJson(payload): OptionalJson<NoShowInput>,
) -> ApiResult<reservation::Model> {
    let on = payload.and_then(|body| body.date);
    let updated = state.services.reservations.mark_no_show(id, on).await?;
    Ok(Json(ApiResponse::success(updated)))
}
