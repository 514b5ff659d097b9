use super::common::{paginated, OptionalJson};
use crate::{
    entities::notification,
    services::{
        business_date,
        notifications::{GenerateInput, GenerationReport, NotificationFilter},
    },
    ApiResponse, ApiResult, AppState, ListQuery, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/generate", post(generate_notifications))
        .route("/read-all", post(mark_all_read))
        .route("/:id/read", post(mark_read))
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(ListQuery, NotificationFilter),
    responses(
        (status = 200, description = "Notifications, newest first", body = ApiResponse<PaginatedResponse<notification::Model>>)
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<NotificationFilter>,
) -> ApiResult<PaginatedResponse<notification::Model>> {
    let page = query.page();
    let limit = state.config.page_limit(query.limit);
    let (items, total) = state
        .services
        .notifications
        .list(filter, page, limit)
        .await?;
    Ok(Json(ApiResponse::success(paginated(items, total, page, limit))))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications/generate",
    request_body = GenerateInput,
    responses(
        (status = 200, description = "Job run report", body = ApiResponse<GenerationReport>)
    ),
    tag = "notifications"
)]
pub async fn generate_notifications(
    State(state): State<AppState>,
    OptionalJson(payload): OptionalJson<GenerateInput>,
) -> ApiResult<GenerationReport> {
    let today = business_date(payload.and_then(|body| body.date));
    let report = state.services.notifications.generate(today).await?;
    Ok(Json(ApiResponse::success(report)))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked as read", body = ApiResponse<notification::Model>),
        (status = 404, description = "Notification not found", body = crate::errors::ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<notification::Model> {
    let updated = state.services.notifications.mark_read(id).await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    responses(
        (status = 200, description = "Unread notifications marked as read", body = ApiResponse<MarkAllReadResponse>)
    ),
    tag = "notifications"
)]
pub async fn mark_all_read(State(state): State<AppState>) -> ApiResult<MarkAllReadResponse> {
    let updated = state.services.notifications.mark_all_read().await?;
    Ok(Json(ApiResponse::success(MarkAllReadResponse { updated })))
}
