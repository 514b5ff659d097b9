use super::common::{created_response, no_content_response, paginated, CreatedResult};
use crate::{
    entities::{asset, maintenance_log},
    errors::ServiceError,
    services::assets::{AssetFilter, CreateAssetInput, RecordMaintenanceInput, UpdateAssetInput},
    ApiResponse, ApiResult, AppState, ListQuery, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

pub fn asset_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assets).post(create_asset))
        .route("/:id", get(get_asset).put(update_asset).delete(delete_asset))
        .route("/:id/start-maintenance", post(start_maintenance))
        .route("/:id/retire", post(retire_asset))
        .route(
            "/:id/maintenance",
            get(list_maintenance).post(record_maintenance),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/assets",
    params(ListQuery, AssetFilter),
    responses(
        (status = 200, description = "Assets listed", body = ApiResponse<PaginatedResponse<asset::Model>>)
    ),
    tag = "assets"
)]
pub async fn list_assets(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<AssetFilter>,
) -> ApiResult<PaginatedResponse<asset::Model>> {
    let page = query.page();
    let limit = state.config.page_limit(query.limit);
    let (items, total) = state.services.assets.list_assets(filter, page, limit).await?;
    Ok(Json(ApiResponse::success(paginated(items, total, page, limit))))
}

#[utoipa::path(
    post,
    path = "/api/v1/assets",
    request_body = CreateAssetInput,
    responses(
        (status = 201, description = "Asset registered", body = ApiResponse<asset::Model>),
        (status = 409, description = "Asset tag already used", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn create_asset(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssetInput>,
) -> CreatedResult<asset::Model> {
    let created = state.services.assets.create_asset(payload).await?;
    Ok(created_response(created))
}

#[utoipa::path(
    get,
    path = "/api/v1/assets/{id}",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset fetched", body = ApiResponse<asset::Model>),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<asset::Model> {
    let found = state.services.assets.get_asset(id).await?;
    Ok(Json(ApiResponse::success(found)))
}

#[utoipa::path(
    put,
    path = "/api/v1/assets/{id}",
    params(("id" = Uuid, Path, description = "Asset ID")),
    request_body = UpdateAssetInput,
    responses(
        (status = 200, description = "Asset updated", body = ApiResponse<asset::Model>),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAssetInput>,
) -> ApiResult<asset::Model> {
    let updated = state.services.assets.update_asset(id, payload).await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/assets/{id}",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 204, description = "Asset and its maintenance history deleted"),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.assets.delete_asset(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/assets/{id}/start-maintenance",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset under maintenance", body = ApiResponse<asset::Model>),
        (status = 400, description = "Asset is retired", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn start_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<asset::Model> {
    let updated = state.services.assets.start_maintenance(id).await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    post,
    path = "/api/v1/assets/{id}/retire",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset retired", body = ApiResponse<asset::Model>),
        (status = 400, description = "Asset already retired", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn retire_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<asset::Model> {
    let updated = state.services.assets.retire(id).await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/assets/{id}/maintenance",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Maintenance history, latest first", body = ApiResponse<Vec<maintenance_log::Model>>),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn list_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<maintenance_log::Model>> {
    let logs = state.services.assets.list_maintenance(id).await?;
    Ok(Json(ApiResponse::success(logs)))
}

#[utoipa::path(
    post,
    path = "/api/v1/assets/{id}/maintenance",
    params(("id" = Uuid, Path, description = "Asset ID")),
    request_body = RecordMaintenanceInput,
    responses(
        (status = 201, description = "Maintenance recorded", body = ApiResponse<maintenance_log::Model>),
        (status = 400, description = "Maintenance date in the future", body = crate::errors::ErrorResponse),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn record_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordMaintenanceInput>,
) -> CreatedResult<maintenance_log::Model> {
    let log = state.services.assets.record_maintenance(id, payload).await?;
    Ok(created_response(log))
}
