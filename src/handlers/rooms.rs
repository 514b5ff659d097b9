use super::common::{created_response, no_content_response, paginated, CreatedResult};
use crate::{
    entities::{
        room::{self, RoomStatus},
        room_class,
    },
    services::rooms::{
        AvailabilityQuery, AvailableRoom, CreateRoomClassInput, CreateRoomInput, RoomFilter,
        UpdateRoomClassInput, UpdateRoomInput,
    },
    ApiResponse, ApiResult, AppState, ListQuery, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetRoomStatusRequest {
    pub status: RoomStatus,
}

pub fn room_class_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_room_classes).post(create_room_class))
        .route(
            "/:id",
            get(get_room_class)
                .put(update_room_class)
                .delete(delete_room_class),
        )
}

pub fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .route("/availability", get(find_available_rooms))
        .route("/:id", get(get_room).put(update_room).delete(delete_room))
        .route("/:id/status", put(set_room_status))
}

#[utoipa::path(
    get,
    path = "/api/v1/room-classes",
    responses(
        (status = 200, description = "Room classes listed", body = ApiResponse<Vec<room_class::Model>>)
    ),
    tag = "rooms"
)]
pub async fn list_room_classes(State(state): State<AppState>) -> ApiResult<Vec<room_class::Model>> {
    let classes = state.services.rooms.list_room_classes().await?;
    Ok(Json(ApiResponse::success(classes)))
}

#[utoipa::path(
    post,
    path = "/api/v1/room-classes",
    request_body = CreateRoomClassInput,
    responses(
        (status = 201, description = "Room class created", body = ApiResponse<room_class::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name already used", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn create_room_class(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoomClassInput>,
) -> CreatedResult<room_class::Model> {
    let class = state.services.rooms.create_room_class(payload).await?;
    Ok(created_response(class))
}

#[utoipa::path(
    get,
    path = "/api/v1/room-classes/{id}",
    params(("id" = Uuid, Path, description = "Room class ID")),
    responses(
        (status = 200, description = "Room class fetched", body = ApiResponse<room_class::Model>),
        (status = 404, description = "Room class not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn get_room_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<room_class::Model> {
    let class = state.services.rooms.get_room_class(id).await?;
    Ok(Json(ApiResponse::success(class)))
}

#[utoipa::path(
    put,
    path = "/api/v1/room-classes/{id}",
    params(("id" = Uuid, Path, description = "Room class ID")),
    request_body = UpdateRoomClassInput,
    responses(
        (status = 200, description = "Room class updated", body = ApiResponse<room_class::Model>),
        (status = 404, description = "Room class not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name already used", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn update_room_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoomClassInput>,
) -> ApiResult<room_class::Model> {
    let class = state.services.rooms.update_room_class(id, payload).await?;
    Ok(Json(ApiResponse::success(class)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/room-classes/{id}",
    params(("id" = Uuid, Path, description = "Room class ID")),
    responses(
        (status = 204, description = "Room class deleted"),
        (status = 409, description = "Rooms still use this class", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn delete_room_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, crate::errors::ServiceError> {
    state.services.rooms.delete_room_class(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    params(ListQuery, RoomFilter),
    responses(
        (status = 200, description = "Rooms listed", body = ApiResponse<PaginatedResponse<room::Model>>)
    ),
    tag = "rooms"
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<RoomFilter>,
) -> ApiResult<PaginatedResponse<room::Model>> {
    let page = query.page();
    let limit = state.config.page_limit(query.limit);
    let (rooms, total) = state.services.rooms.list_rooms(filter, page, limit).await?;
    Ok(Json(ApiResponse::success(paginated(rooms, total, page, limit))))
}

#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    request_body = CreateRoomInput,
    responses(
        (status = 201, description = "Room created", body = ApiResponse<room::Model>),
        (status = 404, description = "Room class not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Room number already used", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn create_room(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoomInput>,
) -> CreatedResult<room::Model> {
    let room = state.services.rooms.create_room(payload).await?;
    Ok(created_response(room))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Rooms free for the whole stay", body = ApiResponse<Vec<AvailableRoom>>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn find_available_rooms(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Vec<AvailableRoom>> {
    let rooms = state.services.rooms.find_available_rooms(query).await?;
    Ok(Json(ApiResponse::success(rooms)))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}",
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room fetched", body = ApiResponse<room::Model>),
        (status = 404, description = "Room not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<room::Model> {
    let room = state.services.rooms.get_room(id).await?;
    Ok(Json(ApiResponse::success(room)))
}

#[utoipa::path(
    put,
    path = "/api/v1/rooms/{id}",
    params(("id" = Uuid, Path, description = "Room ID")),
    request_body = UpdateRoomInput,
    responses(
        (status = 200, description = "Room updated", body = ApiResponse<room::Model>),
        (status = 404, description = "Room not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Room number already used", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoomInput>,
) -> ApiResult<room::Model> {
    let room = state.services.rooms.update_room(id, payload).await?;
    Ok(Json(ApiResponse::success(room)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/rooms/{id}",
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 409, description = "Room has active reservations", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, crate::errors::ServiceError> {
    state.services.rooms.delete_room(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    put,
    path = "/api/v1/rooms/{id}/status",
    params(("id" = Uuid, Path, description = "Room ID")),
    request_body = SetRoomStatusRequest,
    responses(
        (status = 200, description = "Room status changed", body = ApiResponse<room::Model>),
        (status = 400, description = "Transition not allowed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Room not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn set_room_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetRoomStatusRequest>,
) -> ApiResult<room::Model> {
    let room = state
        .services
        .rooms
        .set_room_status(id, payload.status)
        .await?;
    Ok(Json(ApiResponse::success(room)))
}
