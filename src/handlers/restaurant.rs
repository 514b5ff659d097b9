use super::common::{created_response, no_content_response, paginated, CreatedResult};
use crate::{
    entities::{menu_item, restaurant_order},
    errors::ServiceError,
    services::restaurant::{
        AdjustStockInput, CreateMenuItemInput, MenuItemFilter, OrderFilter, OrderWithItems,
        PlaceOrderInput, UpdateMenuItemInput,
    },
    ApiResponse, ApiResult, AppState, ListQuery, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/menu-items", get(list_menu_items).post(create_menu_item))
        .route(
            "/menu-items/:id",
            get(get_menu_item)
                .put(update_menu_item)
                .delete(delete_menu_item),
        )
        .route("/menu-items/:id/stock", post(adjust_stock))
        .route("/orders", get(list_orders).post(place_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/pay", post(pay_order))
        .route("/orders/:id/cancel", post(cancel_order))
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurant/menu-items",
    params(ListQuery, MenuItemFilter),
    responses(
        (status = 200, description = "Menu listed", body = ApiResponse<PaginatedResponse<menu_item::Model>>)
    ),
    tag = "restaurant"
)]
pub async fn list_menu_items(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<MenuItemFilter>,
) -> ApiResult<PaginatedResponse<menu_item::Model>> {
    let page = query.page();
    let limit = state.config.page_limit(query.limit);
    let (items, total) = state
        .services
        .restaurant
        .list_menu_items(filter, page, limit)
        .await?;
    Ok(Json(ApiResponse::success(paginated(items, total, page, limit))))
}

#[utoipa::path(
    post,
    path = "/api/v1/restaurant/menu-items",
    request_body = CreateMenuItemInput,
    responses(
        (status = 201, description = "Menu item created", body = ApiResponse<menu_item::Model>),
        (status = 409, description = "Name already used", body = crate::errors::ErrorResponse)
    ),
    tag = "restaurant"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateMenuItemInput>,
) -> CreatedResult<menu_item::Model> {
    let item = state.services.restaurant.create_menu_item(payload).await?;
    Ok(created_response(item))
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurant/menu-items/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item fetched", body = ApiResponse<menu_item::Model>),
        (status = 404, description = "Menu item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "restaurant"
)]
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<menu_item::Model> {
    let item = state.services.restaurant.get_menu_item(id).await?;
    Ok(Json(ApiResponse::success(item)))
}

#[utoipa::path(
    put,
    path = "/api/v1/restaurant/menu-items/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    request_body = UpdateMenuItemInput,
    responses(
        (status = 200, description = "Menu item updated", body = ApiResponse<menu_item::Model>),
        (status = 404, description = "Menu item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "restaurant"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuItemInput>,
) -> ApiResult<menu_item::Model> {
    let item = state
        .services
        .restaurant
        .update_menu_item(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(item)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/restaurant/menu-items/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 204, description = "Menu item deleted"),
        (status = 409, description = "Menu item appears on orders", body = crate::errors::ErrorResponse)
    ),
    tag = "restaurant"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.restaurant.delete_menu_item(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/restaurant/menu-items/{id}/stock",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    request_body = AdjustStockInput,
    responses(
        (status = 200, description = "Stock adjusted", body = ApiResponse<menu_item::Model>),
        (status = 400, description = "Stock would become negative", body = crate::errors::ErrorResponse)
    ),
    tag = "restaurant"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustStockInput>,
) -> ApiResult<menu_item::Model> {
    let item = state.services.restaurant.adjust_stock(id, payload).await?;
    Ok(Json(ApiResponse::success(item)))
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurant/orders",
    params(ListQuery, OrderFilter),
    responses(
        (status = 200, description = "Orders listed", body = ApiResponse<PaginatedResponse<restaurant_order::Model>>)
    ),
    tag = "restaurant"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<OrderFilter>,
) -> ApiResult<PaginatedResponse<restaurant_order::Model>> {
    let page = query.page();
    let limit = state.config.page_limit(query.limit);
    let (orders, total) = state
        .services
        .restaurant
        .list_orders(filter, page, limit)
        .await?;
    Ok(Json(ApiResponse::success(paginated(orders, total, page, limit))))
}

#[utoipa::path(
    post,
    path = "/api/v1/restaurant/orders",
    request_body = PlaceOrderInput,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Insufficient stock or guest not in house", body = crate::errors::ErrorResponse),
        (status = 404, description = "Menu item or reservation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "restaurant"
)]
pub async fn place_order(
    State(state): State<AppState>,
    Json(payload): Json<PlaceOrderInput>,
) -> CreatedResult<OrderWithItems> {
    let order = state.services.restaurant.place_order(payload).await?;
    Ok(created_response(order))
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurant/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with its lines", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "restaurant"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderWithItems> {
    let order = state.services.restaurant.get_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    post,
    path = "/api/v1/restaurant/orders/{id}/pay",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order paid", body = ApiResponse<restaurant_order::Model>),
        (status = 400, description = "Order is not open", body = crate::errors::ErrorResponse)
    ),
    tag = "restaurant"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<restaurant_order::Model> {
    let order = state.services.restaurant.pay_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    post,
    path = "/api/v1/restaurant/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled and stock restored", body = ApiResponse<restaurant_order::Model>),
        (status = 400, description = "Order already paid or settled", body = crate::errors::ErrorResponse)
    ),
    tag = "restaurant"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<restaurant_order::Model> {
    let order = state.services.restaurant.cancel_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}
