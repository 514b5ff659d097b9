use super::common::{created_response, no_content_response, paginated, CreatedResult};
use crate::{
    entities::{customer, reservation},
    errors::ServiceError,
    services::customers::{CreateCustomerInput, CustomerFilter, UpdateCustomerInput},
    ApiResponse, ApiResult, AppState, ListQuery, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/:id/reservations", get(customer_reservations))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers",
    params(ListQuery, CustomerFilter),
    responses(
        (status = 200, description = "Customers listed", body = ApiResponse<PaginatedResponse<customer::Model>>)
    ),
    tag = "customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<CustomerFilter>,
) -> ApiResult<PaginatedResponse<customer::Model>> {
    let page = query.page();
    let limit = state.config.page_limit(query.limit);
    let (customers, total) = state
        .services
        .customers
        .list_customers(filter, page, limit)
        .await?;
    Ok(Json(ApiResponse::success(paginated(
        customers, total, page, limit,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CreateCustomerInput,
    responses(
        (status = 201, description = "Customer registered", body = ApiResponse<customer::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Identity number already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerInput>,
) -> CreatedResult<customer::Model> {
    let customer = state.services.customers.create_customer(payload).await?;
    Ok(created_response(customer))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer fetched", body = ApiResponse<customer::Model>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<customer::Model> {
    let customer = state.services.customers.get_customer(id).await?;
    Ok(Json(ApiResponse::success(customer)))
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = UpdateCustomerInput,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<customer::Model>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Identity number already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerInput>,
) -> ApiResult<customer::Model> {
    let customer = state
        .services
        .customers
        .update_customer(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(customer)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Customer has reservations", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.customers.delete_customer(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}/reservations",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Reservation history", body = ApiResponse<Vec<reservation::Model>>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn customer_reservations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<reservation::Model>> {
    let history = state.services.customers.customer_reservations(id).await?;
    Ok(Json(ApiResponse::success(history)))
}
