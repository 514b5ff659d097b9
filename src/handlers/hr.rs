use super::common::{
    created_response, no_content_response, paginated, CreatedResult, OptionalJson,
};
use crate::{
    entities::{department, staff},
    errors::ServiceError,
    services::hr::{
        CreateDepartmentInput, CreateStaffInput, PayrollQuery, PayrollReport, StaffFilter,
        TerminateStaffInput, UpdateDepartmentInput, UpdateStaffInput,
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

pub fn hr_routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/:id",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
        .route("/staff", get(list_staff).post(create_staff))
        .route(
            "/staff/:id",
            get(get_staff).put(update_staff).delete(delete_staff),
        )
        .route("/staff/:id/terminate", post(terminate_staff))
        .route("/payroll", get(payroll))
}

#[utoipa::path(
    get,
    path = "/api/v1/hr/departments",
    responses(
        (status = 200, description = "Departments listed", body = ApiResponse<Vec<department::Model>>)
    ),
    tag = "hr"
)]
pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Vec<department::Model>> {
    let departments = state.services.hr.list_departments().await?;
    Ok(Json(ApiResponse::success(departments)))
}

#[utoipa::path(
    post,
    path = "/api/v1/hr/departments",
    request_body = CreateDepartmentInput,
    responses(
        (status = 201, description = "Department created", body = ApiResponse<department::Model>),
        (status = 409, description = "Name already used", body = crate::errors::ErrorResponse)
    ),
    tag = "hr"
)]
pub async fn create_department(
    State(state): State<AppState>,
    Json(payload): Json<CreateDepartmentInput>,
) -> CreatedResult<department::Model> {
    let department = state.services.hr.create_department(payload).await?;
    Ok(created_response(department))
}

#[utoipa::path(
    get,
    path = "/api/v1/hr/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department fetched", body = ApiResponse<department::Model>),
        (status = 404, description = "Department not found", body = crate::errors::ErrorResponse)
    ),
    tag = "hr"
)]
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<department::Model> {
    let department = state.services.hr.get_department(id).await?;
    Ok(Json(ApiResponse::success(department)))
}

#[utoipa::path(
    put,
    path = "/api/v1/hr/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = UpdateDepartmentInput,
    responses(
        (status = 200, description = "Department updated", body = ApiResponse<department::Model>),
        (status = 409, description = "Name already used", body = crate::errors::ErrorResponse)
    ),
    tag = "hr"
)]
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDepartmentInput>,
) -> ApiResult<department::Model> {
    let department = state.services.hr.update_department(id, payload).await?;
    Ok(Json(ApiResponse::success(department)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/hr/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 409, description = "Department still has staff", body = crate::errors::ErrorResponse)
    ),
    tag = "hr"
)]
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.hr.delete_department(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/hr/staff",
    params(ListQuery, StaffFilter),
    responses(
        (status = 200, description = "Staff listed", body = ApiResponse<PaginatedResponse<staff::Model>>)
    ),
    tag = "hr"
)]
pub async fn list_staff(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<StaffFilter>,
) -> ApiResult<PaginatedResponse<staff::Model>> {
    let page = query.page();
    let limit = state.config.page_limit(query.limit);
    let (members, total) = state.services.hr.list_staff(filter, page, limit).await?;
    Ok(Json(ApiResponse::success(paginated(members, total, page, limit))))
}

#[utoipa::path(
    post,
    path = "/api/v1/hr/staff",
    request_body = CreateStaffInput,
    responses(
        (status = 201, description = "Staff member hired", body = ApiResponse<staff::Model>),
        (status = 404, description = "Department not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Employee number already assigned", body = crate::errors::ErrorResponse)
    ),
    tag = "hr"
)]
pub async fn create_staff(
    State(state): State<AppState>,
    Json(payload): Json<CreateStaffInput>,
) -> CreatedResult<staff::Model> {
    let member = state.services.hr.create_staff(payload).await?;
    Ok(created_response(member))
}

#[utoipa::path(
    get,
    path = "/api/v1/hr/staff/{id}",
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff member fetched", body = ApiResponse<staff::Model>),
        (status = 404, description = "Staff member not found", body = crate::errors::ErrorResponse)
    ),
    tag = "hr"
)]
pub async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<staff::Model> {
    let member = state.services.hr.get_staff(id).await?;
    Ok(Json(ApiResponse::success(member)))
}

#[utoipa::path(
    put,
    path = "/api/v1/hr/staff/{id}",
    params(("id" = Uuid, Path, description = "Staff ID")),
    request_body = UpdateStaffInput,
    responses(
        (status = 200, description = "Employee record updated", body = ApiResponse<staff::Model>),
        (status = 404, description = "Staff member or department not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Employee number already assigned", body = crate::errors::ErrorResponse)
    ),
    tag = "hr"
)]
pub async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStaffInput>,
) -> ApiResult<staff::Model> {
    let member = state.services.hr.update_employee(id, payload).await?;
    Ok(Json(ApiResponse::success(member)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/hr/staff/{id}",
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 204, description = "Staff member deleted"),
        (status = 404, description = "Staff member not found", body = crate::errors::ErrorResponse)
    ),
    tag = "hr"
)]
pub async fn delete_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.hr.delete_staff(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/hr/staff/{id}/terminate",
    params(("id" = Uuid, Path, description = "Staff ID")),
    request_body = TerminateStaffInput,
    responses(
        (status = 200, description = "Employment ended", body = ApiResponse<staff::Model>),
        (status = 400, description = "Termination precedes hire date or already terminated", body = crate::errors::ErrorResponse)
    ),
    tag = "hr"
)]
pub async fn terminate_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    OptionalJson(payload): OptionalJson<TerminateStaffInput>,
) -> ApiResult<staff::Model> {
    let date = payload.and_then(|body| body.termination_date);
    let member = state.services.hr.terminate(id, date).await?;
    Ok(Json(ApiResponse::success(member)))
}

#[utoipa::path(
    get,
    path = "/api/v1/hr/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, description = "Prorated gross pay for the month", body = ApiResponse<PayrollReport>),
        (status = 400, description = "Invalid month", body = crate::errors::ErrorResponse)
    ),
    tag = "hr"
)]
pub async fn payroll(
    State(state): State<AppState>,
    Query(query): Query<PayrollQuery>,
) -> ApiResult<PayrollReport> {
    let report = state.services.hr.payroll(query.year, query.month).await?;
    Ok(Json(ApiResponse::success(report)))
}
