use crate::{entities, handlers, services};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hotel Back Office API",
        version = "0.1.0",
        description = r#"
# Hotel Back Office API

Back office for a single hotel property.

## Features

- **Rooms**: Room classes, room inventory and housekeeping status
- **Reservations**: Bookings with overlap detection on half-open stays
- **Front Office**: Check-in, check-out and the daily arrival/departure lists
- **Restaurant**: Menu, stock and orders charged to rooms or paid at the table
- **HR**: Departments, staff records and prorated monthly payroll
- **Assets**: Equipment register and maintenance history
- **Notifications**: Daily job raising operational reminders

## Error Handling

Failing requests return a JSON error body with the HTTP status category, a
message, the request id and a timestamp:

```json
{
  "error": "Conflict",
  "message": "Conflict: Room 204 is already booked between 2026-10-20 and 2026-10-23",
  "request_id": "req-abc123xyz",
  "timestamp": "2026-10-18T10:30:00Z"
}
```

## Pagination

List endpoints accept `page` (default 1) and `limit` (default 20, max 100).
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "rooms", description = "Room classes, rooms and availability"),
        (name = "customers", description = "Guest registry"),
        (name = "reservations", description = "Reservation lifecycle"),
        (name = "front-office", description = "Check-in, check-out and daily lists"),
        (name = "restaurant", description = "Menu, stock and restaurant orders"),
        (name = "hr", description = "Departments, staff and payroll"),
        (name = "assets", description = "Asset register and maintenance"),
        (name = "notifications", description = "Operational reminders")
    ),
    paths(
        // Rooms
        handlers::rooms::list_room_classes,
        handlers::rooms::create_room_class,
        handlers::rooms::get_room_class,
        handlers::rooms::update_room_class,
        handlers::rooms::delete_room_class,
        handlers::rooms::list_rooms,
        handlers::rooms::create_room,
        handlers::rooms::find_available_rooms,
        handlers::rooms::get_room,
        handlers::rooms::update_room,
        handlers::rooms::delete_room,
        handlers::rooms::set_room_status,
        // Customers
        handlers::customers::list_customers,
        handlers::customers::create_customer,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::customers::customer_reservations,
        // Reservations
        handlers::reservations::list_reservations,
        handlers::reservations::create_reservation,
        handlers::reservations::get_reservation_by_number,
        handlers::reservations::get_reservation,
        handlers::reservations::update_reservation,
        handlers::reservations::cancel_reservation,
        handlers::reservations::mark_no_show,
        // Front office
        handlers::front_office::check_in,
        handlers::front_office::check_out,
        handlers::front_office::in_house,
        handlers::front_office::arrivals,
        handlers::front_office::departures,
        // Restaurant
        handlers::restaurant::list_menu_items,
        handlers::restaurant::create_menu_item,
        handlers::restaurant::get_menu_item,
        handlers::restaurant::update_menu_item,
        handlers::restaurant::delete_menu_item,
        handlers::restaurant::adjust_stock,
        handlers::restaurant::list_orders,
        handlers::restaurant::place_order,
        handlers::restaurant::get_order,
        handlers::restaurant::pay_order,
        handlers::restaurant::cancel_order,
        // HR
        handlers::hr::list_departments,
        handlers::hr::create_department,
        handlers::hr::get_department,
        handlers::hr::update_department,
        handlers::hr::delete_department,
        handlers::hr::list_staff,
        handlers::hr::create_staff,
        handlers::hr::get_staff,
        handlers::hr::update_staff,
        handlers::hr::delete_staff,
        handlers::hr::terminate_staff,
        handlers::hr::payroll,
        // Assets
        handlers::assets::list_assets,
        handlers::assets::create_asset,
        handlers::assets::get_asset,
        handlers::assets::update_asset,
        handlers::assets::delete_asset,
        handlers::assets::start_maintenance,
        handlers::assets::retire_asset,
        handlers::assets::list_maintenance,
        handlers::assets::record_maintenance,
        // Notifications
        handlers::notifications::list_notifications,
        handlers::notifications::generate_notifications,
        handlers::notifications::mark_read,
        handlers::notifications::mark_all_read,
    ),
    components(
        schemas(
            // Common types
            crate::ListQuery,
            crate::errors::ErrorResponse,
            // Entities
            entities::room_class::Model,
            entities::room::Model,
            entities::room::RoomStatus,
            entities::customer::Model,
            entities::reservation::Model,
            entities::reservation::ReservationStatus,
            entities::menu_item::Model,
            entities::restaurant_order::Model,
            entities::restaurant_order::OrderStatus,
            entities::restaurant_order_item::Model,
            entities::department::Model,
            entities::staff::Model,
            entities::staff::StaffStatus,
            entities::asset::Model,
            entities::asset::AssetStatus,
            entities::maintenance_log::Model,
            entities::notification::Model,
            entities::notification::NotificationKind,
            entities::notification::Severity,
            // Request and response types
            services::rooms::CreateRoomClassInput,
            services::rooms::UpdateRoomClassInput,
            services::rooms::CreateRoomInput,
            services::rooms::UpdateRoomInput,
            services::rooms::AvailableRoom,
            handlers::rooms::SetRoomStatusRequest,
            services::customers::CreateCustomerInput,
            services::customers::UpdateCustomerInput,
            services::reservations::CreateReservationInput,
            services::reservations::UpdateReservationInput,
            services::reservations::CancelReservationInput,
            services::reservations::NoShowInput,
            services::front_office::BusinessDateInput,
            services::front_office::CheckoutSummary,
            services::restaurant::CreateMenuItemInput,
            services::restaurant::UpdateMenuItemInput,
            services::restaurant::AdjustStockInput,
            services::restaurant::OrderLineInput,
            services::restaurant::PlaceOrderInput,
            services::restaurant::OrderWithItems,
            services::hr::CreateDepartmentInput,
            services::hr::UpdateDepartmentInput,
            services::hr::CreateStaffInput,
            services::hr::UpdateStaffInput,
            services::hr::TerminateStaffInput,
            services::hr::PayrollEntry,
            services::hr::PayrollReport,
            services::assets::CreateAssetInput,
            services::assets::UpdateAssetInput,
            services::assets::RecordMaintenanceInput,
            services::notifications::GenerateInput,
            services::notifications::GenerationReport,
            handlers::notifications::MarkAllReadResponse,
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_area() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Hotel Back Office API"));
        assert!(json.contains("/api/v1/reservations"));
        assert!(json.contains("/api/v1/front-office/check-out/{id}"));
        assert!(json.contains("/api/v1/hr/payroll"));
        assert!(json.contains("/api/v1/notifications/generate"));
    }
}
