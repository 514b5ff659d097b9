use anyhow::Result;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::prelude::*;
use std::time::Duration;
use tracing::{error, info};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_rooms_tables::Migration),
            Box::new(m20240101_000002_create_customers_table::Migration),
            Box::new(m20240101_000003_create_reservations_table::Migration),
            Box::new(m20240101_000004_create_restaurant_tables::Migration),
            Box::new(m20240101_000005_create_hr_tables::Migration),
            Box::new(m20240101_000006_create_asset_tables::Migration),
            Box::new(m20240101_000007_create_notifications_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_rooms_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_rooms_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RoomClasses::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(RoomClasses::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(RoomClasses::Name).string().not_null())
                        .col(ColumnDef::new(RoomClasses::Description).text().null())
                        .col(
                            ColumnDef::new(RoomClasses::BaseRate)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RoomClasses::Capacity)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(RoomClasses::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RoomClasses::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_room_classes_name")
                        .table(RoomClasses::Table)
                        .col(RoomClasses::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Rooms::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Rooms::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Rooms::RoomNumber).string().not_null())
                        .col(ColumnDef::new(Rooms::RoomClassId).uuid().not_null())
                        .col(ColumnDef::new(Rooms::Floor).integer().not_null().default(0))
                        .col(
                            ColumnDef::new(Rooms::Status)
                                .string_len(20)
                                .not_null()
                                .default("available"),
                        )
                        .col(ColumnDef::new(Rooms::Notes).text().null())
                        .col(
                            ColumnDef::new(Rooms::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Rooms::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_rooms_room_class")
                                .from(Rooms::Table, Rooms::RoomClassId)
                                .to(RoomClasses::Table, RoomClasses::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rooms_room_number")
                        .table(Rooms::Table)
                        .col(Rooms::RoomNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rooms_status")
                        .table(Rooms::Table)
                        .col(Rooms::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Rooms::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RoomClasses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum RoomClasses {
        Table,
        Id,
        Name,
        Description,
        BaseRate,
        Capacity,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Rooms {
        Table,
        Id,
        RoomNumber,
        RoomClassId,
        Floor,
        Status,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_customers_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_customers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Customers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Customers::IdentityNumber).string().not_null())
                        .col(ColumnDef::new(Customers::FirstName).string().not_null())
                        .col(ColumnDef::new(Customers::LastName).string().not_null())
                        .col(ColumnDef::new(Customers::Email).string().null())
                        .col(ColumnDef::new(Customers::Phone).string().null())
                        .col(ColumnDef::new(Customers::Nationality).string().null())
                        .col(ColumnDef::new(Customers::DateOfBirth).date().null())
                        .col(ColumnDef::new(Customers::Address).text().null())
                        .col(
                            ColumnDef::new(Customers::IsVip)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Customers::Notes).text().null())
                        .col(
                            ColumnDef::new(Customers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Customers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customers_identity_number")
                        .table(Customers::Table)
                        .col(Customers::IdentityNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customers_last_name")
                        .table(Customers::Table)
                        .col(Customers::LastName)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Customers {
        Table,
        Id,
        IdentityNumber,
        FirstName,
        LastName,
        Email,
        Phone,
        Nationality,
        DateOfBirth,
        Address,
        IsVip,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_reservations_table {

    use super::m20240101_000001_create_rooms_tables::Rooms;
    use super::m20240101_000002_create_customers_table::Customers;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_reservations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Reservations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Reservations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::ReservationNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Reservations::CustomerId).uuid().not_null())
                        .col(ColumnDef::new(Reservations::RoomId).uuid().not_null())
                        .col(ColumnDef::new(Reservations::CheckInDate).date().not_null())
                        .col(ColumnDef::new(Reservations::CheckOutDate).date().not_null())
                        .col(
                            ColumnDef::new(Reservations::Adults)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(Reservations::Children)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Reservations::Status)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::NightlyRate)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::RoomCharge)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Reservations::ExtraCharges)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Reservations::TotalAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Reservations::SpecialRequests).text().null())
                        .col(
                            ColumnDef::new(Reservations::CheckedInAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::CheckedOutAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::CancelledAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::CancellationReason)
                                .text()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_reservations_customer")
                                .from(Reservations::Table, Reservations::CustomerId)
                                .to(Customers::Table, Customers::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_reservations_room")
                                .from(Reservations::Table, Reservations::RoomId)
                                .to(Rooms::Table, Rooms::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_reservations_number")
                        .table(Reservations::Table)
                        .col(Reservations::ReservationNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            // Overlap checks filter by room and then compare the date range
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_reservations_room_dates")
                        .table(Reservations::Table)
                        .col(Reservations::RoomId)
                        .col(Reservations::CheckInDate)
                        .col(Reservations::CheckOutDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_reservations_customer_id")
                        .table(Reservations::Table)
                        .col(Reservations::CustomerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_reservations_status")
                        .table(Reservations::Table)
                        .col(Reservations::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Reservations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Reservations {
        Table,
        Id,
        ReservationNumber,
        CustomerId,
        RoomId,
        CheckInDate,
        CheckOutDate,
        Adults,
        Children,
        Status,
        NightlyRate,
        RoomCharge,
        ExtraCharges,
        TotalAmount,
        SpecialRequests,
        CheckedInAt,
        CheckedOutAt,
        CancelledAt,
        CancellationReason,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_restaurant_tables {

    use super::m20240101_000003_create_reservations_table::Reservations;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_restaurant_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MenuItems::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(MenuItems::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(MenuItems::Name).string().not_null())
                        .col(ColumnDef::new(MenuItems::Category).string().not_null())
                        .col(ColumnDef::new(MenuItems::Description).text().null())
                        .col(ColumnDef::new(MenuItems::Price).decimal_len(12, 2).not_null())
                        .col(
                            ColumnDef::new(MenuItems::StockQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MenuItems::ReorderLevel)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MenuItems::IsAvailable)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(MenuItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MenuItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_menu_items_name")
                        .table(MenuItems::Table)
                        .col(MenuItems::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RestaurantOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RestaurantOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RestaurantOrders::OrderNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RestaurantOrders::TableNumber).string().null())
                        .col(ColumnDef::new(RestaurantOrders::ReservationId).uuid().null())
                        .col(
                            ColumnDef::new(RestaurantOrders::Status)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RestaurantOrders::TotalAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(RestaurantOrders::Notes).text().null())
                        .col(
                            ColumnDef::new(RestaurantOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RestaurantOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_restaurant_orders_reservation")
                                .from(RestaurantOrders::Table, RestaurantOrders::ReservationId)
                                .to(Reservations::Table, Reservations::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_restaurant_orders_number")
                        .table(RestaurantOrders::Table)
                        .col(RestaurantOrders::OrderNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_restaurant_orders_reservation_id")
                        .table(RestaurantOrders::Table)
                        .col(RestaurantOrders::ReservationId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RestaurantOrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RestaurantOrderItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RestaurantOrderItems::OrderId).uuid().not_null())
                        .col(
                            ColumnDef::new(RestaurantOrderItems::MenuItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RestaurantOrderItems::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RestaurantOrderItems::UnitPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RestaurantOrderItems::LineTotal)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_restaurant_order_items_order")
                                .from(RestaurantOrderItems::Table, RestaurantOrderItems::OrderId)
                                .to(RestaurantOrders::Table, RestaurantOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_restaurant_order_items_menu_item")
                                .from(
                                    RestaurantOrderItems::Table,
                                    RestaurantOrderItems::MenuItemId,
                                )
                                .to(MenuItems::Table, MenuItems::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_restaurant_order_items_order_id")
                        .table(RestaurantOrderItems::Table)
                        .col(RestaurantOrderItems::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RestaurantOrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RestaurantOrders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MenuItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum MenuItems {
        Table,
        Id,
        Name,
        Category,
        Description,
        Price,
        StockQuantity,
        ReorderLevel,
        IsAvailable,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum RestaurantOrders {
        Table,
        Id,
        OrderNumber,
        TableNumber,
        ReservationId,
        Status,
        TotalAmount,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum RestaurantOrderItems {
        Table,
        Id,
        OrderId,
        MenuItemId,
        Quantity,
        UnitPrice,
        LineTotal,
    }
}

mod m20240101_000005_create_hr_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_hr_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Departments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Departments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Departments::Name).string().not_null())
                        .col(ColumnDef::new(Departments::Description).text().null())
                        .col(
                            ColumnDef::new(Departments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Departments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_departments_name")
                        .table(Departments::Table)
                        .col(Departments::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Staff::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Staff::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Staff::EmployeeNumber).string().not_null())
                        .col(ColumnDef::new(Staff::FirstName).string().not_null())
                        .col(ColumnDef::new(Staff::LastName).string().not_null())
                        .col(ColumnDef::new(Staff::Email).string().null())
                        .col(ColumnDef::new(Staff::Phone).string().null())
                        .col(ColumnDef::new(Staff::Position).string().not_null())
                        .col(ColumnDef::new(Staff::DepartmentId).uuid().not_null())
                        .col(ColumnDef::new(Staff::HireDate).date().not_null())
                        .col(ColumnDef::new(Staff::ContractEndDate).date().null())
                        .col(ColumnDef::new(Staff::BaseSalary).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(Staff::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Staff::TerminationDate).date().null())
                        .col(
                            ColumnDef::new(Staff::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Staff::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_staff_department")
                                .from(Staff::Table, Staff::DepartmentId)
                                .to(Departments::Table, Departments::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_staff_employee_number")
                        .table(Staff::Table)
                        .col(Staff::EmployeeNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_staff_department_id")
                        .table(Staff::Table)
                        .col(Staff::DepartmentId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Staff::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Departments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Departments {
        Table,
        Id,
        Name,
        Description,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Staff {
        Table,
        Id,
        EmployeeNumber,
        FirstName,
        LastName,
        Email,
        Phone,
        Position,
        DepartmentId,
        HireDate,
        ContractEndDate,
        BaseSalary,
        Status,
        TerminationDate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000006_create_asset_tables {

    use super::m20240101_000001_create_rooms_tables::Rooms;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_asset_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Assets::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Assets::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Assets::AssetTag).string().not_null())
                        .col(ColumnDef::new(Assets::Name).string().not_null())
                        .col(ColumnDef::new(Assets::Category).string().not_null())
                        .col(ColumnDef::new(Assets::Location).string().null())
                        .col(ColumnDef::new(Assets::RoomId).uuid().null())
                        .col(ColumnDef::new(Assets::PurchaseDate).date().null())
                        .col(ColumnDef::new(Assets::PurchaseCost).decimal_len(12, 2).null())
                        .col(ColumnDef::new(Assets::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Assets::MaintenanceIntervalDays).integer().null())
                        .col(ColumnDef::new(Assets::LastMaintenanceDate).date().null())
                        .col(ColumnDef::new(Assets::NextMaintenanceDate).date().null())
                        .col(ColumnDef::new(Assets::WarrantyExpiryDate).date().null())
                        .col(ColumnDef::new(Assets::Notes).text().null())
                        .col(
                            ColumnDef::new(Assets::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Assets::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_assets_room")
                                .from(Assets::Table, Assets::RoomId)
                                .to(Rooms::Table, Rooms::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_assets_asset_tag")
                        .table(Assets::Table)
                        .col(Assets::AssetTag)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_assets_next_maintenance_date")
                        .table(Assets::Table)
                        .col(Assets::NextMaintenanceDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MaintenanceLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaintenanceLogs::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaintenanceLogs::AssetId).uuid().not_null())
                        .col(ColumnDef::new(MaintenanceLogs::PerformedOn).date().not_null())
                        .col(ColumnDef::new(MaintenanceLogs::Description).text().not_null())
                        .col(ColumnDef::new(MaintenanceLogs::Cost).decimal_len(12, 2).null())
                        .col(ColumnDef::new(MaintenanceLogs::PerformedBy).string().null())
                        .col(
                            ColumnDef::new(MaintenanceLogs::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_maintenance_logs_asset")
                                .from(MaintenanceLogs::Table, MaintenanceLogs::AssetId)
                                .to(Assets::Table, Assets::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_maintenance_logs_asset_id")
                        .table(MaintenanceLogs::Table)
                        .col(MaintenanceLogs::AssetId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MaintenanceLogs::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Assets::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Assets {
        Table,
        Id,
        AssetTag,
        Name,
        Category,
        Location,
        RoomId,
        PurchaseDate,
        PurchaseCost,
        Status,
        MaintenanceIntervalDays,
        LastMaintenanceDate,
        NextMaintenanceDate,
        WarrantyExpiryDate,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum MaintenanceLogs {
        Table,
        Id,
        AssetId,
        PerformedOn,
        Description,
        Cost,
        PerformedBy,
        CreatedAt,
    }
}

mod m20240101_000007_create_notifications_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_notifications_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Notifications::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Notifications::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Notifications::Kind).string_len(32).not_null())
                        .col(
                            ColumnDef::new(Notifications::Severity)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Notifications::Title).string().not_null())
                        .col(ColumnDef::new(Notifications::Message).text().not_null())
                        .col(
                            ColumnDef::new(Notifications::ReferenceType)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Notifications::ReferenceId).uuid().not_null())
                        .col(ColumnDef::new(Notifications::DueDate).date().not_null())
                        .col(
                            ColumnDef::new(Notifications::IsRead)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Notifications::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Notifications::ReadAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            // One alert per subject and due date, whatever the number of job runs
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_notifications_dedup")
                        .table(Notifications::Table)
                        .col(Notifications::Kind)
                        .col(Notifications::ReferenceId)
                        .col(Notifications::DueDate)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_notifications_is_read")
                        .table(Notifications::Table)
                        .col(Notifications::IsRead)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Notifications::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Notifications {
        Table,
        Id,
        Kind,
        Severity,
        Title,
        Message,
        ReferenceType,
        ReferenceId,
        DueDate,
        IsRead,
        CreatedAt,
        ReadAt,
    }
}

// Database migration CLI runner
pub async fn run_migration(db_url: &str) -> Result<()> {
    info!("Setting up database connection for migrations");

    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(4)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;

    info!("Running database migrations");

    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Migration failed: {}", e);
            Err(e.into())
        }
    }
}
