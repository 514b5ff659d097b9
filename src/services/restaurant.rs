use crate::{
    db::DbPool,
    entities::{
        menu_item,
        reservation::{self, ReservationStatus},
        restaurant_order::{self, OrderStatus},
        restaurant_order_item,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::non_negative_decimal,
};
use chrono::{NaiveDate, Utc};
use metrics::counter;
use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, UpdateMany,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateMenuItemInput {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Club Sandwich")]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    #[schema(example = "mains")]
    pub category: String,
    pub description: Option<String>,
    #[validate(custom = "non_negative_decimal")]
    #[schema(value_type = String, example = "14.50")]
    pub price: Decimal,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock_quantity: i32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub reorder_level: i32,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateMenuItemInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "non_negative_decimal")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub reorder_level: Option<i32>,
    pub is_available: Option<bool>,
}

/// Largest quantity a single manual adjustment may add or remove
pub const MAX_STOCK_ADJUSTMENT: u32 = 1_000_000;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct AdjustStockInput {
    /// Positive for deliveries, negative for wastage or corrections
    #[schema(example = -3)]
    pub delta: i32,
    #[validate(length(max = 255))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
pub struct MenuItemFilter {
    pub category: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct OrderLineInput {
    pub menu_item_id: Uuid,
    #[validate(range(min = 1, max = 100))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct PlaceOrderInput {
    #[schema(example = "T12")]
    pub table_number: Option<String>,
    /// Charge the order to this in-house reservation
    pub reservation_id: Option<Uuid>,
    pub notes: Option<String>,
    #[validate(length(min = 1))]
    pub items: Vec<OrderLineInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub reservation_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderWithItems {
    pub order: restaurant_order::Model,
    pub items: Vec<restaurant_order_item::Model>,
}

/// Restaurant point of sale: menu, stock and tickets
#[derive(Clone)]
pub struct RestaurantService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl RestaurantService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input))]
    pub async fn create_menu_item(
        &self,
        input: CreateMenuItemInput,
    ) -> Result<menu_item::Model, ServiceError> {
        input.validate()?;
        self.ensure_name_free(&input.name, None).await?;

        let now = Utc::now();
        let model = menu_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            category: Set(input.category),
            description: Set(input.description),
            price: Set(input.price),
            stock_quantity: Set(input.stock_quantity),
            reorder_level: Set(input.reorder_level),
            is_available: Set(input.is_available),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        info!(menu_item_id = %model.id, "Menu item created");
        Ok(model)
    }

    pub async fn get_menu_item(&self, id: Uuid) -> Result<menu_item::Model, ServiceError> {
        menu_item::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Menu item {id} not found")))
    }

    pub async fn list_menu_items(
        &self,
        filter: MenuItemFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<menu_item::Model>, u64), ServiceError> {
        let mut query = menu_item::Entity::find();
        if let Some(category) = filter.category {
            query = query.filter(menu_item::Column::Category.eq(category));
        }
        if let Some(is_available) = filter.is_available {
            query = query.filter(menu_item::Column::IsAvailable.eq(is_available));
        }

        let paginator = query
            .order_by_asc(menu_item::Column::Category)
            .order_by_asc(menu_item::Column::Name)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_menu_item(
        &self,
        id: Uuid,
        input: UpdateMenuItemInput,
    ) -> Result<menu_item::Model, ServiceError> {
        input.validate()?;
        let current = self.get_menu_item(id).await?;
        if let Some(name) = input.name.as_deref() {
            self.ensure_name_free(name, Some(id)).await?;
        }

        let mut active: menu_item::ActiveModel = current.into();
        if let Some(v) = input.name {
            active.name = Set(v);
        }
        if let Some(v) = input.category {
            active.category = Set(v);
        }
        if let Some(v) = input.description {
            active.description = Set(Some(v));
        }
        if let Some(v) = input.price {
            active.price = Set(v);
        }
        if let Some(v) = input.reorder_level {
            active.reorder_level = Set(v);
        }
        if let Some(v) = input.is_available {
            active.is_available = Set(v);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_menu_item(&self, id: Uuid) -> Result<(), ServiceError> {
        let item = self.get_menu_item(id).await?;
        let used = restaurant_order_item::Entity::find()
            .filter(restaurant_order_item::Column::MenuItemId.eq(id))
            .count(&*self.db)
            .await?;
        if used > 0 {
            return Err(ServiceError::Conflict(format!(
                "Menu item '{}' appears on {used} order line(s); mark it unavailable instead",
                item.name
            )));
        }

        menu_item::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn adjust_stock(
        &self,
        id: Uuid,
        input: AdjustStockInput,
    ) -> Result<menu_item::Model, ServiceError> {
        input.validate()?;
        if input.delta.unsigned_abs() > MAX_STOCK_ADJUSTMENT {
            return Err(ServiceError::ValidationError(format!(
                "stock adjustment must be between -{MAX_STOCK_ADJUSTMENT} and {MAX_STOCK_ADJUSTMENT}"
            )));
        }

        let shifted = stock_shift(id, input.delta).exec(&*self.db).await?;
        if shifted.rows_affected == 0 {
            let item = self.get_menu_item(id).await?;
            if input.delta >= 0 {
                return Err(ServiceError::ValidationError(format!(
                    "'{}' cannot hold {} more units",
                    item.name, input.delta
                )));
            }
            return Err(ServiceError::InsufficientStock(format!(
                "'{}' has {} in stock, cannot remove {}",
                item.name,
                item.stock_quantity,
                input.delta.unsigned_abs()
            )));
        }

        let updated = self.get_menu_item(id).await?;
        let new_quantity = updated.stock_quantity;
        let crossed = crosses_reorder_level(
            new_quantity - input.delta,
            new_quantity,
            updated.reorder_level,
        );

        info!(
            menu_item_id = %id,
            delta = input.delta,
            reason = input.reason.as_deref().unwrap_or(""),
            stock_quantity = new_quantity,
            "Stock adjusted"
        );
        if crossed {
            self.event_sender
                .send_or_log(Event::StockLow {
                    menu_item_id: id,
                    stock_quantity: new_quantity,
                })
                .await;
        }
        Ok(updated)
    }

    /// Books a ticket, decrementing stock for every line. Orders for an
    /// in-house reservation are charged to the room and settled at
    /// check-out.
    #[instrument(skip(self, input))]
    pub async fn place_order(
        &self,
        input: PlaceOrderInput,
    ) -> Result<OrderWithItems, ServiceError> {
        input.validate()?;
        for line in &input.items {
            line.validate()?;
        }

        let txn = self.db.begin().await?;

        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let mut lines = Vec::with_capacity(input.items.len());
        let mut low_stock = Vec::new();
        let mut total = Decimal::ZERO;

        for line in &input.items {
            let taken = stock_shift(line.menu_item_id, -line.quantity)
                .filter(menu_item::Column::IsAvailable.eq(true))
                .exec(&txn)
                .await?;
            let item = menu_item::Entity::find_by_id(line.menu_item_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Menu item {} not found", line.menu_item_id))
                })?;
            if taken.rows_affected == 0 {
                if !item.is_available {
                    return Err(ServiceError::InvalidOperation(format!(
                        "'{}' is not available",
                        item.name
                    )));
                }
                return Err(ServiceError::InsufficientStock(format!(
                    "'{}' has {} left, {} requested",
                    item.name, item.stock_quantity, line.quantity
                )));
            }

            let remaining = item.stock_quantity;
            if crosses_reorder_level(remaining + line.quantity, remaining, item.reorder_level) {
                low_stock.push((item.id, remaining));
            }

            let unit_price = item.price;
            let line_total = unit_price * Decimal::from(line.quantity);
            total += line_total;

            lines.push(restaurant_order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                menu_item_id: Set(line.menu_item_id),
                quantity: Set(line.quantity),
                unit_price: Set(unit_price),
                line_total: Set(line_total),
            });
        }

        let status = match input.reservation_id {
            Some(reservation_id) => {
                let booking = reservation::Entity::find_by_id(reservation_id)
                    .one(&txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Reservation {reservation_id} not found"))
                    })?;
                if booking.status != ReservationStatus::CheckedIn {
                    return Err(ServiceError::InvalidStatus(format!(
                        "Reservation {} is {}; only in-house guests can charge to the room",
                        booking.reservation_number,
                        booking.status.to_value()
                    )));
                }
                OrderStatus::ChargedToRoom
            }
            None => OrderStatus::Open,
        };

        let order = restaurant_order::ActiveModel {
            id: Set(order_id),
            order_number: Set(generate_order_number(now.date_naive())),
            table_number: Set(input.table_number),
            reservation_id: Set(input.reservation_id),
            status: Set(status),
            total_amount: Set(total),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            items.push(line.insert(&txn).await?);
        }

        txn.commit().await?;
        counter!("hotel_restaurant.orders_placed", 1);

        self.event_sender
            .send_or_log(Event::RestaurantOrderPlaced(order_id))
            .await;
        for (menu_item_id, stock_quantity) in low_stock {
            warn!(%menu_item_id, stock_quantity, "Menu item at or below reorder level");
            self.event_sender
                .send_or_log(Event::StockLow {
                    menu_item_id,
                    stock_quantity,
                })
                .await;
        }
        info!(order_id = %order.id, total = %order.total_amount, "Restaurant order placed");

        Ok(OrderWithItems { order, items })
    }

    pub async fn get_order(&self, id: Uuid) -> Result<OrderWithItems, ServiceError> {
        let order = restaurant_order::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {id} not found")))?;
        let items = restaurant_order_item::Entity::find()
            .filter(restaurant_order_item::Column::OrderId.eq(id))
            .all(&*self.db)
            .await?;
        Ok(OrderWithItems { order, items })
    }

    pub async fn list_orders(
        &self,
        filter: OrderFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<restaurant_order::Model>, u64), ServiceError> {
        let mut query = restaurant_order::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(restaurant_order::Column::Status.eq(status));
        }
        if let Some(reservation_id) = filter.reservation_id {
            query = query.filter(restaurant_order::Column::ReservationId.eq(reservation_id));
        }

        let paginator = query
            .order_by_desc(restaurant_order::Column::CreatedAt)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((orders, total))
    }

    #[instrument(skip(self))]
    pub async fn pay_order(&self, id: Uuid) -> Result<restaurant_order::Model, ServiceError> {
        let order = restaurant_order::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {id} not found")))?;
        if order.status != OrderStatus::Open {
            return Err(ServiceError::InvalidStatus(format!(
                "Order {} is {} and cannot be paid",
                order.order_number,
                order.status.to_value()
            )));
        }

        let mut active: restaurant_order::ActiveModel = order.into();
        active.status = Set(OrderStatus::Paid);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    /// Voids a ticket that has not been paid or settled and puts its
    /// quantities back on the shelf.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: Uuid) -> Result<restaurant_order::Model, ServiceError> {
        let txn = self.db.begin().await?;

        // only one cancel can move the ticket out of open/charged_to_room
        let claimed = restaurant_order::Entity::update_many()
            .col_expr(
                restaurant_order::Column::Status,
                Expr::value(OrderStatus::Cancelled),
            )
            .col_expr(restaurant_order::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(restaurant_order::Column::Id.eq(id))
            .filter(
                restaurant_order::Column::Status
                    .is_in([OrderStatus::Open, OrderStatus::ChargedToRoom]),
            )
            .exec(&txn)
            .await?;
        let order = restaurant_order::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {id} not found")))?;
        if claimed.rows_affected == 0 {
            return Err(ServiceError::InvalidStatus(format!(
                "Order {} is {} and cannot be cancelled",
                order.order_number,
                order.status.to_value()
            )));
        }

        let lines = restaurant_order_item::Entity::find()
            .filter(restaurant_order_item::Column::OrderId.eq(id))
            .all(&txn)
            .await?;
        for line in lines {
            stock_shift(line.menu_item_id, line.quantity)
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::RestaurantOrderCancelled(id))
            .await;
        info!(order_id = %id, "Restaurant order cancelled");
        Ok(order)
    }

    async fn ensure_name_free(&self, name: &str, except: Option<Uuid>) -> Result<(), ServiceError> {
        let mut query = menu_item::Entity::find().filter(menu_item::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(menu_item::Column::Id.ne(id));
        }
        if query.one(&*self.db).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Menu item '{name}' already exists"
            )));
        }
        Ok(())
    }
}

/// Moves an item's stock by `delta` in one statement. The update matches no
/// row when the item is missing or the result would fall outside
/// `0..=i32::MAX`, so callers check `rows_affected`.
fn stock_shift(item_id: Uuid, delta: i32) -> UpdateMany<menu_item::Entity> {
    let delta = i64::from(delta);
    menu_item::Entity::update_many()
        .col_expr(
            menu_item::Column::StockQuantity,
            Expr::col(menu_item::Column::StockQuantity).add(delta),
        )
        .col_expr(menu_item::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(menu_item::Column::Id.eq(item_id))
        .filter(menu_item::Column::StockQuantity.gte(-delta))
        .filter(menu_item::Column::StockQuantity.lte(i64::from(i32::MAX) - delta))
}

/// True when a stock movement takes the item from above its reorder level
/// to at or below it.
pub fn crosses_reorder_level(before: i32, after: i32, reorder_level: i32) -> bool {
    before > reorder_level && after <= reorder_level
}

fn generate_order_number(date: NaiveDate) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect();
    format!("ORD-{}-{}", date.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorder_level_crossing() {
        assert!(crosses_reorder_level(6, 5, 5));
        assert!(crosses_reorder_level(10, 0, 5));
        assert!(!crosses_reorder_level(5, 4, 5));
        assert!(!crosses_reorder_level(10, 6, 5));
    }

    #[test]
    fn orders_need_at_least_one_line() {
        let input = PlaceOrderInput {
            table_number: Some("T1".into()),
            reservation_id: None,
            notes: None,
            items: vec![],
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn order_lines_need_positive_quantity() {
        let line = OrderLineInput {
            menu_item_id: Uuid::new_v4(),
            quantity: 0,
        };
        assert!(line.validate().is_err());
    }
}
