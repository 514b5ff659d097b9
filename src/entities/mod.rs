//! SeaORM entities for the hotel back office schema.

pub mod asset;
pub mod customer;
pub mod department;
pub mod maintenance_log;
pub mod menu_item;
pub mod notification;
pub mod reservation;
pub mod restaurant_order;
pub mod restaurant_order_item;
pub mod room;
pub mod room_class;
pub mod staff;
