pub mod assets;
pub mod common;
pub mod customers;
pub mod front_office;
pub mod hr;
pub mod notifications;
pub mod reservations;
pub mod restaurant;
pub mod rooms;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{
    assets::AssetService, customers::CustomerService, front_office::FrontOfficeService,
    hr::HrService, notifications::NotificationService, reservations::ReservationService,
    restaurant::RestaurantService, rooms::RoomService,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub rooms: Arc<RoomService>,
    pub customers: Arc<CustomerService>,
    pub reservations: Arc<ReservationService>,
    pub front_office: Arc<FrontOfficeService>,
    pub restaurant: Arc<RestaurantService>,
    pub hr: Arc<HrService>,
    pub assets: Arc<AssetService>,
    pub notifications: Arc<NotificationService>,
}

impl AppServices {
    /// Build the service container shared by every request.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, config: &AppConfig) -> Self {
        Self {
            rooms: Arc::new(RoomService::new(db_pool.clone(), event_sender.clone())),
            customers: Arc::new(CustomerService::new(db_pool.clone())),
            reservations: Arc::new(ReservationService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            front_office: Arc::new(FrontOfficeService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            restaurant: Arc::new(RestaurantService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            hr: Arc::new(HrService::new(db_pool.clone(), event_sender.clone())),
            assets: Arc::new(AssetService::new(db_pool.clone(), event_sender.clone())),
            notifications: Arc::new(NotificationService::new(
                db_pool,
                event_sender,
                config.notification_lookahead_days,
            )),
        }
    }
}
