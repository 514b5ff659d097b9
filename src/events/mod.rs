use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the processor is gone
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("{}", e);
        }
    }
}

/// Domain events emitted by the back office services
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    // Reservation events
    ReservationCreated(Uuid),
    ReservationUpdated(Uuid),
    ReservationCancelled(Uuid),
    ReservationNoShow(Uuid),

    // Front office events
    GuestCheckedIn {
        reservation_id: Uuid,
        room_id: Uuid,
    },
    GuestCheckedOut {
        reservation_id: Uuid,
        room_id: Uuid,
        total_amount: Decimal,
    },
    RoomStatusChanged {
        room_id: Uuid,
        status: String,
    },

    // Restaurant events
    RestaurantOrderPlaced(Uuid),
    RestaurantOrderCancelled(Uuid),
    StockLow {
        menu_item_id: Uuid,
        stock_quantity: i32,
    },

    // HR events
    StaffTerminated(Uuid),

    // Asset events
    MaintenanceRecorded {
        asset_id: Uuid,
        log_id: Uuid,
    },

    // Notification job
    NotificationsGenerated {
        run_date: NaiveDate,
        created: u64,
    },
}

/// Drains the event channel, logging every event until all senders are dropped
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::StockLow {
                menu_item_id,
                stock_quantity,
            } => {
                warn!(%menu_item_id, stock_quantity, "Menu item reached its reorder level");
            }
            Event::GuestCheckedOut {
                reservation_id,
                total_amount,
                ..
            } => {
                info!(%reservation_id, %total_amount, "Guest checked out");
            }
            other => info!(event = ?other, "Received event"),
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        let id = Uuid::new_v4();

        sender.send(Event::ReservationCreated(id)).await.unwrap();
        assert_eq!(rx.recv().await, Some(Event::ReservationCreated(id)));
    }

    #[tokio::test]
    async fn send_reports_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        assert!(sender
            .send(Event::ReservationCancelled(Uuid::new_v4()))
            .await
            .is_err());
        // never panics
        sender
            .send_or_log(Event::ReservationCancelled(Uuid::new_v4()))
            .await;
    }
}
