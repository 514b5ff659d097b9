//! Operational alert generation.
//!
//! The job scans reservations, assets, staff contracts and restaurant stock
//! for the given business day and raises one notification per subject and
//! due date. Running it again for the same day is a no-op: existing rows are
//! skipped, and a duplicate inserted concurrently by another run is rejected
//! by the `(kind, reference_id, due_date)` unique index and counted as
//! skipped as well.

use crate::{
    db::DbPool,
    entities::{
        asset::{self, AssetStatus},
        customer, menu_item,
        notification::{self, NotificationKind},
        reservation::{self, ReservationStatus},
        staff::{self, StaffStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{Duration, NaiveDate, Utc};
use metrics::counter;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Outcome of one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GenerationReport {
    pub run_date: NaiveDate,
    pub created: u64,
    pub skipped: u64,
    /// Notifications created per kind
    pub by_kind: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct GenerateInput {
    /// Business date to evaluate, today when omitted
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
pub struct NotificationFilter {
    pub unread: Option<bool>,
    pub kind: Option<NotificationKind>,
}

/// A notification the job wants to exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: NotificationKind,
    pub reference_type: &'static str,
    pub reference_id: Uuid,
    pub due_date: NaiveDate,
    pub title: String,
    pub message: String,
}

#[derive(Clone)]
pub struct NotificationService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    lookahead_days: i64,
}

impl NotificationService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, lookahead_days: u32) -> Self {
        Self {
            db,
            event_sender,
            lookahead_days: i64::from(lookahead_days),
        }
    }

    /// Runs the job for `today`.
    #[instrument(skip(self))]
    pub async fn generate(&self, today: NaiveDate) -> Result<GenerationReport, ServiceError> {
        let candidates = self.collect_candidates(today).await?;
        debug!(candidates = candidates.len(), "Notification candidates collected");

        let mut report = GenerationReport {
            run_date: today,
            created: 0,
            skipped: 0,
            by_kind: BTreeMap::new(),
        };

        for candidate in candidates {
            if self.store(candidate.clone()).await? {
                report.created += 1;
                *report
                    .by_kind
                    .entry(candidate.kind.as_str().to_string())
                    .or_insert(0) += 1;
            } else {
                report.skipped += 1;
            }
        }

        counter!("hotel_notifications.created", report.created);
        counter!("hotel_notifications.skipped", report.skipped);

        self.event_sender
            .send_or_log(Event::NotificationsGenerated {
                run_date: today,
                created: report.created,
            })
            .await;
        info!(
            run_date = %today,
            created = report.created,
            skipped = report.skipped,
            "Notification job finished"
        );
        Ok(report)
    }

    /// Inserts the notification unless an identical one exists. Returns
    /// whether a row was created.
    async fn store(&self, candidate: Candidate) -> Result<bool, ServiceError> {
        let existing = notification::Entity::find()
            .filter(notification::Column::Kind.eq(candidate.kind))
            .filter(notification::Column::ReferenceId.eq(candidate.reference_id))
            .filter(notification::Column::DueDate.eq(candidate.due_date))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }
        self.insert_candidate(candidate).await
    }

    /// Inserts `candidate`, treating a unique-index rejection as already notified.
    async fn insert_candidate(&self, candidate: Candidate) -> Result<bool, ServiceError> {
        let insert = notification::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(candidate.kind),
            severity: Set(candidate.kind.severity()),
            title: Set(candidate.title),
            message: Set(candidate.message),
            reference_type: Set(candidate.reference_type.to_string()),
            reference_id: Set(candidate.reference_id),
            due_date: Set(candidate.due_date),
            is_read: Set(false),
            created_at: Set(Utc::now()),
            read_at: Set(None),
        }
        .insert(&*self.db)
        .await;

        match insert {
            Ok(_) => Ok(true),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                debug!(kind = candidate.kind.as_str(), "Duplicate notification rejected by index");
                Ok(false)
            }
            Err(err) => Err(ServiceError::DatabaseError(err)),
        }
    }

    /// Everything that should be notified about on `today`.
    pub async fn collect_candidates(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<Candidate>, ServiceError> {
        let horizon = today + Duration::days(self.lookahead_days);
        let mut out = Vec::new();

        let arrivals = reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::Confirmed))
            .filter(reservation::Column::CheckInDate.eq(today))
            .find_also_related(customer::Entity)
            .all(&*self.db)
            .await?;
        for (booking, guest) in arrivals {
            out.push(Candidate {
                kind: NotificationKind::ArrivalDue,
                reference_type: "reservation",
                reference_id: booking.id,
                due_date: booking.check_in_date,
                title: format!("Arrival due: {}", booking.reservation_number),
                message: format!(
                    "{} is due to arrive today",
                    guest_label(guest.as_ref())
                ),
            });
        }

        let in_house = reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::CheckedIn))
            .filter(reservation::Column::CheckOutDate.lte(today))
            .find_also_related(customer::Entity)
            .all(&*self.db)
            .await?;
        for (booking, guest) in in_house {
            let guest = guest_label(guest.as_ref());
            let candidate = if booking.check_out_date == today {
                Candidate {
                    kind: NotificationKind::DepartureDue,
                    reference_type: "reservation",
                    reference_id: booking.id,
                    due_date: booking.check_out_date,
                    title: format!("Departure due: {}", booking.reservation_number),
                    message: format!("{guest} is due to check out today"),
                }
            } else {
                Candidate {
                    kind: NotificationKind::DepartureOverdue,
                    reference_type: "reservation",
                    reference_id: booking.id,
                    due_date: booking.check_out_date,
                    title: format!("Departure overdue: {}", booking.reservation_number),
                    message: format!(
                        "{guest} was due to check out on {} and is still in house",
                        booking.check_out_date
                    ),
                }
            };
            out.push(candidate);
        }

        let maintenance = asset::Entity::find()
            .filter(asset::Column::Status.ne(AssetStatus::Retired))
            .filter(asset::Column::NextMaintenanceDate.lte(horizon))
            .all(&*self.db)
            .await?;
        for item in maintenance {
            let Some(due) = item.next_maintenance_date else {
                continue;
            };
            let (kind, title) = if due < today {
                (NotificationKind::MaintenanceOverdue, "Maintenance overdue")
            } else {
                (NotificationKind::MaintenanceDue, "Maintenance due")
            };
            out.push(Candidate {
                kind,
                reference_type: "asset",
                reference_id: item.id,
                due_date: due,
                title: format!("{title}: {}", item.asset_tag),
                message: format!(
                    "{} ({}) is scheduled for service on {due}",
                    item.name, item.asset_tag
                ),
            });
        }

        let warranties = asset::Entity::find()
            .filter(asset::Column::WarrantyExpiryDate.gte(today))
            .filter(asset::Column::WarrantyExpiryDate.lte(horizon))
            .all(&*self.db)
            .await?;
        for item in warranties {
            let Some(expiry) = item.warranty_expiry_date else {
                continue;
            };
            out.push(Candidate {
                kind: NotificationKind::WarrantyExpiring,
                reference_type: "asset",
                reference_id: item.id,
                due_date: expiry,
                title: format!("Warranty expiring: {}", item.asset_tag),
                message: format!("Warranty for {} expires on {expiry}", item.name),
            });
        }

        let contracts = staff::Entity::find()
            .filter(staff::Column::Status.ne(StaffStatus::Terminated))
            .filter(staff::Column::ContractEndDate.gte(today))
            .filter(staff::Column::ContractEndDate.lte(horizon))
            .all(&*self.db)
            .await?;
        for member in contracts {
            let Some(end) = member.contract_end_date else {
                continue;
            };
            out.push(Candidate {
                kind: NotificationKind::ContractExpiring,
                reference_type: "staff",
                reference_id: member.id,
                due_date: end,
                title: format!("Contract expiring: {}", member.employee_number),
                message: format!("Contract of {} ends on {end}", member.full_name()),
            });
        }

        let low_stock = menu_item::Entity::find()
            .filter(
                Expr::col(menu_item::Column::StockQuantity)
                    .lte(Expr::col(menu_item::Column::ReorderLevel)),
            )
            .all(&*self.db)
            .await?;
        for item in low_stock {
            out.push(Candidate {
                kind: NotificationKind::LowStock,
                reference_type: "menu_item",
                reference_id: item.id,
                due_date: today,
                title: format!("Low stock: {}", item.name),
                message: format!(
                    "{} has {} left (reorder level {})",
                    item.name, item.stock_quantity, item.reorder_level
                ),
            });
        }

        Ok(out)
    }

    pub async fn list(
        &self,
        filter: NotificationFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<notification::Model>, u64), ServiceError> {
        let mut query = notification::Entity::find();
        if filter.unread == Some(true) {
            query = query.filter(notification::Column::IsRead.eq(false));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(notification::Column::Kind.eq(kind));
        }

        let paginator = query
            .order_by_desc(notification::Column::CreatedAt)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<notification::Model, ServiceError> {
        let current = notification::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Notification {id} not found")))?;
        if current.is_read {
            return Ok(current);
        }

        let mut active: notification::ActiveModel = current.into();
        active.is_read = Set(true);
        active.read_at = Set(Some(Utc::now()));
        Ok(active.update(&*self.db).await?)
    }

    /// Returns the number of notifications that changed state.
    pub async fn mark_all_read(&self) -> Result<u64, ServiceError> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .col_expr(notification::Column::ReadAt, Expr::value(Some(Utc::now())))
            .filter(notification::Column::IsRead.eq(false))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Spawns the periodic job. The first run happens right away.
    pub fn start_scheduler(self: Arc<Self>, interval_secs: u64) -> JoinHandle<()> {
        info!(interval_secs, "Starting notification scheduler");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let today = Utc::now().date_naive();
                if let Err(e) = self.generate(today).await {
                    error!(error = %e, "Notification job failed");
                }
            }
        })
    }
}

fn guest_label(guest: Option<&customer::Model>) -> String {
    guest.map_or_else(|| "Guest".to_string(), customer::Model::full_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use tokio::sync::mpsc;

    async fn service() -> (NotificationService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("notify.db").display());
        let pool = db::establish_connection(&url).await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        let (tx, _rx) = mpsc::channel(8);
        let service = NotificationService::new(Arc::new(pool), Arc::new(EventSender::new(tx)), 3);
        (service, dir)
    }

    fn candidate(reference_id: Uuid) -> Candidate {
        Candidate {
            kind: NotificationKind::LowStock,
            reference_type: "menu_item",
            reference_id,
            due_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            title: "Low stock".into(),
            message: "Coffee is below its reorder level".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_rejected_by_unique_index_counts_as_skipped() {
        let (service, _dir) = service().await;
        let reference_id = Uuid::new_v4();

        assert!(service.insert_candidate(candidate(reference_id)).await.unwrap());
        // bypasses the existence check, as a concurrent run would
        assert!(!service.insert_candidate(candidate(reference_id)).await.unwrap());

        let stored = notification::Entity::find().count(&*service.db).await.unwrap();
        assert_eq!(stored, 1);
    }

    #[tokio::test]
    async fn existing_row_is_skipped_before_insert() {
        let (service, _dir) = service().await;
        let reference_id = Uuid::new_v4();

        assert!(service.store(candidate(reference_id)).await.unwrap());
        assert!(!service.store(candidate(reference_id)).await.unwrap());

        let mut next_day = candidate(reference_id);
        next_day.due_date = next_day.due_date.succ_opt().unwrap();
        assert!(service.store(next_day).await.unwrap());
    }
}
