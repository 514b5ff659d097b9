use crate::{
    db::DbPool,
    entities::{customer, reservation},
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateCustomerInput {
    #[validate(length(min = 3, max = 50))]
    #[schema(example = "P12345678")]
    pub identity_number: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Ada")]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    #[serde(default)]
    pub is_vip: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateCustomerInput {
    #[validate(length(min = 3, max = 50))]
    pub identity_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub is_vip: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
pub struct CustomerFilter {
    /// Matches name, identity number, phone or email
    pub search: Option<String>,
    pub is_vip: Option<bool>,
}

/// Guest registry
#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DbPool>,
}

impl CustomerService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create_customer(
        &self,
        input: CreateCustomerInput,
    ) -> Result<customer::Model, ServiceError> {
        input.validate()?;
        ensure_not_future_birth_date(input.date_of_birth)?;
        self.ensure_identity_free(&input.identity_number, None).await?;

        let now = Utc::now();
        let model = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            identity_number: Set(input.identity_number),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            phone: Set(input.phone),
            nationality: Set(input.nationality),
            date_of_birth: Set(input.date_of_birth),
            address: Set(input.address),
            is_vip: Set(input.is_vip),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        info!(customer_id = %model.id, "Customer registered");
        Ok(model)
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<customer::Model, ServiceError> {
        customer::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer {id} not found")))
    }

    pub async fn list_customers(
        &self,
        filter: CustomerFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<customer::Model>, u64), ServiceError> {
        let mut query = customer::Entity::find();

        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(customer::Column::FirstName.contains(term))
                    .add(customer::Column::LastName.contains(term))
                    .add(customer::Column::IdentityNumber.contains(term))
                    .add(customer::Column::Phone.contains(term))
                    .add(customer::Column::Email.contains(term)),
            );
        }
        if let Some(is_vip) = filter.is_vip {
            query = query.filter(customer::Column::IsVip.eq(is_vip));
        }

        let paginator = query
            .order_by_asc(customer::Column::LastName)
            .order_by_asc(customer::Column::FirstName)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let customers = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((customers, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_customer(
        &self,
        id: Uuid,
        input: UpdateCustomerInput,
    ) -> Result<customer::Model, ServiceError> {
        input.validate()?;
        ensure_not_future_birth_date(input.date_of_birth)?;
        let current = self.get_customer(id).await?;

        if let Some(identity) = input.identity_number.as_deref() {
            self.ensure_identity_free(identity, Some(id)).await?;
        }

        let mut active: customer::ActiveModel = current.into();
        if let Some(v) = input.identity_number {
            active.identity_number = Set(v);
        }
        if let Some(v) = input.first_name {
            active.first_name = Set(v);
        }
        if let Some(v) = input.last_name {
            active.last_name = Set(v);
        }
        if let Some(v) = input.email {
            active.email = Set(Some(v));
        }
        if let Some(v) = input.phone {
            active.phone = Set(Some(v));
        }
        if let Some(v) = input.nationality {
            active.nationality = Set(Some(v));
        }
        if let Some(v) = input.date_of_birth {
            active.date_of_birth = Set(Some(v));
        }
        if let Some(v) = input.address {
            active.address = Set(Some(v));
        }
        if let Some(v) = input.is_vip {
            active.is_vip = Set(v);
        }
        if let Some(v) = input.notes {
            active.notes = Set(Some(v));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    /// Guests with booking history are kept for the audit trail.
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: Uuid) -> Result<(), ServiceError> {
        self.get_customer(id).await?;

        let reservations = reservation::Entity::find()
            .filter(reservation::Column::CustomerId.eq(id))
            .count(&*self.db)
            .await?;
        if reservations > 0 {
            return Err(ServiceError::Conflict(format!(
                "Customer {id} has {reservations} reservation(s) and cannot be deleted"
            )));
        }

        customer::Entity::delete_by_id(id).exec(&*self.db).await?;
        info!(customer_id = %id, "Customer deleted");
        Ok(())
    }

    /// Stay history, most recent arrival first
    pub async fn customer_reservations(
        &self,
        id: Uuid,
    ) -> Result<Vec<reservation::Model>, ServiceError> {
        self.get_customer(id).await?;
        Ok(reservation::Entity::find()
            .filter(reservation::Column::CustomerId.eq(id))
            .order_by_desc(reservation::Column::CheckInDate)
            .all(&*self.db)
            .await?)
    }

    async fn ensure_identity_free(
        &self,
        identity_number: &str,
        except: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut query = customer::Entity::find()
            .filter(customer::Column::IdentityNumber.eq(identity_number));
        if let Some(id) = except {
            query = query.filter(customer::Column::Id.ne(id));
        }
        if query.one(&*self.db).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A customer with identity number {identity_number} already exists"
            )));
        }
        Ok(())
    }
}

fn ensure_not_future_birth_date(date_of_birth: Option<NaiveDate>) -> Result<(), ServiceError> {
    match date_of_birth {
        Some(dob) if dob > Utc::now().date_naive() => Err(ServiceError::ValidationError(format!(
            "date of birth {dob} is in the future"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn future_birth_dates_are_rejected() {
        let tomorrow = Utc::now().date_naive() + Duration::days(1);
        assert!(ensure_not_future_birth_date(Some(tomorrow)).is_err());
        assert!(ensure_not_future_birth_date(NaiveDate::from_ymd_opt(1990, 5, 1)).is_ok());
        assert!(ensure_not_future_birth_date(None).is_ok());
    }
}
