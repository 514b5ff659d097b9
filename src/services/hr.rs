use crate::{
    db::DbPool,
    entities::{
        department,
        staff::{self, StaffStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{business_date, non_negative_decimal},
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateDepartmentInput {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Housekeeping")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateDepartmentInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateStaffInput {
    #[validate(length(min = 1, max = 30))]
    #[schema(example = "EMP-0042")]
    pub employee_number: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Receptionist")]
    pub position: String,
    pub department_id: Uuid,
    pub hire_date: NaiveDate,
    pub contract_end_date: Option<NaiveDate>,
    #[validate(custom = "non_negative_decimal")]
    #[schema(value_type = String, example = "2400.00")]
    pub base_salary: Decimal,
    pub status: Option<StaffStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateStaffInput {
    #[validate(length(min = 1, max = 30))]
    pub employee_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub position: Option<String>,
    pub department_id: Option<Uuid>,
    pub hire_date: Option<NaiveDate>,
    pub contract_end_date: Option<NaiveDate>,
    #[validate(custom = "non_negative_decimal")]
    #[schema(value_type = Option<String>)]
    pub base_salary: Option<Decimal>,
    pub status: Option<StaffStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct TerminateStaffInput {
    /// Last working day, today when omitted
    pub termination_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
pub struct StaffFilter {
    pub department_id: Option<Uuid>,
    pub status: Option<StaffStatus>,
    /// Matches name, employee number or position
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, IntoParams)]
pub struct PayrollQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayrollEntry {
    pub staff_id: Uuid,
    pub employee_number: String,
    pub full_name: String,
    pub department_id: Uuid,
    #[schema(value_type = String)]
    pub base_salary: Decimal,
    pub days_employed: u32,
    pub days_in_month: u32,
    #[schema(value_type = String)]
    pub gross_pay: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayrollReport {
    pub year: i32,
    pub month: u32,
    pub entries: Vec<PayrollEntry>,
    #[schema(value_type = String)]
    pub total: Decimal,
}

/// First and last day of a calendar month
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), ServiceError> {
    let invalid =
        || ServiceError::ValidationError(format!("invalid payroll period {year}-{month}"));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next.pred_opt().ok_or_else(invalid)?;
    Ok((first, last))
}

/// Days of `[first, last]` covered by an employment starting on `hire_date`
/// and ending on `termination_date` (inclusive).
pub fn days_employed(
    first: NaiveDate,
    last: NaiveDate,
    hire_date: NaiveDate,
    termination_date: Option<NaiveDate>,
) -> u32 {
    let start = hire_date.max(first);
    let end = termination_date.map_or(last, |t| t.min(last));
    if end < start {
        return 0;
    }
    u32::try_from((end - start).num_days() + 1).unwrap_or(0)
}

pub fn prorated_salary(base_salary: Decimal, days: u32, days_in_month: u32) -> Decimal {
    if days_in_month == 0 {
        return Decimal::ZERO;
    }
    (base_salary * Decimal::from(days) / Decimal::from(days_in_month)).round_dp(2)
}

/// Departments, employees and monthly payroll
#[derive(Clone)]
pub struct HrService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl HrService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input))]
    pub async fn create_department(
        &self,
        input: CreateDepartmentInput,
    ) -> Result<department::Model, ServiceError> {
        input.validate()?;
        ensure_department_name_free(&*self.db, &input.name, None).await?;

        let now = Utc::now();
        let model = department::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;
        info!(department_id = %model.id, "Department created");
        Ok(model)
    }

    pub async fn get_department(&self, id: Uuid) -> Result<department::Model, ServiceError> {
        department::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Department {id} not found")))
    }

    pub async fn list_departments(&self) -> Result<Vec<department::Model>, ServiceError> {
        Ok(department::Entity::find()
            .order_by_asc(department::Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, input))]
    pub async fn update_department(
        &self,
        id: Uuid,
        input: UpdateDepartmentInput,
    ) -> Result<department::Model, ServiceError> {
        input.validate()?;
        let current = self.get_department(id).await?;
        if let Some(name) = input.name.as_deref() {
            ensure_department_name_free(&*self.db, name, Some(id)).await?;
        }

        let mut active: department::ActiveModel = current.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_department(&self, id: Uuid) -> Result<(), ServiceError> {
        let dept = self.get_department(id).await?;
        let members = staff::Entity::find()
            .filter(staff::Column::DepartmentId.eq(id))
            .count(&*self.db)
            .await?;
        if members > 0 {
            return Err(ServiceError::Conflict(format!(
                "Department '{}' still has {members} staff member(s)",
                dept.name
            )));
        }

        department::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create_staff(
        &self,
        input: CreateStaffInput,
    ) -> Result<staff::Model, ServiceError> {
        input.validate()?;
        if input.status == Some(StaffStatus::Terminated) {
            return Err(ServiceError::BadRequest(
                "New staff cannot start as terminated".to_string(),
            ));
        }
        ensure_contract_after_hire(input.hire_date, input.contract_end_date)?;
        self.get_department(input.department_id).await?;
        ensure_employee_number_free(&*self.db, &input.employee_number, None).await?;

        let now = Utc::now();
        let model = staff::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_number: Set(input.employee_number),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            phone: Set(input.phone),
            position: Set(input.position),
            department_id: Set(input.department_id),
            hire_date: Set(input.hire_date),
            contract_end_date: Set(input.contract_end_date),
            base_salary: Set(input.base_salary),
            status: Set(input.status.unwrap_or(StaffStatus::Active)),
            termination_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;
        info!(staff_id = %model.id, "Staff member hired");
        Ok(model)
    }

    pub async fn get_staff(&self, id: Uuid) -> Result<staff::Model, ServiceError> {
        staff::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Staff member {id} not found")))
    }

    pub async fn list_staff(
        &self,
        filter: StaffFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<staff::Model>, u64), ServiceError> {
        let mut query = staff::Entity::find();
        if let Some(department_id) = filter.department_id {
            query = query.filter(staff::Column::DepartmentId.eq(department_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(staff::Column::Status.eq(status));
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(staff::Column::FirstName.contains(term))
                    .add(staff::Column::LastName.contains(term))
                    .add(staff::Column::EmployeeNumber.contains(term))
                    .add(staff::Column::Position.contains(term)),
            );
        }

        let paginator = query
            .order_by_asc(staff::Column::EmployeeNumber)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Applies an employee record change atomically, re-checking the
    /// department, the employee number and the contract dates.
    #[instrument(skip(self, input))]
    pub async fn update_employee(
        &self,
        id: Uuid,
        input: UpdateStaffInput,
    ) -> Result<staff::Model, ServiceError> {
        input.validate()?;
        if input.status == Some(StaffStatus::Terminated) {
            return Err(ServiceError::BadRequest(
                "Use the terminate operation to end employment".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let current = staff::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Staff member {id} not found")))?;
        if current.status == StaffStatus::Terminated && input.status.is_some() {
            return Err(ServiceError::InvalidStatus(format!(
                "Staff member {} has been terminated",
                current.employee_number
            )));
        }

        if let Some(department_id) = input.department_id {
            department::Entity::find_by_id(department_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Department {department_id} not found"))
                })?;
        }
        if let Some(number) = input.employee_number.as_deref() {
            ensure_employee_number_free(&txn, number, Some(id)).await?;
        }
        let hire_date = input.hire_date.unwrap_or(current.hire_date);
        let contract_end = input.contract_end_date.or(current.contract_end_date);
        ensure_contract_after_hire(hire_date, contract_end)?;

        let mut active: staff::ActiveModel = current.into();
        if let Some(v) = input.employee_number {
            active.employee_number = Set(v);
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
        if let Some(v) = input.position {
            active.position = Set(v);
        }
        if let Some(v) = input.department_id {
            active.department_id = Set(v);
        }
        if let Some(v) = input.base_salary {
            active.base_salary = Set(v);
        }
        if let Some(v) = input.status {
            active.status = Set(v);
        }
        active.hire_date = Set(hire_date);
        active.contract_end_date = Set(contract_end);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_staff(&self, id: Uuid) -> Result<(), ServiceError> {
        self.get_staff(id).await?;
        staff::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn terminate(
        &self,
        id: Uuid,
        termination_date: Option<NaiveDate>,
    ) -> Result<staff::Model, ServiceError> {
        let termination_date = business_date(termination_date);
        let member = self.get_staff(id).await?;
        if member.status == StaffStatus::Terminated {
            return Err(ServiceError::InvalidStatus(format!(
                "Staff member {} is already terminated",
                member.employee_number
            )));
        }
        if termination_date < member.hire_date {
            return Err(ServiceError::ValidationError(format!(
                "termination date {termination_date} precedes hire date {}",
                member.hire_date
            )));
        }

        let mut active: staff::ActiveModel = member.into();
        active.status = Set(StaffStatus::Terminated);
        active.termination_date = Set(Some(termination_date));
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::StaffTerminated(id))
            .await;
        info!(staff_id = %id, %termination_date, "Staff member terminated");
        Ok(updated)
    }

    /// Gross pay for everyone employed for at least one day of the month,
    /// prorated by calendar days.
    #[instrument(skip(self))]
    pub async fn payroll(&self, year: i32, month: u32) -> Result<PayrollReport, ServiceError> {
        if !(1..=12).contains(&month) {
            return Err(ServiceError::ValidationError(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        let (first, last) = month_bounds(year, month)?;
        let days_in_month = last.day();

        let members = staff::Entity::find()
            .filter(staff::Column::HireDate.lte(last))
            .filter(
                Condition::any()
                    .add(staff::Column::TerminationDate.is_null())
                    .add(staff::Column::TerminationDate.gte(first)),
            )
            .order_by_asc(staff::Column::EmployeeNumber)
            .all(&*self.db)
            .await?;

        let entries: Vec<PayrollEntry> = members
            .into_iter()
            .filter_map(|member| {
                let days = days_employed(first, last, member.hire_date, member.termination_date);
                (days > 0).then(|| PayrollEntry {
                    staff_id: member.id,
                    employee_number: member.employee_number.clone(),
                    full_name: member.full_name(),
                    department_id: member.department_id,
                    base_salary: member.base_salary,
                    days_employed: days,
                    days_in_month,
                    gross_pay: prorated_salary(member.base_salary, days, days_in_month),
                })
            })
            .collect();
        let total = entries.iter().map(|e| e.gross_pay).sum();

        Ok(PayrollReport {
            year,
            month,
            entries,
            total,
        })
    }
}

async fn ensure_department_name_free<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    except: Option<Uuid>,
) -> Result<(), ServiceError> {
    let mut query = department::Entity::find().filter(department::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(department::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Department '{name}' already exists"
        )));
    }
    Ok(())
}

async fn ensure_employee_number_free<C: ConnectionTrait>(
    conn: &C,
    employee_number: &str,
    except: Option<Uuid>,
) -> Result<(), ServiceError> {
    let mut query =
        staff::Entity::find().filter(staff::Column::EmployeeNumber.eq(employee_number));
    if let Some(id) = except {
        query = query.filter(staff::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Employee number {employee_number} is already assigned"
        )));
    }
    Ok(())
}

fn ensure_contract_after_hire(
    hire_date: NaiveDate,
    contract_end: Option<NaiveDate>,
) -> Result<(), ServiceError> {
    match contract_end {
        Some(end) if end < hire_date => Err(ServiceError::ValidationError(format!(
            "contract end {end} precedes hire date {hire_date}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case(2026, 2, 28)]
    #[case(2028, 2, 29)]
    #[case(2026, 4, 30)]
    #[case(2026, 12, 31)]
    fn month_lengths(#[case] year: i32, #[case] month: u32, #[case] days: u32) {
        let (first, last) = month_bounds(year, month).unwrap();
        assert_eq!(first.day(), 1);
        assert_eq!(last.day(), days);
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(month_bounds(2026, 13).is_err());
        assert!(month_bounds(2026, 0).is_err());
    }

    #[rstest]
    #[case::full_month(d(2025, 1, 1), None, 30)]
    #[case::hired_mid_month(d(2026, 4, 16), None, 15)]
    #[case::terminated_mid_month(d(2025, 1, 1), Some(d(2026, 4, 10)), 10)]
    #[case::hired_and_left(d(2026, 4, 5), Some(d(2026, 4, 6)), 2)]
    #[case::hired_later(d(2026, 5, 1), None, 0)]
    #[case::left_earlier(d(2025, 1, 1), Some(d(2026, 3, 31)), 0)]
    fn employment_days_in_april(
        #[case] hire: NaiveDate,
        #[case] termination: Option<NaiveDate>,
        #[case] expected: u32,
    ) {
        let (first, last) = month_bounds(2026, 4).unwrap();
        assert_eq!(days_employed(first, last, hire, termination), expected);
    }

    #[test]
    fn salary_is_prorated_and_rounded() {
        assert_eq!(prorated_salary(dec!(3000), 30, 30), dec!(3000));
        assert_eq!(prorated_salary(dec!(3000), 15, 30), dec!(1500));
        assert_eq!(prorated_salary(dec!(1000), 10, 31), dec!(322.58));
    }

    #[test]
    fn contract_cannot_end_before_hire() {
        assert!(ensure_contract_after_hire(d(2026, 1, 10), Some(d(2026, 1, 9))).is_err());
        assert!(ensure_contract_after_hire(d(2026, 1, 10), Some(d(2026, 1, 10))).is_ok());
        assert!(ensure_contract_after_hire(d(2026, 1, 10), None).is_ok());
    }
}
