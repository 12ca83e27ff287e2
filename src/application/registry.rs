//! Employee lifecycle: hiring, termination, address changes and lookups.

use super::engine::PayrollEngine;
use crate::domain::asset::{AccountId, Amount, Timestamp};
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::event::PayrollEvent;
use crate::error::{PayrollError, Result};
use tracing::info;

impl PayrollEngine {
    /// Hires a new employee whose salary starts accruing now.
    pub async fn hire_now(
        &self,
        address: AccountId,
        salary_per_second: Amount,
        role: impl Into<String>,
    ) -> Result<EmployeeId> {
        let start = self.now();
        self.hire(address, salary_per_second, role.into(), start).await
    }

    /// Hires a new employee whose accrual window opens at `start_date`.
    ///
    /// A past start date accrues the whole intervening period at once; a future
    /// one accrues nothing until it is reached.
    pub async fn hire_with_start_date(
        &self,
        address: AccountId,
        salary_per_second: Amount,
        role: impl Into<String>,
        start_date: Timestamp,
    ) -> Result<EmployeeId> {
        self.hire(address, salary_per_second, role.into(), start_date)
            .await
    }

    async fn hire(
        &self,
        address: AccountId,
        salary_per_second: Amount,
        role: String,
        start_date: Timestamp,
    ) -> Result<EmployeeId> {
        if address.is_null() {
            return Err(PayrollError::NullAddress);
        }
        if self.store.find_by_address(&address).await?.is_some() {
            return Err(PayrollError::EmployeeAlreadyExists);
        }

        let id = self.store.next_id().await?;
        let employee = Employee::new(id, address.clone(), salary_per_second, role.clone(), start_date);
        self.store.store(employee).await?;

        info!(employee = %id, %address, salary_per_second, "employee hired");
        self.emit(PayrollEvent::EmployeeHired {
            employee: id,
            address,
            salary_per_second,
            role,
            start_date,
        })
        .await;
        Ok(id)
    }

    pub async fn terminate_now(&self, id: EmployeeId) -> Result<()> {
        let now = self.now();
        self.terminate(id, now).await
    }

    /// Schedules the end of an employee's contract.
    ///
    /// A still-active employee may be re-terminated to move a future end date.
    /// Balances are kept; the record goes away with the payout that settles them.
    pub async fn terminate(&self, id: EmployeeId, end_date: Timestamp) -> Result<()> {
        let mut employee = self.load(id).await?;
        let now = self.now();
        if !employee.is_active(now) {
            return Err(PayrollError::NonActiveEmployee);
        }
        if end_date < now {
            return Err(PayrollError::PastTerminationDate);
        }

        employee.end_date = Some(end_date);
        let address = employee.address.clone();
        self.store.store(employee).await?;

        info!(employee = %id, end_date, "employee terminated");
        self.emit(PayrollEvent::EmployeeTerminated {
            employee: id,
            address,
            end_date,
        })
        .await;
        Ok(())
    }

    /// Moves the caller's record to `new_address`.
    ///
    /// Terminated employees may still do this until they are removed.
    pub async fn change_address_self(
        &self,
        caller: &AccountId,
        new_address: AccountId,
    ) -> Result<()> {
        let mut employee = self.resolve_caller(caller).await?;
        if new_address.is_null() {
            return Err(PayrollError::NullAddress);
        }
        if self.store.find_by_address(&new_address).await?.is_some() {
            return Err(PayrollError::EmployeeAlreadyExists);
        }

        let old_address = std::mem::replace(&mut employee.address, new_address.clone());
        let id = employee.id;
        self.store.store(employee).await?;

        info!(employee = %id, %old_address, %new_address, "employee address changed");
        self.emit(PayrollEvent::AddressChanged {
            employee: id,
            old_address,
            new_address,
        })
        .await;
        Ok(())
    }

    pub async fn get(&self, id: EmployeeId) -> Result<Employee> {
        self.load(id).await
    }

    pub async fn get_by_address(&self, address: &AccountId) -> Result<Employee> {
        self.store
            .find_by_address(address)
            .await?
            .ok_or(PayrollError::EmployeeNotFound)
    }

    pub async fn employee_id_by_address(&self, address: &AccountId) -> Result<EmployeeId> {
        Ok(self.get_by_address(address).await?.id)
    }

    /// Every employee still in the registry, ordered by id.
    pub async fn employees(&self) -> Result<Vec<Employee>> {
        let mut employees = self.store.all().await?;
        employees.sort_by_key(|employee| employee.id);
        Ok(employees)
    }
}
