//! Salary accrual and the bonus and reimbursement balances.

use super::engine::PayrollEngine;
use crate::domain::asset::Amount;
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::event::PayrollEvent;
use crate::error::{PayrollError, Result};
use tracing::info;

impl PayrollEngine {
    async fn load_active(&self, id: EmployeeId) -> Result<Employee> {
        let employee = self.load(id).await?;
        if !employee.is_active(self.now()) {
            return Err(PayrollError::NonActiveEmployee);
        }
        Ok(employee)
    }

    /// Changes the salary rate from now on. Salary accrued so far is kept at the old rate.
    pub async fn set_salary(&self, id: EmployeeId, salary_per_second: Amount) -> Result<()> {
        let mut employee = self.load_active(id).await?;
        let accrued_delta = employee.change_salary(salary_per_second, self.now())?;
        self.store.store(employee).await?;

        info!(employee = %id, salary_per_second, accrued_delta, "salary set");
        self.emit(PayrollEvent::SalarySet {
            employee: id,
            salary_per_second,
            accrued_delta,
        })
        .await;
        Ok(())
    }

    pub async fn grant_bonus(&self, id: EmployeeId, amount: Amount) -> Result<()> {
        let mut employee = self.load_active(id).await?;
        employee.add_bonus(amount)?;
        self.store.store(employee).await?;

        info!(employee = %id, amount, "bonus granted");
        self.emit(PayrollEvent::BonusGranted { employee: id, amount })
            .await;
        Ok(())
    }

    pub async fn grant_reimbursement(&self, id: EmployeeId, amount: Amount) -> Result<()> {
        let mut employee = self.load_active(id).await?;
        employee.add_reimbursement(amount)?;
        self.store.store(employee).await?;

        info!(employee = %id, amount, "reimbursement granted");
        self.emit(PayrollEvent::ReimbursementGranted { employee: id, amount })
            .await;
        Ok(())
    }

    /// Salary owed to the employee right now.
    pub async fn owed_salary(&self, id: EmployeeId) -> Result<Amount> {
        self.load(id).await?.owed_salary(self.now())
    }

    /// Like `owed_salary`, but reports `Amount::MAX` instead of overflowing.
    pub async fn total_owed_salary(&self, id: EmployeeId) -> Result<Amount> {
        match self.owed_salary(id).await {
            Err(PayrollError::ArithmeticOverflow) => Ok(Amount::MAX),
            other => other,
        }
    }
}
