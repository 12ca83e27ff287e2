use super::asset::{AccountId, Amount, AssetId, Timestamp};
use crate::error::{PayrollError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Registry identifier of an employee. Assigned from 1 and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub u64);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Percentage split of payouts across settlement assets.
///
/// Either empty or summing to exactly 100. Zero entries are never stored.
pub type Allocation = BTreeMap<AssetId, u8>;

/// Represents the payroll state of one employee.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Employee {
    pub id: EmployeeId,
    /// Settlement account payouts are sent to.
    pub address: AccountId,
    pub role: String,
    /// Denomination units accrued per second.
    pub salary_per_second: Amount,
    /// Salary owed from windows closed by salary changes or partial payouts.
    pub accrued_salary: Amount,
    pub bonus: Amount,
    pub reimbursement: Amount,
    /// Start of the live accrual window.
    pub last_payroll_time: Timestamp,
    /// `None` while the employee has no scheduled termination.
    pub end_date: Option<Timestamp>,
    #[serde(default)]
    pub allocation: Allocation,
}

impl Employee {
    pub fn new(
        id: EmployeeId,
        address: AccountId,
        salary_per_second: Amount,
        role: impl Into<String>,
        start: Timestamp,
    ) -> Self {
        Self {
            id,
            address,
            role: role.into(),
            salary_per_second,
            accrued_salary: 0,
            bonus: 0,
            reimbursement: 0,
            last_payroll_time: start,
            end_date: None,
            allocation: Allocation::new(),
        }
    }

    /// An employee stays active until its end date is reached.
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.end_date.is_none_or(|end| now < end)
    }

    /// Salary owed as of `as_of`, including previously accrued salary.
    ///
    /// Accrual stops at the end date. A window starting in the future owes nothing yet.
    pub fn owed_salary(&self, as_of: Timestamp) -> Result<Amount> {
        let until = self.end_date.map_or(as_of, |end| end.min(as_of));
        let elapsed = until.saturating_sub(self.last_payroll_time);
        self.salary_per_second
            .checked_mul(Amount::from(elapsed))
            .and_then(|window| window.checked_add(self.accrued_salary))
            .ok_or(PayrollError::ArithmeticOverflow)
    }

    /// Closes the running accrual window at `now` and starts a new one at `rate`.
    ///
    /// Returns how much was folded into the accrued salary.
    pub fn change_salary(&mut self, rate: Amount, now: Timestamp) -> Result<Amount> {
        let owed = self.owed_salary(now)?;
        let delta = owed - self.accrued_salary;
        self.accrued_salary = owed;
        self.last_payroll_time = now;
        self.salary_per_second = rate;
        Ok(delta)
    }

    pub fn add_bonus(&mut self, amount: Amount) -> Result<()> {
        self.bonus = self
            .bonus
            .checked_add(amount)
            .ok_or(PayrollError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn add_reimbursement(&mut self, amount: Amount) -> Result<()> {
        self.reimbursement = self
            .reimbursement
            .checked_add(amount)
            .ok_or(PayrollError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Marks every salary owed up to `now` as paid.
    pub fn settle_salary(&mut self, now: Timestamp) {
        self.accrued_salary = 0;
        self.last_payroll_time = now;
    }

    /// Marks `paid` units of owed salary as paid.
    ///
    /// Accrued salary is consumed first. The remainder moves the accrual window
    /// forward by whole seconds; when it ends inside a second, that second is
    /// consumed and its unpaid part stays owed as accrued salary.
    pub fn settle_salary_partially(&mut self, paid: Amount) -> Result<()> {
        if paid <= self.accrued_salary {
            self.accrued_salary -= paid;
            return Ok(());
        }

        let from_window = paid - self.accrued_salary;
        let rate = self.salary_per_second;
        if rate == 0 {
            return Err(PayrollError::InvalidRequestedAmount);
        }

        let mut seconds = from_window / rate;
        let extra = from_window % rate;
        self.accrued_salary = 0;
        if extra > 0 {
            seconds += 1;
            self.accrued_salary = rate - extra;
        }

        let seconds = Timestamp::try_from(seconds).map_err(|_| PayrollError::ArithmeticOverflow)?;
        self.last_payroll_time = self
            .last_payroll_time
            .checked_add(seconds)
            .ok_or(PayrollError::ArithmeticOverflow)?;
        Ok(())
    }

    /// True once nothing more can ever be owed to this employee.
    pub fn is_settled(&self, now: Timestamp) -> Result<bool> {
        Ok(!self.is_active(now)
            && self.bonus == 0
            && self.reimbursement == 0
            && self.owed_salary(now)? == 0)
    }

    pub fn allocation_for(&self, asset: &AssetId) -> u8 {
        self.allocation.get(asset).copied().unwrap_or(0)
    }
}
