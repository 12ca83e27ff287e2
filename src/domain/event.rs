use super::asset::{AccountId, Amount, AssetId, Timestamp};
use super::employee::{Allocation, EmployeeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which balance a payout draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutKind {
    Salary,
    Bonus,
    Reimbursement,
}

impl PayoutKind {
    /// Payment reference attached to every transfer of this kind.
    pub fn reference(&self) -> &'static str {
        match self {
            PayoutKind::Salary => "Payroll",
            PayoutKind::Bonus => "Bonus",
            PayoutKind::Reimbursement => "Reimbursement",
        }
    }
}

impl fmt::Display for PayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reference())
    }
}

/// One structured change notification per committed state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PayrollEvent {
    EmployeeHired {
        employee: EmployeeId,
        address: AccountId,
        salary_per_second: Amount,
        role: String,
        start_date: Timestamp,
    },
    EmployeeTerminated {
        employee: EmployeeId,
        address: AccountId,
        end_date: Timestamp,
    },
    EmployeeRemoved {
        employee: EmployeeId,
        address: AccountId,
    },
    AddressChanged {
        employee: EmployeeId,
        old_address: AccountId,
        new_address: AccountId,
    },
    AllocationDetermined {
        employee: EmployeeId,
        allocation: Allocation,
    },
    SalarySet {
        employee: EmployeeId,
        salary_per_second: Amount,
        accrued_delta: Amount,
    },
    BonusGranted {
        employee: EmployeeId,
        amount: Amount,
    },
    ReimbursementGranted {
        employee: EmployeeId,
        amount: Amount,
    },
    PaymentSent {
        employee: EmployeeId,
        address: AccountId,
        asset: AssetId,
        amount: Amount,
        reference: String,
    },
    AssetAllowed {
        asset: AssetId,
    },
    OracleSet,
    RateExpirySet {
        seconds: u64,
    },
}
