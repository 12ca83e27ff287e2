//! Payouts of salary, bonus and reimbursement across an employee's allocation.
//!
//! Every payout follows the same steps. The requested amount is checked against
//! what is available, then split by allocation percentage and converted at fresh
//! oracle rates. The whole batch goes to the settlement gateway, and only once
//! it is accepted is the employee record updated (or removed, when a terminated
//! employee has nothing left to claim).
//!
//! Each asset's share is computed independently from the requested amount, so
//! the shares may add up to slightly less than requested. The difference is at
//! most one unit per asset beyond the first, plus conversion truncation.

use super::engine::PayrollEngine;
use crate::domain::asset::{AccountId, Amount, AssetId, Rate, Timestamp, mul_div};
use crate::domain::employee::Employee;
use crate::domain::event::{PayoutKind, PayrollEvent};
use crate::domain::ports::{OracleError, Transfer};
use crate::error::{PayrollError, Result};
use tracing::{debug, info, warn};

impl PayrollEngine {
    /// Pays out all salary owed to the caller.
    pub async fn payday(&self, caller: &AccountId) -> Result<Vec<Transfer>> {
        self.pay_out(caller, PayoutKind::Salary, None).await
    }

    pub async fn partial_payday(&self, caller: &AccountId, amount: Amount) -> Result<Vec<Transfer>> {
        self.pay_out(caller, PayoutKind::Salary, Some(amount)).await
    }

    pub async fn pay_bonus(&self, caller: &AccountId) -> Result<Vec<Transfer>> {
        self.pay_out(caller, PayoutKind::Bonus, None).await
    }

    pub async fn partial_pay_bonus(&self, caller: &AccountId, amount: Amount) -> Result<Vec<Transfer>> {
        self.pay_out(caller, PayoutKind::Bonus, Some(amount)).await
    }

    pub async fn reimburse(&self, caller: &AccountId) -> Result<Vec<Transfer>> {
        self.pay_out(caller, PayoutKind::Reimbursement, None).await
    }

    pub async fn partial_reimburse(&self, caller: &AccountId, amount: Amount) -> Result<Vec<Transfer>> {
        self.pay_out(caller, PayoutKind::Reimbursement, Some(amount))
            .await
    }

    /// Pays `requested` (everything available when `None`) of one balance.
    ///
    /// Returns the transfers that were settled.
    async fn pay_out(
        &self,
        caller: &AccountId,
        kind: PayoutKind,
        requested: Option<Amount>,
    ) -> Result<Vec<Transfer>> {
        let employee = self.resolve_caller(caller).await?;
        let now = self.now();

        let available = match kind {
            PayoutKind::Salary => employee.owed_salary(now)?,
            PayoutKind::Bonus => employee.bonus,
            PayoutKind::Reimbursement => employee.reimbursement,
        };
        let requested = match requested {
            Some(amount) if amount > available => {
                return Err(PayrollError::InvalidRequestedAmount);
            }
            Some(amount) => amount,
            None => available,
        };
        if requested == 0 || employee.allocation.is_empty() {
            return Err(PayrollError::NothingPaid);
        }

        let batch = self.plan_transfers(&employee, kind, requested, now).await?;
        if batch.is_empty() {
            return Err(PayrollError::NothingPaid);
        }

        let mut updated = employee.clone();
        match kind {
            PayoutKind::Salary if requested == available => updated.settle_salary(now),
            PayoutKind::Salary => updated.settle_salary_partially(requested)?,
            PayoutKind::Bonus => updated.bonus -= requested,
            PayoutKind::Reimbursement => updated.reimbursement -= requested,
        }
        let settled = updated.is_settled(now)?;

        self.gateway
            .settle(&batch)
            .await
            .map_err(PayrollError::SettlementFailed)?;

        let id = updated.id;
        let address = updated.address.clone();
        if settled {
            self.store.remove(id).await?;
        } else {
            self.store.store(updated).await?;
        }

        info!(employee = %id, %kind, requested, transfers = batch.len(), "payout settled");
        for transfer in &batch {
            self.emit(PayrollEvent::PaymentSent {
                employee: id,
                address: transfer.to.clone(),
                asset: transfer.asset.clone(),
                amount: transfer.amount,
                reference: transfer.reference.clone(),
            })
            .await;
        }
        if settled {
            info!(employee = %id, %address, "employee removed");
            self.emit(PayrollEvent::EmployeeRemoved { employee: id, address })
                .await;
        }

        Ok(batch)
    }

    /// Splits `requested` by allocation and converts every share.
    ///
    /// Nothing is dispatched here; a stale quote for any asset fails the whole plan.
    async fn plan_transfers(
        &self,
        employee: &Employee,
        kind: PayoutKind,
        requested: Amount,
        now: Timestamp,
    ) -> Result<Vec<Transfer>> {
        let mut batch = Vec::with_capacity(employee.allocation.len());

        for (asset, &percentage) in &employee.allocation {
            if percentage == 0 {
                continue;
            }
            let share = mul_div(requested, Amount::from(percentage), 100)
                .ok_or(PayrollError::ArithmeticOverflow)?;
            let amount = if *asset == self.denomination_asset {
                share
            } else {
                self.fresh_rate(asset, now).await?.convert(share)?
            };

            if amount == 0 {
                debug!(employee = %employee.id, %asset, share, "share rounds to zero, skipped");
                continue;
            }
            debug!(employee = %employee.id, %asset, share, amount, "transfer planned");
            batch.push(Transfer {
                asset: asset.clone(),
                to: employee.address.clone(),
                amount,
                reference: kind.reference().to_string(),
            });
        }

        Ok(batch)
    }

    /// Quote for denomination -> `asset`, rejected when zero or older than the expiry window.
    ///
    /// A pair the oracle has never quoted reads as a zero rate.
    async fn fresh_rate(&self, asset: &AssetId, now: Timestamp) -> Result<Rate> {
        let quote = match self.oracle.get(&self.denomination_asset, asset).await {
            Ok(quote) => quote,
            Err(OracleError::NoQuote { .. }) => {
                warn!(%asset, "no exchange rate quoted");
                return Err(PayrollError::ExchangeRateStale);
            }
            Err(err) => return Err(err.into()),
        };
        let age = now.saturating_sub(quote.as_of);
        if quote.rate.is_zero() || age > self.rate_expiry {
            warn!(%asset, age, rate = %quote.rate.0, "exchange rate rejected");
            return Err(PayrollError::ExchangeRateStale);
        }
        Ok(quote.rate)
    }
}
