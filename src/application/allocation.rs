//! Settlement assets: the allowed set and each employee's percentage split.

use super::config::MAX_ALLOWED_ASSETS;
use super::engine::PayrollEngine;
use crate::domain::asset::{AccountId, AssetId};
use crate::domain::employee::{Allocation, EmployeeId};
use crate::domain::event::PayrollEvent;
use crate::error::{PayrollError, Result};
use tracing::info;

impl PayrollEngine {
    /// Allows payouts in `asset`. Allowing an asset twice is a no-op.
    pub async fn add_allowed_asset(&mut self, asset: AssetId) -> Result<()> {
        if self.allowed_assets.contains(&asset) {
            return Ok(());
        }
        if self.allowed_assets.len() >= MAX_ALLOWED_ASSETS {
            return Err(PayrollError::MaxAllowedTokensReached);
        }

        let mut allowed = self.allowed_assets.clone();
        allowed.insert(asset.clone());
        let saved: Vec<AssetId> = allowed.iter().cloned().collect();
        self.store.save_allowed_assets(&saved).await?;
        self.allowed_assets = allowed;

        info!(%asset, "settlement asset allowed");
        self.emit(PayrollEvent::AssetAllowed { asset }).await;
        Ok(())
    }

    pub fn is_asset_allowed(&self, asset: &AssetId) -> bool {
        self.allowed_assets.contains(asset)
    }

    pub fn allowed_asset_count(&self) -> usize {
        self.allowed_assets.len()
    }

    /// Replaces the caller's allocation with `assets[i] -> percentages[i]`.
    ///
    /// The percentages must add up to exactly 100. Repeated assets add up and
    /// zero entries are dropped.
    pub async fn determine_allocation(
        &self,
        caller: &AccountId,
        employee_id: EmployeeId,
        assets: &[AssetId],
        percentages: &[u8],
    ) -> Result<()> {
        let mut employee = self.resolve_caller(caller).await?;
        if employee.id != employee_id {
            return Err(PayrollError::EmployeeDoesNotMatch);
        }
        if assets.len() != percentages.len() {
            return Err(PayrollError::TokenAllocationMismatch);
        }

        let mut allocation = Allocation::new();
        let mut total: u32 = 0;
        for (asset, &percentage) in assets.iter().zip(percentages) {
            if !self.is_asset_allowed(asset) {
                return Err(PayrollError::NoAllowedToken);
            }
            total += u32::from(percentage);
            if percentage > 0 {
                let entry = allocation.entry(asset.clone()).or_insert(0);
                *entry = entry.saturating_add(percentage);
            }
        }
        if total != 100 {
            return Err(PayrollError::DistributionIncomplete);
        }

        employee.allocation = allocation.clone();
        self.store.store(employee).await?;

        info!(employee = %employee_id, ?allocation, "allocation determined");
        self.emit(PayrollEvent::AllocationDetermined {
            employee: employee_id,
            allocation,
        })
        .await;
        Ok(())
    }

    /// Percentage of `asset` in the employee's allocation, 0 when absent.
    pub async fn get_allocation(&self, employee_id: EmployeeId, asset: &AssetId) -> Result<u8> {
        Ok(self.load(employee_id).await?.allocation_for(asset))
    }
}
