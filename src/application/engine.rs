use super::config::{PayrollConfig, check_rate_expiry};
use crate::domain::asset::{AccountId, AssetId, Timestamp};
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::event::PayrollEvent;
use crate::domain::ports::{
    EmployeeStoreBox, EventSinkBox, PriceOracleBox, SettlementGatewayBox, TimeSourceBox,
};
use crate::error::{PayrollError, Result};
use std::collections::BTreeSet;
use tracing::info;

/// The collaborators a `PayrollEngine` is wired to.
pub struct PayrollPorts {
    pub store: EmployeeStoreBox,
    pub clock: TimeSourceBox,
    pub oracle: PriceOracleBox,
    pub gateway: SettlementGatewayBox,
    pub events: EventSinkBox,
}

/// The main entry point for payroll operations.
///
/// `PayrollEngine` owns its ports and the payroll settings. Employee operations
/// take `&self` and commit through the store; settings mutators take `&mut self`.
/// Every operation either commits fully or returns an error without touching
/// state.
///
/// The operations are grouped by concern:
/// registry (`hire_now`, `terminate`, ...), allocation (`determine_allocation`,
/// `add_allowed_asset`, ...), accrual (`set_salary`, `grant_bonus`, ...) and
/// payout (`payday`, `pay_bonus`, `reimburse` and their partial variants).
pub struct PayrollEngine {
    pub(super) denomination_asset: AssetId,
    pub(super) rate_expiry: u64,
    pub(super) allowed_assets: BTreeSet<AssetId>,
    pub(super) store: EmployeeStoreBox,
    pub(super) clock: TimeSourceBox,
    pub(super) oracle: PriceOracleBox,
    pub(super) gateway: SettlementGatewayBox,
    pub(super) events: EventSinkBox,
}

impl PayrollEngine {
    /// Validates `config`, checks that the oracle and the settlement gateway are
    /// usable, and builds the engine.
    ///
    /// # Errors
    ///
    /// * `ExpiryTimeTooShort` if the configured rate expiry is at or below the floor.
    /// * `InvalidSettlementTarget` if the oracle or the gateway fails its probe.
    ///
    /// Settlement assets allowed in an earlier run are reloaded from the store.
    pub async fn initialize(config: PayrollConfig, ports: PayrollPorts) -> Result<Self> {
        config.validate()?;
        ports
            .oracle
            .probe()
            .await
            .map_err(|e| PayrollError::InvalidSettlementTarget(e.to_string()))?;
        ports
            .gateway
            .probe()
            .await
            .map_err(|e| PayrollError::InvalidSettlementTarget(e.to_string()))?;

        let allowed_assets: BTreeSet<AssetId> =
            ports.store.allowed_assets().await?.into_iter().collect();

        info!(
            denomination = %config.denomination_asset,
            rate_expiry = config.rate_expiry,
            allowed_assets = allowed_assets.len(),
            "payroll initialized"
        );

        Ok(Self {
            denomination_asset: config.denomination_asset,
            rate_expiry: config.rate_expiry,
            allowed_assets,
            store: ports.store,
            clock: ports.clock,
            oracle: ports.oracle,
            gateway: ports.gateway,
            events: ports.events,
        })
    }

    pub fn denomination_asset(&self) -> &AssetId {
        &self.denomination_asset
    }

    pub fn rate_expiry(&self) -> u64 {
        self.rate_expiry
    }

    /// Replaces the price oracle after checking that the new one answers.
    pub async fn set_oracle(&mut self, oracle: PriceOracleBox) -> Result<()> {
        oracle
            .probe()
            .await
            .map_err(|e| PayrollError::InvalidSettlementTarget(e.to_string()))?;
        self.oracle = oracle;
        info!("price oracle replaced");
        self.emit(PayrollEvent::OracleSet).await;
        Ok(())
    }

    pub async fn set_rate_expiry(&mut self, seconds: u64) -> Result<()> {
        check_rate_expiry(seconds)?;
        self.rate_expiry = seconds;
        info!(seconds, "rate expiry updated");
        self.emit(PayrollEvent::RateExpirySet { seconds }).await;
        Ok(())
    }

    pub(super) fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub(super) async fn load(&self, id: EmployeeId) -> Result<Employee> {
        self.store
            .get(id)
            .await?
            .ok_or(PayrollError::EmployeeNotFound)
    }

    /// Maps the caller's address to the employee it belongs to.
    pub(super) async fn resolve_caller(&self, caller: &AccountId) -> Result<Employee> {
        self.store
            .find_by_address(caller)
            .await?
            .ok_or(PayrollError::EmployeeDoesNotMatch)
    }

    pub(super) async fn emit(&self, event: PayrollEvent) {
        self.events.publish(event).await;
    }
}
