use super::asset::{AccountId, Amount, AssetId, Rate, Timestamp};
use super::employee::{Employee, EmployeeId};
use super::event::PayrollEvent;
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Supplies the current time. Must never go backwards.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// A price quote: `rate` quote units per base unit, observed at `as_of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub rate: Rate,
    pub as_of: Timestamp,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("no quote for {base}/{quote}")]
    NoQuote { base: AssetId, quote: AssetId },
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn get(&self, base: &AssetId, quote: &AssetId) -> std::result::Result<Quote, OracleError>;

    /// Checks that the oracle can serve quotes at all.
    async fn probe(&self) -> std::result::Result<(), OracleError> {
        Ok(())
    }
}

/// A single movement of value out of payroll custody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub asset: AssetId,
    pub to: AccountId,
    pub amount: Amount,
    pub reference: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient {asset} in custody: required {required}, available {available}")]
    InsufficientFunds {
        asset: AssetId,
        required: Amount,
        available: Amount,
    },
    #[error("transfer rejected: {0}")]
    Rejected(String),
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SettlementGateway: Send + Sync {
    async fn transfer(
        &self,
        asset: &AssetId,
        to: &AccountId,
        amount: Amount,
        reference: &str,
    ) -> std::result::Result<(), TransferError>;

    /// Dispatches every transfer of one payout.
    ///
    /// The default sends them one by one. Gateways able to commit a batch as a
    /// whole should override this so that a failure leaves nothing applied.
    async fn settle(&self, batch: &[Transfer]) -> std::result::Result<(), TransferError> {
        for transfer in batch {
            self.transfer(
                &transfer.asset,
                &transfer.to,
                transfer.amount,
                &transfer.reference,
            )
            .await?;
        }
        Ok(())
    }

    /// Checks that the gateway accepts transfers at all.
    async fn probe(&self) -> std::result::Result<(), TransferError> {
        Ok(())
    }
}

/// Persistence of employee records, keyed by id and indexed by address.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Reserves a fresh id. Ids handed out once are never handed out again.
    async fn next_id(&self) -> Result<EmployeeId>;
    async fn get(&self, id: EmployeeId) -> Result<Option<Employee>>;
    async fn find_by_address(&self, address: &AccountId) -> Result<Option<Employee>>;
    /// Inserts or replaces a record, moving its address index if it changed.
    async fn store(&self, employee: Employee) -> Result<()>;
    async fn remove(&self, id: EmployeeId) -> Result<()>;
    async fn all(&self) -> Result<Vec<Employee>>;

    /// Settlement assets saved by the last `save_allowed_assets`, empty if never saved.
    async fn allowed_assets(&self) -> Result<Vec<AssetId>>;
    async fn save_allowed_assets(&self, assets: &[AssetId]) -> Result<()>;
}

/// Receives change notifications for external subscribers.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: PayrollEvent);
}

pub type TimeSourceBox = Box<dyn TimeSource>;
pub type PriceOracleBox = Box<dyn PriceOracle>;
pub type SettlementGatewayBox = Box<dyn SettlementGateway>;
pub type EmployeeStoreBox = Box<dyn EmployeeStore>;
pub type EventSinkBox = Box<dyn EventSink>;
