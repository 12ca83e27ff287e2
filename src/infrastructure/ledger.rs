use crate::domain::asset::{AccountId, Amount, AssetId};
use crate::domain::ports::{SettlementGateway, Transfer, TransferError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Books {
    custody: HashMap<AssetId, Amount>,
    balances: HashMap<(AccountId, AssetId), Amount>,
    payments: Vec<Transfer>,
}

impl Books {
    fn check(&self, batch: &[Transfer]) -> Result<(), TransferError> {
        let mut required: HashMap<&AssetId, Amount> = HashMap::new();
        for transfer in batch {
            let total = required.entry(&transfer.asset).or_default();
            *total = total
                .checked_add(transfer.amount)
                .ok_or_else(|| TransferError::Rejected("amount overflow".to_string()))?;
        }
        for (asset, required) in required {
            let available = self.custody.get(asset).copied().unwrap_or(0);
            if available < required {
                return Err(TransferError::InsufficientFunds {
                    asset: asset.clone(),
                    required,
                    available,
                });
            }
        }
        Ok(())
    }

    fn apply(&mut self, transfer: &Transfer) {
        if let Some(custody) = self.custody.get_mut(&transfer.asset) {
            *custody -= transfer.amount;
        }
        let balance = self
            .balances
            .entry((transfer.to.clone(), transfer.asset.clone()))
            .or_default();
        *balance = balance.saturating_add(transfer.amount);
        self.payments.push(transfer.clone());
    }
}

/// An in-memory settlement gateway holding the payroll's custody balances.
///
/// Batches are all-or-nothing: custody is checked for the whole batch before any
/// transfer is applied. Clones share the same books.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    books: Arc<Mutex<Books>>,
    online: Arc<AtomicBool>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            books: Arc::default(),
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Funds the payroll custody with `amount` of `asset`.
    pub async fn deposit(&self, asset: &AssetId, amount: Amount) {
        let mut books = self.books.lock().await;
        let custody = books.custody.entry(asset.clone()).or_default();
        *custody = custody.saturating_add(amount);
    }

    pub async fn custody(&self, asset: &AssetId) -> Amount {
        let books = self.books.lock().await;
        books.custody.get(asset).copied().unwrap_or(0)
    }

    pub async fn balance_of(&self, account: &AccountId, asset: &AssetId) -> Amount {
        let books = self.books.lock().await;
        books
            .balances
            .get(&(account.clone(), asset.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Every transfer applied so far, in order.
    pub async fn payments(&self) -> Vec<Transfer> {
        self.books.lock().await.payments.clone()
    }

    fn ensure_online(&self) -> Result<(), TransferError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(TransferError::Unavailable("ledger is offline".to_string()))
        }
    }
}

#[async_trait]
impl SettlementGateway for InMemoryLedger {
    async fn transfer(
        &self,
        asset: &AssetId,
        to: &AccountId,
        amount: Amount,
        reference: &str,
    ) -> Result<(), TransferError> {
        let transfer = Transfer {
            asset: asset.clone(),
            to: to.clone(),
            amount,
            reference: reference.to_string(),
        };
        self.settle(std::slice::from_ref(&transfer)).await
    }

    async fn settle(&self, batch: &[Transfer]) -> Result<(), TransferError> {
        self.ensure_online()?;
        let mut books = self.books.lock().await;
        books.check(batch)?;
        for transfer in batch {
            books.apply(transfer);
        }
        Ok(())
    }

    async fn probe(&self) -> Result<(), TransferError> {
        self.ensure_online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(asset: &str, amount: Amount) -> Transfer {
        Transfer {
            asset: AssetId::from(asset),
            to: AccountId::from("alice"),
            amount,
            reference: "Payroll".to_string(),
        }
    }

    #[tokio::test]
    async fn test_transfer_moves_custody_to_account() {
        let ledger = InMemoryLedger::new();
        let usd = AssetId::from("USD");
        ledger.deposit(&usd, 100).await;

        ledger
            .transfer(&usd, &AccountId::from("alice"), 40, "Payroll")
            .await
            .unwrap();

        assert_eq!(ledger.custody(&usd).await, 60);
        assert_eq!(ledger.balance_of(&AccountId::from("alice"), &usd).await, 40);
        assert_eq!(ledger.payments().await, vec![transfer("USD", 40)]);
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let ledger = InMemoryLedger::new();
        ledger.deposit(&AssetId::from("USD"), 100).await;
        ledger.deposit(&AssetId::from("ANT"), 5).await;

        let result = ledger
            .settle(&[transfer("USD", 50), transfer("ANT", 10)])
            .await;

        assert!(matches!(
            result,
            Err(TransferError::InsufficientFunds { required: 10, available: 5, .. })
        ));
        assert_eq!(ledger.custody(&AssetId::from("USD")).await, 100);
        assert!(ledger.payments().await.is_empty());
    }

    #[tokio::test]
    async fn test_batch_checks_cumulative_amounts() {
        let ledger = InMemoryLedger::new();
        ledger.deposit(&AssetId::from("USD"), 100).await;

        let result = ledger
            .settle(&[transfer("USD", 60), transfer("USD", 60)])
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_offline_ledger_rejects() {
        let ledger = InMemoryLedger::new();
        ledger.set_online(false);
        assert!(ledger.probe().await.is_err());
        assert!(matches!(
            ledger.settle(&[]).await,
            Err(TransferError::Unavailable(_))
        ));
    }
}
