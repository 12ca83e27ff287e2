use crate::domain::asset::{AssetId, Rate, Timestamp};
use crate::domain::ports::{OracleError, PriceOracle, Quote};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// A price oracle serving quotes pushed into it by the host.
///
/// Clones share the same quotes.
#[derive(Debug, Clone)]
pub struct StaticPriceOracle {
    quotes: Arc<RwLock<HashMap<(AssetId, AssetId), Quote>>>,
    online: Arc<AtomicBool>,
}

impl Default for StaticPriceOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticPriceOracle {
    pub fn new() -> Self {
        Self {
            quotes: Arc::default(),
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// An oracle that fails every probe and lookup.
    pub fn offline() -> Self {
        let oracle = Self::new();
        oracle.set_online(false);
        oracle
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Publishes how many `quote` units one `base` unit buys, observed at `as_of`.
    pub async fn set_rate(&self, base: &AssetId, quote: &AssetId, rate: Rate, as_of: Timestamp) {
        self.quotes
            .write()
            .await
            .insert((base.clone(), quote.clone()), Quote { rate, as_of });
    }

    fn ensure_online(&self) -> Result<(), OracleError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(OracleError::Unavailable("oracle is offline".to_string()))
        }
    }
}

#[async_trait]
impl PriceOracle for StaticPriceOracle {
    async fn get(&self, base: &AssetId, quote: &AssetId) -> Result<Quote, OracleError> {
        self.ensure_online()?;
        self.quotes
            .read()
            .await
            .get(&(base.clone(), quote.clone()))
            .copied()
            .ok_or_else(|| OracleError::NoQuote {
                base: base.clone(),
                quote: quote.clone(),
            })
    }

    async fn probe(&self) -> Result<(), OracleError> {
        self.ensure_online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_quotes_are_directional() {
        let oracle = StaticPriceOracle::new();
        let (usd, ant) = (AssetId::from("USD"), AssetId::from("ANT"));
        oracle.set_rate(&usd, &ant, Rate::new(2), 10).await;

        assert_eq!(
            oracle.get(&usd, &ant).await.unwrap(),
            Quote { rate: Rate::new(2), as_of: 10 }
        );
        assert!(matches!(
            oracle.get(&ant, &usd).await,
            Err(OracleError::NoQuote { .. })
        ));
    }

    #[tokio::test]
    async fn test_offline_oracle() {
        let oracle = StaticPriceOracle::offline();
        assert!(oracle.probe().await.is_err());

        oracle.set_online(true);
        assert!(oracle.probe().await.is_ok());
    }
}
