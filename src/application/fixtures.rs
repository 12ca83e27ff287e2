use super::config::PayrollConfig;
use super::engine::{PayrollEngine, PayrollPorts};
use crate::domain::asset::{AccountId, Amount, AssetId, RATE_SCALE, Rate, Timestamp};
use crate::domain::employee::EmployeeId;
use crate::domain::ports::TimeSource;
use crate::infrastructure::clock::ManualClock;
use crate::infrastructure::in_memory::{InMemoryEmployeeStore, InMemoryEventLog};
use crate::infrastructure::ledger::InMemoryLedger;
use crate::infrastructure::oracle::StaticPriceOracle;

pub const START: Timestamp = 1_700_000_000;
pub const ONE_MONTH: Timestamp = 2_678_400;

pub fn usd() -> AssetId {
    AssetId::from("USD")
}

pub fn ant() -> AssetId {
    AssetId::from("ANT")
}

pub struct Handles {
    pub clock: ManualClock,
    pub oracle: StaticPriceOracle,
    pub ledger: InMemoryLedger,
    pub events: InMemoryEventLog,
}

pub fn test_ports() -> (PayrollPorts, Handles) {
    let handles = Handles {
        clock: ManualClock::new(START),
        oracle: StaticPriceOracle::new(),
        ledger: InMemoryLedger::new(),
        events: InMemoryEventLog::new(),
    };
    let ports = PayrollPorts {
        store: Box::new(InMemoryEmployeeStore::new()),
        clock: Box::new(handles.clock.clone()),
        oracle: Box::new(handles.oracle.clone()),
        gateway: Box::new(handles.ledger.clone()),
        events: Box::new(handles.events.clone()),
    };
    (ports, handles)
}

/// An engine denominated in USD with USD and ANT allowed, one USD buying two ANT,
/// and a ledger holding plenty of both.
pub struct Harness {
    pub engine: PayrollEngine,
    pub clock: ManualClock,
    pub oracle: StaticPriceOracle,
    pub ledger: InMemoryLedger,
    pub events: InMemoryEventLog,
}

impl Harness {
    pub async fn new() -> Self {
        let (ports, handles) = test_ports();
        let mut engine = PayrollEngine::initialize(PayrollConfig::new("USD"), ports)
            .await
            .unwrap();
        engine.add_allowed_asset(usd()).await.unwrap();
        engine.add_allowed_asset(ant()).await.unwrap();

        handles
            .oracle
            .set_rate(&usd(), &ant(), Rate::new(2 * RATE_SCALE), START)
            .await;
        handles.ledger.deposit(&usd(), u128::MAX / 2).await;
        handles.ledger.deposit(&ant(), u128::MAX / 2).await;
        handles.events.clear().await;

        Self {
            engine,
            clock: handles.clock,
            oracle: handles.oracle,
            ledger: handles.ledger,
            events: handles.events,
        }
    }

    pub async fn hire(&self, address: &str, salary_per_second: Amount) -> EmployeeId {
        self.engine
            .hire_now(AccountId::from(address), salary_per_second, "Dev")
            .await
            .unwrap()
    }

    pub async fn allocate(&self, address: &str, split: &[(AssetId, u8)]) {
        let id = self
            .engine
            .employee_id_by_address(&AccountId::from(address))
            .await
            .unwrap();
        let (assets, percentages): (Vec<_>, Vec<_>) = split.iter().cloned().unzip();
        self.engine
            .determine_allocation(&AccountId::from(address), id, &assets, &percentages)
            .await
            .unwrap();
    }

    /// Refreshes the USD/ANT quote so it is fresh at the current time.
    pub async fn refresh_rate(&self) {
        let now = self.clock.now();
        self.oracle
            .set_rate(&usd(), &ant(), Rate::new(2 * RATE_SCALE), now)
            .await;
    }

    pub async fn balance(&self, address: &str, asset: &AssetId) -> Amount {
        self.ledger.balance_of(&AccountId::from(address), asset).await
    }
}
