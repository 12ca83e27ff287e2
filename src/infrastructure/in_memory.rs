use crate::domain::asset::{AccountId, AssetId};
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::event::PayrollEvent;
use crate::domain::ports::{EmployeeStore, EventSink};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Registry {
    employees: BTreeMap<EmployeeId, Employee>,
    by_address: HashMap<AccountId, EmployeeId>,
    last_id: u64,
    allowed_assets: Vec<AssetId>,
}

/// A thread-safe in-memory employee registry.
///
/// Records live in a map keyed by id with a secondary index from address to id.
/// Clones share the same registry.
#[derive(Default, Clone)]
pub struct InMemoryEmployeeStore {
    registry: Arc<RwLock<Registry>>,
}

impl InMemoryEmployeeStore {
    /// Creates a new, empty in-memory employee store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn next_id(&self) -> Result<EmployeeId> {
        let mut registry = self.registry.write().await;
        registry.last_id += 1;
        Ok(EmployeeId(registry.last_id))
    }

    async fn get(&self, id: EmployeeId) -> Result<Option<Employee>> {
        let registry = self.registry.read().await;
        Ok(registry.employees.get(&id).cloned())
    }

    async fn find_by_address(&self, address: &AccountId) -> Result<Option<Employee>> {
        let registry = self.registry.read().await;
        Ok(registry
            .by_address
            .get(address)
            .and_then(|id| registry.employees.get(id))
            .cloned())
    }

    async fn store(&self, employee: Employee) -> Result<()> {
        let mut guard = self.registry.write().await;
        let registry = &mut *guard;
        if let Some(previous) = registry.employees.get(&employee.id)
            && previous.address != employee.address
        {
            registry.by_address.remove(&previous.address);
        }
        registry.by_address.insert(employee.address.clone(), employee.id);
        registry.employees.insert(employee.id, employee);
        Ok(())
    }

    async fn remove(&self, id: EmployeeId) -> Result<()> {
        let mut registry = self.registry.write().await;
        if let Some(employee) = registry.employees.remove(&id) {
            registry.by_address.remove(&employee.address);
        }
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Employee>> {
        let registry = self.registry.read().await;
        Ok(registry.employees.values().cloned().collect())
    }

    async fn allowed_assets(&self) -> Result<Vec<AssetId>> {
        Ok(self.registry.read().await.allowed_assets.clone())
    }

    async fn save_allowed_assets(&self, assets: &[AssetId]) -> Result<()> {
        self.registry.write().await.allowed_assets = assets.to_vec();
        Ok(())
    }
}

/// Keeps every published event, in order. Clones share the same log.
#[derive(Default, Clone)]
pub struct InMemoryEventLog {
    events: Arc<RwLock<Vec<PayrollEvent>>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<PayrollEvent> {
        self.events.read().await.clone()
    }

    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

#[async_trait]
impl EventSink for InMemoryEventLog {
    async fn publish(&self, event: PayrollEvent) {
        self.events.write().await.push(event);
    }
}
