use crate::domain::asset::{AccountId, AssetId};
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::ports::EmployeeStore;
use crate::error::{PayrollError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for employee records, keyed by big-endian id.
pub const CF_EMPLOYEES: &str = "employees";
/// Column Family indexing addresses to employee ids.
pub const CF_ADDRESSES: &str = "addresses";
/// Column Family for the id counter and the allowed settlement assets.
pub const CF_META: &str = "meta";

const LAST_ID_KEY: &[u8] = b"last_id";
const ALLOWED_ASSETS_KEY: &[u8] = b"allowed_assets";

/// A persistent employee registry backed by RocksDB.
///
/// Records and their address index live in separate Column Families and are
/// always written together in one `WriteBatch`, so a crash never leaves an
/// index entry without its record.
///
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBEmployeeStore {
    db: Arc<DB>,
    writer: Arc<Mutex<()>>,
}

impl RocksDBEmployeeStore {
    /// Opens or creates the registry at `path`, creating missing Column Families.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_EMPLOYEES, CF_ADDRESSES, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            writer: Arc::default(),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            PayrollError::Storage(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn read_employee(&self, key: &[u8]) -> Result<Option<Employee>> {
        let cf = self.cf(CF_EMPLOYEES)?;
        match self.db.get_cf(&cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

fn decode_id(bytes: &[u8]) -> Result<u64> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| {
        PayrollError::Storage(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "malformed employee id",
        )))
    })?;
    Ok(u64::from_be_bytes(raw))
}

#[async_trait]
impl EmployeeStore for RocksDBEmployeeStore {
    async fn next_id(&self) -> Result<EmployeeId> {
        let _guard = self.writer.lock().await;
        let cf = self.cf(CF_META)?;
        let last = match self.db.get_cf(&cf, LAST_ID_KEY)? {
            Some(bytes) => decode_id(&bytes)?,
            None => 0,
        };
        let next = last.checked_add(1).ok_or(PayrollError::ArithmeticOverflow)?;
        self.db.put_cf(&cf, LAST_ID_KEY, next.to_be_bytes())?;
        Ok(EmployeeId(next))
    }

    async fn get(&self, id: EmployeeId) -> Result<Option<Employee>> {
        self.read_employee(&id.0.to_be_bytes())
    }

    async fn find_by_address(&self, address: &AccountId) -> Result<Option<Employee>> {
        let cf = self.cf(CF_ADDRESSES)?;
        match self.db.get_cf(&cf, address.as_str().as_bytes())? {
            Some(id) => self.read_employee(&id),
            None => Ok(None),
        }
    }

    async fn store(&self, employee: Employee) -> Result<()> {
        let _guard = self.writer.lock().await;
        let employees = self.cf(CF_EMPLOYEES)?;
        let addresses = self.cf(CF_ADDRESSES)?;
        let key = employee.id.0.to_be_bytes();

        let mut batch = WriteBatch::default();
        if let Some(previous) = self.read_employee(&key)?
            && previous.address != employee.address
        {
            batch.delete_cf(addresses, previous.address.as_str().as_bytes());
        }
        batch.put_cf(addresses, employee.address.as_str().as_bytes(), key);
        batch.put_cf(employees, key, serde_json::to_vec(&employee)?);
        self.db.write(batch)?;

        Ok(())
    }

    async fn remove(&self, id: EmployeeId) -> Result<()> {
        let _guard = self.writer.lock().await;
        let key = id.0.to_be_bytes();
        let Some(employee) = self.read_employee(&key)? else {
            return Ok(());
        };

        let mut batch = WriteBatch::default();
        batch.delete_cf(self.cf(CF_ADDRESSES)?, employee.address.as_str().as_bytes());
        batch.delete_cf(self.cf(CF_EMPLOYEES)?, key);
        self.db.write(batch)?;

        Ok(())
    }

    async fn all(&self) -> Result<Vec<Employee>> {
        let cf = self.cf(CF_EMPLOYEES)?;
        let mut employees = Vec::new();

        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            employees.push(serde_json::from_slice(&value)?);
        }

        Ok(employees)
    }

    async fn allowed_assets(&self) -> Result<Vec<AssetId>> {
        let cf = self.cf(CF_META)?;
        match self.db.get_cf(&cf, ALLOWED_ASSETS_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save_allowed_assets(&self, assets: &[AssetId]) -> Result<()> {
        let _guard = self.writer.lock().await;
        let cf = self.cf(CF_META)?;
        self.db
            .put_cf(&cf, ALLOWED_ASSETS_KEY, serde_json::to_vec(assets)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn employee(id: u64, address: &str) -> Employee {
        Employee::new(EmployeeId(id), AccountId::from(address), 10, "Dev", 0)
    }

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBEmployeeStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_EMPLOYEES).is_some());
        assert!(store.db.cf_handle(CF_ADDRESSES).is_some());
        assert!(store.db.cf_handle(CF_META).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_employee_roundtrip() {
        let dir = tempdir().unwrap();
        let store = RocksDBEmployeeStore::open(dir.path()).unwrap();

        let mut record = employee(1, "alice");
        record.bonus = 1_000;
        record.allocation.insert("USD".into(), 100);
        store.store(record.clone()).await.unwrap();

        assert_eq!(store.get(EmployeeId(1)).await.unwrap(), Some(record.clone()));
        assert_eq!(
            store.find_by_address(&AccountId::from("alice")).await.unwrap(),
            Some(record.clone())
        );
        assert_eq!(store.all().await.unwrap(), vec![record]);
        assert!(store.get(EmployeeId(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_address_change_and_remove() {
        let dir = tempdir().unwrap();
        let store = RocksDBEmployeeStore::open(dir.path()).unwrap();

        let mut record = employee(1, "alice");
        store.store(record.clone()).await.unwrap();
        record.address = AccountId::from("alice-2");
        store.store(record).await.unwrap();

        assert!(store.find_by_address(&AccountId::from("alice")).await.unwrap().is_none());
        assert!(store.find_by_address(&AccountId::from("alice-2")).await.unwrap().is_some());

        store.remove(EmployeeId(1)).await.unwrap();
        assert!(store.find_by_address(&AccountId::from("alice-2")).await.unwrap().is_none());
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rocksdb_ids_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDBEmployeeStore::open(dir.path()).unwrap();
            assert_eq!(store.next_id().await.unwrap(), EmployeeId(1));
            assert_eq!(store.next_id().await.unwrap(), EmployeeId(2));
        }

        let store = RocksDBEmployeeStore::open(dir.path()).unwrap();
        assert_eq!(store.next_id().await.unwrap(), EmployeeId(3));
    }

    #[tokio::test]
    async fn test_rocksdb_allowed_assets_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDBEmployeeStore::open(dir.path()).unwrap();
            assert!(store.allowed_assets().await.unwrap().is_empty());
            store
                .save_allowed_assets(&[AssetId::from("ANT"), AssetId::from("USD")])
                .await
                .unwrap();
        }

        let store = RocksDBEmployeeStore::open(dir.path()).unwrap();
        assert_eq!(
            store.allowed_assets().await.unwrap(),
            vec![AssetId::from("ANT"), AssetId::from("USD")]
        );
    }
}
