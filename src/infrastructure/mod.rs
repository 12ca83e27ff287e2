//! Adapters implementing the domain ports.
//!
//! Everything here is host plumbing: the engine only ever sees the traits in
//! `domain::ports`.

pub mod clock;
pub mod in_memory;
pub mod ledger;
pub mod logging;
pub mod oracle;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
