//! Application layer containing the payroll business logic.
//!
//! `PayrollEngine` is the single entry point. Its operations are split by
//! concern across `registry`, `allocation`, `accrual` and `payout`, and every
//! one of them reads and writes employee state through the domain ports only.

pub mod accrual;
pub mod allocation;
pub mod config;
pub mod engine;
pub mod payout;
pub mod registry;

#[cfg(test)]
pub(crate) mod fixtures;
