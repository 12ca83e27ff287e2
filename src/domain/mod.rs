//! Domain layer: payroll records, value types and the ports the engine drives.

pub mod asset;
pub mod employee;
pub mod event;
pub mod ports;
