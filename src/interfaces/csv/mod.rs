//! CSV surfaces of the binary: the command stream it replays and the reports it writes.

pub mod command_reader;
pub mod employee_writer;
pub mod payment_writer;
