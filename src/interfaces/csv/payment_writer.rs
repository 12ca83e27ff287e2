use crate::domain::asset::Timestamp;
use crate::domain::ports::Transfer;
use crate::error::Result;
use std::io::Write;

/// Writes settled transfers as CSV, one row per transfer.
///
/// The header is written lazily with the first row so that an empty run
/// produces an empty file.
pub struct PaymentWriter<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl<W: Write> PaymentWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
            header_written: false,
        }
    }

    pub fn write_transfers(&mut self, time: Timestamp, transfers: &[Transfer]) -> Result<()> {
        if !self.header_written && !transfers.is_empty() {
            self.writer
                .write_record(["time", "to", "asset", "amount", "reference"])?;
            self.header_written = true;
        }
        for transfer in transfers {
            self.writer.write_record([
                time.to_string(),
                transfer.to.to_string(),
                transfer.asset.to_string(),
                transfer.amount.to_string(),
                transfer.reference.clone(),
            ])?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
