#![allow(dead_code)]

use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const HEADER: [&str; 7] = ["op", "time", "account", "employee", "amount", "asset", "target"];

/// Writes a command file funding USD, hiring `employees` people at one unit per
/// second and paying all of them at `payday`.
pub fn generate_payroll_csv(path: &Path, employees: usize, payday: u64) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;
    wtr.write_record(["deposit", "0", "", "", "1000000000000", "USD", ""])?;
    wtr.write_record(["allow", "0", "", "", "", "USD", ""])?;

    for i in 1..=employees {
        let address = format!("employee-{i}");
        wtr.write_record(["hire", "0", &address, "", "1", "", "Dev"])?;
        wtr.write_record(["allocate", "0", &address, &i.to_string(), "", "", "USD:100"])?;
    }

    let payday = payday.to_string();
    for i in 1..=employees {
        let address = format!("employee-{i}");
        wtr.write_record(["payday", &payday, &address, "", "", "", ""])?;
    }

    wtr.flush()?;
    Ok(())
}
