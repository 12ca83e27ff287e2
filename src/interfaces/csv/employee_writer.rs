use crate::domain::asset::{Amount, Timestamp};
use crate::domain::employee::{Allocation, Employee};
use crate::error::Result;
use std::io::Write;

const HEADER: [&str; 11] = [
    "id",
    "address",
    "role",
    "salary_per_second",
    "owed_salary",
    "accrued_salary",
    "bonus",
    "reimbursement",
    "last_payroll_time",
    "end_date",
    "allocation",
];

/// Writes the employee table as CSV.
pub struct EmployeeWriter<W: Write> {
    writer: csv::Writer<W>,
}

fn format_allocation(allocation: &Allocation) -> String {
    allocation
        .iter()
        .map(|(asset, percentage)| format!("{asset}:{percentage}"))
        .collect::<Vec<_>>()
        .join(";")
}

impl<W: Write> EmployeeWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    /// Writes one row per employee, with owed salary evaluated at `now`.
    pub fn write_employees(&mut self, employees: &[Employee], now: Timestamp) -> Result<()> {
        self.writer.write_record(HEADER)?;
        for employee in employees {
            let owed = employee.owed_salary(now).unwrap_or(Amount::MAX);
            self.writer.write_record([
                employee.id.to_string(),
                employee.address.to_string(),
                employee.role.clone(),
                employee.salary_per_second.to_string(),
                owed.to_string(),
                employee.accrued_salary.to_string(),
                employee.bonus.to_string(),
                employee.reimbursement.to_string(),
                employee.last_payroll_time.to_string(),
                employee.end_date.map(|end| end.to_string()).unwrap_or_default(),
                format_allocation(&employee.allocation),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
