use crate::domain::asset::{AccountId, Amount, AssetId, Rate, Timestamp};
use crate::domain::employee::EmployeeId;
use crate::error::{PayrollError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    Deposit,
    Allow,
    Rate,
    Hire,
    Terminate,
    Salary,
    Bonus,
    Reimbursement,
    Allocate,
    Address,
    Payday,
    PayBonus,
    Reimburse,
}

/// One raw row of the command file. Which columns matter depends on `op`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub op: Op,
    pub time: Option<Timestamp>,
    pub account: Option<String>,
    pub employee: Option<u64>,
    pub amount: Option<String>,
    pub asset: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    Deposit { asset: AssetId, amount: Amount },
    Allow { asset: AssetId },
    /// `rate` units of `asset` per denomination unit.
    Rate { asset: AssetId, rate: Rate },
    Hire {
        address: AccountId,
        salary_per_second: Amount,
        role: String,
        start_date: Option<Timestamp>,
    },
    Terminate { employee: EmployeeId, end_date: Option<Timestamp> },
    Salary { employee: EmployeeId, salary_per_second: Amount },
    Bonus { employee: EmployeeId, amount: Amount },
    Reimbursement { employee: EmployeeId, amount: Amount },
    Allocate {
        caller: AccountId,
        employee: Option<EmployeeId>,
        split: Vec<(AssetId, u8)>,
    },
    Address { caller: AccountId, new_address: AccountId },
    Payday { caller: AccountId, amount: Option<Amount> },
    PayBonus { caller: AccountId, amount: Option<Amount> },
    Reimburse { caller: AccountId, amount: Option<Amount> },
}

/// A command together with the time it happens at, if the row gives one.
#[derive(Debug, PartialEq, Clone)]
pub struct TimedCommand {
    pub time: Option<Timestamp>,
    pub command: Command,
}

fn required<T>(value: Option<T>, column: &str, op: Op) -> Result<T> {
    value.ok_or_else(|| PayrollError::Validation(format!("{op:?} requires `{column}`")))
}

fn parse_amount(raw: &str) -> Result<Amount> {
    Amount::from_str(raw).map_err(|e| PayrollError::Validation(format!("Invalid amount {raw:?}: {e}")))
}

fn parse_timestamp(raw: &str) -> Result<Timestamp> {
    Timestamp::from_str(raw).map_err(|e| PayrollError::Validation(format!("Invalid time {raw:?}: {e}")))
}

/// Parses `ASSET:PCT;ASSET:PCT`.
fn parse_split(raw: &str) -> Result<Vec<(AssetId, u8)>> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (asset, percentage) = entry.split_once(':').ok_or_else(|| {
                PayrollError::Validation(format!("Invalid allocation entry {entry:?}"))
            })?;
            let percentage = u8::from_str(percentage.trim()).map_err(|e| {
                PayrollError::Validation(format!("Invalid percentage in {entry:?}: {e}"))
            })?;
            Ok((AssetId::new(asset.trim()), percentage))
        })
        .collect()
}

/// Parses `ROLE` or `ROLE@START_DATE`.
fn parse_role(raw: Option<String>) -> Result<(String, Option<Timestamp>)> {
    let raw = raw.unwrap_or_default();
    match raw.rsplit_once('@') {
        Some((role, start)) => Ok((role.trim().to_string(), Some(parse_timestamp(start.trim())?))),
        None => Ok((raw, None)),
    }
}

impl TryFrom<CommandRecord> for TimedCommand {
    type Error = PayrollError;

    fn try_from(record: CommandRecord) -> Result<Self> {
        let op = record.op;
        let amount = record.amount.as_deref().map(parse_amount);
        let asset = record.asset.map(AssetId::new);
        let employee = record.employee.map(EmployeeId);
        let account = record.account.map(AccountId::new);

        let command = match op {
            Op::Deposit => Command::Deposit {
                asset: required(asset, "asset", op)?,
                amount: required(amount, "amount", op)??,
            },
            Op::Allow => Command::Allow {
                asset: required(asset, "asset", op)?,
            },
            Op::Rate => {
                let raw = required(record.amount, "amount", op)?;
                let value = Decimal::from_str(&raw)
                    .map_err(|e| PayrollError::Validation(format!("Invalid rate {raw:?}: {e}")))?;
                Command::Rate {
                    asset: required(asset, "asset", op)?,
                    rate: Rate::from_decimal(value)?,
                }
            }
            Op::Hire => {
                let (role, start_date) = parse_role(record.target)?;
                Command::Hire {
                    address: required(account, "account", op)?,
                    salary_per_second: required(amount, "amount", op)??,
                    role,
                    start_date,
                }
            }
            Op::Terminate => Command::Terminate {
                employee: required(employee, "employee", op)?,
                end_date: record.target.as_deref().map(parse_timestamp).transpose()?,
            },
            Op::Salary => Command::Salary {
                employee: required(employee, "employee", op)?,
                salary_per_second: required(amount, "amount", op)??,
            },
            Op::Bonus => Command::Bonus {
                employee: required(employee, "employee", op)?,
                amount: required(amount, "amount", op)??,
            },
            Op::Reimbursement => Command::Reimbursement {
                employee: required(employee, "employee", op)?,
                amount: required(amount, "amount", op)??,
            },
            Op::Allocate => Command::Allocate {
                caller: required(account, "account", op)?,
                employee,
                split: parse_split(&required(record.target, "target", op)?)?,
            },
            Op::Address => Command::Address {
                caller: required(account, "account", op)?,
                new_address: AccountId::new(required(record.target, "target", op)?),
            },
            Op::Payday => Command::Payday {
                caller: required(account, "account", op)?,
                amount: amount.transpose()?,
            },
            Op::PayBonus => Command::PayBonus {
                caller: required(account, "account", op)?,
                amount: amount.transpose()?,
            },
            Op::Reimburse => Command::Reimburse {
                caller: required(account, "account", op)?,
                amount: amount.transpose()?,
            },
        };

        Ok(TimedCommand {
            time: record.time,
            command,
        })
    }
}

/// Reads payroll commands from a CSV source.
///
/// Columns are `op, time, account, employee, amount, asset, target`; whitespace
/// is trimmed and missing trailing columns are allowed.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily parses commands, one result per row.
    pub fn commands(self) -> impl Iterator<Item = Result<TimedCommand>> {
        self.reader
            .into_deserialize::<CommandRecord>()
            .map(|result| result.map_err(PayrollError::from).and_then(TimedCommand::try_from))
    }
}
