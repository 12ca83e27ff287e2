//! Drives a `PayrollEngine` from a stream of recorded commands.
//!
//! The replay owns the host side of the ports: a manual clock that follows the
//! command timestamps, an oracle fed by `rate` rows and a ledger funded by
//! `deposit` rows.

use crate::application::config::PayrollConfig;
use crate::application::engine::{PayrollEngine, PayrollPorts};
use crate::domain::asset::Timestamp;
use crate::domain::ports::{EmployeeStoreBox, EventSinkBox, TimeSource, Transfer};
use crate::error::Result;
use crate::infrastructure::clock::ManualClock;
use crate::infrastructure::ledger::InMemoryLedger;
use crate::infrastructure::oracle::StaticPriceOracle;
use crate::interfaces::csv::command_reader::{Command, TimedCommand};
use tracing::debug;

pub struct Replay {
    engine: PayrollEngine,
    clock: ManualClock,
    oracle: StaticPriceOracle,
    ledger: InMemoryLedger,
}

impl Replay {
    /// Builds an engine over `store` and `events`, starting the clock at `start`.
    pub async fn new(
        config: PayrollConfig,
        store: EmployeeStoreBox,
        events: EventSinkBox,
        start: Timestamp,
    ) -> Result<Self> {
        let clock = ManualClock::new(start);
        let oracle = StaticPriceOracle::new();
        let ledger = InMemoryLedger::new();
        let ports = PayrollPorts {
            store,
            clock: Box::new(clock.clone()),
            oracle: Box::new(oracle.clone()),
            gateway: Box::new(ledger.clone()),
            events,
        };
        let engine = PayrollEngine::initialize(config, ports).await?;

        Ok(Self {
            engine,
            clock,
            oracle,
            ledger,
        })
    }

    pub fn engine(&self) -> &PayrollEngine {
        &self.engine
    }

    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Moves the clock to the command's time and runs it.
    ///
    /// Returns the transfers settled by payout commands; other commands settle nothing.
    pub async fn apply(&mut self, step: TimedCommand) -> Result<Vec<Transfer>> {
        if let Some(time) = step.time {
            self.clock.advance_to(time);
        }
        debug!(now = self.clock.now(), command = ?step.command, "applying command");

        let engine = &mut self.engine;
        match step.command {
            Command::Deposit { asset, amount } => {
                self.ledger.deposit(&asset, amount).await;
            }
            Command::Allow { asset } => engine.add_allowed_asset(asset).await?,
            Command::Rate { asset, rate } => {
                let now = self.clock.now();
                self.oracle
                    .set_rate(engine.denomination_asset(), &asset, rate, now)
                    .await;
            }
            Command::Hire {
                address,
                salary_per_second,
                role,
                start_date,
            } => {
                match start_date {
                    Some(start) => {
                        engine
                            .hire_with_start_date(address, salary_per_second, role, start)
                            .await?
                    }
                    None => engine.hire_now(address, salary_per_second, role).await?,
                };
            }
            Command::Terminate { employee, end_date } => match end_date {
                Some(end) => engine.terminate(employee, end).await?,
                None => engine.terminate_now(employee).await?,
            },
            Command::Salary {
                employee,
                salary_per_second,
            } => engine.set_salary(employee, salary_per_second).await?,
            Command::Bonus { employee, amount } => engine.grant_bonus(employee, amount).await?,
            Command::Reimbursement { employee, amount } => {
                engine.grant_reimbursement(employee, amount).await?
            }
            Command::Allocate {
                caller,
                employee,
                split,
            } => {
                let employee = match employee {
                    Some(id) => id,
                    None => engine.employee_id_by_address(&caller).await?,
                };
                let (assets, percentages): (Vec<_>, Vec<_>) = split.into_iter().unzip();
                engine
                    .determine_allocation(&caller, employee, &assets, &percentages)
                    .await?;
            }
            Command::Address {
                caller,
                new_address,
            } => engine.change_address_self(&caller, new_address).await?,
            Command::Payday { caller, amount } => {
                return match amount {
                    Some(amount) => engine.partial_payday(&caller, amount).await,
                    None => engine.payday(&caller).await,
                };
            }
            Command::PayBonus { caller, amount } => {
                return match amount {
                    Some(amount) => engine.partial_pay_bonus(&caller, amount).await,
                    None => engine.pay_bonus(&caller).await,
                };
            }
            Command::Reimburse { caller, amount } => {
                return match amount {
                    Some(amount) => engine.partial_reimburse(&caller, amount).await,
                    None => engine.reimburse(&caller).await,
                };
            }
        }

        Ok(Vec::new())
    }
}
