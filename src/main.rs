use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payroll_engine::application::config::PayrollConfig;
use payroll_engine::domain::asset::{AssetId, Timestamp};
use payroll_engine::domain::ports::EmployeeStoreBox;
use payroll_engine::infrastructure::in_memory::InMemoryEmployeeStore;
use payroll_engine::infrastructure::logging::TracingEventSink;
#[cfg(feature = "storage-rocksdb")]
use payroll_engine::infrastructure::rocksdb::RocksDBEmployeeStore;
use payroll_engine::interfaces::csv::command_reader::CommandReader;
use payroll_engine::interfaces::csv::employee_writer::EmployeeWriter;
use payroll_engine::interfaces::csv::payment_writer::PaymentWriter;
use payroll_engine::interfaces::replay::Replay;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input payroll commands CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Denomination asset, overriding the configuration file
    #[arg(long)]
    denomination: Option<String>,

    /// Rate expiry in seconds, overriding the configuration file
    #[arg(long)]
    rate_expiry: Option<u64>,

    /// Write every settled transfer to this CSV file
    #[arg(long)]
    payments: Option<PathBuf>,

    /// Clock time before the first command
    #[arg(long, default_value_t = 0)]
    start: Timestamp,
}

fn init_logging(config: &PayrollConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_ansi(io::stderr().is_terminal()),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> Result<PayrollConfig> {
    let mut config = match &cli.config {
        Some(path) => PayrollConfig::from_path(path).into_diagnostic()?,
        None => PayrollConfig::new("USD"),
    };
    if let Some(denomination) = &cli.denomination {
        config.denomination_asset = AssetId::new(denomination.as_str());
    }
    if let Some(rate_expiry) = cli.rate_expiry {
        config.rate_expiry = rate_expiry;
    }
    Ok(config)
}

fn open_store(db_path: Option<PathBuf>) -> Result<EmployeeStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = RocksDBEmployeeStore::open(&path).into_diagnostic()?;
            info!(path = %path.display(), "using RocksDB employee store");
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryEmployeeStore::new()))
        }
        None => Ok(Box::new(InMemoryEmployeeStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config);

    let store = open_store(cli.db_path.clone())?;
    let mut replay = Replay::new(config, store, Box::new(TracingEventSink), cli.start)
        .await
        .into_diagnostic()?;

    let mut payments = match &cli.payments {
        Some(path) => Some(PaymentWriter::new(File::create(path).into_diagnostic()?)),
        None => None,
    };

    // Replay commands, reporting rejected ones and carrying on
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for (index, command) in reader.commands().enumerate() {
        let row = index + 1;
        match command {
            Ok(command) => match replay.apply(command).await {
                Ok(transfers) => {
                    if let Some(writer) = payments.as_mut() {
                        writer
                            .write_transfers(replay.now(), &transfers)
                            .into_diagnostic()?;
                    }
                }
                Err(e) => warn!(row, "Error processing command: {}", e),
            },
            Err(e) => warn!(row, "Error reading command: {}", e),
        }
    }

    if let Some(writer) = payments.as_mut() {
        writer.flush().into_diagnostic()?;
    }

    // Output final state
    let employees = replay.engine().employees().await.into_diagnostic()?;
    info!(employees = employees.len(), now = replay.now(), "replay finished");
    let stdout = io::stdout();
    let mut writer = EmployeeWriter::new(stdout.lock());
    writer
        .write_employees(&employees, replay.now())
        .into_diagnostic()?;

    Ok(())
}
