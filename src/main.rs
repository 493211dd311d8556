use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use momo_reconcile::application::desk::PaymentDesk;
use momo_reconcile::domain::amount::{DEFAULT_REQUIRED_AMOUNT, Rwf};
use momo_reconcile::domain::appointment::Appointment;
use momo_reconcile::infrastructure::in_memory::{InMemoryAppointmentStore, InMemoryMessageStore};
use momo_reconcile::interfaces::csv::dispatch::handle_event;
use momo_reconcile::interfaces::csv::event_reader::EventReader;
use momo_reconcile::interfaces::csv::outcome_writer::{OutcomeWriter, write_appointments};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true, env = "MOMO_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Amount in RWF a payment must cover to be approved.
    #[arg(long, global = true, env = "MOMO_REQUIRED_AMOUNT", default_value_t = DEFAULT_REQUIRED_AMOUNT)]
    required_amount: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest SMS notifications, one per line, printing one JSON outcome per line
    Ingest {
        /// File with notifications (reads stdin when omitted)
        input: Option<PathBuf>,
    },
    /// Check whether a transaction covers the required amount
    Check {
        #[arg(long)]
        txid: String,
    },
    /// Verify a payment and confirm the payer's pending appointment
    Verify {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        txid: String,
    },
    /// Record a pending appointment
    Book {
        #[arg(long)]
        id: u64,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
    },
    /// Print all appointments as CSV
    Appointments,
    /// Replay a CSV event log (kind,id,txid,email,name,message)
    Run {
        /// Input events CSV file
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let desk = open_desk(cli.db_path, Rwf::from(cli.required_amount))?;

    match cli.command {
        Command::Ingest { input } => {
            let source: Box<dyn BufRead> = match input {
                Some(path) => Box::new(BufReader::new(File::open(path).into_diagnostic()?)),
                None => Box::new(BufReader::new(io::stdin())),
            };
            let mut stdout = io::stdout().lock();
            for line in source.split(b'\n') {
                let bytes = line.into_diagnostic()?;
                let bytes = bytes.strip_suffix(b"\r").unwrap_or(&bytes);
                // Undecodable bytes become U+FFFD and are ignored as unsupported text.
                let text = String::from_utf8_lossy(bytes);
                let outcome = desk.ingest(&text).await.into_diagnostic()?;
                let json = serde_json::to_string(&outcome).into_diagnostic()?;
                writeln!(stdout, "{json}").into_diagnostic()?;
            }
        }
        Command::Check { txid } => {
            let verdict = desk.check(&txid).await.into_diagnostic()?;
            println!("{}", serde_json::to_string(&verdict).into_diagnostic()?);
        }
        Command::Verify { email, name, txid } => {
            let verdict = desk.verify(&email, &name, &txid).await.into_diagnostic()?;
            println!("{}", serde_json::to_string(&verdict).into_diagnostic()?);
        }
        Command::Book { id, email, name } => {
            desk.book(Appointment::new(id, &email, &name))
                .await
                .into_diagnostic()?;
        }
        Command::Appointments => {
            let appointments = desk.appointments().await.into_diagnostic()?;
            write_appointments(io::stdout().lock(), &appointments).into_diagnostic()?;
        }
        Command::Run { input } => {
            let file = File::open(input).into_diagnostic()?;
            let reader = EventReader::new(file);
            let mut writer = OutcomeWriter::new(io::stdout().lock());
            for event_result in reader.events() {
                match event_result {
                    Ok(event) => match handle_event(&desk, event).await {
                        Ok(row) => writer.write_outcome(&row).into_diagnostic()?,
                        Err(e) => {
                            eprintln!("Error processing event: {}", e);
                        }
                    },
                    Err(e) => {
                        eprintln!("Error reading event: {}", e);
                    }
                }
            }
            writer.flush().into_diagnostic()?;
        }
    }

    Ok(())
}

#[cfg(feature = "storage-rocksdb")]
fn open_desk(db_path: Option<PathBuf>, required_amount: Rwf) -> Result<PaymentDesk> {
    use momo_reconcile::infrastructure::rocksdb::RocksDBStore;

    if let Some(db_path) = db_path {
        let store = RocksDBStore::open(db_path).into_diagnostic()?;
        return Ok(PaymentDesk::new(store.clone(), store, required_amount));
    }
    Ok(in_memory_desk(required_amount))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_desk(db_path: Option<PathBuf>, required_amount: Rwf) -> Result<PaymentDesk> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_desk(required_amount))
}

fn in_memory_desk(required_amount: Rwf) -> PaymentDesk {
    PaymentDesk::new(
        InMemoryMessageStore::new(),
        InMemoryAppointmentStore::new(),
        required_amount,
    )
}
