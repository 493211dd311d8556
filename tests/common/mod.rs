#![allow(dead_code)]

use std::io::Error;
use tempfile::NamedTempFile;

pub const EVENT_HEADER: [&str; 6] = ["kind", "id", "txid", "email", "name", "message"];

/// A supported "payment received" notification.
pub fn notification(txid: &str, amount: &str, sender: &str) -> String {
    format!(
        "*161*TxId:{txid}*R*You have received {amount} RWF from {sender} (**1234) on your mobile money account at 2024-01-15 10:30:00."
    )
}

/// Writes an event log with the standard header to a temporary file.
pub fn events_file(rows: &[[&str; 6]]) -> Result<NamedTempFile, Error> {
    let file = NamedTempFile::new()?;
    let mut wtr = csv::WriterBuilder::new().from_path(file.path())?;

    wtr.write_record(EVENT_HEADER)?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(file)
}
