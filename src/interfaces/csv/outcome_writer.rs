use super::event_reader::EventKind;
use crate::domain::appointment::Appointment;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Result of handling one event, as written to the output CSV.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct OutcomeRow {
    pub kind: EventKind,
    pub txid: String,
    /// `saved`/`ignored`, `booked`, or a verdict status.
    pub status: String,
    pub message: String,
}

/// Writes event outcomes as CSV.
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_outcome(&mut self, row: &OutcomeRow) -> Result<()> {
        self.writer.serialize(row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes the full appointment table as CSV, one row per appointment.
pub fn write_appointments<W: Write>(sink: W, appointments: &[Appointment]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    for appointment in appointments {
        writer.serialize(appointment)?;
    }
    writer.flush()?;
    Ok(())
}
