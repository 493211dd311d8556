use crate::error::{MomoError, Result};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// An inbound SMS notification in the `message` column.
    Sms,
    /// A new pending appointment (`id`, `email`, `name`).
    Book,
    /// A payment check for `txid`.
    Check,
    /// A payment verification for `txid`, `email` and `name`.
    Verify,
}

/// One row of an event log.
///
/// Columns not used by an event kind may be left empty or omitted.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct Event {
    pub kind: EventKind,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub txid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

/// Reads events from a CSV source.
///
/// Wraps `csv::Reader` with flexible record lengths. Every field except
/// `message` is trimmed, so notifications keep their exact text.
/// Notifications containing commas (e.g. `7,000 RWF`) must be quoted.
pub struct EventReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> EventReader<R> {
    /// Creates a new `EventReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes events.
    pub fn events(mut self) -> impl Iterator<Item = Result<Event>> {
        let headers = self.reader.headers().cloned().unwrap_or_default();
        let message = headers.iter().position(|header| header == "message");
        self.reader.into_records().map(move |result| {
            let record: StringRecord = result?
                .iter()
                .enumerate()
                .map(|(i, field)| if Some(i) == message { field } else { field.trim() })
                .collect();
            record.deserialize::<Event>(Some(&headers)).map_err(MomoError::from)
        })
    }
}
