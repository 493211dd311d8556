use crate::domain::notification::{self, TransactionRecord, UNSUPPORTED_FORMAT};
use crate::domain::ports::MessageStoreBox;
use crate::error::Result;
use serde::Serialize;

/// What happened to an inbound notification.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum IngestOutcome {
    /// The message does not look like a payment notification. Nothing was stored.
    Ignored { reason: String },
    /// The message was parsed and appended to the message log.
    Saved { data: TransactionRecord },
}

/// Accepts raw SMS notifications and records the supported ones.
pub struct MessageIntake {
    message_store: MessageStoreBox,
}

impl MessageIntake {
    pub fn new(message_store: MessageStoreBox) -> Self {
        Self { message_store }
    }

    /// Parses `raw` and, if it is a supported notification, stores the
    /// extracted record.
    ///
    /// Unsupported messages are a normal outcome, not an error. Only a
    /// failing store produces `Err`.
    pub async fn accept(&self, raw: &str) -> Result<IngestOutcome> {
        if !notification::is_supported(raw) {
            tracing::debug!(len = raw.len(), "Ignoring unsupported message");
            return Ok(IngestOutcome::Ignored {
                reason: UNSUPPORTED_FORMAT.to_string(),
            });
        }

        let record = TransactionRecord::extract(raw);
        self.message_store.insert(record.clone()).await?;
        tracing::info!(txid = %record.txid, amount = %record.amount, "Saved payment notification");

        Ok(IngestOutcome::Saved { data: record })
    }
}
