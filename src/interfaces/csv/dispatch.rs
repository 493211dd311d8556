use super::event_reader::{Event, EventKind};
use super::outcome_writer::OutcomeRow;
use crate::application::desk::PaymentDesk;
use crate::application::intake::IngestOutcome;
use crate::domain::appointment::Appointment;
use crate::error::{MomoError, Result};

/// Runs one event through the desk and describes what happened.
pub async fn handle_event(desk: &PaymentDesk, event: Event) -> Result<OutcomeRow> {
    match event.kind {
        EventKind::Sms => match desk.ingest(&event.message).await? {
            IngestOutcome::Ignored { reason } => Ok(OutcomeRow {
                kind: event.kind,
                txid: String::new(),
                status: "ignored".to_string(),
                message: reason,
            }),
            IngestOutcome::Saved { data } => Ok(OutcomeRow {
                kind: event.kind,
                message: format!("Saved {} from {}", data.amount, data.sender_name),
                txid: data.txid,
                status: "saved".to_string(),
            }),
        },
        EventKind::Book => {
            let id = event
                .id
                .ok_or_else(|| MomoError::InvalidEvent("book event without an id".to_string()))?;
            desk.book(Appointment::new(id, &event.email, &event.name))
                .await?;
            Ok(OutcomeRow {
                kind: event.kind,
                txid: String::new(),
                status: "booked".to_string(),
                message: format!("Appointment {id} is pending payment"),
            })
        }
        EventKind::Check => {
            let verdict = desk.check(&event.txid).await?;
            Ok(OutcomeRow {
                kind: event.kind,
                txid: event.txid,
                status: verdict.status.to_string(),
                message: verdict.message,
            })
        }
        EventKind::Verify => {
            let verdict = desk.verify(&event.email, &event.name, &event.txid).await?;
            Ok(OutcomeRow {
                kind: event.kind,
                txid: event.txid,
                status: verdict.status.to_string(),
                message: verdict.message,
            })
        }
    }
}
