use super::intake::{IngestOutcome, MessageIntake};
use super::reconciler::Reconciler;
use crate::domain::amount::Rwf;
use crate::domain::appointment::Appointment;
use crate::domain::ports::{AppointmentStore, AppointmentStoreBox, MessageStore};
use crate::domain::verdict::Verdict;
use crate::error::Result;

/// Front desk tying message intake, reconciliation and the appointment table
/// to a single pair of stores and a fixed appointment price.
pub struct PaymentDesk {
    intake: MessageIntake,
    reconciler: Reconciler,
    appointment_store: AppointmentStoreBox,
    required_amount: Rwf,
}

impl PaymentDesk {
    /// Wires the desk to shared store handles.
    ///
    /// Both stores are cloned so that intake and reconciler see the same
    /// records; the stores must share state across clones.
    pub fn new<M, A>(message_store: M, appointment_store: A, required_amount: Rwf) -> Self
    where
        M: MessageStore + Clone + 'static,
        A: AppointmentStore + Clone + 'static,
    {
        Self {
            intake: MessageIntake::new(Box::new(message_store.clone())),
            reconciler: Reconciler::new(Box::new(message_store), Box::new(appointment_store.clone())),
            appointment_store: Box::new(appointment_store),
            required_amount,
        }
    }

    pub async fn ingest(&self, raw: &str) -> Result<IngestOutcome> {
        self.intake.accept(raw).await
    }

    pub async fn check(&self, txid: &str) -> Result<Verdict> {
        self.reconciler.check_payment(txid, self.required_amount).await
    }

    pub async fn verify(&self, email: &str, name: &str, txid: &str) -> Result<Verdict> {
        self.reconciler
            .verify_request(email, name, txid, self.required_amount)
            .await
    }

    /// Records a pending appointment on behalf of the booking side.
    pub async fn book(&self, appointment: Appointment) -> Result<()> {
        tracing::debug!(id = appointment.id, "Booking appointment");
        self.appointment_store.store(appointment).await
    }

    pub async fn appointments(&self) -> Result<Vec<Appointment>> {
        self.appointment_store.all_appointments().await
    }
}
