use crate::domain::amount::Rwf;
use crate::domain::appointment::{AppointmentFilter, AppointmentUpdate};
use crate::domain::ports::{AppointmentStoreBox, MessageStoreBox};
use crate::domain::verdict::Verdict;
use crate::error::Result;

const NOT_APPROVED: &str = "Payment is not approved.";
const TXID_NOT_FOUND: &str = "Payment is not approved (TxID not found).";
const INVALID_AMOUNT: &str = "Payment is not approved (invalid amount format).";
const APPROVED: &str = "Payment is approved.";
const NO_PENDING_APPOINTMENT: &str = "No pending appointment found for this email and name.";
const UPDATE_FAILED: &str = "Failed to update appointment status.";
const CONFIRMED: &str = "Payment verified and appointment confirmed!";
const FIELDS_REQUIRED: &str = "All fields are required.";

/// Result of comparing a stored payment with the amount due.
enum Assessment {
    Rejected(Verdict),
    Sufficient,
}

/// Matches claimed payments against the message log and confirms the
/// corresponding appointment.
///
/// Each operation reads, decides and then (for verification) writes. The
/// pending check and the confirming update are separate store calls, so two
/// concurrent verifications of the same appointment may both succeed.
pub struct Reconciler {
    message_store: MessageStoreBox,
    appointment_store: AppointmentStoreBox,
}

impl Reconciler {
    /// Creates a new `Reconciler`.
    ///
    /// # Arguments
    ///
    /// * `message_store` - The log of saved payment notifications.
    /// * `appointment_store` - The appointment table to confirm against.
    pub fn new(message_store: MessageStoreBox, appointment_store: AppointmentStoreBox) -> Self {
        Self {
            message_store,
            appointment_store,
        }
    }

    /// Checks whether the payment recorded under `txid` covers `required`.
    ///
    /// Overpayment is approved.
    pub async fn check_payment(&self, txid: &str, required: Rwf) -> Result<Verdict> {
        match self.assess(txid, required, NOT_APPROVED).await? {
            Assessment::Rejected(verdict) => Ok(verdict),
            Assessment::Sufficient => Ok(Verdict::approved(APPROVED)),
        }
    }

    /// Checks the payment and, if it covers `required`, confirms the first
    /// pending appointment booked under `email` and `name`.
    pub async fn verify_and_update(
        &self,
        txid: &str,
        email: &str,
        name: &str,
        required: Rwf,
    ) -> Result<Verdict> {
        if let Assessment::Rejected(verdict) = self.assess(txid, required, TXID_NOT_FOUND).await? {
            return Ok(verdict);
        }

        let filter = AppointmentFilter::pending_for(email, name);
        let Some(appointment) = self.appointment_store.find(&filter).await?.into_iter().next()
        else {
            tracing::info!(%txid, %email, "No pending appointment for payment");
            return Ok(Verdict::not_approved(NO_PENDING_APPOINTMENT));
        };

        let update = AppointmentUpdate::confirm_payment(txid);
        let updated = self.appointment_store.update(appointment.id, &update).await?;
        if updated == 0 {
            tracing::warn!(%txid, appointment = appointment.id, "Appointment update changed no rows");
            return Ok(Verdict::not_approved(UPDATE_FAILED));
        }

        tracing::info!(%txid, appointment = appointment.id, "Appointment confirmed");
        Ok(Verdict::approved(CONFIRMED))
    }

    /// Entry point for verification requests coming from a form or CLI.
    ///
    /// Rejects the request without touching storage when any field is empty.
    pub async fn verify_request(
        &self,
        email: &str,
        name: &str,
        txid: &str,
        required: Rwf,
    ) -> Result<Verdict> {
        if email.is_empty() || name.is_empty() || txid.is_empty() {
            return Ok(Verdict::not_approved(FIELDS_REQUIRED));
        }
        self.verify_and_update(txid, email, name, required).await
    }

    async fn assess(&self, txid: &str, required: Rwf, not_found: &str) -> Result<Assessment> {
        let Some(record) = self.message_store.find_by_txid(txid).await?.into_iter().next() else {
            tracing::debug!(%txid, "Transaction not found");
            return Ok(Assessment::Rejected(Verdict::not_approved(not_found)));
        };

        let Some(paid) = Rwf::parse_stored(&record.amount) else {
            tracing::warn!(%txid, amount = %record.amount, "Stored amount is not a whole number");
            return Ok(Assessment::Rejected(Verdict::not_approved(INVALID_AMOUNT)));
        };

        if paid < required {
            let shortage = required - paid;
            tracing::debug!(%txid, %paid, %required, "Payment short");
            return Ok(Assessment::Rejected(Verdict::not_approved(format!(
                "Payment is not approved. You are short by {shortage} RWF."
            ))));
        }

        Ok(Assessment::Sufficient)
    }
}
