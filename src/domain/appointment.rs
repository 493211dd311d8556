use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// An appointment booked by a patient and awaiting (or holding) payment.
///
/// Appointments are created by the booking side. Reconciliation only ever
/// moves them from `Pending` to `Confirmed`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Appointment {
    pub id: u64,
    pub patient_email: String,
    pub patient_first_name: String,
    pub status: AppointmentStatus,
    /// Whether a payment has been matched to this appointment.
    pub payment_status: bool,
    pub payment_transaction_id: Option<String>,
}

impl Appointment {
    /// Creates a pending, unpaid appointment.
    pub fn new(id: u64, patient_email: &str, patient_first_name: &str) -> Self {
        Self {
            id,
            patient_email: patient_email.to_string(),
            patient_first_name: patient_first_name.to_string(),
            status: AppointmentStatus::Pending,
            payment_status: false,
            payment_transaction_id: None,
        }
    }

    pub fn apply(&mut self, update: &AppointmentUpdate) {
        self.payment_status = update.payment_status;
        self.status = update.status;
        self.payment_transaction_id = Some(update.payment_transaction_id.clone());
    }
}

/// Equality filter used to look up appointments. Every field must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub patient_email: String,
    pub patient_first_name: String,
    pub status: AppointmentStatus,
}

impl AppointmentFilter {
    pub fn pending_for(patient_email: &str, patient_first_name: &str) -> Self {
        Self {
            patient_email: patient_email.to_string(),
            patient_first_name: patient_first_name.to_string(),
            status: AppointmentStatus::Pending,
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        appointment.patient_email == self.patient_email
            && appointment.patient_first_name == self.patient_first_name
            && appointment.status == self.status
    }
}

/// Fields written to an appointment once its payment is verified.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppointmentUpdate {
    pub payment_status: bool,
    pub status: AppointmentStatus,
    pub payment_transaction_id: String,
}

impl AppointmentUpdate {
    pub fn confirm_payment(txid: &str) -> Self {
        Self {
            payment_status: true,
            status: AppointmentStatus::Confirmed,
            payment_transaction_id: txid.to_string(),
        }
    }
}
