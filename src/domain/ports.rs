use super::appointment::{Appointment, AppointmentFilter, AppointmentUpdate};
use super::notification::TransactionRecord;
use crate::error::Result;
use async_trait::async_trait;

/// Append-only log of accepted payment notifications.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert(&self, record: TransactionRecord) -> Result<()>;
    /// All records with this transaction id, in insertion order.
    async fn find_by_txid(&self, txid: &str) -> Result<Vec<TransactionRecord>>;
}

/// Appointment table shared with the booking side.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Adds a new appointment. Fails with `InvalidEvent` if the id is taken;
    /// existing rows only change through `update`.
    async fn store(&self, appointment: Appointment) -> Result<()>;
    /// Appointments matching every field of `filter`, ordered by id.
    async fn find(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>>;
    /// Applies `update` to the appointment with `id` and returns the number
    /// of rows changed.
    async fn update(&self, id: u64, update: &AppointmentUpdate) -> Result<usize>;
    async fn all_appointments(&self) -> Result<Vec<Appointment>>;
}

pub type MessageStoreBox = Box<dyn MessageStore>;
pub type AppointmentStoreBox = Box<dyn AppointmentStore>;
