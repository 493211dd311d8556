use crate::domain::appointment::{Appointment, AppointmentFilter, AppointmentUpdate};
use crate::domain::notification::TransactionRecord;
use crate::domain::ports::{AppointmentStore, MessageStore};
use crate::error::{MomoError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory, append-only message log.
///
/// `Clone` shares the underlying log, so the intake side and the reconciler
/// can each hold a handle to the same records.
#[derive(Default, Clone)]
pub struct InMemoryMessageStore {
    records: Arc<RwLock<Vec<TransactionRecord>>>,
}

impl InMemoryMessageStore {
    /// Creates a new, empty message store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, record: TransactionRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.push(record);
        Ok(())
    }

    async fn find_by_txid(&self, txid: &str) -> Result<Vec<TransactionRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| record.txid == txid)
            .cloned()
            .collect())
    }
}

/// An in-memory appointment table keyed by id.
#[derive(Default, Clone)]
pub struct InMemoryAppointmentStore {
    appointments: Arc<RwLock<BTreeMap<u64, Appointment>>>,
}

impl InMemoryAppointmentStore {
    /// Creates a new, empty appointment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn store(&self, appointment: Appointment) -> Result<()> {
        let mut appointments = self.appointments.write().await;
        match appointments.entry(appointment.id) {
            Entry::Occupied(_) => Err(MomoError::InvalidEvent(format!(
                "appointment {} already exists",
                appointment.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(appointment);
                Ok(())
            }
        }
    }

    async fn find(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(appointments
            .values()
            .filter(|appointment| filter.matches(appointment))
            .cloned()
            .collect())
    }

    async fn update(&self, id: u64, update: &AppointmentUpdate) -> Result<usize> {
        let mut appointments = self.appointments.write().await;
        match appointments.get_mut(&id) {
            Some(appointment) => {
                appointment.apply(update);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn all_appointments(&self) -> Result<Vec<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(appointments.values().cloned().collect())
    }
}
