use crate::domain::appointment::{Appointment, AppointmentFilter, AppointmentUpdate};
use crate::domain::notification::TransactionRecord;
use crate::domain::ports::{AppointmentStore, MessageStore};
use crate::error::{MomoError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Column Family for the append-only message log.
pub const CF_MESSAGES: &str = "messages";
/// Column Family for appointments.
pub const CF_APPOINTMENTS: &str = "appointments";

/// A persistent store implementation using RocksDB.
///
/// Messages are keyed by a big-endian insertion sequence so iteration yields
/// them in arrival order. Appointments are keyed by their big-endian id.
/// Values are JSON.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    next_sequence: Arc<AtomicU64>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist and resumes the
    /// message sequence after the last stored record.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_messages = ColumnFamilyDescriptor::new(CF_MESSAGES, Options::default());
        let cf_appointments = ColumnFamilyDescriptor::new(CF_APPOINTMENTS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_messages, cf_appointments])?;

        let next_sequence = {
            let cf = column_family(&db, CF_MESSAGES)?;
            match db.iterator_cf(cf, IteratorMode::End).next() {
                Some(item) => {
                    let (key, _) = item?;
                    sequence_from_key(&key)? + 1
                }
                None => 0,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            next_sequence: Arc::new(AtomicU64::new(next_sequence)),
        })
    }

    fn scan<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let cf = column_family(&self.db, name)?;
        let mut items = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            items.push(serde_json::from_slice(&value)?);
        }
        Ok(items)
    }
}

fn column_family<'a>(db: &'a DB, name: &str) -> Result<&'a ColumnFamily> {
    db.cf_handle(name)
        .ok_or_else(|| MomoError::StorageError(format!("column family '{name}' not found")))
}

fn sequence_from_key(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key.try_into().map_err(|_| {
        MomoError::StorageError(format!("malformed message key of {} bytes", key.len()))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

#[async_trait]
impl MessageStore for RocksDBStore {
    async fn insert(&self, record: TransactionRecord) -> Result<()> {
        let cf = column_family(&self.db, CF_MESSAGES)?;
        let key = self.next_sequence.fetch_add(1, Ordering::SeqCst).to_be_bytes();
        let value = serde_json::to_vec(&record)?;
        self.db.put_cf(cf, key, value)?;
        Ok(())
    }

    async fn find_by_txid(&self, txid: &str) -> Result<Vec<TransactionRecord>> {
        let records: Vec<TransactionRecord> = self.scan(CF_MESSAGES)?;
        Ok(records
            .into_iter()
            .filter(|record| record.txid == txid)
            .collect())
    }
}

#[async_trait]
impl AppointmentStore for RocksDBStore {
    async fn store(&self, appointment: Appointment) -> Result<()> {
        let cf = column_family(&self.db, CF_APPOINTMENTS)?;
        let key = appointment.id.to_be_bytes();
        if self.db.get_cf(cf, key)?.is_some() {
            return Err(MomoError::InvalidEvent(format!(
                "appointment {} already exists",
                appointment.id
            )));
        }
        self.db.put_cf(cf, key, serde_json::to_vec(&appointment)?)?;
        Ok(())
    }

    async fn find(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let appointments: Vec<Appointment> = self.scan(CF_APPOINTMENTS)?;
        Ok(appointments
            .into_iter()
            .filter(|appointment| filter.matches(appointment))
            .collect())
    }

    async fn update(&self, id: u64, update: &AppointmentUpdate) -> Result<usize> {
        let cf = column_family(&self.db, CF_APPOINTMENTS)?;
        let key = id.to_be_bytes();
        let Some(bytes) = self.db.get_cf(cf, key)? else {
            return Ok(0);
        };

        let mut appointment: Appointment = serde_json::from_slice(&bytes)?;
        appointment.apply(update);
        self.db.put_cf(cf, key, serde_json::to_vec(&appointment)?)?;
        Ok(1)
    }

    async fn all_appointments(&self) -> Result<Vec<Appointment>> {
        self.scan(CF_APPOINTMENTS)
    }
}
