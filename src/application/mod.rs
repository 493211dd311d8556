//! Application layer orchestrating the domain against the storage ports.
//!
//! `MessageIntake` turns inbound notifications into stored transaction
//! records. `Reconciler` checks claimed payments against those records and
//! confirms the matching appointment. `PaymentDesk` wires both to one set of
//! stores for the command-line front end.

pub mod desk;
pub mod intake;
pub mod reconciler;
