//! Domain types: notifications, amounts, appointments, verdicts and the
//! storage ports the application layer depends on.

pub mod amount;
pub mod appointment;
pub mod notification;
pub mod ports;
pub mod verdict;
