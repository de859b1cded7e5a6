//! Appointment scheduling and client reconciliation.
//!
//! Boundaries (traits.rs): the client, appointment and service stores are
//! external collaborators. Everything else here is owned state and pure
//! rules:
//! - transitions: status / payment state machine
//! - reconciler: placeholder client → durable client
//! - store: in-memory appointments of the session
//! - engine: orchestration of the above
//! - stats: day and period aggregation

pub mod engine;
pub mod error;
pub mod reconciler;
pub mod sqlite;
pub mod stats;
pub mod store;
pub mod traits;
pub mod transitions;

#[cfg(test)]
pub(crate) mod fakes;

pub use engine::SchedulingEngine;
pub use error::{RepositoryError, SchedulingError};
pub use reconciler::{ClientReconciler, ReconcileRequest, Resolution};
pub use sqlite::SqliteAgenda;
pub use stats::{DayStats, PeriodStats};
pub use store::AppointmentStore;
pub use traits::{AppointmentRepository, ClientRepository, ServiceCatalog};
