//! Persistence boundaries consumed by the scheduling engine.
//!
//! Three traits, one per external collaborator:
//! - ClientRepository: lookup by name, creation with a seed
//! - AppointmentRepository: insert, status update, listing
//! - ServiceCatalog: read-only service lookup
//!
//! Implementations are scoped to one professional; callers never pass an
//! owner id. Durable ids are minted by the implementation.

use super::error::RepositoryError;
use crate::models::*;

pub trait ClientRepository: Send + Sync {
    /// Exact name match; `None` when no client carries that name.
    fn find_by_name(&self, name: &str) -> Result<Option<Client>, RepositoryError>;

    /// Create a client and return it with its durable id.
    fn create(&self, seed: &ClientSeed) -> Result<Client, RepositoryError>;
}

pub trait AppointmentRepository: Send + Sync {
    /// Persist a draft; the returned record carries the assigned id.
    fn insert(&self, draft: AppointmentDraft) -> Result<Appointment, RepositoryError>;

    /// Persist a status change. Both columns are always written together;
    /// the deposit is dropped once payment leaves PAGO_SINAL.
    fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
        payment_status: PaymentStatus,
    ) -> Result<(), RepositoryError>;

    /// Every appointment of the professional, by date then time.
    fn list(&self) -> Result<Vec<Appointment>, RepositoryError>;
}

pub trait ServiceCatalog: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Service>, RepositoryError>;

    /// Catalog order; the first entry is the booking default.
    fn all(&self) -> Result<Vec<Service>, RepositoryError>;
}
