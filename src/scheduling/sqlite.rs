//! SQLite-backed implementation of the scheduling boundaries.

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::error::RepositoryError;
use super::traits::{AppointmentRepository, ClientRepository, ServiceCatalog};
use crate::db::repository;
use crate::models::*;

/// One professional's view of the agenda database.
///
/// `rusqlite::Connection` is not `Sync`; the mutex makes the three
/// boundary traits shareable behind one `Arc`.
pub struct SqliteAgenda {
    conn: Mutex<Connection>,
    owner_id: String,
}

impl SqliteAgenda {
    pub fn new(conn: Connection, owner_id: impl Into<String>) -> Self {
        Self {
            conn: Mutex::new(conn),
            owner_id: owner_id.into(),
        }
    }

    /// Catalog management lives outside the scheduling core; these two
    /// exist for seeding and for the catalog screens.
    pub fn add_service(&self, service: &Service) -> Result<Service, RepositoryError> {
        let conn = self.lock()?;
        Ok(repository::insert_service(&conn, &self.owner_id, service)?)
    }

    pub fn update_service(&self, service: &Service) -> Result<(), RepositoryError> {
        let conn = self.lock()?;
        Ok(repository::update_service(&conn, &self.owner_id, service)?)
    }

    pub fn clients(&self) -> Result<Vec<Client>, RepositoryError> {
        let conn = self.lock()?;
        Ok(repository::list_clients(&conn, &self.owner_id)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn.lock().map_err(|_| RepositoryError::LockPoisoned)
    }
}

impl ClientRepository for SqliteAgenda {
    fn find_by_name(&self, name: &str) -> Result<Option<Client>, RepositoryError> {
        let conn = self.lock()?;
        Ok(repository::find_client_by_name(&conn, &self.owner_id, name)?)
    }

    fn create(&self, seed: &ClientSeed) -> Result<Client, RepositoryError> {
        let conn = self.lock()?;
        Ok(repository::insert_client(&conn, &self.owner_id, seed)?)
    }
}

impl AppointmentRepository for SqliteAgenda {
    fn insert(&self, draft: AppointmentDraft) -> Result<Appointment, RepositoryError> {
        let conn = self.lock()?;
        Ok(repository::insert_appointment(&conn, &self.owner_id, draft)?)
    }

    fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
        payment_status: PaymentStatus,
    ) -> Result<(), RepositoryError> {
        let conn = self.lock()?;
        Ok(repository::update_appointment_status(
            &conn,
            &self.owner_id,
            id,
            status,
            payment_status,
        )?)
    }

    fn list(&self) -> Result<Vec<Appointment>, RepositoryError> {
        let conn = self.lock()?;
        Ok(repository::list_appointments(&conn, &self.owner_id)?)
    }
}

impl ServiceCatalog for SqliteAgenda {
    fn get(&self, id: &str) -> Result<Option<Service>, RepositoryError> {
        let conn = self.lock()?;
        Ok(repository::get_service(&conn, &self.owner_id, id)?)
    }

    fn all(&self) -> Result<Vec<Service>, RepositoryError> {
        let conn = self.lock()?;
        Ok(repository::list_services(&conn, &self.owner_id)?)
    }
}
