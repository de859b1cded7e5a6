//! In-memory boundary fakes with failure injection, shared by the
//! scheduling and session tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::error::RepositoryError;
use super::traits::{AppointmentRepository, ClientRepository, ServiceCatalog};
use crate::models::*;

#[derive(Default)]
pub struct FakeClients {
    clients: Mutex<Vec<Client>>,
    failure: Mutex<Option<String>>,
    lookups: AtomicUsize,
}

impl FakeClients {
    /// Existing client with one past visit.
    pub fn seed(&self, name: &str) -> ClientId {
        let seed = ClientSeed::first_visit(
            name,
            "Nagô",
            180.0,
            chrono::NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        );
        self.create(&seed).unwrap().id
    }

    pub fn fail_next(&self, reason: &str) {
        *self.failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn count(&self) -> usize {
        self.clients.lock().unwrap().len()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn get(&self, id: &ClientId) -> Option<Client> {
        self.clients.lock().unwrap().iter().find(|c| &c.id == id).cloned()
    }

    fn check(&self) -> Result<(), RepositoryError> {
        match self.failure.lock().unwrap().take() {
            Some(reason) => Err(RepositoryError::Unavailable(reason)),
            None => Ok(()),
        }
    }
}

impl ClientRepository for FakeClients {
    fn find_by_name(&self, name: &str) -> Result<Option<Client>, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .clients
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    fn create(&self, seed: &ClientSeed) -> Result<Client, RepositoryError> {
        self.check()?;
        let client = Client {
            id: ClientId::generate(),
            name: seed.name.clone(),
            status: seed.status,
            last_visit: seed.last_visit,
            phone: None,
            instagram: None,
            notes: None,
            total_spent: seed.total_spent,
            total_visits: seed.total_visits,
            history: seed.history.clone(),
        };
        self.clients.lock().unwrap().push(client.clone());
        Ok(client)
    }
}

#[derive(Default)]
pub struct FakeAppointments {
    rows: Mutex<Vec<Appointment>>,
    failure: Mutex<Option<String>>,
    delay: Mutex<Option<Duration>>,
    inserts: AtomicUsize,
    status_writes: AtomicUsize,
}

impl FakeAppointments {
    pub fn fail_next(&self, reason: &str) {
        *self.failure.lock().unwrap() = Some(reason.to_string());
    }

    /// Every insert sleeps this long before answering.
    pub fn slow_inserts(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn rows(&self) -> Vec<Appointment> {
        self.rows.lock().unwrap().clone()
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn status_writes(&self) -> usize {
        self.status_writes.load(Ordering::SeqCst)
    }

    pub fn preload(&self, appointment: Appointment) {
        self.rows.lock().unwrap().push(appointment);
    }

    fn check(&self) -> Result<(), RepositoryError> {
        match self.failure.lock().unwrap().take() {
            Some(reason) => Err(RepositoryError::Unavailable(reason)),
            None => Ok(()),
        }
    }
}

impl AppointmentRepository for FakeAppointments {
    fn insert(&self, draft: AppointmentDraft) -> Result<Appointment, RepositoryError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let stored = draft.into_appointment(uuid::Uuid::new_v4().to_string());
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
        payment_status: PaymentStatus,
    ) -> Result<(), RepositoryError> {
        self.status_writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| RepositoryError::Unavailable(format!("no row {id}")))?;
        row.status = status;
        row.payment_status = payment_status;
        if payment_status != PaymentStatus::PagoSinal {
            row.deposit_value = None;
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<Appointment>, RepositoryError> {
        self.check()?;
        Ok(self.rows())
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    services: Mutex<Vec<Service>>,
}

impl FakeCatalog {
    pub fn with(services: Vec<Service>) -> Self {
        Self {
            services: Mutex::new(services),
        }
    }

    pub fn set_price(&self, id: &str, price: f64) {
        if let Some(s) = self.services.lock().unwrap().iter_mut().find(|s| s.id == id) {
            s.price = price;
        }
    }
}

impl ServiceCatalog for FakeCatalog {
    fn get(&self, id: &str) -> Result<Option<Service>, RepositoryError> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    fn all(&self) -> Result<Vec<Service>, RepositoryError> {
        Ok(self.services.lock().unwrap().clone())
    }
}

pub fn service(id: &str, name: &str, price: f64, material_cost: f64) -> Service {
    Service {
        id: id.into(),
        name: name.into(),
        price,
        duration_minutes: 240,
        material_cost,
        indirect_cost: 0.0,
        category: ServiceCategory::Trancas,
        description: None,
    }
}

/// Default catalog: Box Braids G first.
pub fn braids_catalog() -> FakeCatalog {
    FakeCatalog::with(vec![
        service("s-box", "Box Braids G", 450.0, 90.0),
        service("s-nago", "Nagô", 180.0, 20.0),
    ])
}
