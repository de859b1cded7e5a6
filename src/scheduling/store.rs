//! In-memory appointments of the active session.
//!
//! Only the engine mutates the store, and only after the repository has
//! accepted the change. Records stay ordered by date, then time.

use chrono::NaiveDate;

use crate::models::{Appointment, AppointmentStatus, PaymentStatus};

#[derive(Debug, Default, Clone)]
pub struct AppointmentStore {
    appointments: Vec<Appointment>,
}

impl AppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything, e.g. after loading from the repository.
    pub fn replace_all(&mut self, mut appointments: Vec<Appointment>) {
        appointments.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));
        self.appointments = appointments;
    }

    /// Insert keeping order. Same-slot records keep arrival order.
    pub fn insert(&mut self, appointment: Appointment) {
        let at = self
            .appointments
            .partition_point(|a| (a.date, &a.time) <= (appointment.date, &appointment.time));
        self.appointments.insert(at, appointment);
    }

    pub fn get(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// Overwrite status and payment of one record. The deposit is dropped
    /// once payment leaves PAGO_SINAL. Returns the updated record, or
    /// `None` when the id is unknown.
    pub fn set_status(
        &mut self,
        id: &str,
        status: AppointmentStatus,
        payment_status: PaymentStatus,
    ) -> Option<&Appointment> {
        let appointment = self.appointments.iter_mut().find(|a| a.id == id)?;
        appointment.status = status;
        appointment.payment_status = payment_status;
        if payment_status != PaymentStatus::PagoSinal {
            appointment.deposit_value = None;
        }
        Some(appointment)
    }

    pub fn all(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn for_date(&self, date: NaiveDate) -> impl Iterator<Item = &Appointment> {
        self.appointments.iter().filter(move |a| a.date == date)
    }

    /// Inclusive on both ends. An inverted range is empty.
    pub fn in_range(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = &Appointment> {
        self.appointments
            .iter()
            .filter(move |a| a.date >= start && a.date <= end)
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}
