//! Scheduling engine: booking and status changes.
//!
//! Order inside `create_appointment` is fixed: validate, pick the
//! service, reconcile the client, persist, then append to the store. A
//! failure at any step leaves the store untouched.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use super::error::SchedulingError;
use super::reconciler::{ClientReconciler, ReconcileRequest};
use super::stats::{self, DayStats, PeriodStats};
use super::store::AppointmentStore;
use super::traits::{AppointmentRepository, ClientRepository, ServiceCatalog};
use super::transitions;
use crate::models::*;

pub struct SchedulingEngine {
    appointments: Arc<dyn AppointmentRepository>,
    catalog: Arc<dyn ServiceCatalog>,
    reconciler: ClientReconciler,
    store: AppointmentStore,
}

impl SchedulingEngine {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        catalog: Arc<dyn ServiceCatalog>,
    ) -> Self {
        Self {
            appointments,
            catalog,
            reconciler: ClientReconciler::new(clients),
            store: AppointmentStore::new(),
        }
    }

    pub fn store(&self) -> &AppointmentStore {
        &self.store
    }

    /// Replace the store with the repository's records.
    pub fn load(&mut self) -> Result<usize, SchedulingError> {
        let appointments = self.appointments.list()?;
        let count = appointments.len();
        self.store.replace_all(appointments);
        tracing::info!(count, "agenda loaded");
        Ok(count)
    }

    pub fn create_appointment(
        &mut self,
        input: NewAppointment,
    ) -> Result<Appointment, SchedulingError> {
        // The name is matched and stored exactly as typed.
        let client_name = input.client_name.as_str();
        if client_name.trim().is_empty() {
            return Err(SchedulingError::Validation(
                "Informe o nome da cliente.".into(),
            ));
        }
        let date = parse_date(&input.date)?;
        let time = parse_time(&input.time)?;
        let deposit_value = normalize_deposit(input.payment_status, input.deposit_value)?;
        let service = self.select_service(input.service_id.as_deref())?;
        let (status, payment_status) = transitions::initial_state(input.payment_status);

        let resolution = self
            .reconciler
            .resolve(
                &input.client,
                &ReconcileRequest {
                    client_name,
                    service_name: &service.name,
                    value: service.price,
                    date,
                },
            )
            .inspect_err(|e| tracing::warn!(error = %e, "client reconciliation failed"))?;

        let draft = AppointmentDraft {
            client_id: resolution.client_id.clone(),
            client_name: client_name.to_string(),
            service_id: service.id,
            service_name: service.name,
            value: service.price,
            date,
            time,
            status,
            payment_status,
            deposit_value,
        };

        let stored = self.appointments.insert(draft).inspect_err(|e| {
            if resolution.created {
                // Not compensated: the new client stays without an appointment.
                tracing::warn!(error = %e, client_id = %resolution.client_id, "appointment insert failed after client creation");
            } else {
                tracing::warn!(error = %e, "appointment insert failed");
            }
        })?;

        tracing::info!(
            appointment_id = %stored.id,
            client_id = %stored.client_id,
            status = %stored.status,
            new_client = resolution.created,
            "appointment created"
        );
        self.store.insert(stored.clone());
        Ok(stored)
    }

    /// Apply a status change. `payment_status` is accepted for callers
    /// that send one, but the state machine decides the stored payment:
    /// completion settles in full, cancellation keeps what was there.
    pub fn update_status(
        &mut self,
        id: &str,
        target: AppointmentStatus,
        payment_status: Option<PaymentStatus>,
    ) -> Result<Appointment, SchedulingError> {
        let current = self
            .store
            .get(id)
            .ok_or_else(|| SchedulingError::NotFound(id.to_string()))?;

        let (status, payment) =
            transitions::apply(current.status, current.payment_status, target)?;
        if let Some(requested) = payment_status.filter(|p| *p != payment) {
            tracing::debug!(requested = %requested, applied = %payment, "requested payment status overridden");
        }

        self.appointments
            .update_status(id, status, payment)
            .inspect_err(|e| tracing::warn!(error = %e, appointment_id = id, "status update failed"))?;

        let updated = self
            .store
            .set_status(id, status, payment)
            .cloned()
            .ok_or_else(|| SchedulingError::NotFound(id.to_string()))?;
        tracing::info!(appointment_id = id, status = %status, payment = %payment, "appointment status changed");
        Ok(updated)
    }

    pub fn day_stats(&self, date: NaiveDate) -> Result<DayStats, SchedulingError> {
        let catalog = self.catalog.all()?;
        Ok(stats::day_stats(&self.store, &catalog, date))
    }

    pub fn period_stats(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PeriodStats, SchedulingError> {
        let catalog = self.catalog.all()?;
        Ok(stats::period_stats(&self.store, &catalog, start, end))
    }

    pub fn days_with_appointments(&self, month: u32, year: i32) -> BTreeSet<u32> {
        stats::days_with_appointments(&self.store, month, year)
    }

    /// Explicit id must exist; no id means the first catalog entry.
    fn select_service(&self, service_id: Option<&str>) -> Result<Service, SchedulingError> {
        match service_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => self.catalog.get(id)?.ok_or_else(|| {
                SchedulingError::Validation(format!("Serviço desconhecido: {id}"))
            }),
            None => self.catalog.all()?.into_iter().next().ok_or_else(|| {
                SchedulingError::Validation("Cadastre um serviço antes de agendar.".into())
            }),
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, SchedulingError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| SchedulingError::Validation(format!("Data inválida: {raw}")))
}

/// Stored as zero-padded `HH:MM`.
fn parse_time(raw: &str) -> Result<String, SchedulingError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| SchedulingError::Validation(format!("Horário inválido: {raw}")))
}

/// A deposit only means something for PAGO_SINAL.
fn normalize_deposit(
    payment_status: PaymentStatus,
    deposit: Option<f64>,
) -> Result<Option<f64>, SchedulingError> {
    match (payment_status, deposit) {
        (PaymentStatus::PagoSinal, Some(v)) if !v.is_finite() || v < 0.0 => Err(
            SchedulingError::Validation("Valor do sinal inválido.".into()),
        ),
        (PaymentStatus::PagoSinal, deposit) => Ok(deposit),
        (PaymentStatus::Pendente | PaymentStatus::PagoTotal, _) => Ok(None),
    }
}
