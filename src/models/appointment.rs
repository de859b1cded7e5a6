use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::client::{ClientId, ClientRef};
use super::enums::{AppointmentStatus, PaymentStatus};

/// A persisted appointment.
///
/// `service_name` and `value` are a snapshot of the catalog at booking
/// time; later catalog edits do not touch them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub client_id: ClientId,
    pub client_name: String,
    pub service_id: String,
    pub service_name: String,
    pub value: f64,
    pub date: NaiveDate,
    pub time: String, // HH:MM
    pub status: AppointmentStatus,
    pub payment_status: PaymentStatus,
    pub deposit_value: Option<f64>,
}

/// An appointment ready for the repository: validated, snapshotted and
/// carrying a durable client id. The repository assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub client_id: ClientId,
    pub client_name: String,
    pub service_id: String,
    pub service_name: String,
    pub value: f64,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub payment_status: PaymentStatus,
    pub deposit_value: Option<f64>,
}

impl AppointmentDraft {
    pub fn into_appointment(self, id: String) -> Appointment {
        Appointment {
            id,
            client_id: self.client_id,
            client_name: self.client_name,
            service_id: self.service_id,
            service_name: self.service_name,
            value: self.value,
            date: self.date,
            time: self.time,
            status: self.status,
            payment_status: self.payment_status,
            deposit_value: self.deposit_value,
        }
    }
}

/// Booking request from the agenda screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub client: ClientRef,
    pub client_name: String,
    /// `None` picks the first service of the catalog.
    pub service_id: Option<String>,
    pub date: String, // YYYY-MM-DD
    pub time: String, // HH:MM
    pub payment_status: PaymentStatus,
    pub deposit_value: Option<f64>,
}
