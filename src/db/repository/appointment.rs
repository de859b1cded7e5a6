use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::parse_enum;
use crate::db::DatabaseError;
use crate::models::*;

/// Persists a draft and returns the stored appointment with its new id.
pub fn insert_appointment(
    conn: &Connection,
    owner_id: &str,
    draft: AppointmentDraft,
) -> Result<Appointment, DatabaseError> {
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO appointments (id, owner_id, client_id, client_name, service_id, service_name,
         value, date, time, status, payment_status, deposit_value)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            id,
            owner_id,
            draft.client_id.as_str(),
            draft.client_name,
            draft.service_id,
            draft.service_name,
            draft.value,
            draft.date,
            draft.time,
            draft.status.as_str(),
            draft.payment_status.as_str(),
            draft.deposit_value,
        ],
    )?;
    Ok(draft.into_appointment(id))
}

/// Writes status and payment status together. The deposit survives only
/// while the payment stays PAGO_SINAL.
pub fn update_appointment_status(
    conn: &Connection,
    owner_id: &str,
    id: &str,
    status: AppointmentStatus,
    payment_status: PaymentStatus,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET status = ?3, payment_status = ?4,
         deposit_value = CASE WHEN ?4 = 'PAGO_SINAL' THEN deposit_value ELSE NULL END
         WHERE owner_id = ?1 AND id = ?2",
        params![owner_id, id, status.as_str(), payment_status.as_str()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Appointments of the owner in chronological order.
pub fn list_appointments(
    conn: &Connection,
    owner_id: &str,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_APPOINTMENT} WHERE owner_id = ?1 ORDER BY date ASC, time ASC"
    ))?;
    let rows = stmt
        .query_map(params![owner_id], read_appointment_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(appointment_from_row).collect()
}

// ═══════════════════════════════════════════
// Internal row mapping
// ═══════════════════════════════════════════

const SELECT_APPOINTMENT: &str = "SELECT id, client_id, client_name, service_id, service_name,
    value, date, time, status, payment_status, deposit_value FROM appointments";

struct AppointmentRow {
    id: String,
    client_id: String,
    client_name: String,
    service_id: String,
    service_name: String,
    value: f64,
    date: NaiveDate,
    time: String,
    status: String,
    payment_status: String,
    deposit_value: Option<f64>,
}

fn read_appointment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        client_id: row.get(1)?,
        client_name: row.get(2)?,
        service_id: row.get(3)?,
        service_name: row.get(4)?,
        value: row.get(5)?,
        date: row.get(6)?,
        time: row.get(7)?,
        status: row.get(8)?,
        payment_status: row.get(9)?,
        deposit_value: row.get(10)?,
    })
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: row.id,
        client_id: ClientId::parse(&row.client_id)?,
        client_name: row.client_name,
        service_id: row.service_id,
        service_name: row.service_name,
        value: row.value,
        date: row.date,
        time: row.time,
        status: parse_enum(&row.status)?,
        payment_status: parse_enum(&row.payment_status)?,
        deposit_value: row.deposit_value,
    })
}
