//! Appointment status state machine.
//!
//! PENDENTE → CONFIRMADO → CONCLUÍDO, with PAGO_SINAL as an alternative
//! confirmed state and CANCELADO reachable from any non-terminal state.
//! CONCLUÍDO and CANCELADO are terminal.

use super::error::SchedulingError;
use crate::models::{AppointmentStatus, PaymentStatus};

/// A requested change to an existing appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    MarkComplete,
    Cancel,
}

impl StatusEvent {
    /// The event that moves an appointment into `target`, if any.
    pub fn for_target(target: AppointmentStatus) -> Option<Self> {
        match target {
            AppointmentStatus::Concluido => Some(Self::MarkComplete),
            AppointmentStatus::Cancelado => Some(Self::Cancel),
            AppointmentStatus::Pendente
            | AppointmentStatus::Confirmado
            | AppointmentStatus::PagoSinal => None,
        }
    }
}

/// Status pair of a freshly booked appointment.
pub fn initial_state(payment_status: PaymentStatus) -> (AppointmentStatus, PaymentStatus) {
    match payment_status {
        PaymentStatus::Pendente => (AppointmentStatus::Confirmado, PaymentStatus::Pendente),
        PaymentStatus::PagoSinal => (AppointmentStatus::PagoSinal, PaymentStatus::PagoSinal),
        PaymentStatus::PagoTotal => (AppointmentStatus::Confirmado, PaymentStatus::PagoTotal),
    }
}

/// Resolve the status pair after moving `from` to `target`.
///
/// Completion always settles payment in full; cancellation keeps the
/// payment as it was. A requested payment status is never honoured over
/// those rules. Re-entering a terminal state is rejected like any other
/// move out of a terminal state.
pub fn apply(
    from: AppointmentStatus,
    payment: PaymentStatus,
    target: AppointmentStatus,
) -> Result<(AppointmentStatus, PaymentStatus), SchedulingError> {
    let invalid = || SchedulingError::InvalidTransition { from, to: target };

    if from.is_terminal() {
        return Err(invalid());
    }
    match StatusEvent::for_target(target).ok_or_else(invalid)? {
        StatusEvent::MarkComplete => Ok((AppointmentStatus::Concluido, PaymentStatus::PagoTotal)),
        StatusEvent::Cancel => Ok((AppointmentStatus::Cancelado, payment)),
    }
}
