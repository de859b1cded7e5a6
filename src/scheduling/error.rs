//! Error types for the scheduling core.

use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::AppointmentStatus;

/// Failure at a persistence boundary.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Repository unavailable: {0}")]
    Unavailable(String),

    #[error("Repository lock poisoned")]
    LockPoisoned,
}

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Appointment not found: {0}")]
    NotFound(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl SchedulingError {
    /// Text shown to the professional. Persistence failures collapse into
    /// one generic message since the transport is not ours to explain.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(reason) => reason.clone(),
            Self::NotFound(_) => "Agendamento não encontrado.".into(),
            Self::InvalidTransition { from, to } => {
                format!("Não é possível mudar um agendamento {from} para {to}.")
            }
            Self::Repository(_) => "Não foi possível salvar. Verifique sua conexão.".into(),
        }
    }
}
