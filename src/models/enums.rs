use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string form is also the serde form, so stored rows, JSON and
/// `as_str` always agree byte-for-byte.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(AppointmentStatus {
    Pendente => "PENDENTE",
    Confirmado => "CONFIRMADO",
    PagoSinal => "PAGO_SINAL",
    Concluido => "CONCLUÍDO",
    Cancelado => "CANCELADO",
});

impl AppointmentStatus {
    /// Terminal statuses accept no further transition.
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Concluido | Self::Cancelado => true,
            Self::Pendente | Self::Confirmado | Self::PagoSinal => false,
        }
    }
}

str_enum!(PaymentStatus {
    Pendente => "PENDENTE",
    PagoSinal => "PAGO_SINAL",
    PagoTotal => "PAGO_TOTAL",
});

str_enum!(ClientStatus {
    Ativa => "ATIVA",
    EmRisco => "EM RISCO",
    Inativa => "INATIVA",
});

str_enum!(ServiceCategory {
    Trancas => "Tranças",
    Manutencao => "Manutenção",
    Retoque => "Retoque",
    Tratamento => "Tratamento",
    Outro => "Outro",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn appointment_status_keeps_accented_wire_form() {
        assert_eq!(AppointmentStatus::Concluido.as_str(), "CONCLUÍDO");
        assert_eq!(
            AppointmentStatus::from_str("CONCLUÍDO").unwrap(),
            AppointmentStatus::Concluido
        );
        // Unaccented spelling is not the same status.
        assert!(AppointmentStatus::from_str("CONCLUIDO").is_err());
    }

    #[test]
    fn serde_form_matches_as_str() {
        let json = serde_json::to_string(&AppointmentStatus::PagoSinal).unwrap();
        assert_eq!(json, "\"PAGO_SINAL\"");
        let back: ClientStatus = serde_json::from_str("\"EM RISCO\"").unwrap();
        assert_eq!(back, ClientStatus::EmRisco);
    }

    #[test]
    fn terminal_statuses() {
        assert!(AppointmentStatus::Concluido.is_terminal());
        assert!(AppointmentStatus::Cancelado.is_terminal());
        assert!(!AppointmentStatus::Pendente.is_terminal());
        assert!(!AppointmentStatus::Confirmado.is_terminal());
        assert!(!AppointmentStatus::PagoSinal.is_terminal());
    }

    #[test]
    fn invalid_enum_returns_error() {
        let err = PaymentStatus::from_str("PAGO").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
        assert!(ServiceCategory::from_str("").is_err());
    }

    #[test]
    fn display_uses_wire_form() {
        assert_eq!(ClientStatus::EmRisco.to_string(), "EM RISCO");
        assert_eq!(ServiceCategory::Trancas.to_string(), "Tranças");
    }
}
