use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "Recorrentes";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming the signed-in professional for the binary.
pub const OWNER_ENV_VAR: &str = "RECORRENTES_OWNER_ID";

/// Owner used when no professional id is configured.
pub const DEFAULT_OWNER_ID: &str = "local";

/// Get the application data directory.
/// ~/Recorrentes/ on all platforms; falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the SQLite database path
pub fn database_path() -> PathBuf {
    app_data_dir().join("database").join("recorrentes.db")
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,recorrentes_lib=debug"
}

/// Resolve the owner id from the environment, defaulting to a local owner.
pub fn owner_id_from_env() -> String {
    std::env::var(OWNER_ENV_VAR)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_OWNER_ID.to_string())
}

// ═══════════════════════════════════════════════════════════
// Agenda tunables
// ═══════════════════════════════════════════════════════════

/// Tunables for the agenda screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaSettings {
    /// Days on each side of the cursor in the top strip.
    pub window_radius: u32,
    /// Length of the week view, starting at the cursor.
    pub week_length: u32,
    /// Returned by the insight boundary whenever the advisor fails.
    pub fallback_insight: String,
    /// Returned when no advisor is configured.
    pub unconfigured_insight: String,
}

impl Default for AgendaSettings {
    fn default() -> Self {
        Self {
            window_radius: 3,
            week_length: 7,
            fallback_insight: "Foque na retenção de clientes VIP este mês.".into(),
            unconfigured_insight: "Configure sua chave de API para insights personalizados.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_ends_with_app_name() {
        let dir = app_data_dir();
        assert!(dir.ends_with("Recorrentes"));
    }

    #[test]
    fn database_path_under_app_data() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("recorrentes.db"));
    }

    #[test]
    fn app_name_is_recorrentes() {
        assert_eq!(APP_NAME, "Recorrentes");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }

    #[test]
    fn default_settings_use_seven_day_strip() {
        let settings = AgendaSettings::default();
        assert_eq!(settings.window_radius * 2 + 1, 7);
        assert_eq!(settings.week_length, 7);
        assert!(!settings.fallback_insight.is_empty());
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = AgendaSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: AgendaSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
