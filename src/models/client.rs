use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ClientStatus;
use crate::db::DatabaseError;

/// Reserved prefix of locally generated client ids.
///
/// Durable ids are UUID strings and can never start with this sequence
/// (the second character of a UUID is always a hex digit).
pub const PLACEHOLDER_PREFIX: &str = "c-";

/// A durable client id, assigned by the client repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// Fresh durable id. Only repositories mint these.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parses a stored id, refusing placeholder-shaped or empty values.
    pub fn parse(raw: &str) -> Result<Self, DatabaseError> {
        if raw.is_empty() || raw.starts_with(PLACEHOLDER_PREFIX) {
            return Err(DatabaseError::ConstraintViolation(format!(
                "not a durable client id: {raw:?}"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ClientId {
    type Error = DatabaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClientId> for String {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

/// Reference to the client of an appointment being booked.
///
/// Either an existing durable client, or a placeholder that the
/// reconciler resolves by name before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClientRef {
    Durable(ClientId),
    /// Full wire form, prefix included.
    Placeholder(String),
}

impl ClientRef {
    /// New placeholder in the `c-<millis>` wire form.
    pub fn placeholder() -> Self {
        Self::Placeholder(format!(
            "{PLACEHOLDER_PREFIX}{}",
            Utc::now().timestamp_millis()
        ))
    }

    /// Interprets an id received from a caller. An empty id means no
    /// client was picked and is treated as a placeholder.
    pub fn from_wire(raw: &str) -> Self {
        match ClientId::parse(raw) {
            Ok(id) => Self::Durable(id),
            Err(_) => Self::Placeholder(raw.to_string()),
        }
    }

    pub fn to_wire(&self) -> String {
        match self {
            Self::Durable(id) => id.as_str().to_string(),
            Self::Placeholder(local) => local.clone(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

impl From<String> for ClientRef {
    fn from(raw: String) -> Self {
        Self::from_wire(&raw)
    }
}

impl From<ClientRef> for String {
    fn from(client: ClientRef) -> Self {
        client.to_wire()
    }
}

/// One past visit: what was done, for how much, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub date: NaiveDate,
    pub service: String,
    pub price: f64,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub status: ClientStatus,
    pub last_visit: Option<NaiveDate>,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub notes: Option<String>,
    pub total_spent: f64,
    pub total_visits: u32,
    pub history: Vec<HistoryItem>,
}

impl Client {
    /// Totals agree with the tracked history. Clients created from the
    /// management screens may carry no history; they are not checked.
    pub fn totals_match_history(&self) -> bool {
        if self.history.is_empty() {
            return true;
        }
        let spent: f64 = self.history.iter().map(|h| h.price).sum();
        self.total_visits as usize == self.history.len()
            && (self.total_spent - spent).abs() < 1e-6
    }
}

/// Everything the repository needs to create a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSeed {
    pub name: String,
    pub status: ClientStatus,
    pub last_visit: Option<NaiveDate>,
    pub total_spent: f64,
    pub total_visits: u32,
    pub history: Vec<HistoryItem>,
}

impl ClientSeed {
    /// Seed for a client implicitly created by booking their first visit.
    pub fn first_visit(name: &str, service: &str, price: f64, date: NaiveDate) -> Self {
        Self {
            name: name.to_string(),
            status: ClientStatus::Ativa,
            last_visit: Some(date),
            total_spent: price,
            total_visits: 1,
            history: vec![HistoryItem {
                id: Uuid::new_v4().to_string(),
                date,
                service: service.to_string(),
                price,
                payment_method: None,
            }],
        }
    }
}
