//! Client reconciliation: every booked appointment ends up pointing at
//! exactly one durable client.
//!
//! Identity is the exact client name. Two people sharing a name share a
//! record; there is no phone-based disambiguation.

use std::sync::Arc;

use chrono::NaiveDate;

use super::error::RepositoryError;
use super::traits::ClientRepository;
use crate::models::{ClientId, ClientRef, ClientSeed};

/// What a new client would be seeded with if no match exists.
#[derive(Debug, Clone)]
pub struct ReconcileRequest<'a> {
    pub client_name: &'a str,
    pub service_name: &'a str,
    pub value: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub client_id: ClientId,
    /// A client record was created by this resolution.
    pub created: bool,
}

pub struct ClientReconciler {
    clients: Arc<dyn ClientRepository>,
}

impl ClientReconciler {
    pub fn new(clients: Arc<dyn ClientRepository>) -> Self {
        Self { clients }
    }

    /// Durable refs pass through without a lookup. Placeholders adopt the
    /// client with the same name, or create one seeded from this visit.
    pub fn resolve(
        &self,
        client: &ClientRef,
        request: &ReconcileRequest<'_>,
    ) -> Result<Resolution, RepositoryError> {
        match client {
            ClientRef::Durable(id) => Ok(Resolution {
                client_id: id.clone(),
                created: false,
            }),
            ClientRef::Placeholder(local) => self.promote(local, request),
        }
    }

    fn promote(
        &self,
        local: &str,
        request: &ReconcileRequest<'_>,
    ) -> Result<Resolution, RepositoryError> {
        if let Some(existing) = self.clients.find_by_name(request.client_name)? {
            tracing::debug!(placeholder = local, client_id = %existing.id, "placeholder matched existing client");
            return Ok(Resolution {
                client_id: existing.id,
                created: false,
            });
        }

        let seed = ClientSeed::first_visit(
            request.client_name,
            request.service_name,
            request.value,
            request.date,
        );
        let created = self.clients.create(&seed)?;
        tracing::debug!(placeholder = local, client_id = %created.id, "placeholder promoted to new client");
        Ok(Resolution {
            client_id: created.id,
            created: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientStatus;
    use crate::scheduling::fakes::FakeClients;

    fn request(name: &str) -> ReconcileRequest<'_> {
        ReconcileRequest {
            client_name: name,
            service_name: "Box Braids G",
            value: 450.0,
            date: NaiveDate::from_ymd_opt(2024, 10, 14).unwrap(),
        }
    }

    #[test]
    fn durable_ref_skips_lookup() {
        let clients = Arc::new(FakeClients::default());
        let reconciler = ClientReconciler::new(clients.clone());
        let id = ClientId::parse("durable-1").unwrap();

        let resolution = reconciler
            .resolve(&ClientRef::Durable(id.clone()), &request("Ana Oliveira"))
            .unwrap();

        assert_eq!(resolution.client_id, id);
        assert!(!resolution.created);
        assert_eq!(clients.lookups(), 0);
        assert_eq!(clients.count(), 0);
    }

    #[test]
    fn placeholder_adopts_existing_client() {
        let clients = Arc::new(FakeClients::default());
        let existing = clients.seed("Ana Oliveira");
        let reconciler = ClientReconciler::new(clients.clone());

        let resolution = reconciler
            .resolve(&ClientRef::placeholder(), &request("Ana Oliveira"))
            .unwrap();

        assert_eq!(resolution.client_id, existing);
        assert!(!resolution.created);
        assert_eq!(clients.count(), 1);
    }

    #[test]
    fn placeholder_creates_seeded_client() {
        let clients = Arc::new(FakeClients::default());
        let reconciler = ClientReconciler::new(clients.clone());

        let resolution = reconciler
            .resolve(&ClientRef::placeholder(), &request("Maria Nunes"))
            .unwrap();

        assert!(resolution.created);
        let client = clients.get(&resolution.client_id).unwrap();
        assert_eq!(client.status, ClientStatus::Ativa);
        assert_eq!(client.total_visits, 1);
        assert_eq!(client.total_spent, 450.0);
        assert!(client.totals_match_history());
    }

    #[test]
    fn lookup_failure_propagates_without_creating() {
        let clients = Arc::new(FakeClients::default());
        clients.fail_next("connection reset");
        let reconciler = ClientReconciler::new(clients.clone());

        let err = reconciler
            .resolve(&ClientRef::placeholder(), &request("Maria Nunes"))
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Unavailable(_)));
        assert_eq!(clients.count(), 0);
    }
}
