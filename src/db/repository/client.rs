use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::parse_enum;
use crate::db::DatabaseError;
use crate::models::*;

/// Creates a client and its seed history in one transaction.
/// The durable id is assigned here.
pub fn insert_client(
    conn: &Connection,
    owner_id: &str,
    seed: &ClientSeed,
) -> Result<Client, DatabaseError> {
    let id = ClientId::generate();
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO clients (id, owner_id, name, status, last_visit, total_spent, total_visits)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id.as_str(),
            owner_id,
            seed.name,
            seed.status.as_str(),
            seed.last_visit,
            seed.total_spent,
            seed.total_visits,
        ],
    )?;

    for item in &seed.history {
        tx.execute(
            "INSERT INTO client_history (id, client_id, date, service, price, payment_method)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.id,
                id.as_str(),
                item.date,
                item.service,
                item.price,
                item.payment_method,
            ],
        )?;
    }

    tx.commit()?;

    Ok(Client {
        id,
        name: seed.name.clone(),
        status: seed.status,
        last_visit: seed.last_visit,
        phone: None,
        instagram: None,
        notes: None,
        total_spent: seed.total_spent,
        total_visits: seed.total_visits,
        history: seed.history.clone(),
    })
}

/// Exact, case-sensitive name match. The oldest client wins when two
/// records share a name.
pub fn find_client_by_name(
    conn: &Connection,
    owner_id: &str,
    name: &str,
) -> Result<Option<Client>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, status, last_visit, phone, instagram, notes, total_spent, total_visits
             FROM clients
             WHERE owner_id = ?1 AND name = ?2
             ORDER BY created_at ASC, rowid ASC
             LIMIT 1",
            params![owner_id, name],
            read_client_row,
        )
        .optional()?;

    row.map(|r| client_from_row(conn, r)).transpose()
}

/// All clients of the owner, ordered by name.
pub fn list_clients(conn: &Connection, owner_id: &str) -> Result<Vec<Client>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, status, last_visit, phone, instagram, notes, total_spent, total_visits
         FROM clients WHERE owner_id = ?1
         ORDER BY name ASC",
    )?;

    let rows = stmt
        .query_map(params![owner_id], read_client_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(|r| client_from_row(conn, r)).collect()
}

/// Visit history of a client, oldest first.
pub fn fetch_client_history(
    conn: &Connection,
    client_id: &ClientId,
) -> Result<Vec<HistoryItem>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, date, service, price, payment_method
         FROM client_history WHERE client_id = ?1
         ORDER BY date ASC, rowid ASC",
    )?;

    let rows = stmt.query_map(params![client_id.as_str()], |row| {
        Ok(HistoryItem {
            id: row.get(0)?,
            date: row.get(1)?,
            service: row.get(2)?,
            price: row.get(3)?,
            payment_method: row.get(4)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

// ═══════════════════════════════════════════
// Internal row mapping
// ═══════════════════════════════════════════

struct ClientRow {
    id: String,
    name: String,
    status: String,
    last_visit: Option<NaiveDate>,
    phone: Option<String>,
    instagram: Option<String>,
    notes: Option<String>,
    total_spent: f64,
    total_visits: u32,
}

fn read_client_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClientRow> {
    Ok(ClientRow {
        id: row.get(0)?,
        name: row.get(1)?,
        status: row.get(2)?,
        last_visit: row.get(3)?,
        phone: row.get(4)?,
        instagram: row.get(5)?,
        notes: row.get(6)?,
        total_spent: row.get(7)?,
        total_visits: row.get(8)?,
    })
}

fn client_from_row(conn: &Connection, row: ClientRow) -> Result<Client, DatabaseError> {
    let id = ClientId::parse(&row.id)?;
    let history = fetch_client_history(conn, &id)?;
    Ok(Client {
        id,
        name: row.name,
        status: parse_enum(&row.status)?,
        last_visit: row.last_visit,
        phone: row.phone,
        instagram: row.instagram,
        notes: row.notes,
        total_spent: row.total_spent,
        total_visits: row.total_visits,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn insert_and_find_by_exact_name() {
        let conn = open_memory_database().unwrap();
        let seed = ClientSeed::first_visit("Ana Oliveira", "Nagô", 180.0, date(2024, 10, 1));
        let created = insert_client(&conn, "owner-1", &seed).unwrap();

        let found = find_client_by_name(&conn, "owner-1", "Ana Oliveira")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.total_visits, 1);
        assert_eq!(found.history.len(), 1);
        assert!(found.totals_match_history());

        // Match is exact: no trimming, no case folding.
        assert!(find_client_by_name(&conn, "owner-1", "ana oliveira").unwrap().is_none());
        assert!(find_client_by_name(&conn, "owner-1", "Ana Oliveira ").unwrap().is_none());
    }

    #[test]
    fn lookups_are_scoped_to_owner() {
        let conn = open_memory_database().unwrap();
        let seed = ClientSeed::first_visit("Ana Oliveira", "Nagô", 180.0, date(2024, 10, 1));
        let created = insert_client(&conn, "owner-1", &seed).unwrap();

        assert!(find_client_by_name(&conn, "owner-2", "Ana Oliveira").unwrap().is_none());
        assert!(list_clients(&conn, "owner-2").unwrap().is_empty());
        assert_eq!(list_clients(&conn, "owner-1").unwrap()[0].id, created.id);
    }

    #[test]
    fn oldest_client_wins_on_shared_name() {
        let conn = open_memory_database().unwrap();
        let first = insert_client(
            &conn,
            "owner-1",
            &ClientSeed::first_visit("Joana", "Twist", 300.0, date(2024, 1, 5)),
        )
        .unwrap();
        insert_client(
            &conn,
            "owner-1",
            &ClientSeed::first_visit("Joana", "Fulani", 350.0, date(2024, 2, 5)),
        )
        .unwrap();

        let found = find_client_by_name(&conn, "owner-1", "Joana").unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[test]
    fn list_clients_ordered_by_name() {
        let conn = open_memory_database().unwrap();
        for name in ["Zuri", "Ana", "Maria"] {
            insert_client(
                &conn,
                "owner-1",
                &ClientSeed::first_visit(name, "Nagô", 100.0, date(2024, 3, 1)),
            )
            .unwrap();
        }
        let names: Vec<String> = list_clients(&conn, "owner-1")
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Maria", "Zuri"]);
    }
}
