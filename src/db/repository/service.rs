use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::parse_enum;
use crate::db::DatabaseError;
use crate::models::*;

/// Adds a service to the owner's catalog. An empty id is replaced by a
/// fresh one.
pub fn insert_service(
    conn: &Connection,
    owner_id: &str,
    service: &Service,
) -> Result<Service, DatabaseError> {
    let mut stored = service.clone();
    if stored.id.is_empty() {
        stored.id = Uuid::new_v4().to_string();
    }

    conn.execute(
        "INSERT INTO services (id, owner_id, name, price, duration_minutes, material_cost,
         indirect_cost, category, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            stored.id,
            owner_id,
            stored.name,
            stored.price,
            stored.duration_minutes,
            stored.material_cost,
            stored.indirect_cost,
            stored.category.as_str(),
            stored.description,
        ],
    )?;
    Ok(stored)
}

/// Rewrites a catalog entry. Existing appointments keep their snapshot.
pub fn update_service(
    conn: &Connection,
    owner_id: &str,
    service: &Service,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE services SET name = ?3, price = ?4, duration_minutes = ?5, material_cost = ?6,
         indirect_cost = ?7, category = ?8, description = ?9
         WHERE owner_id = ?1 AND id = ?2",
        params![
            owner_id,
            service.id,
            service.name,
            service.price,
            service.duration_minutes,
            service.material_cost,
            service.indirect_cost,
            service.category.as_str(),
            service.description,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Service".into(),
            id: service.id.clone(),
        });
    }
    Ok(())
}

pub fn get_service(
    conn: &Connection,
    owner_id: &str,
    id: &str,
) -> Result<Option<Service>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, price, duration_minutes, material_cost, indirect_cost, category, description
             FROM services WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, id],
            read_service_row,
        )
        .optional()?;

    row.map(service_from_row).transpose()
}

/// Catalog in insertion order; the first entry is the booking default.
pub fn list_services(conn: &Connection, owner_id: &str) -> Result<Vec<Service>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, price, duration_minutes, material_cost, indirect_cost, category, description
         FROM services WHERE owner_id = ?1
         ORDER BY rowid ASC",
    )?;

    let rows = stmt
        .query_map(params![owner_id], read_service_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(service_from_row).collect()
}

struct ServiceRow {
    id: String,
    name: String,
    price: f64,
    duration_minutes: u32,
    material_cost: f64,
    indirect_cost: f64,
    category: String,
    description: Option<String>,
}

fn read_service_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ServiceRow> {
    Ok(ServiceRow {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        duration_minutes: row.get(3)?,
        material_cost: row.get(4)?,
        indirect_cost: row.get(5)?,
        category: row.get(6)?,
        description: row.get(7)?,
    })
}

fn service_from_row(row: ServiceRow) -> Result<Service, DatabaseError> {
    Ok(Service {
        id: row.id,
        name: row.name,
        price: row.price,
        duration_minutes: row.duration_minutes,
        material_cost: row.material_cost,
        indirect_cost: row.indirect_cost,
        category: parse_enum(&row.category)?,
        description: row.description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn box_braids() -> Service {
        Service {
            id: String::new(),
            name: "Box Braids G".into(),
            price: 450.0,
            duration_minutes: 360,
            material_cost: 80.0,
            indirect_cost: 20.0,
            category: ServiceCategory::Trancas,
            description: None,
        }
    }

    #[test]
    fn insert_assigns_id_when_missing() {
        let conn = open_memory_database().unwrap();
        let stored = insert_service(&conn, "owner-1", &box_braids()).unwrap();
        assert!(!stored.id.is_empty());

        let fetched = get_service(&conn, "owner-1", &stored.id).unwrap().unwrap();
        assert_eq!(fetched, stored);
    }

    #[test]
    fn list_keeps_insertion_order() {
        let conn = open_memory_database().unwrap();
        for (id, name) in [("s2", "Twist"), ("s1", "Nagô"), ("s3", "Fulani")] {
            let mut s = box_braids();
            s.id = id.into();
            s.name = name.into();
            insert_service(&conn, "owner-1", &s).unwrap();
        }
        let ids: Vec<String> = list_services(&conn, "owner-1")
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["s2", "s1", "s3"]);
        assert!(list_services(&conn, "owner-2").unwrap().is_empty());
    }

    #[test]
    fn update_missing_service_is_not_found() {
        let conn = open_memory_database().unwrap();
        let mut s = box_braids();
        s.id = "ghost".into();
        let err = update_service(&conn, "owner-1", &s).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn update_rewrites_price() {
        let conn = open_memory_database().unwrap();
        let mut stored = insert_service(&conn, "owner-1", &box_braids()).unwrap();
        stored.price = 500.0;
        update_service(&conn, "owner-1", &stored).unwrap();
        let fetched = get_service(&conn, "owner-1", &stored.id).unwrap().unwrap();
        assert_eq!(fetched.price, 500.0);
    }
}
