use super::{conflict_on_constraint, require_row};
use crate::db::Database;
use crate::error::{AgroError, Result};
use crate::models::{CultureType, Resource};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::warn;

pub(crate) fn insert_resource(conn: &Connection, resource: &Resource) -> rusqlite::Result<i64> {
    conn.execute(
        r#"
        INSERT INTO resources
            (culture_type, seed_per_hectare, fertilizer_per_hectare, worker_per_hectare,
             worker_work_durality_per_hectare, yield_per_hectare)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            resource.culture_type.as_str(),
            resource.seed_per_hectare,
            resource.fertilizer_per_hectare,
            resource.worker_per_hectare,
            resource.worker_work_durality_per_hectare,
            resource.yield_per_hectare,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl Database {
    pub fn create_resource(&self, resource: &Resource) -> Result<i64> {
        self.with_conn(|conn| Ok(insert_resource(conn, resource)?))
    }

    pub fn get_resource(&self, id: i64) -> Result<Option<Resource>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM resources WHERE id = ?1",
                [id],
                row_to_resource,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// The profile used for a crop is the oldest resource recorded for it.
    pub fn get_resource_by_culture_type(&self, culture: CultureType) -> Result<Option<Resource>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM resources WHERE culture_type = ?1 ORDER BY id LIMIT 1",
                [culture.as_str()],
                row_to_resource,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn list_resources(&self) -> Result<Vec<Resource>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM resources ORDER BY id")?;
            let resources = stmt
                .query_map([], row_to_resource)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(resources)
        })
    }

    pub fn update_resource(&self, resource: &Resource) -> Result<()> {
        let id = resource
            .id
            .ok_or_else(|| AgroError::InvalidData("Resource has no ID".into()))?;

        self.with_conn(|conn| {
            let affected = conn.execute(
                r#"
                UPDATE resources SET
                    culture_type = ?1, seed_per_hectare = ?2, fertilizer_per_hectare = ?3,
                    worker_per_hectare = ?4, worker_work_durality_per_hectare = ?5,
                    yield_per_hectare = ?6
                WHERE id = ?7
                "#,
                params![
                    resource.culture_type.as_str(),
                    resource.seed_per_hectare,
                    resource.fertilizer_per_hectare,
                    resource.worker_per_hectare,
                    resource.worker_work_durality_per_hectare,
                    resource.yield_per_hectare,
                    id,
                ],
            )?;
            require_row(affected, "Resource", id)
        })
    }

    pub fn delete_resource(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn
                .execute("DELETE FROM resources WHERE id = ?1", [id])
                .map_err(|e| {
                    conflict_on_constraint(e, || {
                        format!("Resource {} is still required by machines", id)
                    })
                })?;
            require_row(affected, "Resource", id)
        })
    }
}

fn row_to_resource(row: &Row) -> rusqlite::Result<Resource> {
    let culture_str: String = row.get("culture_type")?;
    let culture_type = CultureType::from_str(&culture_str).unwrap_or_else(|| {
        warn!(culture_type = %culture_str, "Unknown culture_type in database, defaulting to Wheat");
        CultureType::Wheat
    });

    Ok(Resource {
        id: Some(row.get("id")?),
        culture_type,
        seed_per_hectare: row.get("seed_per_hectare")?,
        fertilizer_per_hectare: row.get("fertilizer_per_hectare")?,
        worker_per_hectare: row.get("worker_per_hectare")?,
        worker_work_durality_per_hectare: row.get("worker_work_durality_per_hectare")?,
        yield_per_hectare: row.get("yield_per_hectare")?,
    })
}
