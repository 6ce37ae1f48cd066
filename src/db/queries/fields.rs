use super::{conflict_on_constraint, parse_timestamp, require_row};
use crate::db::Database;
use crate::error::{AgroError, Result};
use crate::models::{CultureType, Field, FieldStatus};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::warn;

pub(crate) fn insert_field(conn: &Connection, field: &Field) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO fields (area, culture, status, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            field.area,
            field.culture.as_str(),
            field.status.as_str(),
            field.created_at.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl Database {
    pub fn create_field(&self, field: &Field) -> Result<i64> {
        self.with_conn(|conn| Ok(insert_field(conn, field)?))
    }

    pub fn get_field(&self, id: i64) -> Result<Option<Field>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM fields WHERE id = ?1", [id], row_to_field)
                .optional()
                .map_err(Into::into)
        })
    }

    pub fn list_fields(&self) -> Result<Vec<Field>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM fields ORDER BY id")?;
            let fields = stmt
                .query_map([], row_to_field)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(fields)
        })
    }

    pub fn update_field(&self, field: &Field) -> Result<()> {
        let id = field
            .id
            .ok_or_else(|| AgroError::InvalidData("Field has no ID".into()))?;

        self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE fields SET area = ?1, culture = ?2, status = ?3 WHERE id = ?4",
                params![field.area, field.culture.as_str(), field.status.as_str(), id],
            )?;
            require_row(affected, "Field", id)
        })
    }

    /// Machines and workers on the field are detached; tasks block deletion.
    pub fn delete_field(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn
                .execute("DELETE FROM fields WHERE id = ?1", [id])
                .map_err(|e| {
                    conflict_on_constraint(e, || {
                        format!("Field {} still has worker tasks assigned", id)
                    })
                })?;
            require_row(affected, "Field", id)
        })
    }
}

fn row_to_field(row: &Row) -> rusqlite::Result<Field> {
    let culture_str: String = row.get("culture")?;
    let status_str: String = row.get("status")?;
    let created_at_str: String = row.get("created_at")?;

    let culture = CultureType::from_str(&culture_str).unwrap_or_else(|| {
        warn!(culture = %culture_str, "Unknown culture in database, defaulting to Wheat");
        CultureType::Wheat
    });
    let status = FieldStatus::from_str(&status_str).unwrap_or_else(|| {
        warn!(status = %status_str, "Unknown field status in database, defaulting to Fallow");
        FieldStatus::Fallow
    });

    Ok(Field {
        id: Some(row.get("id")?),
        area: row.get("area")?,
        culture,
        status,
        created_at: parse_timestamp(&created_at_str),
    })
}
