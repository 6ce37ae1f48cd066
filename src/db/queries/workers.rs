use super::{conflict_on_constraint, invalid_on_constraint, require_row};
use crate::db::Database;
use crate::error::{AgroError, Result};
use crate::models::Worker;
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(crate) fn insert_worker(conn: &Connection, worker: &Worker) -> rusqlite::Result<i64> {
    conn.execute(
        r#"
        INSERT INTO workers
            (first_name, last_name, age, hourly_rate, is_active, hours_worked, field_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            worker.first_name,
            worker.last_name,
            worker.age,
            worker.hourly_rate,
            worker.is_active,
            worker.hours_worked,
            worker.field_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl Database {
    pub fn create_worker(&self, worker: &Worker) -> Result<i64> {
        self.with_conn(|conn| {
            insert_worker(conn, worker).map_err(|e| {
                invalid_on_constraint(e, || {
                    format!("Worker references unknown field {:?}", worker.field_id)
                })
            })
        })
    }

    pub fn get_worker(&self, id: i64) -> Result<Option<Worker>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM workers WHERE id = ?1", [id], row_to_worker)
                .optional()
                .map_err(Into::into)
        })
    }

    pub fn list_workers(&self) -> Result<Vec<Worker>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM workers ORDER BY id")?;
            let workers = stmt
                .query_map([], row_to_worker)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workers)
        })
    }

    pub fn workers_for_field(&self, field_id: i64) -> Result<Vec<Worker>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM workers WHERE field_id = ?1 ORDER BY id")?;
            let workers = stmt
                .query_map([field_id], row_to_worker)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workers)
        })
    }

    pub fn update_worker(&self, worker: &Worker) -> Result<()> {
        let id = worker
            .id
            .ok_or_else(|| AgroError::InvalidData("Worker has no ID".into()))?;

        self.with_conn(|conn| {
            let affected = conn
                .execute(
                    r#"
                    UPDATE workers SET
                        first_name = ?1, last_name = ?2, age = ?3, hourly_rate = ?4,
                        is_active = ?5, hours_worked = ?6, field_id = ?7
                    WHERE id = ?8
                    "#,
                    params![
                        worker.first_name,
                        worker.last_name,
                        worker.age,
                        worker.hourly_rate,
                        worker.is_active,
                        worker.hours_worked,
                        worker.field_id,
                        id,
                    ],
                )
                .map_err(|e| {
                    invalid_on_constraint(e, || {
                        format!("Worker references unknown field {:?}", worker.field_id)
                    })
                })?;
            require_row(affected, "Worker", id)
        })
    }

    pub fn delete_worker(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn
                .execute("DELETE FROM workers WHERE id = ?1", [id])
                .map_err(|e| {
                    conflict_on_constraint(e, || format!("Worker {} still has tasks assigned", id))
                })?;
            require_row(affected, "Worker", id)
        })
    }
}

fn row_to_worker(row: &Row) -> rusqlite::Result<Worker> {
    Ok(Worker {
        id: Some(row.get("id")?),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        age: row.get("age")?,
        hourly_rate: row.get("hourly_rate")?,
        is_active: row.get("is_active")?,
        hours_worked: row.get("hours_worked")?,
        field_id: row.get("field_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CultureType, Field};

    #[test]
    fn worker_crud_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let id = db
            .create_worker(&Worker::new("John", "Doe", 35).with_rate(100.0))
            .unwrap();

        let mut worker = db.get_worker(id).unwrap().unwrap();
        assert_eq!(worker.full_name(), "John Doe");
        assert_eq!(worker.hourly_rate, 100.0);

        worker.is_active = false;
        worker.hours_worked = 80.0;
        db.update_worker(&worker).unwrap();
        let reloaded = db.get_worker(id).unwrap().unwrap();
        assert!(!reloaded.is_active);
        assert_eq!(reloaded.hours_worked, 80.0);

        db.delete_worker(id).unwrap();
        assert!(db.get_worker(id).unwrap().is_none());
    }

    #[test]
    fn workers_for_field_only_returns_assigned() {
        let db = Database::open_in_memory().unwrap();
        let field_id = db.create_field(&Field::new(4.0, CultureType::Rice)).unwrap();
        db.create_worker(&Worker::new("A", "One", 30).assigned_to(field_id))
            .unwrap();
        db.create_worker(&Worker::new("B", "Two", 40)).unwrap();

        let assigned = db.workers_for_field(field_id).unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].first_name, "A");
        assert_eq!(db.list_workers().unwrap().len(), 2);
    }
}
