use super::{invalid_on_constraint, parse_timestamp, require_row};
use crate::db::Database;
use crate::error::{AgroError, Result};
use crate::models::{TaskType, WorkerTask};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::warn;

pub(crate) fn insert_worker_task(conn: &Connection, task: &WorkerTask) -> rusqlite::Result<i64> {
    conn.execute(
        r#"
        INSERT INTO worker_tasks
            (description, worker_id, field_id, task_type, progress,
             start_date, real_end_date, estimated_end_date)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            task.description,
            task.worker_id,
            task.field_id,
            task.task_type.as_str(),
            task.progress,
            task.start_date.to_rfc3339(),
            task.real_end_date.map(|d| d.to_rfc3339()),
            task.estimated_end_date.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn missing_parent(task: &WorkerTask) -> String {
    format!(
        "Task references unknown worker {} or field {}",
        task.worker_id, task.field_id
    )
}

impl Database {
    pub fn create_worker_task(&self, task: &WorkerTask) -> Result<i64> {
        self.with_conn(|conn| {
            insert_worker_task(conn, task).map_err(|e| invalid_on_constraint(e, || missing_parent(task)))
        })
    }

    pub fn get_worker_task(&self, id: i64) -> Result<Option<WorkerTask>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM worker_tasks WHERE id = ?1",
                [id],
                row_to_worker_task,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn list_worker_tasks(&self) -> Result<Vec<WorkerTask>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM worker_tasks ORDER BY id")?;
            let tasks = stmt
                .query_map([], row_to_worker_task)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    pub fn tasks_for_field(&self, field_id: i64) -> Result<Vec<WorkerTask>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM worker_tasks WHERE field_id = ?1 ORDER BY start_date")?;
            let tasks = stmt
                .query_map([field_id], row_to_worker_task)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    pub fn tasks_for_worker(&self, worker_id: i64) -> Result<Vec<WorkerTask>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM worker_tasks WHERE worker_id = ?1 ORDER BY start_date")?;
            let tasks = stmt
                .query_map([worker_id], row_to_worker_task)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    pub fn update_worker_task(&self, task: &WorkerTask) -> Result<()> {
        let id = task
            .id
            .ok_or_else(|| AgroError::InvalidData("Task has no ID".into()))?;

        self.with_conn(|conn| {
            let affected = conn
                .execute(
                    r#"
                    UPDATE worker_tasks SET
                        description = ?1, worker_id = ?2, field_id = ?3, task_type = ?4,
                        progress = ?5, start_date = ?6, real_end_date = ?7,
                        estimated_end_date = ?8
                    WHERE id = ?9
                    "#,
                    params![
                        task.description,
                        task.worker_id,
                        task.field_id,
                        task.task_type.as_str(),
                        task.progress,
                        task.start_date.to_rfc3339(),
                        task.real_end_date.map(|d| d.to_rfc3339()),
                        task.estimated_end_date.to_rfc3339(),
                        id,
                    ],
                )
                .map_err(|e| invalid_on_constraint(e, || missing_parent(task)))?;
            require_row(affected, "Task", id)
        })
    }

    pub fn delete_worker_task(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM worker_tasks WHERE id = ?1", [id])?;
            require_row(affected, "Task", id)
        })
    }
}

fn row_to_worker_task(row: &Row) -> rusqlite::Result<WorkerTask> {
    let type_str: String = row.get("task_type")?;
    let start_str: String = row.get("start_date")?;
    let real_end_str: Option<String> = row.get("real_end_date")?;
    let estimated_end_str: String = row.get("estimated_end_date")?;

    let task_type = TaskType::from_str(&type_str).unwrap_or_else(|| {
        warn!(task_type = %type_str, "Unknown task_type in database, defaulting to Planting");
        TaskType::Planting
    });

    Ok(WorkerTask {
        id: Some(row.get("id")?),
        description: row.get("description")?,
        worker_id: row.get("worker_id")?,
        field_id: row.get("field_id")?,
        task_type,
        progress: row.get("progress")?,
        start_date: parse_timestamp(&start_str),
        real_end_date: real_end_str.as_deref().map(parse_timestamp),
        estimated_end_date: parse_timestamp(&estimated_end_str),
    })
}
