mod fields;
mod machines;
mod resources;
mod warehouses;
mod worker_tasks;
mod workers;

pub(crate) use fields::insert_field;
pub(crate) use machines::insert_machine;
pub(crate) use resources::insert_resource;
pub(crate) use warehouses::{insert_inventory_item, insert_warehouse};
pub(crate) use worker_tasks::insert_worker_task;
pub(crate) use workers::insert_worker;

use crate::db::Database;
use crate::error::{AgroError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// Row counts per table, as reported by `agromanage check`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCounts {
    pub fields: i64,
    pub resources: i64,
    pub machines: i64,
    pub workers: i64,
    pub worker_tasks: i64,
    pub warehouses: i64,
    pub inventory_items: i64,
}

impl TableCounts {
    pub fn total(&self) -> i64 {
        self.fields
            + self.resources
            + self.machines
            + self.workers
            + self.worker_tasks
            + self.warehouses
            + self.inventory_items
    }
}

impl Database {
    pub fn table_counts(&self) -> Result<TableCounts> {
        self.with_conn(|conn| {
            let count = |table: &str| -> rusqlite::Result<i64> {
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })
            };
            Ok(TableCounts {
                fields: count("fields")?,
                resources: count("resources")?,
                machines: count("machines")?,
                workers: count("workers")?,
                worker_tasks: count("worker_tasks")?,
                warehouses: count("warehouses")?,
                inventory_items: count("inventory_items")?,
            })
        })
    }

    /// Remove every row, children first.
    pub fn clear_all(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(
                r#"
                DELETE FROM inventory_items;
                DELETE FROM worker_tasks;
                DELETE FROM machines;
                DELETE FROM warehouses;
                DELETE FROM resources;
                DELETE FROM workers;
                DELETE FROM fields;
                "#,
            )?;
            Ok(())
        })
    }
}

pub(crate) fn parse_timestamp(value: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.with_timezone(&Utc);
    }
    // SQLite's datetime('now') format
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc();
    }
    warn!(value, "Unparseable timestamp in database, using current time");
    Utc::now()
}

/// Turn an affected-row count into NotFound when nothing matched.
pub(crate) fn require_row(affected: usize, entity: &str, id: i64) -> Result<()> {
    if affected == 0 {
        Err(AgroError::NotFound(format!("{} {} not found", entity, id)))
    } else {
        Ok(())
    }
}

/// Foreign-key failures on delete mean the row is still referenced.
pub(crate) fn conflict_on_constraint(err: rusqlite::Error, message: impl FnOnce() -> String) -> AgroError {
    let err = AgroError::from(err);
    if err.is_constraint_violation() {
        AgroError::Conflict(message())
    } else {
        err
    }
}

/// Foreign-key failures on insert/update mean a referenced parent is missing.
pub(crate) fn invalid_on_constraint(err: rusqlite::Error, message: impl FnOnce() -> String) -> AgroError {
    let err = AgroError::from(err);
    if err.is_constraint_violation() {
        AgroError::InvalidData(message())
    } else {
        err
    }
}
