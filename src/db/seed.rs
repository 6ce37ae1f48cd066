use super::queries::{insert_field, insert_resource, insert_worker};
use crate::db::Database;
use crate::error::Result;
use crate::models::{CultureType, Field, FieldStatus, Resource, Worker};

fn demo_fields() -> Vec<Field> {
    vec![
        Field::new(10.5, CultureType::Wheat).with_status(FieldStatus::Fallow),
        Field::new(20.0, CultureType::Corn).with_status(FieldStatus::Fallow),
    ]
}

fn demo_resources() -> Vec<Resource> {
    vec![
        Resource::new(CultureType::Wheat)
            .with_seed(110.0)
            .with_fertilizer(100.0)
            .with_workers(20.0, 3.0)
            .with_yield(5000.0),
        Resource::new(CultureType::Corn)
            .with_seed(25.0)
            .with_fertilizer(60.0)
            .with_workers(10.0, 2.0)
            .with_yield(80000.0),
    ]
}

fn demo_workers() -> Vec<Worker> {
    vec![
        Worker::new("John", "Doe", 35)
            .with_rate(100.0)
            .with_hours_worked(80.0)
            .with_active(false),
        Worker::new("Jane", "Smith", 28)
            .with_rate(120.0)
            .with_hours_worked(60.0)
            .with_active(true),
    ]
}

impl Database {
    /// Insert the demo fields, resources and workers when no fields exist yet.
    /// Returns true when anything was written.
    pub fn seed_demo_data(&self) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let existing: i64 = conn.query_row("SELECT COUNT(*) FROM fields", [], |row| row.get(0))?;
            if existing > 0 {
                tracing::debug!(existing, "Fields present, skipping demo data");
                return Ok(false);
            }

            let tx = conn.transaction()?;
            for field in demo_fields() {
                insert_field(&tx, &field)?;
            }
            for resource in demo_resources() {
                insert_resource(&tx, &resource)?;
            }
            for worker in demo_workers() {
                insert_worker(&tx, &worker)?;
            }
            tx.commit()?;

            tracing::info!("Seeded demo data");
            Ok(true)
        })
    }
}
