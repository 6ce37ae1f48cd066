use super::calculations::{self, FieldEstimate, MachineProfile, ResourceProfile};
use crate::db::Database;
use crate::error::{AgroError, Result};
use crate::models::{CultureType, Field, FieldStatus, Machine, Worker, WorkerTask};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// A field with everything assigned to it and its planning estimate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDetails {
    pub id: i64,
    pub area: f64,
    pub culture: CultureType,
    pub status: FieldStatus,
    pub created_at: DateTime<Utc>,
    pub workers: Vec<Worker>,
    pub machines: Vec<Machine>,
    pub tasks: Vec<WorkerTask>,
    pub required_workers: u32,
    pub required_machines: u32,
    pub seed_amount: f64,
    pub fertilizer_amount: f64,
    #[serde(rename = "yield")]
    pub estimated_yield: f64,
    pub fuel_needed: f64,
    pub work_durality_needed: u32,
}

impl FieldDetails {
    fn assemble(
        id: i64,
        field: Field,
        workers: Vec<Worker>,
        machines: Vec<Machine>,
        tasks: Vec<WorkerTask>,
        estimate: FieldEstimate,
    ) -> Self {
        Self {
            id,
            area: field.area,
            culture: field.culture,
            status: field.status,
            created_at: field.created_at,
            workers,
            machines,
            tasks,
            required_workers: estimate.required_workers,
            required_machines: estimate.required_machines,
            seed_amount: estimate.seed_amount,
            fertilizer_amount: estimate.fertilizer_amount,
            estimated_yield: estimate.estimated_yield,
            fuel_needed: estimate.total_fuel_needed,
            work_durality_needed: estimate.total_work_duration,
        }
    }

    pub fn estimate(&self) -> FieldEstimate {
        FieldEstimate {
            required_workers: self.required_workers,
            required_machines: self.required_machines,
            seed_amount: self.seed_amount,
            fertilizer_amount: self.fertilizer_amount,
            estimated_yield: self.estimated_yield,
            total_fuel_needed: self.fuel_needed,
            total_work_duration: self.work_durality_needed,
        }
    }
}

/// Loads a field's context from the store and runs the estimator over it.
#[derive(Clone)]
pub struct FieldDetailsService {
    db: Database,
}

impl FieldDetailsService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn details(&self, field_id: i64) -> Result<FieldDetails> {
        let field = self
            .db
            .get_field(field_id)?
            .ok_or_else(|| AgroError::NotFound(format!("Field {} not found", field_id)))?;

        let resource = self
            .db
            .get_resource_by_culture_type(field.culture)?
            .ok_or_else(|| {
                AgroError::NotFound(format!("No resource profile for culture {}", field.culture))
            })?;
        let resource_id = resource
            .id
            .ok_or_else(|| AgroError::Internal("Stored resource has no ID".into()))?;

        let required_machines = self.db.count_machines_for_resource(resource_id)?;
        let profile = ResourceProfile::from_resource(&resource, required_machines);

        let machines = self.db.machines_for_field(field_id)?;
        let workers = self.db.workers_for_field(field_id)?;
        let tasks = self.db.tasks_for_field(field_id)?;

        let machine_profiles: Vec<MachineProfile> = machines.iter().map(MachineProfile::from).collect();
        let estimate = calculations::estimate(&profile, field.area, &machine_profiles);

        debug!(
            field_id,
            resource_id,
            culture = %profile.culture_type,
            machines = machines.len(),
            workers = workers.len(),
            "Estimated field"
        );

        Ok(FieldDetails::assemble(
            field_id, field, workers, machines, tasks, estimate,
        ))
    }
}
