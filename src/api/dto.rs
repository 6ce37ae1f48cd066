//! Request and response bodies. Mapping to and from the stored models is
//! spelled out field by field.

use crate::error::{AgroError, Result};
use crate::models::{
    CultureType, Field, FieldStatus, InventoryItem, Machine, MachineType, Resource, TaskType,
    Warehouse, Worker, WorkerTask,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AgroError::InvalidData(format!(
            "{} must be a non-negative number",
            name
        )))
    }
}

fn not_blank(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(AgroError::InvalidData(format!("{} is required", name)))
    } else {
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

// Fields

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRequest {
    pub area: f64,
    pub culture: CultureType,
    #[serde(default = "default_status")]
    pub status: FieldStatus,
}

fn default_status() -> FieldStatus {
    FieldStatus::Fallow
}

impl Validate for FieldRequest {
    fn validate(&self) -> Result<()> {
        non_negative("area", self.area)
    }
}

impl FieldRequest {
    pub fn into_field(self) -> Field {
        Field::new(self.area, self.culture).with_status(self.status)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResponse {
    pub id: i64,
    pub area: f64,
    pub culture: CultureType,
    pub status: FieldStatus,
    pub workers: Vec<WorkerResponse>,
    pub tasks: Vec<WorkerTask>,
    pub created_at: DateTime<Utc>,
}

impl FieldResponse {
    pub fn new(field: Field, workers: Vec<WorkerResponse>, tasks: Vec<WorkerTask>) -> Self {
        Self {
            id: field.id.unwrap_or_default(),
            area: field.area,
            culture: field.culture,
            status: field.status,
            workers,
            tasks,
            created_at: field.created_at,
        }
    }
}

// Resources

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequest {
    pub culture_type: CultureType,
    pub seed_per_hectare: f64,
    pub fertilizer_per_hectare: f64,
    pub worker_per_hectare: f64,
    pub worker_work_durality_per_hectare: f64,
    #[serde(rename = "yield", alias = "yieldPerHectare")]
    pub yield_per_hectare: f64,
}

impl Validate for ResourceRequest {
    fn validate(&self) -> Result<()> {
        non_negative("seedPerHectare", self.seed_per_hectare)?;
        non_negative("fertilizerPerHectare", self.fertilizer_per_hectare)?;
        non_negative("workerPerHectare", self.worker_per_hectare)?;
        non_negative(
            "workerWorkDuralityPerHectare",
            self.worker_work_durality_per_hectare,
        )?;
        non_negative("yield", self.yield_per_hectare)
    }
}

impl ResourceRequest {
    pub fn into_resource(self) -> Resource {
        Resource {
            id: None,
            culture_type: self.culture_type,
            seed_per_hectare: self.seed_per_hectare,
            fertilizer_per_hectare: self.fertilizer_per_hectare,
            worker_per_hectare: self.worker_per_hectare,
            worker_work_durality_per_hectare: self.worker_work_durality_per_hectare,
            yield_per_hectare: self.yield_per_hectare,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: i64,
    pub culture_type: CultureType,
    pub seed_per_hectare: f64,
    pub fertilizer_per_hectare: f64,
    pub worker_per_hectare: f64,
    pub worker_work_durality_per_hectare: f64,
    #[serde(rename = "yield")]
    pub yield_per_hectare: f64,
    pub required_machines: Vec<Machine>,
}

impl ResourceResponse {
    pub fn new(resource: Resource, required_machines: Vec<Machine>) -> Self {
        Self {
            id: resource.id.unwrap_or_default(),
            culture_type: resource.culture_type,
            seed_per_hectare: resource.seed_per_hectare,
            fertilizer_per_hectare: resource.fertilizer_per_hectare,
            worker_per_hectare: resource.worker_per_hectare,
            worker_work_durality_per_hectare: resource.worker_work_durality_per_hectare,
            yield_per_hectare: resource.yield_per_hectare,
            required_machines,
        }
    }
}

// Machines

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRequest {
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    pub fuel_consumption: f64,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub work_durality_per_hectare: f64,
    #[serde(default)]
    pub field_id: Option<i64>,
    pub resource_id: i64,
}

impl Validate for MachineRequest {
    fn validate(&self) -> Result<()> {
        non_negative("fuelConsumption", self.fuel_consumption)?;
        non_negative("workDuralityPerHectare", self.work_durality_per_hectare)
    }
}

impl MachineRequest {
    pub fn into_machine(self) -> Machine {
        Machine {
            id: None,
            machine_type: self.machine_type,
            fuel_consumption: self.fuel_consumption,
            is_available: self.is_available,
            work_durality_per_hectare: self.work_durality_per_hectare,
            field_id: self.field_id,
            resource_id: self.resource_id,
        }
    }
}

// Workers

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub hourly_rate: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub hours_worked: f64,
    #[serde(default)]
    pub field_id: Option<i64>,
}

impl Validate for WorkerRequest {
    fn validate(&self) -> Result<()> {
        not_blank("firstName", &self.first_name)?;
        not_blank("lastName", &self.last_name)?;
        if !(0..=150).contains(&self.age) {
            return Err(AgroError::InvalidData("age must be between 0 and 150".into()));
        }
        non_negative("hourlyRate", self.hourly_rate)?;
        non_negative("hoursWorked", self.hours_worked)
    }
}

impl WorkerRequest {
    pub fn into_worker(self) -> Worker {
        Worker {
            id: None,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            age: self.age,
            hourly_rate: self.hourly_rate,
            is_active: self.is_active,
            hours_worked: self.hours_worked,
            field_id: self.field_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub hourly_rate: f64,
    pub is_active: bool,
    pub hours_worked: f64,
    pub field_id: Option<i64>,
    pub tasks: Vec<WorkerTask>,
}

impl WorkerResponse {
    pub fn new(worker: Worker, tasks: Vec<WorkerTask>) -> Self {
        Self {
            id: worker.id.unwrap_or_default(),
            first_name: worker.first_name,
            last_name: worker.last_name,
            age: worker.age,
            hourly_rate: worker.hourly_rate,
            is_active: worker.is_active,
            hours_worked: worker.hours_worked,
            field_id: worker.field_id,
            tasks,
        }
    }
}

// Worker tasks

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerTaskRequest {
    #[serde(default)]
    pub description: Option<String>,
    pub worker_id: i64,
    pub field_id: i64,
    pub task_type: TaskType,
    #[serde(default)]
    pub progress: f64,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub real_end_date: Option<DateTime<Utc>>,
    #[serde(alias = "estimatesEndDate")]
    pub estimated_end_date: DateTime<Utc>,
}

impl Validate for WorkerTaskRequest {
    fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.progress) {
            return Err(AgroError::InvalidData(
                "progress must be between 0 and 100".into(),
            ));
        }
        if self.estimated_end_date < self.start_date {
            return Err(AgroError::InvalidData(
                "estimatedEndDate must not precede startDate".into(),
            ));
        }
        Ok(())
    }
}

impl WorkerTaskRequest {
    pub fn into_task(self) -> WorkerTask {
        let mut task = WorkerTask::new(
            self.worker_id,
            self.field_id,
            self.task_type,
            self.start_date,
            self.estimated_end_date,
        )
        .with_progress(self.progress);

        if let Some(description) = self.description.as_deref().map(str::trim) {
            if !description.is_empty() {
                task = task.with_description(description);
            }
        }
        task.real_end_date = self.real_end_date;
        task
    }
}

// Warehouses and inventory

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl Validate for WarehouseRequest {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl WarehouseRequest {
    pub fn into_warehouse(self) -> Warehouse {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Warehouse::new(name)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseResponse {
    pub id: i64,
    pub name: Option<String>,
    pub inventory_items: Vec<InventoryItem>,
}

impl WarehouseResponse {
    pub fn new(warehouse: Warehouse, inventory_items: Vec<InventoryItem>) -> Self {
        Self {
            id: warehouse.id.unwrap_or_default(),
            name: warehouse.name,
            inventory_items,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemRequest {
    pub warehouse_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
}

impl Validate for InventoryItemRequest {
    fn validate(&self) -> Result<()> {
        not_blank("name", &self.name)?;
        not_blank("unit", &self.unit)?;
        if self.quantity < 0 {
            return Err(AgroError::InvalidData(
                "quantity must not be negative".into(),
            ));
        }
        Ok(())
    }
}

impl InventoryItemRequest {
    pub fn into_item(self) -> InventoryItem {
        InventoryItem {
            id: None,
            warehouse_id: self.warehouse_id,
            name: self.name.trim().to_string(),
            quantity: self.quantity,
            unit: self.unit.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_request_defaults_to_fallow() {
        let req: FieldRequest = serde_json::from_str(r#"{"area": 12.5, "culture": "corn"}"#).unwrap();
        req.validate().unwrap();
        let field = req.into_field();
        assert_eq!(field.status, FieldStatus::Fallow);
        assert_eq!(field.culture, CultureType::Corn);
    }

    #[test]
    fn negative_area_is_rejected() {
        let req = FieldRequest {
            area: -1.0,
            culture: CultureType::Rice,
            status: FieldStatus::Planted,
        };
        assert!(matches!(req.validate(), Err(AgroError::InvalidData(_))));
    }

    #[test]
    fn resource_request_reads_yield_key() {
        let req: ResourceRequest = serde_json::from_str(
            r#"{"cultureType":"Wheat","seedPerHectare":110,"fertilizerPerHectare":100,
                "workerPerHectare":20,"workerWorkDuralityPerHectare":3,"yield":5000}"#,
        )
        .unwrap();
        req.validate().unwrap();
        assert_eq!(req.into_resource().yield_per_hectare, 5000.0);
    }

    #[test]
    fn worker_validation() {
        let mut req = WorkerRequest {
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            age: 28,
            hourly_rate: 120.0,
            is_active: true,
            hours_worked: 60.0,
            field_id: None,
        };
        assert!(req.validate().is_ok());

        req.age = 200;
        assert!(req.validate().is_err());

        req.age = 28;
        req.first_name = "  ".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn task_request_accepts_legacy_end_date_key() {
        let req: WorkerTaskRequest = serde_json::from_str(
            r#"{"workerId":1,"fieldId":2,"taskType":"Spraying","progress":40,
                "startDate":"2024-05-01T00:00:00Z","estimatesEndDate":"2024-05-03T00:00:00Z"}"#,
        )
        .unwrap();
        req.validate().unwrap();
        let task = req.into_task();
        assert_eq!(task.description, "Spraying");
        assert_eq!(task.real_end_date, None);
    }

    #[test]
    fn task_progress_out_of_range() {
        let req: WorkerTaskRequest = serde_json::from_str(
            r#"{"workerId":1,"fieldId":2,"taskType":"Planting","progress":140,
                "startDate":"2024-05-01T00:00:00Z","estimatedEndDate":"2024-05-03T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn inventory_item_needs_name_and_unit() {
        let req = InventoryItemRequest {
            warehouse_id: 1,
            name: "Tools".into(),
            quantity: 3,
            unit: "".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn blank_warehouse_name_becomes_none() {
        let wh = WarehouseRequest {
            name: Some("   ".into()),
        }
        .into_warehouse();
        assert_eq!(wh.name, None);
    }

    #[test]
    fn resource_response_uses_yield_key() {
        let resource = Resource::new(CultureType::Corn).with_yield(80000.0);
        let json = serde_json::to_value(ResourceResponse::new(resource, vec![])).unwrap();
        assert_eq!(json["yield"], 80000.0);
        assert!(json["requiredMachines"].as_array().unwrap().is_empty());
    }
}
