use crate::models::{
    CultureType, Field, FieldStatus, InventoryItem, Machine, MachineType, Resource, TaskType,
    Worker, WorkerTask,
};
use serde::{Deserialize, Serialize};

/// Criteria that keep or drop a record. Every unset criterion matches.
pub trait Filter<T> {
    fn matches(&self, item: &T) -> bool;
}

fn within<V: PartialOrd>(value: V, min: Option<V>, max: Option<V>) -> bool {
    min.map_or(true, |lo| value >= lo) && max.map_or(true, |hi| value <= hi)
}

fn equals<V: PartialEq>(value: V, wanted: Option<V>) -> bool {
    wanted.map_or(true, |w| value == w)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFilter {
    pub culture: Option<CultureType>,
    pub status: Option<FieldStatus>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
}

impl Filter<Field> for FieldFilter {
    fn matches(&self, field: &Field) -> bool {
        equals(field.culture, self.culture)
            && equals(field.status, self.status)
            && within(field.area, self.min_area, self.max_area)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFilter {
    pub culture_type: Option<CultureType>,
    pub min_yield: Option<f64>,
    pub max_yield: Option<f64>,
}

impl Filter<Resource> for ResourceFilter {
    fn matches(&self, resource: &Resource) -> bool {
        equals(resource.culture_type, self.culture_type)
            && within(resource.yield_per_hectare, self.min_yield, self.max_yield)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineFilter {
    #[serde(rename = "type")]
    pub machine_type: Option<MachineType>,
    pub is_available: Option<bool>,
    pub min_fuel_consumption: Option<f64>,
    pub max_fuel_consumption: Option<f64>,
}

impl Filter<Machine> for MachineFilter {
    fn matches(&self, machine: &Machine) -> bool {
        equals(machine.machine_type, self.machine_type)
            && equals(machine.is_available, self.is_available)
            && within(
                machine.fuel_consumption,
                self.min_fuel_consumption,
                self.max_fuel_consumption,
            )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerFilter {
    pub is_active: Option<bool>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub min_hourly_rate: Option<f64>,
    pub max_hourly_rate: Option<f64>,
}

impl Filter<Worker> for WorkerFilter {
    fn matches(&self, worker: &Worker) -> bool {
        equals(worker.is_active, self.is_active)
            && within(worker.age, self.min_age, self.max_age)
            && within(worker.hourly_rate, self.min_hourly_rate, self.max_hourly_rate)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerTaskFilter {
    pub task_type: Option<TaskType>,
    pub min_progress: Option<f64>,
    pub max_progress: Option<f64>,
    pub worker_id: Option<i64>,
    pub field_id: Option<i64>,
}

impl Filter<WorkerTask> for WorkerTaskFilter {
    fn matches(&self, task: &WorkerTask) -> bool {
        equals(task.task_type, self.task_type)
            && within(task.progress, self.min_progress, self.max_progress)
            && equals(task.worker_id, self.worker_id)
            && equals(task.field_id, self.field_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemFilter {
    /// Case-insensitive substring of the item name.
    pub name: Option<String>,
    pub min_quantity: Option<i64>,
    pub max_quantity: Option<i64>,
    pub warehouse_id: Option<i64>,
}

impl Filter<InventoryItem> for InventoryItemFilter {
    fn matches(&self, item: &InventoryItem) -> bool {
        let name_matches = match self.name.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => item
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };
        name_matches
            && within(item.quantity, self.min_quantity, self.max_quantity)
            && equals(item.warehouse_id, self.warehouse_id)
    }
}

/// Page selection from the query string. Both parts are optional.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageRequest {
    /// Page number is at least 1; page size falls back to `default_size`
    /// and is clamped to `1..=max_size`.
    pub fn resolve(&self, default_size: u32, max_size: u32) -> (u32, u32) {
        let number = self.page_number.unwrap_or(1).max(1);
        let size = self
            .page_size
            .unwrap_or(default_size)
            .clamp(1, max_size.max(1));
        (number, size)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

pub fn paginate<T>(items: Vec<T>, page_number: u32, page_size: u32) -> PaginatedResult<T> {
    let total_count = items.len();
    let size = page_size.max(1) as usize;
    let skip = (page_number.max(1) as usize - 1).saturating_mul(size);
    let total_pages = total_count.div_ceil(size) as u32;

    PaginatedResult {
        items: items.into_iter().skip(skip).take(size).collect(),
        total_count,
        page_number,
        page_size,
        total_pages,
    }
}

/// Filter in memory, then cut out the requested page.
pub fn filter_and_paginate<T, F: Filter<T>>(
    items: Vec<T>,
    filter: &F,
    page: PageRequest,
    default_size: u32,
    max_size: u32,
) -> PaginatedResult<T> {
    let (number, size) = page.resolve(default_size, max_size);
    let kept: Vec<T> = items.into_iter().filter(|item| filter.matches(item)).collect();
    paginate(kept, number, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<Field> {
        vec![
            Field::new(5.0, CultureType::Wheat),
            Field::new(10.0, CultureType::Wheat).with_status(FieldStatus::Planted),
            Field::new(20.0, CultureType::Corn),
            Field::new(30.0, CultureType::Wheat),
        ]
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = FieldFilter::default();
        assert!(fields().iter().all(|f| filter.matches(f)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let filter = FieldFilter {
            min_area: Some(10.0),
            max_area: Some(20.0),
            ..Default::default()
        };
        let kept: Vec<f64> = fields()
            .into_iter()
            .filter(|f| filter.matches(f))
            .map(|f| f.area)
            .collect();
        assert_eq!(kept, vec![10.0, 20.0]);
    }

    #[test]
    fn criteria_combine_conjunctively() {
        let filter = FieldFilter {
            culture: Some(CultureType::Wheat),
            status: Some(FieldStatus::Fallow),
            min_area: Some(6.0),
            ..Default::default()
        };
        let kept: Vec<Field> = fields().into_iter().filter(|f| filter.matches(f)).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].area, 30.0);
    }

    #[test]
    fn inventory_name_is_case_insensitive_substring() {
        let filter = InventoryItemFilter {
            name: Some("SEEDS".into()),
            ..Default::default()
        };
        assert!(filter.matches(&InventoryItem::new(1, "Corn Seeds", 10, "kg")));
        assert!(!filter.matches(&InventoryItem::new(1, "Diesel Fuel", 10, "L")));
    }

    #[test]
    fn worker_filter_checks_age_and_rate() {
        let filter = WorkerFilter {
            is_active: Some(true),
            min_age: Some(30),
            max_hourly_rate: Some(110.0),
            ..Default::default()
        };
        assert!(filter.matches(&Worker::new("A", "B", 30).with_rate(110.0)));
        assert!(!filter.matches(&Worker::new("A", "B", 29).with_rate(50.0)));
        assert!(!filter.matches(&Worker::new("A", "B", 40).with_rate(50.0).with_active(false)));
    }

    #[test]
    fn pagination_reports_unpaginated_total() {
        let result = paginate((1..=25).collect::<Vec<i32>>(), 3, 10);
        assert_eq!(result.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(result.total_count, 25);
        assert_eq!(result.total_pages, 3);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let result = paginate(vec![1, 2, 3], 5, 10);
        assert!(result.items.is_empty());
        assert_eq!(result.total_count, 3);
        assert_eq!(result.page_number, 5);
    }

    #[test]
    fn page_request_defaults_and_clamps() {
        assert_eq!(PageRequest::default().resolve(10, 100), (1, 10));

        let oversized = PageRequest {
            page_number: Some(0),
            page_size: Some(5000),
        };
        assert_eq!(oversized.resolve(10, 100), (1, 100));

        let zero = PageRequest {
            page_number: Some(2),
            page_size: Some(0),
        };
        assert_eq!(zero.resolve(10, 100), (2, 1));
    }

    #[test]
    fn filter_and_paginate_combines_both() {
        let filter = FieldFilter {
            culture: Some(CultureType::Wheat),
            ..Default::default()
        };
        let page = PageRequest {
            page_number: Some(2),
            page_size: Some(2),
        };
        let result = filter_and_paginate(fields(), &filter, page, 10, 100);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].area, 30.0);
    }

    #[test]
    fn filters_deserialize_from_camel_case() {
        let filter: MachineFilter =
            serde_json::from_str(r#"{"type":"harvester","isAvailable":true,"minFuelConsumption":5}"#)
                .unwrap();
        assert_eq!(filter.machine_type, Some(MachineType::Harvester));
        assert_eq!(filter.is_available, Some(true));
        assert_eq!(filter.min_fuel_consumption, Some(5.0));
    }
}
