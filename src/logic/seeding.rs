use crate::db::queries::{
    insert_field, insert_inventory_item, insert_machine, insert_resource, insert_warehouse,
    insert_worker, TableCounts,
};
use crate::db::Database;
use crate::error::{AgroError, Result};
use crate::models::{
    CultureType, Field, FieldStatus, InventoryItem, Machine, MachineType, Resource, Warehouse,
    Worker,
};
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::info;

const FIRST_NAMES: &[&str] = &[
    "Olivia", "Liam", "Emma", "Noah", "Ava", "Elijah", "Sophia", "James", "Mia", "Lucas",
    "Amelia", "Mason", "Harper", "Ethan", "Ella", "Logan", "Grace", "Owen", "Chloe", "Caleb",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Wilson",
    "Anderson", "Taylor", "Thomas", "Moore", "Martin", "Jackson", "Thompson", "White", "Harris",
    "Clark", "Lewis",
];

const INVENTORY_NAMES: &[&str] = &[
    "Wheat Seeds",
    "Corn Seeds",
    "Soybean Seeds",
    "Rice Seeds",
    "Cotton Seeds",
    "Nitrogen Fertilizer",
    "Phosphorus Fertilizer",
    "Potassium Fertilizer",
    "Herbicide",
    "Pesticide",
    "Fungicide",
    "Diesel Fuel",
    "Gasoline",
    "Engine Oil",
    "Hydraulic Fluid",
    "Spare Parts",
    "Tires",
    "Filters",
    "Irrigation Pipes",
    "Sprinkler Heads",
    "Water Pumps",
    "Tools",
    "Safety Equipment",
    "Packaging Materials",
    "Harvest Bags",
];

const UNITS: &[&str] = &["kg", "L", "units", "tons", "bags", "boxes", "pieces"];

const FIVE_YEARS_SECS: i64 = 5 * 365 * 24 * 60 * 60;

/// How many rows of each kind to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    pub fields: usize,
    pub workers: usize,
    pub resources: usize,
    pub machines: usize,
    pub warehouses: usize,
    pub inventory_items: usize,
    pub rng_seed: u64,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            fields: 2000,
            workers: 2000,
            resources: 2000,
            machines: 2000,
            warehouses: 500,
            inventory_items: 4000,
            rng_seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub counts: TableCounts,
    pub elapsed: std::time::Duration,
}

/// Bulk generator for load testing. Wipes the store before writing.
pub struct Seeder {
    db: Database,
    plan: SeedPlan,
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> Result<&'a T> {
    items
        .choose(rng)
        .ok_or_else(|| AgroError::Internal("cannot pick from an empty list".into()))
}

fn money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Seeder {
    pub fn new(db: Database, plan: SeedPlan) -> Self {
        Self { db, plan }
    }

    fn check_plan(&self) -> Result<()> {
        if self.plan.machines > 0 && self.plan.resources == 0 {
            return Err(AgroError::InvalidData(
                "machines need at least one resource to reference".into(),
            ));
        }
        if self.plan.inventory_items > 0 && self.plan.warehouses == 0 {
            return Err(AgroError::InvalidData(
                "inventory items need at least one warehouse".into(),
            ));
        }
        Ok(())
    }

    pub fn run(&self) -> Result<SeedSummary> {
        self.check_plan()?;
        let started = Instant::now();
        let plan = self.plan;
        let mut rng = StdRng::seed_from_u64(plan.rng_seed);

        info!(rng_seed = plan.rng_seed, "Clearing existing data");
        self.db.clear_all()?;

        self.db.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let now = Utc::now();

            let mut field_ids = Vec::with_capacity(plan.fields);
            for _ in 0..plan.fields {
                let age = Duration::seconds(rng.gen_range(0..FIVE_YEARS_SECS));
                let field = Field::new(rng.gen_range(10.0..1000.0), *pick(&mut rng, CultureType::all())?)
                    .with_status(*pick(&mut rng, FieldStatus::all())?)
                    .with_created_at(now - age);
                field_ids.push(insert_field(&tx, &field)?);
            }
            info!(count = field_ids.len(), "Seeded fields");

            for _ in 0..plan.workers {
                let worker = Worker::new(
                    pick(&mut rng, FIRST_NAMES)?,
                    pick(&mut rng, LAST_NAMES)?,
                    rng.gen_range(18..=65),
                )
                .with_rate(money(rng.gen_range(10.0..50.0)))
                .with_active(rng.gen_bool(0.8))
                .with_hours_worked(money(rng.gen_range(0.0..2000.0)));
                insert_worker(&tx, &worker)?;
            }
            info!(count = plan.workers, "Seeded workers");

            let mut resource_ids = Vec::with_capacity(plan.resources);
            for _ in 0..plan.resources {
                let resource = Resource::new(*pick(&mut rng, CultureType::all())?)
                    .with_seed(rng.gen_range(50.0..200.0))
                    .with_fertilizer(rng.gen_range(100.0..500.0))
                    .with_workers(rng.gen_range(0.5..5.0), rng.gen_range(1.0..10.0))
                    .with_yield(rng.gen_range(2.0..15.0));
                resource_ids.push(insert_resource(&tx, &resource)?);
            }
            info!(count = resource_ids.len(), "Seeded resources");

            for _ in 0..plan.machines {
                let mut machine = Machine::new(
                    *pick(&mut rng, MachineType::all())?,
                    *pick(&mut rng, &resource_ids)?,
                )
                .with_fuel_consumption(rng.gen_range(5.0..50.0))
                .with_work_durality(rng.gen_range(0.5..3.0));
                if !rng.gen_bool(0.7) {
                    machine = machine.unavailable();
                }
                if !field_ids.is_empty() && rng.gen_bool(0.5) {
                    machine = machine.assigned_to(*pick(&mut rng, &field_ids)?);
                }
                insert_machine(&tx, &machine)?;
            }
            info!(count = plan.machines, "Seeded machines");

            let mut warehouse_ids = Vec::with_capacity(plan.warehouses);
            for _ in 0..plan.warehouses {
                warehouse_ids.push(insert_warehouse(&tx, &Warehouse::new(None))?);
            }
            info!(count = warehouse_ids.len(), "Seeded warehouses");

            for _ in 0..plan.inventory_items {
                let item = InventoryItem::new(
                    *pick(&mut rng, &warehouse_ids)?,
                    pick(&mut rng, INVENTORY_NAMES)?,
                    rng.gen_range(1..=10_000),
                    pick(&mut rng, UNITS)?,
                );
                insert_inventory_item(&tx, &item)?;
            }
            info!(count = plan.inventory_items, "Seeded inventory items");

            tx.commit()?;
            Ok(())
        })?;

        let counts = self.db.table_counts()?;
        let elapsed = started.elapsed();
        info!(
            total = counts.total(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Seeding complete"
        );
        Ok(SeedSummary { counts, elapsed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_plan() -> SeedPlan {
        SeedPlan {
            fields: 20,
            workers: 15,
            resources: 10,
            machines: 25,
            warehouses: 4,
            inventory_items: 30,
            rng_seed: 42,
        }
    }

    #[test]
    fn seeds_requested_counts() {
        let db = Database::open_in_memory().unwrap();
        let summary = Seeder::new(db, small_plan()).run().unwrap();

        assert_eq!(summary.counts.fields, 20);
        assert_eq!(summary.counts.workers, 15);
        assert_eq!(summary.counts.resources, 10);
        assert_eq!(summary.counts.machines, 25);
        assert_eq!(summary.counts.warehouses, 4);
        assert_eq!(summary.counts.inventory_items, 30);
        assert_eq!(summary.counts.worker_tasks, 0);
    }

    #[test]
    fn same_seed_same_data() {
        let first = Database::open_in_memory().unwrap();
        let second = Database::open_in_memory().unwrap();
        Seeder::new(first.clone(), small_plan()).run().unwrap();
        Seeder::new(second.clone(), small_plan()).run().unwrap();

        let areas = |db: &Database| -> Vec<f64> {
            db.list_fields().unwrap().iter().map(|f| f.area).collect()
        };
        assert_eq!(areas(&first), areas(&second));
        assert_eq!(first.list_machines().unwrap(), second.list_machines().unwrap());
        assert_eq!(
            first.list_inventory_items().unwrap(),
            second.list_inventory_items().unwrap()
        );
    }

    #[test]
    fn generated_values_stay_in_range() {
        let db = Database::open_in_memory().unwrap();
        Seeder::new(db.clone(), small_plan()).run().unwrap();

        for field in db.list_fields().unwrap() {
            assert!((10.0..1000.0).contains(&field.area));
        }
        for worker in db.list_workers().unwrap() {
            assert!((18..=65).contains(&worker.age));
            assert!((10.0..=50.0).contains(&worker.hourly_rate));
        }
        for item in db.list_inventory_items().unwrap() {
            assert!((1..=10_000).contains(&item.quantity));
            assert!(UNITS.contains(&item.unit.as_str()));
        }
    }

    #[test]
    fn reseeding_replaces_existing_rows() {
        let db = Database::open_in_memory().unwrap();
        db.seed_demo_data().unwrap();
        let summary = Seeder::new(db, small_plan()).run().unwrap();
        assert_eq!(summary.counts.fields, 20);
    }

    #[test]
    fn machines_without_resources_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let plan = SeedPlan {
            resources: 0,
            ..small_plan()
        };
        assert!(matches!(
            Seeder::new(db, plan).run(),
            Err(AgroError::InvalidData(_))
        ));
    }
}
