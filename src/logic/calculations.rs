use crate::models::{CultureType, Machine, Resource};
use serde::Serialize;

/// Crop coefficients the estimator works from, detached from storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceProfile {
    pub culture_type: CultureType,
    pub seed_per_hectare: f64,
    pub fertilizer_per_hectare: f64,
    pub worker_per_hectare: f64,
    pub worker_work_durality_per_hectare: f64,
    pub yield_per_hectare: f64,
    /// Machines registered against this crop's resource record.
    pub required_machines: u32,
}

impl ResourceProfile {
    pub fn from_resource(resource: &Resource, required_machines: u32) -> Self {
        Self {
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

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineProfile {
    pub fuel_consumption_rate: f64,
    pub work_durality_per_hectare: f64,
}

impl From<&Machine> for MachineProfile {
    fn from(machine: &Machine) -> Self {
        Self {
            fuel_consumption_rate: machine.fuel_consumption,
            work_durality_per_hectare: machine.work_durality_per_hectare,
        }
    }
}

/// Planning figures for one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEstimate {
    pub required_workers: u32,
    pub required_machines: u32,
    pub seed_amount: f64,
    pub fertilizer_amount: f64,
    pub estimated_yield: f64,
    pub total_fuel_needed: f64,
    pub total_work_duration: u32,
}

/// Round up to a whole count. Negative and NaN products saturate to 0.
fn whole_units(value: f64) -> u32 {
    value.ceil() as u32
}

/// Workers needed to cover `area_ha`, rounded up.
pub fn required_workers(resource: &ResourceProfile, area_ha: f64) -> u32 {
    whole_units(resource.worker_per_hectare * area_ha)
}

/// Machines the crop calls for. Independent of area.
pub fn required_machinery_count(resource: &ResourceProfile) -> u32 {
    resource.required_machines
}

pub fn seed_amount(resource: &ResourceProfile, area_ha: f64) -> f64 {
    resource.seed_per_hectare * area_ha
}

pub fn fertilizer_amount(resource: &ResourceProfile, area_ha: f64) -> f64 {
    resource.fertilizer_per_hectare * area_ha
}

pub fn estimate_yield(resource: &ResourceProfile, area_ha: f64) -> f64 {
    resource.yield_per_hectare * area_ha
}

/// Fuel one machine burns working the whole field.
pub fn estimate_fuel_consumption(machine: &MachineProfile, area_ha: f64) -> f64 {
    machine.fuel_consumption_rate * area_ha
}

/// Hours one machine's pass takes: its own hours per hectare plus the crew
/// hours of `worker_count` workers over the same area. Unrounded.
pub fn estimate_work_duration(
    area_ha: f64,
    worker_count: u32,
    machine: &MachineProfile,
    resource: &ResourceProfile,
) -> f64 {
    let machine_hours = machine.work_durality_per_hectare * area_ha;
    let crew_hours = resource.worker_work_durality_per_hectare * area_ha * f64::from(worker_count);
    machine_hours + crew_hours
}

pub fn total_fuel_consumption(machines: &[MachineProfile], area_ha: f64) -> f64 {
    machines
        .iter()
        .map(|m| estimate_fuel_consumption(m, area_ha))
        .sum()
}

/// Sum of per-machine durations, rounded up once at the end.
pub fn total_work_duration(
    area_ha: f64,
    worker_count: u32,
    machines: &[MachineProfile],
    resource: &ResourceProfile,
) -> u32 {
    let hours: f64 = machines
        .iter()
        .map(|m| estimate_work_duration(area_ha, worker_count, m, resource))
        .sum();
    whole_units(hours)
}

pub fn estimate(
    resource: &ResourceProfile,
    area_ha: f64,
    machines: &[MachineProfile],
) -> FieldEstimate {
    let workers = required_workers(resource, area_ha);

    FieldEstimate {
        required_workers: workers,
        required_machines: required_machinery_count(resource),
        seed_amount: seed_amount(resource, area_ha),
        fertilizer_amount: fertilizer_amount(resource, area_ha),
        estimated_yield: estimate_yield(resource, area_ha),
        total_fuel_needed: total_fuel_consumption(machines, area_ha),
        total_work_duration: total_work_duration(area_ha, workers, machines, resource),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn profile(worker_per_hectare: f64) -> ResourceProfile {
        ResourceProfile {
            culture_type: CultureType::Wheat,
            seed_per_hectare: 150.0,
            fertilizer_per_hectare: 200.0,
            worker_per_hectare,
            worker_work_durality_per_hectare: 8.0,
            yield_per_hectare: 5000.0,
            required_machines: 3,
        }
    }

    fn machine(rate: f64, hours: f64) -> MachineProfile {
        MachineProfile {
            fuel_consumption_rate: rate,
            work_durality_per_hectare: hours,
        }
    }

    #[test]
    fn end_to_end_scenario() {
        let r = profile(2.0);
        assert!(approx(seed_amount(&r, 10.0), 1500.0));
        assert!(approx(fertilizer_amount(&r, 10.0), 2000.0));
        assert_eq!(required_workers(&r, 10.0), 20);
        assert!(approx(estimate_yield(&r, 10.0), 50000.0));
    }

    #[test]
    fn required_workers_rounds_up() {
        let r = profile(2.0);
        assert_eq!(required_workers(&r, 2.5), 5);
        // 4.8 workers is still five people
        assert_eq!(required_workers(&r, 2.4), 5);
        assert_eq!(required_workers(&r, 0.01), 1);
    }

    #[test]
    fn required_workers_monotone_in_area() {
        let r = profile(1.7);
        let mut last = 0;
        for step in 0..200 {
            let area = step as f64 * 0.37;
            let workers = required_workers(&r, area);
            assert!(workers >= last);
            assert!(f64::from(workers) >= r.worker_per_hectare * area);
            last = workers;
        }
    }

    #[test]
    fn doubling_area_doubles_amounts() {
        let r = profile(2.0);
        let area = 13.7;
        assert!(approx(seed_amount(&r, 2.0 * area), 2.0 * seed_amount(&r, area)));
        assert!(approx(
            fertilizer_amount(&r, 2.0 * area),
            2.0 * fertilizer_amount(&r, area)
        ));
        assert!(approx(
            estimate_yield(&r, 2.0 * area),
            2.0 * estimate_yield(&r, area)
        ));
    }

    #[test]
    fn fuel_sums_per_machine_results() {
        let machines = [machine(5.0, 0.0), machine(3.0, 0.0)];
        assert!(approx(estimate_fuel_consumption(&machines[0], 10.0), 50.0));
        assert!(approx(estimate_fuel_consumption(&machines[1], 10.0), 30.0));
        assert!(approx(total_fuel_consumption(&machines, 10.0), 80.0));
        assert!(approx(total_fuel_consumption(&[], 10.0), 0.0));
    }

    #[test]
    fn work_duration_combines_machine_and_crew_hours() {
        let r = profile(2.0);
        let m = machine(0.0, 1.5);
        // 1.5 * 4 + 8 * 4 * 2
        assert!(approx(estimate_work_duration(4.0, 2, &m, &r), 70.0));
        // no crew: machine time only
        assert!(approx(estimate_work_duration(4.0, 0, &m, &r), 6.0));
    }

    #[test]
    fn work_duration_ceiling_applied_once() {
        let mut r = profile(0.0);
        r.worker_work_durality_per_hectare = 0.0;
        // each machine alone is 0.3 h; rounding per machine would give 3
        let machines = [machine(0.0, 0.3), machine(0.0, 0.3), machine(0.0, 0.3)];
        let total = total_work_duration(1.0, 0, &machines, &r);
        assert_eq!(total, 1);

        let unrounded: f64 = machines
            .iter()
            .map(|m| estimate_work_duration(1.0, 0, m, &r))
            .sum();
        assert!(f64::from(total) >= unrounded);
    }

    #[test]
    fn zero_area_yields_zero() {
        let r = profile(2.0);
        let machines = [machine(5.0, 2.0)];
        let est = estimate(&r, 0.0, &machines);
        assert_eq!(est.required_workers, 0);
        assert_eq!(est.seed_amount, 0.0);
        assert_eq!(est.fertilizer_amount, 0.0);
        assert_eq!(est.estimated_yield, 0.0);
        assert_eq!(est.total_fuel_needed, 0.0);
        assert_eq!(est.total_work_duration, 0);
        // machinery does not scale with area
        assert_eq!(est.required_machines, 3);
    }

    #[test]
    fn negative_products_saturate_to_zero() {
        let r = profile(-2.0);
        assert_eq!(required_workers(&r, 3.0), 0);
        assert!(approx(seed_amount(&profile(2.0), -1.0), -150.0));
    }

    #[test]
    fn estimate_collects_all_figures() {
        let r = profile(2.0);
        let machines = [machine(5.0, 0.5), machine(3.0, 0.25)];
        let est = estimate(&r, 10.0, &machines);

        assert_eq!(est.required_workers, 20);
        assert_eq!(est.required_machines, 3);
        assert!(approx(est.total_fuel_needed, 80.0));
        // (0.5*10 + 8*10*20) + (0.25*10 + 8*10*20) = 3207.5
        assert_eq!(est.total_work_duration, 3208);
    }

    #[test]
    fn machine_profile_from_machine() {
        let m = crate::models::Machine::new(crate::models::MachineType::Tractor, 1)
            .with_fuel_consumption(12.0)
            .with_work_durality(0.8);
        let p = MachineProfile::from(&m);
        assert_eq!(p.fuel_consumption_rate, 12.0);
        assert_eq!(p.work_durality_per_hectare, 0.8);
    }
}
