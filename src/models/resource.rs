use super::CultureType;
use serde::{Deserialize, Serialize};

/// Per-hectare agronomic coefficients for one crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Option<i64>,
    pub culture_type: CultureType,
    pub seed_per_hectare: f64,
    pub fertilizer_per_hectare: f64,
    pub worker_per_hectare: f64,
    /// Labor hours per hectare.
    pub worker_work_durality_per_hectare: f64,
    pub yield_per_hectare: f64,
}

impl Resource {
    pub fn new(culture_type: CultureType) -> Self {
        Self {
            id: None,
            culture_type,
            seed_per_hectare: 0.0,
            fertilizer_per_hectare: 0.0,
            worker_per_hectare: 0.0,
            worker_work_durality_per_hectare: 0.0,
            yield_per_hectare: 0.0,
        }
    }

    pub fn with_seed(mut self, per_hectare: f64) -> Self {
        self.seed_per_hectare = per_hectare;
        self
    }

    pub fn with_fertilizer(mut self, per_hectare: f64) -> Self {
        self.fertilizer_per_hectare = per_hectare;
        self
    }

    pub fn with_workers(mut self, per_hectare: f64, hours_per_hectare: f64) -> Self {
        self.worker_per_hectare = per_hectare;
        self.worker_work_durality_per_hectare = hours_per_hectare;
        self
    }

    pub fn with_yield(mut self, per_hectare: f64) -> Self {
        self.yield_per_hectare = per_hectare;
        self
    }
}
