use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MachineType {
    Tractor,
    Harvester,
    Plow,
    Seeder,
    Sprayer,
}

impl MachineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineType::Tractor => "Tractor",
            MachineType::Harvester => "Harvester",
            MachineType::Plow => "Plow",
            MachineType::Seeder => "Seeder",
            MachineType::Sprayer => "Sprayer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tractor" => Some(MachineType::Tractor),
            "harvester" | "combine" => Some(MachineType::Harvester),
            "plow" | "plough" => Some(MachineType::Plow),
            "seeder" | "planter" => Some(MachineType::Seeder),
            "sprayer" => Some(MachineType::Sprayer),
            _ => None,
        }
    }

    pub fn all() -> &'static [MachineType] {
        &[
            MachineType::Tractor,
            MachineType::Harvester,
            MachineType::Plow,
            MachineType::Seeder,
            MachineType::Sprayer,
        ]
    }
}

impl<'de> Deserialize<'de> for MachineType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        super::deserialize_by_name(deserializer, Self::from_str, Self::all(), Self::as_str)
    }
}

impl std::fmt::Display for MachineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    /// Fuel burned per hectare worked.
    pub fuel_consumption: f64,
    pub is_available: bool,
    /// Machine hours per hectare.
    pub work_durality_per_hectare: f64,
    pub field_id: Option<i64>,
    pub resource_id: i64,
}

impl Machine {
    pub fn new(machine_type: MachineType, resource_id: i64) -> Self {
        Self {
            id: None,
            machine_type,
            fuel_consumption: 0.0,
            is_available: true,
            work_durality_per_hectare: 0.0,
            field_id: None,
            resource_id,
        }
    }

    pub fn with_fuel_consumption(mut self, per_hectare: f64) -> Self {
        self.fuel_consumption = per_hectare;
        self
    }

    pub fn with_work_durality(mut self, hours_per_hectare: f64) -> Self {
        self.work_durality_per_hectare = hours_per_hectare;
        self
    }

    pub fn assigned_to(mut self, field_id: i64) -> Self {
        self.field_id = Some(field_id);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.is_available = false;
        self
    }
}
