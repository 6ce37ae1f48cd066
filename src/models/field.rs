use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CultureType {
    Wheat,
    Corn,
    Soybean,
    Rice,
    Cotton,
}

impl CultureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CultureType::Wheat => "Wheat",
            CultureType::Corn => "Corn",
            CultureType::Soybean => "Soybean",
            CultureType::Rice => "Rice",
            CultureType::Cotton => "Cotton",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "wheat" => Some(CultureType::Wheat),
            "corn" | "maize" => Some(CultureType::Corn),
            "soybean" | "soy" | "soybeans" => Some(CultureType::Soybean),
            "rice" => Some(CultureType::Rice),
            "cotton" => Some(CultureType::Cotton),
            _ => None,
        }
    }

    pub fn all() -> &'static [CultureType] {
        &[
            CultureType::Wheat,
            CultureType::Corn,
            CultureType::Soybean,
            CultureType::Rice,
            CultureType::Cotton,
        ]
    }
}

impl<'de> Deserialize<'de> for CultureType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        super::deserialize_by_name(deserializer, Self::from_str, Self::all(), Self::as_str)
    }
}

impl std::fmt::Display for CultureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldStatus {
    Planted,
    Harvested,
    Fallow,
}

impl FieldStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldStatus::Planted => "Planted",
            FieldStatus::Harvested => "Harvested",
            FieldStatus::Fallow => "Fallow",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "planted" => Some(FieldStatus::Planted),
            "harvested" => Some(FieldStatus::Harvested),
            "fallow" => Some(FieldStatus::Fallow),
            _ => None,
        }
    }

    pub fn all() -> &'static [FieldStatus] {
        &[
            FieldStatus::Planted,
            FieldStatus::Harvested,
            FieldStatus::Fallow,
        ]
    }
}

impl<'de> Deserialize<'de> for FieldStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        super::deserialize_by_name(deserializer, Self::from_str, Self::all(), Self::as_str)
    }
}

impl std::fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cultivated plot. `area` is in hectares.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: Option<i64>,
    pub area: f64,
    pub culture: CultureType,
    pub status: FieldStatus,
    pub created_at: DateTime<Utc>,
}

impl Field {
    pub fn new(area: f64, culture: CultureType) -> Self {
        Self {
            id: None,
            area,
            culture,
            status: FieldStatus::Fallow,
            created_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: FieldStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
