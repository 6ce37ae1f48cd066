use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl Warehouse {
    pub fn new(name: Option<String>) -> Self {
        Self { id: None, name }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Option<i64>,
    pub warehouse_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
}

impl InventoryItem {
    pub fn new(warehouse_id: i64, name: &str, quantity: i64, unit: &str) -> Self {
        Self {
            id: None,
            warehouse_id,
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
        }
    }
}
