use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub hourly_rate: f64,
    pub is_active: bool,
    pub hours_worked: f64,
    pub field_id: Option<i64>,
}

impl Worker {
    pub fn new(first_name: &str, last_name: &str, age: i32) -> Self {
        Self {
            id: None,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            age,
            hourly_rate: 0.0,
            is_active: true,
            hours_worked: 0.0,
            field_id: None,
        }
    }

    pub fn with_rate(mut self, hourly_rate: f64) -> Self {
        self.hourly_rate = hourly_rate;
        self
    }

    pub fn with_hours_worked(mut self, hours: f64) -> Self {
        self.hours_worked = hours;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn assigned_to(mut self, field_id: i64) -> Self {
        self.field_id = Some(field_id);
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
