pub mod fields;
pub mod inventory_items;
pub mod legacy;
pub mod machines;
pub mod resources;
pub mod warehouses;
pub mod worker_tasks;
pub mod workers;

use crate::error::AgroError;
use axum::{
    extract::OriginalUri,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::collections::HashMap;

fn not_found(entity: &str, id: i64) -> AgroError {
    AgroError::NotFound(format!("{} {} not found", entity, id))
}

/// `<collection path>/<id>` for the request that created the row.
fn member_location(uri: &OriginalUri, id: i64) -> String {
    format!("{}/{}", uri.0.path().trim_end_matches('/'), id)
}

fn created<T: Serialize>(location: String, body: T) -> Response {
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response()
}

/// Bucket rows by a parent key, keeping their order.
fn group_by<T>(rows: Vec<T>, key: impl Fn(&T) -> Option<i64>) -> HashMap<i64, Vec<T>> {
    let mut groups: HashMap<i64, Vec<T>> = HashMap::new();
    for row in rows {
        if let Some(k) = key(&row) {
            groups.entry(k).or_default().push(row);
        }
    }
    groups
}
