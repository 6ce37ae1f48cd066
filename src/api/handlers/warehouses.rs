use super::{created, group_by, member_location, not_found};
use crate::api::dto::{Validate, WarehouseRequest, WarehouseResponse};
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::AppState;
use crate::db::Database;
use crate::error::Result;
use crate::models::InventoryItem;
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{Json, Response},
    routing::get,
    Router,
};

/// Warehouses have no filter route in either version.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/warehouses", get(index).post(create))
        .route("/warehouses/{id}", get(show).put(update).delete(remove))
}

fn load_one(db: &Database, id: i64) -> Result<WarehouseResponse> {
    let warehouse = db.get_warehouse(id)?.ok_or_else(|| not_found("Warehouse", id))?;
    let items = db.items_for_warehouse(id)?;
    Ok(WarehouseResponse::new(warehouse, items))
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<WarehouseResponse>>> {
    let warehouses = state
        .run(|db| {
            let mut items = group_by(db.list_inventory_items()?, |i: &InventoryItem| {
                Some(i.warehouse_id)
            });
            Ok(db
                .list_warehouses()?
                .into_iter()
                .map(|w| {
                    let stored = w.id.and_then(|id| items.remove(&id)).unwrap_or_default();
                    WarehouseResponse::new(w, stored)
                })
                .collect::<Vec<_>>())
        })
        .await?;
    Ok(Json(warehouses))
}

async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<WarehouseResponse>> {
    Ok(Json(state.run(move |db| load_one(db, id)).await?))
}

async fn create(
    State(state): State<AppState>,
    uri: OriginalUri,
    ApiJson(request): ApiJson<WarehouseRequest>,
) -> Result<Response> {
    request.validate()?;
    let warehouse = request.into_warehouse();
    let response = state
        .run(move |db| {
            let id = db.create_warehouse(&warehouse)?;
            load_one(db, id)
        })
        .await?;
    Ok(created(member_location(&uri, response.id), response))
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<WarehouseRequest>,
) -> Result<Json<WarehouseResponse>> {
    request.validate()?;
    let mut warehouse = request.into_warehouse();
    warehouse.id = Some(id);
    let response = state
        .run(move |db| {
            db.update_warehouse(&warehouse)?;
            load_one(db, id)
        })
        .await?;
    Ok(Json(response))
}

async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<StatusCode> {
    state.run(move |db| db.delete_warehouse(id)).await?;
    tracing::info!(warehouse_id = id, "Deleted warehouse and its inventory");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, send};
    use crate::models::InventoryItem;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn warehouse_lists_its_items_and_cascades() {
        let (app, db) = app();
        let (status, headers, body) = send(
            &app,
            "POST",
            "/api/v1/warehouses",
            Some(json!({"name": "North Barn"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_i64().unwrap();
        assert_eq!(headers["location"], format!("/api/v1/warehouses/{}", id).as_str());

        db.create_inventory_item(&InventoryItem::new(id, "Seeds", 40, "kg"))
            .unwrap();
        db.create_inventory_item(&InventoryItem::new(id, "Fuel", 300, "liters"))
            .unwrap();

        let (_, _, body) = send(&app, "GET", &format!("/api/v1/warehouses/{}", id), None).await;
        assert_eq!(body["inventoryItems"].as_array().unwrap().len(), 2);

        let (_, _, all) = send(&app, "GET", "/api/v1/warehouses", None).await;
        assert_eq!(all[0]["name"], "North Barn");
        assert_eq!(all[0]["inventoryItems"][1]["unit"], "liters");

        let (status, _, _) =
            send(&app, "DELETE", &format!("/api/v1/warehouses/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(db.list_inventory_items().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unnamed_warehouse_and_rename() {
        let (app, _) = app();
        let (status, _, body) = send(&app, "POST", "/api/v2/warehouses", Some(json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["name"].is_null());
        let id = body["id"].as_i64().unwrap();

        let (status, _, body) = send(
            &app,
            "PUT",
            &format!("/api/v2/warehouses/{}", id),
            Some(json!({"name": "Depot"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Depot");
    }

    #[tokio::test]
    async fn warehouses_have_no_filter() {
        let (app, _) = app();
        let (status, _, _) = send(&app, "GET", "/api/v2/warehouses/filter", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
