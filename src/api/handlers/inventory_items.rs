use super::{created, member_location, not_found};
use crate::api::dto::{InventoryItemRequest, Validate};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::{ApiVersion, AppState};
use crate::error::Result;
use crate::logic::filters::{InventoryItemFilter, PageRequest, PaginatedResult};
use crate::models::InventoryItem;
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{Json, Response},
    routing::get,
    Router,
};

pub fn routes(version: ApiVersion) -> Router<AppState> {
    let router = Router::new()
        .route("/inventoryitems", get(index).post(create))
        .route("/inventoryitems/{id}", get(show).put(update).delete(remove));

    match version {
        ApiVersion::V1 => router,
        ApiVersion::V2 => router.route("/inventoryitems/filter", get(filter)),
    }
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<InventoryItem>>> {
    Ok(Json(state.run(|db| db.list_inventory_items()).await?))
}

async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<InventoryItem>> {
    let item = state
        .run(move |db| {
            db.get_inventory_item(id)?
                .ok_or_else(|| not_found("Inventory item", id))
        })
        .await?;
    Ok(Json(item))
}

async fn create(
    State(state): State<AppState>,
    uri: OriginalUri,
    ApiJson(request): ApiJson<InventoryItemRequest>,
) -> Result<Response> {
    request.validate()?;
    let mut item = request.into_item();
    let item = state
        .run(move |db| {
            item.id = Some(db.create_inventory_item(&item)?);
            Ok(item)
        })
        .await?;
    let id = item.id.unwrap_or_default();
    Ok(created(member_location(&uri, id), item))
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<InventoryItemRequest>,
) -> Result<Json<InventoryItem>> {
    request.validate()?;
    let mut item = request.into_item();
    item.id = Some(id);
    let item = state
        .run(move |db| {
            db.update_inventory_item(&item)?;
            Ok(item)
        })
        .await?;
    Ok(Json(item))
}

async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<StatusCode> {
    state.run(move |db| db.delete_inventory_item(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn filter(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<InventoryItemFilter>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<PaginatedResult<InventoryItem>>> {
    let items = state.run(|db| db.list_inventory_items()).await?;
    Ok(Json(state.page(items, &filter, page)))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, send};
    use crate::models::{InventoryItem, Warehouse};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn item_lifecycle() {
        let (app, db) = app();
        let warehouse_id = db
            .create_warehouse(&Warehouse::new(Some("Main".into())))
            .unwrap();

        let (status, headers, body) = send(
            &app,
            "POST",
            "/api/v1/inventoryitems",
            Some(json!({"warehouseId": warehouse_id, "name": "Fertilizer", "quantity": 12, "unit": "bags"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_i64().unwrap();
        assert_eq!(headers["location"], format!("/api/v1/inventoryitems/{}", id).as_str());

        let (status, _, body) = send(
            &app,
            "PUT",
            &format!("/api/v1/inventoryitems/{}", id),
            Some(json!({"warehouseId": warehouse_id, "name": "Fertilizer", "quantity": 7, "unit": "bags"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quantity"], 7);

        let (status, _, _) =
            send(&app, "DELETE", &format!("/api/v1/inventoryitems/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _, _) =
            send(&app, "GET", &format!("/api/v1/inventoryitems/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn item_needs_existing_warehouse_and_quantity() {
        let (app, _) = app();
        let (status, _, _) = send(
            &app,
            "POST",
            "/api/v1/inventoryitems",
            Some(json!({"warehouseId": 9, "name": "Seeds", "quantity": 1, "unit": "kg"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, body) = send(
            &app,
            "POST",
            "/api/v1/inventoryitems",
            Some(json!({"warehouseId": 9, "name": "Seeds", "quantity": -1, "unit": "kg"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "quantity must not be negative");
    }

    #[tokio::test]
    async fn filter_by_name_substring() {
        let (app, db) = app();
        let warehouse_id = db.create_warehouse(&Warehouse::new(None)).unwrap();
        for (name, qty) in [("Wheat Seeds", 10), ("Corn Seeds", 50), ("Diesel", 400)] {
            db.create_inventory_item(&InventoryItem::new(warehouse_id, name, qty, "kg"))
                .unwrap();
        }

        let (status, _, body) = send(
            &app,
            "GET",
            "/api/v2/inventoryitems/filter?name=seeds&minQuantity=20",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCount"], 1);
        assert_eq!(body["items"][0]["name"], "Corn Seeds");
    }
}
