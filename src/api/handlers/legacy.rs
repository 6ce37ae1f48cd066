//! Un-versioned `/api/resource/*` routes kept for older clients. Writes
//! answer 200 with the stored resource instead of 201/204.

use super::resources;
use crate::api::dto::{ResourceRequest, ResourceResponse};
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::AppState;
use crate::error::Result;
use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, post},
    Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/index", get(index))
        .route("/details/{id}", get(details))
        .route("/create", post(create))
        .route("/edit/{id}", post(edit))
        .route("/delete/{id}", delete(remove))
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<ResourceResponse>>> {
    Ok(Json(state.run(resources::load_all).await?))
}

async fn details(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ResourceResponse>> {
    Ok(Json(state.run(move |db| resources::load_one(db, id)).await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ResourceRequest>,
) -> Result<Json<ResourceResponse>> {
    Ok(Json(state.run(move |db| resources::insert(db, request)).await?))
}

async fn edit(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<ResourceRequest>,
) -> Result<Json<ResourceResponse>> {
    Ok(Json(
        state
            .run(move |db| resources::replace(db, id, request))
            .await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ResourceResponse>> {
    let removed = state
        .run(move |db| {
            let existing = resources::load_one(db, id)?;
            db.delete_resource(id)?;
            Ok(existing)
        })
        .await?;
    Ok(Json(removed))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn legacy_resource_routes_answer_ok() {
        let (app, _) = app();
        let body = json!({
            "cultureType": "Cotton",
            "seedPerHectare": 15.0,
            "fertilizerPerHectare": 90.0,
            "workerPerHectare": 4.0,
            "workerWorkDuralityPerHectare": 2.0,
            "yield": 2500.0
        });

        let (status, _, created) = send(&app, "POST", "/api/resource/create", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_i64().unwrap();

        let mut edited = body;
        edited["yield"] = json!(2700.0);
        let (status, _, updated) = send(
            &app,
            "POST",
            &format!("/api/resource/edit/{}", id),
            Some(edited),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["yield"], 2700.0);

        let (status, _, list) = send(&app, "GET", "/api/resource/index", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, _, removed) =
            send(&app, "DELETE", &format!("/api/resource/delete/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removed["cultureType"], "Cotton");

        let (status, _, _) =
            send(&app, "GET", &format!("/api/resource/details/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
