use super::{created, group_by, member_location, not_found};
use crate::api::dto::{Validate, WorkerRequest, WorkerResponse};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::{ApiVersion, AppState};
use crate::db::Database;
use crate::error::Result;
use crate::logic::filters::{PageRequest, PaginatedResult, WorkerFilter};
use crate::models::{Worker, WorkerTask};
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{Json, Response},
    routing::get,
    Router,
};

pub fn routes(version: ApiVersion) -> Router<AppState> {
    let router = Router::new()
        .route("/workers", get(index).post(create))
        .route("/workers/{id}", get(show).put(update).delete(remove));

    match version {
        ApiVersion::V1 => router,
        ApiVersion::V2 => router.route("/workers/filter", get(filter)),
    }
}

fn load_one(db: &Database, id: i64) -> Result<WorkerResponse> {
    let worker = db.get_worker(id)?.ok_or_else(|| not_found("Worker", id))?;
    let tasks = db.tasks_for_worker(id)?;
    Ok(WorkerResponse::new(worker, tasks))
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<WorkerResponse>>> {
    let workers = state
        .run(|db| {
            let mut tasks = group_by(db.list_worker_tasks()?, |t: &WorkerTask| Some(t.worker_id));
            Ok(db
                .list_workers()?
                .into_iter()
                .map(|w: Worker| {
                    let assigned = w.id.and_then(|id| tasks.remove(&id)).unwrap_or_default();
                    WorkerResponse::new(w, assigned)
                })
                .collect::<Vec<_>>())
        })
        .await?;
    Ok(Json(workers))
}

async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<WorkerResponse>> {
    Ok(Json(state.run(move |db| load_one(db, id)).await?))
}

async fn create(
    State(state): State<AppState>,
    uri: OriginalUri,
    ApiJson(request): ApiJson<WorkerRequest>,
) -> Result<Response> {
    request.validate()?;
    let worker = request.into_worker();
    let response = state
        .run(move |db| {
            let id = db.create_worker(&worker)?;
            tracing::info!(worker_id = id, name = %worker.full_name(), "Created worker");
            load_one(db, id)
        })
        .await?;
    Ok(created(member_location(&uri, response.id), response))
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<WorkerRequest>,
) -> Result<Json<WorkerResponse>> {
    request.validate()?;
    let mut worker = request.into_worker();
    worker.id = Some(id);
    let response = state
        .run(move |db| {
            db.update_worker(&worker)?;
            load_one(db, id)
        })
        .await?;
    Ok(Json(response))
}

async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<StatusCode> {
    state.run(move |db| db.delete_worker(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn filter(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<WorkerFilter>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<PaginatedResult<Worker>>> {
    let workers = state.run(|db| db.list_workers()).await?;
    Ok(Json(state.page(workers, &filter, page)))
}
