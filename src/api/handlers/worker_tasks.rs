use super::{created, member_location, not_found};
use crate::api::dto::{Validate, WorkerTaskRequest};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::{ApiVersion, AppState};
use crate::error::Result;
use crate::logic::filters::{PageRequest, PaginatedResult, WorkerTaskFilter};
use crate::models::WorkerTask;
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{Json, Response},
    routing::get,
    Router,
};

pub fn routes(version: ApiVersion) -> Router<AppState> {
    let router = Router::new()
        .route("/workertasks", get(index).post(create))
        .route("/workertasks/{id}", get(show).put(update).delete(remove));

    match version {
        ApiVersion::V1 => router,
        ApiVersion::V2 => router.route("/workertasks/filter", get(filter)),
    }
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<WorkerTask>>> {
    Ok(Json(state.run(|db| db.list_worker_tasks()).await?))
}

async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<WorkerTask>> {
    let task = state
        .run(move |db| db.get_worker_task(id)?.ok_or_else(|| not_found("Task", id)))
        .await?;
    Ok(Json(task))
}

async fn create(
    State(state): State<AppState>,
    uri: OriginalUri,
    ApiJson(request): ApiJson<WorkerTaskRequest>,
) -> Result<Response> {
    request.validate()?;
    let mut task = request.into_task();
    let task = state
        .run(move |db| {
            task.id = Some(db.create_worker_task(&task)?);
            Ok(task)
        })
        .await?;

    let id = task.id.unwrap_or_default();
    tracing::info!(
        task_id = id,
        worker_id = task.worker_id,
        field_id = task.field_id,
        "Created worker task"
    );
    Ok(created(member_location(&uri, id), task))
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<WorkerTaskRequest>,
) -> Result<Json<WorkerTask>> {
    request.validate()?;
    let mut task = request.into_task();
    task.id = Some(id);
    let task = state
        .run(move |db| {
            db.update_worker_task(&task)?;
            Ok(task)
        })
        .await?;
    Ok(Json(task))
}

async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<StatusCode> {
    state.run(move |db| db.delete_worker_task(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn filter(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<WorkerTaskFilter>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<PaginatedResult<WorkerTask>>> {
    let tasks = state.run(|db| db.list_worker_tasks()).await?;
    Ok(Json(state.page(tasks, &filter, page)))
}
