use super::{created, group_by, not_found};
use crate::api::dto::{FieldRequest, FieldResponse, Validate, WorkerResponse};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::{ApiVersion, AppState};
use crate::db::Database;
use crate::error::Result;
use crate::logic::filters::{FieldFilter, PageRequest, PaginatedResult};
use crate::logic::{FieldDetails, FieldDetailsService};
use crate::models::{Field, Worker, WorkerTask};
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{Json, Response},
    routing::{delete, get, post},
    Router,
};

pub fn routes(version: ApiVersion) -> Router<AppState> {
    let router = Router::new()
        .route("/field/index", get(index))
        .route("/field/create", post(create))
        .route("/field/edit/{id}", post(edit))
        .route("/field/delete/{id}", delete(remove));

    match version {
        ApiVersion::V1 => router.route("/field/details/{id}", get(details)),
        ApiVersion::V2 => router
            .route("/field/details/{id}", get(details_with_estimates))
            .route("/field/filter", get(filter)),
    }
}

/// Attach workers (with their tasks) and tasks to each field.
fn with_relations(db: &Database, fields: Vec<Field>) -> Result<Vec<FieldResponse>> {
    let tasks = db.list_worker_tasks()?;
    let mut tasks_by_worker = group_by(tasks.clone(), |t: &WorkerTask| Some(t.worker_id));
    let mut tasks_by_field = group_by(tasks, |t: &WorkerTask| Some(t.field_id));
    let mut workers_by_field = group_by(db.list_workers()?, |w: &Worker| w.field_id);

    Ok(fields
        .into_iter()
        .map(|field| {
            let id = field.id.unwrap_or_default();
            let workers = workers_by_field
                .remove(&id)
                .unwrap_or_default()
                .into_iter()
                .map(|w| {
                    let worker_tasks = w
                        .id
                        .and_then(|wid| tasks_by_worker.remove(&wid))
                        .unwrap_or_default();
                    WorkerResponse::new(w, worker_tasks)
                })
                .collect();
            let tasks = tasks_by_field.remove(&id).unwrap_or_default();
            FieldResponse::new(field, workers, tasks)
        })
        .collect())
}

fn load_one(db: &Database, id: i64) -> Result<FieldResponse> {
    let field = db.get_field(id)?.ok_or_else(|| not_found("Field", id))?;
    let workers = db
        .workers_for_field(id)?
        .into_iter()
        .map(|w| {
            let tasks = match w.id {
                Some(wid) => db.tasks_for_worker(wid)?,
                None => Vec::new(),
            };
            Ok(WorkerResponse::new(w, tasks))
        })
        .collect::<Result<Vec<_>>>()?;
    let tasks = db.tasks_for_field(id)?;
    Ok(FieldResponse::new(field, workers, tasks))
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<FieldResponse>>> {
    let fields = state
        .run(|db| {
            let fields = db.list_fields()?;
            with_relations(db, fields)
        })
        .await?;
    Ok(Json(fields))
}

async fn details(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<FieldResponse>> {
    Ok(Json(state.run(move |db| load_one(db, id)).await?))
}

async fn details_with_estimates(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<FieldDetails>> {
    let details = state
        .run(move |db| FieldDetailsService::new(db.clone()).details(id))
        .await?;
    Ok(Json(details))
}

async fn create(
    State(state): State<AppState>,
    uri: OriginalUri,
    ApiJson(request): ApiJson<FieldRequest>,
) -> Result<Response> {
    request.validate()?;
    let field = request.into_field();
    let response = state
        .run(move |db| {
            let id = db.create_field(&field)?;
            tracing::info!(field_id = id, culture = %field.culture, "Created field");
            load_one(db, id)
        })
        .await?;

    let base = uri.0.path().trim_end_matches('/').trim_end_matches("/create");
    let location = format!("{}/details/{}", base, response.id);
    Ok(created(location, response))
}

async fn edit(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<FieldRequest>,
) -> Result<Json<FieldResponse>> {
    request.validate()?;
    let response = state
        .run(move |db| {
            let existing = db.get_field(id)?.ok_or_else(|| not_found("Field", id))?;
            let mut field = request.into_field().with_created_at(existing.created_at);
            field.id = Some(id);
            db.update_field(&field)?;
            load_one(db, id)
        })
        .await?;
    Ok(Json(response))
}

async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<StatusCode> {
    state.run(move |db| db.delete_field(id)).await?;
    tracing::info!(field_id = id, "Deleted field");
    Ok(StatusCode::NO_CONTENT)
}

async fn filter(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<FieldFilter>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<PaginatedResult<Field>>> {
    let fields = state.run(|db| db.list_fields()).await?;
    Ok(Json(state.page(fields, &filter, page)))
}
