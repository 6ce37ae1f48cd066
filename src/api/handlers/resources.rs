use super::{created, group_by, member_location, not_found};
use crate::api::dto::{ResourceRequest, ResourceResponse, Validate};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::{ApiVersion, AppState};
use crate::db::Database;
use crate::error::Result;
use crate::logic::filters::{PageRequest, PaginatedResult, ResourceFilter};
use crate::models::{Machine, Resource};
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{Json, Response},
    routing::get,
    Router,
};

pub fn routes(version: ApiVersion) -> Router<AppState> {
    let router = Router::new()
        .route("/resources", get(index).post(create))
        .route("/resources/{id}", get(show).put(update).delete(remove));

    match version {
        ApiVersion::V1 => router,
        ApiVersion::V2 => router.route("/resources/filter", get(filter)),
    }
}

// Store work shared with the legacy `/api/resource` routes.

pub(super) fn with_machines(db: &Database, resources: Vec<Resource>) -> Result<Vec<ResourceResponse>> {
    let mut machines = group_by(db.list_machines()?, |m: &Machine| Some(m.resource_id));
    Ok(resources
        .into_iter()
        .map(|r| {
            let required = r.id.and_then(|id| machines.remove(&id)).unwrap_or_default();
            ResourceResponse::new(r, required)
        })
        .collect())
}

pub(super) fn load_all(db: &Database) -> Result<Vec<ResourceResponse>> {
    let resources = db.list_resources()?;
    with_machines(db, resources)
}

pub(super) fn load_one(db: &Database, id: i64) -> Result<ResourceResponse> {
    let resource = db.get_resource(id)?.ok_or_else(|| not_found("Resource", id))?;
    let machines = db.machines_for_resource(id)?;
    Ok(ResourceResponse::new(resource, machines))
}

pub(super) fn insert(db: &Database, request: ResourceRequest) -> Result<ResourceResponse> {
    request.validate()?;
    let resource = request.into_resource();
    let id = db.create_resource(&resource)?;
    tracing::info!(resource_id = id, culture = %resource.culture_type, "Created resource");
    load_one(db, id)
}

pub(super) fn replace(db: &Database, id: i64, request: ResourceRequest) -> Result<ResourceResponse> {
    request.validate()?;
    let mut resource = request.into_resource();
    resource.id = Some(id);
    db.update_resource(&resource)?;
    load_one(db, id)
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<ResourceResponse>>> {
    Ok(Json(state.run(load_all).await?))
}

async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ResourceResponse>> {
    Ok(Json(state.run(move |db| load_one(db, id)).await?))
}

async fn create(
    State(state): State<AppState>,
    uri: OriginalUri,
    ApiJson(request): ApiJson<ResourceRequest>,
) -> Result<Response> {
    let response = state.run(move |db| insert(db, request)).await?;
    Ok(created(member_location(&uri, response.id), response))
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<ResourceRequest>,
) -> Result<Json<ResourceResponse>> {
    Ok(Json(state.run(move |db| replace(db, id, request)).await?))
}

async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<StatusCode> {
    state.run(move |db| db.delete_resource(id)).await?;
    tracing::info!(resource_id = id, "Deleted resource");
    Ok(StatusCode::NO_CONTENT)
}

async fn filter(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ResourceFilter>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<PaginatedResult<ResourceResponse>>> {
    let resources = state.run(|db| db.list_resources()).await?;
    let page = state.page(resources, &filter, page);
    let machines = state.run(|db| db.list_machines()).await?;
    let mut machines = group_by(machines, |m: &Machine| Some(m.resource_id));
    Ok(Json(page.map(|r| {
        let required = r.id.and_then(|id| machines.remove(&id)).unwrap_or_default();
        ResourceResponse::new(r, required)
    })))
}
