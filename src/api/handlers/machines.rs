use super::{created, member_location, not_found};
use crate::api::dto::{MachineRequest, Validate};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::{ApiVersion, AppState};
use crate::error::Result;
use crate::logic::filters::{MachineFilter, PageRequest, PaginatedResult};
use crate::models::Machine;
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{Json, Response},
    routing::get,
    Router,
};

pub fn routes(version: ApiVersion) -> Router<AppState> {
    let router = Router::new()
        .route("/machines", get(index).post(create))
        .route("/machines/{id}", get(show).put(update).delete(remove));

    match version {
        ApiVersion::V1 => router,
        ApiVersion::V2 => router.route("/machines/filter", get(filter)),
    }
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<Machine>>> {
    Ok(Json(state.run(|db| db.list_machines()).await?))
}

async fn show(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<Json<Machine>> {
    let machine = state
        .run(move |db| db.get_machine(id)?.ok_or_else(|| not_found("Machine", id)))
        .await?;
    Ok(Json(machine))
}

async fn create(
    State(state): State<AppState>,
    uri: OriginalUri,
    ApiJson(request): ApiJson<MachineRequest>,
) -> Result<Response> {
    request.validate()?;
    let mut machine = request.into_machine();
    let machine = state
        .run(move |db| {
            let id = db.create_machine(&machine)?;
            machine.id = Some(id);
            Ok(machine)
        })
        .await?;

    let id = machine.id.unwrap_or_default();
    tracing::info!(machine_id = id, machine_type = %machine.machine_type, "Created machine");
    Ok(created(member_location(&uri, id), machine))
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<MachineRequest>,
) -> Result<Json<Machine>> {
    request.validate()?;
    let mut machine = request.into_machine();
    machine.id = Some(id);
    let machine = state
        .run(move |db| {
            db.update_machine(&machine)?;
            Ok(machine)
        })
        .await?;
    Ok(Json(machine))
}

async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<StatusCode> {
    state.run(move |db| db.delete_machine(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn filter(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<MachineFilter>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<PaginatedResult<Machine>>> {
    let machines = state.run(|db| db.list_machines()).await?;
    Ok(Json(state.page(machines, &filter, page)))
}
