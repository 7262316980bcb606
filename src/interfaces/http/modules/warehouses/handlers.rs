//! Warehouse management handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use super::dto::{CreateWarehouseRequest, UpdateWarehouseRequest, WarehouseDto, WarehouseStatsDto};
use crate::application::services::{ReceptionService, WarehouseService};
use crate::domain::truck::TruckOrder;
use crate::domain::DomainError;
use crate::interfaces::http::common::{
    domain_error, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::trucks::{ListTrucksParams, RegisterTruckRequest, TruckDto};

/// Warehouse handler state
#[derive(Clone)]
pub struct WarehouseHandlerState {
    pub warehouses: Arc<WarehouseService>,
    pub reception: Arc<ReceptionService>,
}

fn scope_check<T>(
    user: &AuthenticatedUser,
    entrepot_id: Uuid,
) -> Result<(), (StatusCode, Json<ApiResponse<T>>)> {
    if user.can_access_warehouse(entrepot_id) {
        Ok(())
    } else {
        Err(domain_error(DomainError::Forbidden(
            "warehouse is outside your scope".to_string(),
        )))
    }
}

fn require_admin<T>(user: &AuthenticatedUser) -> Result<(), (StatusCode, Json<ApiResponse<T>>)> {
    if user.is_admin() {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin role required")),
        ))
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/warehouses",
    tag = "Warehouses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Warehouse list", body = ApiResponse<Vec<WarehouseDto>>)
    )
)]
pub async fn list_warehouses(
    State(state): State<WarehouseHandlerState>,
) -> Result<Json<ApiResponse<Vec<WarehouseDto>>>, (StatusCode, Json<ApiResponse<Vec<WarehouseDto>>>)>
{
    let warehouses = state.warehouses.list().await.map_err(domain_error)?;
    let items = warehouses.into_iter().map(WarehouseDto::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/warehouses",
    tag = "Warehouses",
    security(("bearer_auth" = [])),
    request_body = CreateWarehouseRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<WarehouseDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_warehouse(
    State(state): State<WarehouseHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WarehouseDto>>), (StatusCode, Json<ApiResponse<WarehouseDto>>)>
{
    require_admin(&user)?;

    let warehouse = state
        .warehouses
        .create(&request.name, &request.location, request.image_url)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(WarehouseDto::from(warehouse))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{id}",
    tag = "Warehouses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Warehouse id")),
    responses(
        (status = 200, description = "Warehouse details", body = ApiResponse<WarehouseDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_warehouse(
    State(state): State<WarehouseHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WarehouseDto>>, (StatusCode, Json<ApiResponse<WarehouseDto>>)> {
    let warehouse = state.warehouses.get(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(WarehouseDto::from(warehouse))))
}

#[utoipa::path(
    put,
    path = "/api/v1/warehouses/{id}",
    tag = "Warehouses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Warehouse id")),
    request_body = UpdateWarehouseRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<WarehouseDto>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_warehouse(
    State(state): State<WarehouseHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateWarehouseRequest>,
) -> Result<Json<ApiResponse<WarehouseDto>>, (StatusCode, Json<ApiResponse<WarehouseDto>>)> {
    require_admin(&user)?;

    let warehouse = state
        .warehouses
        .update(id, request.name, request.location, request.image_url)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(WarehouseDto::from(warehouse))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/warehouses/{id}",
    tag = "Warehouses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Warehouse id")),
    responses(
        (status = 200, description = "Deleted, trucks cascade-removed"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_warehouse(
    State(state): State<WarehouseHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<u64>>, (StatusCode, Json<ApiResponse<u64>>)> {
    require_admin(&user)?;

    let removed = state.warehouses.delete(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(removed)))
}

#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{id}/stats",
    tag = "Warehouses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Warehouse id")),
    responses(
        (status = 200, description = "Dashboard counters", body = ApiResponse<WarehouseStatsDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn warehouse_stats(
    State(state): State<WarehouseHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WarehouseStatsDto>>, (StatusCode, Json<ApiResponse<WarehouseStatsDto>>)>
{
    scope_check(&user, id)?;
    let stats = state.warehouses.stats(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(WarehouseStatsDto::from(stats))))
}

#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{id}/trucks",
    tag = "Warehouses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Warehouse id"), ListTrucksParams),
    responses(
        (status = 200, description = "Filtered trucks of the warehouse", body = PaginatedResponse<TruckDto>)
    )
)]
pub async fn list_warehouse_trucks(
    State(state): State<WarehouseHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Query(params): Query<ListTrucksParams>,
) -> Result<Json<PaginatedResponse<TruckDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    scope_check(&user, id)?;
    // the warehouse must exist, an empty page for a bad id is misleading
    state.warehouses.get(id).await.map_err(domain_error)?;

    let query = params.to_query(TruckOrder::Insertion);
    let trucks = state
        .reception
        .list_for_warehouse(id, &query)
        .await
        .map_err(domain_error)?;

    let items: Vec<TruckDto> = trucks.into_iter().map(TruckDto::from).collect();
    Ok(Json(PaginatedResponse::paginate(
        items,
        &PaginationParams {
            page: params.page,
            page_size: params.page_size,
        },
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/warehouses/{id}/trucks",
    tag = "Warehouses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Warehouse id")),
    request_body = RegisterTruckRequest,
    responses(
        (status = 201, description = "Truck registered", body = ApiResponse<TruckDto>),
        (status = 404, description = "Unknown warehouse")
    )
)]
pub async fn register_truck(
    State(state): State<WarehouseHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<RegisterTruckRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TruckDto>>), (StatusCode, Json<ApiResponse<TruckDto>>)> {
    scope_check(&user, id)?;

    let reception = request.reception();
    let truck = state
        .reception
        .register_truck(
            id,
            crate::domain::TruckRegistration {
                immatriculation: request.immatriculation,
                transporteur: request.transporteur,
                transfert: request.transfert,
                cooperative: request.cooperative,
            },
            reception,
        )
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TruckDto::from(truck))),
    ))
}
