//! Truck workflow handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use super::dto::{
    AcceptTruckRequest, ListTrucksParams, RefuseTruckRequest, SubmitAnalysisRequest, TruckDto,
};
use crate::application::services::ReceptionService;
use crate::domain::truck::TruckOrder;
use crate::domain::{DomainError, DomainResult, Truck, TruckAction};
use crate::interfaces::http::common::{
    domain_error, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Truck handler state
#[derive(Clone)]
pub struct TruckHandlerState {
    pub reception: Arc<ReceptionService>,
}

type TruckResult = Result<Json<ApiResponse<TruckDto>>, (StatusCode, Json<ApiResponse<TruckDto>>)>;

/// Warehouse-bound accounts only see and touch their own trucks.
fn check_scope(user: &AuthenticatedUser, truck: &Truck) -> DomainResult<()> {
    if user.can_access_warehouse(truck.entrepot_id) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "truck belongs to another warehouse ({})",
            truck.entrepot_id
        )))
    }
}

async fn scoped_truck(
    state: &TruckHandlerState,
    user: &AuthenticatedUser,
    truck_id: Uuid,
) -> DomainResult<Truck> {
    let truck = state.reception.get_truck(truck_id).await?;
    check_scope(user, &truck)?;
    Ok(truck)
}

async fn run_action(
    state: &TruckHandlerState,
    user: &AuthenticatedUser,
    truck_id: Uuid,
    action: TruckAction,
) -> TruckResult {
    scoped_truck(state, user, truck_id)
        .await
        .map_err(domain_error)?;

    let truck = state
        .reception
        .apply_action(truck_id, action)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(TruckDto::from(truck))))
}

fn require_admin(user: &AuthenticatedUser) -> Result<(), (StatusCode, Json<ApiResponse<TruckDto>>)> {
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
    path = "/api/v1/trucks",
    tag = "Trucks",
    security(("bearer_auth" = [])),
    params(ListTrucksParams),
    responses(
        (status = 200, description = "Truck history view", body = PaginatedResponse<TruckDto>)
    )
)]
pub async fn list_trucks(
    State(state): State<TruckHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListTrucksParams>,
) -> Result<Json<PaginatedResponse<TruckDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    // bound accounts are forced onto their own warehouse
    let entrepot_id = match user.entrepot_id {
        Some(own) => Some(own),
        None => params.entrepot_id,
    };

    let query = params.to_query(TruckOrder::NewestFirst);
    let trucks = state
        .reception
        .list_trucks(entrepot_id, &query)
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
    get,
    path = "/api/v1/trucks/{id}",
    tag = "Trucks",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Truck id")),
    responses(
        (status = 200, description = "Truck details", body = ApiResponse<TruckDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_truck(
    State(state): State<TruckHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(truck_id): Path<Uuid>,
) -> TruckResult {
    let truck = scoped_truck(&state, &user, truck_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(TruckDto::from(truck))))
}

#[utoipa::path(
    post,
    path = "/api/v1/trucks/{id}/analysis",
    tag = "Trucks",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Truck id")),
    request_body = SubmitAnalysisRequest,
    responses(
        (status = 200, description = "Analysis recorded", body = ApiResponse<TruckDto>),
        (status = 409, description = "Invalid transition")
    )
)]
pub async fn submit_analysis(
    State(state): State<TruckHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(truck_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<SubmitAnalysisRequest>,
) -> TruckResult {
    run_action(
        &state,
        &user,
        truck_id,
        TruckAction::SubmitAnalysis {
            kor: request.kor,
            th: request.th,
        },
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v1/trucks/{id}/validate",
    tag = "Trucks",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Truck id")),
    responses(
        (status = 200, description = "Truck validated", body = ApiResponse<TruckDto>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Invalid transition")
    )
)]
pub async fn validate_truck(
    State(state): State<TruckHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(truck_id): Path<Uuid>,
) -> TruckResult {
    require_admin(&user)?;
    run_action(&state, &user, truck_id, TruckAction::Validate).await
}

#[utoipa::path(
    post,
    path = "/api/v1/trucks/{id}/refuse",
    tag = "Trucks",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Truck id")),
    request_body = RefuseTruckRequest,
    responses(
        (status = 200, description = "Truck refused", body = ApiResponse<TruckDto>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Invalid transition")
    )
)]
pub async fn refuse_truck(
    State(state): State<TruckHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(truck_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<RefuseTruckRequest>,
) -> TruckResult {
    require_admin(&user)?;
    run_action(
        &state,
        &user,
        truck_id,
        TruckAction::Refuse {
            comment: request.comment,
        },
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v1/trucks/{id}/resend",
    tag = "Trucks",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Truck id")),
    responses(
        (status = 200, description = "Truck resent for re-examination", body = ApiResponse<TruckDto>),
        (status = 409, description = "Invalid transition")
    )
)]
pub async fn resend_truck(
    State(state): State<TruckHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(truck_id): Path<Uuid>,
) -> TruckResult {
    run_action(&state, &user, truck_id, TruckAction::Resend).await
}

#[utoipa::path(
    post,
    path = "/api/v1/trucks/{id}/reintegrate",
    tag = "Trucks",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Truck id")),
    responses(
        (status = 200, description = "Truck back in the decision queue", body = ApiResponse<TruckDto>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Invalid transition")
    )
)]
pub async fn reintegrate_truck(
    State(state): State<TruckHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(truck_id): Path<Uuid>,
) -> TruckResult {
    require_admin(&user)?;
    run_action(&state, &user, truck_id, TruckAction::Reintegrate).await
}

#[utoipa::path(
    post,
    path = "/api/v1/trucks/{id}/accept",
    tag = "Trucks",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Truck id")),
    request_body = AcceptTruckRequest,
    responses(
        (status = 200, description = "Products recorded, acceptance finalized", body = ApiResponse<TruckDto>),
        (status = 409, description = "Invalid transition")
    )
)]
pub async fn accept_truck(
    State(state): State<TruckHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(truck_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AcceptTruckRequest>,
) -> TruckResult {
    run_action(
        &state,
        &user,
        truck_id,
        TruckAction::AcceptFinal {
            products: request.products(),
        },
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v1/trucks/{id}/discharge",
    tag = "Trucks",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Truck id")),
    responses(
        (status = 200, description = "Unloading finished", body = ApiResponse<TruckDto>),
        (status = 409, description = "Invalid transition")
    )
)]
pub async fn discharge_truck(
    State(state): State<TruckHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(truck_id): Path<Uuid>,
) -> TruckResult {
    run_action(&state, &user, truck_id, TruckAction::MarkDischarged).await
}

#[utoipa::path(
    post,
    path = "/api/v1/trucks/{id}/seen",
    tag = "Trucks",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Truck id")),
    responses(
        (status = 200, description = "Unread flag cleared for the caller's role", body = ApiResponse<TruckDto>)
    )
)]
pub async fn mark_seen(
    State(state): State<TruckHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(truck_id): Path<Uuid>,
) -> TruckResult {
    scoped_truck(&state, &user, truck_id)
        .await
        .map_err(domain_error)?;

    let truck = state
        .reception
        .mark_seen(truck_id, user.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(TruckDto::from(truck))))
}
