use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use super::Engine;
use crate::engine::borrow::ReturnOutcome;

#[derive(Deserialize, ToSchema)]
pub struct IssueRequest {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "field survey")]
    pub purpose: Option<String>,
    #[schema(example = json!([7, 8]))]
    pub material_ids: Vec<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct ReturnAllRequest {
    #[schema(example = 1)]
    pub employee_id: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct ReturnSelectedRequest {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = json!([42]))]
    pub record_ids: Vec<u64>,
}

/// Issue materials to an active employee.
#[utoipa::path(
    post,
    path = "/api/v1/borrow",
    request_body = IssueRequest,
    responses(
        (status = 200, description = "Materials borrowed", body = Object, example = json!({
            "message": "Materials borrowed successfully",
            "record_ids": [42, 43]
        })),
        (status = 400, description = "Employee missing/inactive or a material is not available"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Borrow"
)]
pub async fn issue(
    engine: web::Data<Engine>,
    payload: web::Json<IssueRequest>,
) -> actix_web::Result<impl Responder> {
    let purpose = payload.purpose.as_deref().unwrap_or("").trim();
    let record_ids = engine
        .issue(payload.employee_id, purpose, &payload.material_ids)
        .await?;

    info!(
        employee_id = payload.employee_id,
        count = record_ids.len(),
        "materials issued"
    );
    Ok(HttpResponse::Ok().json(json!({
        "message": "Materials borrowed successfully",
        "record_ids": record_ids
    })))
}

/// Return everything an employee holds. A no-op when nothing is open.
#[utoipa::path(
    post,
    path = "/api/v1/return",
    request_body = ReturnAllRequest,
    responses(
        (status = 200, description = "All materials returned", body = Object, example = json!({
            "message": "All materials returned successfully",
            "returned": 2
        })),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Borrow"
)]
pub async fn return_all(
    engine: web::Data<Engine>,
    payload: web::Json<ReturnAllRequest>,
) -> actix_web::Result<impl Responder> {
    let returned = engine.return_all(payload.employee_id).await?;

    info!(employee_id = payload.employee_id, returned, "bulk return");
    Ok(HttpResponse::Ok().json(json!({
        "message": "All materials returned successfully",
        "returned": returned
    })))
}

/// Return a subset of an employee's open records.
#[utoipa::path(
    post,
    path = "/api/v1/return/selected",
    request_body = ReturnSelectedRequest,
    responses(
        (status = 200, description = "Selected items returned", body = ReturnOutcome),
        (status = 400, description = "Empty selection or a record not owned/already returned"),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Borrow"
)]
pub async fn return_selected(
    engine: web::Data<Engine>,
    payload: web::Json<ReturnSelectedRequest>,
) -> actix_web::Result<impl Responder> {
    let outcome = engine
        .return_selected(payload.employee_id, &payload.record_ids)
        .await?;

    info!(
        employee_id = payload.employee_id,
        returned = outcome.returned,
        remaining = outcome.remaining,
        "selective return"
    );
    let message = if outcome.remaining == 0 {
        "All materials returned. Clearance complete.".to_string()
    } else {
        format!("Successfully returned {} items", outcome.returned)
    };
    Ok(HttpResponse::Ok().json(json!({
        "message": message,
        "returned": outcome.returned,
        "remaining": outcome.remaining
    })))
}

/// Number of open borrow records for an employee.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/outstanding",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Open record count", body = Object, example = json!({
            "employee_id": 1,
            "outstanding": 2
        })),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Borrow"
)]
pub async fn outstanding(
    engine: web::Data<Engine>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let outstanding = engine.outstanding_count(employee_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "employee_id": employee_id,
        "outstanding": outstanding
    })))
}
