use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

use super::Workflow;

/// Employee row joined with its waiting-queue entry.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct WaitingMember {
    pub employee_id: u64,
    pub name: String,
    pub father_name: String,
    pub grand_father_name: String,
    pub sex: String,
    pub position: String,
    pub employment_status: String,
    pub phone_number: String,
    pub project: Option<String>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub added_date: DateTime<Utc>,
}

/// Employee row joined with its leave-out archive entry.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct LeaveOutMember {
    pub employee_id: u64,
    pub name: String,
    pub father_name: String,
    pub grand_father_name: String,
    pub sex: String,
    pub position: String,
    pub employment_status: String,
    pub phone_number: String,
    pub project: Option<String>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub leave_date: DateTime<Utc>,
}

/// Waiting-for-return queue.
#[utoipa::path(
    get,
    path = "/api/v1/waiting",
    responses(
        (status = 200, description = "Employees pending clearance", body = [WaitingMember]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Clearance"
)]
pub async fn waiting_list(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let members = sqlx::query_as::<_, WaitingMember>(
        "SELECT e.id AS employee_id, e.name, e.father_name, e.grand_father_name, e.sex, \
                e.position, e.employment_status, e.phone_number, e.project, w.added_date \
         FROM waiting_entries w \
         JOIN employees e ON e.id = w.employee_id \
         ORDER BY w.added_date",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch waiting list");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(members))
}

/// Put an employee on the waiting-for-return queue.
#[utoipa::path(
    post,
    path = "/api/v1/waiting/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Added to waiting list"),
        (status = 400, description = "Employee has no borrowed materials"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Already in the waiting list"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Clearance"
)]
pub async fn add_to_waiting(
    workflow: web::Data<Workflow>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    workflow.enqueue_waiting(employee_id).await?;

    info!(employee_id, "added to waiting list");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee added to waiting for return list"
    })))
}

/// Withdraw an employee from the waiting queue.
#[utoipa::path(
    delete,
    path = "/api/v1/waiting/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Removed from waiting list"),
        (status = 404, description = "Employee was not in the waiting list"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Clearance"
)]
pub async fn remove_from_waiting(
    workflow: web::Data<Workflow>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    workflow.dequeue_waiting(employee_id).await?;

    info!(employee_id, "removed from waiting list");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee removed from waiting for return list"
    })))
}

/// Leave-out archive of departed employees.
#[utoipa::path(
    get,
    path = "/api/v1/leave-out",
    responses(
        (status = 200, description = "Departed employees", body = [LeaveOutMember]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Clearance"
)]
pub async fn leave_out_list(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let members = sqlx::query_as::<_, LeaveOutMember>(
        "SELECT e.id AS employee_id, e.name, e.father_name, e.grand_father_name, e.sex, \
                e.position, e.employment_status, e.phone_number, e.project, l.leave_date \
         FROM leave_records l \
         JOIN employees e ON e.id = l.employee_id \
         ORDER BY l.leave_date",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch leave-out list");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(members))
}

/// Clear an employee for departure; fails while materials are outstanding.
#[utoipa::path(
    post,
    path = "/api/v1/leave-out/{employee_id}/approve",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Departure approved"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Employee has borrowed materials"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Clearance"
)]
pub async fn approve_leave(
    workflow: web::Data<Workflow>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    workflow.approve_leave(employee_id).await?;

    info!(employee_id, "leave approved");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee approved for leave-out"
    })))
}

/// Bring a departed employee back to active.
#[utoipa::path(
    post,
    path = "/api/v1/leave-out/{employee_id}/reinstate",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee reinstated"),
        (status = 404, description = "Employee not found or not in the archive"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Clearance"
)]
pub async fn reinstate(
    workflow: web::Data<Workflow>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    workflow.reinstate(employee_id).await?;

    info!(employee_id, "employee reinstated");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee returned from leave-out and is now active"
    })))
}
