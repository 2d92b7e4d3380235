use std::collections::HashMap;

use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use crate::model::employee::Employee;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Abebe")]
    pub name: String,
    #[schema(example = "Kebede")]
    pub father_name: String,
    #[schema(example = "Tesfaye")]
    pub grand_father_name: String,
    #[schema(example = "male")]
    pub sex: String,
    #[schema(example = "Site Engineer")]
    pub position: String,
    #[schema(example = "permanent")]
    pub employment_status: String,
    #[schema(example = "+251911123456")]
    pub phone_number: String,
    #[schema(example = "HQ Renovation", nullable = true)]
    pub project: Option<String>,
}

/// Roster entry: employee plus the materials they currently hold.
#[derive(Serialize, ToSchema)]
pub struct RosterEntry {
    pub employee: Employee,
    /// "Borrowed" when at least one record is open, otherwise "Not Borrowed".
    #[schema(example = "Borrowed")]
    pub borrow_status: String,
    /// "name (SN: serial)" per open record.
    #[schema(example = json!(["Dell Latitude 5440 (SN: SN-2024-0007)"]))]
    pub materials: Vec<String>,
}

#[derive(sqlx::FromRow)]
struct OpenBorrowRow {
    employee_id: u64,
    name: String,
    serial_number: String,
}

const EMPLOYEE_COLS: &str =
    "id, name, father_name, grand_father_name, sex, position, employment_status, \
     phone_number, project, status";

/// Register an employee. Uniqueness key is the full name triple.
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee registered", body = Object, example = json!({
            "message": "Employee added successfully",
            "id": 1
        })),
        (status = 400, description = "Missing required fields"),
        (status = 409, description = "Employee with this name already exists"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    let required = [
        &payload.name,
        &payload.father_name,
        &payload.sex,
        &payload.employment_status,
        &payload.phone_number,
    ];
    if required.iter().any(|f| f.trim().is_empty()) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Please fill all required fields"
        })));
    }

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees \
         WHERE name = ? AND father_name = ? AND grand_father_name = ?)",
    )
    .bind(payload.name.trim())
    .bind(payload.father_name.trim())
    .bind(payload.grand_father_name.trim())
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to check employee uniqueness");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if exists {
        return Ok(HttpResponse::Conflict().json(json!({
            "message": "Employee with this name already exists"
        })));
    }

    let result = sqlx::query(
        "INSERT INTO employees \
         (name, father_name, grand_father_name, sex, position, employment_status, \
          phone_number, project, status) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'active')",
    )
    .bind(payload.name.trim())
    .bind(payload.father_name.trim())
    .bind(payload.grand_father_name.trim())
    .bind(payload.sex.trim())
    .bind(payload.position.trim())
    .bind(payload.employment_status.trim())
    .bind(payload.phone_number.trim())
    .bind(payload.project.as_deref().map(str::trim))
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create employee");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Employee added successfully",
        "id": result.last_insert_id()
    })))
}

/// Active roster with each employee's open borrows.
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "Employees not marked left", body = [RosterEntry]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let sql = format!("SELECT {EMPLOYEE_COLS} FROM employees WHERE status <> 'left' ORDER BY id");
    let employees = sqlx::query_as::<_, Employee>(&sql)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch employees");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let open_rows = sqlx::query_as::<_, OpenBorrowRow>(
        "SELECT b.employee_id, m.name, m.serial_number \
         FROM borrow_records b \
         JOIN materials m ON m.id = b.material_id \
         WHERE b.is_returned = FALSE",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch open borrows");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let mut held: HashMap<u64, Vec<String>> = HashMap::new();
    for row in open_rows {
        held.entry(row.employee_id)
            .or_default()
            .push(format!("{} (SN: {})", row.name, row.serial_number));
    }

    let roster: Vec<RosterEntry> = employees
        .into_iter()
        .map(|employee| {
            let materials = held.remove(&employee.id).unwrap_or_default();
            RosterEntry {
                borrow_status: if materials.is_empty() {
                    "Not Borrowed".to_string()
                } else {
                    "Borrowed".to_string()
                },
                materials,
                employee,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(roster))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let sql = format!("SELECT {EMPLOYEE_COLS} FROM employees WHERE id = ?");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}
