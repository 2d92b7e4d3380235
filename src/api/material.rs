use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::model::material::{Material, MaterialStatus};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateMaterial {
    #[schema(example = "Dell Latitude 5440")]
    pub name: String,
    #[schema(example = "SN-2024-0007")]
    pub serial_number: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct MaterialFilter {
    /// Filter by status; defaults to `available`, `all` lists everything.
    #[schema(example = "available")]
    pub status: Option<String>,
}

/// Register a material. Serial numbers are globally unique.
#[utoipa::path(
    post,
    path = "/api/v1/materials",
    request_body = CreateMaterial,
    responses(
        (status = 201, description = "Material registered", body = Object, example = json!({
            "message": "Material added successfully",
            "id": 7
        })),
        (status = 400, description = "Name or serial number missing"),
        (status = 409, description = "Serial number already exists"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Material"
)]
pub async fn create_material(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateMaterial>,
) -> actix_web::Result<impl Responder> {
    let name = payload.name.trim();
    let serial_number = payload.serial_number.trim();

    if name.is_empty() || serial_number.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Both material name and serial number are required"
        })));
    }

    let result = sqlx::query(
        "INSERT INTO materials (name, serial_number, status) VALUES (?, ?, 'available')",
    )
    .bind(name)
    .bind(serial_number)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => Ok(HttpResponse::Created().json(json!({
            "message": "Material added successfully",
            "id": res.last_insert_id()
        }))),
        Err(e) => {
            // unique index on serial_number
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": format!(
                            "Material with serial number '{serial_number}' already exists"
                        )
                    })));
                }
            }
            error!(error = %e, "Failed to create material");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// List materials, available ones by default.
#[utoipa::path(
    get,
    path = "/api/v1/materials",
    params(MaterialFilter),
    responses(
        (status = 200, description = "Materials", body = [Material]),
        (status = 400, description = "Unknown status filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Material"
)]
pub async fn list_materials(
    pool: web::Data<MySqlPool>,
    query: web::Query<MaterialFilter>,
) -> actix_web::Result<impl Responder> {
    let status = query.status.as_deref().unwrap_or("available");

    let mut sql = String::from("SELECT id, name, serial_number, status FROM materials");
    if status != "all" {
        if status.parse::<MaterialStatus>().is_err() {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "status must be one of: available, borrowed, all"
            })));
        }
        sql.push_str(" WHERE status = ?");
    }
    sql.push_str(" ORDER BY id");

    let mut q = sqlx::query_as::<_, Material>(&sql);
    if status != "all" {
        q = q.bind(status);
    }

    let materials = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch materials");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(materials))
}
