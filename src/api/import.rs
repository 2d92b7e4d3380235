//! Bulk import takes JSON rows as produced by the spreadsheet-parsing
//! collaborator. Rows with missing required fields or duplicate keys are
//! skipped; one bad row never aborts the batch.

use actix_web::{HttpResponse, Responder, web};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{error, info};

use crate::auth::auth::AuthUser;
use crate::auth::password::hash_password;
use crate::utils::field_map::FieldMap;

fn import_summary(added: usize, skipped: usize) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": format!("Added {added}, skipped {skipped}"),
        "added": added,
        "skipped": skipped
    }))
}

/// Import employees. Duplicates by (name, father_name, grand_father_name)
/// are skipped; everyone starts active.
#[utoipa::path(
    post,
    path = "/api/v1/import/employees",
    request_body = Vec<Object>,
    responses(
        (status = 200, description = "Import summary", body = Object, example = json!({
            "message": "Added 10, skipped 2", "added": 10, "skipped": 2
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Import"
)]
pub async fn import_employees(
    pool: web::Data<MySqlPool>,
    rows: web::Json<Vec<Value>>,
) -> actix_web::Result<impl Responder> {
    let map = FieldMap::with_defaults();
    let mut added = 0;
    let mut skipped = 0;

    for row in rows.iter() {
        let fields = map.normalize_row(row);
        let get = |key: &str| fields.get(key).map(String::as_str).unwrap_or("");

        let name = get("name");
        let father_name = get("father_name");
        if name.is_empty()
            || father_name.is_empty()
            || get("sex").is_empty()
            || get("employment_status").is_empty()
            || get("phone_number").is_empty()
        {
            skipped += 1;
            continue;
        }
        let grand_father_name = get("grand_father_name");

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM employees \
             WHERE name = ? AND father_name = ? AND grand_father_name = ?)",
        )
        .bind(name)
        .bind(father_name)
        .bind(grand_father_name)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Employee import lookup failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

        if exists {
            skipped += 1;
            continue;
        }

        sqlx::query(
            "INSERT INTO employees \
             (name, father_name, grand_father_name, sex, position, employment_status, \
              phone_number, project, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'active')",
        )
        .bind(name)
        .bind(father_name)
        .bind(grand_father_name)
        .bind(get("sex"))
        .bind(get("position"))
        .bind(get("employment_status"))
        .bind(get("phone_number"))
        .bind(fields.get("project"))
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Employee import insert failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
        added += 1;
    }

    info!(added, skipped, "employee import finished");
    Ok(import_summary(added, skipped))
}

/// Admin: import materials; duplicate serial numbers are skipped and
/// everything starts available.
#[utoipa::path(
    post,
    path = "/api/v1/import/materials",
    request_body = Vec<Object>,
    responses(
        (status = 200, description = "Import summary", body = Object, example = json!({
            "message": "Added 30, skipped 1", "added": 30, "skipped": 1
        })),
        (status = 403, description = "Admin only"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Import"
)]
pub async fn import_materials(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    rows: web::Json<Vec<Value>>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let map = FieldMap::with_defaults();
    let mut added = 0;
    let mut skipped = 0;

    for row in rows.iter() {
        let fields = map.normalize_row(row);
        let (Some(name), Some(serial_number)) = (fields.get("name"), fields.get("serial_number"))
        else {
            skipped += 1;
            continue;
        };

        let result = sqlx::query(
            "INSERT INTO materials (name, serial_number, status) VALUES (?, ?, 'available')",
        )
        .bind(name)
        .bind(serial_number)
        .execute(pool.get_ref())
        .await;

        match result {
            Ok(_) => added += 1,
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some("23000") =>
            {
                skipped += 1;
            }
            Err(e) => {
                error!(error = %e, "Material import insert failed");
                return Err(actix_web::error::ErrorInternalServerError(
                    "Internal Server Error",
                ));
            }
        }
    }

    info!(added, skipped, "material import finished");
    Ok(import_summary(added, skipped))
}

/// Admin: import user accounts, pre-approved.
#[utoipa::path(
    post,
    path = "/api/v1/import/users",
    request_body = Vec<Object>,
    responses(
        (status = 200, description = "Import summary", body = Object, example = json!({
            "message": "Added 5, skipped 0", "added": 5, "skipped": 0
        })),
        (status = 403, description = "Admin only"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Import"
)]
pub async fn import_users(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    rows: web::Json<Vec<Value>>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let map = FieldMap::with_defaults();
    let mut added = 0;
    let mut skipped = 0;

    for row in rows.iter() {
        let fields = map.normalize_row(row);
        let (Some(username), Some(password)) = (fields.get("username"), fields.get("password"))
        else {
            skipped += 1;
            continue;
        };
        let role_id: u8 = match fields.get("role").map(String::as_str) {
            Some("admin") => 1,
            _ => 2,
        };

        let hashed = hash_password(password).map_err(|e| {
            error!(error = %e, "Password hashing failed during import");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

        let result = sqlx::query(
            "INSERT INTO users (username, password, role_id, is_approved) \
             VALUES (?, ?, ?, TRUE)",
        )
        .bind(username.to_lowercase())
        .bind(&hashed)
        .bind(role_id)
        .execute(pool.get_ref())
        .await;

        match result {
            Ok(_) => added += 1,
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some("23000") =>
            {
                skipped += 1;
            }
            Err(e) => {
                error!(error = %e, "User import insert failed");
                return Err(actix_web::error::ErrorInternalServerError(
                    "Internal Server Error",
                ));
            }
        }
    }

    info!(added, skipped, "user import finished");
    Ok(import_summary(added, skipped))
}
