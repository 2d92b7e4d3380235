use std::collections::BTreeMap;

use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use crate::model::material::Material;

#[derive(Serialize, ToSchema)]
pub struct DashboardStats {
    #[schema(example = 120)]
    pub total_employees: i64,
    #[schema(example = 300)]
    pub total_materials: i64,
    #[schema(example = 45)]
    pub borrowed_count: i64,
    #[schema(example = 3)]
    pub waiting_count: i64,
    #[schema(example = 12)]
    pub leave_count: i64,
}

/// One employee's outstanding holdings in the inventory report.
#[derive(Serialize, ToSchema)]
pub struct BorrowedByEmployee {
    pub employee_id: u64,
    #[schema(example = "Abebe Kebede")]
    pub name: String,
    pub sex: String,
    pub position: String,
    pub phone_number: String,
    #[schema(example = json!(["Dell Latitude 5440 (SN: SN-2024-0007)"]))]
    pub materials: Vec<String>,
    #[schema(example = 1)]
    pub borrow_count: usize,
}

/// JSON feed the spreadsheet exporter renders: who holds what, and what
/// is still on the shelf.
#[derive(Serialize, ToSchema)]
pub struct InventoryReport {
    pub borrowed: Vec<BorrowedByEmployee>,
    pub available: Vec<Material>,
}

#[derive(sqlx::FromRow)]
struct BorrowedRow {
    employee_id: u64,
    name: String,
    father_name: String,
    sex: String,
    position: String,
    phone_number: String,
    material_name: String,
    serial_number: String,
}

async fn count(pool: &MySqlPool, sql: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await
}

/// Dashboard counters.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStats),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn stats(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let pool = pool.get_ref();

    let result: Result<DashboardStats, sqlx::Error> = async {
        Ok(DashboardStats {
            total_employees: count(pool, "SELECT COUNT(*) FROM employees").await?,
            total_materials: count(pool, "SELECT COUNT(*) FROM materials").await?,
            borrowed_count: count(
                pool,
                "SELECT COUNT(*) FROM borrow_records WHERE is_returned = FALSE",
            )
            .await?,
            waiting_count: count(pool, "SELECT COUNT(*) FROM waiting_entries").await?,
            leave_count: count(pool, "SELECT COUNT(*) FROM leave_records").await?,
        })
    }
    .await;

    match result {
        Ok(stats) => Ok(HttpResponse::Ok().json(stats)),
        Err(e) => {
            error!(error = %e, "Failed to compute dashboard stats");
            Err(actix_web::error::ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/// Borrowed-by-employee plus available-materials feed.
#[utoipa::path(
    get,
    path = "/api/v1/reports/inventory",
    responses(
        (status = 200, description = "Inventory report", body = InventoryReport),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn inventory_report(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let rows = sqlx::query_as::<_, BorrowedRow>(
        "SELECT e.id AS employee_id, e.name, e.father_name, e.sex, e.position, \
                e.phone_number, m.name AS material_name, m.serial_number \
         FROM borrow_records b \
         JOIN employees e ON e.id = b.employee_id \
         JOIN materials m ON m.id = b.material_id \
         WHERE b.is_returned = FALSE \
         ORDER BY e.id",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch borrowed rows");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let mut grouped: BTreeMap<u64, BorrowedByEmployee> = BTreeMap::new();
    for row in rows {
        let entry = grouped
            .entry(row.employee_id)
            .or_insert_with(|| BorrowedByEmployee {
                employee_id: row.employee_id,
                name: format!("{} {}", row.name, row.father_name),
                sex: row.sex.clone(),
                position: row.position.clone(),
                phone_number: row.phone_number.clone(),
                materials: Vec::new(),
                borrow_count: 0,
            });
        entry
            .materials
            .push(format!("{} (SN: {})", row.material_name, row.serial_number));
        entry.borrow_count += 1;
    }

    let available = sqlx::query_as::<_, Material>(
        "SELECT id, name, serial_number, status FROM materials \
         WHERE status = 'available' ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch available materials");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(InventoryReport {
        borrowed: grouped.into_values().collect(),
        available,
    }))
}
