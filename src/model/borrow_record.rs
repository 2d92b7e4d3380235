use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One material handed to one employee at one point in time. Records are
/// never deleted; returns only flip `is_returned`, so the table is the
/// audit trail. At most one open record may exist per material.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct BorrowRecord {
    #[schema(example = 42)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = 7)]
    pub material_id: u64,

    #[schema(example = "field survey")]
    pub purpose: String,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub borrow_date: DateTime<Utc>,

    #[schema(example = false)]
    pub is_returned: bool,
}
