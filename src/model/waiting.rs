use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Marks an employee as pending clearance. At most one entry per employee.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WaitingEntry {
    #[schema(example = 3)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub added_date: DateTime<Utc>,
}
