use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Archive entry for a departed employee. Deleted on reinstatement.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRecord {
    #[schema(example = 5)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub leave_date: DateTime<Utc>,
}
