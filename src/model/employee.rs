use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Employee lifecycle. `Left` employees stay on record because borrow
/// history references them; they are only hidden from the active roster.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString, Serialize, Deserialize, ToSchema)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Left,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Abebe",
        "father_name": "Kebede",
        "grand_father_name": "Tesfaye",
        "sex": "male",
        "position": "Site Engineer",
        "employment_status": "permanent",
        "phone_number": "+251911123456",
        "project": "HQ Renovation",
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

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

    #[schema(example = "active")]
    pub status: String,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active.to_string()
    }
}
