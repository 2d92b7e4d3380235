use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString, Serialize, Deserialize, ToSchema)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MaterialStatus {
    Available,
    Borrowed,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "name": "Dell Latitude 5440",
        "serial_number": "SN-2024-0007",
        "status": "available"
    })
)]
pub struct Material {
    #[schema(example = 7)]
    pub id: u64,

    #[schema(example = "Dell Latitude 5440")]
    pub name: String,

    /// Globally unique serial number.
    #[schema(example = "SN-2024-0007")]
    pub serial_number: String,

    #[schema(example = "available")]
    pub status: String,
}

impl Material {
    pub fn is_available(&self) -> bool {
        self.status == MaterialStatus::Available.to_string()
    }
}
