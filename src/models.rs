use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct UserReq {
    #[schema(example = "storekeeper1")]
    pub username: String,
    #[schema(example = "s3cret")]
    pub password: String,
    /// 1 = admin, 2 = staff
    #[schema(example = 2)]
    pub role_id: u8,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "storekeeper1")]
    pub username: String,
    #[schema(example = "s3cret")]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ChangePasswordReq {
    pub current_password: String,
    pub new_password: String,
}

#[derive(FromRow)]
pub struct UserSql {
    pub id: u64,
    pub username: String,
    pub password: String,
    pub role_id: u8,
    /// New registrations wait for admin approval before they can log in.
    pub is_approved: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,
    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
