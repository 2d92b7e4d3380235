use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::jwt::{generate_access_token, generate_refresh_token, verify_token};
use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::models::{ChangePasswordReq, LoginReqDto, TokenType, UserReq, UserSql};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

async fn fetch_user(username: &str, pool: &MySqlPool) -> Result<Option<UserSql>, sqlx::Error> {
    sqlx::query_as::<_, UserSql>(
        "SELECT id, username, password, role_id, is_approved FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Self-signup. Accounts start unapproved and cannot log in until an
/// admin approves them.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = UserReq,
    responses(
        (status = 201, description = "Registered, pending approval", body = Object, example = json!({
            "message": "Registration successful, pending administrative approval"
        })),
        (status = 400, description = "Empty username or password"),
        (status = 409, description = "Username already taken")
    ),
    tag = "Auth"
)]
pub async fn register(user: web::Json<UserReq>, pool: web::Data<MySqlPool>) -> impl Responder {
    let username = user.username.trim().to_lowercase();

    if username.is_empty() || user.password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "message": "Username and password must not be empty"
        }));
    }
    if crate::model::role::Role::from_id(user.role_id).is_none() {
        return HttpResponse::BadRequest().json(json!({
            "message": "Unknown role"
        }));
    }

    let hashed = match hash_password(&user.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let result = sqlx::query(
        "INSERT INTO users (username, password, role_id, is_approved) VALUES (?, ?, ?, FALSE)",
    )
    .bind(&username)
    .bind(&hashed)
    .bind(user.role_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => HttpResponse::Created().json(json!({
            "message": "Registration successful, pending administrative approval"
        })),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return HttpResponse::Conflict().json(json!({
                        "message": "Username already taken"
                    }));
                }
            }
            error!(error = %e, "Failed to register user");
            HttpResponse::InternalServerError().json(json!({
                "message": "Failed to register user"
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Tokens issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account pending approval")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        return HttpResponse::BadRequest().body("Username or password required");
    }

    let db_user = match fetch_user(&user.username.to_lowercase(), pool.get_ref()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if verify_password(&user.password, &db_user.password).is_err() {
        info!("Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    if !db_user.is_approved {
        info!(user_id = db_user.id, "Login blocked: account not approved");
        return HttpResponse::Forbidden().json(json!({
            "message": "Your account is pending approval. Please contact the administrator."
        }));
    }

    debug!(user_id = db_user.id, "Issuing tokens");

    let access_token = generate_access_token(
        db_user.id,
        db_user.username.clone(),
        db_user.role_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );
    let refresh_token = generate_refresh_token(
        db_user.id,
        db_user.username.clone(),
        db_user.role_id,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    match (access_token, refresh_token) {
        (Ok(access_token), Ok(refresh_token)) => {
            info!("Login successful");
            HttpResponse::Ok().json(LoginResponse {
                access_token,
                refresh_token,
            })
        }
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Token generation failed");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Exchanges a refresh token for a fresh access token.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New access token", body = Object, example = json!({
            "access_token": "..."
        })),
        (status = 401, description = "Missing, invalid or non-refresh token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn refresh_token(req: HttpRequest, config: web::Data<Config>) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::Unauthorized().body("No token"),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::Unauthorized().body("Invalid token"),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::Unauthorized().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().finish();
    }

    match generate_access_token(
        claims.user_id,
        claims.sub,
        claims.role,
        &config.jwt_secret,
        config.access_token_ttl,
    ) {
        Ok(access_token) => HttpResponse::Ok().json(json!({ "access_token": access_token })),
        Err(e) => {
            error!(error = %e, "Token generation failed");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    request_body = ChangePasswordReq,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Current password incorrect")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn change_password(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ChangePasswordReq>,
) -> actix_web::Result<impl Responder> {
    let db_user = fetch_user(&auth.username, pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Database error while fetching user");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?
        .ok_or_else(|| actix_web::error::ErrorUnauthorized("Unknown user"))?;

    if verify_password(&payload.current_password, &db_user.password).is_err() {
        return Ok(HttpResponse::Unauthorized().json(json!({
            "message": "Current password is incorrect"
        })));
    }

    let hashed = hash_password(&payload.new_password).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    sqlx::query("UPDATE users SET password = ? WHERE id = ?")
        .bind(&hashed)
        .bind(db_user.id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id = db_user.id, "Failed to update password");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password changed successfully" })))
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct PendingUser {
    pub id: u64,
    pub username: String,
    pub role_id: u8,
}

/// Admin: accounts awaiting approval.
#[utoipa::path(
    get,
    path = "/api/v1/admin/pending-users",
    responses(
        (status = 200, description = "Pending accounts", body = [PendingUser]),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn pending_users(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let users = sqlx::query_as::<_, PendingUser>(
        "SELECT id, username, role_id FROM users WHERE is_approved = FALSE ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to list pending users");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(users))
}

/// Admin: approve a pending account.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{user_id}/approve",
    params(("user_id" = u64, Path, description = "User to approve")),
    responses(
        (status = 200, description = "Approved"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn approve_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let user_id = path.into_inner();

    let result = sqlx::query("UPDATE users SET is_approved = TRUE WHERE id = ?")
        .bind(user_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to approve user");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "User not found" })));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "User approved" })))
}

/// Admin: reject and remove a pending account.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{user_id}",
    params(("user_id" = u64, Path, description = "User to reject")),
    responses(
        (status = 200, description = "Rejected and removed"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn reject_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let user_id = path.into_inner();

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to reject user");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "User not found" })));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "User rejected and removed" })))
}
