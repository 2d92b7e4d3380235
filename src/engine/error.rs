use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Failure taxonomy shared by the borrow engine and the clearance
/// workflow. Handlers rely on the `ResponseError` impl below; the engine
/// itself never formats user-facing responses.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or missing input, or an input-shape precondition.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The operation would violate a lifecycle invariant.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl actix_web::ResponseError for CoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Conflict(_) => StatusCode::CONFLICT,
            CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // storage details belong in the logs, not in the response
            CoreError::Store(e) => {
                error!(error = %e, "storage failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            CoreError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CoreError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CoreError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
    }
}
