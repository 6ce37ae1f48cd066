use crate::error::AgroError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

impl AgroError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AgroError::InvalidData(_) => StatusCode::BAD_REQUEST,
            AgroError::NotFound(_) => StatusCode::NOT_FOUND,
            AgroError::Conflict(_) => StatusCode::CONFLICT,
            err if err.is_constraint_violation() => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The text sent to clients: the bare message for client errors, the
    /// full description otherwise.
    fn client_message(self) -> String {
        match self {
            AgroError::InvalidData(msg) | AgroError::NotFound(msg) | AgroError::Conflict(msg) => {
                msg
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AgroError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(serde_json::json!({
            "message": self.client_message()
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AgroError {
    fn from(rejection: JsonRejection) -> Self {
        AgroError::InvalidData(rejection.body_text())
    }
}

impl From<QueryRejection> for AgroError {
    fn from(rejection: QueryRejection) -> Self {
        AgroError::InvalidData(rejection.body_text())
    }
}

impl From<PathRejection> for AgroError {
    fn from(rejection: PathRejection) -> Self {
        AgroError::InvalidData(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            AgroError::InvalidData("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AgroError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AgroError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn raw_constraint_violation_is_conflict() {
        let err = AgroError::Database(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY),
            Some("FOREIGN KEY constraint failed".into()),
        ));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_errors_are_internal() {
        assert_eq!(
            AgroError::Internal("lock".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AgroError::Config("bad".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn body_carries_bare_message() {
        let response = AgroError::NotFound("Field 9 not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Field 9 not found");
    }
}
