use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use pvz_core::DomainError;

/// Access errors are 403; every other domain failure is the caller's 400.
pub fn domain_error_to_response(err: DomainError) -> Response {
    if err.is_access_error() {
        return json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string());
    }
    if let DomainError::Infrastructure(detail) = &err {
        tracing::error!(%detail, "request failed on infrastructure error");
    }
    json_error(StatusCode::BAD_REQUEST, "bad_request", err.to_string())
}

/// Malformed body, path or query.
pub fn invalid_request(rejection: impl std::fmt::Display) -> Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_request", rejection.to_string())
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_errors_are_forbidden() {
        let res = domain_error_to_response(DomainError::InsufficientPrivileges);
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = domain_error_to_response(DomainError::BadUserCredential);
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn everything_else_is_bad_request() {
        for err in [
            DomainError::PvzDoesNotExist,
            DomainError::UnknownCity,
            DomainError::AnotherOpenedReception,
            DomainError::ReceptionIsEmpty,
            DomainError::infrastructure("db down"),
        ] {
            assert_eq!(domain_error_to_response(err).status(), StatusCode::BAD_REQUEST);
        }
    }
}
