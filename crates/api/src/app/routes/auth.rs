use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use pvz_app::{LoginRequest, RegisterRequest, UseCases};
use pvz_core::DomainError;

use crate::app::{dto, errors};

pub async fn dummy_login(
    Extension(use_cases): Extension<Arc<UseCases>>,
    body: Result<Json<dto::DummyLoginRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_request(e),
    };

    match use_cases.dummy_login.execute(&body.role) {
        Ok(token) => (StatusCode::OK, Json(token)).into_response(),
        Err(DomainError::UnknownRoleName) => errors::json_error(
            StatusCode::BAD_REQUEST,
            "unknown_role",
            format!("unknown role: {}", body.role),
        ),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn register(
    Extension(use_cases): Extension<Arc<UseCases>>,
    body: Result<Json<dto::RegisterRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_request(e),
    };

    let request = RegisterRequest {
        email: body.email,
        password: body.password,
        role: body.role,
    };
    match use_cases.register_user.execute(request).await {
        Ok(user) => (StatusCode::CREATED, Json(dto::user_to_json(&user))).into_response(),
        Err(e) => errors::json_error(StatusCode::BAD_REQUEST, "bad_request", e.to_string()),
    }
}

/// Any failure is reported as bad credentials so callers cannot probe for accounts.
pub async fn login(
    Extension(use_cases): Extension<Arc<UseCases>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_request(e),
    };

    let request = LoginRequest {
        email: body.email,
        password: body.password,
    };
    match use_cases.login_user.execute(request).await {
        Ok(token) => (StatusCode::OK, Json(token)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            errors::json_error(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                DomainError::BadUserCredential.to_string(),
            )
        }
    }
}
