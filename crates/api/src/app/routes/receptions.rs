use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Extension, Path,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use pvz_app::UseCases;
use pvz_auth::AccessToken;
use pvz_core::PvzId;

use crate::app::{dto, errors};

pub async fn create_reception(
    Extension(use_cases): Extension<Arc<UseCases>>,
    Extension(token): Extension<AccessToken>,
    body: Result<Json<dto::CreateReceptionRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_request(e),
    };

    match use_cases
        .create_reception
        .execute(&token, PvzId::from_uuid(body.pvz_id))
        .await
    {
        Ok(reception) => (StatusCode::CREATED, Json(dto::reception_to_json(&reception))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn close_last_reception(
    Extension(use_cases): Extension<Arc<UseCases>>,
    Extension(token): Extension<AccessToken>,
    pvz_id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let Path(pvz_id) = match pvz_id {
        Ok(p) => p,
        Err(e) => return errors::invalid_request(e),
    };

    match use_cases
        .close_last_reception
        .execute(&token, PvzId::from_uuid(pvz_id))
        .await
    {
        Ok(reception) => (StatusCode::OK, Json(dto::reception_to_json(&reception))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
