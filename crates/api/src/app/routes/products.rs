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

use pvz_app::{AddProductRequest, UseCases};
use pvz_auth::AccessToken;
use pvz_core::PvzId;

use crate::app::{dto, errors};

pub async fn add_product(
    Extension(use_cases): Extension<Arc<UseCases>>,
    Extension(token): Extension<AccessToken>,
    body: Result<Json<dto::AddProductRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_request(e),
    };

    let request = AddProductRequest {
        pvz_id: PvzId::from_uuid(body.pvz_id),
        category: body.category,
    };
    match use_cases.add_product.execute(&token, request).await {
        Ok(product) => (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_last_product(
    Extension(use_cases): Extension<Arc<UseCases>>,
    Extension(token): Extension<AccessToken>,
    pvz_id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let Path(pvz_id) = match pvz_id {
        Ok(p) => p,
        Err(e) => return errors::invalid_request(e),
    };

    match use_cases
        .remove_last_product
        .execute(&token, PvzId::from_uuid(pvz_id))
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
