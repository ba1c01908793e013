use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Extension, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use pvz_app::{CreatePickupPointRequest, ListReportsRequest, UseCases};
use pvz_auth::AccessToken;
use pvz_core::PvzId;
use pvz_domain::report::DEFAULT_LIMIT;

use crate::app::{dto, errors};

pub async fn create_pvz(
    Extension(use_cases): Extension<Arc<UseCases>>,
    Extension(token): Extension<AccessToken>,
    body: Result<Json<dto::CreatePvzRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::invalid_request(e),
    };

    let request = CreatePickupPointRequest {
        id: body.id.map(PvzId::from_uuid),
        city: body.city,
        registered_at: body.registration_date,
    };
    match use_cases.create_pickup_point.execute(&token, request).await {
        Ok(pvz) => (StatusCode::CREATED, Json(dto::pvz_to_json(&pvz))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_pvz(
    Extension(use_cases): Extension<Arc<UseCases>>,
    Extension(token): Extension<AccessToken>,
    query: Result<Query<dto::ListPvzQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::invalid_request(e),
    };

    let request = ListReportsRequest {
        start: query.start_date,
        end: query.end_date,
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(DEFAULT_LIMIT),
    };
    match use_cases.list_reports.execute(&token, request).await {
        Ok(reports) => {
            let body: Vec<_> = reports.iter().map(dto::report_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
