use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use pvz_auth::{Role, User};
use pvz_domain::{PickupPoint, PickupPointReport, Product, Reception, ReceptionReport, ReceptionStatus};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct DummyLoginRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePvzRequest {
    pub id: Option<Uuid>,
    pub registration_date: Option<DateTime<Utc>>,
    pub city: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPvzQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceptionRequest {
    pub pvz_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    #[serde(rename = "type")]
    pub category: String,
    pub pvz_id: Uuid,
}

// -------------------------
// Response mapping
// -------------------------

/// Staff accounts are "employee" on the wire.
pub fn role_name(role: Role) -> &'static str {
    match role {
        Role::Client => "employee",
        Role::Moderator => "moderator",
    }
}

pub fn status_name(status: ReceptionStatus) -> &'static str {
    match status {
        ReceptionStatus::InProgress => "in_progress",
        ReceptionStatus::Closed => "close",
    }
}

pub fn user_to_json(user: &User) -> serde_json::Value {
    json!({
        "id": user.id.to_string(),
        "email": user.email.as_str(),
        "role": role_name(user.role),
    })
}

pub fn pvz_to_json(pvz: &PickupPoint) -> serde_json::Value {
    json!({
        "id": pvz.id.to_string(),
        "registrationDate": pvz.registered_at,
        "city": pvz.city.name(),
    })
}

pub fn reception_to_json(reception: &Reception) -> serde_json::Value {
    json!({
        "id": reception.id.to_string(),
        "dateTime": reception.created_at,
        "pvzId": reception.pvz_id.to_string(),
        "status": status_name(reception.status),
    })
}

pub fn product_to_json(product: &Product) -> serde_json::Value {
    json!({
        "id": product.id.to_string(),
        "dateTime": product.created_at,
        "receptionId": product.reception_id.to_string(),
        "type": product.category.name(),
    })
}

fn reception_report_to_json(report: &ReceptionReport) -> serde_json::Value {
    json!({
        "reception": reception_to_json(&report.reception),
        "products": report.products.iter().map(product_to_json).collect::<Vec<_>>(),
    })
}

pub fn report_to_json(report: &PickupPointReport) -> serde_json::Value {
    json!({
        "pvz": pvz_to_json(&report.pickup_point),
        "receptions": report.receptions.iter().map(reception_report_to_json).collect::<Vec<_>>(),
    })
}
