use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod products;
pub mod pvz;
pub mod receptions;
pub mod system;

/// Every endpoint; handlers receive the caller's token from the bearer middleware.
pub fn router() -> Router {
    Router::new()
        .route("/dummyLogin", post(auth::dummy_login))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/pvz", post(pvz::create_pvz).get(pvz::list_pvz))
        .route("/pvz/:pvz_id/close_last_reception", post(receptions::close_last_reception))
        .route("/pvz/:pvz_id/delete_last_product", post(products::delete_last_product))
        .route("/receptions", post(receptions::create_reception))
        .route("/products", post(products::add_product))
}
