//! `pvz-app`: use cases over the pickup-point domain.
//!
//! Every use case takes the caller's opaque [`AccessToken`] plus a typed
//! request, checks privileges first, and only then touches domain state.
//! Use cases hold exactly the store capabilities they need.
//!
//! [`AccessToken`]: pvz_auth::AccessToken

pub mod access;
pub mod locks;
pub mod pickup_points;
pub mod products;
pub mod receptions;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use pvz_auth::{IdentityService, PasswordService, TokenService, UserStore};
use pvz_domain::{PickupPointStore, ProductStore, ReceptionStore, ReportStore};

pub use access::Authenticator;
pub use locks::{PickupPointGuard, PickupPointLocks};
pub use pickup_points::{
    CreatePickupPoint, CreatePickupPointRequest, FindPickupPoint, ListReports, ListReportsRequest,
};
pub use products::{AddProduct, AddProductRequest, RemoveLastProduct};
pub use receptions::{CloseLastReception, CreateReception};
pub use users::{DummyLogin, LoginRequest, LoginUser, RegisterRequest, RegisterUser};

/// Store capabilities a backend provides.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub pickup_points: Arc<dyn PickupPointStore>,
    pub receptions: Arc<dyn ReceptionStore>,
    pub products: Arc<dyn ProductStore>,
    pub reports: Arc<dyn ReportStore>,
}

impl Stores {
    /// Every capability served by one backend.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: UserStore + PickupPointStore + ReceptionStore + ProductStore + ReportStore + 'static,
    {
        Self {
            users: backend.clone(),
            pickup_points: backend.clone(),
            receptions: backend.clone(),
            products: backend.clone(),
            reports: backend,
        }
    }
}

/// Every use case, wired against one set of stores.
#[derive(Clone)]
pub struct UseCases {
    pub register_user: RegisterUser,
    pub login_user: LoginUser,
    pub dummy_login: DummyLogin,
    pub create_pickup_point: CreatePickupPoint,
    pub find_pickup_point: FindPickupPoint,
    pub list_reports: ListReports,
    pub create_reception: CreateReception,
    pub close_last_reception: CloseLastReception,
    pub add_product: AddProduct,
    pub remove_last_product: RemoveLastProduct,
}

impl UseCases {
    pub fn new(
        stores: Stores,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        let identity = IdentityService::new(stores.users.clone(), tokens, passwords);
        let auth = Authenticator::new(identity.clone());
        let locks = PickupPointLocks::default();

        Self {
            register_user: RegisterUser::new(identity.clone()),
            login_user: LoginUser::new(identity.clone()),
            dummy_login: DummyLogin::new(identity),
            create_pickup_point: CreatePickupPoint::new(auth.clone(), stores.pickup_points.clone()),
            find_pickup_point: FindPickupPoint::new(stores.pickup_points.clone()),
            list_reports: ListReports::new(auth.clone(), stores.reports.clone()),
            create_reception: CreateReception::new(
                auth.clone(),
                stores.pickup_points.clone(),
                stores.receptions.clone(),
                locks.clone(),
            ),
            close_last_reception: CloseLastReception::new(
                auth.clone(),
                stores.pickup_points.clone(),
                stores.receptions.clone(),
                locks.clone(),
            ),
            add_product: AddProduct::new(
                auth.clone(),
                stores.pickup_points.clone(),
                stores.receptions.clone(),
                stores.products.clone(),
                locks.clone(),
            ),
            remove_last_product: RemoveLastProduct::new(
                auth,
                stores.pickup_points,
                stores.receptions,
                stores.products,
                locks,
            ),
        }
    }
}
