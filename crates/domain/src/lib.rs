//! Pickup-point domain: pickup points, receptions and products.
//!
//! Lifecycle rules live on the entities; persistence is reached through the
//! store ports in [`store`]. No IO happens here beyond calls into those ports.

pub mod city;
pub mod pickup_point;
pub mod product;
pub mod reception;
pub mod report;
pub mod store;

#[cfg(test)]
pub(crate) mod fakes;

pub use city::City;
pub use pickup_point::PickupPoint;
pub use product::{Product, ProductCategory};
pub use reception::{Reception, ReceptionStatus};
pub use report::{PickupPointReport, ReceptionReport, ReceptionWindow, ReportFilter};
pub use store::{
    PickupPointStore, ProductStore, ReceptionFilter, ReceptionStore, ReportStore, SortOrder,
};
