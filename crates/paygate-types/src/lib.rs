//! Paygate Types - Shared domain types
//!
//! This crate contains the types shared between the payment gateway
//! adapters and their host application:
//! - Subscription entity and lifecycle status
//! - Host-implemented persistence contracts (subscription and settings
//!   stores)

pub mod store;
pub mod subscription;

pub use store::*;
pub use subscription::*;
