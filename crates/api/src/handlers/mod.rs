//! HTTP request handlers, one module per resource.

pub mod admin;
pub mod applications;
pub mod auth;
pub mod cars;
pub mod companies;
pub mod notifications;
pub mod offers;
