//! Entity row structs and create/update DTOs.

pub mod application;
pub mod car;
pub mod company;
pub mod document;
pub mod message;
pub mod notification;
pub mod offer;
pub mod session;
pub mod user;
