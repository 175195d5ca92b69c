//! API handlers for the Web API.

pub mod auth;
pub mod material;

pub use auth::*;
pub use material::*;
