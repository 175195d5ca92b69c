//! Materials Hub - Self-hosted sharing service for coaching materials.
//!
//! Email/password accounts, object storage for uploaded files, and a
//! reverse-chronological material library behind a JSON/multipart HTTP API.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{hash_password, validate_password, verify_password, PasswordError, ValidationError};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{HubError, Result};
pub use file::{Material, MaterialService, ObjectStore, UploadRequest};
pub use web::WebServer;
