//! Movieflix API gateway
//!
//! - `client`: request plumbing, bearer injection, error mapping
//! - `catalog`: rows, search, detail, health
//! - `auth`: signup, login, password reset, social login

pub mod auth;
pub mod catalog;
pub mod client;

pub use client::{ApiClient, ApiError, DEFAULT_API_URL};
