//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and token handling live here; the HTTP layer only
//! translates requests and cookies.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;
pub mod token;

pub use service::{AuthConfig, AuthService};
