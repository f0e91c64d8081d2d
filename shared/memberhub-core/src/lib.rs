//! MemberHub Core - Shared domain types and service infrastructure
//!
//! This crate provides:
//! - Standard service trait all MemberHub services implement
//! - Domain rows (users, posts, profiles, member types) and their inputs
//! - Error handling utilities
//! - Configuration management

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use domain::*;
pub use error::{MemberhubError, Result};
pub use service::{
    DependencyStatus, HealthStatus, MemberhubService, MicroserviceRuntime, ReadinessStatus,
};
