//! MemberHub GraphQL Gateway
//!
//! GraphQL API over users, posts, profiles, member types and subscriptions:
//! - Every resolver is a single call into the store handle
//! - The store handle is bound per request, the schema is built once
//! - Documents nested deeper than five levels are rejected before execution

pub mod config;
pub mod engine;
pub mod metrics;
pub mod routes;
pub mod schema;
pub mod service;

pub use config::{GatewayConfig, StoreBackend};
pub use engine::{build_schema, GatewaySchema, GraphQlBody, GraphQlReply, QueryEngine};
pub use routes::{router, AppState};
pub use service::GatewayService;

pub const SERVICE_ID: &str = "graphql-gateway";
