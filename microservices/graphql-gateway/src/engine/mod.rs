//! Request execution

mod query_engine;

pub use query_engine::{
    build_schema, GatewaySchema, GraphQlBody, GraphQlReply, QueryEngine, MAX_QUERY_DEPTH,
};
