//! GraphQL schema: scalars, entity types, inputs and the root types

pub mod member;
pub mod mutation;
pub mod post;
pub mod profile;
pub mod query;
pub mod scalars;
pub mod user;

use async_graphql::{Context, ErrorExtensions};
use memberhub_store::{StoreError, StoreHandle};
use tracing::{debug, error};

pub use member::{MemberGql, MemberTypeIdGql};
pub use mutation::MutationRoot;
pub use post::{ChangePostInput, CreatePostInput, PostGql};
pub use profile::{ChangeProfileInput, CreateProfileInput, ProfileGql};
pub use query::QueryRoot;
pub use scalars::{DeleteAck, UuidScalar};
pub use user::{ChangeUserInput, CreateUserInput, UserGql};

/// The store handle bound to the current request
pub(crate) fn store<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a StoreHandle> {
    ctx.data::<StoreHandle>()
}

/// Turn a store failure into a field error tagged with `extensions.code`
pub(crate) fn field_error(err: StoreError) -> async_graphql::Error {
    let code = err.error_code();
    match err {
        StoreError::NotFound { .. }
        | StoreError::UniqueViolation(_)
        | StoreError::ForeignKeyViolation(_) => debug!(code, error = %err, "Store rejected operation"),
        _ => error!(error = %err, "Store call failed"),
    }
    async_graphql::Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
}
