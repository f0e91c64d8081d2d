//! Root query type

use async_graphql::{Context, Object, Result};
use memberhub_store::{PostFilter, UserFilter};

use super::{field_error, store, MemberGql, MemberTypeIdGql, PostGql, ProfileGql, UserGql, UuidScalar};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn member_type(
        &self,
        ctx: &Context<'_>,
        id: MemberTypeIdGql,
    ) -> Result<Option<MemberGql>> {
        let member_type = store(ctx)?
            .member_type(id.into())
            .await
            .map_err(field_error)?;
        Ok(member_type.map(Into::into))
    }

    async fn member_types(&self, ctx: &Context<'_>) -> Result<Vec<MemberGql>> {
        let member_types = store(ctx)?.member_types().await.map_err(field_error)?;
        Ok(member_types.into_iter().map(Into::into).collect())
    }

    async fn post(&self, ctx: &Context<'_>, id: UuidScalar) -> Result<Option<PostGql>> {
        let post = store(ctx)?.post(id.into()).await.map_err(field_error)?;
        Ok(post.map(Into::into))
    }

    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostGql>> {
        let posts = store(ctx)?
            .posts(PostFilter::default())
            .await
            .map_err(field_error)?;
        Ok(posts.into_iter().map(Into::into).collect())
    }

    async fn profile(&self, ctx: &Context<'_>, id: UuidScalar) -> Result<Option<ProfileGql>> {
        let profile = store(ctx)?.profile(id.into()).await.map_err(field_error)?;
        Ok(profile.map(Into::into))
    }

    async fn profiles(&self, ctx: &Context<'_>) -> Result<Vec<ProfileGql>> {
        let profiles = store(ctx)?.profiles().await.map_err(field_error)?;
        Ok(profiles.into_iter().map(Into::into).collect())
    }

    async fn user(&self, ctx: &Context<'_>, id: UuidScalar) -> Result<Option<UserGql>> {
        let user = store(ctx)?.user(id.into()).await.map_err(field_error)?;
        Ok(user.map(Into::into))
    }

    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserGql>> {
        let users = store(ctx)?
            .users(UserFilter::default())
            .await
            .map_err(field_error)?;
        Ok(users.into_iter().map(Into::into).collect())
    }
}
