//! Root mutation type
//!
//! Results are nullable so a failed mutation leaves `null` at its own path
//! without discarding sibling results.

use async_graphql::{Context, Object, Result};
use tracing::info;

use super::{
    field_error, store, ChangePostInput, ChangeProfileInput, ChangeUserInput, CreatePostInput,
    CreateProfileInput, CreateUserInput, DeleteAck, PostGql, ProfileGql, UserGql, UuidScalar,
};

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        dto: CreatePostInput,
    ) -> Result<Option<PostGql>> {
        let post = store(ctx)?
            .create_post(dto.into())
            .await
            .map_err(field_error)?;
        Ok(Some(post.into()))
    }

    async fn change_post(
        &self,
        ctx: &Context<'_>,
        id: UuidScalar,
        dto: ChangePostInput,
    ) -> Result<Option<PostGql>> {
        let post = store(ctx)?
            .update_post(id.into(), dto.into())
            .await
            .map_err(field_error)?;
        Ok(Some(post.into()))
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: UuidScalar) -> Result<Option<DeleteAck>> {
        store(ctx)?.delete_post(id.into()).await.map_err(field_error)?;
        info!(post_id = %id.0, "Post deleted");
        Ok(Some(DeleteAck))
    }

    async fn create_profile(
        &self,
        ctx: &Context<'_>,
        dto: CreateProfileInput,
    ) -> Result<Option<ProfileGql>> {
        let profile = store(ctx)?
            .create_profile(dto.into())
            .await
            .map_err(field_error)?;
        Ok(Some(profile.into()))
    }

    async fn change_profile(
        &self,
        ctx: &Context<'_>,
        id: UuidScalar,
        dto: ChangeProfileInput,
    ) -> Result<Option<ProfileGql>> {
        let profile = store(ctx)?
            .update_profile(id.into(), dto.into())
            .await
            .map_err(field_error)?;
        Ok(Some(profile.into()))
    }

    async fn delete_profile(
        &self,
        ctx: &Context<'_>,
        id: UuidScalar,
    ) -> Result<Option<DeleteAck>> {
        store(ctx)?
            .delete_profile(id.into())
            .await
            .map_err(field_error)?;
        info!(profile_id = %id.0, "Profile deleted");
        Ok(Some(DeleteAck))
    }

    async fn create_user(
        &self,
        ctx: &Context<'_>,
        dto: CreateUserInput,
    ) -> Result<Option<UserGql>> {
        let user = store(ctx)?
            .create_user(dto.into())
            .await
            .map_err(field_error)?;
        Ok(Some(user.into()))
    }

    async fn change_user(
        &self,
        ctx: &Context<'_>,
        id: UuidScalar,
        dto: ChangeUserInput,
    ) -> Result<Option<UserGql>> {
        let user = store(ctx)?
            .update_user(id.into(), dto.into())
            .await
            .map_err(field_error)?;
        Ok(Some(user.into()))
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: UuidScalar) -> Result<Option<DeleteAck>> {
        store(ctx)?.delete_user(id.into()).await.map_err(field_error)?;
        info!(user_id = %id.0, "User deleted");
        Ok(Some(DeleteAck))
    }

    /// Subscribe `userId` to `authorId`; returns the subscriber
    async fn subscribe_to(
        &self,
        ctx: &Context<'_>,
        user_id: UuidScalar,
        author_id: UuidScalar,
    ) -> Result<Option<UserGql>> {
        let user = store(ctx)?
            .subscribe(user_id.into(), author_id.into())
            .await
            .map_err(field_error)?;
        Ok(Some(user.into()))
    }

    async fn unsubscribe_from(
        &self,
        ctx: &Context<'_>,
        user_id: UuidScalar,
        author_id: UuidScalar,
    ) -> Result<Option<DeleteAck>> {
        store(ctx)?
            .unsubscribe(user_id.into(), author_id.into())
            .await
            .map_err(field_error)?;
        Ok(Some(DeleteAck))
    }
}
