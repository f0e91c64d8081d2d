//! The store handle contract

use std::sync::Arc;

use async_trait::async_trait;
use memberhub_core::{
    MemberType, MemberTypeId, NewPost, NewProfile, NewUser, Post, PostChanges, Profile,
    ProfileChanges, User, UserChanges,
};
use uuid::Uuid;

use crate::Result;

/// Shared store handle passed to every resolver
pub type StoreHandle = Arc<dyn Store>;

/// Filter for `posts`; empty matches every row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub author_id: Option<Uuid>,
}

/// Filter for `users` over the subscription relation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Authors the given user is subscribed to
    pub subscribed_by: Option<Uuid>,
    /// Users subscribed to the given author
    pub subscribers_of: Option<Uuid>,
}

impl PostFilter {
    pub fn by_author(author_id: Uuid) -> Self {
        Self {
            author_id: Some(author_id),
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.author_id.map_or(true, |id| post.author_id == id)
    }
}

impl UserFilter {
    pub fn subscribed_by(subscriber_id: Uuid) -> Self {
        Self {
            subscribed_by: Some(subscriber_id),
            ..Default::default()
        }
    }

    pub fn subscribers_of(author_id: Uuid) -> Self {
        Self {
            subscribers_of: Some(author_id),
            ..Default::default()
        }
    }
}

/// Relational store operations.
///
/// Lookups by id return `Ok(None)` when nothing matches. Updates and deletes
/// of a missing row fail with [`StoreError::NotFound`](crate::StoreError::NotFound).
/// Every method is a single store operation.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn member_type(&self, id: MemberTypeId) -> Result<Option<MemberType>>;
    async fn member_types(&self) -> Result<Vec<MemberType>>;

    async fn post(&self, id: Uuid) -> Result<Option<Post>>;
    async fn posts(&self, filter: PostFilter) -> Result<Vec<Post>>;
    async fn create_post(&self, input: NewPost) -> Result<Post>;
    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Post>;
    async fn delete_post(&self, id: Uuid) -> Result<()>;

    async fn profile(&self, id: Uuid) -> Result<Option<Profile>>;
    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>>;
    async fn profiles(&self) -> Result<Vec<Profile>>;
    async fn create_profile(&self, input: NewProfile) -> Result<Profile>;
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Profile>;
    async fn delete_profile(&self, id: Uuid) -> Result<()>;

    async fn user(&self, id: Uuid) -> Result<Option<User>>;
    async fn users(&self, filter: UserFilter) -> Result<Vec<User>>;
    async fn create_user(&self, input: NewUser) -> Result<User>;
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User>;
    async fn delete_user(&self, id: Uuid) -> Result<()>;

    /// Create the `(subscriber, author)` join row and return the subscriber
    async fn subscribe(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<User>;
    /// Remove the join row identified by its unique pair
    async fn unsubscribe(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<()>;

    /// Cheap liveness probe used by readiness checks
    async fn ping(&self) -> bool;
}
