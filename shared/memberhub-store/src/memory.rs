//! In-memory store
//!
//! Mirrors the PostgreSQL schema's constraints (unique profile per user,
//! unique subscription pair, foreign keys, cascading user deletes) so the
//! API behaves the same against either backend.

use async_trait::async_trait;
use memberhub_core::{
    MemberType, MemberTypeId, NewPost, NewProfile, NewUser, Post, PostChanges, Profile,
    ProfileChanges, Subscription, User, UserChanges,
};
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::{PostFilter, Result, Store, StoreError, UserFilter};

#[derive(Default)]
struct Tables {
    member_types: Vec<MemberType>,
    users: Vec<User>,
    posts: Vec<Post>,
    profiles: Vec<Profile>,
    subscriptions: Vec<Subscription>,
}

impl Tables {
    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn member_type_exists(&self, id: MemberTypeId) -> bool {
        self.member_types.iter().any(|m| m.id == id)
    }

    fn is_subscribed(&self, subscriber_id: Uuid, author_id: Uuid) -> bool {
        self.subscriptions
            .iter()
            .any(|s| s.subscriber_id == subscriber_id && s.author_id == author_id)
    }

    fn matches(&self, user: &User, filter: &UserFilter) -> bool {
        let by = filter
            .subscribed_by
            .map_or(true, |subscriber| self.is_subscribed(subscriber, user.id));
        let of = filter
            .subscribers_of
            .map_or(true, |author| self.is_subscribed(user.id, author));
        by && of
    }
}

/// Store keeping every table in process memory
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Empty store seeded with the default member types
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                member_types: MemberType::defaults(),
                ..Default::default()
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn member_type(&self, id: MemberTypeId) -> Result<Option<MemberType>> {
        let tables = self.tables.read();
        Ok(tables.member_types.iter().find(|m| m.id == id).cloned())
    }

    async fn member_types(&self) -> Result<Vec<MemberType>> {
        Ok(self.tables.read().member_types.clone())
    }

    async fn post(&self, id: Uuid) -> Result<Option<Post>> {
        let tables = self.tables.read();
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn posts(&self, filter: PostFilter) -> Result<Vec<Post>> {
        let tables = self.tables.read();
        Ok(tables
            .posts
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn create_post(&self, input: NewPost) -> Result<Post> {
        let mut tables = self.tables.write();
        if !tables.user_exists(input.author_id) {
            return Err(StoreError::ForeignKeyViolation(
                "posts_author_id_fkey".to_string(),
            ));
        }

        let post = Post {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            author_id: input.author_id,
        };
        tables.posts.push(post.clone());
        debug!(post_id = %post.id, "Post created");
        Ok(post)
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Post> {
        let mut tables = self.tables.write();
        let idx = tables
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Post", id))?;
        if let Some(author_id) = changes.author_id {
            if !tables.user_exists(author_id) {
                return Err(StoreError::ForeignKeyViolation(
                    "posts_author_id_fkey".to_string(),
                ));
            }
        }

        let post = &mut tables.posts[idx];
        post.apply(changes);
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<()> {
        let mut tables = self.tables.write();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Err(StoreError::not_found("Post", id));
        }
        Ok(())
    }

    async fn profile(&self, id: Uuid) -> Result<Option<Profile>> {
        let tables = self.tables.read();
        Ok(tables.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let tables = self.tables.read();
        Ok(tables
            .profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.tables.read().profiles.clone())
    }

    async fn create_profile(&self, input: NewProfile) -> Result<Profile> {
        let mut tables = self.tables.write();
        if tables.profiles.iter().any(|p| p.user_id == input.user_id) {
            return Err(StoreError::UniqueViolation(
                "profiles_user_id_key".to_string(),
            ));
        }
        if !tables.user_exists(input.user_id) {
            return Err(StoreError::ForeignKeyViolation(
                "profiles_user_id_fkey".to_string(),
            ));
        }
        if !tables.member_type_exists(input.member_type_id) {
            return Err(StoreError::ForeignKeyViolation(
                "profiles_member_type_id_fkey".to_string(),
            ));
        }

        let profile = Profile {
            id: Uuid::new_v4(),
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            user_id: input.user_id,
            member_type_id: input.member_type_id,
        };
        tables.profiles.push(profile.clone());
        debug!(profile_id = %profile.id, user_id = %profile.user_id, "Profile created");
        Ok(profile)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Profile> {
        let mut tables = self.tables.write();
        let idx = tables
            .profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Profile", id))?;
        if let Some(member_type_id) = changes.member_type_id {
            if !tables.member_type_exists(member_type_id) {
                return Err(StoreError::ForeignKeyViolation(
                    "profiles_member_type_id_fkey".to_string(),
                ));
            }
        }

        let profile = &mut tables.profiles[idx];
        profile.apply(changes);
        Ok(profile.clone())
    }

    async fn delete_profile(&self, id: Uuid) -> Result<()> {
        let mut tables = self.tables.write();
        let before = tables.profiles.len();
        tables.profiles.retain(|p| p.id != id);
        if tables.profiles.len() == before {
            return Err(StoreError::not_found("Profile", id));
        }
        Ok(())
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn users(&self, filter: UserFilter) -> Result<Vec<User>> {
        let tables = self.tables.read();
        Ok(tables
            .users
            .iter()
            .filter(|u| tables.matches(u, &filter))
            .cloned()
            .collect())
    }

    async fn create_user(&self, input: NewUser) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            name: input.name,
            balance: input.balance,
        };
        self.tables.write().users.push(user.clone());
        debug!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User> {
        let mut tables = self.tables.write();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::not_found("User", id))?;
        user.apply(changes);
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let mut tables = self.tables.write();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(StoreError::not_found("User", id));
        }

        // ON DELETE CASCADE
        tables.profiles.retain(|p| p.user_id != id);
        tables.posts.retain(|p| p.author_id != id);
        tables
            .subscriptions
            .retain(|s| s.subscriber_id != id && s.author_id != id);
        Ok(())
    }

    async fn subscribe(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<User> {
        let mut tables = self.tables.write();
        let subscriber = tables
            .users
            .iter()
            .find(|u| u.id == subscriber_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("User", subscriber_id))?;
        if !tables.user_exists(author_id) {
            return Err(StoreError::ForeignKeyViolation(
                "subscribers_on_authors_author_id_fkey".to_string(),
            ));
        }
        if tables.is_subscribed(subscriber_id, author_id) {
            return Err(StoreError::UniqueViolation(
                "subscribers_on_authors_pkey".to_string(),
            ));
        }

        tables.subscriptions.push(Subscription {
            subscriber_id,
            author_id,
        });
        Ok(subscriber)
    }

    async fn unsubscribe(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write();
        let before = tables.subscriptions.len();
        tables
            .subscriptions
            .retain(|s| !(s.subscriber_id == subscriber_id && s.author_id == author_id));
        if tables.subscriptions.len() == before {
            return Err(StoreError::not_found(
                "Subscription",
                format!("{}->{}", subscriber_id, author_id),
            ));
        }
        Ok(())
    }

    async fn ping(&self) -> bool {
        true
    }
}
