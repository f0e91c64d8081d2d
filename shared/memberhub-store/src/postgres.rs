//! PostgreSQL-backed store

use async_trait::async_trait;
use memberhub_core::{
    MemberType, MemberTypeId, NewPost, NewProfile, NewUser, Post, PostChanges, Profile,
    ProfileChanges, User, UserChanges,
};
use tokio_postgres::Row;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    PostFilter, Result, Store, StoreError, StorePool, UserFilter,
};

const MIGRATIONS: &str = include_str!("../migrations/0001_init.sql");

const USER_COLUMNS: &str = "id, name, balance";
const POST_COLUMNS: &str = "id, title, content, author_id";
const PROFILE_COLUMNS: &str = "id, is_male, year_of_birth, user_id, member_type_id";

/// Store over a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: StorePool,
}

impl PgStore {
    pub fn new(pool: StorePool) -> Self {
        Self { pool }
    }

    /// Create tables if missing and seed the member type reference rows
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> Result<()> {
        let conn = self.pool.get().await?;
        conn.batch_execute(MIGRATIONS).await?;

        for member_type in MemberType::defaults() {
            conn.execute(
                "INSERT INTO member_types (id, discount, posts_limit_per_month) \
                 VALUES ($1, $2, $3) ON CONFLICT (id) DO NOTHING",
                &[
                    &member_type.id.as_str(),
                    &member_type.discount,
                    &member_type.posts_limit_per_month,
                ],
            )
            .await?;
        }

        info!("Database schema is up to date");
        Ok(())
    }
}

fn member_type_from_row(row: &Row) -> Result<MemberType> {
    let id: String = row.try_get("id")?;
    Ok(MemberType {
        id: id
            .parse()
            .map_err(|_| StoreError::InvalidRow(format!("unknown member type {:?}", id)))?,
        discount: row.try_get("discount")?,
        posts_limit_per_month: row.try_get("posts_limit_per_month")?,
    })
}

fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        balance: row.try_get("balance")?,
    })
}

fn post_from_row(row: &Row) -> Result<Post> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        author_id: row.try_get("author_id")?,
    })
}

fn profile_from_row(row: &Row) -> Result<Profile> {
    let member_type_id: String = row.try_get("member_type_id")?;
    Ok(Profile {
        id: row.try_get("id")?,
        is_male: row.try_get("is_male")?,
        year_of_birth: row.try_get("year_of_birth")?,
        user_id: row.try_get("user_id")?,
        member_type_id: member_type_id.parse().map_err(|_| {
            StoreError::InvalidRow(format!("unknown member type {:?}", member_type_id))
        })?,
    })
}

fn collect<T>(rows: Vec<Row>, map: fn(&Row) -> Result<T>) -> Result<Vec<T>> {
    rows.iter().map(map).collect()
}

#[async_trait]
impl Store for PgStore {
    #[instrument(skip(self))]
    async fn member_type(&self, id: MemberTypeId) -> Result<Option<MemberType>> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                "SELECT id, discount, posts_limit_per_month FROM member_types WHERE id = $1",
                &[&id.as_str()],
            )
            .await?;
        row.as_ref().map(member_type_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn member_types(&self) -> Result<Vec<MemberType>> {
        let conn = self.pool.get().await?;
        let rows = conn
            .query(
                "SELECT id, discount, posts_limit_per_month FROM member_types",
                &[],
            )
            .await?;
        collect(rows, member_type_from_row)
    }

    #[instrument(skip(self))]
    async fn post(&self, id: Uuid) -> Result<Option<Post>> {
        let conn = self.pool.get().await?;
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        let row = conn.query_opt(&sql, &[&id]).await?;
        row.as_ref().map(post_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn posts(&self, filter: PostFilter) -> Result<Vec<Post>> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "SELECT {} FROM posts WHERE ($1::uuid IS NULL OR author_id = $1)",
            POST_COLUMNS
        );
        let rows = conn.query(&sql, &[&filter.author_id]).await?;
        collect(rows, post_from_row)
    }

    #[instrument(skip(self, input))]
    async fn create_post(&self, input: NewPost) -> Result<Post> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO posts ({0}) VALUES ($1, $2, $3, $4) RETURNING {0}",
            POST_COLUMNS
        );
        let row = conn
            .query_one(
                &sql,
                &[&Uuid::new_v4(), &input.title, &input.content, &input.author_id],
            )
            .await?;
        let post = post_from_row(&row)?;
        debug!(post_id = %post.id, "Post created");
        Ok(post)
    }

    #[instrument(skip(self, changes))]
    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Post> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "UPDATE posts SET \
                 title = COALESCE($2, title), \
                 content = COALESCE($3, content), \
                 author_id = COALESCE($4, author_id) \
             WHERE id = $1 RETURNING {}",
            POST_COLUMNS
        );
        let row = conn
            .query_opt(
                &sql,
                &[&id, &changes.title, &changes.content, &changes.author_id],
            )
            .await?
            .ok_or_else(|| StoreError::not_found("Post", id))?;
        post_from_row(&row)
    }

    #[instrument(skip(self))]
    async fn delete_post(&self, id: Uuid) -> Result<()> {
        let conn = self.pool.get().await?;
        match conn.execute("DELETE FROM posts WHERE id = $1", &[&id]).await? {
            0 => Err(StoreError::not_found("Post", id)),
            _ => Ok(()),
        }
    }

    #[instrument(skip(self))]
    async fn profile(&self, id: Uuid) -> Result<Option<Profile>> {
        let conn = self.pool.get().await?;
        let sql = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        let row = conn.query_opt(&sql, &[&id]).await?;
        row.as_ref().map(profile_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let conn = self.pool.get().await?;
        let sql = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);
        let row = conn.query_opt(&sql, &[&user_id]).await?;
        row.as_ref().map(profile_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn profiles(&self) -> Result<Vec<Profile>> {
        let conn = self.pool.get().await?;
        let sql = format!("SELECT {} FROM profiles", PROFILE_COLUMNS);
        let rows = conn.query(&sql, &[]).await?;
        collect(rows, profile_from_row)
    }

    #[instrument(skip(self, input))]
    async fn create_profile(&self, input: NewProfile) -> Result<Profile> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO profiles ({0}) VALUES ($1, $2, $3, $4, $5) RETURNING {0}",
            PROFILE_COLUMNS
        );
        let row = conn
            .query_one(
                &sql,
                &[
                    &Uuid::new_v4(),
                    &input.is_male,
                    &input.year_of_birth,
                    &input.user_id,
                    &input.member_type_id.as_str(),
                ],
            )
            .await?;
        let profile = profile_from_row(&row)?;
        debug!(profile_id = %profile.id, user_id = %profile.user_id, "Profile created");
        Ok(profile)
    }

    #[instrument(skip(self, changes))]
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Profile> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "UPDATE profiles SET \
                 is_male = COALESCE($2, is_male), \
                 year_of_birth = COALESCE($3, year_of_birth), \
                 member_type_id = COALESCE($4, member_type_id) \
             WHERE id = $1 RETURNING {}",
            PROFILE_COLUMNS
        );
        let member_type_id = changes.member_type_id.map(|id| id.as_str());
        let row = conn
            .query_opt(
                &sql,
                &[&id, &changes.is_male, &changes.year_of_birth, &member_type_id],
            )
            .await?
            .ok_or_else(|| StoreError::not_found("Profile", id))?;
        profile_from_row(&row)
    }

    #[instrument(skip(self))]
    async fn delete_profile(&self, id: Uuid) -> Result<()> {
        let conn = self.pool.get().await?;
        match conn
            .execute("DELETE FROM profiles WHERE id = $1", &[&id])
            .await?
        {
            0 => Err(StoreError::not_found("Profile", id)),
            _ => Ok(()),
        }
    }

    #[instrument(skip(self))]
    async fn user(&self, id: Uuid) -> Result<Option<User>> {
        let conn = self.pool.get().await?;
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = conn.query_opt(&sql, &[&id]).await?;
        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn users(&self, filter: UserFilter) -> Result<Vec<User>> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "SELECT {} FROM users u \
             WHERE ($1::uuid IS NULL OR EXISTS ( \
                 SELECT 1 FROM subscribers_on_authors s \
                 WHERE s.author_id = u.id AND s.subscriber_id = $1)) \
               AND ($2::uuid IS NULL OR EXISTS ( \
                 SELECT 1 FROM subscribers_on_authors s \
                 WHERE s.subscriber_id = u.id AND s.author_id = $2))",
            USER_COLUMNS
        );
        let rows = conn
            .query(&sql, &[&filter.subscribed_by, &filter.subscribers_of])
            .await?;
        collect(rows, user_from_row)
    }

    #[instrument(skip(self, input))]
    async fn create_user(&self, input: NewUser) -> Result<User> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO users ({0}) VALUES ($1, $2, $3) RETURNING {0}",
            USER_COLUMNS
        );
        let row = conn
            .query_one(&sql, &[&Uuid::new_v4(), &input.name, &input.balance])
            .await?;
        let user = user_from_row(&row)?;
        debug!(user_id = %user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(self, changes))]
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "UPDATE users SET \
                 name = COALESCE($2, name), \
                 balance = COALESCE($3, balance) \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let row = conn
            .query_opt(&sql, &[&id, &changes.name, &changes.balance])
            .await?
            .ok_or_else(|| StoreError::not_found("User", id))?;
        user_from_row(&row)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let conn = self.pool.get().await?;
        match conn.execute("DELETE FROM users WHERE id = $1", &[&id]).await? {
            0 => Err(StoreError::not_found("User", id)),
            _ => Ok(()),
        }
    }

    #[instrument(skip(self))]
    async fn subscribe(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<User> {
        let conn = self.pool.get().await?;
        // One statement: nothing is inserted when the subscriber is missing.
        let row = conn
            .query_opt(
                "WITH subscriber AS ( \
                     SELECT id, name, balance FROM users WHERE id = $1 \
                 ), link AS ( \
                     INSERT INTO subscribers_on_authors (subscriber_id, author_id) \
                     SELECT id, $2 FROM subscriber \
                     RETURNING subscriber_id \
                 ) \
                 SELECT s.id, s.name, s.balance FROM subscriber s \
                 JOIN link l ON l.subscriber_id = s.id",
                &[&subscriber_id, &author_id],
            )
            .await?
            .ok_or_else(|| StoreError::not_found("User", subscriber_id))?;
        user_from_row(&row)
    }

    #[instrument(skip(self))]
    async fn unsubscribe(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<()> {
        let conn = self.pool.get().await?;
        let deleted = conn
            .execute(
                "DELETE FROM subscribers_on_authors \
                 WHERE subscriber_id = $1 AND author_id = $2",
                &[&subscriber_id, &author_id],
            )
            .await?;
        match deleted {
            0 => Err(StoreError::not_found(
                "Subscription",
                format!("{}->{}", subscriber_id, author_id),
            )),
            _ => Ok(()),
        }
    }

    async fn ping(&self) -> bool {
        self.pool.is_healthy().await
    }
}
