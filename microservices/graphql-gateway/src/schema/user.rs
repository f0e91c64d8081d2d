//! User type and its relation resolvers
//!
//! Each relation field issues its own store call per parent row.

use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject};
use memberhub_core::{NewUser, User, UserChanges};
use memberhub_store::{PostFilter, UserFilter};

use super::{field_error, store, PostGql, ProfileGql, UuidScalar};

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "User", complex)]
pub struct UserGql {
    pub id: UuidScalar,
    pub name: String,
    pub balance: f64,
}

#[ComplexObject]
impl UserGql {
    async fn profile(&self, ctx: &Context<'_>) -> Result<Option<ProfileGql>> {
        let profile = store(ctx)?
            .profile_by_user(self.id.into())
            .await
            .map_err(field_error)?;
        Ok(profile.map(Into::into))
    }

    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostGql>> {
        let posts = store(ctx)?
            .posts(PostFilter::by_author(self.id.into()))
            .await
            .map_err(field_error)?;
        Ok(posts.into_iter().map(Into::into).collect())
    }

    /// Authors this user is subscribed to
    async fn user_subscribed_to(&self, ctx: &Context<'_>) -> Result<Vec<UserGql>> {
        let authors = store(ctx)?
            .users(UserFilter::subscribed_by(self.id.into()))
            .await
            .map_err(field_error)?;
        Ok(authors.into_iter().map(Into::into).collect())
    }

    /// Users subscribed to this user
    async fn subscribed_to_user(&self, ctx: &Context<'_>) -> Result<Vec<UserGql>> {
        let subscribers = store(ctx)?
            .users(UserFilter::subscribers_of(self.id.into()))
            .await
            .map_err(field_error)?;
        Ok(subscribers.into_iter().map(Into::into).collect())
    }
}

impl From<User> for UserGql {
    fn from(row: User) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            balance: row.balance,
        }
    }
}

#[derive(InputObject, Debug)]
#[graphql(name = "CreateUserInput")]
pub struct CreateUserInput {
    pub name: String,
    pub balance: f64,
}

impl From<CreateUserInput> for NewUser {
    fn from(dto: CreateUserInput) -> Self {
        Self {
            name: dto.name,
            balance: dto.balance,
        }
    }
}

#[derive(InputObject, Debug)]
#[graphql(name = "ChangeUserInput")]
pub struct ChangeUserInput {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

impl From<ChangeUserInput> for UserChanges {
    fn from(dto: ChangeUserInput) -> Self {
        Self {
            name: dto.name,
            balance: dto.balance,
        }
    }
}
