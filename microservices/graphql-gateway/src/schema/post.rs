use async_graphql::{InputObject, SimpleObject};
use memberhub_core::{NewPost, Post, PostChanges};

use super::UuidScalar;

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Post")]
pub struct PostGql {
    pub id: UuidScalar,
    pub title: String,
    pub content: String,
    pub author_id: UuidScalar,
}

impl From<Post> for PostGql {
    fn from(row: Post) -> Self {
        Self {
            id: row.id.into(),
            title: row.title,
            content: row.content,
            author_id: row.author_id.into(),
        }
    }
}

#[derive(InputObject, Debug)]
#[graphql(name = "CreatePostInput")]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub author_id: UuidScalar,
}

impl From<CreatePostInput> for NewPost {
    fn from(dto: CreatePostInput) -> Self {
        Self {
            title: dto.title,
            content: dto.content,
            author_id: dto.author_id.into(),
        }
    }
}

#[derive(InputObject, Debug)]
#[graphql(name = "ChangePostInput")]
pub struct ChangePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<UuidScalar>,
}

impl From<ChangePostInput> for PostChanges {
    fn from(dto: ChangePostInput) -> Self {
        Self {
            title: dto.title,
            content: dto.content,
            author_id: dto.author_id.map(Into::into),
        }
    }
}
