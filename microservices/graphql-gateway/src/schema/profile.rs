use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject};
use memberhub_core::{NewProfile, Profile, ProfileChanges};

use super::{field_error, store, MemberGql, MemberTypeIdGql, UuidScalar};

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Profile", complex)]
pub struct ProfileGql {
    pub id: UuidScalar,
    pub is_male: bool,
    pub year_of_birth: i32,
    pub user_id: UuidScalar,
    pub member_type_id: MemberTypeIdGql,
}

#[ComplexObject]
impl ProfileGql {
    /// Tier referenced by `memberTypeId`
    async fn member_type(&self, ctx: &Context<'_>) -> Result<Option<MemberGql>> {
        let member_type = store(ctx)?
            .member_type(self.member_type_id.into())
            .await
            .map_err(field_error)?;
        Ok(member_type.map(Into::into))
    }
}

impl From<Profile> for ProfileGql {
    fn from(row: Profile) -> Self {
        Self {
            id: row.id.into(),
            is_male: row.is_male,
            year_of_birth: row.year_of_birth,
            user_id: row.user_id.into(),
            member_type_id: row.member_type_id.into(),
        }
    }
}

#[derive(InputObject, Debug)]
#[graphql(name = "CreateProfileInput")]
pub struct CreateProfileInput {
    pub is_male: bool,
    pub year_of_birth: i32,
    pub member_type_id: MemberTypeIdGql,
    pub user_id: UuidScalar,
}

impl From<CreateProfileInput> for NewProfile {
    fn from(dto: CreateProfileInput) -> Self {
        Self {
            is_male: dto.is_male,
            year_of_birth: dto.year_of_birth,
            member_type_id: dto.member_type_id.into(),
            user_id: dto.user_id.into(),
        }
    }
}

/// The owning user cannot be reassigned.
#[derive(InputObject, Debug)]
#[graphql(name = "ChangeProfileInput")]
pub struct ChangeProfileInput {
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
    pub member_type_id: Option<MemberTypeIdGql>,
}

impl From<ChangeProfileInput> for ProfileChanges {
    fn from(dto: ChangeProfileInput) -> Self {
        Self {
            is_male: dto.is_male,
            year_of_birth: dto.year_of_birth,
            member_type_id: dto.member_type_id.map(Into::into),
        }
    }
}
