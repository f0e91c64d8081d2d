//! Member types (reference data)

use async_graphql::{Enum, SimpleObject};
use memberhub_core::{MemberType, MemberTypeId};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[graphql(name = "MemberTypeId")]
pub enum MemberTypeIdGql {
    #[graphql(name = "basic")]
    Basic,
    #[graphql(name = "business")]
    Business,
}

impl From<MemberTypeId> for MemberTypeIdGql {
    fn from(id: MemberTypeId) -> Self {
        match id {
            MemberTypeId::Basic => Self::Basic,
            MemberTypeId::Business => Self::Business,
        }
    }
}

impl From<MemberTypeIdGql> for MemberTypeId {
    fn from(id: MemberTypeIdGql) -> Self {
        match id {
            MemberTypeIdGql::Basic => Self::Basic,
            MemberTypeIdGql::Business => Self::Business,
        }
    }
}

/// Membership tier
#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Member")]
pub struct MemberGql {
    pub id: MemberTypeIdGql,
    pub discount: f64,
    pub posts_limit_per_month: i32,
}

impl From<MemberType> for MemberGql {
    fn from(row: MemberType) -> Self {
        Self {
            id: row.id.into(),
            discount: row.discount,
            posts_limit_per_month: row.posts_limit_per_month,
        }
    }
}
