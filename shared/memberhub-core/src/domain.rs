//! Domain rows shared by the store and the API layer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::MemberhubError;

/// Membership tier identifier. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberTypeId {
    Basic,
    Business,
}

impl MemberTypeId {
    pub const ALL: [MemberTypeId; 2] = [MemberTypeId::Basic, MemberTypeId::Business];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Business => "business",
        }
    }
}

impl fmt::Display for MemberTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberTypeId {
    type Err = MemberhubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "business" => Ok(Self::Business),
            other => Err(MemberhubError::Validation(format!(
                "Unknown member type: {}",
                other
            ))),
        }
    }
}

/// Reference row describing a membership tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberType {
    pub id: MemberTypeId,
    pub discount: f64,
    pub posts_limit_per_month: i32,
}

impl MemberType {
    /// Tiers every fresh store is seeded with
    pub fn defaults() -> Vec<MemberType> {
        vec![
            MemberType {
                id: MemberTypeId::Basic,
                discount: 2.3,
                posts_limit_per_month: 20,
            },
            MemberType {
                id: MemberTypeId::Business,
                discount: 7.7,
                posts_limit_per_month: 100,
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub is_male: bool,
    pub year_of_birth: i32,
    pub user_id: Uuid,
    pub member_type_id: MemberTypeId,
}

/// Join row: `subscriber_id` follows `author_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription {
    pub subscriber_id: Uuid,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub balance: f64,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserChanges {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProfile {
    pub is_male: bool,
    pub year_of_birth: i32,
    pub member_type_id: MemberTypeId,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileChanges {
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
    pub member_type_id: Option<MemberTypeId>,
}

impl User {
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(balance) = changes.balance {
            self.balance = balance;
        }
    }
}

impl Post {
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(author_id) = changes.author_id {
            self.author_id = author_id;
        }
    }
}

impl Profile {
    pub fn apply(&mut self, changes: ProfileChanges) {
        if let Some(is_male) = changes.is_male {
            self.is_male = is_male;
        }
        if let Some(year_of_birth) = changes.year_of_birth {
            self.year_of_birth = year_of_birth;
        }
        if let Some(member_type_id) = changes.member_type_id {
            self.member_type_id = member_type_id;
        }
    }
}
