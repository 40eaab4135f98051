use futures::future::try_join_all;
use serde::{Deserialize, Deserializer, Serialize};

use crate::client::Ya360Client;
use crate::error::Ya360Error;
use crate::params::RequestParams;
use crate::urls;

use super::de;
use super::listing::{decode, fetch_listing, Listing};
use super::users::UserName;
use super::DEFAULT_PER_PAGE;

/// Kind of a group member. Unknown kinds are read as `User`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    #[default]
    User,
    Group,
    Department,
}

impl<'de> Deserialize<'de> for MemberType {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(match raw.as_deref() {
            Some("group") => MemberType::Group,
            Some("department") => MemberType::Department,
            _ => MemberType::User,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: MemberType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub name: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub external_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub author_id: Option<String>,
    pub created_at: Option<String>,
    pub members_count: Option<u64>,
    pub removed: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de::ids")]
    pub admin_ids: Vec<String>,
    #[serde(default, deserialize_with = "de::vec_or_null")]
    pub aliases: Vec<String>,
    #[serde(default, deserialize_with = "de::ids")]
    pub member_of: Vec<String>,
    #[serde(default, deserialize_with = "de::vec_or_null")]
    pub members: Vec<GroupMember>,
}

impl Group {
    /// Whether `user_id` is a direct user member of this group.
    pub fn has_user(&self, user_id: &str) -> bool {
        self.members
            .iter()
            .any(|m| m.kind == MemberType::User && m.id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUnit {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub name: Option<String>,
    pub members_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUser {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub department_id: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub position: Option<String>,
    pub avatar_id: Option<String>,
    pub name: Option<UserName>,
}

/// Expanded membership of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembers {
    #[serde(default, deserialize_with = "de::vec_or_null")]
    pub departments: Vec<ShortUnit>,
    #[serde(default, deserialize_with = "de::vec_or_null")]
    pub groups: Vec<ShortUnit>,
    #[serde(default, deserialize_with = "de::vec_or_null")]
    pub users: Vec<ShortUser>,
}

pub async fn list(client: &Ya360Client, org_id: &str) -> Result<Listing<Group>, Ya360Error> {
    fetch_listing(
        client,
        &urls::groups(org_id),
        &RequestParams::paged(1, DEFAULT_PER_PAGE),
        "groups",
    )
    .await
}

pub async fn get(client: &Ya360Client, org_id: &str, group_id: &str) -> Result<Group, Ya360Error> {
    let body = client.get(&urls::group(org_id, group_id), None).await?;
    decode(body, "group")
}

pub async fn get_many(
    client: &Ya360Client,
    org_id: &str,
    group_ids: &[String],
) -> Result<Vec<Group>, Ya360Error> {
    try_join_all(group_ids.iter().map(|id| get(client, org_id, id))).await
}

pub async fn members(
    client: &Ya360Client,
    org_id: &str,
    group_id: &str,
) -> Result<GroupMembers, Ya360Error> {
    let body = client.get(&urls::group_members(org_id, group_id), None).await?;
    decode(body, "group members")
}

pub async fn admins(
    client: &Ya360Client,
    org_id: &str,
    group_id: &str,
) -> Result<Vec<String>, Ya360Error> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Admins {
        #[serde(default, deserialize_with = "de::ids")]
        admin_ids: Vec<String>,
    }

    let body = client.get(&urls::group_admins(org_id, group_id), None).await?;
    decode::<Admins>(body, "group admins").map(|a| a.admin_ids)
}

/// Groups that list `user_id` as a direct member, re-fetched individually.
///
/// The scan runs over whatever the group listing could fetch; the returned
/// `failed_pages` are those of that listing.
pub async fn member_of(
    client: &Ya360Client,
    org_id: &str,
    user_id: &str,
) -> Result<Listing<Group>, Ya360Error> {
    let all = list(client, org_id).await?;
    let ids: Vec<String> = all
        .iter()
        .filter(|g| g.has_user(user_id))
        .map(|g| g.id.clone())
        .collect();
    Ok(Listing {
        items: get_many(client, org_id, &ids).await?,
        failed_pages: all.failed_pages,
    })
}
