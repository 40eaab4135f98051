use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::Ya360Client;
use crate::error::Ya360Error;
use crate::params::RequestParams;
use crate::urls;

use super::de;
use super::listing::{decode, fetch_listing, Listing};
use super::DEFAULT_PER_PAGE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub last: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContact {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub label: Option<String>,
    pub main: Option<bool>,
    pub alias: Option<bool>,
    pub synthetic: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub department_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<UserName>,
    pub display_name: Option<String>,
    pub gender: Option<String>,
    pub position: Option<String>,
    pub avatar_id: Option<String>,
    pub about: Option<String>,
    pub birthday: Option<String>,
    pub external_id: Option<String>,
    pub is_admin: Option<bool>,
    pub is_robot: Option<bool>,
    pub is_dismissed: Option<bool>,
    pub is_enabled: Option<bool>,
    pub timezone: Option<String>,
    pub language: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "de::ids")]
    pub groups: Vec<String>,
    #[serde(default, deserialize_with = "de::vec_or_null")]
    pub contacts: Vec<UserContact>,
    #[serde(default, deserialize_with = "de::vec_or_null")]
    pub aliases: Vec<String>,
}

/// Contact entry sent when replacing a user's contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Partial user update. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<ContactInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<UserName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_change_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Two-factor authentication status of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorStatus {
    #[serde(deserialize_with = "de::id")]
    pub user_id: String,
    #[serde(default)]
    pub has2fa: bool,
    #[serde(default)]
    pub has_security_phone: bool,
}

/// Every user of the organization, de-duplicated.
pub async fn list(client: &Ya360Client, org_id: &str) -> Result<Listing<User>, Ya360Error> {
    list_with(client, org_id, &RequestParams::paged(1, DEFAULT_PER_PAGE)).await
}

pub async fn list_with(
    client: &Ya360Client,
    org_id: &str,
    params: &RequestParams,
) -> Result<Listing<User>, Ya360Error> {
    fetch_listing(client, &urls::users(org_id), params, "users").await
}

pub async fn get(client: &Ya360Client, org_id: &str, user_id: &str) -> Result<User, Ya360Error> {
    let body = client.get(&urls::user(org_id, user_id), None).await?;
    decode(body, "user")
}

/// Fetch several users concurrently; the first failure is returned.
pub async fn get_many(
    client: &Ya360Client,
    org_id: &str,
    user_ids: &[String],
) -> Result<Vec<User>, Ya360Error> {
    try_join_all(user_ids.iter().map(|id| get(client, org_id, id))).await
}

pub async fn update(
    client: &Ya360Client,
    org_id: &str,
    user_id: &str,
    changes: &UserUpdate,
) -> Result<User, Ya360Error> {
    let body = serde_json::to_value(changes)
        .map_err(|e| Ya360Error::Parse(format!("cannot encode user update: {e}")))?;
    let resp = client.patch(&urls::user(org_id, user_id), &body).await?;
    decode(resp, "user")
}

/// Replace the user's contacts.
pub async fn replace_contacts(
    client: &Ya360Client,
    org_id: &str,
    user_id: &str,
    contacts: &[ContactInput],
) -> Result<User, Ya360Error> {
    let resp = client
        .put(
            &urls::user_contacts(org_id, user_id),
            &json!({ "contacts": contacts }),
        )
        .await?;
    decode(resp, "user")
}

pub async fn two_factor_status(
    client: &Ya360Client,
    org_id: &str,
    user_id: &str,
) -> Result<TwoFactorStatus, Ya360Error> {
    let body = client.get(&urls::user_2fa(org_id, user_id), None).await?;
    decode(body, "2FA status")
}

pub async fn add_alias(
    client: &Ya360Client,
    org_id: &str,
    user_id: &str,
    alias: &str,
) -> Result<serde_json::Value, Ya360Error> {
    client
        .post(
            &urls::user_aliases(org_id, user_id, None),
            &json!({ "alias": alias }),
        )
        .await
}

pub async fn remove_alias(
    client: &Ya360Client,
    org_id: &str,
    user_id: &str,
    alias: &str,
) -> Result<serde_json::Value, Ya360Error> {
    client
        .delete(&urls::user_aliases(org_id, user_id, Some(alias)))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_user() {
        let user: User = serde_json::from_value(json!({
            "id": "1130000067921268",
            "nickname": "kav",
            "departmentId": 1,
            "email": "kav@example.org",
            "name": { "first": "KAV", "last": "KAV" },
            "isAdmin": false,
            "isEnabled": true,
            "groups": [19, 20],
            "contacts": [
                { "type": "email", "value": "kav@example.org", "main": true, "alias": false, "synthetic": true }
            ],
            "aliases": []
        }))
        .unwrap();
        assert_eq!(user.department_id.as_deref(), Some("1"));
        assert_eq!(user.groups, vec!["19", "20"]);
        assert_eq!(user.contacts[0].kind, "email");
        assert_eq!(user.name.unwrap().middle, None);
    }

    #[test]
    fn update_serializes_only_set_fields() {
        let changes = UserUpdate {
            password: Some("s3cret".into()),
            password_change_required: Some(true),
            ..UserUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({ "password": "s3cret", "passwordChangeRequired": true })
        );
        assert!(!changes.is_empty());
        assert!(UserUpdate::default().is_empty());
    }

    #[test]
    fn update_name_omits_missing_middle() {
        let changes = UserUpdate {
            name: Some(UserName {
                first: "Ivan".into(),
                last: "Petrov".into(),
                middle: None,
            }),
            ..UserUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({ "name": { "first": "Ivan", "last": "Petrov" } })
        );
    }

    #[test]
    fn contact_input_wire_form() {
        let contact = ContactInput {
            kind: "phone".into(),
            value: "+70000000000".into(),
            label: None,
        };
        assert_eq!(
            serde_json::to_value(&contact).unwrap(),
            json!({ "type": "phone", "value": "+70000000000" })
        );
    }

    #[test]
    fn deserialize_two_factor_status() {
        let status: TwoFactorStatus = serde_json::from_value(json!({
            "userId": "7",
            "has2fa": true,
            "hasSecurityPhone": false
        }))
        .unwrap();
        assert!(status.has2fa);
        assert!(!status.has_security_phone);
    }
}
