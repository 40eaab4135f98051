use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::Ya360Client;
use crate::error::Ya360Error;
use crate::params::{OrderBy, RequestParams};
use crate::urls;

use super::de;
use super::listing::{decode, fetch_listing, Listing};
use super::DEFAULT_PER_PAGE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub name: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub external_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub head_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub parent_id: Option<String>,
    pub created_at: Option<String>,
    pub members_count: Option<u64>,
    #[serde(default, deserialize_with = "de::vec_or_null")]
    pub aliases: Vec<String>,
}

/// Departments of the organization, optionally ordered and restricted to the
/// children of `parent_id`.
pub async fn list(
    client: &Ya360Client,
    org_id: &str,
    order_by: Option<OrderBy>,
    parent_id: Option<&str>,
) -> Result<Listing<Department>, Ya360Error> {
    let mut params = RequestParams::paged(1, DEFAULT_PER_PAGE);
    if let Some(order) = order_by {
        params = params.order_by(order);
    }
    if let Some(parent) = parent_id {
        params = params.parent_id(parent);
    }
    fetch_listing(client, &urls::departments(org_id), &params, "departments").await
}

pub async fn get(
    client: &Ya360Client,
    org_id: &str,
    department_id: &str,
) -> Result<Department, Ya360Error> {
    let body = client
        .get(&urls::department(org_id, department_id), None)
        .await?;
    decode(body, "department")
}

pub async fn add_alias(
    client: &Ya360Client,
    org_id: &str,
    department_id: &str,
    alias: &str,
) -> Result<serde_json::Value, Ya360Error> {
    client
        .post(
            &urls::department_aliases(org_id, department_id, None),
            &json!({ "alias": alias }),
        )
        .await
}

pub async fn remove_alias(
    client: &Ya360Client,
    org_id: &str,
    department_id: &str,
    alias: &str,
) -> Result<serde_json::Value, Ya360Error> {
    client
        .delete(&urls::department_aliases(org_id, department_id, Some(alias)))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_department() {
        let dep: Department = serde_json::from_value(json!({
            "id": 11,
            "name": "Sales",
            "parentId": 1,
            "headId": "1130000067921268",
            "membersCount": 4,
            "aliases": ["sales"]
        }))
        .unwrap();
        assert_eq!(dep.id, "11");
        assert_eq!(dep.parent_id.as_deref(), Some("1"));
        assert_eq!(dep.members_count, Some(4));
        assert_eq!(dep.aliases, vec!["sales"]);
    }

    #[test]
    fn structural_equality_drives_dedup() {
        let a: Department = serde_json::from_value(json!({ "id": 1, "name": "A" })).unwrap();
        let b: Department = serde_json::from_value(json!({ "id": "1", "name": "A" })).unwrap();
        assert_eq!(a, b);
    }
}
