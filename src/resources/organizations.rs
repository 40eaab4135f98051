use serde::{Deserialize, Serialize};

use crate::client::Ya360Client;
use crate::error::Ya360Error;
use crate::params::RequestParams;
use crate::urls;

use super::de;
use super::listing::{decode_array, Listing};

/// Organizations are walked with `pageToken`, this many per request.
pub const ORGANIZATIONS_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub language: Option<String>,
    pub subscription_plan: Option<String>,
}

/// List every organization the token can see.
///
/// Follows `nextPageToken` until it comes back empty. A failed request stops
/// the walk; its 1-based step number is recorded in `failed_pages` and the
/// organizations gathered so far are returned.
pub async fn list(client: &Ya360Client) -> Result<Listing<Organization>, Ya360Error> {
    let url = urls::organizations();
    let mut listing = Listing::default();
    let mut token = String::new();

    for step in 1u32.. {
        let mut params = RequestParams::new().page_size(ORGANIZATIONS_PAGE_SIZE);
        if !token.is_empty() {
            params = params.page_token(token.clone());
        }

        let body = match client.get(&url, Some(&params)).await {
            Ok(body) => body,
            Err(e @ Ya360Error::NotAuthenticated) => return Err(e),
            Err(e) => {
                tracing::warn!(step, error = %e, "organization listing stopped");
                listing.failed_pages.push(step);
                break;
            }
        };

        match decode_array::<Organization>(&body, "organizations") {
            Ok(orgs) => {
                for org in orgs {
                    if !listing.items.contains(&org) {
                        listing.items.push(org);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(step, error = %e, "skipping undecodable organization page");
                listing.failed_pages.push(step);
            }
        }

        let next = body
            .get("nextPageToken")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string();
        if next.is_empty() || next == token {
            break;
        }
        token = next;
    }

    Ok(listing)
}
