use std::io::IsTerminal;

use colored::Colorize;

use crate::client::Ya360Client;
use crate::config::{open_store, ConfigStore, Endpoints};
use crate::error::Ya360Error;
use crate::oauth::{authorize_url, ClientCredentials};
use crate::params::OrderBy;
use crate::resources::{departments, groups, organizations, users};

use super::output::{print_listing, print_record, render_members, OutputMode};

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub verification_code: Option<String>,
    pub json: bool,
}

impl GlobalOptions {
    fn mode(&self) -> OutputMode {
        OutputMode::from_flag(self.json)
    }

    /// Credentials given on the command line or in the environment.
    ///
    /// A client id and secret form a full set. A lone verification code is
    /// attached to the stored credentials.
    pub fn credentials(
        &self,
        store: &dyn ConfigStore,
    ) -> Result<Option<ClientCredentials>, Ya360Error> {
        let provided = match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Some(ClientCredentials::new(id, secret)),
            _ => match &self.verification_code {
                Some(_) => ClientCredentials::load(store)?,
                None => None,
            },
        };
        Ok(provided.map(|creds| match &self.verification_code {
            Some(code) => creds.with_verification_code(code),
            None => creds,
        }))
    }
}

/// Open the config store, build a client and obtain a token.
pub async fn open_client(opts: &GlobalOptions) -> Result<Ya360Client, Ya360Error> {
    let store = open_store(opts.config.as_deref())?;
    let credentials = opts.credentials(&store)?;
    let mut client =
        Ya360Client::from_store(Box::new(store), credentials, &Endpoints::from_env())?;
    client.start().await?;
    Ok(client)
}

/// Print the consent page URL and optionally open it in a browser.
pub async fn run_authorize_url(opts: &GlobalOptions, open: bool) -> Result<(), Ya360Error> {
    let client_id = match &opts.client_id {
        Some(id) => id.clone(),
        None => {
            let store = open_store(opts.config.as_deref())?;
            ClientCredentials::load(&store)?
                .map(|c| c.client_id)
                .ok_or_else(|| Ya360Error::ConfigError {
                    path: store.path().to_path_buf(),
                    detail: "No client_id provided or stored".to_string(),
                })?
        }
    };

    let url = authorize_url(&Endpoints::from_env().authorize_url, &client_id);
    println!("{url}");
    if open {
        if let Err(e) = webbrowser::open(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }
    Ok(())
}

/// Obtain a token and report it.
pub async fn run_auth(opts: &GlobalOptions) -> Result<(), Ya360Error> {
    let client = open_client(opts).await?;
    let auth = client.auth();
    if opts.json {
        let token = auth.token();
        let report = serde_json::json!({
            "authenticated": client.is_authenticated(),
            "tokenType": token.map(|t| t.token_type.clone()),
            "expiresAt": auth.expires_at().map(|t| t.to_rfc3339()),
        });
        println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
        return Ok(());
    }

    let done = "Authentication successful";
    if std::io::stdout().is_terminal() {
        println!("{}", done.green());
    } else {
        println!("{done}");
    }
    if let Some(expires) = auth.expires_at() {
        println!("Token expires: {}", expires.to_rfc3339());
    }
    Ok(())
}

pub async fn run_orgs(opts: &GlobalOptions) -> Result<(), Ya360Error> {
    let client = open_client(opts).await?;
    let listing = organizations::list(&client).await?;
    print_listing(&listing, opts.mode(), std::io::stdout().is_terminal());
    Ok(())
}

pub async fn run_users(opts: &GlobalOptions, org_id: &str) -> Result<(), Ya360Error> {
    let client = open_client(opts).await?;
    let listing = users::list(&client, org_id).await?;
    print_listing(&listing, opts.mode(), std::io::stdout().is_terminal());
    Ok(())
}

pub async fn run_user(opts: &GlobalOptions, org_id: &str, user_id: &str) -> Result<(), Ya360Error> {
    let client = open_client(opts).await?;
    let user = users::get(&client, org_id, user_id).await?;
    print_record(&user, opts.mode());
    Ok(())
}

pub async fn run_groups(opts: &GlobalOptions, org_id: &str) -> Result<(), Ya360Error> {
    let client = open_client(opts).await?;
    let listing = groups::list(&client, org_id).await?;
    print_listing(&listing, opts.mode(), std::io::stdout().is_terminal());
    Ok(())
}

pub async fn run_group(opts: &GlobalOptions, org_id: &str, group_id: &str) -> Result<(), Ya360Error> {
    let client = open_client(opts).await?;
    let group = groups::get(&client, org_id, group_id).await?;
    print_record(&group, opts.mode());
    Ok(())
}

pub async fn run_group_members(
    opts: &GlobalOptions,
    org_id: &str,
    group_id: &str,
) -> Result<(), Ya360Error> {
    let client = open_client(opts).await?;
    let members = groups::members(&client, org_id, group_id).await?;
    println!(
        "{}",
        render_members(&members, opts.mode(), std::io::stdout().is_terminal())
    );
    Ok(())
}

pub async fn run_user_groups(
    opts: &GlobalOptions,
    org_id: &str,
    user_id: &str,
) -> Result<(), Ya360Error> {
    let client = open_client(opts).await?;
    let listing = groups::member_of(&client, org_id, user_id).await?;
    print_listing(&listing, opts.mode(), std::io::stdout().is_terminal());
    Ok(())
}

pub async fn run_departments(
    opts: &GlobalOptions,
    org_id: &str,
    order_by: Option<OrderBy>,
    parent_id: Option<&str>,
) -> Result<(), Ya360Error> {
    let client = open_client(opts).await?;
    let listing = departments::list(&client, org_id, order_by, parent_id).await?;
    print_listing(&listing, opts.mode(), std::io::stdout().is_terminal());
    Ok(())
}

pub async fn run_department(
    opts: &GlobalOptions,
    org_id: &str,
    department_id: &str,
) -> Result<(), Ya360Error> {
    let client = open_client(opts).await?;
    let department = departments::get(&client, org_id, department_id).await?;
    print_record(&department, opts.mode());
    Ok(())
}
