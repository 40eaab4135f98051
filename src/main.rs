use clap::{Args, Parser, Subcommand};

use ya360::cli::commands::{self, GlobalOptions};
use ya360::OrderBy;

#[derive(Parser)]
#[command(name = "ya360", version, about = "Query the Yandex 360 directory API")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<String>,

    /// OAuth application id
    #[arg(long, global = true, env = "YA360_CLIENT_ID")]
    client_id: Option<String>,

    /// OAuth application secret
    #[arg(long, global = true, env = "YA360_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Verification code from the consent page
    #[arg(long, global = true, env = "YA360_VERIFICATION_CODE", hide_env_values = true)]
    verification_code: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the OAuth consent page URL
    #[command(name = "authorize-url")]
    AuthorizeUrl {
        /// Open the URL in a browser
        #[arg(long)]
        open: bool,
    },

    /// Obtain or refresh the access token
    Auth,

    /// List organizations visible to the token
    Orgs,

    /// List users of an organization
    Users { org_id: String },

    /// Show a single user
    User { org_id: String, user_id: String },

    /// List groups of an organization
    Groups { org_id: String },

    /// Show a single group
    Group { org_id: String, group_id: String },

    /// Show the expanded membership of a group
    #[command(name = "group-members")]
    GroupMembers { org_id: String, group_id: String },

    /// List groups that have a user as a direct member
    #[command(name = "user-groups")]
    UserGroups { org_id: String, user_id: String },

    /// List departments of an organization
    Departments {
        org_id: String,

        /// Sort order: id or name
        #[arg(long)]
        order_by: Option<OrderBy>,

        /// Only children of this department
        #[arg(long)]
        parent_id: Option<String>,
    },

    /// Show a single department
    Department { org_id: String, department_id: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("YA360_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = GlobalOptions {
        config: cli.global.config,
        client_id: cli.global.client_id,
        client_secret: cli.global.client_secret,
        verification_code: cli.global.verification_code,
        json: cli.global.json,
    };

    if let Err(e) = run(cli.command, &opts).await {
        ya360::cli::output::print_error(&e, opts.json);
        std::process::exit(1);
    }
}

async fn run(command: Commands, opts: &GlobalOptions) -> Result<(), ya360::Ya360Error> {
    match command {
        Commands::AuthorizeUrl { open } => commands::run_authorize_url(opts, open).await,
        Commands::Auth => commands::run_auth(opts).await,
        Commands::Orgs => commands::run_orgs(opts).await,
        Commands::Users { org_id } => commands::run_users(opts, &org_id).await,
        Commands::User { org_id, user_id } => commands::run_user(opts, &org_id, &user_id).await,
        Commands::Groups { org_id } => commands::run_groups(opts, &org_id).await,
        Commands::Group { org_id, group_id } => {
            commands::run_group(opts, &org_id, &group_id).await
        }
        Commands::GroupMembers { org_id, group_id } => {
            commands::run_group_members(opts, &org_id, &group_id).await
        }
        Commands::UserGroups { org_id, user_id } => {
            commands::run_user_groups(opts, &org_id, &user_id).await
        }
        Commands::Departments {
            org_id,
            order_by,
            parent_id,
        } => commands::run_departments(opts, &org_id, order_by, parent_id.as_deref()).await,
        Commands::Department {
            org_id,
            department_id,
        } => commands::run_department(opts, &org_id, &department_id).await,
    }
}
