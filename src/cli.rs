use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::product_service_client::ProductServiceClient;
use crate::config::Config;
use crate::models::{Banner, CreateItemRequest, FixtureUser, ItemsQuery};
use crate::services::{burst_service, seed_service, session_service, smoke_service};
use crate::utils::output::render_json;

/// System-test harness for the Vachaar product API
#[derive(Parser, Debug)]
#[command(name = "vachaar-smoke")]
#[command(about = "Seed fixtures and exercise the product API", long_about = None)]
pub struct Cli {
    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override the fixture database URL
    #[arg(long, global = true)]
    pub db_url: Option<String>,

    /// Indent JSON written to stdout
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seed fixtures, log in, then burst item listings (the default)
    Run,

    /// Insert the fixture users
    Seed {
        /// Skip users that already exist instead of failing
        #[arg(long)]
        skip_existing: bool,
    },

    /// Delete the fixture users
    Unseed,

    /// Log in with the fixture credentials and show the session
    Login,

    /// Product item routes
    #[command(subcommand)]
    Items(ItemsCommands),

    /// Issue concurrent identical item listings
    Burst {
        /// Number of concurrent listings (defaults to the configured burst size)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Check login, listing consistency and the missing-item status
    Smoke {
        /// Seed fixtures first, skipping users that already exist
        #[arg(long)]
        seed: bool,

        /// Item id expected not to exist
        #[arg(long)]
        missing_id: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemsCommands {
    /// List items
    List(ListArgs),

    /// Fetch one item
    Get {
        id: i64,
    },

    /// Create an item as the fixture user
    Create(CreateArgs),
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub page_size: Option<u32>,
    /// Match against item titles
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
    /// e.g. `price` or `-created_at`
    #[arg(long)]
    pub ordering: Option<String>,
}

impl From<ListArgs> for ItemsQuery {
    fn from(args: ListArgs) -> Self {
        ItemsQuery {
            page: args.page,
            page_size: args.page_size,
            search: args.search,
            category: args.category,
            price_gte: args.min_price,
            price_lte: args.max_price,
            ordering: args.ordering,
        }
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub category: i64,
    #[arg(long)]
    pub price: i64,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Banner as IMAGE_ID:ORDER, repeatable
    #[arg(long = "banner", value_parser = parse_banner)]
    pub banners: Vec<Banner>,
}

impl From<CreateArgs> for CreateItemRequest {
    fn from(args: CreateArgs) -> Self {
        CreateItemRequest {
            title: args.title,
            category: args.category,
            price: args.price,
            description: args.description,
            banners: args.banners,
        }
    }
}

fn parse_banner(raw: &str) -> Result<Banner, String> {
    let (image_id, order) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected IMAGE_ID:ORDER, got '{}'", raw))?;
    let image_id = image_id
        .trim()
        .parse()
        .map_err(|e| format!("invalid image id '{}': {}", image_id, e))?;
    let order = order
        .trim()
        .parse()
        .map_err(|e| format!("invalid order '{}': {}", order, e))?;
    Ok(Banner { image_id, order })
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(db_url) = &self.db_url {
            config.db_url = db_url.clone();
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let rendered = render_json(value, pretty).context("failed to render output")?;
    println!("{}", rendered);
    Ok(())
}

/// Execute CLI command
///
/// Any error returned here ends the process with a failure status.
pub async fn execute_command(cli: Cli, config: Config) -> anyhow::Result<()> {
    let pretty = cli.pretty;
    let fixtures = FixtureUser::defaults(&config);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            seed_service::seed_fixtures(&config.db_url, &fixtures, false)
                .await
                .context("fixture seeding failed")?;

            let client = Arc::new(ProductServiceClient::new(&config)?);
            match client.login(&config.login_request()).await {
                Ok(session) => info!("Token: {}", session.token()),
                Err(e) => warn!("Login failed: {}", e),
            }

            burst_service::run_burst(client, config.burst_size, pretty).await;
        }
        Commands::Seed { skip_existing } => {
            let inserted = seed_service::seed_fixtures(&config.db_url, &fixtures, skip_existing)
                .await
                .context("fixture seeding failed")?;
            print_json(&json!({ "inserted": inserted }), pretty)?;
        }
        Commands::Unseed => {
            let deleted = seed_service::remove_fixtures(&config.db_url, &fixtures)
                .await
                .context("fixture removal failed")?;
            print_json(&json!({ "deleted": deleted }), pretty)?;
        }
        Commands::Login => {
            let client = ProductServiceClient::new(&config)?;
            let session = client
                .login(&config.login_request())
                .await
                .context("login failed")?;

            let claims = match session_service::inspect_token(session.token()) {
                Ok(claims) => {
                    if let Some(at) = claims.expires_at() {
                        info!("Session token expires at {}", at.to_rfc3339());
                    }
                    Some(claims)
                }
                Err(e) => {
                    warn!("Session token is not a readable JWT: {}", e);
                    None
                }
            };

            print_json(
                &json!({
                    "token": session.token(),
                    "cookies": session.cookies,
                    "claims": claims,
                }),
                pretty,
            )?;
        }
        Commands::Items(ItemsCommands::List(args)) => {
            let client = ProductServiceClient::new(&config)?;
            let page = client
                .get_all_items(&ItemsQuery::from(args))
                .await
                .context("listing items failed")?;
            print_json(&page, pretty)?;
        }
        Commands::Items(ItemsCommands::Get { id }) => {
            let client = ProductServiceClient::new(&config)?;
            let item = client
                .get_item(id)
                .await
                .with_context(|| format!("fetching item {} failed", id))?;
            print_json(&item, pretty)?;
        }
        Commands::Items(ItemsCommands::Create(args)) => {
            let client = ProductServiceClient::new(&config)?;
            let session = client
                .login(&config.login_request())
                .await
                .context("login failed")?;
            let item_id = client
                .create_item(&CreateItemRequest::from(args), Some(&session))
                .await
                .context("creating item failed")?;
            print_json(&json!({ "item_id": item_id }), pretty)?;
        }
        Commands::Burst { count } => {
            let client = Arc::new(ProductServiceClient::new(&config)?);
            let size = count.unwrap_or(config.burst_size);
            let summary = burst_service::run_burst(client, size, pretty).await;
            if summary.failed > 0 {
                bail!("{} of {} listings failed", summary.failed, size);
            }
        }
        Commands::Smoke { seed, missing_id } => {
            if seed {
                seed_service::seed_fixtures(&config.db_url, &fixtures, true)
                    .await
                    .context("fixture seeding failed")?;
            }

            let client = ProductServiceClient::new(&config)?;
            let report = smoke_service::run_smoke(
                &client,
                &config.login_request(),
                missing_id.unwrap_or(config.missing_item_id),
            )
            .await;
            print_json(&report, pretty)?;

            if !report.passed() {
                let failed = report.checks.iter().filter(|c| !c.passed).count();
                bail!("{} smoke check(s) failed", failed);
            }
        }
    }

    Ok(())
}
