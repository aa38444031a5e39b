//! marketdesk - Marketplace admin dashboard
//!
//! A terminal dashboard for browsing and managing a marketplace's users,
//! products, orders, categories and promotion plans.
//! Run without arguments to launch the TUI, or use subcommands for CLI mode.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use marketdesk::cli::commands::{Cli, Commands};
use marketdesk::cli::{auth, config, listing, payment, products};
use marketdesk::core::{Config, SessionContext};
use marketdesk::data::DataSource;
use marketdesk::error::Result;
use marketdesk::tui::App;

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Config commands run before the config file is loaded
    let command = match cli.command {
        Some(Commands::Config(args)) => return config::handle_config(args.command),
        other => other,
    };

    let settings = Config::load()?;
    let source = DataSource::with_dir(settings.data_dir.clone());

    match command {
        // No subcommand - launch TUI mode
        None => run_tui(settings, source).await,

        Some(Commands::Overview) => listing::handle_overview(&source),
        Some(Commands::Users(args)) => listing::handle_users(args.command, &source),
        Some(Commands::Products(args)) => {
            products::handle_products(args.command, &source, &settings).await
        }
        Some(Commands::Orders(args)) => listing::handle_orders(args.command, &source),
        Some(Commands::Categories(args)) => {
            listing::handle_categories(args.command, &source, &settings).await
        }
        Some(Commands::Promotions(args)) => {
            listing::handle_promotions(args.command, &source, &settings).await
        }
        Some(Commands::Payment(args)) => payment::handle_payment(args.command, &settings).await,
        Some(Commands::Auth(args)) => auth::handle_auth(args.command, &settings).await,
        Some(Commands::Config(_)) => unreachable!(),
    }
}

/// Run the TUI application
async fn run_tui(settings: Config, source: DataSource) -> Result<()> {
    let session = SessionContext::load()?;

    let mut app = App::new(settings, source, session);
    app.run().await
}
