//! CLI command definitions using clap
//!
//! Defines the command structure for the `marketdesk` CLI tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::Condition;
use crate::models::{
    CategorySort, OrderSort, OrderStatus, OrderTab, PaymentStatus, PlanStatus, ProductSort,
    PromotionSort, Role, UserSort,
};
use crate::records::{Choice, PriceRange, Recency};

/// marketdesk - Marketplace admin dashboard
///
/// Browse and manage marketplace users, products, orders, categories and
/// promotion plans. Run without arguments to launch the TUI.
#[derive(Parser, Debug)]
#[command(name = "marketdesk", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the overview dashboard figures
    Overview,

    /// Customer management
    Users(UsersArgs),

    /// Product catalog
    Products(ProductsArgs),

    /// Order tracking
    Orders(OrdersArgs),

    /// Category management
    Categories(CategoriesArgs),

    /// Promotion plans
    Promotions(PromotionsArgs),

    /// Payment return reconciliation
    Payment(PaymentArgs),

    /// Manage the backend session token
    Auth(AuthArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Output format for listings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Options shared by every `list` subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ListOptions {
    /// Case-insensitive search text
    #[arg(long, short)]
    pub search: Option<String>,

    /// Maximum number of rows to print
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List users (search matches username or email)
    List {
        #[command(flatten)]
        options: ListOptions,

        /// Role filter: all, admin, user
        #[arg(long, default_value = "all")]
        role: Choice<Role>,

        /// Sort: joined-desc, joined-asc, name-asc, name-desc
        #[arg(long)]
        sort: Option<UserSort>,
    },
    /// Show user statistics and charts
    Stats,
}

// ─────────────────────────────────────────────────────────────────────────────
// Products
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProductsCommand {
    /// List products (search matches name)
    List {
        #[command(flatten)]
        options: ListOptions,

        /// Price range: all, under100, 100to500, over500
        #[arg(long, default_value = "all")]
        price: PriceRange,

        /// Sort: price-asc, price-desc, views-desc, name-asc
        #[arg(long)]
        sort: Option<ProductSort>,
    },
    /// Show product statistics and charts
    Stats,
    /// Create a product on the backend, optionally with a paid promotion
    Create(CreateProductArgs),
    /// Update fields of a product on the backend
    Update {
        /// Product id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        /// Discount percentage
        #[arg(long)]
        discount: Option<f64>,

        #[arg(long)]
        subcategory: Option<String>,
    },
    /// Delete a product on the backend
    Delete {
        /// Product id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CreateProductArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    /// Category id
    #[arg(long)]
    pub category: String,

    #[arg(long)]
    pub subcategory: String,

    #[arg(long)]
    pub price: String,

    /// Product condition
    #[arg(long, value_enum, default_value_t = ConditionArg::New)]
    pub condition: ConditionArg,

    /// Image file (repeat up to 5 times)
    #[arg(long = "image", required = true)]
    pub images: Vec<PathBuf>,

    /// Promotion plan type, or `free`
    #[arg(long, default_value = "free")]
    pub plan: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConditionArg {
    New,
    Used,
    Refurbished,
}

impl From<ConditionArg> for Condition {
    fn from(arg: ConditionArg) -> Self {
        match arg {
            ConditionArg::New => Condition::New,
            ConditionArg::Used => Condition::Used,
            ConditionArg::Refurbished => Condition::Refurbished,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Orders
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    /// List orders (search matches order id or customer)
    List {
        #[command(flatten)]
        options: ListOptions,

        /// Tab: all, unfulfilled, unpaid, paid, open, close
        #[arg(long, default_value = "all")]
        tab: OrderTab,

        /// Payment filter: all, paid, unpaid
        #[arg(long, default_value = "all")]
        payment: Choice<PaymentStatus>,

        /// Status filter: all, processing, shipped, delivered
        #[arg(long, default_value = "all")]
        status: Choice<OrderStatus>,

        /// Sort: date-desc (default), date-asc, customer-asc, customer-desc, total-asc, total-desc
        #[arg(long)]
        sort: Option<OrderSort>,
    },
    /// Show order statistics and charts
    Stats,
}

// ─────────────────────────────────────────────────────────────────────────────
// Categories
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCommand {
    /// List categories (search matches name)
    List {
        #[command(flatten)]
        options: ListOptions,

        /// Date filter: all, recent (last 7 days), or <N>d
        #[arg(long, default_value = "all")]
        date: Recency,

        /// Sort: name-asc, name-desc, created-desc, subcategories-desc
        #[arg(long)]
        sort: Option<CategorySort>,

        /// Fetch from the backend instead of the bundled data
        #[arg(long)]
        remote: bool,
    },
    /// Show category statistics and charts
    Stats,
}

// ─────────────────────────────────────────────────────────────────────────────
// Promotions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
pub struct PromotionsArgs {
    #[command(subcommand)]
    pub command: PromotionsCommand,
}

#[derive(Subcommand, Debug)]
pub enum PromotionsCommand {
    /// List promotion plans (search matches name)
    List {
        #[command(flatten)]
        options: ListOptions,

        /// Status filter: all, active, inactive
        #[arg(long, default_value = "all")]
        status: Choice<PlanStatus>,

        /// Sort: price-asc, price-desc, duration-desc, name-asc
        #[arg(long)]
        sort: Option<PromotionSort>,

        /// Fetch from the backend instead of the bundled data
        #[arg(long)]
        remote: bool,
    },
    /// Show promotion plan statistics
    Stats,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
pub struct PaymentArgs {
    #[command(subcommand)]
    pub command: PaymentCommand,
}

#[derive(Subcommand, Debug)]
pub enum PaymentCommand {
    /// Reconcile the URL the payment gateway redirected back to
    Reconcile {
        /// Return URL or query string, e.g. '?payment=success&reference=abc'
        url: String,
    },
    /// Show the product awaiting payment, if any
    Pending,
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Store a backend access token (prompted when not given)
    Login {
        /// Access token; read from stdin when omitted
        #[arg(long)]
        token: Option<String>,

        /// Refresh token forwarded as a cookie on GET requests
        #[arg(long)]
        refresh_token: Option<String>,

        /// Account email used for promotion payments
        #[arg(long)]
        email: Option<String>,
    },
    /// Logout and remove stored tokens
    Logout,
    /// Show current authentication status
    Status {
        /// Also check the token against the backend
        #[arg(long)]
        check: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key
        key: ConfigKey,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: ConfigKey,
    },

    /// Reset a configuration value to its default
    Remove {
        /// Configuration key
        key: ConfigKey,
    },

    /// Show the configuration file path and all values
    Show,
}

/// Available configuration keys
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConfigKey {
    /// Backend API base URL
    #[value(name = "api_base_url")]
    ApiBaseUrl,

    /// Directory overriding the bundled JSON datasets
    #[value(name = "data_dir")]
    DataDir,

    /// TUI tick interval in milliseconds
    #[value(name = "tick_rate_ms")]
    TickRateMs,

    /// Screen shown when the TUI starts
    #[value(name = "default_screen")]
    DefaultScreen,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::ApiBaseUrl => "api_base_url",
            ConfigKey::DataDir => "data_dir",
            ConfigKey::TickRateMs => "tick_rate_ms",
            ConfigKey::DefaultScreen => "default_screen",
        }
    }
}
