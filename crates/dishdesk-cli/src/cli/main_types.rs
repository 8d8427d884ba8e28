use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dishdesk")]
#[command(about = "Admin tool for a food-ordering backend: orders, menu, categories, customers")]
#[command(version)]
#[command(after_help = "Examples:
  dishdesk orders list                           # First page of orders
  dishdesk orders list --status pending --sort total --desc
  dishdesk orders status 64f1c2 preparing        # Move an order along
  dishdesk foods list --search pizza --sort price
  dishdesk foods list --file menu.json --filter category=Drinks
  dishdesk categories delete 12                  # Delete a category
  dishdesk config set --api-url http://localhost:5000

Environment Variables:
  DISHDESK_API_URL        REST API base URL
  DISHDESK_REALTIME_URL   Realtime database URL")]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Custom configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// REST API base URL (overrides DISHDESK_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configuration management (show, set)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Orders (server-side paging, search and sort)
    Orders {
        #[command(subcommand)]
        command: OrderCommands,
    },
    /// Menu items
    Foods {
        #[command(subcommand)]
        command: FoodCommands,
    },
    /// Menu categories
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Customers
    Customers {
        #[command(subcommand)]
        command: CustomerCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set configuration values
    #[command(after_help = "Examples:
  dishdesk config set --api-url http://localhost:5000
  dishdesk config set --realtime-url https://my-db.firebaseio.com
  dishdesk config set --page-size 25 --theme light")]
    Set {
        /// REST API base URL
        #[arg(long)]
        api_url: Option<String>,
        /// Realtime database URL
        #[arg(long)]
        realtime_url: Option<String>,
        /// Default rows per page
        #[arg(long)]
        page_size: Option<usize>,
        /// Color theme: dark or light
        #[arg(long)]
        theme: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum OrderCommands {
    /// List orders
    #[command(after_help = "Examples:
  dishdesk orders list --page 2 --limit 20
  dishdesk orders list --search ada --format json")]
    List(OrderListArgs),
    /// Update the status of an order
    Status {
        /// Order ID
        id: String,
        /// pending, preparing, on_the_way, delivered or cancelled
        status: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum FoodCommands {
    /// List menu items
    List(LocalListArgs),
    /// Delete a menu item
    Delete {
        /// Food ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories
    List(LocalListArgs),
    /// Delete a category
    Delete {
        /// Category ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommands {
    /// List customers
    List(LocalListArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Orders are searched, sorted and paged by the server.
#[derive(Args, Debug)]
pub struct OrderListArgs {
    /// Search term
    #[arg(long)]
    pub search: Option<String>,

    /// Only orders with this status
    #[arg(long)]
    pub status: Option<String>,

    /// Sort column: customer, total, status or created_at
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (default: config page_size)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// The full list is fetched once and searched, filtered, sorted and paged locally.
#[derive(Args, Debug)]
#[command(after_help = "Examples:
  dishdesk foods list --search pizza
  dishdesk foods list --filter category=Pizza --filter available=true --sort price --desc
  dishdesk customers list --file customers.json --page 2 --page-size 5")]
pub struct LocalListArgs {
    /// Read rows from a JSON file (array or {"data": [...]}) instead of the API
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Case-insensitive search across all columns
    #[arg(long)]
    pub search: Option<String>,

    /// Column filter in column=value format (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub filter: Vec<String>,

    /// Sort column
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (default: config page_size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}
