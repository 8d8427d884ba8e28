use crate::cli::main_types::{ConfigCommands, LocalListArgs, OrderCommands, OrderListArgs, OutputFormat};
use dishdesk_core::api::client::{DashboardApi, OrderQueryLatch};
use dishdesk_core::api::models::{ListResponse, Order, OrderColumn, OrderStatus, Page};
use dishdesk_core::display::TableDisplay;
use dishdesk_core::error::{AppError, CliError, StorageError};
use dishdesk_core::storage::config::{Config, Theme};
use dishdesk_core::table::processor::{self, Windowing};
use dishdesk_core::table::{ColumnKey, Columns, DataTable, PaginationInfo, Renderer, TableRow, TableView};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

fn invalid(message: String) -> AppError {
    AppError::Cli(CliError::InvalidArguments(message))
}

/// Resolve a column name for the given row type.
pub fn parse_column<C: ColumnKey>(name: &str) -> Result<C, AppError> {
    C::parse(name.trim()).ok_or_else(|| {
        let available: Vec<&str> = C::all().iter().map(|c| c.as_str()).collect();
        invalid(format!(
            "Unknown column '{}'. Available columns: {}",
            name,
            available.join(", ")
        ))
    })
}

/// Parse a `column=value` filter argument.
pub fn parse_filter<C: ColumnKey>(arg: &str) -> Result<(C, String), AppError> {
    let (column, value) = arg
        .split_once('=')
        .ok_or_else(|| invalid(format!("Invalid filter '{}'. Expected column=value", arg)))?;
    Ok((parse_column(column)?, value.trim().to_string()))
}

fn pagination_of<C: ColumnKey>(view: &TableView<C>) -> Option<PaginationInfo> {
    view.page.as_ref().map(|page| PaginationInfo {
        page: page.page,
        limit: page.page_size,
        total: page.total,
        total_pages: page.total_pages,
    })
}

fn print_json(value: &serde_json::Value) -> Result<(), AppError> {
    let output = serde_json::to_string_pretty(value)
        .map_err(|e| invalid(format!("Failed to serialize output: {}", e)))?;
    println!("{}", output);
    Ok(())
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, command: ConfigCommands, config: &mut Config, config_path: Option<PathBuf>) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                let unset = "(not set)".to_string();
                println!("Current Configuration:");
                println!("=====================");
                println!("API URL: {}", config.resolve_api_url(None).unwrap_or_else(|| unset.clone()));
                println!(
                    "Realtime URL: {}",
                    config.resolve_realtime_url(None).unwrap_or_else(|| unset.clone())
                );
                println!("Page size: {}", config.page_size);
                println!("Theme: {}", config.theme);
                println!("\nNotifications:");
                println!("  Enabled: {}", config.notifications.enabled);
                println!("  Sound: {}", config.notifications.sound);
                println!("  Persist seen orders: {}", config.notifications.persist_seen);
                println!("  Session: {}", config.notifications.session);
                Ok(())
            }
            ConfigCommands::Set {
                api_url,
                realtime_url,
                page_size,
                theme,
            } => {
                log::debug!(
                    "config set api_url={:?} realtime_url={:?} page_size={:?} theme={:?}",
                    api_url,
                    realtime_url,
                    page_size,
                    theme
                );
                let mut updated_fields = Vec::new();

                if let Some(url) = api_url {
                    validate_url(&url)?;
                    updated_fields.push(format!("API URL to: {}", url));
                    config.set_api_url(url);
                }
                if let Some(url) = realtime_url {
                    validate_url(&url)?;
                    updated_fields.push(format!("realtime URL to: {}", url));
                    config.set_realtime_url(url);
                }
                if let Some(size) = page_size {
                    config.set_page_size(size)?;
                    updated_fields.push(format!("page size to: {}", size));
                }
                if let Some(theme) = theme {
                    config.theme = theme.parse::<Theme>()?;
                    updated_fields.push(format!("theme to: {}", config.theme));
                }

                if updated_fields.is_empty() {
                    return Err(invalid(
                        "No configuration values provided. Use --api-url, --realtime-url, --page-size or --theme"
                            .to_string(),
                    ));
                }

                config.save(config_path)?;
                println!("✅ Set {}", updated_fields.join(", "));
                println!("Configuration saved successfully.");
                Ok(())
            }
        }
    }
}

fn validate_url(url: &str) -> Result<(), AppError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(AppError::Storage(StorageError::InvalidValue {
            field: "url".to_string(),
            value: url.to_string(),
        }))
    }
}

/// Orders: every query change is delegated to the server.
pub struct OrderHandler {
    page_size: usize,
}

impl OrderHandler {
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }

    pub async fn handle(&self, command: OrderCommands, client: &dyn DashboardApi) -> Result<(), AppError> {
        match command {
            OrderCommands::List(args) => self.handle_list(&args, client).await,
            OrderCommands::Status { id, status } => {
                let status: OrderStatus = status.parse().map_err(invalid)?;
                client.update_order_status(&id, status).await?;
                println!("✅ Order {} is now {}", id, status);
                Ok(())
            }
        }
    }

    async fn handle_list(&self, args: &OrderListArgs, client: &dyn DashboardApi) -> Result<(), AppError> {
        let latch = OrderQueryLatch::new();
        let mut table = DataTable::<Order>::delegated(Order::columns()?, Box::new(latch.clone()))
            .with_renderer(Order::renderer())
            .with_page_size(args.limit.unwrap_or(self.page_size))?;

        if let Some(search) = &args.search {
            table.set_search(search.as_str());
        }
        if let Some(status) = &args.status {
            let status: OrderStatus = status.parse().map_err(invalid)?;
            table.set_filter(OrderColumn::Status, status.as_str())?;
        }
        if let Some(sort) = &args.sort {
            let column = parse_column::<OrderColumn>(sort)?;
            table.toggle_sort(column)?;
            if args.desc {
                table.toggle_sort(column)?;
            }
        }
        table.set_page(args.page)?;

        let (seq, query) = latch
            .take()
            .ok_or_else(|| invalid("No order query to send".to_string()))?;
        log::debug!("Fetching orders as request {:?}: {:?}", seq, query);

        let page: Page<Order> = client.list_orders(&query).await?;
        if let Some(info) = page.pagination {
            table.accept_pagination(seq, info);
        }

        match args.format {
            OutputFormat::Json => print_json(&json!({
                "data": page.data,
                "pagination": page.pagination,
            })),
            OutputFormat::Table => {
                println!("{}", TableDisplay::new().render(&table.view(&page.data)));
                Ok(())
            }
        }
    }
}

/// Foods, categories and customers: fetched whole and processed locally.
pub struct ResourceHandler {
    page_size: usize,
}

impl ResourceHandler {
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }

    /// Read rows from a JSON file holding an array or a `{ "data": [...] }` envelope.
    pub fn load_rows<R: DeserializeOwned>(&self, path: &Path) -> Result<Vec<R>, AppError> {
        let content = fs::read_to_string(path).map_err(|source| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        })?;
        let response: ListResponse<R> = serde_json::from_str(&content)
            .map_err(|e| invalid(format!("Could not read rows from {}: {}", path.display(), e)))?;
        Ok(Page::from(response).data)
    }

    pub fn list<R>(&self, rows: &[R], columns: Columns<R::Column>, renderer: Renderer<R>, args: &LocalListArgs) -> Result<(), AppError>
    where
        R: TableRow + Serialize,
    {
        let mut table = DataTable::<R>::local(columns)
            .with_renderer(renderer)
            .with_page_size(args.page_size.unwrap_or(self.page_size))?;

        if let Some(search) = &args.search {
            table.set_search(search.as_str());
        }
        for filter in &args.filter {
            let (column, value) = parse_filter::<R::Column>(filter)?;
            table.set_filter(column, value)?;
        }
        if let Some(sort) = &args.sort {
            let column = parse_column::<R::Column>(sort)?;
            table.toggle_sort(column)?;
            if args.desc {
                table.toggle_sort(column)?;
            }
        }
        table.set_page(args.page)?;

        // Rendering first also pulls an out-of-range page back to the last one.
        let view = table.view(rows);
        match args.format {
            OutputFormat::Table => {
                println!("{}", TableDisplay::new().render(&view));
                Ok(())
            }
            OutputFormat::Json => {
                let processed = processor::process(rows, table.query(), table.columns(), Windowing::Paginate);
                let data: Vec<&R> = processed.rows.iter().map(|p| p.row).collect();
                print_json(&json!({
                    "data": data,
                    "pagination": pagination_of(&view),
                }))
            }
        }
    }
}
