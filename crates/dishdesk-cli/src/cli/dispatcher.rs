use crate::cli::command_handlers::{ConfigHandler, OrderHandler, ResourceHandler};
use crate::cli::main_types::{CategoryCommands, Commands, CustomerCommands, FoodCommands};
use dishdesk_core::api::client::{DashboardApi, DashboardClient};
use dishdesk_core::api::models::{Category, Customer, FoodItem};
use dishdesk_core::error::{AppError, CliError};
use dishdesk_core::storage::config::Config;
use std::path::PathBuf;

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    api_url: Option<String>,
}

impl Dispatcher {
    pub fn new(config: Config, config_path: Option<PathBuf>, api_url: Option<String>) -> Self {
        Self {
            config,
            config_path,
            api_url,
        }
    }

    // URL priority: --api-url > DISHDESK_API_URL > config file
    fn create_client(&self) -> Result<DashboardClient, AppError> {
        let url = self
            .config
            .resolve_api_url(self.api_url.as_deref())
            .ok_or_else(|| {
                AppError::Cli(CliError::MissingApiUrl {
                    hint: "Use 'dishdesk config set --api-url <url>', pass --api-url, or set DISHDESK_API_URL".to_string(),
                })
            })?;
        log::debug!("Using API at {}", url);
        Ok(DashboardClient::new(url)?)
    }

    pub async fn dispatch(self, command: Commands) -> Result<(), AppError> {
        let page_size = self.config.page_size;
        match command {
            Commands::Config { command } => {
                let mut config = self.config.clone();
                ConfigHandler::new().handle(command, &mut config, self.config_path.clone())
            }
            Commands::Orders { command } => {
                let client = self.create_client()?;
                OrderHandler::new(page_size).handle(command, &client).await
            }
            Commands::Foods { command } => {
                let handler = ResourceHandler::new(page_size);
                match command {
                    FoodCommands::List(args) => {
                        let rows: Vec<FoodItem> = match &args.file {
                            Some(path) => handler.load_rows(path)?,
                            None => self.create_client()?.list_foods().await?,
                        };
                        handler.list(&rows, FoodItem::columns()?, FoodItem::renderer(), &args)
                    }
                    FoodCommands::Delete { id } => {
                        self.create_client()?.delete_food(&id).await?;
                        println!("✅ Deleted food {}", id);
                        Ok(())
                    }
                }
            }
            Commands::Categories { command } => {
                let handler = ResourceHandler::new(page_size);
                match command {
                    CategoryCommands::List(args) => {
                        let rows: Vec<Category> = match &args.file {
                            Some(path) => handler.load_rows(path)?,
                            None => self.create_client()?.list_categories().await?,
                        };
                        handler.list(&rows, Category::columns()?, Default::default(), &args)
                    }
                    CategoryCommands::Delete { id } => {
                        self.create_client()?.delete_category(&id).await?;
                        println!("✅ Deleted category {}", id);
                        Ok(())
                    }
                }
            }
            Commands::Customers { command } => {
                let handler = ResourceHandler::new(page_size);
                match command {
                    CustomerCommands::List(args) => {
                        let rows: Vec<Customer> = match &args.file {
                            Some(path) => handler.load_rows(path)?,
                            None => self.create_client()?.list_customers().await?,
                        };
                        handler.list(&rows, Customer::columns()?, Default::default(), &args)
                    }
                }
            }
        }
    }
}
