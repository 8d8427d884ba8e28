//! Application state and logic for the TUI.
//!
//! ## Module Structure
//! - `mod.rs`: App struct definition, initialization, and rendering
//! - `action_handler.rs`: AppAction event processing
//! - `data_handler.rs`: Async data loading with tokio tasks
//! - `input_handler.rs`: Keyboard event processing

mod action_handler;
mod data_handler;
mod input_handler;

use std::io::Stdout;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use dishdesk_core::api::client::OrderQueryLatch;
use dishdesk_core::api::models::{Category, CategoryColumn, Customer, FoodColumn, FoodItem, Order};
use dishdesk_core::notify::{ChildAddedCallback, FirebaseStore, ORDERS_PATH, OrderNotificationListener};
use dishdesk_core::storage::config::Config;
use dishdesk_core::storage::seen::SeenOrders;
use dishdesk_core::table::DataTable;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc;

use crate::action::AppAction;
use crate::components::styles::{Palette, dim_style, title_style};
use crate::components::{ActiveTab, Component, HelpOverlay, StatusBar, TablePage, TablePanel, ToastNotifier};
use crate::error::TuiResult;
use crate::event::{Event, EventHandler};
use crate::layout::main::{HEADER_HEIGHT, STATUS_BAR_HEIGHT};
use crate::service::{ConnectionStatus, RealtimeStatus, ServiceClient, init_service};

pub struct App {
    pub should_quit: bool,
    pub(crate) active_tab: ActiveTab,
    /// Orders are paged, searched and sorted by the server
    pub(crate) orders: TablePanel<Order>,
    /// Latest unfetched orders query
    pub(crate) orders_latch: OrderQueryLatch,
    /// A new order arrived; refresh the orders page once the queue drains
    orders_dirty: bool,
    pub(crate) foods: TablePanel<FoodItem>,
    pub(crate) categories: TablePanel<Category>,
    pub(crate) customers: TablePanel<Customer>,
    pub(crate) status_bar: StatusBar,
    /// Service client for API access (Arc-wrapped for async sharing)
    pub(crate) service: Option<Arc<ServiceClient>>,
    pub(crate) connection_status: ConnectionStatus,
    pub(crate) realtime_status: RealtimeStatus,
    pub(crate) listener: OrderNotificationListener<ToastNotifier>,
    pub(crate) config: Config,
    config_dir: Option<PathBuf>,
    pub(crate) palette: Palette,
    pub(crate) action_tx: mpsc::UnboundedSender<AppAction>,
    action_rx: mpsc::UnboundedReceiver<AppAction>,
    pub(crate) show_help: bool,
}

impl App {
    /// Create the app from configuration; `config_dir` holds the config
    /// file and the persisted seen-orders set.
    pub fn new(config: Config, config_dir: Option<PathBuf>) -> TuiResult<Self> {
        let (service, connection_status) = match init_service(&config) {
            Ok(Some(client)) => {
                let url = client.base_url().to_string();
                (Some(client), ConnectionStatus::Connected(url))
            }
            Ok(None) => (None, ConnectionStatus::Disconnected),
            Err(e) => (None, ConnectionStatus::Error(e)),
        };
        let mut app = Self::with_service(config, config_dir, service)?;
        if let ConnectionStatus::Error(e) = &connection_status {
            app.status_bar.set_message(format!("Error: {}", e));
        }
        app.connection_status = connection_status;
        Ok(app)
    }

    pub(crate) fn with_service(
        config: Config,
        config_dir: Option<PathBuf>,
        service: Option<Arc<ServiceClient>>,
    ) -> TuiResult<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let page_size = config.page_size;

        let orders_latch = OrderQueryLatch::new();
        let orders_table = DataTable::<Order>::delegated(Order::columns()?, Box::new(orders_latch.clone()))
            .with_renderer(Order::renderer())
            .with_page_size(page_size)?;
        let foods_table = DataTable::<FoodItem>::local(FoodItem::columns()?)
            .with_renderer(FoodItem::renderer())
            .with_page_size(page_size)?;
        let categories_table = DataTable::<Category>::local(Category::columns()?).with_page_size(page_size)?;
        let customers_table = DataTable::<Customer>::local(Customer::columns()?).with_page_size(page_size)?;

        let connection_status = match &service {
            Some(client) => ConnectionStatus::Connected(client.base_url().to_string()),
            None => ConnectionStatus::Disconnected,
        };
        let listener = build_listener(&config, config_dir.as_deref());

        Ok(Self {
            should_quit: false,
            active_tab: ActiveTab::Orders,
            orders: TablePanel::new("Orders", orders_table),
            orders_latch,
            orders_dirty: false,
            foods: TablePanel::new("Foods", foods_table).deletable(FoodColumn::Name),
            categories: TablePanel::new("Categories", categories_table).deletable(CategoryColumn::Name),
            customers: TablePanel::new("Customers", customers_table),
            status_bar: StatusBar::new(),
            service,
            connection_status,
            realtime_status: RealtimeStatus::Off,
            listener,
            palette: Palette::for_theme(config.theme),
            config,
            config_dir,
            action_tx,
            action_rx,
            show_help: false,
        })
    }

    /// Run the main application loop.
    pub async fn run_async(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> TuiResult<()> {
        let event_handler = EventHandler::new(250);

        self.start_realtime();
        self.request_tab_data(self.active_tab);

        while !self.should_quit {
            self.process_actions();

            terminal.draw(|frame| self.draw(frame))?;

            match event_handler.next()? {
                Event::Key(key) => self.handle_key(key.code, key.modifiers),
                Event::Resize(_, _) => {}
                Event::Tick => self.listener.notifier_mut().prune(Instant::now()),
            }
        }

        self.listener.unsubscribe();
        Ok(())
    }

    /// Process pending actions from the action queue.
    fn process_actions(&mut self) {
        while let Ok(action) = self.action_rx.try_recv() {
            self.handle_action(action);
        }
        if std::mem::take(&mut self.orders_dirty) && self.orders.rows.is_loaded() {
            self.refresh_orders();
        }
    }

    /// Subscribe to new orders when a realtime URL is configured.
    fn start_realtime(&mut self) {
        if !self.config.notifications.enabled {
            return;
        }
        let Some(url) = self.config.resolve_realtime_url(None) else {
            log::info!("No realtime URL configured; new-order alerts are off");
            return;
        };

        let store = match FirebaseStore::new(&url) {
            Ok(store) => store,
            Err(e) => {
                self.status_bar.set_message(format!("Realtime: {}", e));
                self.realtime_status = RealtimeStatus::Error(e.to_string());
                return;
            }
        };
        let tx = self.action_tx.clone();
        let on_child_added: ChildAddedCallback = Box::new(move |event| {
            let _ = tx.send(AppAction::OrderAdded(event));
        });

        self.realtime_status = match self.listener.subscribe(&store, ORDERS_PATH, on_child_added) {
            Ok(()) => {
                log::info!("Listening for new orders at {}", url);
                RealtimeStatus::Listening
            }
            Err(e) => {
                log::warn!("Realtime subscription failed: {}", e);
                RealtimeStatus::Error(e.to_string())
            }
        };
        if let RealtimeStatus::Error(e) = &self.realtime_status {
            self.status_bar.set_message(format!("Realtime: {}", e));
        }
    }

    pub(crate) fn active_page_mut(&mut self) -> &mut dyn TablePage {
        match self.active_tab {
            ActiveTab::Orders => &mut self.orders,
            ActiveTab::Foods => &mut self.foods,
            ActiveTab::Categories => &mut self.categories,
            ActiveTab::Customers => &mut self.customers,
        }
    }

    /// Switch to a specific tab and load it if nothing is shown yet.
    pub(crate) fn switch_to_tab(&mut self, tab: ActiveTab) {
        self.active_tab = tab;
        self.request_tab_data(tab);
        self.status_bar.set_message(format!("Viewing: {}", tab.label()));
    }

    pub(crate) fn toggle_theme(&mut self) {
        self.config.theme = self.config.theme.toggled();
        self.palette = Palette::for_theme(self.config.theme);

        let path = self.config_dir.as_deref().map(Config::config_file_in);
        match self.config.save(path) {
            Ok(()) => self
                .status_bar
                .set_message(format!("Theme: {}", self.config.theme)),
            Err(e) => self
                .status_bar
                .set_message(format!("Theme: {} (not saved: {})", self.config.theme, e)),
        }
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    pub(crate) fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();
        let [header, body, status] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .areas(size);

        let palette = self.palette;
        self.draw_header_with_tabs(frame, header);
        self.active_page_mut().draw(frame, body, &palette);
        self.status_bar.draw(frame, status, &palette);
        self.listener.notifier().draw(frame, body, &palette);

        if self.show_help {
            HelpOverlay::render(frame, size, &palette);
        }
    }

    fn draw_header_with_tabs(&self, frame: &mut Frame, area: Rect) {
        let palette = &self.palette;
        let api_indicator = match &self.connection_status {
            ConnectionStatus::Disconnected => Span::styled(" ○ no API ", dim_style(palette)),
            ConnectionStatus::Connected(url) => Span::styled(format!(" ● {} ", url), Style::default().fg(palette.success)),
            ConnectionStatus::Error(_) => Span::styled(" ✗ API ", Style::default().fg(palette.error)),
        };
        let realtime_indicator = match &self.realtime_status {
            RealtimeStatus::Off => Span::styled(" 🔕 ", dim_style(palette)),
            RealtimeStatus::Listening => Span::styled(
                format!(" 🔔 {} ", self.listener.seen().len()),
                Style::default().fg(palette.success),
            ),
            RealtimeStatus::Error(_) => Span::styled(" 🔔✗ ", Style::default().fg(palette.error)),
        };

        let mut tab_spans: Vec<Span> = vec![Span::raw(" ")];
        for (i, tab) in ActiveTab::ALL.iter().enumerate() {
            let style = if *tab == self.active_tab {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(palette.text)
            };
            tab_spans.push(Span::styled(format!(" {} {} ", i + 1, tab.label()), style));
            tab_spans.push(Span::raw(" "));
        }
        tab_spans.push(Span::styled("│", dim_style(palette)));
        tab_spans.push(api_indicator);
        tab_spans.push(realtime_indicator);

        let header = Paragraph::new(Line::from(tab_spans)).block(
            Block::default()
                .title(" dishdesk ")
                .title_style(title_style(palette))
                .borders(Borders::ALL)
                .border_style(dim_style(palette)),
        );
        frame.render_widget(header, area);
    }
}

/// Listener with the configured sound and, if enabled, the persisted seen set.
fn build_listener(config: &Config, config_dir: Option<&Path>) -> OrderNotificationListener<ToastNotifier> {
    let listener = OrderNotificationListener::new(ToastNotifier::new()).with_sound(config.notifications.sound);
    if !config.notifications.persist_seen {
        return listener;
    }
    let Some(dir) = config_dir else {
        return listener;
    };

    let path = Config::seen_orders_file_in(dir, &config.notifications.session);
    match SeenOrders::load(path.clone()) {
        Ok(seen) => {
            log::debug!("Loaded {} seen orders from {}", seen.len(), path.display());
            listener.with_seen(seen)
        }
        Err(e) => {
            log::warn!("Ignoring seen-orders file {}: {}", path.display(), e);
            listener
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{DataRequest, DeleteTarget};
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyModifiers};
    use dishdesk_core::api::client::{DashboardApi, OrderQuery};
    use dishdesk_core::api::models::{OrderStatus, Page};
    use dishdesk_core::error::AppError;
    use dishdesk_core::notify::ChildAdded;
    use dishdesk_core::table::PaginationInfo;
    use ratatui::backend::TestBackend;
    use serde_json::json;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeApi {
        order_queries: Mutex<Vec<OrderQuery>>,
        deleted: Mutex<Vec<String>>,
    }

    fn order(id: &str, total: f64) -> Order {
        Order {
            id: id.to_string(),
            customer_name: Some("Ada".to_string()),
            items: Vec::new(),
            total_amount: total,
            status: OrderStatus::Pending,
            created_at: None,
        }
    }

    fn food(id: &str, name: &str) -> FoodItem {
        FoodItem {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            price: 5.0,
            category: None,
            available: true,
            image_url: None,
        }
    }

    #[async_trait]
    impl DashboardApi for FakeApi {
        async fn list_orders(&self, query: &OrderQuery) -> Result<Page<Order>, AppError> {
            self.order_queries.lock().unwrap().push(query.clone());
            Ok(Page {
                data: vec![order("o-1", 10.0)],
                pagination: Some(PaginationInfo {
                    page: query.page,
                    limit: query.limit,
                    total: 1,
                    total_pages: 1,
                }),
            })
        }

        async fn list_foods(&self) -> Result<Vec<FoodItem>, AppError> {
            Ok(vec![food("f1", "Margherita"), food("f2", "Cola")])
        }

        async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
            Ok(Vec::new())
        }

        async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
            Ok(Vec::new())
        }

        async fn delete_food(&self, id: &str) -> Result<(), AppError> {
            self.deleted.lock().unwrap().push(id.to_string());
            Ok(())
        }

        async fn delete_category(&self, id: &str) -> Result<(), AppError> {
            self.deleted.lock().unwrap().push(id.to_string());
            Ok(())
        }

        async fn update_order_status(&self, _id: &str, _status: OrderStatus) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.notifications.sound = false;
        config
    }

    fn app_with_fake() -> (App, Arc<FakeApi>) {
        let api = Arc::new(FakeApi::default());
        let service = ServiceClient::from_api(api.clone(), "http://fake.test".to_string());
        let app = App::with_service(quiet_config(), None, Some(Arc::new(service))).unwrap();
        (app, api)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(code, KeyModifiers::NONE);
    }

    async fn next_action(app: &mut App) -> AppAction {
        app.action_rx.recv().await.unwrap()
    }

    #[test]
    fn test_stale_orders_response_is_dropped() {
        let mut app = App::with_service(quiet_config(), None, None).unwrap();

        app.orders.table.set_search("a");
        let (first, _) = app.orders_latch.take().unwrap();
        app.orders.table.set_search("ab");
        let (second, _) = app.orders_latch.take().unwrap();

        let page = |id: &str, total: usize| Page {
            data: vec![order(id, 1.0)],
            pagination: Some(PaginationInfo {
                page: 1,
                limit: 10,
                total,
                total_pages: 1,
            }),
        };

        app.handle_action(AppAction::OrdersLoaded(second, page("fresh", 1)));
        app.handle_action(AppAction::OrdersLoaded(first, page("stale", 40)));

        let rows = app.orders.rows.data().unwrap();
        assert_eq!(rows[0].id, "fresh");
        assert_eq!(app.orders.table.pagination().map(|p| p.total), Some(1));

        // A failure for an old request leaves the current rows alone
        app.handle_action(AppAction::LoadFailed(
            DataRequest::Orders(first, OrderQuery::default()),
            "timeout".to_string(),
        ));
        assert!(app.orders.rows.is_loaded());
    }

    #[tokio::test]
    async fn test_orders_search_goes_to_server() {
        let (mut app, api) = app_with_fake();

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);

        // Each keystroke is a request; only the last one may land
        let mut latest = None;
        for _ in 0..3 {
            if let AppAction::OrdersLoaded(seq, page) = next_action(&mut app).await {
                let accepted = app.orders.table.is_current(seq);
                app.handle_action(AppAction::OrdersLoaded(seq, page));
                if accepted {
                    latest = Some(seq);
                }
            }
        }
        assert!(latest.is_some());
        assert_eq!(app.orders.rows.data().map(Vec::len), Some(1));

        let queries = api.order_queries.lock().unwrap();
        let searches: Vec<Option<&str>> = queries.iter().map(|q| q.search.as_deref()).collect();
        assert_eq!(searches.len(), 3);
        assert!(searches.contains(&Some("ada")));
    }

    #[tokio::test]
    async fn test_delete_food_after_confirmation() {
        let (mut app, api) = app_with_fake();

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.active_tab, ActiveTab::Foods);
        let request = next_action(&mut app).await;
        assert!(matches!(request, AppAction::LoadData(DataRequest::Foods)));
        app.handle_action(request);
        let loaded = next_action(&mut app).await;
        app.handle_action(loaded);
        assert_eq!(app.foods.rows.data().map(Vec::len), Some(2));

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('d'));
        // Global keys are held back while the confirmation is open
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.active_tab, ActiveTab::Foods);
        press(&mut app, KeyCode::Char('y'));

        let delete = next_action(&mut app).await;
        assert!(matches!(&delete, AppAction::Delete(DeleteTarget::Food(id)) if id == "f2"));
        app.handle_action(delete);
        let deleted = next_action(&mut app).await;
        assert!(matches!(deleted, AppAction::Deleted(_)));
        app.handle_action(deleted);
        assert_eq!(api.deleted.lock().unwrap().as_slice(), ["f2".to_string()]);
        assert!(app.status_bar.message().contains("Deleted food f2"));

        // The list is fetched again
        assert!(matches!(
            next_action(&mut app).await,
            AppAction::LoadData(DataRequest::Foods)
        ));
    }

    #[test]
    fn test_new_order_notified_once() {
        let mut app = App::with_service(quiet_config(), None, None).unwrap();
        let event = ChildAdded::new("o-9", json!({"customerName": "Grace", "totalAmount": 30}));

        app.handle_action(AppAction::OrderAdded(event.clone()));
        app.handle_action(AppAction::OrderAdded(event));

        assert_eq!(app.listener.notifier().len(), 1);
        assert!(app.status_bar.message().contains("o-9"));
    }

    #[test]
    fn test_persisted_seen_orders_skip_known_ids() {
        let dir = TempDir::new().unwrap();
        let mut config = quiet_config();
        config.notifications.persist_seen = true;

        let mut app = App::with_service(config.clone(), Some(dir.path().to_path_buf()), None).unwrap();
        app.handle_action(AppAction::OrderAdded(ChildAdded::new("o-1", json!({}))));
        assert_eq!(app.listener.notifier().len(), 1);

        let mut restarted = App::with_service(config, Some(dir.path().to_path_buf()), None).unwrap();
        restarted.handle_action(AppAction::OrderAdded(ChildAdded::new("o-1", json!({}))));
        assert!(restarted.listener.notifier().is_empty());
    }

    #[test]
    fn test_help_overlay_blocks_other_keys() {
        let mut app = App::with_service(quiet_config(), None, None).unwrap();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active_tab, ActiveTab::Orders);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active_tab, ActiveTab::Categories);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_missing_service_reports_on_refresh() {
        let mut app = App::with_service(quiet_config(), None, None).unwrap();
        press(&mut app, KeyCode::Char('r'));
        assert!(app.status_bar.message().contains("API URL"));
        assert!(app.orders.rows.error().is_some());
    }

    #[test]
    fn test_theme_toggle_is_saved() {
        let dir = TempDir::new().unwrap();
        let mut app = App::with_service(quiet_config(), Some(dir.path().to_path_buf()), None).unwrap();
        press(&mut app, KeyCode::Char('t'));

        let saved = Config::load(Some(Config::config_file_in(dir.path()))).unwrap();
        assert_eq!(saved.theme, dishdesk_core::storage::config::Theme::Light);
        assert_eq!(app.palette, Palette::for_theme(saved.theme));
    }

    #[test]
    fn test_draw_all_tabs() {
        let mut app = App::with_service(quiet_config(), None, None).unwrap();
        app.foods.set_rows(vec![food("f1", "Margherita")]);
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        for tab in ActiveTab::ALL {
            app.active_tab = tab;
            terminal.draw(|frame| app.draw(frame)).unwrap();
        }
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("dishdesk"));
    }
}
