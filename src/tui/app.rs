//! Main TUI application state and logic

use std::io::{self, Stdout};
use std::process::Command;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::warn;

use crate::api::{ApiClient, MarketplaceApi};
use crate::core::submission::{self, reconcile};
use crate::core::{
    Config, PaymentReturn, Reconciliation, Section, SessionContext, SubmitOutcome, Submission,
};
use crate::data::DataSource;
use crate::error::{DeskError, Result};
use crate::models::{
    Category, CategoryDraft, Order, Overview, Product, PromotionPlan, User,
};
use crate::tui::event::{is_back_key, is_quit_key, AppEvent, EventHandler};
use crate::tui::screens::add_product::{AddProductScreen, FormAction};
use crate::tui::screens::category_editor::{CategoryEditor, EditorAction};
use crate::tui::screens::listing::{ListAction, ListScreen};
use crate::tui::ui;

/// Message type for async operation results
#[derive(Debug)]
pub enum AsyncMessage {
    /// Categories and promotion plans for the add-product form
    FormChoicesLoaded {
        categories: Vec<Category>,
        plans: Vec<PromotionPlan>,
    },
    /// Form choices failed to load
    FormChoicesError(String),
    /// Product created (and payment initialized for a paid plan)
    ProductSubmitted(SubmitOutcome),
    /// Product submission failed
    ProductSubmitError(String),
    /// Payment return settled; carries the updated session
    PaymentReconciled {
        session: Box<SessionContext>,
        outcome: Reconciliation,
    },
    /// Payment return could not be settled
    PaymentReconcileError(String),
}

/// List selection state
#[derive(Debug, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total items in the list
    pub total: usize,
}

impl ListState {
    pub fn new(total: usize) -> Self {
        Self { selected: 0, total }
    }

    pub fn next(&mut self) {
        if self.total > 0 {
            self.selected = (self.selected + 1) % self.total;
        }
    }

    pub fn previous(&mut self) {
        if self.total > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.total - 1);
        }
    }
}

/// Error popup for displaying important errors that require user acknowledgment
#[derive(Debug, Clone)]
pub struct ErrorPopup {
    /// Title of the error popup (e.g., "Failed to add product")
    pub title: String,
    /// The full error message to display
    pub message: String,
}

pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Current screen
    pub current_screen: Section,
    /// Navigation history for back navigation
    pub navigation_stack: Vec<Section>,
    /// Sidebar selection, kept in step with `current_screen`
    pub sidebar: ListState,
    /// Status message to display
    pub status_message: Option<String>,
    /// Whether to show the help overlay
    pub show_help: bool,
    /// Error popup to display (requires user dismissal)
    pub error_popup: Option<ErrorPopup>,
    /// Tick counter for the busy spinner
    pub tick_counter: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Async communication
    // ─────────────────────────────────────────────────────────────────────────
    /// Sender for async messages (cloned into tasks)
    pub async_tx: mpsc::Sender<AsyncMessage>,
    /// Receiver for async messages
    pub async_rx: mpsc::Receiver<AsyncMessage>,

    // ─────────────────────────────────────────────────────────────────────────
    // Context
    // ─────────────────────────────────────────────────────────────────────────
    pub config: Config,
    pub source: DataSource,
    pub session: SessionContext,

    // ─────────────────────────────────────────────────────────────────────────
    // Screens
    // ─────────────────────────────────────────────────────────────────────────
    pub overview: Option<Overview>,
    pub overview_error: Option<String>,
    pub users: ListScreen<User>,
    pub products: ListScreen<Product>,
    pub orders: ListScreen<Order>,
    pub categories: ListScreen<Category>,
    pub promotions: ListScreen<PromotionPlan>,
    /// Open category create/edit modal
    pub category_editor: Option<CategoryEditor>,
    pub add_product: AddProductScreen,

    // ─────────────────────────────────────────────────────────────────────────
    // Remote flows
    // ─────────────────────────────────────────────────────────────────────────
    pub submission: Submission,
    /// Whether a payment return is being verified
    pub reconciling: bool,
}

impl App {
    /// Create a new app instance
    pub fn new(config: Config, source: DataSource, session: SessionContext) -> Self {
        let (async_tx, async_rx) = mpsc::channel(32);
        let start = config.default_screen;

        let mut app = Self {
            running: true,
            current_screen: start,
            navigation_stack: Vec::new(),
            sidebar: ListState::new(Section::all().len()),
            status_message: None,
            show_help: false,
            error_popup: None,
            tick_counter: 0,

            async_tx,
            async_rx,

            config,
            source,
            session,

            overview: None,
            overview_error: None,
            users: ListScreen::default(),
            products: ListScreen::default(),
            orders: ListScreen::default(),
            categories: ListScreen::default(),
            promotions: ListScreen::default(),
            category_editor: None,
            add_product: AddProductScreen::default(),

            submission: Submission::new(),
            reconciling: false,
        };
        app.sync_sidebar();
        app.mount(start);
        app
    }

    /// Setup terminal for TUI
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode().map_err(|e| DeskError::Terminal(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| DeskError::Terminal(e.to_string()))?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(|e| DeskError::Terminal(e.to_string()))?;
        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode().map_err(|e| DeskError::Terminal(e.to_string()))?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| DeskError::Terminal(e.to_string()))?;
        terminal
            .show_cursor()
            .map_err(|e| DeskError::Terminal(e.to_string()))?;
        Ok(())
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = Self::setup_terminal()?;
        let mut events = EventHandler::new(Duration::from_millis(self.config.tick_rate_ms));

        // Main event loop
        while self.running {
            terminal
                .draw(|frame| ui::render(frame, self))
                .map_err(|e| DeskError::Terminal(e.to_string()))?;

            // Check for async messages (non-blocking)
            while let Ok(msg) = self.async_rx.try_recv() {
                self.handle_async_message(msg);
            }

            if let Some(event) = events.next().await {
                match event {
                    AppEvent::Key(key) => self.handle_key_event(key),
                    AppEvent::Resize(_, _) => {
                        // Terminal resize is handled automatically by ratatui
                    }
                    AppEvent::Tick => {
                        self.tick_counter = self.tick_counter.wrapping_add(1);
                    }
                }
            }
        }

        Self::restore_terminal(&mut terminal)?;
        Ok(())
    }

    /// Whether a background request is running
    pub fn is_busy(&self) -> bool {
        self.submission.is_busy() || self.reconciling || self.add_product.loading
    }

    /// Handle async message from background tasks
    pub fn handle_async_message(&mut self, msg: AsyncMessage) {
        match msg {
            AsyncMessage::FormChoicesLoaded { categories, plans } => {
                let count = categories.len();
                self.add_product.set_choices(categories, plans);
                self.status_message = Some(format!("Loaded {} categories", count));
            }
            AsyncMessage::FormChoicesError(err) => {
                self.add_product.loading = false;
                self.add_product.loaded = true;
                self.add_product.error = Some(err);
                self.status_message = Some("Failed to load categories".to_string());
            }
            AsyncMessage::ProductSubmitted(outcome) => {
                if let Err(e) = outcome.record(&mut self.session) {
                    warn!("Cannot save pending product: {}", e);
                }
                self.add_product.error = None;
                let product_id = outcome.product_id().to_string();
                match outcome {
                    SubmitOutcome::Created { .. } => {
                        self.add_product.reset();
                        self.status_message =
                            Some(format!("✓ Product listed successfully ({})", product_id));
                    }
                    SubmitOutcome::Redirect {
                        authorization_url, ..
                    } => {
                        let opened = open_browser(&authorization_url);
                        self.add_product.authorization_url = Some(authorization_url);
                        let next = if opened {
                            "Complete payment in your browser"
                        } else {
                            "Open the payment URL shown"
                        };
                        self.status_message = Some(format!(
                            "Draft {} saved. {}, then press [p] to paste the return URL",
                            product_id, next
                        ));
                    }
                }
            }
            AsyncMessage::ProductSubmitError(err) => {
                // Form stays populated so the operator can fix and retry
                self.status_message = None;
                self.error_popup = Some(ErrorPopup {
                    title: "Failed to add product".to_string(),
                    message: err,
                });
            }
            AsyncMessage::PaymentReconciled { session, outcome } => {
                self.reconciling = false;
                self.session = *session;
                self.add_product.authorization_url = None;
                self.status_message = Some(outcome.message());
            }
            AsyncMessage::PaymentReconcileError(err) => {
                self.reconciling = false;
                self.error_popup = Some(ErrorPopup {
                    title: "Payment not confirmed".to_string(),
                    message: err,
                });
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // If help is shown, any key dismisses it
        if self.show_help {
            self.show_help = false;
            return;
        }

        // If error popup is shown, only allow dismissal keys
        if self.error_popup.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                self.error_popup = None;
            }
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        // Modal editor takes every key
        if let Some(editor) = self.category_editor.as_mut() {
            match editor.handle_key(key) {
                EditorAction::Save => self.save_category(),
                EditorAction::Cancel => self.category_editor = None,
                EditorAction::None => {}
            }
            return;
        }

        // Text input bypasses global handlers
        if self.captures_input() {
            self.handle_screen_key(key);
            return;
        }

        // Global key handlers
        if key.code == KeyCode::Char('?') {
            self.show_help = true;
            return;
        }

        if is_quit_key(&key) {
            self.quit();
            return;
        }

        match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(section) = Section::all().get(index) {
                    self.navigate_to(*section);
                }
            }
            KeyCode::Char(']') => self.step_section(1),
            KeyCode::Char('[') => self.step_section(-1),
            _ if is_back_key(&key) && self.current_screen != Section::AddProduct => self.go_back(),
            _ => self.handle_screen_key(key),
        }
    }

    /// Whether the current screen is taking typed text
    fn captures_input(&self) -> bool {
        match self.current_screen {
            Section::Overview => false,
            Section::Customers => self.users.captures_input(),
            Section::Orders => self.orders.captures_input(),
            Section::Products => self.products.captures_input(),
            Section::Categories => self.categories.captures_input(),
            Section::Promotions => self.promotions.captures_input(),
            Section::AddProduct => {
                self.add_product.field.is_text() || self.add_product.return_input.is_some()
            }
        }
    }

    fn handle_screen_key(&mut self, key: KeyEvent) {
        let action = match self.current_screen {
            Section::Overview => {
                if key.code == KeyCode::Char('r') {
                    self.overview = None;
                    self.mount(Section::Overview);
                }
                ListAction::None
            }
            Section::Customers => self.users.handle_key(key),
            Section::Orders => self.orders.handle_key(key),
            Section::Products => match self.products.handle_key(key) {
                ListAction::Create => {
                    self.navigate_to(Section::AddProduct);
                    ListAction::None
                }
                other => other,
            },
            Section::Categories => self.categories.handle_key(key),
            Section::Promotions => self.promotions.handle_key(key),
            Section::AddProduct => {
                self.handle_add_product_key(key);
                ListAction::None
            }
        };

        match action {
            ListAction::None => {}
            ListAction::Status(msg) => self.status_message = Some(msg),
            ListAction::Create if self.current_screen == Section::Categories => {
                self.category_editor = Some(CategoryEditor::new(CategoryDraft::default()));
            }
            ListAction::Edit(id) if self.current_screen == Section::Categories => {
                if let Some(category) = self.categories.view.get(&id) {
                    self.category_editor = Some(CategoryEditor::new(CategoryDraft::edit(category)));
                }
            }
            ListAction::Create | ListAction::Edit(_) => {}
        }
    }

    fn handle_add_product_key(&mut self, key: KeyEvent) {
        if !self.captures_input() && key.code == KeyCode::Char('r') {
            self.add_product.loaded = false;
            self.fetch_form_choices();
            return;
        }
        match self.add_product.handle_key(key) {
            FormAction::None => {}
            FormAction::Back => self.go_back(),
            FormAction::Submit => self.submit_product(),
            FormAction::Reconcile => self.reconcile_payment(),
        }
    }

    /// Create or update the category held by the editor
    fn save_category(&mut self) {
        let Some(mut editor) = self.category_editor.take() else {
            return;
        };
        let now = Utc::now();
        let draft = editor.draft.clone();
        let name = draft.name.trim().to_string();

        let result = match draft.editing.clone() {
            Some(id) => draft
                .into_patch(now)
                .and_then(|patch| self.categories.update(&id, patch)),
            None => draft
                .into_category(now)
                .map(|category| self.categories.insert(category)),
        };

        match result {
            Ok(()) => self.status_message = Some(format!("✓ Saved category '{}'", name)),
            Err(e) => {
                editor.error = Some(e.to_string());
                self.category_editor = Some(editor);
            }
        }
    }

    /// Spawn a task to fetch categories and plans for the form
    pub fn fetch_form_choices(&mut self) {
        if self.add_product.loading {
            return; // Already loading
        }

        let api = match ApiClient::from_session(&self.config.api_base_url, &self.session) {
            Ok(api) => api,
            Err(e) => {
                self.add_product.loaded = true;
                self.add_product.error = Some(e.to_string());
                return;
            }
        };

        self.add_product.loading = true;
        self.add_product.error = None;
        self.status_message = Some("Loading categories and promotion plans...".to_string());

        let tx = self.async_tx.clone();

        tokio::spawn(async move {
            let (categories, plans) = futures::join!(api.categories(), api.promotions());
            let msg = match (categories, plans) {
                (Ok(categories), Ok(plans)) => {
                    AsyncMessage::FormChoicesLoaded { categories, plans }
                }
                (Err(e), _) | (_, Err(e)) => AsyncMessage::FormChoicesError(e.to_string()),
            };
            let _ = tx.send(msg).await;
        });
    }

    /// Spawn the product submission; a second submit while busy is rejected
    fn submit_product(&mut self) {
        let guard = match self.submission.try_begin() {
            Ok(guard) => guard,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };

        let api = match ApiClient::from_session(&self.config.api_base_url, &self.session) {
            Ok(api) => api,
            Err(e) => {
                self.error_popup = Some(ErrorPopup {
                    title: "Failed to add product".to_string(),
                    message: e.to_string(),
                });
                return;
            }
        };

        let form = self.add_product.form.clone();
        let categories = self.add_product.categories.clone();
        let plans = self.add_product.plans.clone();
        let email = self.session.email().map(str::to_string);
        self.status_message = Some("Submitting product...".to_string());

        let tx = self.async_tx.clone();

        tokio::spawn(async move {
            let _guard = guard;
            let result =
                submission::run(&api, &form, &categories, &plans, email.as_deref()).await;
            let msg = match result {
                Ok(outcome) => AsyncMessage::ProductSubmitted(outcome),
                Err(e) => AsyncMessage::ProductSubmitError(e.to_string()),
            };
            let _ = tx.send(msg).await;
        });
    }

    /// Spawn verification of the payment return URL the operator pasted
    fn reconcile_payment(&mut self) {
        if self.reconciling {
            self.status_message = Some("Payment verification already in progress".to_string());
            return;
        }
        let Some(input) = self.add_product.return_input.take() else {
            return;
        };

        let payment = match PaymentReturn::parse(&input) {
            Ok(payment) => payment,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };
        if payment == PaymentReturn::NoPayment {
            self.status_message = Some(Reconciliation::NoPayment.message());
            return;
        }

        let api = match ApiClient::from_session(&self.config.api_base_url, &self.session) {
            Ok(api) => api,
            Err(e) => {
                self.error_popup = Some(ErrorPopup {
                    title: "Payment not confirmed".to_string(),
                    message: e.to_string(),
                });
                return;
            }
        };

        let mut session = self.session.clone();
        self.reconciling = true;
        self.status_message = Some("Verifying payment...".to_string());

        let tx = self.async_tx.clone();

        tokio::spawn(async move {
            let msg = match reconcile(&api, &mut session, payment).await {
                Ok(outcome) => AsyncMessage::PaymentReconciled {
                    session: Box::new(session),
                    outcome,
                },
                Err(e) => AsyncMessage::PaymentReconcileError(e.to_string()),
            };
            let _ = tx.send(msg).await;
        });
    }

    /// Load a screen's records the first time it is shown
    fn mount(&mut self, screen: Section) {
        match screen {
            Section::Overview => {
                if self.overview.is_none() {
                    match self.source.overview() {
                        Ok(overview) => {
                            self.overview = Some(overview);
                            self.overview_error = None;
                        }
                        Err(e) => self.overview_error = Some(e.to_string()),
                    }
                }
            }
            Section::Customers if !self.users.loaded => self.users.load(self.source.users()),
            Section::Orders if !self.orders.loaded => self.orders.load(self.source.orders()),
            Section::Products if !self.products.loaded => {
                self.products.load(self.source.products())
            }
            Section::Categories if !self.categories.loaded => {
                self.categories.load(self.source.categories())
            }
            Section::Promotions if !self.promotions.loaded => {
                self.promotions.load(self.source.promotions())
            }
            Section::AddProduct if !self.add_product.loaded => self.fetch_form_choices(),
            _ => {}
        }
    }

    fn sync_sidebar(&mut self) {
        self.sidebar.selected = Section::all()
            .iter()
            .position(|s| *s == self.current_screen)
            .unwrap_or(0);
    }

    fn step_section(&mut self, delta: isize) {
        let all = Section::all();
        let len = all.len() as isize;
        let index = (self.sidebar.selected as isize + delta).rem_euclid(len) as usize;
        self.navigate_to(all[index]);
    }

    /// Navigate to a new screen
    pub fn navigate_to(&mut self, screen: Section) {
        if screen == self.current_screen {
            return;
        }
        self.navigation_stack.push(self.current_screen);
        self.current_screen = screen;
        self.status_message = None; // Clear stale messages on screen change
        self.sync_sidebar();
        self.mount(screen);
    }

    /// Go back to the previous screen
    pub fn go_back(&mut self) {
        if let Some(screen) = self.navigation_stack.pop() {
            self.current_screen = screen;
            self.status_message = None;
            self.sync_sidebar();
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        if let Err(e) = self.session.save() {
            warn!("Cannot save session: {}", e);
        }
        self.running = false;
    }
}

/// Try to open a URL in the default browser
fn open_browser(url: &str) -> bool {
    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(url).spawn().is_ok()
    }

    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open").arg(url).spawn().is_ok()
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        let _ = url;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(
            Config::default(),
            DataSource::bundled(),
            SessionContext::in_memory(),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_list_state_wraps() {
        let mut state = ListState::new(3);
        state.previous();
        assert_eq!(state.selected, 2);
        state.next();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_starts_on_overview() {
        let app = app();
        assert_eq!(app.current_screen, Section::Overview);
        assert!(app.overview.is_some());
        assert_eq!(app.sidebar.selected, 0);
    }

    #[test]
    fn test_number_keys_navigate_and_mount() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Char('2')));
        assert_eq!(app.current_screen, Section::Customers);
        assert!(app.users.loaded);
        assert!(!app.users.view.is_empty());

        app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(app.current_screen, Section::Overview);
    }

    #[test]
    fn test_search_mode_swallows_navigation_keys() {
        let mut app = app();
        app.navigate_to(Section::Customers);
        app.handle_key_event(key(KeyCode::Char('/')));
        app.handle_key_event(key(KeyCode::Char('3')));
        assert_eq!(app.current_screen, Section::Customers);
        assert_eq!(app.users.filter.search.text(), "3");
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.running);
    }

    #[test]
    fn test_category_editor_creates_record() {
        let mut app = app();
        app.navigate_to(Section::Categories);
        let before = app.categories.view.len();

        app.handle_key_event(key(KeyCode::Char('n')));
        assert!(app.category_editor.is_some());
        for c in "Books".chars() {
            app.handle_key_event(key(KeyCode::Char(c)));
        }
        app.handle_key_event(key(KeyCode::Tab));
        for c in "books.png".chars() {
            app.handle_key_event(key(KeyCode::Char(c)));
        }
        app.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

        assert!(app.category_editor.is_none());
        assert_eq!(app.categories.view.len(), before + 1);
        assert!(app.categories.view.all().iter().any(|c| c.name == "Books"));
    }

    #[test]
    fn test_category_editor_keeps_invalid_draft_open() {
        let mut app = app();
        app.navigate_to(Section::Categories);
        app.handle_key_event(key(KeyCode::Char('n')));
        app.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        let editor = app.category_editor.as_ref().expect("editor stays open");
        assert_eq!(editor.error.as_deref(), Some("Category name is required"));
    }

    #[test]
    fn test_add_product_without_login_reports_error() {
        let mut app = app();
        app.navigate_to(Section::AddProduct);
        assert!(app.add_product.loaded);
        assert!(!app.add_product.loading);
        assert!(app.add_product.error.is_some());
    }

    #[test]
    fn test_submit_error_keeps_form() {
        let mut app = app();
        app.add_product.form.name = "Mouse".into();
        app.handle_async_message(AsyncMessage::ProductSubmitError("Failed to add product".into()));
        assert_eq!(app.add_product.form.name, "Mouse");
        assert!(app.error_popup.is_some());
    }

    #[test]
    fn test_free_listing_resets_form() {
        let mut app = app();
        app.add_product.form.name = "Mouse".into();
        app.handle_async_message(AsyncMessage::ProductSubmitted(SubmitOutcome::Created {
            product_id: "p1".into(),
        }));
        assert!(app.add_product.form.name.is_empty());
        assert!(app.session.pending_product().is_none());
        assert!(app.status_message.unwrap().contains("(p1)"));
    }

    #[test]
    fn test_return_url_kept_while_verifying() {
        let mut app = app();
        app.reconciling = true;
        app.add_product.return_input = Some("?payment=cancelled&productId=p1".into());
        app.reconcile_payment();
        assert_eq!(
            app.add_product.return_input.as_deref(),
            Some("?payment=cancelled&productId=p1")
        );
        assert!(app.status_message.unwrap().contains("already in progress"));
    }

    #[test]
    fn test_reconciled_session_replaces_current() {
        let mut app = app();
        app.session.set_pending_product("p1");
        app.reconciling = true;
        app.handle_async_message(AsyncMessage::PaymentReconciled {
            session: Box::new(SessionContext::in_memory()),
            outcome: Reconciliation::Cancelled {
                product_id: Some("p1".into()),
            },
        });
        assert!(!app.reconciling);
        assert!(app.session.pending_product().is_none());
        assert!(app.status_message.unwrap().contains("draft"));
    }
}
