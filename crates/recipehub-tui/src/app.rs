//! Application state management for the Recipe Hub terminal client.
//!
//! This module contains the `App` struct that owns the client context, the
//! state of the view for the current route, and the channel background
//! requests report back on.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use recipehub_core::api::{ApiResponse, ListQuery};
use recipehub_core::models::{
    DraftField, FieldErrors, Recipe, RecipeDraft, RecipePage, User,
};
use recipehub_core::{AuthError, ClientContext, Config, Route, Session, ViewScope};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background result channel.
/// A view issues at most a couple of requests at a time.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// How often the stored session is checked for changes made elsewhere
const SESSION_POLL_INTERVAL: Duration = Duration::from_secs(1);

const MAX_NAME_LENGTH: usize = 64;

/// RFC 5321 path limit
const MAX_EMAIL_LENGTH: usize = 254;

/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Number of lines to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: u16 = 10;

const LOAD_RECIPES_FAILED: &str = "Failed to load recipes";
const LOAD_RECIPE_FAILED: &str = "Failed to load recipe";
const CREATE_FAILED: &str = "Failed to create recipe";
const UPDATE_FAILED: &str = "Failed to update recipe";
const DELETE_FAILED: &str = "Failed to delete";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingDelete,
    ConfirmingQuit,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn title(&self) -> &'static str {
        match self {
            AuthMode::Login => "Welcome back",
            AuthMode::Register => "Create your account",
        }
    }

    pub fn submit_label(&self, submitting: bool) -> &'static str {
        match (self, submitting) {
            (AuthMode::Login, false) => "Login",
            (AuthMode::Login, true) => "Signing in...",
            (AuthMode::Register, false) => "Register",
            (AuthMode::Register, true) => "Creating...",
        }
    }

    /// The other form, offered as a link under the button
    pub fn switch_route(&self) -> Route {
        match self {
            AuthMode::Login => Route::Register,
            AuthMode::Register => Route::Login,
        }
    }

    pub fn switch_label(&self) -> &'static str {
        match self {
            AuthMode::Login => "No account? Register",
            AuthMode::Register => "Already have an account? Login",
        }
    }
}

/// Focusable items on the login and registration forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
    Submit,
    Switch,
}

impl AuthField {
    fn order(mode: AuthMode) -> &'static [AuthField] {
        match mode {
            AuthMode::Login => &[
                AuthField::Email,
                AuthField::Password,
                AuthField::Submit,
                AuthField::Switch,
            ],
            AuthMode::Register => &[
                AuthField::Name,
                AuthField::Email,
                AuthField::Password,
                AuthField::Submit,
                AuthField::Switch,
            ],
        }
    }

    /// Get the next field (wrapping around)
    pub fn next(self, mode: AuthMode) -> Self {
        let order = Self::order(mode);
        let index = order.iter().position(|f| *f == self).unwrap_or(0);
        order[(index + 1) % order.len()]
    }

    /// Get the previous field (wrapping around)
    pub fn prev(self, mode: AuthMode) -> Self {
        let order = Self::order(mode);
        let index = order.iter().position(|f| *f == self).unwrap_or(0);
        order[(index + order.len() - 1) % order.len()]
    }
}

/// Recipe listing (`/`)
#[derive(Debug, Clone, Default)]
pub struct ListView {
    pub page: u32,
    pub query: String,
    pub recipes: Option<RecipePage>,
    pub loading: bool,
    pub error: Option<String>,
    pub selection: usize,
}

impl ListView {
    pub fn items(&self) -> &[Recipe] {
        self.recipes.as_ref().map(|p| p.items.as_slice()).unwrap_or_default()
    }

    pub fn selected(&self) -> Option<&Recipe> {
        self.items().get(self.selection)
    }
}

/// A single recipe (`/recipes/:id`)
#[derive(Debug, Clone, Default)]
pub struct DetailView {
    pub id: String,
    pub recipe: Option<Recipe>,
    pub loading: bool,
    pub error: Option<String>,
    pub deleting: bool,
    pub scroll: u16,
}

/// Create (`/recipes/create`) or edit (`/recipes/:id/edit`) form
#[derive(Debug, Clone)]
pub struct FormView {
    /// Id of the recipe being edited; None when creating
    pub editing: Option<String>,
    pub draft: RecipeDraft,
    pub focus: DraftField,
    pub errors: FieldErrors,
    pub loading: bool,
    /// The recipe to edit could not be loaded; the form is not shown
    pub load_failed: bool,
    pub submitting: bool,
    pub error: Option<String>,
}

impl FormView {
    fn new(editing: Option<String>) -> Self {
        Self {
            loading: editing.is_some(),
            editing,
            draft: RecipeDraft::default(),
            focus: DraftField::Title,
            errors: FieldErrors::new(),
            load_failed: false,
            submitting: false,
            error: None,
        }
    }
}

/// Login (`/login`) or registration (`/register`) form
#[derive(Debug, Clone)]
pub struct AuthView {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub focus: AuthField,
    pub submitting: bool,
    pub error: Option<String>,
}

impl AuthView {
    fn new(mode: AuthMode, email: String) -> Self {
        let focus = match mode {
            AuthMode::Register => AuthField::Name,
            AuthMode::Login if email.is_empty() => AuthField::Email,
            AuthMode::Login => AuthField::Password,
        };
        Self {
            mode,
            name: String::new(),
            email,
            password: String::new(),
            focus,
            submitting: false,
            error: None,
        }
    }

    /// The text buffer behind the focused item, if it is a text field
    pub fn focused_input(&mut self) -> Option<(&mut String, usize)> {
        match self.focus {
            AuthField::Name => Some((&mut self.name, MAX_NAME_LENGTH)),
            AuthField::Email => Some((&mut self.email, MAX_EMAIL_LENGTH)),
            AuthField::Password => Some((&mut self.password, MAX_PASSWORD_LENGTH)),
            AuthField::Submit | AuthField::Switch => None,
        }
    }

    fn missing_fields(&self) -> Option<&'static str> {
        let blank = |s: &str| s.trim().is_empty();
        match self.mode {
            AuthMode::Register if blank(&self.name) => Some("Name is required"),
            _ if blank(&self.email) => Some("Email is required"),
            _ if self.password.is_empty() => Some("Password is required"),
            _ => None,
        }
    }
}

/// State for whichever route is being shown
#[derive(Debug, Clone)]
pub enum View {
    List(ListView),
    Detail(DetailView),
    Form(FormView),
    Auth(AuthView),
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from background requests.
#[derive(Debug)]
enum ViewEvent {
    /// Listing response for the requested page
    RecipesLoaded { page: u32, response: ApiResponse },
    /// Single recipe, for the detail view or to prefill the edit form
    RecipeLoaded(ApiResponse),
    /// Create (editing = None) or update finished
    Saved {
        editing: Option<String>,
        response: ApiResponse,
    },
    Deleted(ApiResponse),
    /// Login or registration finished; on success the router has already moved on
    SignedIn {
        email: String,
        result: Result<Session, AuthError>,
    },
}

impl ViewEvent {
    /// Whether the event still matters after its view was left
    fn outlives_view(&self) -> bool {
        matches!(self, ViewEvent::SignedIn { result: Ok(_), .. })
    }
}

#[derive(Debug)]
struct ViewResult {
    /// View generation the request was issued for
    generation: u64,
    event: ViewEvent,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub ctx: ClientContext,
    pub config: Config,

    // UI state
    pub state: AppState,
    pub route: Route,
    pub view: View,
    pub user: Option<User>,
    pub search_input: String,
    pub status_message: Option<String>,

    /// Listing to return to from detail and form views
    last_list: Route,

    // Work for the current view; replaced (and aborted) on every route change
    scope: ViewScope,
    generation: u64,

    route_rx: watch::Receiver<Route>,
    results_rx: mpsc::Receiver<ViewResult>,
    results_tx: mpsc::Sender<ViewResult>,
    session_rx: mpsc::UnboundedReceiver<Session>,
    session_watcher: JoinHandle<()>,
}

impl App {
    /// Create the application. Must be called within a tokio runtime.
    pub fn new(ctx: ClientContext, config: Config) -> Self {
        let (results_tx, results_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let (session_tx, session_rx) = mpsc::unbounded_channel();
        ctx.session.on_external_change(move |session| {
            let _ = session_tx.send(session.clone());
        });
        let session_watcher = ctx.session.spawn_external_watcher(SESSION_POLL_INTERVAL);

        let mut route_rx = ctx.router.subscribe();
        let route = route_rx.borrow_and_update().clone();
        let user = ctx.session.current_user();

        Self {
            ctx,
            config,
            state: AppState::Normal,
            view: View::List(ListView::default()),
            route,
            user,
            search_input: String::new(),
            status_message: None,
            last_list: Route::home(),
            scope: ViewScope::new(),
            generation: 0,
            route_rx,
            results_rx,
            results_tx,
            session_rx,
            session_watcher,
        }
    }

    /// Show the first view.
    pub fn start(&mut self, initial: Route) {
        self.navigate(initial);
    }

    pub fn is_authenticated(&self) -> bool {
        self.ctx.auth.is_authenticated()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn navigate(&mut self, route: Route) {
        self.ctx.router.navigate(route);
        self.sync_route();
    }

    /// Leave the current view for its natural parent.
    pub fn go_back(&mut self) {
        let target = match &self.view {
            View::Form(FormView {
                editing: Some(id), ..
            }) => Route::RecipeDetail(id.clone()),
            _ => self.last_list.clone(),
        };
        self.navigate(target);
    }

    /// Reload the current view from the server.
    pub fn reload(&mut self) {
        self.enter_route(self.route.clone());
    }

    /// Pick up a route published by the router.
    fn sync_route(&mut self) {
        match self.route_rx.has_changed() {
            Ok(true) => {
                let route = self.route_rx.borrow_and_update().clone();
                self.enter_route(route);
            }
            Ok(false) => {}
            Err(e) => error!(error = %e, "Router closed"),
        }
    }

    fn enter_route(&mut self, route: Route) {
        debug!(route = %route, "Entering view");

        // Dropping the old scope aborts its in-flight requests
        self.scope = ViewScope::new();
        self.generation += 1;
        if self.state != AppState::Quitting {
            self.state = AppState::Normal;
        }
        self.user = self.ctx.session.current_user();

        self.view = match &route {
            Route::Home { page, query } => {
                self.last_list = route.clone();
                self.search_input = query.clone();
                View::List(ListView {
                    page: *page,
                    query: query.clone(),
                    loading: true,
                    ..ListView::default()
                })
            }
            Route::RecipeDetail(id) => View::Detail(DetailView {
                id: id.clone(),
                loading: true,
                ..DetailView::default()
            }),
            Route::CreateRecipe => View::Form(FormView::new(None)),
            Route::EditRecipe(id) => View::Form(FormView::new(Some(id.clone()))),
            Route::Login => View::Auth(AuthView::new(
                AuthMode::Login,
                self.config.last_email.clone().unwrap_or_default(),
            )),
            Route::Register => View::Auth(AuthView::new(AuthMode::Register, String::new())),
        };
        self.route = route.clone();

        let api = self.ctx.api.clone();
        match route {
            Route::Home { page, query } => {
                let query = ListQuery::new(page, query);
                self.spawn_view(async move {
                    let response = api.list_recipes(&query).await;
                    ViewEvent::RecipesLoaded { page, response }
                });
            }
            Route::RecipeDetail(id) | Route::EditRecipe(id) => {
                self.spawn_view(async move { ViewEvent::RecipeLoaded(api.get_recipe(&id).await) });
            }
            Route::CreateRecipe | Route::Login | Route::Register => {}
        }
    }

    // =========================================================================
    // Background Tasks
    // =========================================================================

    /// Run `work` in the current view's scope and report its result.
    fn spawn_view<F>(&self, work: F)
    where
        F: Future<Output = ViewEvent> + Send + 'static,
    {
        let tx = self.results_tx.clone();
        let generation = self.generation;
        // Aborted when the view's scope is dropped
        let _ = self.scope.spawn(async move {
            let event = work.await;
            Self::send_result(&tx, ViewResult { generation, event }).await;
        });
    }

    /// Helper to send results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<ViewResult>, result: ViewResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send view result - channel closed");
        }
    }

    /// Apply finished requests, external session changes and route changes.
    pub fn check_background_tasks(&mut self) {
        // Collect all pending results first to avoid borrow conflicts
        let mut results = Vec::new();
        while let Ok(result) = self.results_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            if result.generation != self.generation && !result.event.outlives_view() {
                debug!(
                    generation = result.generation,
                    current = self.generation,
                    "Dropping result for a view that is gone"
                );
                continue;
            }
            self.process_event(result.event);
        }

        let mut latest_session = None;
        while let Ok(session) = self.session_rx.try_recv() {
            latest_session = Some(session);
        }
        if let Some(session) = latest_session {
            self.on_external_session_change(&session);
        }

        self.sync_route();
    }

    fn on_external_session_change(&mut self, session: &Session) {
        info!(authenticated = session.is_authenticated(), "Session changed elsewhere");
        self.user = session.user();
        self.status_message = Some(if session.is_authenticated() {
            "Signed in from another window".to_string()
        } else {
            "Signed out from another window".to_string()
        });
        if let Some(route) = self.ctx.router.revalidate() {
            debug!(route = %route, "Current view no longer allowed");
        }
    }

    fn process_event(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::RecipesLoaded { page, response } => {
                if let View::List(list) = &mut self.view {
                    list.loading = false;
                    if response.ok {
                        let recipes = RecipePage::from_response(&response.data, page);
                        list.selection = list.selection.min(recipes.items.len().saturating_sub(1));
                        list.recipes = Some(recipes);
                    } else {
                        list.error = Some(response.message_or(LOAD_RECIPES_FAILED).to_string());
                    }
                }
            }
            ViewEvent::RecipeLoaded(response) => {
                let loaded = if response.ok {
                    Recipe::from_value(&response.data).ok_or_else(|| "Recipe not found.".to_string())
                } else {
                    Err(response.message_or(LOAD_RECIPE_FAILED).to_string())
                };
                match &mut self.view {
                    View::Detail(detail) => {
                        detail.loading = false;
                        match loaded {
                            Ok(recipe) => detail.recipe = Some(recipe),
                            Err(message) => detail.error = Some(message),
                        }
                    }
                    View::Form(form) => {
                        form.loading = false;
                        match loaded {
                            Ok(recipe) => form.draft = RecipeDraft::from_recipe(&recipe),
                            Err(message) => {
                                form.load_failed = true;
                                form.error = Some(message);
                            }
                        }
                    }
                    _ => {}
                }
            }
            ViewEvent::Saved { editing, response } => {
                if response.ok {
                    let target = match editing {
                        Some(id) => Route::RecipeDetail(id),
                        None => Recipe::from_value(&response.data)
                            .and_then(|r| r.id)
                            .map(Route::RecipeDetail)
                            .unwrap_or_else(Route::home),
                    };
                    info!(route = %target, "Recipe saved");
                    self.status_message = Some("Recipe saved".to_string());
                    self.navigate(target);
                } else if let View::Form(form) = &mut self.view {
                    let default = if editing.is_some() { UPDATE_FAILED } else { CREATE_FAILED };
                    form.submitting = false;
                    form.error = Some(response.message_or(default).to_string());
                }
            }
            ViewEvent::Deleted(response) => {
                if response.ok {
                    info!("Recipe deleted");
                    self.status_message = Some("Recipe deleted".to_string());
                    self.navigate(Route::home());
                } else {
                    if let View::Detail(detail) = &mut self.view {
                        detail.deleting = false;
                    }
                    self.status_message = Some(response.message_or(DELETE_FAILED).to_string());
                }
            }
            ViewEvent::SignedIn { email, result } => match result {
                Ok(session) => {
                    self.user = session.user();
                    let name = self.user.as_ref().map(User::display_name).unwrap_or("back");
                    self.status_message = Some(format!("Welcome, {}", name));

                    self.config.last_email = Some(email);
                    if let Err(e) = self.config.save() {
                        warn!(error = %e, "Failed to save config");
                    }
                }
                Err(e) => {
                    if let View::Auth(auth) = &mut self.view {
                        auth.submitting = false;
                        auth.password.clear();
                        auth.error = Some(e.to_string());
                    }
                }
            },
        }
    }

    // =========================================================================
    // Listing
    // =========================================================================

    pub fn next_page(&mut self) {
        let target = match &self.view {
            View::List(list) if list.recipes.as_ref().is_some_and(RecipePage::has_next_page) => {
                Route::Home {
                    page: list.page + 1,
                    query: list.query.clone(),
                }
            }
            _ => return,
        };
        self.navigate(target);
    }

    pub fn prev_page(&mut self) {
        let target = match &self.view {
            View::List(list) if list.page > 1 => Route::Home {
                page: list.page - 1,
                query: list.query.clone(),
            },
            _ => return,
        };
        self.navigate(target);
    }

    pub fn start_search(&mut self) {
        self.state = AppState::Searching;
    }

    /// Run the typed search from the first page.
    pub fn submit_search(&mut self) {
        self.state = AppState::Normal;
        let query = self.search_input.trim().to_string();
        self.navigate(Route::Home { page: 1, query });
    }

    pub fn open_selected(&mut self) {
        let id = match &self.view {
            View::List(list) => list.selected().and_then(|r| r.id.clone()),
            _ => None,
        };
        if let Some(id) = id {
            self.navigate(Route::RecipeDetail(id));
        }
    }

    // =========================================================================
    // Detail
    // =========================================================================

    /// Whether the signed-in user owns the recipe being shown
    pub fn owns_current_recipe(&self) -> bool {
        match (&self.view, &self.user) {
            (View::Detail(detail), Some(user)) => {
                detail.recipe.as_ref().is_some_and(|r| r.is_owned_by(user))
            }
            _ => false,
        }
    }

    pub fn start_edit(&mut self) {
        if !self.owns_current_recipe() {
            return;
        }
        if let View::Detail(detail) = &self.view {
            let id = detail.id.clone();
            self.navigate(Route::EditRecipe(id));
        }
    }

    pub fn request_delete(&mut self) {
        let busy = matches!(&self.view, View::Detail(d) if d.deleting);
        if self.owns_current_recipe() && !busy {
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.state = AppState::Normal;
        let id = match &mut self.view {
            View::Detail(detail) => {
                detail.deleting = true;
                detail.id.clone()
            }
            _ => return,
        };
        let api = self.ctx.api.clone();
        self.spawn_view(async move { ViewEvent::Deleted(api.delete_recipe(&id).await) });
    }

    // =========================================================================
    // Forms
    // =========================================================================

    /// Validate and send the recipe form.
    pub fn submit_form(&mut self) {
        let (editing, payload) = match &mut self.view {
            View::Form(form) if !form.submitting && !form.loading && !form.load_failed => {
                match form.draft.to_payload() {
                    Ok(payload) => {
                        form.errors.clear();
                        form.error = None;
                        form.submitting = true;
                        (form.editing.clone(), payload)
                    }
                    Err(errors) => {
                        if let Some(first) = errors.keys().next() {
                            form.focus = *first;
                        }
                        form.errors = errors;
                        return;
                    }
                }
            }
            _ => return,
        };

        let api = self.ctx.api.clone();
        self.spawn_view(async move {
            let response = match &editing {
                Some(id) => api.update_recipe(id, &payload).await,
                None => api.create_recipe(&payload).await,
            };
            ViewEvent::Saved { editing, response }
        });
    }

    /// Send the login or registration form.
    pub fn submit_auth(&mut self) {
        let (mode, name, email, password) = match &mut self.view {
            View::Auth(auth) if !auth.submitting => {
                if let Some(missing) = auth.missing_fields() {
                    auth.error = Some(missing.to_string());
                    return;
                }
                auth.error = None;
                auth.submitting = true;
                (
                    auth.mode,
                    auth.name.trim().to_string(),
                    auth.email.trim().to_string(),
                    auth.password.clone(),
                )
            }
            _ => return,
        };

        let service = self.ctx.auth.clone();
        self.spawn_view(async move {
            let result = match mode {
                AuthMode::Login => service.login(&email, &password).await,
                AuthMode::Register => service.register(&name, &email, &password).await,
            };
            ViewEvent::SignedIn { email, result }
        });
    }

    pub fn logout(&mut self) {
        if !self.is_authenticated() {
            return;
        }
        match self.ctx.auth.logout() {
            Ok(()) => self.status_message = Some("Signed out".to_string()),
            Err(e) => {
                error!(error = %e, "Logout failed");
                self.status_message = Some(format!("Logout failed: {}", e));
            }
        }
        self.sync_route();
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.session_watcher.abort();
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character should be accepted into a field holding `current_len` chars
pub fn can_add_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
