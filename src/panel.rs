//! Admin Panel
//!
//! Wires the session store, the navigator and the views together. Every
//! navigation and every session change goes through the route guard, and
//! the screen it settles on decides which view is mounted.

use std::sync::Arc;
use thiserror::Error;

use crate::client::{AdminApi, ApiClient, ClientError, User};
use crate::config::Config;
use crate::router::{Navigator, Route, Screen};
use crate::session::SessionStore;
use crate::storage::{FileStore, TokenSlot};
use crate::views::{DashboardView, LoginError, LoginForm, LoginView, ProductManager};

/// Menu entries of the layout, in display order
pub const MENU: [(&str, &str); 2] = [("/dashboard", "Dashboard"), ("/products", "Products")];

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Could not create the API client: {0}")]
    Client(#[from] ClientError),
}

/// The view currently mounted
pub enum ActiveView {
    Placeholder,
    Login,
    Dashboard(Arc<DashboardView>),
    Products(Arc<ProductManager>),
    NotFound,
}

impl ActiveView {
    fn screen(&self) -> Screen {
        match self {
            ActiveView::Placeholder => Screen::Loading,
            ActiveView::Login => Screen::Login,
            ActiveView::Dashboard(_) => Screen::Dashboard,
            ActiveView::Products(_) => Screen::Products,
            ActiveView::NotFound => Screen::NotFound,
        }
    }

    fn unmount(&self) {
        match self {
            ActiveView::Dashboard(view) => view.unmount(),
            ActiveView::Products(view) => view.unmount(),
            _ => {}
        }
    }
}

/// One entry of the side menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// The logged-in administrator as shown in the layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBadge {
    pub name: String,
    pub initial: String,
}

impl UserBadge {
    fn new(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            initial: user
                .name
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default(),
        }
    }
}

/// Chrome around the protected screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub menu: Vec<MenuEntry>,
    pub user: Option<UserBadge>,
}

pub struct AdminPanel {
    api: Arc<dyn AdminApi>,
    session: Arc<SessionStore>,
    navigator: Navigator,
    view: ActiveView,
}

impl AdminPanel {
    pub fn new(api: Arc<dyn AdminApi>, tokens: TokenSlot) -> Self {
        let session = Arc::new(SessionStore::new(Arc::clone(&api), tokens));
        let navigator = Navigator::new(session.subscribe());

        Self {
            api,
            session,
            navigator,
            view: ActiveView::Placeholder,
        }
    }

    /// Panel talking to the configured API, with the token in the
    /// configured storage file
    pub fn from_config(config: &Config) -> Result<Self, PanelError> {
        let api = ApiClient::new(&config.api.base_url)?;
        let tokens = TokenSlot::new(Arc::new(FileStore::new(&config.storage.path)));

        tracing::debug!(
            base_url = api.base_url(),
            storage = ?config.storage.path,
            "Created admin panel"
        );
        Ok(Self::new(Arc::new(api), tokens))
    }

    /// Validate any persisted token, then settle the current location
    pub async fn start(&mut self) -> Screen {
        self.session.initialize().await;
        self.navigator.refresh();
        self.sync().await
    }

    /// Request `path` and mount whatever the guard allows
    pub async fn navigate(&mut self, path: &str) -> Screen {
        self.navigator.navigate(path);
        self.sync().await
    }

    /// Log in through the session store
    ///
    /// On success the guard moves the panel off `/login`.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, LoginError> {
        let mut form = LoginView::new(Arc::clone(&self.session));
        form.form = LoginForm::new(email, password);

        let result = form.submit().await;
        self.sync().await;
        result
    }

    /// Forget the session and land on `/login`
    pub async fn logout(&mut self) -> Screen {
        self.session.logout();
        self.navigate(Route::ENTRY.path()).await
    }

    /// Re-run the guard if the session changed and mount the matching view
    pub async fn sync(&mut self) -> Screen {
        let screen = self.navigator.current();
        if screen == self.view.screen() {
            return screen;
        }

        self.view.unmount();
        self.view = match screen {
            Screen::Loading => ActiveView::Placeholder,
            Screen::Login => ActiveView::Login,
            Screen::NotFound => ActiveView::NotFound,
            Screen::Dashboard => {
                let view = Arc::new(DashboardView::new(
                    Arc::clone(&self.api),
                    self.session.token_slot().clone(),
                ));
                view.load().await;
                ActiveView::Dashboard(view)
            }
            Screen::Products => {
                let view = Arc::new(ProductManager::new(
                    Arc::clone(&self.api),
                    self.session.token_slot().clone(),
                ));
                view.load().await;
                ActiveView::Products(view)
            }
        };

        tracing::debug!(screen = ?screen, path = self.navigator.location().path(), "Mounted view");
        screen
    }

    /// Screen after re-running the guard
    ///
    /// The session store is shared, so it may have changed since the last
    /// navigation; the mounted view follows.
    pub async fn screen(&mut self) -> Screen {
        self.sync().await
    }

    pub fn location(&self) -> &Route {
        self.navigator.location()
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn dashboard(&self) -> Option<Arc<DashboardView>> {
        match &self.view {
            ActiveView::Dashboard(view) => Some(Arc::clone(view)),
            _ => None,
        }
    }

    pub fn products(&self) -> Option<Arc<ProductManager>> {
        match &self.view {
            ActiveView::Products(view) => Some(Arc::clone(view)),
            _ => None,
        }
    }

    /// Menu with the active entry marked, plus the user badge
    pub fn layout(&self) -> Layout {
        let current = self.navigator.location().path();
        let menu = MENU
            .iter()
            .map(|&(path, label)| MenuEntry {
                path,
                label,
                active: path == current,
            })
            .collect();

        Layout {
            menu,
            user: self.session.snapshot().user.as_ref().map(UserBadge::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        admin_user, customer_user, memory_slot, product, sample_stats, slot_with, FakeApi,
    };
    use crate::views::DashboardState;

    fn api() -> FakeApi {
        FakeApi::new()
            .with_account("admin@x.com", "pw", "t1", admin_user())
            .with_account("carl@x.com", "pw", "t2", customer_user())
            .with_product(product("p1", "Hammer"))
            .with_stats(sample_stats())
    }

    fn panel(api: FakeApi, tokens: TokenSlot) -> (Arc<FakeApi>, AdminPanel) {
        let api = Arc::new(api);
        let panel = AdminPanel::new(api.clone(), tokens);
        (api, panel)
    }

    #[tokio::test]
    async fn test_placeholder_before_start() {
        let (_api, mut panel) = panel(api(), memory_slot());
        assert_eq!(panel.screen().await, Screen::Loading);
    }

    #[tokio::test]
    async fn test_start_without_token_lands_on_login() {
        let (_api, mut panel) = panel(api(), memory_slot());
        assert_eq!(panel.start().await, Screen::Login);
        assert_eq!(panel.location(), &Route::Login);
    }

    #[tokio::test]
    async fn test_start_with_valid_token_mounts_dashboard() {
        let (api, mut panel) = panel(api().with_session("t1", admin_user()), slot_with("t1"));

        assert_eq!(panel.start().await, Screen::Dashboard);

        let dashboard = panel.dashboard().unwrap();
        assert_eq!(dashboard.state().await, DashboardState::Ready(sample_stats()));
        assert_eq!(api.calls(), vec!["me", "stats"]);
    }

    #[tokio::test]
    async fn test_protected_route_redirects_when_anonymous() {
        let (api, mut panel) = panel(api(), memory_slot());
        panel.start().await;

        assert_eq!(panel.navigate("/products").await, Screen::Login);
        assert!(panel.products().is_none());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_moves_to_dashboard() {
        let (_api, mut panel) = panel(api(), memory_slot());
        panel.start().await;

        let user = panel.login("admin@x.com", "pw").await.unwrap();

        assert_eq!(user, admin_user());
        assert_eq!(panel.screen().await, Screen::Dashboard);
        assert_eq!(panel.session().token().as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_customer_login_stays_on_login() {
        let (_api, mut panel) = panel(api(), memory_slot());
        panel.start().await;

        assert!(panel.login("carl@x.com", "pw").await.is_err());

        assert_eq!(panel.screen().await, Screen::Login);
        assert!(panel.session().token().is_none());
    }

    #[tokio::test]
    async fn test_navigation_swaps_views() {
        let (_api, mut panel) = panel(api().with_session("t1", admin_user()), slot_with("t1"));
        panel.start().await;
        let dashboard = panel.dashboard().unwrap();

        assert_eq!(panel.navigate("/products").await, Screen::Products);

        assert!(!dashboard.lifecycle().is_mounted());
        let products = panel.products().unwrap();
        assert_eq!(products.products().await.len(), 1);
    }

    #[tokio::test]
    async fn test_logout_lands_on_login() {
        let (_api, mut panel) = panel(api().with_session("t1", admin_user()), slot_with("t1"));
        panel.start().await;
        panel.navigate("/products").await;
        let products = panel.products().unwrap();

        assert_eq!(panel.logout().await, Screen::Login);

        assert!(!products.lifecycle().is_mounted());
        assert!(panel.session().token().is_none());
        assert!(panel.layout().user.is_none());
    }

    #[tokio::test]
    async fn test_logout_through_shared_session_unmounts_view() {
        let (_api, mut panel) = panel(api().with_session("t1", admin_user()), slot_with("t1"));
        panel.start().await;
        panel.navigate("/products").await;
        let products = panel.products().unwrap();

        let session = Arc::clone(panel.session());
        session.logout();

        assert_eq!(panel.screen().await, Screen::Login);
        assert_eq!(panel.location(), &Route::Login);
        assert!(panel.products().is_none());
        assert!(!products.lifecycle().is_mounted());
    }

    #[tokio::test]
    async fn test_unknown_path_renders_not_found() {
        let (_api, mut panel) = panel(api(), memory_slot());
        panel.start().await;
        assert_eq!(panel.navigate("/orders").await, Screen::NotFound);
    }

    #[tokio::test]
    async fn test_layout_marks_active_entry_and_badge() {
        let (_api, mut panel) = panel(api().with_session("t1", admin_user()), slot_with("t1"));
        panel.start().await;
        panel.navigate("/products").await;

        let layout = panel.layout();

        let active: Vec<&str> = layout
            .menu
            .iter()
            .filter(|e| e.active)
            .map(|e| e.label)
            .collect();
        assert_eq!(active, vec!["Products"]);
        assert_eq!(
            layout.user,
            Some(UserBadge {
                name: "ada admin".to_string(),
                initial: "A".to_string(),
            })
        );
    }
}
