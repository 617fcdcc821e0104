//! Item manager
//!
//! Screen-level state for browsing and editing item records held by a REST
//! backend: a searchable, sortable list, a detail view, and a create / update
//! form with image upload. Toasts, confirmation prompts and navigation are
//! supplied by the embedding application through small traits.

pub mod config;
pub mod detail;
pub mod error;
pub mod form;
pub mod list;
pub mod navigation;
pub mod notify;

use std::sync::Arc;

pub use item_manager_api as api;
use item_manager_api::{Item, ItemClient, ItemService};

use crate::config::ClientOptions;
use crate::detail::DetailViewer;
use crate::error::Result;
use crate::form::FormController;
use crate::list::ListController;
use crate::navigation::{Confirm, Navigator, Route};
use crate::notify::Notifier;

/// Load lifecycle shared by the screens.
///
/// A failed load goes back to `Idle` and keeps whatever data was there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Populated,
}

/// Marks a screen as loading until [`finish`](Self::finish) is called.
///
/// Dropping it unfinished (the load future was cancelled) puts the screen
/// back to `Idle`.
pub(crate) struct LoadGuard<'a> {
    state: &'a mut LoadState,
}

impl<'a> LoadGuard<'a> {
    pub(crate) fn begin(state: &'a mut LoadState) -> Self {
        *state = LoadState::Loading;
        Self { state }
    }

    pub(crate) fn finish(self, outcome: LoadState) {
        *self.state = outcome;
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if *self.state == LoadState::Loading {
            *self.state = LoadState::Idle;
        }
    }
}

/// How an item's image should be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Absolute, fetchable URL
    Url(String),
    /// The item has no image
    Placeholder,
}

impl ImageRef {
    pub fn for_item(item: &Item, options: &ClientOptions) -> Self {
        match item.image_path() {
            Some(path) => ImageRef::Url(options.resolve_image_url(path)),
            None => ImageRef::Placeholder,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ImageRef::Url(url) => Some(url),
            ImageRef::Placeholder => None,
        }
    }
}

/// A screen ready to be shown for some route
pub enum Screen {
    List(ListController),
    Form(FormController),
    Detail(DetailViewer),
}

/// The main entry point: builds one API client and hands it to every screen
pub struct ItemManager {
    options: ClientOptions,
    service: Arc<dyn ItemService>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    confirm: Arc<dyn Confirm>,
}

impl ItemManager {
    /// Create a manager talking HTTP to `options.base_url`.
    pub fn new(
        options: ClientOptions,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        confirm: Arc<dyn Confirm>,
    ) -> Result<Self> {
        options.validate()?;
        let client = ItemClient::new(&options.base_url, options.http_client()?)?;
        Ok(Self::with_service(
            options,
            Arc::new(client),
            notifier,
            navigator,
            confirm,
        ))
    }

    /// Create a manager around an existing service implementation.
    pub fn with_service(
        options: ClientOptions,
        service: Arc<dyn ItemService>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        Self {
            options,
            service,
            notifier,
            navigator,
            confirm,
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn service(&self) -> Arc<dyn ItemService> {
        self.service.clone()
    }

    pub fn list(&self) -> ListController {
        ListController::new(
            self.service.clone(),
            self.notifier.clone(),
            self.navigator.clone(),
            self.confirm.clone(),
            self.options.clone(),
        )
    }

    pub fn create_form(&self) -> FormController {
        FormController::create(
            self.service.clone(),
            self.notifier.clone(),
            self.navigator.clone(),
            self.options.clone(),
        )
    }

    pub fn update_form(&self, item_id: i64) -> FormController {
        FormController::edit(
            self.service.clone(),
            self.notifier.clone(),
            self.navigator.clone(),
            self.options.clone(),
            item_id,
        )
    }

    pub fn detail(&self, item_id: i64) -> DetailViewer {
        DetailViewer::new(
            self.service.clone(),
            self.notifier.clone(),
            self.navigator.clone(),
            self.options.clone(),
            item_id,
        )
    }

    /// Build and load the screen for a route.
    pub async fn open(&self, route: Route) -> Screen {
        match route {
            Route::List => {
                let mut list = self.list();
                list.initialize().await;
                Screen::List(list)
            }
            Route::Create => Screen::Form(self.create_form()),
            Route::Update(id) => {
                let mut form = self.update_form(id);
                form.initialize().await;
                Screen::Form(form)
            }
            Route::Detail(id) => {
                let mut detail = self.detail(id);
                detail.load().await;
                Screen::Detail(detail)
            }
        }
    }

    /// Parse a path and open its screen.
    pub async fn open_path(&self, path: &str) -> Result<Screen> {
        let route = Route::parse(path)?;
        Ok(self.open(route).await)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::api::{Attachment, Item, ItemQuery, ItemService, SortField, SortOrder};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::form::{FormField, SubmitOutcome, UploadOutcome};
    pub use crate::list::DeleteOutcome;
    pub use crate::navigation::{Confirm, History, Navigator, Route};
    pub use crate::notify::{LogNotifier, Notifier, RecordingNotifier};
    pub use crate::{ImageRef, ItemManager, LoadState, Screen};
}
