//! Item list screen: search, sort and delete

use std::sync::Arc;
use tracing::{debug, warn};

use item_manager_api::{Item, ItemQuery, ItemService, SortField, SortOrder};

use crate::config::ClientOptions;
use crate::navigation::{Confirm, Navigator, Route};
use crate::notify::Notifier;
use crate::{ImageRef, LoadGuard, LoadState};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this item?";

/// Result of [`ListController::delete_item`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent
    Cancelled,
    Deleted,
    Failed,
}

/// One table row, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub id: i64,
    pub name: String,
    pub item_type: String,
    pub category: String,
    pub price: f64,
    pub image: ImageRef,
}

/// What the list screen shows right now
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Loading,
    Table(Vec<ItemRow>),
}

/// Owns the list screen state and refetches whenever the sort changes.
///
/// Items are kept exactly as the backend ordered them.
pub struct ListController {
    service: Arc<dyn ItemService>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    confirm: Arc<dyn Confirm>,
    options: ClientOptions,
    items: Vec<Item>,
    search: String,
    sort_by: Option<SortField>,
    sort_order: SortOrder,
    state: LoadState,
}

impl ListController {
    pub fn new(
        service: Arc<dyn ItemService>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        confirm: Arc<dyn Confirm>,
        options: ClientOptions,
    ) -> Self {
        Self {
            service,
            notifier,
            navigator,
            confirm,
            options,
            items: Vec::new(),
            search: String::new(),
            sort_by: None,
            sort_order: SortOrder::Asc,
            state: LoadState::Idle,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn sort_by(&self) -> Option<SortField> {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// The query the current state maps to.
    pub fn query(&self) -> ItemQuery {
        ItemQuery {
            search: Some(self.search.clone()),
            sort_by: self.sort_by,
            sort_order: self.sort_by.map(|_| self.sort_order),
        }
    }

    /// Load the first page when the screen opens.
    pub async fn initialize(&mut self) {
        self.refresh().await;
    }

    /// Refetch the list for the current search and sort.
    ///
    /// On failure, or if the returned future is dropped early, the previous
    /// items stay in place.
    pub async fn refresh(&mut self) {
        let query = self.query();
        debug!(?query, "refreshing item list");
        let loading = LoadGuard::begin(&mut self.state);

        match self.service.list(&query).await {
            Ok(items) => {
                self.items = items;
                loading.finish(LoadState::Populated);
            }
            Err(e) => {
                warn!(error = %e, "failed to load items");
                self.notifier.error("Failed to load items");
                loading.finish(LoadState::Idle);
            }
        }
    }

    /// Click on a sortable column header.
    pub async fn toggle_sort(&mut self, field: SortField) {
        if self.sort_by == Some(field) {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_by = Some(field);
            self.sort_order = SortOrder::Asc;
        }
        self.on_sort_changed().await;
    }

    // Any change of sort column or direction refetches; search edits don't.
    async fn on_sort_changed(&mut self) {
        self.refresh().await;
    }

    /// Edit the search box without querying the backend.
    pub fn set_search_text(&mut self, text: &str) {
        self.search = text.to_string();
    }

    /// The explicit search action.
    pub async fn search(&mut self, text: &str) {
        self.set_search_text(text);
        self.refresh().await;
    }

    /// Search with whatever is already in the search box.
    pub async fn submit_search(&mut self) {
        self.refresh().await;
    }

    /// Delete an item after the user confirms.
    ///
    /// A failed delete leaves the list as it was, stale until the next refresh.
    pub async fn delete_item(&mut self, id: i64) -> DeleteOutcome {
        if !self.confirm.confirm(DELETE_PROMPT) {
            debug!(id, "delete cancelled");
            return DeleteOutcome::Cancelled;
        }

        match self.service.delete(id).await {
            Ok(()) => {
                self.notifier.success("Item deleted successfully!");
                self.refresh().await;
                DeleteOutcome::Deleted
            }
            Err(e) => {
                warn!(id, error = %e, "failed to delete item");
                self.notifier.error("Failed to delete item!");
                DeleteOutcome::Failed
            }
        }
    }

    /// Which arrow of a column header is highlighted.
    pub fn sort_indicator(&self, field: SortField) -> Option<SortOrder> {
        (self.sort_by == Some(field)).then_some(self.sort_order)
    }

    pub fn rows(&self) -> Vec<ItemRow> {
        self.items
            .iter()
            .map(|item| ItemRow {
                id: item.id,
                name: item.name.clone(),
                item_type: item.item_type.clone(),
                category: item.category.clone(),
                price: item.price,
                image: ImageRef::for_item(item, &self.options),
            })
            .collect()
    }

    pub fn view(&self) -> ListView {
        if self.is_loading() {
            ListView::Loading
        } else {
            ListView::Table(self.rows())
        }
    }

    pub fn open_create(&self) {
        self.navigator.navigate(Route::Create);
    }

    pub fn open_detail(&self, id: i64) {
        self.navigator.navigate(Route::Detail(id));
    }

    pub fn open_update(&self, id: i64) {
        self.navigator.navigate(Route::Update(id));
    }
}
