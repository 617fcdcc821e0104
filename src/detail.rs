//! Read-only view of a single item

use std::sync::Arc;
use tracing::warn;

use item_manager_api::{Item, ItemService};

use crate::config::ClientOptions;
use crate::navigation::Navigator;
use crate::notify::Notifier;
use crate::{ImageRef, LoadGuard, LoadState};

/// What the detail screen shows right now
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    Loading,
    NotFound,
    Item { item: Item, image: ImageRef },
}

pub struct DetailViewer {
    service: Arc<dyn ItemService>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    options: ClientOptions,
    item_id: i64,
    item: Option<Item>,
    state: LoadState,
}

impl DetailViewer {
    pub fn new(
        service: Arc<dyn ItemService>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        options: ClientOptions,
        item_id: i64,
    ) -> Self {
        Self {
            service,
            notifier,
            navigator,
            options,
            item_id,
            item: None,
            state: LoadState::Idle,
        }
    }

    pub fn item_id(&self) -> i64 {
        self.item_id
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Fetch the item. Any failure is reported; an item from an earlier
    /// successful load is kept, otherwise the view shows "not found".
    pub async fn load(&mut self) {
        let id = self.item_id;
        let loading = LoadGuard::begin(&mut self.state);

        match self.service.get(id).await {
            Ok(item) => {
                self.item = Some(item);
                loading.finish(LoadState::Populated);
            }
            Err(e) => {
                warn!(id, error = %e, "failed to load item details");
                self.notifier.error("Failed to load item details");
                loading.finish(LoadState::Idle);
            }
        }
    }

    pub fn view(&self) -> DetailView {
        if self.state == LoadState::Loading {
            return DetailView::Loading;
        }

        match &self.item {
            Some(item) => DetailView::Item {
                item: item.clone(),
                image: ImageRef::for_item(item, &self.options),
            },
            None => DetailView::NotFound,
        }
    }

    /// "Back to List"
    pub fn back(&self) {
        self.navigator.back();
    }
}
