//! The filter/hover state owned by the top-level view.
//!
//! Transitions only accept values that were resolved through the `Catalog`
//! (`CategoryFilter` from `Catalog::category`, `ResourceId` from
//! `Catalog::resource_id`), so the display layer can't ask for a category or a
//! record that doesn't exist.  Raw user input gets resolved (and rejected) one
//! level up in `view::DirectoryView`.

use std::sync::{Arc, Mutex};

use tracing::{info, trace};
use url::Url;

use crate::catalog::{Catalog, CategoryFilter, Resource, ResourceId};

/// Receives "open this in a new navigation context" requests.  Best effort and
/// fire-and-forget; nothing comes back.
pub trait Navigator {
    fn open(&self, url: &Url);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn open(&self, url: &Url) {
        (**self).open(url);
    }
}

/// Keeps every requested URL around so the caller can report on them later.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    opened: Mutex<Vec<Url>>,
}

impl RecordingNavigator {
    pub fn new() -> RecordingNavigator {
        RecordingNavigator::default()
    }

    pub fn take(&self) -> Vec<Url> {
        match self.opened.lock() {
            Ok(mut opened) => std::mem::take(&mut *opened),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Navigator for RecordingNavigator {
    fn open(&self, url: &Url) {
        let mut opened = match self.opened.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        opened.push(url.clone());
    }
}

/// Only logs the request; the HTTP server performs the actual navigation by
/// redirecting the client.
#[derive(Debug, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn open(&self, url: &Url) {
        info!(url = %url, "navigation requested");
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    active: CategoryFilter,
    hovered: Option<ResourceId>,
}

impl InteractionState {
    pub fn new() -> InteractionState {
        InteractionState::default()
    }

    pub fn active_category(&self) -> &CategoryFilter {
        &self.active
    }

    pub fn hovered(&self) -> Option<ResourceId> {
        self.hovered
    }

    pub fn is_emphasized(&self, resource: &Resource) -> bool {
        self.hovered.map(|id| id.get()) == Some(resource.id)
    }

    /// Selecting the already active category is allowed and changes nothing.
    pub fn select_category(&mut self, catalog: &Catalog, category: CategoryFilter) {
        debug_assert!(
            catalog.contains_category(&category),
            "category {} is not derived from the catalog",
            category
        );
        trace!(from = %self.active, to = %category, "select_category");
        self.active = category;
    }

    pub fn hover_enter(&mut self, catalog: &Catalog, id: ResourceId) {
        debug_assert!(catalog.get(id).is_some(), "resource {} not in catalog", id);
        trace!(%id, "hover_enter");
        self.hovered = Some(id);
    }

    /// Only clears the hover if it still belongs to `id`; a leave that arrives
    /// after a newer enter must not wipe the newer hover.
    pub fn hover_leave(&mut self, id: ResourceId) {
        if self.hovered == Some(id) {
            trace!(%id, "hover_leave");
            self.hovered = None;
        } else {
            trace!(%id, hovered = ?self.hovered, "stale hover_leave ignored");
        }
    }

    /// Ask the navigator to open the record.  State is left untouched.
    pub fn activate<'a>(
        &self,
        catalog: &'a Catalog,
        id: ResourceId,
        navigator: &dyn Navigator,
    ) -> Option<&'a Resource> {
        let resource = catalog.get(id)?;
        navigator.open(&resource.url);
        Some(resource)
    }
}
