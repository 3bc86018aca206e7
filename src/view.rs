use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    catalog::Catalog,
    clock::ClockReading,
    error::{DirectoryError, Result},
    interaction::{InteractionState, Navigator},
    view_filter::visible,
};

/// How many category buttons fit in the filter row.
pub const DEFAULT_CATEGORY_ROW_LIMIT: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewOptions {
    pub category_row_limit: usize,
}

impl Default for ViewOptions {
    fn default() -> ViewOptions {
        ViewOptions {
            category_row_limit: DEFAULT_CATEGORY_ROW_LIMIT,
        }
    }
}

/// The interaction state after a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InteractionSummary {
    pub active_category: String,
    pub hovered_id: Option<u32>,
}

/// What `activate` asked the navigator to open.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Activation {
    pub id: u32,
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryChip {
    pub label: String,
    pub active: bool,
    /// Whether the chip is within the first `category_row_limit` and so gets
    /// a button in the filter row.  Every chip is selectable regardless.
    pub shown: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResourceRow {
    pub id: u32,
    /// Zero padded id, `007`.
    pub number: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub url: String,
    pub emphasized: bool,
}

/// Everything the display layers need to draw the directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub active_category: String,
    pub hovered_id: Option<u32>,
    pub categories: Vec<CategoryChip>,
    pub item_count: usize,
    pub rows: Vec<ResourceRow>,
    pub clock: Option<ClockReading>,
}

/// The top-level view: sole owner of the catalog and the interaction state.
///
/// Entry points take raw input (category text, numeric ids) from whichever
/// display layer is driving us and resolve it against the catalog before
/// touching the state, so the `InteractionState` transitions never see an
/// invalid value.
pub struct DirectoryView {
    catalog: Catalog,
    state: InteractionState,
    navigator: Box<dyn Navigator + Send + Sync>,
    clock: Option<ClockReading>,
    options: ViewOptions,
}

impl DirectoryView {
    pub fn new(
        catalog: Catalog,
        navigator: Box<dyn Navigator + Send + Sync>,
        options: ViewOptions,
    ) -> DirectoryView {
        DirectoryView {
            catalog,
            state: InteractionState::new(),
            navigator,
            clock: None,
            options,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn select_category(&mut self, name: &str) -> Result<InteractionSummary> {
        let category = self
            .catalog
            .category(name)
            .ok_or_else(|| DirectoryError::bad_input(format!("no such category: {}", name)))?;
        self.state.select_category(&self.catalog, category);
        Ok(self.summary())
    }

    pub fn hover_enter(&mut self, id: u32) -> Result<InteractionSummary> {
        let id = self
            .catalog
            .resource_id(id)
            .ok_or_else(|| DirectoryError::bad_input(format!("no such resource: {}", id)))?;
        self.state.hover_enter(&self.catalog, id);
        Ok(self.summary())
    }

    /// A leave for an id we've never heard of can't match the hovered id, so
    /// it's the same no-op as any other stale leave.
    pub fn hover_leave(&mut self, id: u32) -> Result<InteractionSummary> {
        match self.catalog.resource_id(id) {
            Some(id) => self.state.hover_leave(id),
            None => trace!(id, "hover_leave for unknown resource ignored"),
        }
        Ok(self.summary())
    }

    pub fn activate(&self, id: u32) -> Result<Activation> {
        let resource_id = self
            .catalog
            .resource_id(id)
            .ok_or_else(|| DirectoryError::bad_input(format!("no such resource: {}", id)))?;
        let resource = self
            .state
            .activate(&self.catalog, resource_id, self.navigator.as_ref())
            .ok_or_else(|| DirectoryError::invariant(format!("resource {} vanished", id)))?;
        debug!(id, url = %resource.url, "activated");
        Ok(Activation {
            id: resource.id,
            name: resource.name.clone(),
            url: resource.url.to_string(),
        })
    }

    pub fn set_clock(&mut self, reading: ClockReading) {
        self.clock = Some(reading);
    }

    pub fn summary(&self) -> InteractionSummary {
        InteractionSummary {
            active_category: self.state.active_category().label().to_string(),
            hovered_id: self.state.hovered().map(|id| id.get()),
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let active = self.state.active_category();

        let categories = self
            .catalog
            .categories()
            .into_iter()
            .enumerate()
            .map(|(i, category)| CategoryChip {
                active: category == *active,
                shown: i < self.options.category_row_limit,
                label: category.label().to_string(),
            })
            .collect();

        let rows: Vec<ResourceRow> = visible(&self.catalog, active)
            .into_iter()
            .map(|r| ResourceRow {
                id: r.id,
                number: format!("{:03}", r.id),
                name: r.name.clone(),
                category: r.category.clone(),
                description: r.description.clone(),
                url: r.url.to_string(),
                emphasized: self.state.is_emphasized(r),
            })
            .collect();

        let summary = self.summary();
        ViewSnapshot {
            active_category: summary.active_category,
            hovered_id: summary.hovered_id,
            categories,
            item_count: rows.len(),
            rows,
            clock: self.clock.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        catalog::test_support::design_ai_design,
        error::ErrorLayer,
        interaction::{LoggingNavigator, RecordingNavigator},
    };

    fn view() -> DirectoryView {
        DirectoryView::new(
            design_ai_design(),
            Box::new(LoggingNavigator),
            ViewOptions::default(),
        )
    }

    #[test]
    fn snapshot_of_initial_view() {
        let snapshot = view().snapshot();
        assert_eq!(snapshot.active_category, "All");
        assert_eq!(snapshot.hovered_id, None);
        assert_eq!(snapshot.item_count, 3);
        assert_eq!(
            snapshot.rows.iter().map(|r| r.number.as_str()).collect::<Vec<_>>(),
            vec!["001", "002", "003"]
        );
        assert!(snapshot.rows.iter().all(|r| !r.emphasized));
        assert_eq!(
            snapshot
                .categories
                .iter()
                .map(|c| (c.label.as_str(), c.active))
                .collect::<Vec<_>>(),
            vec![("All", true), ("Design", false), ("AI", false)]
        );
        assert_eq!(snapshot.clock, None);
    }

    #[test]
    fn filtered_and_hovered_snapshot() {
        let mut view = view();
        view.hover_enter(3).unwrap();
        let summary = view.select_category("Design").unwrap();
        assert_eq!(
            summary,
            InteractionSummary {
                active_category: "Design".to_string(),
                hovered_id: Some(3),
            }
        );

        let snapshot = view.snapshot();
        assert_eq!(snapshot.item_count, 2);
        let rows: Vec<(u32, bool)> = snapshot.rows.iter().map(|r| (r.id, r.emphasized)).collect();
        assert_eq!(rows, vec![(1, false), (3, true)]);
    }

    #[test]
    fn hidden_hover_is_not_emphasized_anywhere() {
        let mut view = view();
        view.hover_enter(2).unwrap();
        view.select_category("Design").unwrap();
        let snapshot = view.snapshot();
        assert_eq!(snapshot.hovered_id, Some(2));
        assert!(snapshot.rows.iter().all(|r| !r.emphasized));
    }

    #[test]
    fn unknown_input_is_bad_input() {
        let mut view = view();
        let err = view.select_category("Cooking").unwrap_err();
        assert_eq!(err.layer(), &ErrorLayer::BadInput);
        assert_eq!(view.hover_enter(99).unwrap_err().layer(), &ErrorLayer::BadInput);
        assert_eq!(view.activate(99).unwrap_err().layer(), &ErrorLayer::BadInput);
        assert_eq!(view.summary().active_category, "All");
    }

    #[test]
    fn unknown_hover_leave_is_noop() {
        let mut view = view();
        view.hover_enter(1).unwrap();
        let summary = view.hover_leave(42).unwrap();
        assert_eq!(summary.hovered_id, Some(1));
    }

    #[test]
    fn row_limit_marks_shown_chips() {
        let view = DirectoryView::new(
            Catalog::builtin(),
            Box::new(LoggingNavigator),
            ViewOptions::default(),
        );
        let snapshot = view.snapshot();
        assert_eq!(snapshot.categories.len(), 15);
        let shown: Vec<&str> = snapshot
            .categories
            .iter()
            .filter(|c| c.shown)
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(
            shown,
            vec!["All", "Funding", "Legal", "Design", "Productivity", "Knowledge"]
        );
    }

    #[test]
    fn activate_reports_and_navigates() {
        let recorder = Arc::new(RecordingNavigator::new());
        let mut view = DirectoryView::new(
            design_ai_design(),
            Box::new(recorder.clone()),
            ViewOptions::default(),
        );
        view.select_category("AI").unwrap();
        let before = view.summary();

        let activation = view.activate(1).unwrap();
        assert_eq!(activation.url, "https://example.com/1");
        assert_eq!(view.summary(), before);
        assert_eq!(recorder.take().len(), 1);
    }

    #[test]
    fn clock_reading_is_carried() {
        let mut view = view();
        let reading = ClockReading {
            time: "09:05:03 PM".to_string(),
            date: "FRIDAY, OCTOBER 16, 2026".to_string(),
        };
        view.set_clock(reading.clone());
        assert_eq!(view.snapshot().clock, Some(reading));
    }
}
