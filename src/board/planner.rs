//! Widget placement: validation, first-fit slot search and board edits

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::catalog;
use super::geometry::{CellRect, PAGE_COLS, PAGE_ROWS, Page, Slot, WidgetSize};
use crate::error::BoardError;

/// A widget placed on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedWidget {
    /// Unique per placement
    pub instance_id: Uuid,
    /// Catalog id of the widget type
    #[serde(rename = "widgetId")]
    pub widget_type: String,
    /// Page the widget lives on
    pub page: Page,
    /// Top row (0 or 1)
    pub row: u8,
    /// Left column (0 or 1)
    pub col: u8,
    /// Footprint
    pub size: WidgetSize,
}

impl PlacedWidget {
    /// Create a widget with a fresh instance id
    pub fn new(widget_type: &str, slot: Slot, size: WidgetSize) -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            widget_type: widget_type.to_string(),
            page: slot.page,
            row: slot.row,
            col: slot.col,
            size,
        }
    }

    /// Anchor position
    pub const fn slot(&self) -> Slot {
        Slot {
            page: self.page,
            row: self.row,
            col: self.col,
        }
    }

    /// Cells covered on its page
    pub const fn rect(&self) -> CellRect {
        CellRect::new(self.row, self.col, self.size)
    }

    /// Display name from the catalog
    pub fn name(&self) -> &'static str {
        catalog::display_name(&self.widget_type)
    }
}

/// Partial change to a widget's placement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPatch {
    /// New page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
    /// New row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u8>,
    /// New column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<u8>,
    /// New size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<WidgetSize>,
}

impl PlacementPatch {
    /// Whether the patch changes nothing
    pub const fn is_empty(&self) -> bool {
        self.page.is_none() && self.row.is_none() && self.col.is_none() && self.size.is_none()
    }

    /// Copy of `widget` with the patch applied
    pub fn apply(&self, widget: &PlacedWidget) -> PlacedWidget {
        PlacedWidget {
            page: self.page.unwrap_or(widget.page),
            row: self.row.unwrap_or(widget.row),
            col: self.col.unwrap_or(widget.col),
            size: self.size.unwrap_or(widget.size),
            ..widget.clone()
        }
    }
}

/// Check that `candidate` stays inside its page and overlaps no other
/// widget on that page. `exclude` names a widget to ignore (the one being
/// moved).
pub fn is_valid_placement(
    widgets: &[PlacedWidget],
    candidate: &PlacedWidget,
    exclude: Option<Uuid>,
) -> bool {
    fits(widgets, candidate.slot(), candidate.size, exclude)
}

fn fits(widgets: &[PlacedWidget], slot: Slot, size: WidgetSize, exclude: Option<Uuid>) -> bool {
    let rect = CellRect::new(slot.row, slot.col, size);
    if !rect.fits_page() {
        return false;
    }

    widgets
        .iter()
        .filter(|w| w.page == slot.page && Some(w.instance_id) != exclude)
        .all(|w| !rect.intersects(&w.rect()))
}

/// All widget placements across both pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    widgets: Vec<PlacedWidget>,
}

impl Board {
    /// Empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Widgets in insertion order
    pub fn widgets(&self) -> &[PlacedWidget] {
        &self.widgets
    }

    /// Number of placed widgets
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether nothing is placed
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Look up a widget by instance id
    pub fn get(&self, instance_id: Uuid) -> Option<&PlacedWidget> {
        self.widgets.iter().find(|w| w.instance_id == instance_id)
    }

    /// Widgets on one page
    pub fn on_page(&self, page: Page) -> impl Iterator<Item = &PlacedWidget> {
        self.widgets.iter().filter(move |w| w.page == page)
    }

    /// Widget covering a given cell, if any
    pub fn widget_at(&self, page: Page, row: u8, col: u8) -> Option<&PlacedWidget> {
        self.on_page(page).find(|w| w.rect().contains(row, col))
    }

    /// Check a candidate placement against this board
    pub fn is_valid_placement(&self, candidate: &PlacedWidget, exclude: Option<Uuid>) -> bool {
        is_valid_placement(&self.widgets, candidate, exclude)
    }

    /// First free position (row-major) on `page` that fits `size`
    pub fn find_first_available_slot(&self, page: Page, size: WidgetSize) -> Option<Slot> {
        for row in 0..=PAGE_ROWS - size.rows() {
            for col in 0..=PAGE_COLS - size.cols() {
                let slot = Slot { page, row, col };
                if fits(&self.widgets, slot, size, None) {
                    return Some(slot);
                }
            }
        }
        None
    }

    /// First free position on page 1, then page 2
    pub fn find_slot(&self, size: WidgetSize) -> Option<Slot> {
        Page::all()
            .iter()
            .find_map(|page| self.find_first_available_slot(*page, size))
    }

    /// Place a new widget of a catalog type in the first free slot.
    ///
    /// `size` defaults to 1x1.
    pub fn add_widget(
        &mut self,
        widget_type: &str,
        size: Option<WidgetSize>,
    ) -> Result<PlacedWidget, BoardError> {
        let kind = catalog::lookup(widget_type)
            .ok_or_else(|| BoardError::UnknownWidgetType(widget_type.to_string()))?;

        self.check_single_instance(kind.id)?;

        let size = size.unwrap_or_default();
        let slot = self.find_slot(size).ok_or(BoardError::NoSlotAvailable(size))?;

        let widget = PlacedWidget::new(kind.id, slot, size);
        info!(
            "Added {} ({}) at page {}, row {}, col {}",
            kind.name, widget.instance_id, slot.page, slot.row, slot.col
        );
        self.widgets.push(widget.clone());
        Ok(widget)
    }

    fn check_single_instance(&self, widget_type: &str) -> Result<(), BoardError> {
        match catalog::lookup(widget_type) {
            Some(kind) if kind.single_instance && self.widgets.iter().any(|w| w.widget_type == kind.id) => {
                Err(BoardError::AlreadyOnBoard(kind.name))
            }
            _ => Ok(()),
        }
    }

    /// Insert an already-built widget after validating it
    pub fn place(&mut self, widget: PlacedWidget) -> Result<(), BoardError> {
        if self.get(widget.instance_id).is_some() {
            return Err(BoardError::DuplicateInstance(widget.instance_id));
        }
        self.check_single_instance(&widget.widget_type)?;
        if !self.is_valid_placement(&widget, None) {
            return Err(invalid(&widget));
        }
        self.widgets.push(widget);
        Ok(())
    }

    /// Move or resize a widget. On failure the board is unchanged.
    pub fn update_widget(
        &mut self,
        instance_id: Uuid,
        patch: PlacementPatch,
    ) -> Result<&PlacedWidget, BoardError> {
        let index = self
            .widgets
            .iter()
            .position(|w| w.instance_id == instance_id)
            .ok_or(BoardError::UnknownInstance(instance_id))?;

        let updated = patch.apply(&self.widgets[index]);
        if !self.is_valid_placement(&updated, Some(instance_id)) {
            debug!("Rejected placement for {instance_id}: {patch:?}");
            return Err(invalid(&updated));
        }

        self.widgets[index] = updated;
        Ok(&self.widgets[index])
    }

    /// Remove a widget, returning it if it was present
    pub fn remove_widget(&mut self, instance_id: Uuid) -> Option<PlacedWidget> {
        let index = self.widgets.iter().position(|w| w.instance_id == instance_id)?;
        Some(self.widgets.remove(index))
    }

    /// Number of uncovered cells on a page
    pub fn free_cells(&self, page: Page) -> usize {
        let used: usize = self
            .on_page(page)
            .map(|w| usize::from(w.size.rows() * w.size.cols()))
            .sum();
        usize::from(PAGE_ROWS * PAGE_COLS).saturating_sub(used)
    }
}

fn invalid(widget: &PlacedWidget) -> BoardError {
    BoardError::InvalidPlacement {
        page: widget.page,
        row: widget.row,
        col: widget.col,
        size: widget.size,
    }
}
