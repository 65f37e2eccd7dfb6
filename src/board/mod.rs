//! Personal widget board: a two-page, 2x2-cell grid of widgets
//!
//! ```text
//!   page 1            page 2
//! ┌───────┬───────┐ ┌───────┬───────┐
//! │ (0,0) │ (0,1) │ │ (0,0) │ (0,1) │
//! ├───────┼───────┤ ├───────┼───────┤
//! │ (1,0) │ (1,1) │ │ (1,0) │ (1,1) │
//! └───────┴───────┘ └───────┴───────┘
//! ```
//!
//! Widgets cover 1x1, 1x2, 2x1 or 2x2 cells and never overlap. New widgets
//! go into the first free slot (row-major, page 1 before page 2).

pub mod catalog;
pub mod content;
mod geometry;
pub mod persist;
mod planner;
pub mod preview;

pub use content::{WidgetContent, WidgetContents};
pub use geometry::{CellRect, PAGE_COLS, PAGE_ROWS, Page, Slot, WidgetSize};
pub use planner::{Board, PlacedWidget, PlacementPatch, is_valid_placement};

use uuid::Uuid;

use crate::error::ContentError;

/// Board placements together with their widgets' content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    /// Placements
    pub board: Board,
    /// Content keyed by instance id
    pub content: WidgetContents,
}

impl BoardState {
    /// Empty board, no content
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a widget and any content attached to it
    pub fn remove_widget(&mut self, instance_id: Uuid) -> Option<PlacedWidget> {
        let removed = self.board.remove_widget(instance_id)?;
        self.content.remove(instance_id);
        Some(removed)
    }

    /// Attach content to a placed widget
    pub fn set_content(&mut self, instance_id: Uuid, content: WidgetContent) -> Result<(), ContentError> {
        let widget = self
            .board
            .get(instance_id)
            .ok_or(ContentError::UnknownWidget(instance_id))?;
        self.content.set(widget, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::content::StickyNote;

    #[test]
    fn test_removing_widget_drops_content() {
        let mut state = BoardState::new();
        let note = state.board.add_widget("stickyNote", None).unwrap();
        state
            .set_content(
                note.instance_id,
                WidgetContent::StickyNote(StickyNote {
                    text: "hello".to_string(),
                }),
            )
            .unwrap();
        assert_eq!(state.content.len(), 1);

        state.remove_widget(note.instance_id).unwrap();
        assert!(state.content.is_empty());
        assert_eq!(
            state.set_content(note.instance_id, WidgetContent::StickyNote(StickyNote::default())),
            Err(ContentError::UnknownWidget(note.instance_id))
        );
    }
}
