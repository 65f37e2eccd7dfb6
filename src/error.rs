//! Domain error types

use thiserror::Error;
use uuid::Uuid;

use crate::board::{Page, WidgetSize};

/// A rejected widget-board operation. The board is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Placement overlaps another widget or leaves the 2x2 page
    #[error("Invalid placement: {size} at page {page}, row {row}, col {col} overlaps or is out of bounds")]
    InvalidPlacement {
        /// Target page
        page: Page,
        /// Target row
        row: u8,
        /// Target column
        col: u8,
        /// Requested size
        size: WidgetSize,
    },

    /// Neither page has room for the requested size
    #[error("No available slot on either page for a {0} widget")]
    NoSlotAvailable(WidgetSize),

    /// No widget with this instance id is on the board
    #[error("No widget with instance id {0}")]
    UnknownInstance(Uuid),

    /// Another widget already uses this instance id
    #[error("Duplicate widget instance id {0}")]
    DuplicateInstance(Uuid),

    /// Widget type id is not in the catalog
    #[error("Unknown widget type: {0}")]
    UnknownWidgetType(String),

    /// Widget type may only be placed once
    #[error("{0} can only be added once")]
    AlreadyOnBoard(&'static str),

    /// Size literal is not one of 1x1, 1x2, 2x1, 2x2
    #[error("Unknown widget size: {0}")]
    UnknownSize(String),

    /// Page number is not 1 or 2
    #[error("Unknown page: {0}")]
    UnknownPage(u8),
}

/// Invalid per-widget content
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// Content kind does not belong to the widget's type
    #[error("{content} content cannot be attached to a {widget_type} widget")]
    WrongWidgetType {
        /// Kind of content supplied
        content: &'static str,
        /// Type of the target widget
        widget_type: String,
    },

    /// A required field is blank
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// Quick link URL is not http(s)
    #[error("URL must start with http:// or https://: {0}")]
    InvalidUrl(String),

    /// No widget with this instance id is on the board
    #[error("No widget with instance id {0}")]
    UnknownWidget(Uuid),

    /// To-do item id not found
    #[error("No to-do item with id {0}")]
    UnknownTodo(u64),
}
