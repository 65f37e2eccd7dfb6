//! Pages, sizes and cell rectangles of the widget grid

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BoardError;

/// Rows per page
pub const PAGE_ROWS: u8 = 2;
/// Columns per page
pub const PAGE_COLS: u8 = 2;

/// One of the two board pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Page {
    /// First page
    #[default]
    One,
    /// Second page
    Two,
}

impl Page {
    /// Pages in fill order
    pub const fn all() -> &'static [Self] {
        &[Self::One, Self::Two]
    }

    /// 1-based page number
    pub const fn number(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl TryFrom<u8> for Page {
    type Error = BoardError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(BoardError::UnknownPage(other)),
        }
    }
}

impl From<Page> for u8 {
    fn from(page: Page) -> Self {
        page.number()
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Widget footprint, written `RxC` (rows by columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WidgetSize {
    /// One cell
    #[default]
    #[serde(rename = "1x1")]
    Small,
    /// One row, two columns
    #[serde(rename = "1x2")]
    Wide,
    /// Two rows, one column
    #[serde(rename = "2x1")]
    Tall,
    /// The whole page
    #[serde(rename = "2x2")]
    Full,
}

impl WidgetSize {
    /// All sizes, smallest first
    pub const fn all() -> &'static [Self] {
        &[Self::Small, Self::Wide, Self::Tall, Self::Full]
    }

    /// Height in cells
    pub const fn rows(&self) -> u8 {
        match self {
            Self::Small | Self::Wide => 1,
            Self::Tall | Self::Full => 2,
        }
    }

    /// Width in cells
    pub const fn cols(&self) -> u8 {
        match self {
            Self::Small | Self::Tall => 1,
            Self::Wide | Self::Full => 2,
        }
    }

    /// `RxC` literal
    pub const fn literal(&self) -> &'static str {
        match self {
            Self::Small => "1x1",
            Self::Wide => "1x2",
            Self::Tall => "2x1",
            Self::Full => "2x2",
        }
    }
}

impl FromStr for WidgetSize {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|size| size.literal() == s.trim())
            .ok_or_else(|| BoardError::UnknownSize(s.to_string()))
    }
}

impl std::fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.literal())
    }
}

/// A candidate position for a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Page
    pub page: Page,
    /// Top row
    pub row: u8,
    /// Left column
    pub col: u8,
}

/// Axis-aligned block of cells on one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    /// Top row
    pub row: u8,
    /// Left column
    pub col: u8,
    /// Height
    pub rows: u8,
    /// Width
    pub cols: u8,
}

impl CellRect {
    /// Rectangle covered by a widget of `size` anchored at `(row, col)`
    pub const fn new(row: u8, col: u8, size: WidgetSize) -> Self {
        Self {
            row,
            col,
            rows: size.rows(),
            cols: size.cols(),
        }
    }

    /// Bottom edge (exclusive)
    pub const fn bottom(&self) -> u8 {
        self.row.saturating_add(self.rows)
    }

    /// Right edge (exclusive)
    pub const fn right(&self) -> u8 {
        self.col.saturating_add(self.cols)
    }

    /// Whether the rectangle lies inside a single page
    pub const fn fits_page(&self) -> bool {
        self.row < PAGE_ROWS && self.col < PAGE_COLS && self.bottom() <= PAGE_ROWS && self.right() <= PAGE_COLS
    }

    /// Both row ranges and column ranges overlap
    pub const fn intersects(&self, other: &Self) -> bool {
        self.col < other.right()
            && other.col < self.right()
            && self.row < other.bottom()
            && other.row < self.bottom()
    }

    /// Whether the cell at `(row, col)` is covered
    pub const fn contains(&self, row: u8, col: u8) -> bool {
        row >= self.row && row < self.bottom() && col >= self.col && col < self.right()
    }
}
