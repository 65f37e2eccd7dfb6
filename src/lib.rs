//! # OmniSky
//!
//! Core logic of the OmniSky Bluesky client: rich-text segmentation and the
//! personal widget board.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        CLI (main.rs)                        │
//! │      Parses commands, loads config, wires storage in        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │    RichText     │ │      Board      │ │     Config      │
//! │                 │ │                 │ │                 │
//! │ • Facets        │ │ • Placement     │ │ • Load/Save     │
//! │ • Segments      │ │ • Content       │ │ • Paths         │
//! │ • Record JSON   │ │ • Persistence   │ │ • Log level     │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!                              │
//!                              ▼
//!                     ┌─────────────────┐
//!                     │     Storage     │
//!                     │                 │
//!                     │ • KvStore trait │
//!                     │ • SQLite        │
//!                     │ • Memory        │
//!                     └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`richtext`]: Facet → segment resolution for post text
//! - [`board`]: Widget board layout, content and persistence
//! - [`storage`]: Key-value backends
//! - [`subject`]: DID / handle classification
//! - [`embed`]: Profile music embed players
//! - [`config`]: Configuration management
//! - [`error`]: Domain error types
//!
//! ## Example
//!
//! ```
//! use omnisky::richtext::{Facet, SegmentKind, segment};
//!
//! let segments = segment("Hello #world", &[Facet::tag(6, 12, "world")]);
//! assert_eq!(segments[1].kind, SegmentKind::Tag);
//! assert_eq!(segments[1].content, "#world");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::return_self_not_must_use)]

pub mod board;
pub mod config;
pub mod embed;
pub mod error;
pub mod paths;
pub mod richtext;
pub mod storage;
pub mod subject;

// Re-export main types for convenience
pub use board::{Board, BoardState, Page, PlacedWidget, PlacementPatch, Slot, WidgetSize};
pub use config::Config;
pub use error::{BoardError, ContentError};
pub use richtext::{Facet, Feature, Segment, SegmentKind, segment};
pub use storage::{KvStore, MemoryStore, SqliteStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
