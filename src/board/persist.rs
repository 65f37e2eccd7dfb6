//! Versioned board persistence over a [`KvStore`]
//!
//! The current format is a single JSON document under one key. Older web
//! client layouts are migrated on load:
//!
//! - v2: unversioned array of placements under `userConfiguredWidgetsLayout_v2`,
//!   with widget content in `widgetContent_*_<instanceId>` keys
//! - v1: eight fixed 1x1 slots under `userWidgetLayout` (or, failing that,
//!   the selection list under `userSelectedWidgets`)
//!
//! Legacy keys are only read, never deleted.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::content::{Countdown, MoodStatus, QuickLink, QuickLinks, Quote, StickyNote, TodoItem, TodoList};
use super::{Board, BoardState, Page, PlacedWidget, WidgetContent, WidgetContents, WidgetSize};
use crate::storage::KvStore;

/// Version written by [`save_board`]
pub const CURRENT_VERSION: u32 = 3;

/// Default storage key of the board document
pub const DEFAULT_BOARD_KEY: &str = "widget_board";

const LEGACY_V2_KEY: &str = "userConfiguredWidgetsLayout_v2";
const LEGACY_V1_LAYOUT_KEY: &str = "userWidgetLayout";
const LEGACY_V1_SELECTED_KEY: &str = "userSelectedWidgets";
const LEGACY_V1_SLOTS: usize = 8;

/// Persisted board document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDocument {
    /// Schema version
    pub version: u32,
    /// Placements
    pub widgets: Vec<PlacedWidget>,
    /// Widget content
    #[serde(default)]
    pub content: WidgetContents,
}

/// Where a loaded board came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardSource {
    /// Current document format
    Current,
    /// Migrated from the v2 placement array
    LegacyPlacements,
    /// Migrated from the v1 eight-slot layout
    LegacySlots,
    /// Nothing stored yet
    Empty,
}

/// Result of [`load_board`]
#[derive(Debug, Clone)]
pub struct LoadedBoard {
    /// Validated state
    pub state: BoardState,
    /// Format it was read from
    pub source: BoardSource,
    /// Stored widgets rejected during validation
    pub dropped: usize,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyWidget {
    instance_id: String,
    widget_id: String,
    page: u8,
    row: u8,
    col: u8,
    size: String,
}

/// Load the board stored under `key`, migrating legacy layouts if needed.
///
/// Every stored widget is re-validated in order; widgets that are out of
/// bounds, overlap an earlier one, or reuse an instance id are dropped.
pub fn load_board(store: &dyn KvStore, key: &str) -> Result<LoadedBoard> {
    if let Some(json) = store.get(key)? {
        let probe: VersionProbe =
            serde_json::from_str(&json).context("Failed to parse board document")?;
        match probe.version {
            Some(CURRENT_VERSION) => {}
            Some(v) if v > CURRENT_VERSION => {
                bail!("Board document version {v} is newer than supported version {CURRENT_VERSION}")
            }
            other => bail!("Unsupported board document version: {other:?}"),
        }

        let doc: BoardDocument =
            serde_json::from_str(&json).context("Failed to parse board document")?;
        let (board, dropped) = validated(doc.widgets);
        let mut content = doc.content;
        let orphans = content.retain_placed(&board);
        if orphans > 0 {
            warn!("Dropped content for {orphans} missing widget(s)");
        }

        return Ok(LoadedBoard {
            state: BoardState { board, content },
            source: BoardSource::Current,
            dropped,
        });
    }

    if let Some(loaded) = load_legacy_placements(store)? {
        return Ok(loaded);
    }

    if let Some(loaded) = load_legacy_slots(store)? {
        return Ok(loaded);
    }

    Ok(LoadedBoard {
        state: BoardState::new(),
        source: BoardSource::Empty,
        dropped: 0,
    })
}

/// Write the board under `key` in the current format
pub fn save_board(store: &mut dyn KvStore, key: &str, state: &BoardState) -> Result<()> {
    let doc = BoardDocument {
        version: CURRENT_VERSION,
        widgets: state.board.widgets().to_vec(),
        content: state.content.clone(),
    };
    let json = serde_json::to_string(&doc).context("Failed to serialize board")?;
    store.set(key, &json)
}

fn validated(widgets: Vec<PlacedWidget>) -> (Board, usize) {
    let mut board = Board::new();
    let mut dropped = 0;
    for widget in widgets {
        let id = widget.instance_id;
        if let Err(e) = board.place(widget) {
            warn!("Dropping stored widget {id}: {e}");
            dropped += 1;
        }
    }
    (board, dropped)
}

fn load_legacy_placements(store: &dyn KvStore) -> Result<Option<LoadedBoard>> {
    let Some(json) = store.get(LEGACY_V2_KEY)? else {
        return Ok(None);
    };
    let legacy: Vec<LegacyWidget> = match serde_json::from_str(&json) {
        Ok(legacy) => legacy,
        Err(e) => {
            warn!("Ignoring unreadable legacy widget layout: {e}");
            return Ok(None);
        }
    };

    let mut converted = Vec::with_capacity(legacy.len());
    let mut legacy_ids = Vec::with_capacity(legacy.len());
    let mut dropped = 0;

    for old in legacy {
        let (Ok(page), Ok(size)) = (Page::try_from(old.page), old.size.parse::<WidgetSize>()) else {
            warn!("Dropping legacy widget {} with page {} size {}", old.instance_id, old.page, old.size);
            dropped += 1;
            continue;
        };
        let widget = PlacedWidget {
            instance_id: Uuid::new_v4(),
            widget_type: old.widget_id,
            page,
            row: old.row,
            col: old.col,
            size,
        };
        legacy_ids.push((widget.instance_id, old.instance_id));
        converted.push(widget);
    }

    let (board, rejected) = validated(converted);
    let mut content = WidgetContents::new();
    for (new_id, old_id) in legacy_ids {
        let Some(widget) = board.get(new_id) else {
            continue;
        };
        if let Some(payload) = legacy_content(store, &old_id, &widget.widget_type)? {
            if let Err(e) = content.set(widget, payload) {
                warn!("Dropping legacy content for {old_id}: {e}");
            }
        }
    }

    info!("Migrated {} widget(s) from legacy placements", board.len());
    Ok(Some(LoadedBoard {
        state: BoardState { board, content },
        source: BoardSource::LegacyPlacements,
        dropped: dropped + rejected,
    }))
}

fn load_legacy_slots(store: &dyn KvStore) -> Result<Option<LoadedBoard>> {
    let layout = store
        .get(LEGACY_V1_LAYOUT_KEY)?
        .and_then(|json| serde_json::from_str::<Vec<Option<String>>>(&json).ok())
        .filter(|slots| slots.len() == LEGACY_V1_SLOTS);

    let slots = match layout {
        Some(slots) => slots,
        None => {
            let Some(selected) = store
                .get(LEGACY_V1_SELECTED_KEY)?
                .and_then(|json| serde_json::from_str::<Vec<String>>(&json).ok())
            else {
                return Ok(None);
            };
            selected.into_iter().take(LEGACY_V1_SLOTS).map(Some).collect()
        }
    };

    let widgets = slots
        .into_iter()
        .enumerate()
        .filter_map(|(index, id)| Some((index, id?)))
        .filter_map(|(index, widget_type)| {
            let page = Page::try_from(u8::try_from(index / 4 + 1).ok()?).ok()?;
            let cell = u8::try_from(index % 4).ok()?;
            Some(PlacedWidget {
                instance_id: Uuid::new_v4(),
                widget_type,
                page,
                row: cell / 2,
                col: cell % 2,
                size: WidgetSize::Small,
            })
        })
        .collect();

    let (board, dropped) = validated(widgets);
    info!("Migrated {} widget(s) from legacy slot layout", board.len());
    Ok(Some(LoadedBoard {
        state: BoardState {
            board,
            content: WidgetContents::new(),
        },
        source: BoardSource::LegacySlots,
        dropped,
    }))
}

#[derive(Deserialize)]
struct LegacyQuickLink {
    name: String,
    url: String,
}

#[derive(Deserialize)]
struct LegacyTodo {
    id: u64,
    text: String,
    #[serde(default)]
    completed: bool,
}

fn legacy_field(store: &dyn KvStore, field: &str, old_id: &str) -> Result<Option<String>> {
    store.get(&format!("widgetContent_{field}_{old_id}"))
}

/// Read the per-field content keys the web client kept for one widget
fn legacy_content(store: &dyn KvStore, old_id: &str, widget_type: &str) -> Result<Option<WidgetContent>> {
    let content = match widget_type {
        "quoteOfTheDay" => match legacy_field(store, "quoteText", old_id)? {
            Some(text) => Some(WidgetContent::Quote(Quote {
                text,
                author: legacy_field(store, "quoteAuthor", old_id)?.unwrap_or_default(),
            })),
            None => None,
        },
        "moodStatus" => match legacy_field(store, "statusText", old_id)? {
            Some(status) => {
                let mut mood = MoodStatus {
                    status,
                    ..MoodStatus::default()
                };
                if let Some(emoji) = legacy_field(store, "moodEmoji", old_id)? {
                    mood.emoji = emoji;
                }
                Some(WidgetContent::MoodStatus(mood))
            }
            None => None,
        },
        "countdownTimer" => {
            let title = legacy_field(store, "countdownTitle", old_id)?;
            let target = legacy_field(store, "countdownTargetDate", old_id)?
                .as_deref()
                .and_then(parse_legacy_datetime);
            match (title, target) {
                (Some(title), Some(target)) => Some(WidgetContent::Countdown(Countdown { title, target })),
                _ => None,
            }
        }
        "quickLinks" => legacy_field(store, "quickLinks_links", old_id)?
            .and_then(|json| serde_json::from_str::<Vec<LegacyQuickLink>>(&json).ok())
            .map(|links| {
                WidgetContent::QuickLinks(QuickLinks {
                    links: links
                        .into_iter()
                        .filter_map(|l| QuickLink::new(&l.name, &l.url).ok())
                        .collect(),
                })
            }),
        "stickyNote" => legacy_field(store, "stickyNote", old_id)?
            .map(|text| WidgetContent::StickyNote(StickyNote { text })),
        "simpleTodoList" => legacy_field(store, "todoItems", old_id)?
            .and_then(|json| serde_json::from_str::<Vec<LegacyTodo>>(&json).ok())
            .map(|items| {
                WidgetContent::TodoList(TodoList {
                    items: items
                        .into_iter()
                        .map(|t| TodoItem {
                            id: t.id,
                            text: t.text,
                            completed: t.completed,
                        })
                        .collect(),
                })
            }),
        _ => None,
    };
    Ok(content)
}

/// Accepts RFC 3339 or the `YYYY-MM-DDTHH:MM` form of a datetime-local input (read as UTC)
fn parse_legacy_datetime(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}
