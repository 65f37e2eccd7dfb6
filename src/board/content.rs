//! Per-widget content (quotes, notes, to-do lists, ...)
//!
//! Content is keyed by widget instance id and typed per widget kind, so a
//! sticky note can never end up attached to a countdown timer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::{Board, PlacedWidget};
use crate::error::ContentError;

const DEFAULT_MOOD_EMOJI: &str = "🤔";
const DEFAULT_COUNTDOWN_TITLE: &str = "My Countdown";
const DEFAULT_COUNTDOWN_DAYS: i64 = 7;

/// Quote of the day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Quote text
    pub text: String,
    /// Attribution
    #[serde(default)]
    pub author: String,
}

/// Mood and short status line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodStatus {
    /// Status text
    pub status: String,
    /// Mood emoji
    pub emoji: String,
}

impl Default for MoodStatus {
    fn default() -> Self {
        Self {
            status: String::new(),
            emoji: DEFAULT_MOOD_EMOJI.to_string(),
        }
    }
}

/// Countdown to a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    /// Title shown above the timer
    pub title: String,
    /// Moment the countdown reaches zero
    pub target: DateTime<Utc>,
}

impl Countdown {
    /// Default countdown: one week from `now`
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            title: DEFAULT_COUNTDOWN_TITLE.to_string(),
            target: now + Duration::days(DEFAULT_COUNTDOWN_DAYS),
        }
    }

    /// Time left, or `None` once the target has passed
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        let left = self.target.signed_duration_since(now);
        (left > Duration::zero()).then_some(left)
    }

    /// Remaining time as "1d 2h 3m 4s"
    pub fn describe(&self, now: DateTime<Utc>) -> String {
        match self.remaining(now) {
            Some(left) => format!(
                "{}d {}h {}m {}s",
                left.num_days(),
                left.num_hours() % 24,
                left.num_minutes() % 60,
                left.num_seconds() % 60
            ),
            None => "Countdown finished!".to_string(),
        }
    }
}

/// A named link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickLink {
    /// Stable id
    pub id: Uuid,
    /// Label
    pub name: String,
    /// Target, http or https only
    pub url: String,
}

impl QuickLink {
    /// Validate and build a link
    pub fn new(name: &str, url: &str) -> Result<Self, ContentError> {
        let link = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            url: url.trim().to_string(),
        };
        link.validate()?;
        Ok(link)
    }

    fn validate(&self) -> Result<(), ContentError> {
        if self.name.is_empty() {
            return Err(ContentError::EmptyField("Link name"));
        }
        if self.url.is_empty() {
            return Err(ContentError::EmptyField("Link URL"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ContentError::InvalidUrl(self.url.clone()));
        }
        Ok(())
    }
}

/// List of quick links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickLinks {
    /// Links in display order
    pub links: Vec<QuickLink>,
}

impl QuickLinks {
    /// Append a link
    pub fn add(&mut self, name: &str, url: &str) -> Result<&QuickLink, ContentError> {
        self.links.push(QuickLink::new(name, url)?);
        Ok(&self.links[self.links.len() - 1])
    }

    /// Remove a link by id
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.links.len();
        self.links.retain(|l| l.id != id);
        self.links.len() != before
    }
}

/// Free-form note
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickyNote {
    /// Note body
    pub text: String,
}

/// One to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Id, unique within its list
    pub id: u64,
    /// Task text
    pub text: String,
    /// Done flag
    pub completed: bool,
}

/// Simple to-do list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    /// Items in insertion order
    pub items: Vec<TodoItem>,
}

impl TodoList {
    /// Add a task, returning its id
    pub fn add(&mut self, text: &str) -> Result<u64, ContentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ContentError::EmptyField("Task text"));
        }
        let id = self.items.iter().map(|i| i.id).max().map_or(1, |max| max + 1);
        self.items.push(TodoItem {
            id,
            text: text.to_string(),
            completed: false,
        });
        Ok(id)
    }

    /// Flip an item's completed flag
    pub fn toggle(&mut self, id: u64) -> Result<bool, ContentError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(ContentError::UnknownTodo(id))?;
        item.completed = !item.completed;
        Ok(item.completed)
    }

    /// Delete an item
    pub fn remove(&mut self, id: u64) -> Result<(), ContentError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(ContentError::UnknownTodo(id))?;
        self.items.remove(index);
        Ok(())
    }

    /// Number of unfinished items
    pub fn open_count(&self) -> usize {
        self.items.iter().filter(|i| !i.completed).count()
    }
}

/// Content payload for a configurable widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WidgetContent {
    /// For `quoteOfTheDay`
    Quote(Quote),
    /// For `moodStatus`
    MoodStatus(MoodStatus),
    /// For `countdownTimer`
    Countdown(Countdown),
    /// For `quickLinks`
    QuickLinks(QuickLinks),
    /// For `stickyNote`
    StickyNote(StickyNote),
    /// For `simpleTodoList`
    TodoList(TodoList),
}

impl WidgetContent {
    /// Catalog id of the widget type this content belongs to
    pub const fn widget_type(&self) -> &'static str {
        match self {
            Self::Quote(_) => "quoteOfTheDay",
            Self::MoodStatus(_) => "moodStatus",
            Self::Countdown(_) => "countdownTimer",
            Self::QuickLinks(_) => "quickLinks",
            Self::StickyNote(_) => "stickyNote",
            Self::TodoList(_) => "simpleTodoList",
        }
    }

    /// Short name of the content kind
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Quote(_) => "Quote",
            Self::MoodStatus(_) => "Mood/status",
            Self::Countdown(_) => "Countdown",
            Self::QuickLinks(_) => "Quick links",
            Self::StickyNote(_) => "Sticky note",
            Self::TodoList(_) => "To-do list",
        }
    }

    /// Empty content for a widget type, if that type is configurable
    pub fn default_for(widget_type: &str, now: DateTime<Utc>) -> Option<Self> {
        match widget_type {
            "quoteOfTheDay" => Some(Self::Quote(Quote::default())),
            "moodStatus" => Some(Self::MoodStatus(MoodStatus::default())),
            "countdownTimer" => Some(Self::Countdown(Countdown::starting_at(now))),
            "quickLinks" => Some(Self::QuickLinks(QuickLinks::default())),
            "stickyNote" => Some(Self::StickyNote(StickyNote::default())),
            "simpleTodoList" => Some(Self::TodoList(TodoList::default())),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), ContentError> {
        match self {
            Self::Quote(quote) if quote.text.trim().is_empty() => {
                Err(ContentError::EmptyField("Quote text"))
            }
            Self::Countdown(countdown) if countdown.title.trim().is_empty() => {
                Err(ContentError::EmptyField("Countdown title"))
            }
            Self::QuickLinks(links) => links.links.iter().try_for_each(QuickLink::validate),
            _ => Ok(()),
        }
    }
}

/// Content for all widgets on a board, keyed by instance id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetContents {
    entries: HashMap<Uuid, WidgetContent>,
}

impl WidgetContents {
    /// No content
    pub fn new() -> Self {
        Self::default()
    }

    /// Content for a widget
    pub fn get(&self, instance_id: Uuid) -> Option<&WidgetContent> {
        self.entries.get(&instance_id)
    }

    /// Attach or replace a widget's content after validating it
    pub fn set(&mut self, widget: &PlacedWidget, content: WidgetContent) -> Result<(), ContentError> {
        if content.widget_type() != widget.widget_type {
            return Err(ContentError::WrongWidgetType {
                content: content.kind_name(),
                widget_type: widget.widget_type.clone(),
            });
        }
        content.validate()?;
        self.entries.insert(widget.instance_id, content);
        Ok(())
    }

    /// Drop a widget's content
    pub fn remove(&mut self, instance_id: Uuid) -> Option<WidgetContent> {
        self.entries.remove(&instance_id)
    }

    /// Drop content whose widget is gone or whose type no longer matches
    pub fn retain_placed(&mut self, board: &Board) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, content| {
            board
                .get(*id)
                .is_some_and(|w| w.widget_type == content.widget_type())
        });
        before - self.entries.len()
    }

    /// Number of widgets with content
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no widget has content
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
