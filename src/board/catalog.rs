//! Catalog of widget types that can be placed on the board

use serde::Serialize;

/// A kind of widget the board can host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WidgetType {
    /// Stable identifier stored with each placement
    pub id: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// May appear at most once on a board
    pub single_instance: bool,
}

impl WidgetType {
    const fn new(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            single_instance: false,
        }
    }

    const fn single(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            single_instance: true,
        }
    }
}

/// Id of the pinned post widget
pub const PINNED_POST: &str = "pinnedPostWidget";

const UNKNOWN_NAME: &str = "Unknown Widget";

static CATALOG: &[WidgetType] = &[
    WidgetType::new("currentlyListening", "Currently Listening To"),
    WidgetType::new("profileStats", "Profile Stats"),
    WidgetType::new("quickLinks", "Quick Links"),
    WidgetType::new("latestPost", "My Latest Post"),
    WidgetType::new("notes", "Quick Notes"),
    WidgetType::new("moodStatus", "Mood/Status"),
    WidgetType::new("quoteOfTheDay", "Quote of the Day"),
    WidgetType::new("trendingTopics", "Trending Topics"),
    WidgetType::new("photoOfTheDay", "Photo of the Day"),
    WidgetType::new("personalPhotoGallery", "Personal Photo Gallery"),
    WidgetType::new("topFriends", "Top Friends"),
    WidgetType::new("calendarEvents", "Upcoming Events"),
    WidgetType::new("stockTicker", "Stock Ticker"),
    WidgetType::new("weather", "Weather Forecast"),
    WidgetType::new("newsFeed", "News Feed"),
    WidgetType::new("bookmarks", "My Bookmarks"),
    WidgetType::new("favoriteYouTubeVideo", "Favorite YouTube Video"),
    WidgetType::new("clockWidget", "Clock"),
    WidgetType::new("stickyNote", "Sticky Note"),
    WidgetType::new("countdownTimer", "Countdown Timer"),
    WidgetType::new("simpleTodoList", "Simple To-Do List"),
    WidgetType::new("digitalBookshelf", "Digital Bookshelf"),
    WidgetType::new("recipeOfTheDay", "Recipe of the Day"),
    WidgetType::new("askMeAnythingBox", "Ask Me Anything Box"),
    WidgetType::new("guestbook", "Guestbook"),
    WidgetType::new("miniPoll", "Mini Poll"),
    WidgetType::new("githubProjectShowcase", "GitHub Projects"),
    WidgetType::new("artGallerySnippet", "Art Gallery Snippet"),
    WidgetType::new("deviceBattery", "Device Battery"),
    WidgetType::single(PINNED_POST, "Pinned Post"),
    WidgetType::new("virtualPet", "Virtual Pet"),
    WidgetType::new("recentBlogPosts", "Recent Blog Posts"),
    WidgetType::new("favoriteMedia", "Favorite Movies/Shows"),
];

/// Every widget type, in catalog order
pub fn all() -> &'static [WidgetType] {
    CATALOG
}

/// Find a widget type by id
pub fn lookup(id: &str) -> Option<&'static WidgetType> {
    CATALOG.iter().find(|w| w.id == id)
}

/// Display name for a widget type id
pub fn display_name(id: &str) -> &'static str {
    lookup(id).map_or(UNKNOWN_NAME, |w| w.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<_> = all().iter().map(|w| w.id).collect();
        assert_eq!(ids.len(), all().len());
        assert_eq!(all().len(), 33);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(display_name("weather"), "Weather Forecast");
        assert_eq!(display_name("nope"), "Unknown Widget");
        assert!(lookup(PINNED_POST).unwrap().single_instance);
        assert!(!lookup("clockWidget").unwrap().single_instance);
    }
}
