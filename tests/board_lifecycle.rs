//! End-to-end board and rich-text flows through the public API

use chrono::Utc;
use omnisky::board::content::StickyNote;
use omnisky::board::persist::{self, BoardSource, DEFAULT_BOARD_KEY};
use omnisky::board::{WidgetContent, preview};
use omnisky::richtext::{PostRecord, SegmentKind};
use omnisky::{BoardState, KvStore, Page, PlacementPatch, SqliteStore, WidgetSize};
use tempfile::tempdir;

#[test]
fn board_survives_reopening_the_database() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("data").join("omnisky.sqlite");

    let (note_id, clock_id) = {
        let mut store = SqliteStore::open_path(&db).unwrap();
        let mut state = BoardState::new();
        let note = state.board.add_widget("stickyNote", Some(WidgetSize::Wide)).unwrap();
        let clock = state.board.add_widget("clockWidget", None).unwrap();
        state
            .set_content(
                note.instance_id,
                WidgetContent::StickyNote(StickyNote {
                    text: "buy milk".to_string(),
                }),
            )
            .unwrap();
        state
            .board
            .update_widget(
                clock.instance_id,
                PlacementPatch {
                    page: Some(Page::Two),
                    row: Some(0),
                    col: Some(0),
                    size: Some(WidgetSize::Full),
                },
            )
            .unwrap();
        persist::save_board(&mut store, DEFAULT_BOARD_KEY, &state).unwrap();
        (note.instance_id, clock.instance_id)
    };

    let store = SqliteStore::open_path(&db).unwrap();
    let loaded = persist::load_board(&store, DEFAULT_BOARD_KEY).unwrap();
    assert_eq!(loaded.source, BoardSource::Current);
    assert_eq!(loaded.dropped, 0);

    let board = &loaded.state.board;
    assert_eq!(board.len(), 2);
    let clock = board.get(clock_id).unwrap();
    assert_eq!((clock.page, clock.row, clock.col, clock.size), (Page::Two, 0, 0, WidgetSize::Full));
    assert!(matches!(
        loaded.state.content.get(note_id),
        Some(WidgetContent::StickyNote(note)) if note.text == "buy milk"
    ));

    let rendered = preview::render(board);
    assert!(rendered.contains("Sticky Note"));
}

#[test]
fn removing_a_widget_drops_its_content() {
    let dir = tempdir().unwrap();
    let mut store = SqliteStore::open_path(&dir.path().join("omnisky.sqlite")).unwrap();

    let mut state = BoardState::new();
    let todo = state.board.add_widget("simpleTodoList", None).unwrap();
    let content = WidgetContent::default_for("simpleTodoList", Utc::now()).unwrap();
    state.set_content(todo.instance_id, content).unwrap();
    assert!(state.remove_widget(todo.instance_id).is_some());
    persist::save_board(&mut store, DEFAULT_BOARD_KEY, &state).unwrap();

    let loaded = persist::load_board(&store, DEFAULT_BOARD_KEY).unwrap();
    assert!(loaded.state.board.is_empty());
    assert!(loaded.state.content.is_empty());
}

#[test]
fn legacy_layout_migrates_into_sqlite() {
    let dir = tempdir().unwrap();
    let mut store = SqliteStore::open_path(&dir.path().join("omnisky.sqlite")).unwrap();
    store
        .set(
            "userWidgetLayout",
            r#"["clockWidget", null, null, "weather", "stickyNote", null, null, null]"#,
        )
        .unwrap();

    let loaded = persist::load_board(&store, DEFAULT_BOARD_KEY).unwrap();
    assert_eq!(loaded.source, BoardSource::LegacySlots);
    let slots: Vec<_> = loaded
        .state
        .board
        .widgets()
        .iter()
        .map(|w| (w.widget_type.as_str(), w.page, w.row, w.col))
        .collect();
    assert_eq!(
        slots,
        vec![
            ("clockWidget", Page::One, 0, 0),
            ("weather", Page::One, 1, 1),
            ("stickyNote", Page::Two, 0, 0),
        ]
    );

    persist::save_board(&mut store, DEFAULT_BOARD_KEY, &loaded.state).unwrap();
    let reloaded = persist::load_board(&store, DEFAULT_BOARD_KEY).unwrap();
    assert_eq!(reloaded.source, BoardSource::Current);
    assert_eq!(reloaded.state.board, loaded.state.board);
    assert!(store.get("userWidgetLayout").unwrap().is_some());
}

#[test]
fn post_record_json_segments() {
    let json = r#"{
        "text": "gm @alice.bsky.social ✨ see https://example.com #morning",
        "facets": [
            {
                "index": {"byteStart": 50, "byteEnd": 58},
                "features": [{"$type": "app.bsky.richtext.facet#tag", "tag": "morning"}]
            },
            {
                "index": {"byteStart": 3, "byteEnd": 21},
                "features": [{"$type": "app.bsky.richtext.facet#mention", "did": "did:plc:alice"}]
            },
            {
                "index": {"byteStart": 30, "byteEnd": 49},
                "features": [{"$type": "app.bsky.richtext.facet#link", "uri": "https://example.com"}]
            }
        ]
    }"#;
    let record: PostRecord = serde_json::from_str(json).unwrap();
    let segments = record.segments();

    let kinds: Vec<SegmentKind> = segments.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SegmentKind::Text,
            SegmentKind::Mention,
            SegmentKind::Text,
            SegmentKind::Link,
            SegmentKind::Text,
            SegmentKind::Tag,
        ]
    );
    assert_eq!(segments[1].content, "@alice.bsky.social");
    assert_eq!(segments[1].href.as_deref(), Some("/profile/did:plc:alice"));
    assert_eq!(segments[3].content, "https://example.com");
    assert_eq!(segments[5].tag.as_deref(), Some("morning"));

    let rebuilt: String = segments.iter().map(|s| s.content.as_str()).collect();
    assert_eq!(rebuilt, record.text);
}
