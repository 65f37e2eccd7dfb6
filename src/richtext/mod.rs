//! Rich-text segmentation for post text
//!
//! Bluesky annotates post text with *facets*: byte ranges (UTF-8 offsets,
//! not character offsets) carrying a link, mention or hashtag feature.
//! [`segment`] resolves those ranges against the text and produces an
//! ordered list of typed [`Segment`]s that exactly partition the input.

mod record;

pub use record::{ByteSlice, FacetRecord, PostRecord, parse_facets};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::subject;

/// A rich feature attached to a facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Feature {
    /// Hyperlink to an external URI
    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link {
        /// Target URI
        uri: String,
    },
    /// Mention of another account
    #[serde(rename = "app.bsky.richtext.facet#mention")]
    Mention {
        /// DID of the mentioned account
        did: String,
    },
    /// Hashtag
    #[serde(rename = "app.bsky.richtext.facet#tag")]
    Tag {
        /// Tag literal without the leading `#`
        tag: String,
    },
    /// Any feature type this client does not understand
    #[serde(other)]
    Unknown,
}

/// A byte-range annotation on a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    /// Inclusive start, in UTF-8 bytes
    pub byte_start: usize,
    /// Exclusive end, in UTF-8 bytes
    pub byte_end: usize,
    /// Features in declaration order; only the first one is honored
    pub features: Vec<Feature>,
}

impl Facet {
    /// Create a facet with a single feature
    pub fn new(byte_start: usize, byte_end: usize, feature: Feature) -> Self {
        Self {
            byte_start,
            byte_end,
            features: vec![feature],
        }
    }

    /// Link facet
    pub fn link(byte_start: usize, byte_end: usize, uri: &str) -> Self {
        Self::new(byte_start, byte_end, Feature::Link { uri: uri.to_string() })
    }

    /// Mention facet
    pub fn mention(byte_start: usize, byte_end: usize, did: &str) -> Self {
        Self::new(byte_start, byte_end, Feature::Mention { did: did.to_string() })
    }

    /// Hashtag facet
    pub fn tag(byte_start: usize, byte_end: usize, tag: &str) -> Self {
        Self::new(byte_start, byte_end, Feature::Tag { tag: tag.to_string() })
    }
}

/// Kind of a display segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Plain text
    Text,
    /// External link
    Link,
    /// Account mention
    Mention,
    /// Hashtag
    Tag,
}

impl SegmentKind {
    /// Lowercase name, as used on the wire
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Link => "link",
            Self::Mention => "mention",
            Self::Tag => "tag",
        }
    }
}

impl std::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A contiguous, typed slice of the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// What the slice represents
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    /// The slice itself
    pub content: String,
    /// Navigation target for links and mentions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Tag literal for hashtags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Segment {
    /// Plain text segment
    pub fn text(content: &str) -> Self {
        Self {
            kind: SegmentKind::Text,
            content: content.to_string(),
            href: None,
            tag: None,
        }
    }

    /// Build the segment for a facet's text according to its first feature
    fn from_feature(content: &str, feature: Option<&Feature>) -> Self {
        match feature {
            Some(Feature::Link { uri }) => Self {
                kind: SegmentKind::Link,
                content: content.to_string(),
                href: Some(uri.clone()),
                tag: None,
            },
            Some(Feature::Mention { did }) => Self {
                kind: SegmentKind::Mention,
                content: content.to_string(),
                href: Some(subject::profile_href(did)),
                tag: None,
            },
            Some(Feature::Tag { tag }) => Self {
                kind: SegmentKind::Tag,
                content: content.to_string(),
                href: None,
                tag: Some(tag.clone()),
            },
            Some(Feature::Unknown) | None => Self::text(content),
        }
    }

    /// Length of the content in UTF-8 bytes
    pub fn byte_len(&self) -> usize {
        self.content.len()
    }
}

/// Split `text` into typed segments using byte-range facets.
///
/// Facets are processed in ascending `byte_start` order. A facet is skipped
/// (its bytes end up in the surrounding text segments) when its clamped range
/// is empty or reversed, when it starts inside an earlier facet, or when its
/// bounds do not fall on character boundaries. The returned segments always
/// concatenate back to `text`.
pub fn segment(text: &str, facets: &[Facet]) -> Vec<Segment> {
    if facets.is_empty() {
        return vec![Segment::text(text)];
    }

    let len = text.len();
    let mut sorted: Vec<&Facet> = facets.iter().collect();
    sorted.sort_by_key(|f| f.byte_start);

    let mut segments = Vec::with_capacity(sorted.len() * 2 + 1);
    let mut last_byte_end = 0;

    for facet in sorted {
        let byte_start = facet.byte_start;
        let byte_end = facet.byte_end.min(len);

        if byte_start >= byte_end {
            debug!(
                byte_start = facet.byte_start,
                byte_end = facet.byte_end,
                "Skipping empty or reversed facet"
            );
            continue;
        }

        if byte_start < last_byte_end {
            debug!(byte_start, last_byte_end, "Skipping overlapping facet");
            continue;
        }

        if !text.is_char_boundary(byte_start) || !text.is_char_boundary(byte_end) {
            debug!(byte_start, byte_end, "Skipping facet not on character boundaries");
            continue;
        }

        if byte_start > last_byte_end {
            segments.push(Segment::text(&text[last_byte_end..byte_start]));
        }

        segments.push(Segment::from_feature(
            &text[byte_start..byte_end],
            facet.features.first(),
        ));

        last_byte_end = byte_end;
    }

    if last_byte_end < len {
        segments.push(Segment::text(&text[last_byte_end..]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.content.as_str()).collect()
    }

    #[test]
    fn test_no_facets_is_identity() {
        let segments = segment("just words", &[]);
        assert_eq!(segments, vec![Segment::text("just words")]);

        let segments = segment("", &[]);
        assert_eq!(segments, vec![Segment::text("")]);
    }

    #[test]
    fn test_hashtag_at_end() {
        let segments = segment("Hello #world", &[Facet::tag(6, 12, "world")]);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], Segment::text("Hello "));
        assert_eq!(segments[1].kind, SegmentKind::Tag);
        assert_eq!(segments[1].content, "#world");
        assert_eq!(segments[1].tag.as_deref(), Some("world"));
        assert_eq!(segments[1].href, None);
    }

    #[test]
    fn test_link_and_mention() {
        let text = "hi @alice.bsky.social see https://example.com ok";
        let facets = vec![
            Facet::link(26, 45, "https://example.com"),
            Facet::mention(3, 21, "did:plc:alice"),
        ];
        let segments = segment(text, &facets);

        let kinds: Vec<_> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Text,
                SegmentKind::Mention,
                SegmentKind::Text,
                SegmentKind::Link,
                SegmentKind::Text,
            ]
        );
        assert_eq!(segments[1].content, "@alice.bsky.social");
        assert_eq!(segments[1].href.as_deref(), Some("/profile/did:plc:alice"));
        assert_eq!(segments[3].content, "https://example.com");
        assert_eq!(segments[3].href.as_deref(), Some("https://example.com"));
        assert_eq!(joined(&segments), text);
    }

    #[test]
    fn test_multibyte_text() {
        let text = "café 🎉 #tag";
        assert_eq!(text.len(), 15);

        let segments = segment(text, &[Facet::tag(11, 15, "tag")]);
        assert_eq!(segments[0], Segment::text("café 🎉 "));
        assert_eq!(segments[1].kind, SegmentKind::Tag);
        assert_eq!(segments[1].content, "#tag");
    }

    #[test]
    fn test_reversed_facet_keeps_text() {
        let text = "nothing lost here";
        let segments = segment(text, &[Facet::link(10, 2, "https://bad.example")]);
        assert!(segments.iter().all(|s| s.kind == SegmentKind::Text));
        assert_eq!(joined(&segments), text);
    }

    #[test]
    fn test_out_of_range_facets_are_clamped_or_skipped() {
        let text = "short #tail";

        // End past the text is clamped
        let segments = segment(text, &[Facet::tag(6, 400, "tail")]);
        assert_eq!(segments[1].content, "#tail");

        // Start past the text clamps to an empty range and is skipped
        let segments = segment(text, &[Facet::tag(50, 60, "nope")]);
        assert_eq!(segments, vec![Segment::text(text)]);
    }

    #[test]
    fn test_unsorted_facets() {
        let text = "#a #b #c";
        let facets = vec![Facet::tag(6, 8, "c"), Facet::tag(0, 2, "a"), Facet::tag(3, 5, "b")];
        let segments = segment(text, &facets);
        let tags: Vec<_> = segments.iter().filter_map(|s| s.tag.as_deref()).collect();
        assert_eq!(tags, vec!["a", "b", "c"]);
        assert_eq!(joined(&segments), text);
    }

    #[test]
    fn test_overlapping_facet_is_skipped() {
        let text = "https://example.com/#frag";
        let facets = vec![
            Facet::link(0, 25, "https://example.com/#frag"),
            Facet::tag(20, 25, "frag"),
        ];
        let segments = segment(text, &facets);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Link);
        assert_eq!(joined(&segments), text);
    }

    #[test]
    fn test_unknown_or_missing_feature_falls_back_to_text() {
        let text = "odd facet";
        let facets = vec![
            Facet::new(0, 3, Feature::Unknown),
            Facet {
                byte_start: 4,
                byte_end: 9,
                features: Vec::new(),
            },
        ];
        let segments = segment(text, &facets);
        assert!(segments.iter().all(|s| s.kind == SegmentKind::Text));
        assert_eq!(segments[0].content, "odd");
        assert_eq!(joined(&segments), text);
    }

    #[test]
    fn test_only_first_feature_is_honored() {
        let facet = Facet {
            byte_start: 0,
            byte_end: 4,
            features: vec![
                Feature::Tag { tag: "rust".to_string() },
                Feature::Link { uri: "https://rust-lang.org".to_string() },
            ],
        };
        let segments = segment("#rust", &[facet]);
        assert_eq!(segments[0].kind, SegmentKind::Tag);
        assert_eq!(segments[0].content, "#rus");
        assert_eq!(segments[1], Segment::text("t"));
    }

    #[test]
    fn test_zero_length_facet_is_skipped() {
        let segments = segment("ab", &[Facet::link(1, 1, "https://x.example")]);
        assert_eq!(segments, vec![Segment::text("ab")]);

        let segments = segment("ab #c", &[Facet::mention(1, 1, "did:plc:x"), Facet::tag(3, 5, "c")]);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], Segment::text("ab "));
        assert_eq!(segments[1].kind, SegmentKind::Tag);
        assert!(segments.iter().all(|s| !s.content.is_empty()));
    }

    #[test]
    fn test_misaligned_facet_is_skipped() {
        // 🎉 occupies bytes 0..4
        let text = "🎉 party";
        let segments = segment(text, &[Facet::link(2, 6, "https://x.example")]);
        assert_eq!(segments, vec![Segment::text(text)]);
    }

    #[test]
    fn test_segments_cover_the_whole_text() {
        let cases: Vec<(&str, Vec<Facet>)> = vec![
            ("", vec![Facet::tag(0, 3, "x")]),
            ("a", vec![Facet::tag(0, 1, "a"), Facet::tag(0, 1, "a")]),
            ("über #straße", vec![Facet::tag(6, 14, "straße"), Facet::link(1, 0, "x")]),
            ("@me and @you", vec![Facet::mention(8, 12, "did:plc:you"), Facet::mention(0, 3, "did:plc:me")]),
            ("日本語 #タグ", vec![Facet::tag(10, 20, "タグ")]),
        ];

        for (text, facets) in cases {
            let segments = segment(text, &facets);
            let total: usize = segments.iter().map(Segment::byte_len).sum();
            assert_eq!(total, text.len(), "coverage failed for {text:?}");
            assert_eq!(joined(&segments), text, "ordering failed for {text:?}");
        }
    }

    #[test]
    fn test_segment_serializes_like_the_web_client() {
        let segments = segment("Hello #world", &[Facet::tag(6, 12, "world")]);
        let json = serde_json::to_value(&segments).unwrap();
        assert_eq!(json[0]["type"], "text");
        assert!(json[0].get("href").is_none());
        assert_eq!(json[1]["type"], "tag");
        assert_eq!(json[1]["tag"], "world");
    }
}
