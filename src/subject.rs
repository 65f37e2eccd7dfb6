//! Account subject parsing (DIDs and handles)

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Maximum length of a handle (domain name limit)
const MAX_HANDLE_LEN: usize = 253;

static DID_RE: OnceLock<Option<Regex>> = OnceLock::new();
static HANDLE_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn is_did(value: &str) -> bool {
    DID_RE
        .get_or_init(|| Regex::new(r"^did:(plc|web):[a-zA-Z0-9._%:-]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

fn is_handle_shaped(value: &str) -> bool {
    HANDLE_RE
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9](?:[a-zA-Z0-9.-]*[a-zA-Z0-9])?$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

/// What kind of identifier a subject string is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    /// Decentralized identifier (`did:plc:` or `did:web:`)
    Did,
    /// Domain-style handle (e.g. `alice.bsky.social`)
    Handle,
    /// Anything else
    Unknown,
}

/// A classified subject string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Classification
    pub kind: SubjectKind,
    /// Trimmed value
    pub value: String,
}

/// Classify a string as a DID, a handle or neither
pub fn parse_subject(input: &str) -> Subject {
    let value = input.trim();

    let kind = if value.is_empty() {
        SubjectKind::Unknown
    } else if value.starts_with("did:") {
        if is_did(value) {
            SubjectKind::Did
        } else {
            SubjectKind::Unknown
        }
    } else if value.contains('.')
        && !value.starts_with('@')
        && value.len() <= MAX_HANDLE_LEN
        && is_handle_shaped(value)
    {
        SubjectKind::Handle
    } else {
        SubjectKind::Unknown
    };

    Subject {
        kind,
        value: value.to_string(),
    }
}

/// Whether the string is a usable DID or handle
pub fn is_valid_subject(input: &str) -> bool {
    parse_subject(input).kind != SubjectKind::Unknown
}

/// In-app route for an actor's profile page
pub fn profile_href(actor: &str) -> String {
    format!("/profile/{actor}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dids() {
        assert_eq!(parse_subject("did:plc:z72i7hdynmk6r22z27h6tvur").kind, SubjectKind::Did);
        assert_eq!(parse_subject("  did:web:example.com ").value, "did:web:example.com");
        assert_eq!(parse_subject("did:key:abc").kind, SubjectKind::Unknown);
        assert_eq!(parse_subject("did:plc:").kind, SubjectKind::Unknown);
    }

    #[test]
    fn test_handles() {
        assert_eq!(parse_subject("alice.bsky.social").kind, SubjectKind::Handle);
        assert_eq!(parse_subject("@alice.bsky.social").kind, SubjectKind::Unknown);
        assert_eq!(parse_subject("localhost").kind, SubjectKind::Unknown);
        assert_eq!(parse_subject("bad.handle-").kind, SubjectKind::Unknown);
        assert!(!is_valid_subject("   "));

        let long = format!("{}.com", "a".repeat(MAX_HANDLE_LEN));
        assert!(!is_valid_subject(&long));
    }

    #[test]
    fn test_profile_href() {
        assert_eq!(profile_href("did:plc:abc"), "/profile/did:plc:abc");
    }
}
