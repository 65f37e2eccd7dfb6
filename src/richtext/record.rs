//! Wire types for `app.bsky.richtext.facet` records

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Facet, Feature, Segment, segment};

/// Byte range of a facet as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteSlice {
    /// Start offset (may be negative in malformed records)
    #[serde(rename = "byteStart")]
    pub byte_start: i64,
    /// End offset
    #[serde(rename = "byteEnd")]
    pub byte_end: i64,
}

/// A facet as stored in a post record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetRecord {
    /// Byte range
    pub index: ByteSlice,
    /// Features, unrecognised ones decoded as [`Feature::Unknown`]
    #[serde(default, deserialize_with = "lenient_features")]
    pub features: Vec<Feature>,
}

/// The text-bearing part of a post record (or a profile description)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Post text
    pub text: String,
    /// Facets, absent on plain posts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<Vec<FacetRecord>>,
}

impl PostRecord {
    /// Resolve the record's facets into display segments
    pub fn segments(&self) -> Vec<Segment> {
        let facets: Vec<Facet> = self
            .facets
            .iter()
            .flatten()
            .cloned()
            .map(Facet::from)
            .collect();
        segment(&self.text, &facets)
    }
}

impl From<FacetRecord> for Facet {
    fn from(record: FacetRecord) -> Self {
        // Negative offsets clamp to zero; an end that clamps below its start
        // is rejected later by the segmenter.
        Self {
            byte_start: usize::try_from(record.index.byte_start).unwrap_or(0),
            byte_end: usize::try_from(record.index.byte_end).unwrap_or(0),
            features: record.features,
        }
    }
}

/// Decode each feature on its own so one malformed entry does not reject the facet
fn lenient_features<'de, D>(deserializer: D) -> Result<Vec<Feature>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap_or(Feature::Unknown))
        .collect())
}

/// Parse a JSON array of facet records
pub fn parse_facets(json: &str) -> Result<Vec<Facet>> {
    let records: Vec<FacetRecord> =
        serde_json::from_str(json).context("Failed to parse facets JSON")?;
    Ok(records.into_iter().map(Facet::from).collect())
}
