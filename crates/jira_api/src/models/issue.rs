use serde::Deserialize;
use serde_json::Value;

/// Raw issue record as returned by issue reads and searches. The `fields`
/// payload is kept semi-structured because half of it is instance-specific
/// custom fields; callers extract what they need through the total functions
/// in [`crate::fields`].
#[derive(Debug, Deserialize, Clone)]
pub struct IssueRecord {
    pub key: String,
    #[serde(default)]
    pub fields: Value,
}
