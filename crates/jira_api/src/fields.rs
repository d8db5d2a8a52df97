//! Default-tolerant extraction of issue fields from semi-structured payloads.
//!
//! Jira payload shapes drift per instance and per field configuration, so
//! every extractor here is a total function: malformed or absent data yields
//! one of the named sentinels below, never an error.

use serde_json::Value;

pub const NO_TITLE: &str = "No Title";
pub const UNASSIGNED: &str = "Unassigned";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_DESCRIPTION: &str = "No description available";

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Assignee identity extracted from an issue's fields. The account id is the
/// stable handle; the display name is presentation only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeRef {
    pub display_name: String,
    pub account_id: Option<String>,
}

/// Returns the issue summary, defaulting to [`NO_TITLE`].
pub fn summary_of(fields: &Value) -> String {
    fields
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or(NO_TITLE)
        .to_string()
}

/// Returns the assignee identity, with the [`UNASSIGNED`] sentinel when the
/// field is null or missing.
pub fn assignee_of(fields: &Value) -> AssigneeRef {
    let assignee = fields.get("assignee");
    AssigneeRef {
        display_name: assignee
            .and_then(|a| a.get("displayName"))
            .and_then(Value::as_str)
            .unwrap_or(UNASSIGNED)
            .to_string(),
        account_id: assignee
            .and_then(|a| a.get("accountId"))
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Reads a select-style custom field, which Jira serializes as an object with
/// a `value` sub-field. Anything else yields [`NOT_AVAILABLE`].
pub fn option_value_of(fields: &Value, field_id: &str) -> String {
    fields
        .get(field_id)
        .and_then(|f| f.get("value"))
        .and_then(Value::as_str)
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Sums the worklog embedded in an expanded issue read, in hours rounded to
/// two decimals. This is the issue's own lifetime total, distinct from any
/// windowed aggregation.
pub fn own_hours_of(fields: &Value) -> f64 {
    let seconds: f64 = fields
        .get("worklog")
        .and_then(|w| w.get("worklogs"))
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|wl| wl.get("timeSpentSeconds").and_then(Value::as_f64))
                .sum()
        })
        .unwrap_or(0.0);
    round_hours(seconds / SECONDS_PER_HOUR)
}

/// Rounds an hour amount to two decimal places.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_defaults_when_missing_or_wrong_shape() {
        assert_eq!(summary_of(&json!({"summary": "Fix login"})), "Fix login");
        assert_eq!(summary_of(&json!({})), NO_TITLE);
        assert_eq!(summary_of(&json!({"summary": 42})), NO_TITLE);
    }

    #[test]
    fn assignee_null_yields_unassigned_sentinel() {
        let fields = json!({"assignee": null});
        let assignee = assignee_of(&fields);
        assert_eq!(assignee.display_name, UNASSIGNED);
        assert_eq!(assignee.account_id, None);
    }

    #[test]
    fn assignee_extracts_display_name_and_account_id() {
        let fields = json!({"assignee": {"displayName": "Dana", "accountId": "acc-1"}});
        let assignee = assignee_of(&fields);
        assert_eq!(assignee.display_name, "Dana");
        assert_eq!(assignee.account_id.as_deref(), Some("acc-1"));
    }

    #[test]
    fn option_value_requires_nested_value_string() {
        let fields = json!({"customfield_10097": {"value": "INTENSE"}});
        assert_eq!(option_value_of(&fields, "customfield_10097"), "INTENSE");
        assert_eq!(
            option_value_of(&json!({"customfield_10097": "bare"}), "customfield_10097"),
            NOT_AVAILABLE
        );
        assert_eq!(option_value_of(&json!({}), "customfield_10097"), NOT_AVAILABLE);
    }

    #[test]
    fn own_hours_sums_embedded_worklog_rounded() {
        let fields = json!({"worklog": {"worklogs": [
            {"timeSpentSeconds": 3600},
            {"timeSpentSeconds": 1800},
            {"comment": "no seconds field"}
        ]}});
        assert_eq!(own_hours_of(&fields), 1.5);
        assert_eq!(own_hours_of(&json!({})), 0.0);
    }

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(round_hours(1.0 / 3.0), 0.33);
        assert_eq!(round_hours(0.125), 0.13);
    }
}
