//! Plain-text flattening of Atlassian rich-text description documents.

use serde_json::Value;

use crate::fields::NO_DESCRIPTION;

/// Flattens a description document into plain text. The document is a tree of
/// nodes carrying `content` arrays whose leaves are `{type: "text", text}`;
/// every text leaf is collected in document order and joined by single
/// spaces. Unrecognized or empty input yields the [`NO_DESCRIPTION`]
/// sentinel.
pub fn plain_text_of(description: &Value) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(content) = description.get("content").and_then(Value::as_array) {
        collect_text(content, &mut parts);
    }
    let text = parts.join(" ").trim().to_string();
    if text.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        text
    }
}

fn collect_text<'a>(content: &'a [Value], out: &mut Vec<&'a str>) {
    for node in content {
        if node.get("type").and_then(Value::as_str) == Some("text") {
            out.push(node.get("text").and_then(Value::as_str).unwrap_or(""));
        } else if let Some(children) = node.get("content").and_then(Value::as_array) {
            collect_text(children, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::plain_text_of;
    use crate::fields::NO_DESCRIPTION;
    use serde_json::json;

    #[test]
    fn flattens_nested_document_in_order() {
        let doc = json!({"content": [
            {"type": "text", "text": "Hello"},
            {"type": "doc", "content": [{"type": "text", "text": "World"}]}
        ]});
        assert_eq!(plain_text_of(&doc), "Hello World");
    }

    #[test]
    fn recurses_to_arbitrary_depth() {
        let doc = json!({"content": [
            {"type": "paragraph", "content": [
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "deep"}
                ]}
            ]},
            {"type": "text", "text": "leaf"}
        ]});
        assert_eq!(plain_text_of(&doc), "deep leaf");
    }

    #[test]
    fn non_document_input_yields_sentinel() {
        assert_eq!(plain_text_of(&json!({})), NO_DESCRIPTION);
        assert_eq!(plain_text_of(&json!(null)), NO_DESCRIPTION);
        assert_eq!(plain_text_of(&json!("plain string")), NO_DESCRIPTION);
    }

    #[test]
    fn document_without_text_leaves_yields_sentinel() {
        let doc = json!({"content": [{"type": "rule"}, {"type": "paragraph", "content": []}]});
        assert_eq!(plain_text_of(&doc), NO_DESCRIPTION);
    }

    #[test]
    fn malformed_nodes_default_instead_of_failing() {
        let doc = json!({"content": [
            {"type": "text"},
            {"content": "not-an-array"},
            {"type": "text", "text": "ok"}
        ]});
        assert_eq!(plain_text_of(&doc), "ok");
    }
}
