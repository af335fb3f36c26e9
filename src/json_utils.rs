//! Locate JSON objects and arrays embedded in free-form model output.

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Object,
    Array,
}

/// Byte coordinates of a JSON structure within a larger text, including nested children.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjCoords {
    pub start: usize,
    pub end: usize, // inclusive index of the closing bracket/brace
    pub kind: NodeType,
    pub children: Vec<ObjCoords>,
}

#[derive(Debug)]
struct Frame {
    start: usize,
    kind: NodeType,
    children: Vec<ObjCoords>,
}

/// Find all balanced JSON object/array structures in `text`.
#[instrument(target = "opic_exam::json", skip(text))]
pub fn find_json_structures(text: &str) -> Vec<ObjCoords> {
    let mut results = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        if in_string {
            if escape {
                escape = false;
                continue;
            }
            match b {
                b'\\' => escape = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        let closing = match b {
            b'"' => {
                in_string = true;
                None
            }
            b'{' => {
                stack.push(Frame { start: i, kind: NodeType::Object, children: Vec::new() });
                None
            }
            b'[' => {
                stack.push(Frame { start: i, kind: NodeType::Array, children: Vec::new() });
                None
            }
            b'}' => Some(NodeType::Object),
            b']' => Some(NodeType::Array),
            _ => None,
        };

        let Some(kind) = closing else { continue };
        // Unbalanced closers are dropped along with their frame
        if let Some(frame) = stack.pop() {
            if frame.kind == kind {
                let node = ObjCoords { start: frame.start, end: i, kind, children: frame.children };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => results.push(node),
                }
            }
        }
    }

    debug!(target: "opic_exam::json", count = results.len(), "found root structures");
    results
}

/// First structure in `text` (depth-first, outermost first) that deserializes as `T`.
pub fn extract_first<T: DeserializeOwned>(text: &str) -> Option<T> {
    if let Ok(v) = serde_json::from_str::<T>(text.trim()) {
        return Some(v);
    }

    fn search<T: DeserializeOwned>(text: &str, node: &ObjCoords) -> Option<T> {
        serde_json::from_str::<T>(&text[node.start..=node.end])
            .ok()
            .or_else(|| node.children.iter().find_map(|child| search(text, child)))
    }

    find_json_structures(text).iter().find_map(|node| search(text, node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        x: i32,
    }

    #[test]
    fn finds_nested_structures() {
        let roots = find_json_structures(r#"noise {"a": [1, {"b": 2}]} tail [3]"#);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].kind, NodeType::Object);
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[1].kind, NodeType::Array);
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let roots = find_json_structures(r#"{"text": "a } b { c"}"#);
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn extract_first_from_mixed_text() {
        let item: Item = extract_first(r#"Sure! Here you go: {"x": 5} and {"x": 6}"#).unwrap();
        assert_eq!(item, Item { x: 5 });
    }

    #[test]
    fn extract_first_descends_into_children() {
        let item: Item = extract_first(r#"{"wrapper": {"x": 9}}"#).unwrap();
        assert_eq!(item, Item { x: 9 });
    }

    #[test]
    fn extract_first_none() {
        assert!(extract_first::<Item>("no json here").is_none());
    }
}
