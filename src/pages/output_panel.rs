//! "Output" panel of an installed app
//!
//! The panel is a tree of collapsible button/panel pairs. A disabled button
//! is a leaf (`label: value`); an enabled one expands into a nested panel.
//! The walk happens in the page and returns a raw tree, which is folded into
//! a JSON object here.

use crate::browser::element::Selector;
use crate::error::{E2eError, Result};
use chromiumoxide::page::Page;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One button/panel pair as read from the DOM
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawOutputNode {
    pub label: String,
    #[serde(default)]
    pub value: String,
    pub disabled: bool,
    #[serde(default)]
    pub children: Vec<RawOutputNode>,
}

impl RawOutputNode {
    pub fn leaf(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            disabled: true,
            children: Vec::new(),
        }
    }

    pub fn branch(label: &str, children: Vec<RawOutputNode>) -> Self {
        Self {
            label: label.to_string(),
            value: String::new(),
            disabled: false,
            children,
        }
    }
}

/// Walks `root` in the page. Enabled buttons that are still collapsed are
/// expanded first so their panel content exists in the DOM.
const WALK_JS: &str = r#"
async (root) => {
    const sleep = (ms) => new Promise(r => setTimeout(r, ms));
    const textOf = (btn, idx) => {
        const parts = btn.querySelectorAll(':scope > span, :scope > p, :scope > div');
        return parts.length > idx ? parts[idx].textContent.trim()
            : (idx === 0 ? btn.textContent.trim() : '');
    };
    const walk = async (container) => {
        const out = [];
        for (const btn of container.querySelectorAll(':scope > button, :scope > * > button')) {
            if (btn.closest('[data-output-walked]') !== null) continue;
            const disabled = btn.disabled || btn.getAttribute('aria-disabled') === 'true';
            const node = { label: textOf(btn, 0), value: textOf(btn, 1), disabled, children: [] };
            if (!disabled) {
                if (btn.getAttribute('aria-expanded') !== 'true') {
                    btn.click();
                    await sleep(100);
                }
                const id = btn.getAttribute('aria-controls');
                const panel = id ? document.getElementById(id) : btn.nextElementSibling;
                if (panel) {
                    node.children = await walk(panel);
                    panel.setAttribute('data-output-walked', '');
                }
            }
            out.push(node);
        }
        return out;
    };
    const tree = await walk(root);
    root.querySelectorAll('[data-output-walked]').forEach(e => e.removeAttribute('data-output-walked'));
    return tree;
}
"#;

/// Read the Output panel rooted at `root` as nested JSON.
pub async fn read_output_panel(page: &Page, root: &Selector) -> Result<Map<String, Value>> {
    let script = format!(
        "(async () => {{ const root = {}; if (!root) return null; return await ({})(root); }})()",
        root.to_js(),
        WALK_JS
    );
    let raw: Option<Vec<RawOutputNode>> = page
        .evaluate(script)
        .await?
        .into_value()
        .map_err(|e| E2eError::Other(format!("Bad output panel tree: {}", e)))?;

    let nodes = raw.ok_or_else(|| E2eError::ElementNotFound(format!("output panel {}", root)))?;
    log::debug!("Output panel has {} top-level entries", nodes.len());
    Ok(fold_output_tree(&nodes))
}

/// Fold a raw tree into a JSON object.
///
/// A leaf whose exact `(label, value)` already appears as a leaf on an
/// enclosing level is dropped. Sibling labels that repeat get ` (2)`,
/// ` (3)`... suffixes in document order.
pub fn fold_output_tree(nodes: &[RawOutputNode]) -> Map<String, Value> {
    fold_level(nodes, &[])
}

fn fold_level(nodes: &[RawOutputNode], enclosing: &[(String, String)]) -> Map<String, Value> {
    let mut scope: Vec<(String, String)> = enclosing.to_vec();
    scope.extend(
        nodes
            .iter()
            .filter(|n| n.disabled)
            .map(|n| (n.label.clone(), n.value.clone())),
    );

    let mut map = Map::new();
    for node in nodes {
        let value = if node.disabled {
            let pair = (node.label.clone(), node.value.clone());
            if enclosing.contains(&pair) {
                continue;
            }
            Value::String(node.value.clone())
        } else {
            Value::Object(fold_level(&node.children, &scope))
        };
        let key = unique_key(&map, &node.label);
        map.insert(key, value);
    }
    map
}

fn unique_key(map: &Map<String, Value>, label: &str) -> String {
    if !map.contains_key(label) {
        return label.to_string();
    }
    (2..)
        .map(|n| format!("{} ({})", label, n))
        .find(|k| !map.contains_key(k))
        .unwrap_or_else(|| label.to_string())
}

/// Look up a dotted path such as `"Ingress.URL"` in a folded panel.
pub fn output_value<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let first = parts.next()?;
    parts.try_fold(map.get(first)?, |v, key| v.as_object()?.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leaves_and_branches_nest() {
        let tree = vec![
            RawOutputNode::leaf("Status", "Healthy"),
            RawOutputNode::branch(
                "Ingress",
                vec![
                    RawOutputNode::leaf("URL", "https://app.example.org"),
                    RawOutputNode::leaf("Auth", "enabled"),
                ],
            ),
        ];
        assert_eq!(
            Value::Object(fold_output_tree(&tree)),
            json!({
                "Status": "Healthy",
                "Ingress": { "URL": "https://app.example.org", "Auth": "enabled" }
            })
        );
    }

    #[test]
    fn leaves_repeated_from_enclosing_levels_are_dropped() {
        let tree = vec![
            RawOutputNode::leaf("Name", "jupyter"),
            RawOutputNode::branch(
                "Details",
                vec![
                    RawOutputNode::leaf("Name", "jupyter"),
                    RawOutputNode::leaf("Name", "other"),
                    RawOutputNode::branch("Empty", vec![]),
                ],
            ),
        ];
        let map = fold_output_tree(&tree);
        assert_eq!(
            Value::Object(map),
            json!({
                "Name": "jupyter",
                "Details": { "Name": "other", "Empty": {} }
            })
        );
    }

    #[test]
    fn repeated_sibling_labels_get_suffixes() {
        let tree = vec![
            RawOutputNode::leaf("Port", "80"),
            RawOutputNode::leaf("Port", "443"),
            RawOutputNode::branch("Port", vec![RawOutputNode::leaf("Protocol", "tcp")]),
        ];
        let map = fold_output_tree(&tree);
        assert_eq!(map.get("Port"), Some(&json!("80")));
        assert_eq!(map.get("Port (2)"), Some(&json!("443")));
        assert_eq!(map.get("Port (3)"), Some(&json!({ "Protocol": "tcp" })));
    }

    #[test]
    fn dotted_lookup_walks_nested_objects() {
        let tree = vec![RawOutputNode::branch(
            "Ingress",
            vec![RawOutputNode::leaf("URL", "https://x")],
        )];
        let map = fold_output_tree(&tree);
        assert_eq!(output_value(&map, "Ingress.URL"), Some(&json!("https://x")));
        assert_eq!(output_value(&map, "Ingress.Missing"), None);
        assert_eq!(output_value(&map, "Ingress.URL.deeper"), None);
    }

    #[test]
    fn raw_tree_deserializes_from_walker_output() {
        let raw: Vec<RawOutputNode> = serde_json::from_value(json!([
            { "label": "Status", "value": "Running", "disabled": true, "children": [] },
            { "label": "Links", "disabled": false, "children": [
                { "label": "Web", "value": "https://w", "disabled": true }
            ]}
        ]))
        .unwrap();
        assert_eq!(raw[1].children[0], RawOutputNode::leaf("Web", "https://w"));
    }
}
