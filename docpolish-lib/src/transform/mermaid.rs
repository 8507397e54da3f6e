//! Converts diagram code blocks into markup renderable by mermaid.js.

use crate::dom::{self, Document, Node, NodeHandle};
use log::info;
use std::rc::Rc;

const MERMAID_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/mermaid/dist/mermaid.min.js";

const DIAGRAM_KEYWORDS: &[&str] = &["graph ", "flowchart ", "sequenceDiagram", "classDiagram"];

const MERMAID_DIV_STYLE: &str = "text-align: center; max-width: 100%; overflow: visible; \
margin: 15px 0; padding: 10px; border: 1px solid #ddd; border-radius: 8px; \
background-color: #f9f9f9;";

/// Diagram sources arrive entity-escaped from the serializer; undo that
/// before mermaid parses them, then initialize.
const MERMAID_INIT_JS: &str = r#"
document.addEventListener('DOMContentLoaded', function () {
    function unescapeHTML(html) {
        return html
            .replace(/<pre class="mermaid">/g, "")
            .replace(/<\/pre>/g, "")
            .replace(/&lt;/g, '<')
            .replace(/&gt;/g, '>')
            .replace(/&amp;/g, '&')
            .replace(/&quot;/g, '"');
    }

    document.querySelectorAll('div.mermaid').forEach(function (div) {
        div.innerHTML = unescapeHTML(div.innerHTML);
    });

    mermaid.initialize({
        startOnLoad: true,
        theme: 'default',
        fontFamily: 'Arial, sans-serif',
        securityLevel: 'loose',
        flowchart: {
            htmlLabels: true,
            curve: 'basis'
        }
    });
});
"#;

/// Finds diagram code blocks and replaces each with a `div.mermaid`
/// containing the cleaned diagram source; when at least one was converted,
/// the mermaid.js script and its initialization are appended to `<body>`.
///
/// Returns the number of blocks converted; `0` leaves the document
/// untouched.
pub fn convert_diagram_blocks(document: &Document) -> usize {
    let blocks = find_diagram_blocks(&document.root);
    if blocks.is_empty() {
        return 0;
    }

    let mut converted = 0;
    for block in &blocks {
        let code = extract_diagram_code(block);
        let replacement = build_mermaid_div(&code);
        if let Some(parent) = dom::parent_of(block) {
            if dom::replace_child(&parent, block, replacement) {
                converted += 1;
            }
        }
    }

    if converted > 0 {
        let body = dom::ensure_body(document);

        let loader = dom::new_element("script");
        if let Node::Element(ref mut elem) = *loader.borrow_mut() {
            elem.set_attr("src", MERMAID_SCRIPT_URL);
        }
        dom::append_child(&body, loader);

        let init = dom::new_element("script");
        dom::append_child(&init, dom::new_text(MERMAID_INIT_JS));
        dom::append_child(&body, init);
    }

    info!("converted {} diagram blocks", converted);
    converted
}

/// Diagram candidates, in document order: `pre.language-mermaid`,
/// `div.language-mermaid` wrapping a `pre`, and any other `pre` whose text
/// looks like diagram source.
fn find_diagram_blocks(root: &NodeHandle) -> Vec<NodeHandle> {
    let mut blocks: Vec<NodeHandle> = Vec::new();

    for pre in dom::collect_elements(root, |elem| {
        elem.tag == "pre" && elem.has_class("language-mermaid")
    }) {
        blocks.push(pre);
    }

    for div in dom::collect_elements(root, |elem| {
        elem.tag == "div" && elem.has_class("language-mermaid")
    }) {
        if dom::find_element(&div, "pre").is_some() {
            blocks.push(div);
        }
    }

    for pre in dom::collect_elements(root, |elem| elem.tag == "pre") {
        if blocks.iter().any(|b| Rc::ptr_eq(b, &pre)) {
            continue;
        }
        // Inside an already collected wrapper div.
        if dom::ancestor_matches(&pre, |elem| {
            elem.tag == "div" && elem.has_class("language-mermaid")
        }) {
            continue;
        }
        let code = dom::text_content(&pre);
        if DIAGRAM_KEYWORDS.iter().any(|kw| code.contains(kw)) {
            blocks.push(pre);
        }
    }

    blocks
}

/// Pulls the diagram source out of a candidate block, stripping code fences
/// and a leading `mermaid` language tag.
fn extract_diagram_code(block: &NodeHandle) -> String {
    let mut code = dom::text_content(block).trim().to_string();
    if code.starts_with("```") && code.ends_with("```") && code.len() >= 6 {
        code = code[3..code.len() - 3].trim().to_string();
    }
    if let Some(rest) = code.strip_prefix("mermaid") {
        code = rest.trim().to_string();
    }
    code
}

fn build_mermaid_div(code: &str) -> NodeHandle {
    let div = dom::new_element("div");
    if let Node::Element(ref mut elem) = *div.borrow_mut() {
        elem.set_attr("class", "mermaid");
        elem.set_attr("style", MERMAID_DIV_STYLE);
    }
    let pre = dom::new_element("pre");
    if let Node::Element(ref mut elem) = *pre.borrow_mut() {
        elem.set_attr("class", "mermaid");
    }
    dom::append_child(&pre, dom::new_text(code));
    dom::append_child(&div, pre);
    div
}
