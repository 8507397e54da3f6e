//! Builds a table of contents from a document's headings.
//!
//! Scans `<h2>`..`<h6>` up to a depth limit, assigns ids to headings that
//! lack one, and inserts a linked list of contents after the first `<h1>`
//! (or at the start of `<body>` when there is none).

use crate::dom::{self, Document, Node, NodeHandle};
use log::info;

pub const DEFAULT_MAX_DEPTH: usize = 6;

const TOC_ID: &str = "table-of-contents";
const TOC_HEADER: &str = "Tabla de contenidos";

/// Inserts a table of contents covering headings from `<h2>` down to
/// `<h{max_depth}>`. Headings without an `id` get `heading-{i}`, where `i`
/// is the heading's position among all collected headings.
///
/// Returns the number of entries; `0` leaves the document untouched.
pub fn add_table_of_contents(document: &Document, max_depth: usize) -> usize {
    let max_depth = max_depth.clamp(2, 6);
    let headings = dom::collect_elements(&document.root, |elem| {
        heading_level(&elem.tag)
            .map(|level| (2..=max_depth).contains(&level))
            .unwrap_or(false)
    });
    if headings.is_empty() {
        return 0;
    }

    let mut entries: Vec<(String, String)> = Vec::new();
    for (i, heading) in headings.iter().enumerate() {
        let id = {
            let mut node = heading.borrow_mut();
            let Node::Element(ref mut elem) = *node else {
                continue;
            };
            match elem.attr("id") {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => {
                    let id = format!("heading-{}", i);
                    elem.set_attr("id", &id);
                    id
                }
            }
        };
        entries.push((id, dom::text_content(heading)));
    }

    let toc = build_toc(&entries);
    match dom::find_element(&document.root, "h1") {
        Some(h1) => match dom::parent_of(&h1) {
            Some(parent) => dom::insert_after(&parent, &h1, toc),
            None => dom::prepend_child(&dom::ensure_body(document), toc),
        },
        None => dom::prepend_child(&dom::ensure_body(document), toc),
    }

    info!("added a table of contents with {} entries", entries.len());
    entries.len()
}

fn heading_level(tag: &str) -> Option<usize> {
    let rest = tag.strip_prefix('h')?;
    if rest.len() == 1 {
        rest.parse().ok()
    } else {
        None
    }
}

/// `div#table-of-contents` holding a header and one flat list item per
/// heading, each linking to the heading's id.
fn build_toc(entries: &[(String, String)]) -> NodeHandle {
    let container = dom::new_element("div");
    if let Node::Element(ref mut elem) = *container.borrow_mut() {
        elem.set_attr("id", TOC_ID);
        elem.set_attr("class", "toc");
    }

    let header = dom::new_element("h2");
    if let Node::Element(ref mut elem) = *header.borrow_mut() {
        elem.set_attr("id", "contents-header");
    }
    dom::append_child(&header, dom::new_text(TOC_HEADER));
    dom::append_child(&container, header);

    let list = dom::new_element("ul");
    if let Node::Element(ref mut elem) = *list.borrow_mut() {
        elem.set_attr("class", "toc");
    }
    for (id, text) in entries {
        let item = dom::new_element("li");
        if let Node::Element(ref mut elem) = *item.borrow_mut() {
            elem.set_attr("class", "toc");
        }
        let link = dom::new_element("a");
        if let Node::Element(ref mut elem) = *link.borrow_mut() {
            elem.set_attr("class", "toc");
            elem.set_attr("href", &format!("#{}", id));
        }
        dom::append_child(&link, dom::new_text(text));
        dom::append_child(&item, link);
        dom::append_child(&list, item);
    }
    dom::append_child(&container, list);

    container
}
