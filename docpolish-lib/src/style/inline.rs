//! Converts a document's stylesheet rules into inline `style` attributes.
//!
//! Collects CSS from `<link rel="stylesheet">` elements (local files only)
//! and `<style>` elements, consolidates it, writes non-pseudo rules onto
//! matching elements (existing inline declarations win), preserves
//! pseudo-class/element rules in a fresh `<style>` block, and strips all
//! `class` attributes.

use crate::dom::{self, Document, Node, NodeHandle};
use crate::style::consolidate::{extract_rules, merge_rules, PropertyMap};
use crate::style::matcher::{matches_selector, parse_selector};
use log::{debug, info, warn};
use std::path::Path;

/// What the inlining pass did to a document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InlineOutcome {
    /// Rules written onto elements as inline styles.
    pub inlined_rules: usize,
    /// Pseudo-class/element rules kept in a `<style>` block.
    pub preserved_rules: usize,
}

pub fn inline_styles(document: &Document, base_dir: &Path) -> InlineOutcome {
    let mut css_sources = Vec::new();

    // External stylesheets first, then embedded ones, in document order;
    // this mirrors how the consolidated cascade is supposed to read.
    for link in dom::collect_elements(&document.root, |elem| {
        elem.tag == "link"
            && elem
                .attr("rel")
                .map(|rel| rel.eq_ignore_ascii_case("stylesheet"))
                .unwrap_or(false)
    }) {
        let href = match *link.borrow() {
            Node::Element(ref elem) => elem.attr("href").map(str::to_string),
            _ => None,
        };
        let Some(href) = href else {
            continue;
        };
        if href.starts_with("http://") || href.starts_with("https://") {
            warn!("skipping remote stylesheet {}", href);
            continue;
        }
        let css_path = base_dir.join(&href);
        match std::fs::read_to_string(&css_path) {
            Ok(css) => {
                info!("collected stylesheet {}", css_path.display());
                css_sources.push(css);
            }
            Err(err) => warn!("could not read stylesheet {}: {}", css_path.display(), err),
        }
    }

    for style in dom::collect_elements(&document.root, |elem| elem.tag == "style") {
        css_sources.push(dom::text_content(&style));
    }

    // All collected stylesheet carriers are replaced by the inlined result.
    dom::remove_elements(&document.root, &|elem| {
        elem.tag == "style"
            || (elem.tag == "link"
                && elem
                    .attr("rel")
                    .map(|rel| rel.eq_ignore_ascii_case("stylesheet"))
                    .unwrap_or(false))
    });

    let sheet = merge_rules(&extract_rules(&css_sources.join("\n")));

    let mut outcome = InlineOutcome::default();
    let mut preserved: Vec<(String, PropertyMap)> = Vec::new();

    for selector in sheet.selectors() {
        let props = sheet.rule(selector).expect("selector listed in sheet");
        if selector.contains(':') {
            preserved.push((selector.to_string(), props.clone()));
            continue;
        }
        let complex = parse_selector(selector);
        let targets =
            dom::collect_elements(&document.root, |_| true)
                .into_iter()
                .filter(|handle| matches_selector(handle, &complex))
                .collect::<Vec<_>>();
        if targets.is_empty() {
            debug!("selector {:?} matched no elements", selector);
            continue;
        }
        for target in targets {
            apply_rule(&target, props);
        }
        outcome.inlined_rules += 1;
    }

    if !preserved.is_empty() {
        outcome.preserved_rules = preserved.len();
        let blocks: Vec<String> = preserved
            .iter()
            .map(|(selector, props)| {
                let body: Vec<String> = props
                    .iter()
                    .map(|(property, decl)| format!("{}: {}", property, decl.value))
                    .collect();
                format!("{} {{ {}; }}", selector, body.join("; "))
            })
            .collect();
        let style = dom::new_element("style");
        dom::append_child(&style, dom::new_text(&blocks.join("\n")));
        let head = dom::ensure_head(document);
        dom::append_child(&head, style);
        info!(
            "kept {} pseudo-class/element rules in a style block",
            outcome.preserved_rules
        );
    }

    // Class attributes have served their purpose once styles are inline.
    dom::for_each_element(&document.root, &mut |handle: &NodeHandle| {
        if let Node::Element(ref mut elem) = *handle.borrow_mut() {
            elem.remove_attr("class");
        }
    });

    outcome
}

/// Merges a rule into an element's `style` attribute; declarations already
/// present inline are left untouched.
fn apply_rule(target: &NodeHandle, props: &PropertyMap) {
    let mut node = target.borrow_mut();
    let Node::Element(ref mut elem) = *node else {
        return;
    };
    let mut entries: Vec<(String, String)> = Vec::new();
    if let Some(existing) = elem.attr("style") {
        for clause in existing.split(';') {
            if let Some((property, value)) = clause.split_once(':') {
                entries.push((property.trim().to_string(), value.trim().to_string()));
            }
        }
    }
    for (property, decl) in props.iter() {
        if !entries.iter().any(|(p, _)| p == property) {
            entries.push((property.to_string(), decl.value.clone()));
        }
    }
    if entries.is_empty() {
        return;
    }
    let style_text = entries
        .iter()
        .map(|(p, v)| format!("{}: {}", p, v))
        .collect::<Vec<_>>()
        .join("; ");
    elem.set_attr("style", &style_text);
}
