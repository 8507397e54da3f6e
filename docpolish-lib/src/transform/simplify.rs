//! Merges every `<style>` block of a document into one consolidated block.

use crate::dom::{self, Document};
use crate::style::consolidate::consolidate;
use log::info;

/// Consolidates the document's `<style>` blocks: their text is concatenated
/// in document order, run through the rule consolidator, the originals are
/// removed, and a single `<style>` holding the result is appended to
/// `<head>`.
///
/// Returns the number of `<style>` blocks found; `0` means the document was
/// left untouched.
pub fn consolidate_styles(document: &Document) -> usize {
    let styles = dom::collect_elements(&document.root, |elem| elem.tag == "style");
    if styles.is_empty() {
        return 0;
    }

    let css: Vec<String> = styles
        .iter()
        .map(|style| dom::text_content(style).trim().to_string())
        .collect();
    let merged = consolidate(&css.join("\n"));

    dom::remove_elements(&document.root, &|elem| elem.tag == "style");

    let style = dom::new_element("style");
    dom::append_child(&style, dom::new_text(&merged));
    let head = dom::ensure_head(document);
    dom::append_child(&head, style);

    info!("consolidated {} style blocks", styles.len());
    styles.len()
}
