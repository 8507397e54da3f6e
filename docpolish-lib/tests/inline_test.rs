use docpolish_lib::style::inline::inline_styles;
use docpolish_lib::{dom, parse_html};
use pretty_assertions::assert_eq;
use std::path::Path;

fn attr_of(root: &dom::NodeHandle, tag: &str, name: &str) -> Option<String> {
    let handle = dom::find_element(root, tag)?;
    let node = handle.borrow();
    match *node {
        dom::Node::Element(ref elem) => elem.attr(name).map(str::to_string),
        _ => None,
    }
}

#[test]
fn class_rules_become_inline_styles() {
    let html = r#"<html><head>
<style>.red { color: red; } p { margin: 0; }</style>
</head><body><p class="red">x</p></body></html>"#;

    let document = parse_html(html);
    let outcome = inline_styles(&document, Path::new("."));

    assert_eq!(outcome.inlined_rules, 2);
    assert_eq!(
        attr_of(&document.root, "p", "style").as_deref(),
        Some("color: red; margin: 0")
    );
}

#[test]
fn class_attributes_are_removed() {
    let html = r#"<html><head><style>.red { color: red; }</style></head>
<body><p class="red">x</p><div class="untouched">y</div></body></html>"#;

    let document = parse_html(html);
    inline_styles(&document, Path::new("."));

    assert_eq!(attr_of(&document.root, "p", "class"), None);
    assert_eq!(attr_of(&document.root, "div", "class"), None);
}

#[test]
fn existing_inline_declarations_win() {
    let html = r#"<html><head><style>p { color: red; padding: 4px; }</style></head>
<body><p style="color: blue">x</p></body></html>"#;

    let document = parse_html(html);
    inline_styles(&document, Path::new("."));

    assert_eq!(
        attr_of(&document.root, "p", "style").as_deref(),
        Some("color: blue; padding: 4px")
    );
}

#[test]
fn pseudo_rules_are_preserved_in_a_style_block() {
    let html = r##"<html><head>
<style>a:hover { color: green; } a { color: blue; }</style>
</head><body><a href="#">x</a></body></html>"##;

    let document = parse_html(html);
    let outcome = inline_styles(&document, Path::new("."));

    assert_eq!(outcome.preserved_rules, 1);
    assert_eq!(
        attr_of(&document.root, "a", "style").as_deref(),
        Some("color: blue")
    );

    let styles = dom::collect_elements(&document.root, |elem| elem.tag == "style");
    assert_eq!(styles.len(), 1);
    assert_eq!(
        dom::text_content(&styles[0]),
        "a:hover { color: green; }"
    );
}

#[test]
fn original_style_carriers_are_removed() {
    let html = r#"<html><head>
<link rel="stylesheet" href="missing.css">
<style>p { margin: 0; }</style>
</head><body><p>x</p></body></html>"#;

    let document = parse_html(html);
    inline_styles(&document, Path::new("/nonexistent"));

    assert!(dom::collect_elements(&document.root, |elem| elem.tag == "link").is_empty());
    // Only a pseudo-preserving block could remain, and there is none here.
    assert!(dom::collect_elements(&document.root, |elem| elem.tag == "style").is_empty());
}

#[test]
fn id_and_descendant_selectors_match() {
    let html = r#"<html><head>
<style>#main { border: 0; } div p { font-size: 12px; }</style>
</head><body><div id="main"><p>x</p></div></body></html>"#;

    let document = parse_html(html);
    inline_styles(&document, Path::new("."));

    assert_eq!(
        attr_of(&document.root, "div", "style").as_deref(),
        Some("border: 0")
    );
    assert_eq!(
        attr_of(&document.root, "p", "style").as_deref(),
        Some("font-size: 12px")
    );
}

#[test]
fn important_cascade_survives_inlining() {
    let html = r#"<html><head>
<style>p { color: red !important; }</style>
<style>p { color: green; }</style>
</head><body><p>x</p></body></html>"#;

    let document = parse_html(html);
    inline_styles(&document, Path::new("."));

    assert_eq!(
        attr_of(&document.root, "p", "style").as_deref(),
        Some("color: red !important")
    );
}
