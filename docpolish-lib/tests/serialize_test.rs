use docpolish_lib::{parse_html, serialize_document};
use pretty_assertions::assert_eq;

#[test]
fn comments_survive_a_round_trip() {
    let html = "<html><body><!-- keep me --><p>x</p></body></html>";
    let out = serialize_document(&parse_html(html));
    assert!(out.contains("<!-- keep me -->"));
    assert!(out.contains("<p>x</p>"));
}

#[test]
fn conditional_comments_are_preserved() {
    let html = "<html><head><!--[if IE]><link href=\"ie.css\"><![endif]--></head><body></body></html>";
    let out = serialize_document(&parse_html(html));
    assert!(out.contains("<!--[if IE]><link href=\"ie.css\"><![endif]-->"));
}

#[test]
fn simple_doctype_round_trips() {
    let out = serialize_document(&parse_html("<!DOCTYPE html><html><body></body></html>"));
    assert!(out.starts_with("<!DOCTYPE html>\n"));
}

#[test]
fn legacy_doctype_keeps_public_and_system_ids() {
    let html = concat!(
        "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" ",
        "\"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">",
        "<html><body></body></html>"
    );
    let out = serialize_document(&parse_html(html));
    assert!(out.starts_with(concat!(
        "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" ",
        "\"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n"
    )));
}

#[test]
fn preformatted_whitespace_is_untouched() {
    let html = "<html><body><pre>a\n  b\n    c</pre></body></html>";
    let out = serialize_document(&parse_html(html));
    assert!(out.contains("<pre>a\n  b\n    c</pre>"));
}

#[test]
fn text_and_attributes_are_escaped() {
    let html = r#"<html><body><p title="a &amp; b">1 &lt; 2</p></body></html>"#;
    let out = serialize_document(&parse_html(html));
    assert!(out.contains(r#"<p title="a &amp; b">1 &lt; 2</p>"#));
    assert_eq!(out.matches("&lt;").count(), 1);
}
