use docpolish_lib::transform::toc::add_table_of_contents;
use docpolish_lib::{dom, parse_html, serialize_document};
use pretty_assertions::assert_eq;

fn find_toc(root: &dom::NodeHandle) -> Option<dom::NodeHandle> {
    dom::collect_elements(root, |elem| elem.attr("id") == Some("table-of-contents"))
        .into_iter()
        .next()
}

#[test]
fn toc_is_inserted_after_the_first_h1() {
    let html = r#"<html><body>
<h1 id="title">Title</h1>
<h2>Alpha</h2>
<p>text</p>
<h2>Beta</h2>
</body></html>"#;
    let document = parse_html(html);
    assert_eq!(add_table_of_contents(&document, 6), 2);

    let toc = find_toc(&document.root).unwrap();
    let h1 = dom::find_element(&document.root, "h1").unwrap();
    assert!(dom::prev_element_sibling(&toc)
        .map(|prev| std::rc::Rc::ptr_eq(&prev, &h1))
        .unwrap_or(false));

    let links = dom::collect_elements(&toc, |elem| elem.tag == "a");
    assert_eq!(links.len(), 2);
    assert_eq!(dom::text_content(&links[0]), "Alpha");
    assert_eq!(dom::text_content(&links[1]), "Beta");
}

#[test]
fn headings_without_ids_get_generated_ones() {
    let html = r#"<html><body>
<h2 id="kept">Kept</h2>
<h2>Fresh</h2>
</body></html>"#;
    let document = parse_html(html);
    add_table_of_contents(&document, 6);

    // The generated id counts positions over all collected headings, so the
    // second heading becomes heading-1 even though the first kept its id.
    let headings = dom::collect_elements(&document.root, |elem| {
        elem.tag == "h2" && elem.attr("id") != Some("contents-header")
    });
    let ids: Vec<Option<String>> = headings
        .iter()
        .map(|h| match *h.borrow() {
            dom::Node::Element(ref elem) => elem.attr("id").map(str::to_string),
            _ => None,
        })
        .collect();
    assert_eq!(
        ids,
        vec![Some("kept".to_string()), Some("heading-1".to_string())]
    );

    let toc = find_toc(&document.root).unwrap();
    let links = dom::collect_elements(&toc, |elem| elem.tag == "a");
    let hrefs: Vec<Option<String>> = links
        .iter()
        .map(|l| match *l.borrow() {
            dom::Node::Element(ref elem) => elem.attr("href").map(str::to_string),
            _ => None,
        })
        .collect();
    assert_eq!(
        hrefs,
        vec![Some("#kept".to_string()), Some("#heading-1".to_string())]
    );
}

#[test]
fn depth_limit_excludes_deeper_headings() {
    let html = r#"<html><body>
<h2>Top</h2>
<h3>Mid</h3>
<h4>Deep</h4>
</body></html>"#;
    let document = parse_html(html);
    assert_eq!(add_table_of_contents(&document, 3), 2);

    let toc = find_toc(&document.root).unwrap();
    let links = dom::collect_elements(&toc, |elem| elem.tag == "a");
    assert_eq!(dom::text_content(&links[0]), "Top");
    assert_eq!(dom::text_content(&links[1]), "Mid");
}

#[test]
fn toc_lands_at_body_start_without_an_h1() {
    let html = "<html><body><p>intro</p><h2 id=\"s\">Section</h2></body></html>";
    let document = parse_html(html);
    assert_eq!(add_table_of_contents(&document, 6), 1);

    let body = dom::find_element(&document.root, "body").unwrap();
    let toc = find_toc(&document.root).unwrap();
    let node = body.borrow();
    let dom::Node::Element(ref elem) = *node else {
        panic!("body is an element");
    };
    assert!(std::rc::Rc::ptr_eq(&elem.children[0], &toc));
}

#[test]
fn document_without_headings_is_untouched() {
    let html = "<html><body><h1>only a title</h1><p>x</p></body></html>";
    let document = parse_html(html);
    assert_eq!(add_table_of_contents(&document, 6), 0);
    assert!(!serialize_document(&document).contains("table-of-contents"));
}

#[test]
fn toc_structure_has_header_and_list() {
    let html = "<html><body><h2 id=\"a\">A</h2></body></html>";
    let document = parse_html(html);
    add_table_of_contents(&document, 6);

    let serialized = serialize_document(&document);
    assert!(serialized.contains(r#"<div id="table-of-contents" class="toc">"#));
    assert!(serialized.contains(r#"<h2 id="contents-header">Tabla de contenidos</h2>"#));
    assert!(serialized.contains(r##"<li class="toc"><a class="toc" href="#a">A</a></li>"##));
}
