//! In-memory document tree produced by the HTML parser and rewritten by the
//! transforms.
//!
//! Nodes are shared behind `Rc<RefCell<_>>` handles. Elements keep a weak
//! pointer to their parent; sibling lookups are computed from the parent's
//! child list on demand, so tree rewrites (wrapping, replacement) cannot
//! leave stale pointers behind.

use html5ever::namespace_url;
use html5ever::ns;
use html5ever::{LocalName, QualName};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub type NodeHandle = Rc<RefCell<Node>>;

#[derive(Debug, Clone)]
pub enum Node {
    DocumentRoot(DocumentRootNode),
    Element(ElementNode),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, Default)]
pub struct DocumentRootNode {
    pub children: Vec<NodeHandle>,
}

#[derive(Debug, Clone)]
pub struct ElementNode {
    pub tag: String,
    pub qual_name: QualName,
    /// Attributes in source order; order is preserved through serialization.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<NodeHandle>,
    pub parent: Option<Weak<RefCell<Node>>>,
}

#[derive(Debug)]
pub struct Document {
    pub root: NodeHandle,
    pub doctype: RefCell<Option<Doctype>>,
}

#[derive(Debug)]
pub struct Doctype {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

impl ElementNode {
    pub fn new(tag: String, qual_name: QualName) -> Self {
        ElementNode {
            tag,
            qual_name,
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrites an existing attribute in place, keeping its position.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.attributes.iter_mut().find(|(k, _)| k == name) {
            entry.1 = value.to_string();
        } else {
            self.attributes.push((name.to_string(), value.to_string()));
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(idx).1)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|attr| attr.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

pub fn new_document() -> Document {
    Document {
        root: Rc::new(RefCell::new(Node::DocumentRoot(DocumentRootNode::default()))),
        doctype: RefCell::new(None),
    }
}

pub fn new_element(tag: &str) -> NodeHandle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    Rc::new(RefCell::new(Node::Element(ElementNode::new(
        tag.to_string(),
        qual_name,
    ))))
}

pub fn new_text(text: &str) -> NodeHandle {
    Rc::new(RefCell::new(Node::Text(text.to_string())))
}

pub fn new_comment(text: &str) -> NodeHandle {
    Rc::new(RefCell::new(Node::Comment(text.to_string())))
}

/// Appends `child` to `parent`'s child list and fixes the child's parent
/// pointer when the child is an element.
pub fn append_child(parent: &NodeHandle, child: NodeHandle) {
    if let Node::Element(ref mut elem) = *child.borrow_mut() {
        elem.parent = Some(Rc::downgrade(parent));
    }
    match *parent.borrow_mut() {
        Node::DocumentRoot(ref mut root) => root.children.push(child),
        Node::Element(ref mut elem) => elem.children.push(child),
        _ => {}
    }
}

/// Inserts `child` at the front of `parent`'s child list.
pub fn prepend_child(parent: &NodeHandle, child: NodeHandle) {
    if let Node::Element(ref mut elem) = *child.borrow_mut() {
        elem.parent = Some(Rc::downgrade(parent));
    }
    match *parent.borrow_mut() {
        Node::DocumentRoot(ref mut root) => root.children.insert(0, child),
        Node::Element(ref mut elem) => elem.children.insert(0, child),
        _ => {}
    }
}

/// Inserts `node` into `parent`'s child list directly after `anchor`;
/// appends when `anchor` is not among `parent`'s children.
pub fn insert_after(parent: &NodeHandle, anchor: &NodeHandle, node: NodeHandle) {
    if let Node::Element(ref mut elem) = *node.borrow_mut() {
        elem.parent = Some(Rc::downgrade(parent));
    }
    let mut parent_borrow = parent.borrow_mut();
    let children = match *parent_borrow {
        Node::DocumentRoot(ref mut root) => &mut root.children,
        Node::Element(ref mut elem) => &mut elem.children,
        _ => return,
    };
    match children.iter().position(|c| Rc::ptr_eq(c, anchor)) {
        Some(idx) => children.insert(idx + 1, node),
        None => children.push(node),
    }
}

pub fn parent_of(node: &NodeHandle) -> Option<NodeHandle> {
    if let Node::Element(ref elem) = *node.borrow() {
        elem.parent.as_ref().and_then(Weak::upgrade)
    } else {
        None
    }
}

fn children_of(node: &NodeHandle) -> Vec<NodeHandle> {
    match *node.borrow() {
        Node::DocumentRoot(ref root) => root.children.clone(),
        Node::Element(ref elem) => elem.children.clone(),
        _ => Vec::new(),
    }
}

/// Depth-first walk over every element handle under `node` (inclusive).
pub fn for_each_element<F: FnMut(&NodeHandle)>(node: &NodeHandle, f: &mut F) {
    if matches!(*node.borrow(), Node::Element(_)) {
        f(node);
    }
    for child in children_of(node) {
        for_each_element(&child, f);
    }
}

/// Collects element handles matching `pred`, in document order.
pub fn collect_elements<F: Fn(&ElementNode) -> bool>(
    root: &NodeHandle,
    pred: F,
) -> Vec<NodeHandle> {
    let mut found = Vec::new();
    for_each_element(root, &mut |handle| {
        if let Node::Element(ref elem) = *handle.borrow() {
            if pred(elem) {
                found.push(Rc::clone(handle));
            }
        }
    });
    found
}

pub fn find_element(root: &NodeHandle, tag: &str) -> Option<NodeHandle> {
    collect_elements(root, |elem| elem.tag == tag)
        .into_iter()
        .next()
}

/// Concatenated text of every descendant text node.
pub fn text_content(node: &NodeHandle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &NodeHandle, out: &mut String) {
    match *node.borrow() {
        Node::Text(ref text) => out.push_str(text),
        Node::Comment(_) => {}
        Node::DocumentRoot(ref root) => {
            for child in &root.children {
                collect_text(child, out);
            }
        }
        Node::Element(ref elem) => {
            for child in &elem.children {
                collect_text(child, out);
            }
        }
    }
}

/// Removes every element under `root` matching `pred`, including its subtree.
pub fn remove_elements<F: Fn(&ElementNode) -> bool>(root: &NodeHandle, pred: &F) {
    let kept: Vec<NodeHandle> = children_of(root)
        .into_iter()
        .filter(|child| {
            let drop = match *child.borrow() {
                Node::Element(ref elem) => pred(elem),
                _ => false,
            };
            !drop
        })
        .collect();
    match *root.borrow_mut() {
        Node::DocumentRoot(ref mut node) => node.children = kept.clone(),
        Node::Element(ref mut node) => node.children = kept.clone(),
        _ => {}
    }
    for child in kept {
        remove_elements(&child, pred);
    }
}

/// Swaps `old` for `new` in `parent`'s child list. Returns false when `old`
/// is not a child of `parent`.
pub fn replace_child(parent: &NodeHandle, old: &NodeHandle, new: NodeHandle) -> bool {
    if let Node::Element(ref mut elem) = *new.borrow_mut() {
        elem.parent = Some(Rc::downgrade(parent));
    }
    let mut parent_borrow = parent.borrow_mut();
    let children = match *parent_borrow {
        Node::DocumentRoot(ref mut root) => &mut root.children,
        Node::Element(ref mut elem) => &mut elem.children,
        _ => return false,
    };
    match children.iter().position(|c| Rc::ptr_eq(c, old)) {
        Some(idx) => {
            children[idx] = new;
            true
        }
        None => false,
    }
}

/// Replaces `target` with `wrapper` in the tree and re-attaches `target` as
/// `wrapper`'s child. Returns false when `target` has no parent.
pub fn wrap_element(target: &NodeHandle, wrapper: NodeHandle) -> bool {
    let Some(parent) = parent_of(target) else {
        return false;
    };
    if !replace_child(&parent, target, Rc::clone(&wrapper)) {
        return false;
    }
    append_child(&wrapper, Rc::clone(target));
    true
}

/// Nearest element sibling preceding `node` in its parent's child list.
pub fn prev_element_sibling(node: &NodeHandle) -> Option<NodeHandle> {
    let parent = parent_of(node)?;
    let siblings = children_of(&parent);
    let idx = siblings.iter().position(|c| Rc::ptr_eq(c, node))?;
    siblings[..idx]
        .iter()
        .rev()
        .find(|c| matches!(*c.borrow(), Node::Element(_)))
        .cloned()
}

/// All element siblings preceding `node`, nearest first.
pub fn prev_element_siblings(node: &NodeHandle) -> Vec<NodeHandle> {
    let mut out = Vec::new();
    let mut current = prev_element_sibling(node);
    while let Some(sibling) = current {
        current = prev_element_sibling(&sibling);
        out.push(sibling);
    }
    out
}

/// True if any ancestor element of `node` satisfies `pred`.
pub fn ancestor_matches<F: Fn(&ElementNode) -> bool>(node: &NodeHandle, pred: F) -> bool {
    let mut current = parent_of(node);
    while let Some(ancestor) = current {
        if let Node::Element(ref elem) = *ancestor.borrow() {
            if pred(elem) {
                return true;
            }
        }
        current = parent_of(&ancestor);
    }
    false
}

/// Returns the document's `<head>`, creating one under `<html>` (or the
/// root) when the document lacks it.
pub fn ensure_head(document: &Document) -> NodeHandle {
    ensure_section(document, "head", true)
}

/// Returns the document's `<body>`, creating one when missing.
pub fn ensure_body(document: &Document) -> NodeHandle {
    ensure_section(document, "body", false)
}

fn ensure_section(document: &Document, tag: &str, first: bool) -> NodeHandle {
    if let Some(existing) = find_element(&document.root, tag) {
        return existing;
    }
    let section = new_element(tag);
    match find_element(&document.root, "html") {
        Some(html) => {
            if let Node::Element(ref mut elem) = *section.borrow_mut() {
                elem.parent = Some(Rc::downgrade(&html));
            }
            if let Node::Element(ref mut html_elem) = *html.borrow_mut() {
                if first {
                    html_elem.children.insert(0, Rc::clone(&section));
                } else {
                    html_elem.children.push(Rc::clone(&section));
                }
            }
        }
        None => append_child(&document.root, Rc::clone(&section)),
    }
    section
}
