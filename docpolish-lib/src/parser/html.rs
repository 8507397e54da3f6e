//! HTML parsing front-end.
//!
//! Uses html5ever and builds the tree defined in [`crate::dom`] through a
//! custom `TreeSink`.

use crate::dom;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, NodeOrText, QuirksMode, TreeSink},
    LocalName, Namespace, QualName,
};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

/// Parses HTML content into a [`dom::Document`].
pub fn parse_html(html_content: &str) -> dom::Document {
    let sink = DomTreeSink::new();
    html5ever::parse_document(sink, Default::default()).one(html_content.to_string())
}

/// TreeSink that assembles the document tree. Holds the document being
/// built, a stack of open nodes, and the current quirks mode.
pub struct DomTreeSink {
    document: dom::Document,
    stack: RefCell<Vec<dom::NodeHandle>>,
    quirks_mode: RefCell<QuirksMode>,
}

impl DomTreeSink {
    pub fn new() -> Self {
        let document = dom::new_document();
        let root = document.root.clone();
        Self {
            document,
            stack: RefCell::new(vec![root]),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }
}

impl Default for DomTreeSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Element name wrapper returned to html5ever.
#[derive(Debug)]
pub struct DomElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for DomElemName {
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

impl TreeSink for DomTreeSink {
    type Handle = dom::NodeHandle;
    type Output = dom::Document;
    type ElemName<'a>
        = DomElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        debug!("html parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        if let dom::Node::Element(ref elem) = *target.borrow() {
            DomElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            }
        } else {
            panic!("elem_name called on non-element node")
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: html5ever::interface::ElementFlags,
    ) -> Self::Handle {
        let tag = name.local.to_string();
        let mut element = dom::ElementNode::new(tag, name);
        element.attributes = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        Rc::new(RefCell::new(dom::Node::Element(element)))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        dom::new_comment(&text)
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        dom::new_text(&format!("{} {}", target, data))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let (node, is_element) = match child {
            NodeOrText::AppendNode(node) => {
                let is_element = matches!(*node.borrow(), dom::Node::Element(_));
                (node, is_element)
            }
            NodeOrText::AppendText(text) => (dom::new_text(&text), false),
        };
        dom::append_child(parent, Rc::clone(&node));
        if is_element {
            self.stack.borrow_mut().push(node);
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        _prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        self.append(element, child);
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {
        self.stack.borrow_mut().pop();
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, child: NodeOrText<Self::Handle>) {
        // Fall back to a plain append on the sibling's parent; exact foster
        // parenting positions are not significant for these transforms.
        if let Some(parent) = dom::parent_of(sibling) {
            self.append(&parent, child);
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        if let dom::Node::Element(ref mut elem) = *target.borrow_mut() {
            for attr in attrs {
                let key = attr.name.local.to_string();
                if elem.attr(&key).is_none() {
                    elem.attributes.push((key, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, _target: &Self::Handle) {}

    fn reparent_children(&self, _node: &Self::Handle, _new_parent: &Self::Handle) {}
}
