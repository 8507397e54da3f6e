//! Selector parsing and element matching for the inlining transform.
//!
//! Handles compound selectors (tag, `#id`, `.class`, `[attr]` conditions)
//! combined with descendant, child (`>`), adjacent-sibling (`+`) and
//! general-sibling (`~`) combinators. Matching proceeds right-to-left from
//! the candidate element, walking parent pointers. Pseudo-classes and
//! pseudo-elements are not matched here; callers route selectors containing
//! `:` elsewhere.

use crate::dom::{self, ElementNode, Node, NodeHandle};
use std::collections::HashSet;

/// Supported attribute selector operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[attr="value"]`
    Exact,
    /// `[attr~="value"]`
    Includes,
    /// `[attr^="value"]`
    Prefix,
    /// `[attr$="value"]`
    Suffix,
    /// `[attr*="value"]`
    Substring,
}

/// One attribute condition; `operator`/`value` of `None` means a bare
/// existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub operator: Option<AttributeOperator>,
    pub value: Option<String>,
}

/// A compound selector: optional tag, optional id, classes, and attribute
/// conditions, all of which must hold on a single element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: HashSet<String>,
    pub attributes: Vec<AttributeSelector>,
}

/// Supported combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

/// A complex selector: the key compound selector plus its ancestor/sibling
/// chain in right-to-left order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub key: CompoundSelector,
    pub ancestors: Vec<(Combinator, CompoundSelector)>,
}

/// Parses a selector, falling back to a single compound selector when the
/// combinator structure cannot be read.
pub fn parse_selector(selector: &str) -> ComplexSelector {
    parse_complex_selector(selector).unwrap_or_else(|| ComplexSelector {
        key: parse_compound_selector(selector),
        ancestors: Vec::new(),
    })
}

/// Parses a complex selector such as `div.red > p#header + span`.
/// Tokens are separated by whitespace.
pub fn parse_complex_selector(selector: &str) -> Option<ComplexSelector> {
    let mut tokens = selector.split_whitespace();
    let mut key = parse_compound_selector(tokens.next()?);
    let mut ancestors = Vec::new();

    while let Some(token) = tokens.next() {
        let (combinator, compound_token) = match token {
            ">" => (Combinator::Child, tokens.next()?),
            "+" => (Combinator::AdjacentSibling, tokens.next()?),
            "~" => (Combinator::GeneralSibling, tokens.next()?),
            _ => (Combinator::Descendant, token),
        };
        ancestors.push((combinator, key));
        key = parse_compound_selector(compound_token);
    }
    ancestors.reverse();
    Some(ComplexSelector { key, ancestors })
}

/// Parses a compound selector such as `div.red#header[data-kind~="main"]`.
pub fn parse_compound_selector(selector: &str) -> CompoundSelector {
    let mut compound = CompoundSelector::default();
    let mut chars = selector.chars().peekable();

    // A leading alphabetic char or `*` starts a tag name.
    if let Some(&ch) = chars.peek() {
        if ch.is_alphabetic() || ch == '*' {
            let mut tag = String::new();
            while let Some(&ch) = chars.peek() {
                if ch == '#' || ch == '.' || ch == '[' {
                    break;
                }
                tag.push(ch);
                chars.next();
            }
            if !tag.is_empty() && tag != "*" {
                compound.tag = Some(tag);
            }
        }
    }

    while let Some(ch) = chars.next() {
        match ch {
            '#' => {
                let name = read_simple_name(&mut chars);
                if !name.is_empty() {
                    compound.id = Some(name);
                }
            }
            '.' => {
                let name = read_simple_name(&mut chars);
                if !name.is_empty() {
                    compound.classes.insert(name);
                }
            }
            '[' => {
                if let Some(attr) = parse_attribute_selector(&mut chars) {
                    compound.attributes.push(attr);
                }
            }
            _ => {}
        }
    }
    compound
}

fn read_simple_name(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&ch) = chars.peek() {
        if ch == '.' || ch == '#' || ch == '[' {
            break;
        }
        name.push(ch);
        chars.next();
    }
    name
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while let Some(&ch) = chars.peek() {
        if !ch.is_whitespace() {
            break;
        }
        chars.next();
    }
}

/// Parses the inside of `[...]`; the cursor sits just past the `[`.
fn parse_attribute_selector(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Option<AttributeSelector> {
    skip_whitespace(chars);

    let mut name = String::new();
    while let Some(&ch) = chars.peek() {
        if ch == '=' || ch == ']' || ch == '~' || ch == '^' || ch == '$' || ch == '*' || ch.is_whitespace() {
            break;
        }
        name.push(ch);
        chars.next();
    }
    skip_whitespace(chars);

    let mut operator = None;
    let mut value = None;
    if let Some(&ch) = chars.peek() {
        if ch == '=' || ch == '~' || ch == '^' || ch == '$' || ch == '*' {
            let mut op = String::new();
            op.push(ch);
            chars.next();
            if op != "=" {
                if let Some(&'=') = chars.peek() {
                    op.push('=');
                    chars.next();
                }
            }
            operator = match op.as_str() {
                "=" => Some(AttributeOperator::Exact),
                "~=" => Some(AttributeOperator::Includes),
                "^=" => Some(AttributeOperator::Prefix),
                "$=" => Some(AttributeOperator::Suffix),
                "*=" => Some(AttributeOperator::Substring),
                _ => None,
            };
            skip_whitespace(chars);
            value = Some(read_attribute_value(chars));
        }
    }

    // Consume through the closing bracket.
    for ch in chars.by_ref() {
        if ch == ']' {
            break;
        }
    }

    if name.is_empty() {
        None
    } else {
        Some(AttributeSelector {
            name,
            operator,
            value,
        })
    }
}

fn read_attribute_value(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut value = String::new();
    match chars.peek() {
        Some(&q) if q == '"' || q == '\'' => {
            chars.next();
            for ch in chars.by_ref() {
                if ch == q {
                    break;
                }
                value.push(ch);
            }
        }
        _ => {
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() || ch == ']' {
                    break;
                }
                value.push(ch);
                chars.next();
            }
        }
    }
    value
}

/// True if the element satisfies every part of the compound selector.
pub fn matches_compound(elem: &ElementNode, compound: &CompoundSelector) -> bool {
    if let Some(ref tag) = compound.tag {
        if !elem.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(ref id) = compound.id {
        if elem.attr("id") != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.is_empty() {
        let Some(class_attr) = elem.attr("class") else {
            return false;
        };
        let elem_classes: HashSet<&str> = class_attr.split_whitespace().collect();
        if !compound
            .classes
            .iter()
            .all(|c| elem_classes.contains(c.as_str()))
        {
            return false;
        }
    }
    compound
        .attributes
        .iter()
        .all(|attr_sel| matches_attribute(elem, attr_sel))
}

fn matches_attribute(elem: &ElementNode, attr_sel: &AttributeSelector) -> bool {
    let Some(actual) = elem.attr(&attr_sel.name) else {
        return false;
    };
    let Some(expected) = &attr_sel.value else {
        // Bare existence check.
        return true;
    };
    match attr_sel.operator {
        Some(AttributeOperator::Exact) => actual == expected,
        Some(AttributeOperator::Includes) => actual.split_whitespace().any(|w| w == expected),
        Some(AttributeOperator::Prefix) => actual.starts_with(expected.as_str()),
        Some(AttributeOperator::Suffix) => actual.ends_with(expected.as_str()),
        Some(AttributeOperator::Substring) => actual.contains(expected.as_str()),
        None => true,
    }
}

/// Matches a complex selector against a candidate element handle,
/// right-to-left along parent and sibling links.
pub fn matches_selector(candidate: &NodeHandle, complex: &ComplexSelector) -> bool {
    {
        let node = candidate.borrow();
        let Node::Element(ref elem) = *node else {
            return false;
        };
        if !matches_compound(elem, &complex.key) {
            return false;
        }
    }

    let mut current = candidate.clone();
    for (combinator, compound) in &complex.ancestors {
        let next = match combinator {
            Combinator::Child => dom::parent_of(&current)
                .filter(|parent| element_matches(parent, compound)),
            Combinator::Descendant => {
                let mut ancestor = dom::parent_of(&current);
                let mut found = None;
                while let Some(node) = ancestor {
                    if element_matches(&node, compound) {
                        found = Some(node);
                        break;
                    }
                    ancestor = dom::parent_of(&node);
                }
                found
            }
            Combinator::AdjacentSibling => dom::prev_element_sibling(&current)
                .filter(|sibling| element_matches(sibling, compound)),
            Combinator::GeneralSibling => dom::prev_element_siblings(&current)
                .into_iter()
                .find(|sibling| element_matches(sibling, compound)),
        };
        match next {
            Some(node) => current = node,
            None => return false,
        }
    }
    true
}

fn element_matches(node: &NodeHandle, compound: &CompoundSelector) -> bool {
    match *node.borrow() {
        Node::Element(ref elem) => matches_compound(elem, compound),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::parser::html::parse_html;

    fn find_by_id(root: &NodeHandle, id: &str) -> NodeHandle {
        dom::collect_elements(root, |elem| elem.attr("id") == Some(id))
            .into_iter()
            .next()
            .expect("element with id present")
    }

    #[test]
    fn parses_compound_parts() {
        let compound = parse_compound_selector("div.red.big#header[data-kind~=\"main\"]");
        assert_eq!(compound.tag.as_deref(), Some("div"));
        assert_eq!(compound.id.as_deref(), Some("header"));
        assert!(compound.classes.contains("red"));
        assert!(compound.classes.contains("big"));
        assert_eq!(compound.attributes.len(), 1);
        assert_eq!(compound.attributes[0].name, "data-kind");
        assert_eq!(
            compound.attributes[0].operator,
            Some(AttributeOperator::Includes)
        );
        assert_eq!(compound.attributes[0].value.as_deref(), Some("main"));
    }

    #[test]
    fn universal_selector_has_no_tag() {
        let compound = parse_compound_selector("*");
        assert!(compound.tag.is_none());
        assert!(compound.id.is_none());
        assert!(compound.classes.is_empty());
    }

    #[test]
    fn matches_class_and_tag() {
        let document = parse_html(r#"<div class="red big" id="a">x</div>"#);
        let elem = find_by_id(&document.root, "a");
        assert!(matches_selector(&elem, &parse_selector("div.red")));
        assert!(matches_selector(&elem, &parse_selector(".big")));
        assert!(!matches_selector(&elem, &parse_selector("span.red")));
        assert!(!matches_selector(&elem, &parse_selector(".blue")));
    }

    #[test]
    fn matches_child_and_descendant() {
        let document = parse_html(
            r#"<div class="outer"><section><p id="p">hi</p></section></div>"#,
        );
        let p = find_by_id(&document.root, "p");
        assert!(matches_selector(&p, &parse_selector("section > p")));
        assert!(!matches_selector(&p, &parse_selector(".outer > p")));
        assert!(matches_selector(&p, &parse_selector(".outer p")));
    }

    #[test]
    fn matches_sibling_combinators() {
        let document = parse_html(
            r#"<div><h2 id="h">t</h2><p id="first">a</p><p id="second">b</p></div>"#,
        );
        let first = find_by_id(&document.root, "first");
        let second = find_by_id(&document.root, "second");
        assert!(matches_selector(&first, &parse_selector("h2 + p")));
        assert!(!matches_selector(&second, &parse_selector("h2 + p")));
        assert!(matches_selector(&second, &parse_selector("h2 ~ p")));
    }

    #[test]
    fn attribute_existence_and_exact() {
        let document = parse_html(r#"<input id="i" type="text" disabled>"#);
        let input = find_by_id(&document.root, "i");
        assert!(matches_selector(&input, &parse_selector("input[disabled]")));
        assert!(matches_selector(
            &input,
            &parse_selector("input[type=\"text\"]")
        ));
        assert!(!matches_selector(
            &input,
            &parse_selector("input[type=\"radio\"]")
        ));
    }
}
