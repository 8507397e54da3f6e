//! Stylesheet rule consolidation.
//!
//! Takes raw stylesheet text, splits grouped selector lists into individual
//! rules, folds repeated declarations per selector under cascade-like
//! precedence (`!important` beats normal, later beats earlier), and
//! re-serializes one block per selector.
//!
//! Extraction is deliberately flat: only non-nested `selector { body }`
//! blocks are recognized. Inner rules of at-rule groups such as `@media` are
//! picked up as if they were top level and the at-rule header is dropped.

use std::collections::HashMap;

/// A single `property: value` entry after merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Raw value text, trimmed; keeps its `!important` suffix when present.
    pub value: String,
    pub important: bool,
}

/// Insertion-ordered mapping from property name to its merged declaration.
///
/// Iteration order is the order in which each property was first seen;
/// overwrites never move a property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    order: Vec<String>,
    entries: HashMap<String, Declaration>,
}

impl PropertyMap {
    /// Folds one observed `property: value` pair into the map.
    ///
    /// A new observation replaces the stored one unless the stored entry is
    /// important and the new one is not.
    pub fn apply(&mut self, property: &str, value: &str) {
        let important = value.ends_with("!important");
        match self.entries.get_mut(property) {
            None => {
                self.order.push(property.to_string());
                self.entries.insert(
                    property.to_string(),
                    Declaration {
                        value: value.to_string(),
                        important,
                    },
                );
            }
            Some(existing) => {
                if important || !existing.important {
                    existing.value = value.to_string();
                    existing.important = important;
                }
            }
        }
    }

    pub fn get(&self, property: &str) -> Option<&Declaration> {
        self.entries.get(property)
    }

    /// Properties with their declarations, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Declaration)> {
        self.order
            .iter()
            .map(|p| (p.as_str(), &self.entries[p]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Consolidated stylesheet: one ordered property map per selector, selectors
/// in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidatedSheet {
    order: Vec<String>,
    rules: HashMap<String, PropertyMap>,
}

impl ConsolidatedSheet {
    /// Selectors in first-seen order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn rule(&self, selector: &str) -> Option<&PropertyMap> {
        self.rules.get(selector)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn entry(&mut self, selector: &str) -> &mut PropertyMap {
        if !self.rules.contains_key(selector) {
            self.order.push(selector.to_string());
            self.rules.insert(selector.to_string(), PropertyMap::default());
        }
        self.rules.get_mut(selector).expect("selector just inserted")
    }

    /// Serializes back to stylesheet text, one block per selector,
    /// blocks separated by a blank line, trailing semicolon on the last
    /// declaration. Re-running the pipeline over this output reproduces the
    /// same sheet.
    pub fn to_css(&self) -> String {
        let mut blocks = Vec::with_capacity(self.order.len());
        for selector in &self.order {
            let props = &self.rules[selector];
            let body: Vec<String> = props
                .iter()
                .map(|(property, decl)| format!("{}: {}", property, decl.value))
                .collect();
            blocks.push(format!("{} {{ {}; }}", selector, body.join("; ")));
        }
        blocks.join("\n\n")
    }
}

/// Scans stylesheet text for flat `selector { body }` blocks and splits
/// comma-joined selector lists, emitting one `(selector, declarationBlock)`
/// pair per individual selector, in source order.
///
/// Equivalent to repeatedly matching `[^{}]+ "{" [^{}]+ "}"`: the selector
/// run is the maximal brace-free run before the `{`, the body the brace-free
/// run up to the next `}`. Selectors that trim to empty text are dropped;
/// text that never forms a complete block is silently ignored.
pub fn extract_rules(css: &str) -> Vec<(String, String)> {
    let mut rules = Vec::new();
    // Index after the most recently consumed brace; the selector candidate
    // always starts here.
    let mut run_start = 0;
    // Byte position of the `{` opening the current candidate block.
    let mut open_brace: Option<usize> = None;

    for (i, ch) in css.char_indices() {
        match ch {
            '{' => {
                if let Some(prev) = open_brace {
                    // A second `{` before any `}`: the earlier candidate
                    // cannot match, restart with this brace. The selector
                    // run begins after the abandoned `{`.
                    run_start = prev + 1;
                }
                open_brace = Some(i);
            }
            '}' => {
                if let Some(open) = open_brace {
                    let selectors = &css[run_start..open];
                    let body = &css[open + 1..i];
                    if !selectors.is_empty() && !body.is_empty() {
                        let block = body.trim();
                        for selector in selectors.split(',') {
                            let selector = selector.trim();
                            if !selector.is_empty() {
                                rules.push((selector.to_string(), block.to_string()));
                            }
                        }
                    }
                    open_brace = None;
                }
                run_start = i + 1;
            }
            _ => {}
        }
    }
    rules
}

/// Replays extracted rules into a [`ConsolidatedSheet`].
///
/// Declaration blocks are split on `;`; each non-blank clause containing a
/// `:` is split on the first `:` only (values may themselves contain
/// colons), both sides trimmed. Clauses without a colon are dropped
/// silently. A selector enters the output only once it contributes a valid
/// declaration.
pub fn merge_rules(rules: &[(String, String)]) -> ConsolidatedSheet {
    let mut sheet = ConsolidatedSheet::default();
    for (selector, block) in rules {
        for clause in block.split(';') {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            let Some((property, value)) = clause.split_once(':') else {
                continue;
            };
            sheet.entry(selector).apply(property.trim(), value.trim());
        }
    }
    sheet
}

/// The full pipeline: extract, merge, serialize. Pure and stateless; empty
/// or block-free input yields an empty string.
pub fn consolidate(css: &str) -> String {
    merge_rules(&extract_rules(css)).to_css()
}
