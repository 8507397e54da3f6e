//! Post-processing for HTML and Markdown documents: stylesheet rule
//! consolidation, CSS inlining, collapsible code blocks, diagram conversion,
//! table-of-contents insertion and Markdown rendering.

pub mod dom;
pub mod markdown;
pub mod parser;
pub mod style;
pub mod transform;

pub use dom::Document;
pub use parser::html::parse_html;
pub use parser::serialize::serialize_document;
pub use style::consolidate::consolidate;
