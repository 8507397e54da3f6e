pub mod collapsible;
pub mod mermaid;
pub mod simplify;
pub mod toc;
