pub mod consolidate;
pub mod inline;
pub mod matcher;
