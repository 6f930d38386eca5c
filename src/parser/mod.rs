//! Conversion of the sanctions XML export into [`SanctionEntry`](crate::models::SanctionEntry) records.

mod entity_builder;
mod file_loader;
mod xml_parser;

// Re-export public API
pub use file_loader::{load_document_file, parse_document_file};
pub use xml_parser::parse_document;
