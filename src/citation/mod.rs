/// Builds structured citations from family records and their networks.
pub mod builder;

/// Renders citations as text or JSON.
pub mod formatter;

pub use builder::{
    AdditionalSpouse, Citation, CitationGenerator, CitationKind, PersonLine,
};
pub use formatter::{format_citation_as_json, format_citation_as_text, ENHANCED_MARKER};
