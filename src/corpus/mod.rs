//! Access to the source corpus.
//!
//! The resolver only talks to the corpus through two traits: a locator that
//! finds the raw text block of a family, and a parser that turns such a block
//! into a structured [`Family`](crate::types::Family). Both are external
//! capabilities; the implementations here cover a plain-text corpus file, a
//! pre-structured JSON corpus and a remote parsing endpoint.

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::Family;

/// Corpus file locator.
pub mod locator;

/// JSON and HTTP parsing services.
pub mod parser;

pub use locator::CorpusTextLocator;
pub use parser::{HttpFamilyParser, JsonFamilyParser};

/// Finds family text blocks in corpus order.
///
/// Lookups never fail: a missing family yields `None` or an empty list.
#[async_trait]
pub trait FamilyTextLocator: Send + Sync {
    /// Raw text block of a family, header line included.
    async fn extract_family_text(&self, family_id: &str) -> Option<String>;

    /// Identifier of the block that follows `after` in the corpus.
    async fn find_next_family_id(&self, after: &str) -> Option<String>;

    /// Every identifier present in the corpus, in order.
    async fn get_all_family_ids(&self) -> Vec<String>;
}

/// Turns a raw family text block into a structured record.
#[async_trait]
pub trait FamilyParser: Send + Sync {
    /// Fails with [`FamilyGraphError::Parse`](crate::errors::FamilyGraphError::Parse)
    /// when the text cannot be structured.
    async fn parse_family(&self, family_id: &str, raw_text: &str) -> Result<Family>;
}
