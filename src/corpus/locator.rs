use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::{FamilyGraphError, Result};
use crate::registry::{normalize, FamilyIdRegistry};

use super::FamilyTextLocator;

/// In-memory corpus split into family blocks.
///
/// A block starts at a header line whose text before the first comma is a
/// registered identifier (`KORPI 6, page 105`) and runs until the next
/// header. Text before the first header is ignored.
#[derive(Debug, Clone, Default)]
pub struct CorpusTextLocator {
    /// `(normalized id, block text)` in corpus order.
    blocks: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

/// Returns the identifier named by a header line, if the line is one.
fn header_id(line: &str, registry: &FamilyIdRegistry) -> Option<String> {
    let head = line.split(',').next().unwrap_or("").trim();
    if head.is_empty() || !registry.is_valid(head) {
        return None;
    }
    Some(normalize(head))
}

impl CorpusTextLocator {
    /// Splits corpus text into family blocks.
    pub fn from_text(text: &str, registry: &FamilyIdRegistry) -> Self {
        let mut locator = CorpusTextLocator::default();
        let mut current: Option<(String, Vec<&str>)> = None;

        for line in text.lines() {
            if let Some(id) = header_id(line, registry) {
                if let Some((done_id, lines)) = current.take() {
                    locator.push_block(done_id, &lines);
                }
                current = Some((id, vec![line]));
            } else if let Some((_, lines)) = current.as_mut() {
                lines.push(line);
            }
        }
        if let Some((done_id, lines)) = current.take() {
            locator.push_block(done_id, &lines);
        }

        debug!(blocks = locator.blocks.len(), "corpus split into family blocks");
        locator
    }

    /// Reads and splits a corpus file.
    pub fn load(path: &Path, registry: &FamilyIdRegistry) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| FamilyGraphError::Io {
            message: format!("failed to read corpus: {}", e),
            path: path.display().to_string(),
        })?;
        Ok(Self::from_text(&text, registry))
    }

    fn push_block(&mut self, id: String, lines: &[&str]) {
        if self.positions.contains_key(&id) {
            warn!(family_id = %id, "duplicate family block in corpus, keeping the first");
            return;
        }
        let text = lines.join("\n").trim_end().to_string();
        self.positions.insert(id.clone(), self.blocks.len());
        self.blocks.push((id, text));
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn contains(&self, family_id: &str) -> bool {
        self.positions.contains_key(&normalize(family_id))
    }
}

#[async_trait]
impl FamilyTextLocator for CorpusTextLocator {
    async fn extract_family_text(&self, family_id: &str) -> Option<String> {
        let position = self.positions.get(&normalize(family_id))?;
        self.blocks.get(*position).map(|(_, text)| text.clone())
    }

    async fn find_next_family_id(&self, after: &str) -> Option<String> {
        let position = self.positions.get(&normalize(after))?;
        self.blocks.get(position + 1).map(|(id, _)| id.clone())
    }

    async fn get_all_family_ids(&self) -> Vec<String> {
        self.blocks.iter().map(|(id, _)| id.clone()).collect()
    }
}
