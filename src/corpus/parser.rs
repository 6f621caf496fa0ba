use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::errors::{FamilyGraphError, Result};
use crate::types::Family;

use super::FamilyParser;

/// Reads page references from a header such as `KORPI 6, pages 105, 106`.
fn header_pages(header: &str) -> Vec<String> {
    let Some((_, rest)) = header.split_once(',') else {
        return Vec::new();
    };
    let rest = rest.trim();
    let rest = rest
        .strip_prefix("pages")
        .or_else(|| rest.strip_prefix("page"))
        .unwrap_or(rest);
    rest.split(',')
        .map(|p| p.trim().trim_end_matches('.').to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Parses blocks that hold a JSON-serialized [`Family`], optionally preceded
/// by the corpus header line.
///
/// Missing `family_id` and `page_references` are filled from the request and
/// the header line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFamilyParser;

impl JsonFamilyParser {
    pub fn new() -> Self {
        JsonFamilyParser
    }
}

#[async_trait]
impl FamilyParser for JsonFamilyParser {
    async fn parse_family(&self, family_id: &str, raw_text: &str) -> Result<Family> {
        let Some(start) = raw_text.find('{') else {
            return Err(FamilyGraphError::Parse {
                family_id: family_id.to_string(),
                message: "no JSON object in family text".to_string(),
            });
        };
        let header = raw_text[..start].lines().next().unwrap_or("");

        let mut family: Family =
            serde_json::from_str(&raw_text[start..]).map_err(|e| FamilyGraphError::Parse {
                family_id: family_id.to_string(),
                message: e.to_string(),
            })?;

        if family.family_id.trim().is_empty() {
            family.family_id = family_id.to_string();
        }
        if family.page_references.is_empty() {
            family.page_references = header_pages(header);
        }
        Ok(family)
    }
}

/// Delegates parsing to a remote service.
///
/// Posts `{"family_id": .., "text": ..}` and expects a JSON [`Family`] in the
/// response. Every call is bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct HttpFamilyParser {
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpFamilyParser {
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn call(&self, family_id: &str, raw_text: &str) -> Result<Family> {
        let parse_error = |message: String| FamilyGraphError::Parse {
            family_id: family_id.to_string(),
            message,
        };

        let body = serde_json::to_vec(&json!({
            "family_id": family_id,
            "text": raw_text,
        }))?;

        let config = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build();
        let agent = ureq::Agent::new_with_config(config);

        let mut request = agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", &format!("Bearer {}", key));
        }

        let mut response = request.send(&body[..]).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("timed out") || msg.contains("Timeout") {
                parse_error(format!("parsing service timed out after {:?}", self.timeout))
            } else {
                parse_error(format!("parsing service request failed: {}", msg))
            }
        })?;

        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| parse_error(format!("failed to read response: {}", e)))?;

        let mut family: Family = serde_json::from_str(&text)
            .map_err(|e| parse_error(format!("invalid family JSON: {}", e)))?;
        if family.family_id.trim().is_empty() {
            family.family_id = family_id.to_string();
        }
        Ok(family)
    }
}

#[async_trait]
impl FamilyParser for HttpFamilyParser {
    async fn parse_family(&self, family_id: &str, raw_text: &str) -> Result<Family> {
        debug!(family_id, endpoint = %self.endpoint, "calling parsing service");
        let parser = self.clone();
        let id = family_id.to_string();
        let text = raw_text.to_string();
        tokio::task::spawn_blocking(move || parser.call(&id, &text))
            .await
            .map_err(|e| FamilyGraphError::Http {
                message: format!("parsing task failed: {}", e),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_pages() {
        assert_eq!(header_pages("KORPI 6, page 105"), vec!["105"]);
        assert_eq!(header_pages("KORPI 6, pages 105, 106"), vec!["105", "106"]);
        assert!(header_pages("KORPI 6").is_empty());
    }

    #[tokio::test]
    async fn test_json_parser_fills_id_and_pages() {
        let text = "KORPI 6, page 105\n{\"couples\": []}";
        let family = JsonFamilyParser.parse_family("KORPI 6", text).await.unwrap();
        assert_eq!(family.family_id, "KORPI 6");
        assert_eq!(family.page_references, vec!["105"]);
    }

    #[tokio::test]
    async fn test_json_parser_rejects_plain_text() {
        let err = JsonFamilyParser
            .parse_family("KORPI 6", "KORPI 6, page 105\nMatti Korpi")
            .await
            .unwrap_err();
        assert!(matches!(err, FamilyGraphError::Parse { .. }));
    }
}
