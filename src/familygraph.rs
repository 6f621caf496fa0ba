use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{CacheStatus, FamilyNetworkCache};
use crate::citation::{Citation, CitationGenerator};
use crate::config::{
    get_familygraph_dir, load_config, save_config, validate_config, FamilyGraphConfig, ParserKind,
};
use crate::corpus::{
    CorpusTextLocator, FamilyParser, FamilyTextLocator, HttpFamilyParser, JsonFamilyParser,
};
use crate::errors::{FamilyGraphError, Result};
use crate::names::NameMatcher;
use crate::network::FamilyNetwork;
use crate::registry::FamilyIdRegistry;
use crate::resolution::FamilyResolver;
use crate::types::{Family, Person, PersonQuery};

/// Central orchestrator tying registry, corpus, resolver, cache and
/// citations together.
pub struct FamilyGraph {
    config: FamilyGraphConfig,
    registry: Arc<FamilyIdRegistry>,
    matcher: Arc<NameMatcher>,
    resolver: Arc<FamilyResolver>,
    cache: FamilyNetworkCache,
    project_root: PathBuf,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl FamilyGraph {
    /// Writes a default configuration to `project_root`.
    pub fn init(project_root: &Path) -> Result<FamilyGraphConfig> {
        let config = FamilyGraphConfig::default();
        save_config(project_root, &config)?;
        Ok(config)
    }

    /// Returns `true` if a configuration exists at the given root.
    pub fn is_initialized(project_root: &Path) -> bool {
        get_familygraph_dir(project_root).exists()
    }

    /// Opens a project: loads its config, reads the corpus file and builds
    /// the parser the config names.
    pub fn open(project_root: &Path) -> Result<Self> {
        let config = load_config(project_root)?;
        Self::open_with_config(project_root, config)
    }

    /// Opens a project with an already loaded (possibly overridden) config.
    pub fn open_with_config(project_root: &Path, config: FamilyGraphConfig) -> Result<Self> {
        let registry = Arc::new(FamilyIdRegistry::global().clone());

        let corpus_file = config.corpus_file(project_root);
        let locator: Arc<dyn FamilyTextLocator> =
            Arc::new(CorpusTextLocator::load(&corpus_file, &registry)?);
        let parser = build_parser(&config)?;

        let mut graph = Self::from_parts(config, registry, locator, parser)?;
        graph.project_root = project_root.to_path_buf();
        info!(root = %project_root.display(), "opened family graph");
        Ok(graph)
    }

    /// Name matcher with the project's custom pairs registered, without
    /// opening the corpus.
    pub fn load_name_matcher(project_root: &Path) -> Result<NameMatcher> {
        Ok(name_matcher(&load_config(project_root)?))
    }

    /// Assembles a graph from explicit collaborators.
    pub fn from_parts(
        config: FamilyGraphConfig,
        registry: Arc<FamilyIdRegistry>,
        locator: Arc<dyn FamilyTextLocator>,
        parser: Arc<dyn FamilyParser>,
    ) -> Result<Self> {
        validate_config(&config)?;
        let matcher = Arc::new(name_matcher(&config));
        let resolver = Arc::new(FamilyResolver::new(
            locator,
            parser,
            Arc::clone(&registry),
            Arc::clone(&matcher),
        ));
        let cache = FamilyNetworkCache::new(
            Arc::clone(&resolver),
            config.prefetch.clone(),
            config.resolve_cross_references,
        );

        Ok(Self {
            config,
            registry,
            matcher,
            resolver,
            cache,
            project_root: PathBuf::from("."),
        })
    }
}

/// Builds the parsing service selected in the config.
fn build_parser(config: &FamilyGraphConfig) -> Result<Arc<dyn FamilyParser>> {
    match config.parser.kind {
        ParserKind::Json => Ok(Arc::new(JsonFamilyParser::new())),
        ParserKind::Http => {
            let endpoint =
                config
                    .parser
                    .endpoint
                    .as_deref()
                    .ok_or_else(|| FamilyGraphError::Config {
                        message: "http parser requires an endpoint".to_string(),
                    })?;
            Ok(Arc::new(HttpFamilyParser::new(
                endpoint,
                config.parser.api_key.clone(),
                Duration::from_secs(config.parser.timeout_secs),
            )))
        }
    }
}

fn name_matcher(config: &FamilyGraphConfig) -> NameMatcher {
    NameMatcher::with_custom_equivalences(config.custom_name_equivalences.iter().cloned())
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

impl FamilyGraph {
    /// Resolves a family's network through the cache and, when enabled,
    /// starts prefetching the families after it.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn resolve(&self, family_id: &str) -> Result<Arc<FamilyNetwork>> {
        let network = self.cache.get_or_resolve(family_id).await?;
        if self.config.prefetch.enabled {
            self.cache.start_background_processing(family_id);
        }
        Ok(network)
    }

    /// Loads only the nuclear family, bypassing the cache.
    pub async fn preview(&self, family_id: &str) -> Result<FamilyNetwork> {
        self.resolver.resolve_family(family_id, false).await
    }

    /// Builds the citation for a person of a family, or the plain
    /// main-family citation when no person is given.
    ///
    /// The person may be written `Name, b DATE` to pick one of several
    /// members sharing a name.
    pub async fn citation(&self, family_id: &str, person: Option<&str>) -> Result<Citation> {
        match person {
            Some(text) => {
                self.person_citation(family_id, &PersonQuery::parse(text)).await
            }
            None => {
                let network = self.cache.get_or_resolve(family_id).await?;
                let generator = CitationGenerator::new(&self.matcher);
                Ok(generator.main_family_citation(
                    &network.main_family,
                    None,
                    Some(network.as_ref()),
                ))
            }
        }
    }

    /// Builds the citation for the family member `query` selects.
    pub async fn person_citation(&self, family_id: &str, query: &PersonQuery) -> Result<Citation> {
        let network = self.cache.get_or_resolve(family_id).await?;
        let family = &network.main_family;
        let person = self.find_person(family, query).ok_or_else(|| {
            FamilyGraphError::PersonNotFound {
                family_id: network.family_id(),
                name: query.name.clone(),
            }
        })?;

        let generator = CitationGenerator::new(&self.matcher);
        Ok(generator.citation_for(&person, family, Some(network.as_ref())))
    }

    /// Birth date and role narrow the members first. Among those, an exact
    /// name beats a spelling variant; a married child's spouse comes last.
    fn find_person(&self, family: &Family, query: &PersonQuery) -> Option<Person> {
        let candidates: Vec<&Person> = family
            .members()
            .into_iter()
            .filter(|(role, p)| query.admits(*role, p))
            .map(|(_, p)| p)
            .collect();

        let member = candidates
            .iter()
            .find(|p| p.has_exact_name(&query.name))
            .or_else(|| {
                candidates
                    .iter()
                    .find(|p| self.matcher.are_names_equivalent(&p.full_name(), &query.name))
            });
        if let Some(member) = member {
            return Some(Person::clone(member));
        }
        if query.role.is_some() {
            return None;
        }

        family
            .married_children()
            .into_iter()
            .filter(|c| {
                query
                    .birth
                    .as_deref()
                    .map_or(true, |b| c.spouse_birth() == Some(b))
            })
            .filter_map(|c| c.spouse_name())
            .find(|spouse| self.matcher.are_names_equivalent(spouse, &query.name))
            .map(Person::named)
    }
}

// ---------------------------------------------------------------------------
// Navigation and accessors
// ---------------------------------------------------------------------------

impl FamilyGraph {
    pub fn next_family(&self, family_id: &str) -> Option<String> {
        self.registry.next_family_after(family_id).map(str::to_string)
    }

    pub fn previous_family(&self, family_id: &str) -> Option<String> {
        self.registry
            .previous_family_before(family_id)
            .map(str::to_string)
    }

    pub fn cache_status(&self) -> CacheStatus {
        self.cache.status()
    }

    pub fn cache(&self) -> &FamilyNetworkCache {
        &self.cache
    }

    pub fn registry(&self) -> &FamilyIdRegistry {
        &self.registry
    }

    pub fn matcher(&self) -> &NameMatcher {
        &self.matcher
    }

    pub fn config(&self) -> &FamilyGraphConfig {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}
