use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::corpus::{FamilyParser, FamilyTextLocator};
use crate::errors::{FamilyGraphError, Result};
use crate::names::NameMatcher;
use crate::network::FamilyNetwork;
use crate::registry::{normalize, FamilyIdRegistry};
use crate::types::*;

/// Resolves the cross-references of a nuclear family into linked family
/// records, one hop per category.
///
/// Linked families that cannot be resolved are left out of the network; only
/// the primary family load reports errors.
pub struct FamilyResolver {
    locator: Arc<dyn FamilyTextLocator>,
    parser: Arc<dyn FamilyParser>,
    registry: Arc<FamilyIdRegistry>,
    matcher: Arc<NameMatcher>,
}

impl FamilyResolver {
    pub fn new(
        locator: Arc<dyn FamilyTextLocator>,
        parser: Arc<dyn FamilyParser>,
        registry: Arc<FamilyIdRegistry>,
        matcher: Arc<NameMatcher>,
    ) -> Self {
        Self {
            locator,
            parser,
            registry,
            matcher,
        }
    }

    pub fn locator(&self) -> &Arc<dyn FamilyTextLocator> {
        &self.locator
    }

    pub fn registry(&self) -> &Arc<FamilyIdRegistry> {
        &self.registry
    }

    pub fn matcher(&self) -> &Arc<NameMatcher> {
        &self.matcher
    }

    /// Validates, fetches and parses one family.
    ///
    /// Fails with `InvalidIdentifier` for ids outside the registry,
    /// `NotFound` when the corpus has no text for it and `Parse` when the
    /// parsing service rejects the text.
    pub async fn load_family(&self, family_id: &str) -> Result<Family> {
        if !self.registry.is_valid(family_id) {
            return Err(FamilyGraphError::InvalidIdentifier {
                family_id: family_id.trim().to_string(),
            });
        }
        let id = normalize(family_id);

        let text = self
            .locator
            .extract_family_text(&id)
            .await
            .ok_or_else(|| FamilyGraphError::NotFound {
                family_id: id.clone(),
            })?;

        self.parser.parse_family(&id, &text).await
    }

    /// Loads the primary family and builds its network.
    pub async fn resolve_family(
        &self,
        family_id: &str,
        resolve_cross_references: bool,
    ) -> Result<FamilyNetwork> {
        let family = self.load_family(family_id).await?;
        Ok(self.resolve_network(family, resolve_cross_references).await)
    }

    /// Builds the network of an already-parsed nuclear family.
    ///
    /// With `resolve_cross_references` off the network holds only the nuclear
    /// family. Parent and child references resolve concurrently; spouse
    /// references need the children's families and follow them.
    pub async fn resolve_network(
        &self,
        family: Family,
        resolve_cross_references: bool,
    ) -> FamilyNetwork {
        let mut network = FamilyNetwork::new(family);
        if !resolve_cross_references {
            return network;
        }

        let nuclear = &network.main_family;
        let (as_child, as_parent) = tokio::join!(
            self.resolve_parents(nuclear),
            self.resolve_children(nuclear)
        );
        let spouses = self.resolve_spouses(nuclear, &as_parent).await;

        network.as_child_families = as_child;
        network.as_parent_families = as_parent;
        network.spouse_as_child_families = spouses;

        info!(
            family_id = %network.family_id(),
            as_child = network.as_child_families.len(),
            as_parent = network.as_parent_families.len(),
            spouse_as_child = network.spouse_as_child_families.len(),
            "resolved family network"
        );
        network
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    /// Birth families of the primary couple, keyed by parent name.
    async fn resolve_parents(&self, nuclear: &Family) -> HashMap<String, Family> {
        let requests: Vec<(String, String)> = nuclear
            .parents()
            .into_iter()
            .filter_map(|parent| {
                let reference = parent.as_child_ref()?;
                Some((parent.display_name().to_string(), reference.to_string()))
            })
            .collect();
        self.resolve_all(nuclear, requests).await
    }

    /// Families founded by married children, keyed by child display name.
    async fn resolve_children(&self, nuclear: &Family) -> HashMap<String, Family> {
        let requests: Vec<(String, String)> = nuclear
            .all_children()
            .into_iter()
            .filter(|child| child.is_married())
            .filter_map(|child| {
                let reference = child.as_parent_ref()?;
                Some((child.display_name().to_string(), reference.to_string()))
            })
            .collect();
        self.resolve_all(nuclear, requests).await
    }

    /// Birth families of children's spouses, keyed by the spouse name written
    /// in the nuclear family.
    async fn resolve_spouses(
        &self,
        nuclear: &Family,
        as_parent: &HashMap<String, Family>,
    ) -> HashMap<String, Family> {
        let mut requests: Vec<(String, String)> = Vec::new();
        for child in nuclear.married_children() {
            let Some(spouse_name) = child.spouse_name() else {
                continue;
            };
            let Some(own_family) = as_parent.get(child.display_name()) else {
                continue;
            };
            match self.find_spouse_in(child, spouse_name, own_family) {
                Some(spouse) => {
                    if let Some(reference) = spouse.as_child_ref() {
                        requests.push((spouse_name.to_string(), reference.to_string()));
                    }
                }
                None => debug!(
                    child = child.display_name(),
                    spouse = spouse_name,
                    family_id = %own_family.family_id,
                    "spouse not found in child's family"
                ),
            }
        }
        self.resolve_all(nuclear, requests).await
    }

    /// Finds the child's partner inside the child's own family.
    ///
    /// Couples where the child is one spouse are checked first; otherwise any
    /// person other than the child whose name matches the spouse name.
    fn find_spouse_in<'f>(
        &self,
        child: &Person,
        spouse_name: &str,
        family: &'f Family,
    ) -> Option<&'f Person> {
        let same = |a: &str, b: &str| self.matcher.are_names_equivalent(a, b);

        for couple in &family.couples {
            let partner = if same(&couple.husband.name, &child.name) {
                &couple.wife
            } else if same(&couple.wife.name, &child.name) {
                &couple.husband
            } else {
                continue;
            };
            if same(&partner.name, spouse_name) {
                return Some(partner);
            }
        }

        family
            .all_persons()
            .into_iter()
            .find(|p| same(&p.name, spouse_name) && !same(&p.name, &child.name))
    }

    // ------------------------------------------------------------------
    // Private helpers
    // ------------------------------------------------------------------

    /// Resolves `(key, reference)` pairs concurrently and keeps the ones that
    /// load.
    async fn resolve_all(
        &self,
        nuclear: &Family,
        requests: Vec<(String, String)>,
    ) -> HashMap<String, Family> {
        let loads = requests.iter().map(|(key, reference)| async move {
            let family = self.load_linked(nuclear, reference).await?;
            Some((key.clone(), family))
        });
        join_all(loads).await.into_iter().flatten().collect()
    }

    /// Loads a linked family, recording failures instead of returning them.
    async fn load_linked(&self, nuclear: &Family, reference: &str) -> Option<Family> {
        if normalize(reference) == normalize(&nuclear.family_id) {
            debug!(reference, "skipping reference back to the nuclear family");
            return None;
        }
        if !self.registry.is_valid(reference) {
            debug!(reference, "skipping pseudo family reference");
            return None;
        }

        match self.load_family(reference).await {
            Ok(family) => Some(family),
            Err(e) => {
                let e = e.into_unresolvable();
                warn!(family_id = %nuclear.family_id, error = %e, "linked family omitted");
                None
            }
        }
    }
}
