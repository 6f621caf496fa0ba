use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::registry::normalize;
use crate::types::{Family, Person};

/// A nuclear family together with every family its members link to.
///
/// Keys are names as written in the nuclear family: parent name for birth
/// families, child display name for families founded by children, and the
/// spouse name recorded on the child for spouses' birth families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyNetwork {
    pub main_family: Family,
    pub as_child_families: HashMap<String, Family>,
    pub as_parent_families: HashMap<String, Family>,
    pub spouse_as_child_families: HashMap<String, Family>,
}

impl FamilyNetwork {
    /// A network with no linked families.
    pub fn new(main_family: Family) -> Self {
        Self {
            main_family,
            as_child_families: HashMap::new(),
            as_parent_families: HashMap::new(),
            spouse_as_child_families: HashMap::new(),
        }
    }

    /// Normalized identifier of the nuclear family.
    pub fn family_id(&self) -> String {
        normalize(&self.main_family.family_id)
    }

    /// Birth family of a parent of the nuclear family.
    pub fn as_child_family(&self, person: &Person) -> Option<&Family> {
        self.as_child_families.get(person.display_name())
    }

    /// Family founded by a child of the nuclear family.
    pub fn as_parent_family(&self, person: &Person) -> Option<&Family> {
        self.as_parent_families.get(person.display_name())
    }

    /// Birth family of a child's spouse, keyed by the spouse name on the child.
    pub fn spouse_as_child_family(&self, spouse_name: &str) -> Option<&Family> {
        self.spouse_as_child_families.get(spouse_name.trim())
    }

    pub fn total_linked_families(&self) -> usize {
        self.as_child_families.len()
            + self.as_parent_families.len()
            + self.spouse_as_child_families.len()
    }

    pub fn has_cross_references(&self) -> bool {
        self.total_linked_families() > 0
    }

    /// Normalized identifiers of every linked family, sorted and deduplicated.
    pub fn linked_family_ids(&self) -> Vec<String> {
        let ids: BTreeSet<String> = self
            .as_child_families
            .values()
            .chain(self.as_parent_families.values())
            .chain(self.spouse_as_child_families.values())
            .map(|f| normalize(&f.family_id))
            .collect();
        ids.into_iter().collect()
    }
}
