use serde::{Deserialize, Serialize};

use crate::names::NameMatcher;
use crate::network::FamilyNetwork;
use crate::registry::normalize;
use crate::types::*;

/// Perspective a citation is written from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CitationKind {
    /// The nuclear family itself.
    MainFamily,
    /// A person's birth family, seen from that person as a child.
    AsChild,
}

/// One rendered person. Absent dates are `None` and never printed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonLine {
    pub name: String,
    pub birth: Option<String>,
    pub death: Option<String>,
    pub spouse: Option<String>,
    pub spouse_birth: Option<String>,
    pub spouse_death: Option<String>,
    /// Full date, or an expanded or short year.
    pub marriage: Option<String>,
    pub note_markers: Vec<String>,
    pub is_target: bool,
    /// Some value was taken from a cross-referenced family.
    pub enhanced: bool,
    /// Identifiers of the families that supplied enhanced values.
    pub enhanced_from: Vec<String>,
}

impl PersonLine {
    fn enhance_from(&mut self, family_id: &str) {
        self.enhanced = true;
        let id = normalize(family_id);
        if !self.enhanced_from.contains(&id) {
            self.enhanced_from.push(id);
        }
    }
}

/// A further marriage of one of the parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalSpouse {
    pub spouse: PersonLine,
    pub marriage: Option<String>,
}

/// Structured citation, rendered by the formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub kind: CitationKind,
    pub family_id: String,
    pub page_references: Vec<String>,
    pub parents: Vec<PersonLine>,
    pub marriage: Option<String>,
    pub children: Vec<PersonLine>,
    pub children_died_infancy: Option<u32>,
    pub additional_spouses: Vec<AdditionalSpouse>,
    pub notes: Vec<String>,
    pub note_definitions: Vec<(String, String)>,
}

impl Citation {
    pub fn has_enhancements(&self) -> bool {
        self.parents
            .iter()
            .chain(self.children.iter())
            .any(|line| line.enhanced)
    }

    /// The line marked as the citation's target.
    pub fn target(&self) -> Option<&PersonLine> {
        self.parents
            .iter()
            .chain(self.children.iter())
            .find(|line| line.is_target)
    }
}

/// Marriage text for a couple: the full date when known, else the short year
/// expanded with the older spouse's birth year.
fn couple_marriage(couple: &Couple) -> Option<String> {
    if let Some(full) = couple.full_marriage() {
        return Some(full.to_string());
    }
    couple
        .marriage()
        .map(|short| expand_marriage_year(short, couple.older_birth_year()))
}

/// Marriage text for a child: the full date when known, else the short year
/// expanded with the older parent's birth year.
fn child_marriage(child: &Person, parents_birth_year: Option<i32>) -> Option<String> {
    if let Some(full) = child.full_marriage() {
        return Some(full.to_string());
    }
    child
        .marriage()
        .map(|short| expand_marriage_year(short, parents_birth_year))
}

/// A `dd.mm.yyyy` style date rather than a bare or short year.
fn is_full_date(date: &str) -> bool {
    date.contains('.') && extract_year(date).is_some()
}

fn parent_line(person: &Person) -> PersonLine {
    PersonLine {
        name: person.full_name(),
        birth: person.birth().map(str::to_string),
        death: person.death().map(str::to_string),
        note_markers: person.note_markers.clone(),
        ..PersonLine::default()
    }
}

/// Builds citations, using the name matcher to find the same person across
/// linked family records.
pub struct CitationGenerator<'a> {
    matcher: &'a NameMatcher,
}

impl<'a> CitationGenerator<'a> {
    pub fn new(matcher: &'a NameMatcher) -> Self {
        Self { matcher }
    }

    /// Chooses the citation that fits the person's role in the family.
    ///
    /// A parent with a resolved birth family and a child's spouse with a
    /// resolved birth family get an as-child citation; everyone else gets the
    /// main-family citation with themselves as target.
    pub fn citation_for(
        &self,
        person: &Person,
        family: &Family,
        network: Option<&FamilyNetwork>,
    ) -> Citation {
        let Some(network) = network else {
            return self.main_family_citation(family, Some(person), None);
        };

        let is_parent = family
            .all_parents()
            .into_iter()
            .any(|p| self.same_person(p, person));
        if is_parent {
            if let Some(birth_family) = network.as_child_family(person) {
                return self.as_child_citation(person, birth_family, Some(family));
            }
        }

        let is_child = family
            .all_children()
            .into_iter()
            .any(|c| self.same_person(c, person));
        if !is_parent && !is_child {
            for child in family.married_children() {
                let Some(spouse_name) = child.spouse_name() else {
                    continue;
                };
                if !self.matcher.are_names_equivalent(spouse_name, &person.name) {
                    continue;
                }
                if let Some(birth_family) = network.spouse_as_child_family(spouse_name) {
                    let own_family = network.as_parent_family(child);
                    return self.as_child_citation(person, birth_family, own_family);
                }
            }
        }

        self.main_family_citation(family, Some(person), Some(network))
    }

    /// Citation of the nuclear family: parents, marriage, every child and
    /// further marriages.
    ///
    /// With a network, married children are completed from their own
    /// families and their spouses from the spouses' birth families. The
    /// records themselves are never modified.
    pub fn main_family_citation(
        &self,
        family: &Family,
        target: Option<&Person>,
        network: Option<&FamilyNetwork>,
    ) -> Citation {
        let mut citation = self.empty_citation(CitationKind::MainFamily, family);
        let Some(primary) = family.primary_couple() else {
            return citation;
        };

        citation.parents = primary
            .parents()
            .iter()
            .map(|p| {
                let mut line = parent_line(p);
                line.is_target = target.is_some_and(|t| self.same_person(p, t));
                line
            })
            .collect();
        citation.marriage = couple_marriage(primary);

        let parents_birth_year = primary.older_birth_year();
        citation.children = family
            .couples
            .iter()
            .flat_map(|couple| {
                let older = couple.older_birth_year().or(parents_birth_year);
                couple.children.iter().map(move |child| (child, older))
            })
            .map(|(child, older)| {
                let mut line = self.child_line(child, older, network);
                line.is_target = target.is_some_and(|t| self.same_person(child, t));
                line
            })
            .collect();

        let infant_deaths: u32 = family
            .couples
            .iter()
            .filter_map(|c| c.children_died_infancy)
            .sum();
        if family.couples.iter().any(|c| c.children_died_infancy.is_some()) {
            citation.children_died_infancy = Some(infant_deaths);
        }

        citation.additional_spouses = family
            .couples
            .iter()
            .skip(1)
            .map(|couple| {
                let spouse = self.new_spouse(primary, couple);
                let mut line = parent_line(spouse);
                line.is_target = target.is_some_and(|t| self.same_person(spouse, t));
                AdditionalSpouse {
                    spouse: line,
                    marriage: couple_marriage(couple),
                }
            })
            .collect();

        citation
    }

    /// Citation of a person's birth family with the person marked among the
    /// siblings.
    ///
    /// The target's line is completed from the family the person founded
    /// (`own_family`): death date, spouse and marriage when the birth family
    /// lacks them.
    pub fn as_child_citation(
        &self,
        person: &Person,
        birth_family: &Family,
        own_family: Option<&Family>,
    ) -> Citation {
        let mut citation = self.empty_citation(CitationKind::AsChild, birth_family);
        let Some(primary) = birth_family.primary_couple() else {
            return citation;
        };

        citation.parents = primary.parents().iter().map(|p| parent_line(p)).collect();
        citation.marriage = couple_marriage(primary);
        citation.children_died_infancy = primary.children_died_infancy;

        let parents_birth_year = primary.older_birth_year();
        citation.children = birth_family
            .all_children()
            .into_iter()
            .map(|child| {
                let mut line = self.child_line(child, parents_birth_year, None);
                if self.same_person(child, person) {
                    line.is_target = true;
                    if let Some(own) = own_family {
                        self.complete_from_own_family(&mut line, person, own);
                    }
                }
                line
            })
            .collect();

        citation
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn empty_citation(&self, kind: CitationKind, family: &Family) -> Citation {
        Citation {
            kind,
            family_id: family.family_id.clone(),
            page_references: family.page_references.clone(),
            parents: Vec::new(),
            marriage: None,
            children: Vec::new(),
            children_died_infancy: None,
            additional_spouses: Vec::new(),
            notes: family.notes.clone(),
            note_definitions: family
                .note_definitions
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Same name (by equivalence) and no conflicting birth date.
    fn same_person(&self, a: &Person, b: &Person) -> bool {
        if a == b {
            return true;
        }
        if !self.matcher.are_names_equivalent(&a.name, &b.name) {
            return false;
        }
        match (a.birth(), b.birth()) {
            (Some(x), Some(y)) => x == y,
            _ => true,
        }
    }

    /// The spouse in a later couple who is not one of the primary parents.
    fn new_spouse<'f>(&self, primary: &Couple, couple: &'f Couple) -> &'f Person {
        if self.same_person(&couple.husband, &primary.husband)
            || self.same_person(&couple.husband, &primary.wife)
        {
            &couple.wife
        } else if self.same_person(&couple.wife, &primary.wife)
            || self.same_person(&couple.wife, &primary.husband)
        {
            &couple.husband
        } else {
            &couple.wife
        }
    }

    /// `parents_birth_year` is the older parent's birth year, used to expand
    /// a two-digit marriage year.
    fn child_line(
        &self,
        child: &Person,
        parents_birth_year: Option<i32>,
        network: Option<&FamilyNetwork>,
    ) -> PersonLine {
        let mut line = PersonLine {
            name: child.display_name().to_string(),
            birth: child.birth().map(str::to_string),
            death: child.death().map(str::to_string),
            spouse: child.spouse_name().map(str::to_string),
            spouse_birth: child.spouse_birth().map(str::to_string),
            marriage: child_marriage(child, parents_birth_year),
            note_markers: child.note_markers.clone(),
            ..PersonLine::default()
        };

        if let Some(network) = network {
            if child.is_married() {
                self.enhance_from_own_family(&mut line, child, network);
                self.enhance_spouse(&mut line, child, network);
            }
        }
        line
    }

    /// Takes death date and full marriage date from the child's own family.
    fn enhance_from_own_family(
        &self,
        line: &mut PersonLine,
        child: &Person,
        network: &FamilyNetwork,
    ) {
        let Some(own_family) = network.as_parent_family(child) else {
            return;
        };
        let Some((couple, matched)) = own_family.couples.iter().find_map(|couple| {
            couple
                .parents()
                .into_iter()
                .find(|p| self.matches_by_name_or_birth(p, child))
                .map(|p| (couple, p))
        }) else {
            return;
        };

        if let Some(death) = matched.death() {
            if child.death() != Some(death) {
                line.death = Some(death.to_string());
                line.enhance_from(&own_family.family_id);
            }
        }

        let full_marriage = matched.full_marriage().or_else(|| couple.full_marriage());
        if let Some(full) = full_marriage {
            if child.full_marriage() != Some(full) {
                line.marriage = Some(full.to_string());
                line.enhance_from(&own_family.family_id);
            }
        }
    }

    /// Takes the spouse's birth and death dates from the spouse's birth
    /// family.
    fn enhance_spouse(&self, line: &mut PersonLine, child: &Person, network: &FamilyNetwork) {
        let Some(spouse_name) = child.spouse_name() else {
            return;
        };
        let Some(birth_family) = network.spouse_as_child_family(spouse_name) else {
            return;
        };
        let Some(spouse) = birth_family
            .all_children()
            .into_iter()
            .find(|c| self.matcher.are_names_equivalent(&c.name, spouse_name))
        else {
            return;
        };

        if let Some(birth) = spouse.birth() {
            if line.spouse_birth.as_deref() != Some(birth) {
                line.spouse_birth = Some(birth.to_string());
                line.enhance_from(&birth_family.family_id);
            }
        }
        if let Some(death) = spouse.death() {
            line.spouse_death = Some(death.to_string());
            line.enhance_from(&birth_family.family_id);
        }
    }

    fn complete_from_own_family(&self, line: &mut PersonLine, person: &Person, own: &Family) {
        if line.death.is_none() {
            if let Some(death) = person.death() {
                line.death = Some(death.to_string());
                line.enhance_from(&own.family_id);
            }
        }

        let Some((couple, partner)) = own.couples.iter().find_map(|couple| {
            if self.same_person(&couple.husband, person) {
                Some((couple, &couple.wife))
            } else if self.same_person(&couple.wife, person) {
                Some((couple, &couple.husband))
            } else {
                None
            }
        }) else {
            return;
        };

        if line.spouse.is_none() && !partner.display_name().is_empty() {
            line.spouse = Some(partner.full_name());
            line.enhance_from(&own.family_id);
        }
        if !line.marriage.as_deref().is_some_and(is_full_date) {
            if let Some(marriage) = couple_marriage(couple) {
                if line.marriage.as_deref() != Some(marriage.as_str()) {
                    line.marriage = Some(marriage);
                    line.enhance_from(&own.family_id);
                }
            }
        }
    }

    fn matches_by_name_or_birth(&self, candidate: &Person, person: &Person) -> bool {
        if self.matcher.are_names_equivalent(&candidate.name, &person.name) {
            return true;
        }
        matches!((candidate.birth(), person.birth()), (Some(a), Some(b)) if a == b)
    }
}
